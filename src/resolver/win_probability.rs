//! Win-probability normalization.
//!
//! Upstream feeds report either a fraction (0.82) or a percentage (82.0), and
//! often sit at a flat 50 when their model has no signal. Normalization puts
//! every value on a percentage scale, substitutes a score-differential
//! heuristic for the flat midpoint, and keeps the result off the 0/100 ends.

/// Points of win probability per point of score differential.
pub const DEFAULT_SENSITIVITY: f64 = 1.8;

pub const NEUTRAL: f64 = 50.0;
pub const MIN_PROBABILITY: f64 = 0.1;
pub const MAX_PROBABILITY: f64 = 99.9;

/// Values in [0, 1] are fractions; everything else is already a percentage.
/// The boundary is inclusive, so `1.0` reads as certainty (100%), never as 1%.
/// Non-finite input is treated as no signal.
pub fn as_percentage(raw: f64) -> f64 {
    if !raw.is_finite() {
        NEUTRAL
    } else if (0.0..=1.0).contains(&raw) {
        raw * 100.0
    } else {
        raw
    }
}

/// Tracked-team win probability in [0.1, 99.9] from a raw upstream figure,
/// fraction or percent.
///
/// `raw_probability` is already from the tracked team's perspective.
pub fn normalize_win_probability(
    raw_probability: f64,
    home_score: i32,
    away_score: i32,
    tracked_is_home: bool,
    sensitivity: f64,
) -> f64 {
    normalize_percentage(
        as_percentage(raw_probability),
        home_score,
        away_score,
        tracked_is_home,
        sensitivity,
    )
}

/// Same as [`normalize_win_probability`] for a value already on the
/// percentage scale. Small percentages stay small.
pub fn normalize_percentage(
    pct: f64,
    home_score: i32,
    away_score: i32,
    tracked_is_home: bool,
    sensitivity: f64,
) -> f64 {
    if !pct.is_finite() {
        return NEUTRAL;
    }

    let differential = if tracked_is_home {
        home_score - away_score
    } else {
        away_score - home_score
    };

    let pct = if (pct - NEUTRAL).abs() < f64::EPSILON && differential != 0 {
        NEUTRAL + differential as f64 * sensitivity
    } else {
        pct
    };

    pct.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

/// Convert a home-team percentage to the tracked team's side.
pub fn tracked_perspective(home_pct: f64, tracked_is_home: bool) -> f64 {
    if tracked_is_home {
        home_pct
    } else {
        100.0 - home_pct
    }
}
