//! Field-position derivation.
//!
//! Every coordinate is on a normalized 0–100 field measured from the tracked
//! team's own goal line: 0 = own goal, 50 = midfield, 100 = opponent's goal.
//! Malformed input never fails; it resolves to a safe default (midfield, no
//! distance) so the display always has something to draw.

use serde::Serialize;

use crate::config::TrackedTeam;
use crate::models::{GameSnapshot, Situation};

const FIELD_MIN: f64 = 0.0;
const FIELD_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Possession {
    Own,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSide {
    Own,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YardLine {
    pub side: FieldSide,
    /// 0..=50
    pub number: u8,
}

impl YardLine {
    pub const MIDFIELD: YardLine = YardLine {
        side: FieldSide::Own,
        number: 50,
    };
}

/// Parse `"<SIDE> <NUMBER>"`. `OWN` or the tracked abbreviation is the own
/// side; `OPP` or any other abbreviation is the opponent's.
pub fn parse_yard_line(yard_line: &str, team: &TrackedTeam) -> YardLine {
    let mut parts = yard_line.split_whitespace();
    let (side, number) = match (parts.next(), parts.next(), parts.next()) {
        (Some(side), Some(number), None) => (side, number),
        _ => return YardLine::MIDFIELD,
    };

    let number = match number.parse::<u8>() {
        Ok(n) if n <= 50 => n,
        _ => return YardLine::MIDFIELD,
    };

    let side = if side.eq_ignore_ascii_case("OWN") || team.is_abbr(side) {
        FieldSide::Own
    } else {
        FieldSide::Opponent
    };

    YardLine { side, number }
}

/// "NE 35" → 35, "OPP 12" → 88. Malformed → 50.
pub fn resolve_absolute_yard_line(yard_line: &str, team: &TrackedTeam) -> f64 {
    let parsed = parse_yard_line(yard_line, team);
    match parsed.side {
        FieldSide::Own => parsed.number as f64,
        FieldSide::Opponent => FIELD_MAX - parsed.number as f64,
    }
}

/// Line to gain. Clamped to the field so goal-to-go never points past the
/// goal line.
pub fn resolve_first_down_marker(absolute_yard_line: f64, distance: u8, possession: Possession) -> f64 {
    let marker = match possession {
        Possession::Own => absolute_yard_line + distance as f64,
        Possession::Opponent => absolute_yard_line - distance as f64,
    };
    marker.clamp(FIELD_MIN, FIELD_MAX)
}

/// Unknown possession counts as the tracked team's ball.
pub fn possession_of(situation: &Situation, team: &TrackedTeam) -> Possession {
    match situation.possession_team_id.as_deref() {
        Some(id) if id != team.id && !team.is_abbr(id) => Possession::Opponent,
        _ => Possession::Own,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownDistance {
    pub down: u8,
    pub distance: u8,
}

impl DownDistance {
    pub const UNKNOWN: DownDistance = DownDistance { down: 0, distance: 0 };
}

/// Parse "3rd & 7" (also "3rd and 7", "1st & 10 at NE 35"). "& Goal"
/// yields distance 0; callers derive the real distance from the yard line.
pub fn parse_down_distance(text: &str) -> DownDistance {
    let lower = text.to_lowercase();
    let (down_part, rest) = match lower.split_once('&').or_else(|| lower.split_once(" and ")) {
        Some(split) => split,
        None => return DownDistance::UNKNOWN,
    };

    let down = match down_part.trim() {
        "1st" => 1,
        "2nd" => 2,
        "3rd" => 3,
        "4th" => 4,
        _ => return DownDistance::UNKNOWN,
    };

    let distance_token = rest.split_whitespace().next().unwrap_or_default();
    let distance = if distance_token == "goal" {
        0
    } else {
        match distance_token.parse::<u8>() {
            Ok(d) if d <= 99 => d,
            _ => return DownDistance::UNKNOWN,
        }
    };

    DownDistance { down, distance }
}

pub fn format_down_distance(down: u8, distance: u8, goal_to_go: bool) -> String {
    let ordinal = match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        4 => "4th",
        _ => return "--".to_string(),
    };
    if goal_to_go {
        format!("{} & Goal", ordinal)
    } else {
        format!("{} & {}", ordinal, distance)
    }
}

/// Display primitives for the drive chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPosition {
    pub line_of_scrimmage: f64,
    pub first_down_marker: f64,
    pub possession: Possession,
    pub goal_to_go: bool,
    pub down_distance: String,
}

pub fn resolve_field_position(snapshot: &GameSnapshot, team: &TrackedTeam) -> FieldPosition {
    let situation = &snapshot.situation;
    let line_of_scrimmage = resolve_absolute_yard_line(&situation.yard_line, team);
    let possession = possession_of(situation, team);
    let first_down_marker = resolve_first_down_marker(line_of_scrimmage, situation.distance, possession);

    let goal_to_go = situation.down > 0
        && match possession {
            Possession::Own => first_down_marker >= FIELD_MAX,
            Possession::Opponent => first_down_marker <= FIELD_MIN,
        };

    FieldPosition {
        line_of_scrimmage,
        first_down_marker,
        possession,
        goal_to_go,
        down_distance: format_down_distance(situation.down, situation.distance, goal_to_go),
    }
}
