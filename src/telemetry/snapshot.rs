use chrono::{DateTime, Utc};

use crate::config::TrackedTeam;
use crate::models::{BoxScore, GameSnapshot, GameStatus, Odds, ScheduledEvent, ScoreLine};
use crate::resolver::win_probability::{
    as_percentage, normalize_percentage, tracked_perspective, NEUTRAL,
};

/// The tracked team's game on the scoreboard, if any.
pub fn find_tracked_event<'a>(events: &'a [ScheduledEvent], team: &TrackedTeam) -> Option<&'a ScheduledEvent> {
    events.iter().find(|ev| ev.involves(team))
}

/// Home-team win percentage: box-score model first, then the odds feed, then
/// no signal. Upstream fractions are scaled here and nowhere else.
fn home_percentage(box_score: &BoxScore, odds: &Odds) -> f64 {
    box_score
        .home_win_percentage
        .or(odds.home_win_percentage)
        .map(as_percentage)
        .or_else(|| odds.away_win_percentage.map(|away| 100.0 - as_percentage(away)))
        .unwrap_or(NEUTRAL)
}

/// "NE -3.5 • O/U 42.5"; either half may be missing.
fn betting_line(odds: &Odds) -> Option<String> {
    match (&odds.details, odds.over_under) {
        (Some(details), Some(total)) => Some(format!("{} • O/U {}", details, total)),
        (Some(details), None) => Some(details.clone()),
        (None, Some(total)) => Some(format!("O/U {}", total)),
        (None, None) => None,
    }
}

/// Merge one poll cycle's upstream results into a snapshot.
pub fn build_snapshot(
    event: &ScheduledEvent,
    box_score: BoxScore,
    odds: Odds,
    team: &TrackedTeam,
    sensitivity: f64,
    fetched_at: DateTime<Utc>,
) -> GameSnapshot {
    let status = GameStatus::from_upstream_state(&event.state, &event.status_detail);
    let tracked_is_home = event.tracked_is_home(team);

    let pct = tracked_perspective(home_percentage(&box_score, &odds), tracked_is_home);
    let win_probability = normalize_percentage(
        pct,
        event.home.score,
        event.away.score,
        tracked_is_home,
        sensitivity,
    );

    // The box score is fetched after the scoreboard, so its situation is fresher.
    let situation = box_score
        .situation
        .or_else(|| event.situation.clone())
        .unwrap_or_default();

    GameSnapshot {
        game_id: Some(event.id.clone()),
        status,
        is_live: event.state.eq_ignore_ascii_case("in"),
        status_detail: event.status_detail.clone(),
        clock: event.clock.clone(),
        period: event.period,
        score: ScoreLine {
            home: event.home.score,
            away: event.away.score,
            home_abbr: event.home.abbr.clone(),
            away_abbr: event.away.abbr.clone(),
        },
        situation,
        win_probability,
        tracked_is_home,
        drive_time: box_score.drive_time,
        betting_line: betting_line(&odds),
        scoring_plays: box_score.scoring_plays,
        fetched_at,
    }
}
