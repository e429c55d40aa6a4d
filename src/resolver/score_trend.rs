use serde::Serialize;

use crate::models::ScoringPlay;

/// Cumulative score after each scoring play, from the tracked team's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTrendPoint {
    pub time: String,
    pub tracked: i32,
    pub opponent: i32,
}

/// Starts at 0-0 kickoff. Plays are taken in the order given; the upstream
/// lists them chronologically.
pub fn score_trend(plays: &[ScoringPlay], tracked_is_home: bool) -> Vec<ScoreTrendPoint> {
    let mut points = Vec::with_capacity(plays.len() + 1);
    points.push(ScoreTrendPoint {
        time: "KO".to_string(),
        tracked: 0,
        opponent: 0,
    });

    for play in plays {
        let (tracked, opponent) = if tracked_is_home {
            (play.home_score, play.away_score)
        } else {
            (play.away_score, play.home_score)
        };
        points.push(ScoreTrendPoint {
            time: format!("{}Q {}", play.period, play.clock),
            tracked,
            opponent,
        });
    }

    points
}
