use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a snapshot came from and how the display should label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Pregame,
    Live,
    Halftime,
    Final,
    /// No credentials or forced demo: synthetic data by policy
    Demo,
    /// Upstream failed; synthetic data standing in
    Offline,
    /// Upstream answered but the tracked team has no game today
    NoActiveGame,
}

impl GameStatus {
    pub fn from_upstream_state(state: &str, detail: &str) -> Self {
        match state.to_lowercase().as_str() {
            "pre" => GameStatus::Pregame,
            "post" => GameStatus::Final,
            "in" if detail.to_lowercase().contains("halftime") => GameStatus::Halftime,
            _ => GameStatus::Live,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreLine {
    pub home: i32,
    pub away: i32,
    pub home_abbr: String,
    pub away_abbr: String,
}

/// Tactical state of the current play.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Situation {
    /// 0 when unknown (between plays, kickoffs)
    pub down: u8,
    pub distance: u8,
    /// "<SIDE> <NUMBER>", e.g. "NE 35"
    pub yard_line: String,
    pub possession_team_id: Option<String>,
    pub last_play_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPlay {
    pub period: u8,
    pub clock: String,
    pub team_abbr: String,
    /// "TD", "FG", "SF", ...
    pub kind: String,
    pub text: String,
    pub home_score: i32,
    pub away_score: i32,
}

/// One poll cycle's fully-merged view of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: Option<String>,
    pub status: GameStatus,
    pub is_live: bool,
    pub status_detail: String,
    pub clock: String,
    pub period: u8,
    pub score: ScoreLine,
    pub situation: Situation,
    /// Tracked team's chance of winning, always within [0.1, 99.9]
    pub win_probability: f64,
    pub tracked_is_home: bool,
    pub drive_time: Option<String>,
    pub betting_line: Option<String>,
    pub scoring_plays: Vec<ScoringPlay>,
    pub fetched_at: DateTime<Utc>,
}

impl GameSnapshot {
    /// Key used to deduplicate history points: "<period>Q <clock>".
    pub fn timestamp(&self) -> String {
        format!("{}Q {}", self.period, self.clock)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbabilityPoint {
    pub timestamp: String,
    pub probability: f64,
}

/// Player selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub id: String,
    pub display_position: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub position: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBio {
    pub id: String,
    pub name: String,
    pub position: String,
    pub jersey: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<u32>,
    pub experience_years: Option<u32>,
    pub college: Option<String>,
    pub stats: Vec<StatLine>,
}

impl PlayerBio {
    /// Shown while a bio is unavailable: name "LOADING...", numeric fields blank.
    pub fn placeholder(query: &PlayerQuery) -> Self {
        PlayerBio {
            id: query.id.clone(),
            name: "LOADING...".to_string(),
            position: query.display_position.clone(),
            jersey: None,
            height: None,
            weight: None,
            age: None,
            experience_years: None,
            college: None,
            stats: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    pub team_abbr: String,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Injury {
    pub player_name: String,
    pub position: String,
    pub status: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub headline: String,
    pub description: Option<String>,
    pub published: Option<String>,
    pub link: Option<String>,
}

/// One side of a scheduled game.
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub team_id: String,
    pub abbr: String,
    pub score: i32,
}

/// A scoreboard entry, validated at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub id: String,
    pub state: String,
    pub status_detail: String,
    pub clock: String,
    pub period: u8,
    pub home: Competitor,
    pub away: Competitor,
    pub situation: Option<Situation>,
}

impl ScheduledEvent {
    pub fn involves(&self, team: &crate::config::TrackedTeam) -> bool {
        [&self.home, &self.away]
            .iter()
            .any(|c| team.is_abbr(&c.abbr) || (!team.id.is_empty() && c.team_id == team.id))
    }

    pub fn tracked_is_home(&self, team: &crate::config::TrackedTeam) -> bool {
        team.is_abbr(&self.home.abbr) || (!team.id.is_empty() && self.home.team_id == team.id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxScore {
    pub scoring_plays: Vec<ScoringPlay>,
    /// Latest home-team win percentage from the play-by-play model, fraction or percent
    pub home_win_percentage: Option<f64>,
    pub drive_time: Option<String>,
    pub situation: Option<Situation>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Odds {
    pub home_win_percentage: Option<f64>,
    pub away_win_percentage: Option<f64>,
    pub details: Option<String>,
    pub over_under: Option<f64>,
}
