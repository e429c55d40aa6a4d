use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::UpstreamResult;
use crate::models::{Article, BoxScore, Injury, Odds, PlayerBio, ScheduledEvent, StandingsEntry};

/// The upstream sports-data source. Implementations return validated domain
/// values or an `UpstreamError`; they never hand back partial records.
#[async_trait]
pub trait SportsDataApi: Send + Sync {
    /// All games scheduled on `date`.
    async fn get_scoreboard(&self, date: NaiveDate) -> UpstreamResult<Vec<ScheduledEvent>>;

    async fn get_box_score(&self, game_id: &str) -> UpstreamResult<BoxScore>;

    async fn get_odds(&self, game_id: &str) -> UpstreamResult<Odds>;

    async fn get_player_bio(&self, player_id: &str) -> UpstreamResult<PlayerBio>;

    async fn get_standings(&self, year: i32) -> UpstreamResult<Vec<StandingsEntry>>;

    async fn get_injuries(&self, team_id: &str) -> UpstreamResult<Vec<Injury>>;

    async fn get_news(&self) -> UpstreamResult<Vec<Article>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
