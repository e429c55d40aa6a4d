//! The game telemetry poller.
//!
//! Owns the current snapshot, the win-probability history and the selected
//! player's bio. Every public operation returns a displayable value: upstream
//! failures are logged here and replaced with fallback data.

use chrono::{NaiveDate, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::error::{UpstreamError, UpstreamResult};
use super::fallback;
use super::history::WinProbabilityHistory;
use super::provider::SportsDataApi;
use super::snapshot::{build_snapshot, find_tracked_event};
use crate::config::{TelemetryConfig, TrackedTeam};
use crate::models::{
    Article, GameSnapshot, GameStatus, Injury, PlayerBio, PlayerQuery, StandingsEntry,
    WinProbabilityPoint,
};

pub struct GameTelemetryPoller {
    api: Option<Arc<dyn SportsDataApi>>,
    config: TelemetryConfig,
    current: RwLock<GameSnapshot>,
    history: RwLock<WinProbabilityHistory>,
    player: RwLock<PlayerBio>,
    /// Held for the whole of one poll; overlapping polls are skipped.
    gate: Mutex<()>,
    ticks: AtomicU64,
}

impl GameTelemetryPoller {
    pub fn new(
        config: TelemetryConfig,
        api: Option<Arc<dyn SportsDataApi>>,
        initial_player: &PlayerQuery,
    ) -> Self {
        let standby = GameSnapshot {
            status_detail: "STANDBY: AWAITING FIRST POLL".to_string(),
            ..fallback::offline_snapshot(0, &config)
        };
        GameTelemetryPoller {
            api,
            history: RwLock::new(WinProbabilityHistory::new(config.history_cap)),
            current: RwLock::new(standby),
            player: RwLock::new(PlayerBio::placeholder(initial_player)),
            gate: Mutex::new(()),
            ticks: AtomicU64::new(0),
            config,
        }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn team(&self) -> &TrackedTeam {
        &self.config.team
    }

    /// True when polls go to the upstream rather than the demo feed.
    pub fn is_live_mode(&self) -> bool {
        self.live_api().is_some()
    }

    pub async fn current(&self) -> GameSnapshot {
        self.current.read().await.clone()
    }

    pub async fn history(&self) -> Vec<WinProbabilityPoint> {
        self.history.read().await.points()
    }

    pub async fn player(&self) -> PlayerBio {
        self.player.read().await.clone()
    }

    /// Produce this tick's snapshot and record it.
    ///
    /// If another poll is still in flight this one is skipped and the current
    /// snapshot is returned untouched.
    pub async fn poll(&self, today: NaiveDate) -> GameSnapshot {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!("Previous poll still in flight, skipping");
            return self.current().await;
        };

        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        let snapshot = self.fetch_snapshot(today, tick).await;
        self.record(&snapshot).await;
        snapshot
    }

    /// Bio for the selected player; demo bio without credentials, placeholder
    /// on failure.
    pub async fn poll_player(&self, query: &PlayerQuery) -> PlayerBio {
        let bio = match self.live_api() {
            None => fallback::demo_bio(query),
            Some(api) => match self.timed("player", api.get_player_bio(&query.id)).await {
                Ok(mut bio) => {
                    if bio.position.is_empty() {
                        bio.position = query.display_position.clone();
                    }
                    bio
                }
                Err(e) => {
                    warn!(player = %query.id, error = %e, "Player bio unavailable");
                    PlayerBio::placeholder(query)
                }
            },
        };

        *self.player.write().await = bio.clone();
        bio
    }

    pub async fn standings(&self, year: i32) -> Vec<StandingsEntry> {
        let Some(api) = self.live_api() else {
            return fallback::demo_standings(self.team());
        };
        match self.timed("standings", api.get_standings(year)).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(year, error = %e, "Standings unavailable, serving demo table");
                fallback::demo_standings(self.team())
            }
        }
    }

    pub async fn injuries(&self) -> Vec<Injury> {
        let Some(api) = self.live_api() else {
            return Vec::new();
        };
        self.timed("injuries", api.get_injuries(&self.config.team.id))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Injury report unavailable");
                Vec::new()
            })
    }

    pub async fn news(&self) -> Vec<Article> {
        let Some(api) = self.live_api() else {
            return Vec::new();
        };
        self.timed("news", api.get_news()).await.unwrap_or_else(|e| {
            warn!(error = %e, "News feed unavailable");
            Vec::new()
        })
    }

    fn live_api(&self) -> Option<&Arc<dyn SportsDataApi>> {
        if self.config.force_demo_mode || self.config.api_key.is_none() {
            return None;
        }
        self.api.as_ref()
    }

    async fn fetch_snapshot(&self, today: NaiveDate, tick: u64) -> GameSnapshot {
        let team = &self.config.team;

        let Some(api) = self.live_api() else {
            debug!(tick, "Demo mode, serving demo snapshot");
            return fallback::demo_snapshot(tick, &self.config);
        };

        match self.fetch_live(api.as_ref(), today).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                info!(team = %team.abbr, %today, "No game scheduled for tracked team");
                fallback::no_active_game(team)
            }
            Err(e) => {
                warn!(
                    provider = api.name(),
                    endpoint = e.endpoint(),
                    error = %e,
                    "Upstream unavailable, serving fallback snapshot"
                );
                fallback::offline_snapshot(tick, &self.config)
            }
        }
    }

    async fn fetch_live(
        &self,
        api: &dyn SportsDataApi,
        today: NaiveDate,
    ) -> UpstreamResult<Option<GameSnapshot>> {
        let team = &self.config.team;
        let events = self.timed("scoreboard", api.get_scoreboard(today)).await?;

        let Some(event) = find_tracked_event(&events, team) else {
            return Ok(None);
        };

        let (box_score, odds) = futures_util::future::join(
            self.timed("boxscore", api.get_box_score(&event.id)),
            self.timed("odds", api.get_odds(&event.id)),
        )
        .await;

        Ok(Some(build_snapshot(
            event,
            box_score?,
            odds?,
            team,
            self.config.sensitivity_k,
            Utc::now(),
        )))
    }

    async fn timed<T>(
        &self,
        endpoint: &'static str,
        request: impl Future<Output = UpstreamResult<T>>,
    ) -> UpstreamResult<T> {
        let timeout = self.config.request_timeout;
        tokio::time::timeout(timeout, request)
            .await
            .unwrap_or(Err(UpstreamError::Timeout { endpoint, timeout }))
    }

    async fn record(&self, snapshot: &GameSnapshot) {
        // No game means no probability signal worth charting.
        if snapshot.status != GameStatus::NoActiveGame {
            let stored = self.history.write().await.record(
                snapshot.game_id.as_deref(),
                WinProbabilityPoint {
                    timestamp: snapshot.timestamp(),
                    probability: snapshot.win_probability,
                },
            );
            if !stored {
                debug!(
                    timestamp = %snapshot.timestamp(),
                    status = ?snapshot.status,
                    "History not extended"
                );
            }
        }
        *self.current.write().await = snapshot.clone();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        Article, BoxScore, Competitor, Injury, Odds, ScheduledEvent, Situation, StandingsEntry,
    };
    use crate::resolver::win_probability::{MAX_PROBABILITY, MIN_PROBABILITY};
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub(crate) enum Behavior {
        Live,
        NoGame,
        FailScoreboard,
        FailOdds,
        Slow(Duration),
    }

    /// Scripted upstream: a single NE home game whose score and clock the test
    /// controls.
    pub(crate) struct ScriptedApi {
        pub behavior: StdMutex<Behavior>,
        pub clock: StdMutex<String>,
        pub score: StdMutex<(i32, i32)>,
        pub home_win: StdMutex<Option<f64>>,
        pub scoreboard_calls: AtomicUsize,
        pub player_calls: AtomicUsize,
    }

    impl ScriptedApi {
        pub fn new(behavior: Behavior) -> Self {
            ScriptedApi {
                behavior: StdMutex::new(behavior),
                clock: StdMutex::new("10:00".into()),
                score: StdMutex::new((14, 7)),
                home_win: StdMutex::new(Some(0.71)),
                scoreboard_calls: AtomicUsize::new(0),
                player_calls: AtomicUsize::new(0),
            }
        }

        fn behavior(&self) -> Behavior {
            *self.behavior.lock().unwrap()
        }

        pub fn set_clock(&self, clock: &str) {
            *self.clock.lock().unwrap() = clock.to_string();
        }

        fn fail(endpoint: &'static str) -> UpstreamError {
            UpstreamError::schema(endpoint, "scripted failure")
        }
    }

    #[async_trait]
    impl SportsDataApi for ScriptedApi {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn get_scoreboard(&self, _date: NaiveDate) -> UpstreamResult<Vec<ScheduledEvent>> {
            self.scoreboard_calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior() {
                Behavior::FailScoreboard => return Err(Self::fail("scoreboard")),
                Behavior::NoGame => {
                    return Ok(vec![ScheduledEvent {
                        id: "other".into(),
                        state: "in".into(),
                        status_detail: String::new(),
                        clock: "01:00".into(),
                        period: 1,
                        home: Competitor { team_id: "2".into(), abbr: "BUF".into(), score: 0 },
                        away: Competitor { team_id: "15".into(), abbr: "MIA".into(), score: 0 },
                        situation: None,
                    }])
                }
                Behavior::Slow(d) => tokio::time::sleep(d).await,
                _ => {}
            }
            let (home, away) = *self.score.lock().unwrap();
            Ok(vec![ScheduledEvent {
                id: "401".into(),
                state: "in".into(),
                status_detail: "2nd Quarter".into(),
                clock: self.clock.lock().unwrap().clone(),
                period: 2,
                home: Competitor { team_id: "17".into(), abbr: "NE".into(), score: home },
                away: Competitor { team_id: "20".into(), abbr: "NYJ".into(), score: away },
                situation: Some(Situation {
                    down: 3,
                    distance: 4,
                    yard_line: "NYJ 30".into(),
                    possession_team_id: Some("17".into()),
                    last_play_text: "Short pass".into(),
                }),
            }])
        }

        async fn get_box_score(&self, _game_id: &str) -> UpstreamResult<BoxScore> {
            Ok(BoxScore {
                home_win_percentage: *self.home_win.lock().unwrap(),
                ..BoxScore::default()
            })
        }

        async fn get_odds(&self, _game_id: &str) -> UpstreamResult<Odds> {
            if self.behavior() == Behavior::FailOdds {
                return Err(Self::fail("odds"));
            }
            Ok(Odds {
                details: Some("NE -3.5".into()),
                ..Odds::default()
            })
        }

        async fn get_player_bio(&self, player_id: &str) -> UpstreamResult<PlayerBio> {
            self.player_calls.fetch_add(1, Ordering::SeqCst);
            if self.behavior() == Behavior::FailScoreboard {
                return Err(Self::fail("player"));
            }
            Ok(PlayerBio {
                name: "Live Player".into(),
                position: String::new(),
                age: Some(24),
                ..PlayerBio::placeholder(&PlayerQuery {
                    id: player_id.into(),
                    display_position: String::new(),
                })
            })
        }

        async fn get_standings(&self, _year: i32) -> UpstreamResult<Vec<StandingsEntry>> {
            Err(Self::fail("standings"))
        }

        async fn get_injuries(&self, _team_id: &str) -> UpstreamResult<Vec<Injury>> {
            Ok(vec![Injury {
                player_name: "Hunter Henry".into(),
                position: "TE".into(),
                status: "Questionable".into(),
                detail: None,
            }])
        }

        async fn get_news(&self) -> UpstreamResult<Vec<Article>> {
            Err(Self::fail("news"))
        }
    }

    pub(crate) fn qb() -> PlayerQuery {
        PlayerQuery {
            id: "4431452".into(),
            display_position: "QB".into(),
        }
    }

    pub(crate) fn live_config() -> TelemetryConfig {
        TelemetryConfig {
            api_key: Some("key".into()),
            ..TelemetryConfig::default()
        }
    }

    fn poller(config: TelemetryConfig, api: &Arc<ScriptedApi>) -> GameTelemetryPoller {
        let api: Arc<dyn SportsDataApi> = api.clone();
        GameTelemetryPoller::new(config, Some(api), &qb())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn keys(s: &GameSnapshot) -> Vec<String> {
        serde_json::to_value(s)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn no_credentials_serves_demo_without_network() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(TelemetryConfig::default(), &api);

        let a = p.poll(today()).await;
        let b = p.poll(today()).await;

        assert_eq!(a.status, GameStatus::Demo);
        assert_eq!(keys(&a), keys(&b));
        assert_ne!(a.clock, b.clock);
        assert_eq!(api.scoreboard_calls.load(Ordering::SeqCst), 0);
        assert_eq!(p.history().await.len(), 2);
        assert!(!p.is_live_mode());
    }

    #[tokio::test]
    async fn force_demo_overrides_credentials() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let config = TelemetryConfig {
            force_demo_mode: true,
            ..live_config()
        };
        let p = poller(config, &api);
        assert_eq!(p.poll(today()).await.status, GameStatus::Demo);
        assert_eq!(api.scoreboard_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn live_poll_merges_upstream() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);

        let snap = p.poll(today()).await;
        assert_eq!(snap.status, GameStatus::Live);
        assert_eq!(snap.game_id.as_deref(), Some("401"));
        assert_relative_eq!(snap.win_probability, 71.0, epsilon = 1e-9);
        assert_eq!(snap.betting_line.as_deref(), Some("NE -3.5"));
        assert_eq!(p.current().await, snap);

        let history = p.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].timestamp, "2Q 10:00");
    }

    #[tokio::test]
    async fn flat_feed_uses_score_heuristic() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        *api.home_win.lock().unwrap() = Some(0.5);
        *api.score.lock().unwrap() = (35, 3);
        let p = poller(live_config(), &api);
        assert_relative_eq!(p.poll(today()).await.win_probability, MAX_PROBABILITY);
    }

    #[tokio::test]
    async fn no_matching_event_is_no_active_game() {
        let api = Arc::new(ScriptedApi::new(Behavior::NoGame));
        let p = poller(live_config(), &api);

        let snap = p.poll(today()).await;
        assert_eq!(snap.status, GameStatus::NoActiveGame);
        assert!(p.history().await.is_empty());
    }

    #[tokio::test]
    async fn scoreboard_failure_degrades_to_offline() {
        let api = Arc::new(ScriptedApi::new(Behavior::FailScoreboard));
        let p = poller(live_config(), &api);

        let snap = p.poll(today()).await;
        assert_eq!(snap.status, GameStatus::Offline);
        assert!((MIN_PROBABILITY..=MAX_PROBABILITY).contains(&snap.win_probability));
        assert_eq!(keys(&snap), keys(&fallback::demo_snapshot(0, p.config())));
    }

    #[tokio::test]
    async fn follow_up_failure_degrades_to_offline() {
        let api = Arc::new(ScriptedApi::new(Behavior::FailOdds));
        let p = poller(live_config(), &api);
        assert_eq!(p.poll(today()).await.status, GameStatus::Offline);
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let api = Arc::new(ScriptedApi::new(Behavior::Slow(Duration::from_millis(500))));
        let config = TelemetryConfig {
            request_timeout: Duration::from_millis(20),
            ..live_config()
        };
        let p = poller(config, &api);
        assert_eq!(p.poll(today()).await.status, GameStatus::Offline);
    }

    #[tokio::test]
    async fn unchanged_clock_does_not_grow_history() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);
        for _ in 0..5 {
            p.poll(today()).await;
        }
        assert_eq!(p.history().await.len(), 1);
        assert_eq!(api.scoreboard_calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn outage_keeps_live_history_intact() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);
        p.poll(today()).await;

        *api.behavior.lock().unwrap() = Behavior::FailScoreboard;
        for _ in 0..35 {
            assert_eq!(p.poll(today()).await.status, GameStatus::Offline);
        }

        *api.behavior.lock().unwrap() = Behavior::Live;
        api.set_clock("09:30");
        p.poll(today()).await;

        let ts: Vec<_> = p.history().await.into_iter().map(|pt| pt.timestamp).collect();
        assert_eq!(ts, vec!["2Q 10:00", "2Q 09:30"]);
    }

    #[tokio::test]
    async fn history_is_bounded_by_cap() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);
        for i in 0..40 {
            api.set_clock(&format!("{:02}:00", 59 - i));
            p.poll(today()).await;
        }
        let history = p.history().await;
        assert_eq!(history.len(), 30);
        assert_eq!(history[0].timestamp, "2Q 49:00");
    }

    #[tokio::test]
    async fn overlapping_poll_is_skipped() {
        let api = Arc::new(ScriptedApi::new(Behavior::Slow(Duration::from_millis(100))));
        let config = TelemetryConfig {
            request_timeout: Duration::from_secs(5),
            ..live_config()
        };
        let p = poller(config, &api);

        let (first, second) = tokio::join!(p.poll(today()), p.poll(today()));
        assert_eq!(first.status, GameStatus::Live);
        assert_eq!(second.status, GameStatus::Offline);
        assert_eq!(api.scoreboard_calls.load(Ordering::SeqCst), 1);
        assert_eq!(p.history().await.len(), 1);
    }

    #[tokio::test]
    async fn player_poll_uses_upstream_and_keeps_position() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);
        let bio = p.poll_player(&qb()).await;
        assert_eq!(bio.name, "Live Player");
        assert_eq!(bio.position, "QB");
        assert_eq!(p.player().await, bio);
    }

    #[tokio::test]
    async fn player_failure_yields_placeholder() {
        let api = Arc::new(ScriptedApi::new(Behavior::FailScoreboard));
        let p = poller(live_config(), &api);
        let bio = p.poll_player(&qb()).await;
        assert_eq!(bio.name, "LOADING...");
        assert!(bio.age.is_none());
    }

    #[tokio::test]
    async fn player_demo_mode_skips_network() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(TelemetryConfig::default(), &api);
        assert_eq!(p.poll_player(&qb()).await.name, "Drake Maye");
        assert_eq!(api.player_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn secondary_feeds_fall_back() {
        let api = Arc::new(ScriptedApi::new(Behavior::Live));
        let p = poller(live_config(), &api);
        assert_eq!(p.standings(2026).await, fallback::demo_standings(p.team()));
        assert_eq!(p.injuries().await.len(), 1);
        assert!(p.news().await.is_empty());
    }
}
