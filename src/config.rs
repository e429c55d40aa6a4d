use clap::Parser;
use std::time::Duration;

use crate::models::PlayerQuery;

/// Live NFL game telemetry poller and JSON dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "patriots-telemetry", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Sports-data API key (absent = demo mode)
    #[arg(long, env = "SPORTS_API_KEY")]
    pub api_key: Option<String>,

    /// Sports-data API host, sent as the `x-rapidapi-host` header
    #[arg(long, env = "SPORTS_API_HOST", default_value = "nfl-api-data.p.rapidapi.com")]
    pub api_host: String,

    /// Override the base URL (defaults to https://<api-host>)
    #[arg(long, env = "SPORTS_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Always serve the demo snapshot, even with an API key configured
    #[arg(long, env = "FORCE_DEMO", default_value = "false")]
    pub force_demo: bool,

    /// Game polling interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "15")]
    pub poll_interval_secs: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// Win-probability points per point of score differential when the feed is flat
    #[arg(long, env = "WIN_PROB_SENSITIVITY", default_value = "1.8")]
    pub sensitivity_k: f64,

    /// Number of win-probability points kept for the trend line
    #[arg(long, env = "HISTORY_CAP", default_value = "30")]
    pub history_cap: usize,

    /// Abbreviation of the tracked team
    #[arg(long, env = "TEAM_ABBR", default_value = "NE")]
    pub team_abbr: String,

    /// Upstream id of the tracked team
    #[arg(long, env = "TEAM_ID", default_value = "17")]
    pub team_id: String,

    /// Player selected on startup
    #[arg(long, env = "PLAYER_ID", default_value = "4431452")]
    pub player_id: String,

    /// Display position of the player selected on startup
    #[arg(long, env = "PLAYER_POSITION", default_value = "QB")]
    pub player_position: String,
}

/// The team whose perspective every derived value takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTeam {
    pub abbr: String,
    pub id: String,
}

impl TrackedTeam {
    pub fn new(abbr: &str, id: &str) -> Self {
        TrackedTeam {
            abbr: abbr.trim().to_uppercase(),
            id: id.trim().to_string(),
        }
    }

    /// True if `abbr` names this team (case-insensitive).
    pub fn is_abbr(&self, abbr: &str) -> bool {
        abbr.trim().eq_ignore_ascii_case(&self.abbr)
    }
}

impl Default for TrackedTeam {
    fn default() -> Self {
        TrackedTeam::new("NE", "17")
    }
}

/// Everything the poller needs, passed in at construction.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub api_key: Option<String>,
    pub force_demo_mode: bool,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub sensitivity_k: f64,
    pub history_cap: usize,
    pub team: TrackedTeam,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            api_key: None,
            force_demo_mode: false,
            poll_interval: Duration::from_secs(15),
            request_timeout: Duration::from_secs(10),
            sensitivity_k: crate::resolver::win_probability::DEFAULT_SENSITIVITY,
            history_cap: crate::telemetry::history::DEFAULT_HISTORY_CAP,
            team: TrackedTeam::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }
        if self.history_cap == 0 {
            anyhow::bail!("history_cap must be at least 1");
        }
        if !self.sensitivity_k.is_finite() || self.sensitivity_k < 0.0 {
            anyhow::bail!("sensitivity_k must be a non-negative number");
        }
        if self.team_abbr.trim().is_empty() {
            anyhow::bail!("team_abbr must not be empty");
        }
        Ok(())
    }

    /// API key with blank values treated as absent.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
    }

    pub fn base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", self.api_host))
    }

    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            api_key: self.api_key(),
            force_demo_mode: self.force_demo,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            sensitivity_k: self.sensitivity_k,
            history_cap: self.history_cap,
            team: TrackedTeam::new(&self.team_abbr, &self.team_id),
        }
    }

    pub fn initial_player(&self) -> PlayerQuery {
        PlayerQuery {
            id: self.player_id.clone(),
            display_position: self.player_position.clone(),
        }
    }
}
