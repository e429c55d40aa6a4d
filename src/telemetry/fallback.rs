//! Synthetic data served whenever live data is unconfigured or unavailable.
//!
//! The demo game is a fourth quarter against the Jets. Its shape never
//! changes between ticks; only the clock and a little win-probability jitter
//! move, so the trend line keeps drawing while nothing is live.

use chrono::Utc;
use rand::Rng;
use std::time::Duration;

use crate::config::{TelemetryConfig, TrackedTeam};
use crate::models::{
    GameSnapshot, GameStatus, PlayerBio, PlayerQuery, RosterEntry, ScoreLine, ScoringPlay,
    Situation, StandingsEntry, StatLine,
};
use crate::resolver::win_probability::normalize_win_probability;

const DEMO_OPPONENT: &str = "NYJ";
const DEMO_BASE_PROBABILITY: f64 = 82.0;
const DEMO_JITTER: f64 = 2.5;
const DEMO_QUARTER_START_SECS: u64 = 12 * 60;

/// The demo clock runs one poll interval per tick, at least a second.
fn demo_clock(tick: u64, step: Duration) -> String {
    let step = step.as_secs().max(1) % DEMO_QUARTER_START_SECS;
    let elapsed = (tick % DEMO_QUARTER_START_SECS) * step % DEMO_QUARTER_START_SECS;
    let remaining = DEMO_QUARTER_START_SECS - elapsed;
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

pub fn demo_scoring_plays(team: &TrackedTeam) -> Vec<ScoringPlay> {
    let play = |period: u8, clock: &str, abbr: &str, kind: &str, text: &str, home: i32, away: i32| {
        ScoringPlay {
            period,
            clock: clock.to_string(),
            team_abbr: abbr.to_string(),
            kind: kind.to_string(),
            text: text.to_string(),
            home_score: home,
            away_score: away,
        }
    };
    vec![
        play(1, "08:22", &team.abbr, "FG", "Joey Slye 42 Yd Field Goal", 3, 0),
        play(2, "12:45", DEMO_OPPONENT, "TD", "B. Hall 12 Yd Run", 3, 7),
        play(3, "04:10", &team.abbr, "TD", "D. Maye 4 Yd Run", 10, 7),
        play(4, "14:10", &team.abbr, "TD", "H. Henry 15 Yd Pass From D. Maye", 17, 7),
    ]
}

/// Canonical demo snapshot for poll tick `tick`.
pub fn demo_snapshot(tick: u64, config: &TelemetryConfig) -> GameSnapshot {
    let team = &config.team;
    let jitter = rand::thread_rng().gen_range(-DEMO_JITTER..=DEMO_JITTER);
    let (home, away) = (17, 7);

    GameSnapshot {
        game_id: None,
        status: GameStatus::Demo,
        is_live: false,
        status_detail: "DEMO FEED • WEEK 17".to_string(),
        clock: demo_clock(tick, config.poll_interval),
        period: 4,
        score: ScoreLine {
            home,
            away,
            home_abbr: team.abbr.clone(),
            away_abbr: DEMO_OPPONENT.to_string(),
        },
        situation: Situation {
            down: 1,
            distance: 10,
            yard_line: format!("{} 25", DEMO_OPPONENT),
            possession_team_id: Some(team.id.clone()),
            last_play_text: "D. Maye pass short right to H. Henry for 12 yards".to_string(),
        },
        win_probability: normalize_win_probability(
            DEMO_BASE_PROBABILITY + jitter,
            home,
            away,
            true,
            config.sensitivity_k,
        ),
        tracked_is_home: true,
        drive_time: Some("04:12".to_string()),
        betting_line: None,
        scoring_plays: demo_scoring_plays(team),
        fetched_at: Utc::now(),
    }
}

/// The demo snapshot, labeled as a stand-in for a failed upstream.
pub fn offline_snapshot(tick: u64, config: &TelemetryConfig) -> GameSnapshot {
    GameSnapshot {
        status: GameStatus::Offline,
        status_detail: "STANDBY: UPLINK LOST".to_string(),
        ..demo_snapshot(tick, config)
    }
}

pub fn no_active_game(team: &TrackedTeam) -> GameSnapshot {
    GameSnapshot {
        game_id: None,
        status: GameStatus::NoActiveGame,
        is_live: false,
        status_detail: "NO ACTIVE GAME".to_string(),
        clock: "00:00".to_string(),
        period: 0,
        score: ScoreLine {
            home: 0,
            away: 0,
            home_abbr: team.abbr.clone(),
            away_abbr: "TBD".to_string(),
        },
        situation: Situation::default(),
        win_probability: 50.0,
        tracked_is_home: true,
        drive_time: None,
        betting_line: None,
        scoring_plays: Vec::new(),
        fetched_at: Utc::now(),
    }
}

/// (id, position, name, jersey)
const DEMO_ROSTER: [(&str, &str, &str, &str); 4] = [
    ("4431452", "QB", "Drake Maye", "10"),
    ("4569173", "RB", "Rhamondre Stevenson", "38"),
    ("4428718", "WR", "Ja'Lynn Polk", "1"),
    ("3046439", "TE", "Hunter Henry", "85"),
];

pub fn demo_roster() -> Vec<RosterEntry> {
    DEMO_ROSTER
        .iter()
        .map(|(id, position, name, _)| RosterEntry {
            id: id.to_string(),
            position: position.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// Demo bio for roster players, placeholder for anyone else.
pub fn demo_bio(query: &PlayerQuery) -> PlayerBio {
    match DEMO_ROSTER.iter().find(|(id, ..)| *id == query.id) {
        Some((id, position, name, jersey)) => PlayerBio {
            id: id.to_string(),
            name: name.to_string(),
            position: position.to_string(),
            jersey: Some(jersey.to_string()),
            height: None,
            weight: None,
            age: None,
            experience_years: None,
            college: None,
            stats: vec![StatLine {
                label: "FEED".to_string(),
                value: "DEMO".to_string(),
            }],
        },
        None => PlayerBio::placeholder(query),
    }
}

pub fn demo_standings(team: &TrackedTeam) -> Vec<StandingsEntry> {
    let entry = |abbr: &str, name: &str, wins: u32, losses: u32| StandingsEntry {
        team_abbr: abbr.to_string(),
        team_name: name.to_string(),
        wins,
        losses,
        ties: 0,
    };
    let tracked_name = if team.is_abbr("NE") {
        "New England Patriots".to_string()
    } else {
        team.abbr.clone()
    };
    vec![
        entry(&team.abbr, &tracked_name, 11, 5),
        entry("BUF", "Buffalo Bills", 10, 6),
        entry("MIA", "Miami Dolphins", 7, 9),
        entry(DEMO_OPPONENT, "New York Jets", 4, 12),
    ]
}
