use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::{UpstreamError, UpstreamResult};
use super::provider::SportsDataApi;
use crate::models::{
    Article, BoxScore, Competitor, Injury, Odds, PlayerBio, ScheduledEvent, ScoringPlay,
    Situation, StandingsEntry, StatLine,
};
use crate::resolver::field_position::parse_down_distance;

const SCOREBOARD: &str = "nfl-scoreboard-day";
const BOX_SCORE: &str = "nfl-boxscore";
const ODDS: &str = "nfl-eventodds";
const PLAYER: &str = "nfl-ath-fullinfo";
const STANDINGS: &str = "nfl-standings";
const INJURIES: &str = "nfl-team-injuries";
const NEWS: &str = "nfl-news";

/// Sports-data provider reached through a RapidAPI-style gateway.
/// Payloads follow ESPN's site-API JSON shape.
pub struct SportsDataClient {
    http: Client,
    base_url: Url,
    api_key: String,
    api_host: String,
    timeout: Duration,
}

impl SportsDataClient {
    pub fn new(base_url: &str, api_key: &str, api_host: &str, timeout: Duration) -> anyhow::Result<Self> {
        use anyhow::Context;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        // A trailing slash keeps `join` from dropping the last path segment.
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).with_context(|| format!("Invalid API base URL: {}", base_url))?;

        Ok(SportsDataClient {
            http,
            base_url,
            api_key: api_key.to_string(),
            api_host: api_host.to_string(),
            timeout,
        })
    }

    fn endpoint_url(&self, endpoint: &'static str, query: &[(&str, &str)]) -> UpstreamResult<Url> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| UpstreamError::schema(endpoint, format!("bad endpoint URL: {}", e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> UpstreamResult<T> {
        let url = self.endpoint_url(endpoint, query)?;
        debug!("Fetching {}", url);

        let resp = self
            .http
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { endpoint, status });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        serde_json::from_slice(&body).map_err(|source| UpstreamError::Parse { endpoint, source })
    }

    fn transport_error(&self, endpoint: &'static str, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout {
                endpoint,
                timeout: self.timeout,
            }
        } else {
            UpstreamError::Transport { endpoint, source: e }
        }
    }
}

#[async_trait]
impl SportsDataApi for SportsDataClient {
    fn name(&self) -> &str {
        &self.api_host
    }

    async fn get_scoreboard(&self, date: NaiveDate) -> UpstreamResult<Vec<ScheduledEvent>> {
        let day = date.format("%Y%m%d").to_string();
        let raw: WireScoreboard = self.get_json(SCOREBOARD, &[("day", &day)]).await?;
        parse_scoreboard(raw)
    }

    async fn get_box_score(&self, game_id: &str) -> UpstreamResult<BoxScore> {
        let raw: WireBoxScore = self.get_json(BOX_SCORE, &[("id", game_id)]).await?;
        parse_box_score(raw)
    }

    async fn get_odds(&self, game_id: &str) -> UpstreamResult<Odds> {
        let raw: WireOdds = self.get_json(ODDS, &[("id", game_id)]).await?;
        Ok(parse_odds(raw))
    }

    async fn get_player_bio(&self, player_id: &str) -> UpstreamResult<PlayerBio> {
        let raw: WirePlayer = self.get_json(PLAYER, &[("id", player_id)]).await?;
        parse_player(raw)
    }

    async fn get_standings(&self, year: i32) -> UpstreamResult<Vec<StandingsEntry>> {
        let year = year.to_string();
        let raw: WireStandings = self.get_json(STANDINGS, &[("year", &year)]).await?;
        parse_standings(raw)
    }

    async fn get_injuries(&self, team_id: &str) -> UpstreamResult<Vec<Injury>> {
        let raw: WireInjuries = self.get_json(INJURIES, &[("id", team_id)]).await?;
        Ok(parse_injuries(raw))
    }

    async fn get_news(&self) -> UpstreamResult<Vec<Article>> {
        let raw: WireNews = self.get_json(NEWS, &[]).await?;
        Ok(parse_news(raw))
    }
}

// ── Wire schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WireScoreboard {
    #[serde(default)]
    events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    id: String,
    #[serde(default)]
    competitions: Vec<WireCompetition>,
}

#[derive(Debug, Deserialize)]
struct WireCompetition {
    #[serde(default)]
    competitors: Vec<WireCompetitor>,
    status: Option<WireStatus>,
    situation: Option<WireSituation>,
}

#[derive(Debug, Deserialize)]
struct WireCompetitor {
    #[serde(rename = "homeAway")]
    home_away: String,
    #[serde(default)]
    score: Option<WireScore>,
    team: WireTeam,
}

/// Scores arrive as strings ("28") from some endpoints and numbers from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireScore {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct WireTeam {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    #[serde(rename = "displayClock", default)]
    display_clock: Option<String>,
    #[serde(default)]
    period: Option<i64>,
    #[serde(rename = "type")]
    status_type: WireStatusType,
}

#[derive(Debug, Deserialize)]
struct WireStatusType {
    state: String,
    #[serde(default)]
    detail: Option<String>,
    #[serde(rename = "shortDetail", default)]
    short_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSituation {
    #[serde(default)]
    down: Option<i64>,
    #[serde(default)]
    distance: Option<i64>,
    #[serde(rename = "possessionText", default)]
    possession_text: Option<String>,
    #[serde(default)]
    possession: Option<String>,
    #[serde(rename = "shortDownDistanceText", default)]
    short_down_distance_text: Option<String>,
    #[serde(rename = "lastPlay", default)]
    last_play: Option<WireText>,
}

#[derive(Debug, Deserialize)]
struct WireText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireBoxScore {
    #[serde(rename = "scoringPlays", default)]
    scoring_plays: Vec<WireScoringPlay>,
    #[serde(rename = "winprobability", default)]
    win_probability: Vec<WireWinProbability>,
    #[serde(default)]
    drives: Option<WireDrives>,
    #[serde(default)]
    situation: Option<WireSituation>,
}

#[derive(Debug, Deserialize)]
struct WireScoringPlay {
    #[serde(default)]
    text: Option<String>,
    period: WirePeriod,
    #[serde(default)]
    clock: Option<WireDisplayValue>,
    team: WireTeam,
    #[serde(rename = "scoringType", default)]
    scoring_type: Option<WireScoringType>,
    #[serde(rename = "homeScore")]
    home_score: i64,
    #[serde(rename = "awayScore")]
    away_score: i64,
}

#[derive(Debug, Deserialize)]
struct WirePeriod {
    number: i64,
}

#[derive(Debug, Deserialize)]
struct WireDisplayValue {
    #[serde(rename = "displayValue", default)]
    display_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireScoringType {
    #[serde(default)]
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireWinProbability {
    #[serde(rename = "homeWinPercentage")]
    home_win_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct WireDrives {
    #[serde(default)]
    current: Option<WireDrive>,
}

#[derive(Debug, Deserialize)]
struct WireDrive {
    #[serde(rename = "timeElapsed", default)]
    time_elapsed: Option<WireDisplayValue>,
}

#[derive(Debug, Deserialize)]
struct WireOdds {
    #[serde(default)]
    items: Vec<WireOddsItem>,
}

#[derive(Debug, Deserialize)]
struct WireOddsItem {
    #[serde(default)]
    details: Option<String>,
    #[serde(rename = "overUnder", default)]
    over_under: Option<f64>,
    #[serde(rename = "homeTeamOdds", default)]
    home_team_odds: Option<WireTeamOdds>,
    #[serde(rename = "awayTeamOdds", default)]
    away_team_odds: Option<WireTeamOdds>,
}

#[derive(Debug, Deserialize)]
struct WireTeamOdds {
    #[serde(rename = "winPercentage", default)]
    win_percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WirePlayer {
    athlete: WireAthlete,
}

#[derive(Debug, Deserialize)]
struct WireAthlete {
    id: String,
    #[serde(rename = "displayName")]
    display_name: String,
    #[serde(default)]
    position: Option<WireAbbreviated>,
    #[serde(default)]
    jersey: Option<String>,
    #[serde(rename = "displayHeight", default)]
    display_height: Option<String>,
    #[serde(rename = "displayWeight", default)]
    display_weight: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    experience: Option<WireExperience>,
    #[serde(default)]
    college: Option<WireNamed>,
    #[serde(rename = "statsSummary", default)]
    stats_summary: Option<WireStatsSummary>,
}

#[derive(Debug, Deserialize)]
struct WireAbbreviated {
    #[serde(default)]
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireExperience {
    #[serde(default)]
    years: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct WireNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStatsSummary {
    #[serde(default)]
    statistics: Vec<WireStatistic>,
}

#[derive(Debug, Deserialize)]
struct WireStatistic {
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(rename = "displayValue", default)]
    display_value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireStandings {
    #[serde(default)]
    standings: Option<WireStandingsGroup>,
}

#[derive(Debug, Deserialize)]
struct WireStandingsGroup {
    #[serde(default)]
    entries: Vec<WireStandingsEntry>,
}

#[derive(Debug, Deserialize)]
struct WireStandingsEntry {
    team: WireTeam,
    #[serde(default)]
    stats: Vec<WireNamedValue>,
}

#[derive(Debug, Deserialize)]
struct WireNamedValue {
    name: String,
    #[serde(default)]
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireInjuries {
    #[serde(default)]
    injuries: Vec<WireInjury>,
}

#[derive(Debug, Deserialize)]
struct WireInjury {
    #[serde(default)]
    athlete: Option<WireInjuredAthlete>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Option<WireInjuryDetails>,
}

#[derive(Debug, Deserialize)]
struct WireInjuredAthlete {
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(default)]
    position: Option<WireAbbreviated>,
}

#[derive(Debug, Deserialize)]
struct WireInjuryDetails {
    #[serde(rename = "type", default)]
    injury_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireNews {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
struct WireArticle {
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    links: Option<WireLinks>,
}

#[derive(Debug, Deserialize)]
struct WireLinks {
    #[serde(default)]
    web: Option<WireHref>,
}

#[derive(Debug, Deserialize)]
struct WireHref {
    #[serde(default)]
    href: Option<String>,
}

// ── Validation: wire → domain ────────────────────────────────────────────────

fn parse_score(endpoint: &'static str, score: Option<&WireScore>) -> UpstreamResult<i32> {
    match score {
        None => Ok(0),
        Some(WireScore::Number(n)) => i32::try_from(*n)
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| UpstreamError::schema(endpoint, format!("score out of range: {}", n))),
        Some(WireScore::Text(s)) if s.trim().is_empty() => Ok(0),
        Some(WireScore::Text(s)) => s
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|n| *n >= 0)
            .ok_or_else(|| UpstreamError::schema(endpoint, format!("score is not a number: {:?}", s))),
    }
}

fn to_period(endpoint: &'static str, period: i64) -> UpstreamResult<u8> {
    u8::try_from(period)
        .map_err(|_| UpstreamError::schema(endpoint, format!("period out of range: {}", period)))
}

/// Down/distance from the numeric fields, falling back to the text form.
/// Negative values (no down between plays) mean unknown.
fn parse_situation(raw: &WireSituation) -> Situation {
    let numeric = match (raw.down, raw.distance) {
        (Some(down), Some(distance)) if (1..=4).contains(&down) && (0..=99).contains(&distance) => {
            Some((down as u8, distance as u8))
        }
        _ => None,
    };
    let (down, distance) = numeric.unwrap_or_else(|| {
        let dd = parse_down_distance(raw.short_down_distance_text.as_deref().unwrap_or_default());
        (dd.down, dd.distance)
    });

    Situation {
        down,
        distance,
        yard_line: raw.possession_text.clone().unwrap_or_default(),
        possession_team_id: raw.possession.clone().filter(|p| !p.is_empty()),
        last_play_text: raw
            .last_play
            .as_ref()
            .and_then(|p| p.text.clone())
            .unwrap_or_default(),
    }
}

fn parse_competitor(raw: &WireCompetitor) -> UpstreamResult<Competitor> {
    let abbr = raw
        .team
        .abbreviation
        .clone()
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| UpstreamError::schema(SCOREBOARD, "competitor without team abbreviation"))?;
    Ok(Competitor {
        team_id: raw.team.id.clone().unwrap_or_default(),
        abbr,
        score: parse_score(SCOREBOARD, raw.score.as_ref())?,
    })
}

fn parse_event(raw: &WireEvent) -> UpstreamResult<ScheduledEvent> {
    let competition = raw
        .competitions
        .first()
        .ok_or_else(|| UpstreamError::schema(SCOREBOARD, format!("event {} has no competition", raw.id)))?;

    let side = |which: &str| -> UpstreamResult<Competitor> {
        let c = competition
            .competitors
            .iter()
            .find(|c| c.home_away.eq_ignore_ascii_case(which))
            .ok_or_else(|| UpstreamError::schema(SCOREBOARD, format!("event {} has no {} team", raw.id, which)))?;
        parse_competitor(c)
    };
    let home = side("home")?;
    let away = side("away")?;

    let status = competition
        .status
        .as_ref()
        .ok_or_else(|| UpstreamError::schema(SCOREBOARD, format!("event {} has no status", raw.id)))?;

    let status_detail = status
        .status_type
        .short_detail
        .clone()
        .or_else(|| status.status_type.detail.clone())
        .unwrap_or_default();

    Ok(ScheduledEvent {
        id: raw.id.clone(),
        state: status.status_type.state.clone(),
        status_detail,
        clock: status.display_clock.clone().unwrap_or_else(|| "00:00".to_string()),
        period: to_period(SCOREBOARD, status.period.unwrap_or(0))?,
        home,
        away,
        situation: competition.situation.as_ref().map(parse_situation),
    })
}

/// Every event must validate; one malformed event rejects the payload.
fn parse_scoreboard(raw: WireScoreboard) -> UpstreamResult<Vec<ScheduledEvent>> {
    raw.events.iter().map(parse_event).collect()
}

fn parse_box_score(raw: WireBoxScore) -> UpstreamResult<BoxScore> {
    let scoring_plays = raw
        .scoring_plays
        .iter()
        .map(|p| {
            Ok(ScoringPlay {
                period: to_period(BOX_SCORE, p.period.number)?,
                clock: p
                    .clock
                    .as_ref()
                    .and_then(|c| c.display_value.clone())
                    .unwrap_or_default(),
                team_abbr: p.team.abbreviation.clone().unwrap_or_default(),
                kind: p
                    .scoring_type
                    .as_ref()
                    .and_then(|t| t.abbreviation.clone())
                    .unwrap_or_default(),
                text: p.text.clone().unwrap_or_default(),
                home_score: parse_score(BOX_SCORE, Some(&WireScore::Number(p.home_score)))?,
                away_score: parse_score(BOX_SCORE, Some(&WireScore::Number(p.away_score)))?,
            })
        })
        .collect::<UpstreamResult<Vec<_>>>()?;

    Ok(BoxScore {
        scoring_plays,
        home_win_percentage: raw.win_probability.last().map(|w| w.home_win_percentage),
        drive_time: raw
            .drives
            .and_then(|d| d.current)
            .and_then(|d| d.time_elapsed)
            .and_then(|t| t.display_value),
        situation: raw.situation.as_ref().map(parse_situation),
    })
}

fn parse_odds(raw: WireOdds) -> Odds {
    let Some(item) = raw.items.into_iter().next() else {
        return Odds::default();
    };
    Odds {
        home_win_percentage: item.home_team_odds.and_then(|o| o.win_percentage),
        away_win_percentage: item.away_team_odds.and_then(|o| o.win_percentage),
        details: item.details,
        over_under: item.over_under,
    }
}

fn parse_player(raw: WirePlayer) -> UpstreamResult<PlayerBio> {
    let a = raw.athlete;
    if a.id.trim().is_empty() || a.display_name.trim().is_empty() {
        return Err(UpstreamError::schema(PLAYER, "athlete without id or name"));
    }
    Ok(PlayerBio {
        id: a.id,
        name: a.display_name,
        position: a.position.and_then(|p| p.abbreviation).unwrap_or_default(),
        jersey: a.jersey,
        height: a.display_height,
        weight: a.display_weight,
        age: a.age,
        experience_years: a.experience.and_then(|e| e.years),
        college: a.college.and_then(|c| c.name),
        stats: a
            .stats_summary
            .map(|s| s.statistics)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| {
                Some(StatLine {
                    label: s.display_name?,
                    value: s.display_value?,
                })
            })
            .collect(),
    })
}

fn parse_standings(raw: WireStandings) -> UpstreamResult<Vec<StandingsEntry>> {
    let entries = raw.standings.map(|s| s.entries).unwrap_or_default();
    entries
        .into_iter()
        .map(|e| {
            let team_abbr = e
                .team
                .abbreviation
                .ok_or_else(|| UpstreamError::schema(STANDINGS, "entry without team abbreviation"))?;
            let stat = |name: &str| -> u32 {
                e.stats
                    .iter()
                    .find(|s| s.name == name)
                    .and_then(|s| s.value)
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v as u32)
                    .unwrap_or(0)
            };
            Ok(StandingsEntry {
                team_name: e.team.display_name.clone().unwrap_or_else(|| team_abbr.clone()),
                wins: stat("wins"),
                losses: stat("losses"),
                ties: stat("ties"),
                team_abbr,
            })
        })
        .collect()
}

/// Records without a player name are skipped.
fn parse_injuries(raw: WireInjuries) -> Vec<Injury> {
    raw.injuries
        .into_iter()
        .filter_map(|i| {
            let athlete = i.athlete?;
            Some(Injury {
                player_name: athlete.display_name?,
                position: athlete
                    .position
                    .and_then(|p| p.abbreviation)
                    .unwrap_or_default(),
                status: i.status.unwrap_or_else(|| "Unknown".to_string()),
                detail: i.details.and_then(|d| d.injury_type),
            })
        })
        .collect()
}

fn parse_news(raw: WireNews) -> Vec<Article> {
    raw.articles
        .into_iter()
        .filter_map(|a| {
            Some(Article {
                headline: a.headline?,
                description: a.description,
                published: a.published,
                link: a.links.and_then(|l| l.web).and_then(|w| w.href),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scoreboard(value: serde_json::Value) -> UpstreamResult<Vec<ScheduledEvent>> {
        parse_scoreboard(serde_json::from_value(value).unwrap())
    }

    fn live_event() -> serde_json::Value {
        json!({
            "id": "401671793",
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": "21", "team": {"id": "17", "abbreviation": "NE"}},
                    {"homeAway": "away", "score": "10", "team": {"id": "20", "abbreviation": "NYJ"}}
                ],
                "status": {
                    "displayClock": "04:12",
                    "period": 3,
                    "type": {"state": "in", "detail": "4:12 - 3rd Quarter", "shortDetail": "4:12 - 3rd"}
                },
                "situation": {
                    "down": 3,
                    "distance": 7,
                    "possessionText": "NYJ 35",
                    "possession": "17",
                    "lastPlay": {"text": "Stevenson run up the middle for 4 yards"}
                }
            }]
        })
    }

    #[test]
    fn parses_live_scoreboard_event() {
        let events = scoreboard(json!({"events": [live_event()]})).unwrap();
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.id, "401671793");
        assert_eq!(ev.home.abbr, "NE");
        assert_eq!(ev.home.score, 21);
        assert_eq!(ev.away.score, 10);
        assert_eq!(ev.period, 3);
        assert_eq!(ev.status_detail, "4:12 - 3rd");
        let s = ev.situation.as_ref().unwrap();
        assert_eq!((s.down, s.distance), (3, 7));
        assert_eq!(s.yard_line, "NYJ 35");
        assert_eq!(s.possession_team_id.as_deref(), Some("17"));
    }

    #[test]
    fn empty_scoreboard_is_not_an_error() {
        assert!(scoreboard(json!({})).unwrap().is_empty());
    }

    #[test]
    fn numeric_and_missing_scores_are_accepted() {
        let mut ev = live_event();
        ev["competitions"][0]["competitors"][0]["score"] = json!(7);
        ev["competitions"][0]["competitors"][1]
            .as_object_mut()
            .unwrap()
            .remove("score");
        let events = scoreboard(json!({"events": [ev]})).unwrap();
        assert_eq!(events[0].home.score, 7);
        assert_eq!(events[0].away.score, 0);
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let mut ev = live_event();
        ev["competitions"][0]["competitors"][0]["score"] = json!("TBD");
        let err = scoreboard(json!({"events": [ev]})).unwrap_err();
        assert!(matches!(err, UpstreamError::Schema { endpoint: SCOREBOARD, .. }));
    }

    #[test]
    fn missing_away_team_is_rejected() {
        let mut ev = live_event();
        ev["competitions"][0]["competitors"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert!(scoreboard(json!({"events": [ev]})).is_err());
    }

    #[test]
    fn negative_down_falls_back_to_text() {
        let raw: WireSituation = serde_json::from_value(json!({
            "down": -1,
            "distance": -1,
            "shortDownDistanceText": "2nd & 6",
            "possessionText": "NE 40"
        }))
        .unwrap();
        let s = parse_situation(&raw);
        assert_eq!((s.down, s.distance), (2, 6));
        assert!(s.possession_team_id.is_none());
    }

    #[test]
    fn box_score_takes_latest_win_probability() {
        let raw: WireBoxScore = serde_json::from_value(json!({
            "scoringPlays": [{
                "text": "Joey Slye 42 Yd Field Goal",
                "period": {"number": 1},
                "clock": {"displayValue": "8:22"},
                "team": {"abbreviation": "NE"},
                "scoringType": {"abbreviation": "FG"},
                "homeScore": 3,
                "awayScore": 0
            }],
            "winprobability": [
                {"homeWinPercentage": 0.5},
                {"homeWinPercentage": 0.64}
            ],
            "drives": {"current": {"timeElapsed": {"displayValue": "4:12"}}}
        }))
        .unwrap();
        let bs = parse_box_score(raw).unwrap();
        assert_eq!(bs.home_win_percentage, Some(0.64));
        assert_eq!(bs.drive_time.as_deref(), Some("4:12"));
        assert_eq!(bs.scoring_plays[0].kind, "FG");
        assert_eq!(bs.scoring_plays[0].home_score, 3);
    }

    #[test]
    fn odds_without_items_are_empty() {
        let odds = parse_odds(serde_json::from_value(json!({"items": []})).unwrap());
        assert_eq!(odds, Odds::default());
    }

    #[test]
    fn player_bio_collects_stats() {
        let raw: WirePlayer = serde_json::from_value(json!({
            "athlete": {
                "id": "4431452",
                "displayName": "Drake Maye",
                "position": {"abbreviation": "QB"},
                "jersey": "10",
                "age": 24,
                "statsSummary": {"statistics": [
                    {"displayName": "Passing Yards", "displayValue": "3,276"},
                    {"displayName": "Broken"}
                ]}
            }
        }))
        .unwrap();
        let bio = parse_player(raw).unwrap();
        assert_eq!(bio.position, "QB");
        assert_eq!(bio.age, Some(24));
        assert_eq!(bio.stats.len(), 1);
    }

    #[test]
    fn player_without_name_is_rejected() {
        let raw: WirePlayer =
            serde_json::from_value(json!({"athlete": {"id": "1", "displayName": ""}})).unwrap();
        assert!(parse_player(raw).is_err());
    }

    #[test]
    fn standings_read_named_stats() {
        let raw: WireStandings = serde_json::from_value(json!({
            "standings": {"entries": [{
                "team": {"abbreviation": "NE", "displayName": "New England Patriots"},
                "stats": [
                    {"name": "wins", "value": 11.0},
                    {"name": "losses", "value": 5.0}
                ]
            }]}
        }))
        .unwrap();
        let rows = parse_standings(raw).unwrap();
        assert_eq!(rows[0].wins, 11);
        assert_eq!(rows[0].losses, 5);
        assert_eq!(rows[0].ties, 0);
    }

    #[test]
    fn injuries_and_news_skip_nameless_records() {
        let inj: WireInjuries = serde_json::from_value(json!({"injuries": [
            {"athlete": {"displayName": "Hunter Henry", "position": {"abbreviation": "TE"}}, "status": "Questionable", "details": {"type": "Knee"}},
            {"status": "Out"}
        ]}))
        .unwrap();
        let injuries = parse_injuries(inj);
        assert_eq!(injuries.len(), 1);
        assert_eq!(injuries[0].detail.as_deref(), Some("Knee"));

        let news: WireNews = serde_json::from_value(json!({"articles": [
            {"headline": "Patriots clinch", "links": {"web": {"href": "https://example.test/a"}}},
            {"description": "no headline"}
        ]}))
        .unwrap();
        let articles = parse_news(news);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link.as_deref(), Some("https://example.test/a"));
    }

    #[test]
    fn endpoint_urls_keep_base_path() {
        let client = SportsDataClient::new(
            "https://example.test/v1",
            "key",
            "example.test",
            Duration::from_secs(1),
        )
        .unwrap();
        let url = client.endpoint_url(SCOREBOARD, &[("day", "20261018")]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/v1/nfl-scoreboard-day?day=20261018");
    }
}
