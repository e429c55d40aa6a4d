use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::models::PlayerQuery;
use crate::resolver::{resolve_field_position, score_trend};
use crate::telemetry::{fallback, GameTelemetryPoller};

pub struct AppState {
    pub poller: Arc<GameTelemetryPoller>,
    /// Feeds the player poll loop
    pub selection: watch::Sender<PlayerQuery>,
}

/// Build the Axum router for the JSON API consumed by the display layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/snapshot", get(snapshot_handler))
        .route("/api/history", get(history_handler))
        .route("/api/field", get(field_handler))
        .route("/api/score-trend", get(score_trend_handler))
        .route("/api/player", get(player_handler).post(select_player_handler))
        .route("/api/roster", get(roster_handler))
        .route("/api/standings", get(standings_handler))
        .route("/api/injuries", get(injuries_handler))
        .route("/api/news", get(news_handler))
        .route("/api/refresh", post(refresh_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /api/snapshot
async fn snapshot_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.current().await)
}

/// GET /api/history
async fn history_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.history().await)
}

/// GET /api/field
async fn field_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.poller.current().await;
    Json(resolve_field_position(&snapshot, state.poller.team()))
}

/// GET /api/score-trend
async fn score_trend_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.poller.current().await;
    Json(score_trend(&snapshot.scoring_plays, snapshot.tracked_is_home))
}

/// GET /api/player
async fn player_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.player().await)
}

/// POST /api/player {"id": "...", "displayPosition": "QB"}
async fn select_player_handler(
    State(state): State<Arc<AppState>>,
    Json(query): Json<PlayerQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if query.id.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "player id must not be empty".to_string()));
    }
    info!("Player selected: {} ({})", query.id, query.display_position);
    state.selection.send_replace(query.clone());
    Ok((StatusCode::ACCEPTED, Json(query)))
}

/// GET /api/roster
async fn roster_handler() -> impl IntoResponse {
    Json(fallback::demo_roster())
}

#[derive(Debug, Deserialize)]
struct StandingsParams {
    year: Option<i32>,
}

/// GET /api/standings?year=2026
async fn standings_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StandingsParams>,
) -> impl IntoResponse {
    let year = params.year.unwrap_or_else(|| Local::now().year());
    Json(state.poller.standings(year).await)
}

/// GET /api/injuries
async fn injuries_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.injuries().await)
}

/// GET /api/news
async fn news_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.news().await)
}

/// POST /api/refresh: one poll now, skipped if a poll is already running.
async fn refresh_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.poller.poll(Local::now().date_naive()).await)
}
