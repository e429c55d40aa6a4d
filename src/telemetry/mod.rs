pub mod error;
pub mod fallback;
pub mod history;
pub mod poller;
pub mod provider;
pub mod snapshot;
pub mod sports;

pub use poller::GameTelemetryPoller;
pub use provider::SportsDataApi;
pub use sports::SportsDataClient;

use chrono::Local;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::models::PlayerQuery;

/// Owns the background polling tasks. Dropping it aborts them; `shutdown`
/// stops them cleanly.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl PollerHandle {
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Poller task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Spawns the game poll loop and the player poll loop.
///
/// The game loop polls once immediately and then every `poll_interval`.
/// Ticks that fall due while a poll is still running are skipped rather than
/// queued. The player loop refetches on every tick and whenever `selection`
/// changes.
pub fn start_telemetry_poller(
    poller: Arc<GameTelemetryPoller>,
    selection: watch::Receiver<PlayerQuery>,
) -> PollerHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let game = tokio::spawn(game_loop(Arc::clone(&poller), shutdown_rx.clone()));
    let player = tokio::spawn(player_loop(poller, selection, shutdown_rx));

    PollerHandle {
        shutdown: shutdown_tx,
        tasks: vec![game, player],
    }
}

async fn game_loop(poller: Arc<GameTelemetryPoller>, mut shutdown: watch::Receiver<bool>) {
    let poll_interval = poller.config().poll_interval;
    info!(
        "Game poller started (team={}, live={}, interval={:?})",
        poller.team().abbr,
        poller.is_live_mode(),
        poll_interval
    );

    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = interval.tick() => {
                let snapshot = poller.poll(Local::now().date_naive()).await;
                debug!(
                    status = ?snapshot.status,
                    clock = %snapshot.clock,
                    win_probability = snapshot.win_probability,
                    "Poll complete"
                );
            }
        }
    }

    info!("Game poller stopped");
}

async fn player_loop(
    poller: Arc<GameTelemetryPoller>,
    mut selection: watch::Receiver<PlayerQuery>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(poller.config().poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut selection_open = true;

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            changed = selection.changed(), if selection_open => {
                if changed.is_err() {
                    // Selector gone; keep refreshing the last choice on the timer.
                    selection_open = false;
                    continue;
                }
            }
            _ = interval.tick() => {}
        }

        let query = selection.borrow_and_update().clone();
        let bio = poller.poll_player(&query).await;
        debug!(player = %query.id, name = %bio.name, "Player refreshed");
    }

    info!("Player poller stopped");
}
