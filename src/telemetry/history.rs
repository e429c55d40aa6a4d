//! Rolling win-probability history for the trend line.

use std::collections::VecDeque;

use crate::models::WinProbabilityPoint;

pub const DEFAULT_HISTORY_CAP: usize = 30;

/// Append-only within one game, deduplicated against the last point's
/// timestamp, bounded to the most recent `cap` points.
#[derive(Debug, Clone)]
pub struct WinProbabilityHistory {
    points: VecDeque<WinProbabilityPoint>,
    cap: usize,
    game_id: Option<String>,
}

impl WinProbabilityHistory {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        WinProbabilityHistory {
            points: VecDeque::with_capacity(cap),
            cap,
            game_id: None,
        }
    }

    /// Returns `true` if the point was stored.
    ///
    /// A `game_id` different from the one the buffer was filling for starts
    /// a fresh history. Synthetic points (`None`) are only kept while no live
    /// game owns the buffer.
    pub fn record(&mut self, game_id: Option<&str>, point: WinProbabilityPoint) -> bool {
        match game_id {
            Some(id) if self.game_id.as_deref() != Some(id) => {
                // Synthetic points from before the first live game go too.
                self.points.clear();
                self.game_id = Some(id.to_string());
            }
            Some(_) => {}
            None if self.game_id.is_some() => return false,
            None => {}
        }

        if self
            .points
            .back()
            .is_some_and(|last| last.timestamp == point.timestamp)
        {
            return false;
        }

        if self.points.len() == self.cap {
            self.points.pop_front();
        }
        self.points.push_back(point);
        true
    }

    pub fn points(&self) -> Vec<WinProbabilityPoint> {
        self.points.iter().cloned().collect()
    }
}
