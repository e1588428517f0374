//! Deferred actions keyed by tick
//!
//! Timed effects are plain entries processed at the start of a tick, so
//! overlapping timers resolve deterministically without a real clock.

use serde::{Deserialize, Serialize};

/// Something the engine does when its timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedAction {
    /// Shrink the paddle back to its default width
    RevertPaddleWidth,
    /// Serve a new ball after a lost life
    Respawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub fire_at: u64,
    pub action: TimedAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: u64, action: TimedAction) {
        self.entries.push(Scheduled { fire_at, action });
    }

    /// Schedule `action`, replacing any pending entry for the same action.
    /// A later deadline always wins, so repeated extensions never shorten it.
    pub fn extend(&mut self, fire_at: u64, action: TimedAction) {
        let pending = self.entries.iter_mut().find(|e| e.action == action);
        match pending {
            Some(entry) => entry.fire_at = entry.fire_at.max(fire_at),
            None => self.schedule(fire_at, action),
        }
    }

    /// Remove and return every action due at or before `now`, earliest first
    pub fn take_due(&mut self, now: u64) -> Vec<TimedAction> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|e| {
            if e.fire_at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| e.fire_at);
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn pending(&self, action: TimedAction) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.action == action)
            .map(|e| e.fire_at)
            .max()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
