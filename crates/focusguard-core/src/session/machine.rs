//! Session state machine.
//!
//! A wall-clock-based state machine over the persisted session record. It
//! has no internal thread and reads no clock of its own -- every transition
//! takes `now` (epoch milliseconds) from the caller, so hosts supply
//! wall-clock time and tests simulate elapsed time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle
//! ```
//!
//! Remaining time is never tracked while running: it is derived from
//! `end_time` on read, and frozen into `remaining` only at the moment of
//! pausing. Exactly one of {running with valid `end_time`, paused with
//! valid `remaining`, idle} holds at any time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Idle,
    Focus,
    Break,
}

/// The persisted session record. Field names match the stored layout the
/// front ends read (`endTime` and `remaining` in milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Absolute completion timestamp (epoch ms); meaningful while running.
    pub end_time: i64,
    /// Cached duration (ms); meaningful while paused.
    pub remaining: i64,
    pub paused: bool,
    /// Free-text label, relevant only for focus sessions.
    pub task: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::idle()
    }
}

impl Session {
    /// The terminal state, re-entered after every completion or cancel.
    pub fn idle() -> Self {
        Self {
            active: false,
            kind: SessionKind::Idle,
            end_time: 0,
            remaining: 0,
            paused: false,
            task: String::new(),
        }
    }

    /// Start a session, overwriting whatever was running before.
    pub fn start(kind: SessionKind, minutes: u32, task: impl Into<String>, now_ms: i64) -> Self {
        let duration_ms = i64::from(minutes) * 60_000;
        Self {
            active: true,
            kind,
            end_time: now_ms + duration_ms,
            remaining: duration_ms,
            paused: false,
            task: task.into(),
        }
    }

    /// Freeze the countdown. No-op unless running; returns whether the
    /// state changed.
    pub fn pause(&mut self, now_ms: i64) -> bool {
        if !self.active || self.paused {
            return false;
        }
        self.remaining = (self.end_time - now_ms).max(0);
        self.paused = true;
        true
    }

    /// Continue from the frozen remaining. No-op unless paused; returns
    /// whether the state changed.
    pub fn resume(&mut self, now_ms: i64) -> bool {
        if !self.active || !self.paused {
            return false;
        }
        self.end_time = now_ms + self.remaining.max(0);
        self.paused = false;
        true
    }

    /// Milliseconds left: derived from `end_time` while running, the cached
    /// value while paused, zero when idle.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        if !self.active {
            0
        } else if self.paused {
            self.remaining.max(0)
        } else {
            (self.end_time - now_ms).max(0)
        }
    }

    pub fn is_running(&self) -> bool {
        self.active && !self.paused
    }

    /// A running session whose completion time has passed.
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.is_running() && now_ms >= self.end_time
    }

    /// Indicator label: remaining minutes rounded up while active, empty
    /// when idle. Paused sessions read from the frozen remaining.
    pub fn badge_text(&self, now_ms: i64) -> String {
        if !self.active {
            return String::new();
        }
        let remaining = self.remaining_ms(now_ms);
        let minutes = (remaining + 59_999) / 60_000;
        minutes.to_string()
    }
}
