//! Host collaborator contracts.
//!
//! The dispatcher drives three host surfaces it cannot own: the rearmable
//! wake-up timer, the notification sink and the indicator badge. All three
//! are fire-and-forget; hosts without a surface plug in the inert
//! implementations.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Single named, rearmable one-shot timer. Arming replaces any pending
/// timer; two concurrent timers for the same session is a correctness bug.
pub trait WakeTimer: Send + Sync {
    /// Schedule the timer to fire at `at_ms` (epoch ms), replacing any
    /// pending one.
    fn arm(&self, at_ms: i64);
    fn cancel(&self);
}

/// Accepts `(title, message)` fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Displays a short text label; empty text clears it.
pub trait BadgeSink: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Inert timer for one-shot hosts, which settle overdue sessions on the
/// next dispatch instead.
#[derive(Debug, Default)]
pub struct NullTimer;

impl WakeTimer for NullTimer {
    fn arm(&self, _at_ms: i64) {}
    fn cancel(&self) {}
}

#[derive(Debug, Default)]
pub struct NullBadge;

impl BadgeSink for NullBadge {
    fn set_text(&self, _text: &str) {}
}

#[derive(Debug, Default)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn notify(&self, _title: &str, _message: &str) {}
}

/// Notification sink that logs through tracing, for headless hosts.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(title, message, "notification");
    }
}

/// Tokio-backed wake-up timer. Arming aborts the previous task; the fire
/// instant is delivered on the channel handed to [`TokioWakeTimer::new`].
///
/// Must be used from within a tokio runtime.
pub struct TokioWakeTimer {
    fired: mpsc::Sender<i64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl TokioWakeTimer {
    pub fn new(fired: mpsc::Sender<i64>) -> Self {
        Self {
            fired,
            pending: Mutex::new(None),
        }
    }
}

impl WakeTimer for TokioWakeTimer {
    fn arm(&self, at_ms: i64) {
        let mut slot = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
        let fired = self.fired.clone();
        *slot = Some(tokio::spawn(async move {
            let now_ms = chrono::Utc::now().timestamp_millis();
            let delay_ms = (at_ms - now_ms).max(0) as u64;
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            let _ = fired.send(at_ms).await;
        }));
    }

    fn cancel(&self) {
        let mut slot = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
