//! Command dispatcher: the single writer of persisted state.
//!
//! Front ends send tagged command messages and receive the matching
//! response shape; navigation events and the wake-up timer enter through
//! [`Dispatcher::on_navigation`] and [`Dispatcher::on_wake`]. Every entry
//! point serializes behind one lock, so no two mutations interleave.
//!
//! Commands never fail outward: malformed input no-ops, missing records
//! become defaults, store failures are logged and absorbed.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::blocklist;
use crate::hooks::{BadgeSink, NotificationSink, NullBadge, NullNotifier, NullTimer, WakeTimer};
use crate::policy::{self, Verdict, TOP_FRAME};
use crate::records::{BypassMap, Settings, SettingsPatch, Stats};
use crate::records;
use crate::session::{Session, SessionKind};
use crate::storage::store::{keys, read_record, write_record, StateStore};

/// What fired a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteTrigger {
    Alarm,
    Manual,
}

/// Command messages as the front ends send them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Command {
    GetState,
    Start {
        minutes: u32,
        #[serde(default)]
        task: String,
    },
    StartBreak {
        minutes: u32,
    },
    Pause,
    Resume,
    Cancel,
    GetSettings,
    SaveSettings {
        settings: SettingsPatch,
    },
    GetBlocklist,
    AddDomain {
        domain: String,
    },
    RemoveDomain {
        domain: String,
    },
    Snooze {
        hostname: String,
        minutes: u32,
    },
}

/// Response shapes, serialized without a tag so each matches the wire
/// layout its command expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    State {
        session: Session,
        remaining: i64,
        stats: Stats,
        settings: Settings,
    },
    Snoozed {
        ok: bool,
        until: i64,
    },
    Settings {
        settings: Settings,
    },
    Blocklist {
        blocklist: Vec<String>,
    },
    Ack {
        ok: bool,
    },
}

pub struct Dispatcher<S> {
    store: Mutex<S>,
    timer: Box<dyn WakeTimer>,
    notifier: Box<dyn NotificationSink>,
    badge: Box<dyn BadgeSink>,
}

impl<S: StateStore> Dispatcher<S> {
    /// Dispatcher with inert host surfaces, for one-shot hosts and tests.
    pub fn new(store: S) -> Self {
        Self::with_hooks(
            store,
            Box::new(NullTimer),
            Box::new(NullNotifier),
            Box::new(NullBadge),
        )
    }

    pub fn with_hooks(
        store: S,
        timer: Box<dyn WakeTimer>,
        notifier: Box<dyn NotificationSink>,
        badge: Box<dyn BadgeSink>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            timer,
            notifier,
            badge,
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, S> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed any missing record with its first-run default.
    pub fn initialize(&self) {
        let store = self.lock_store();
        if matches!(store.get(keys::SETTINGS), Ok(None)) {
            write_record(&*store, keys::SETTINGS, &Settings::default());
        }
        if matches!(store.get(keys::BLOCKLIST), Ok(None)) {
            write_record(&*store, keys::BLOCKLIST, &records::default_blocklist());
        }
        if matches!(store.get(keys::SESSION), Ok(None)) {
            write_record(&*store, keys::SESSION, &Session::idle());
        }
        if matches!(store.get(keys::STATS), Ok(None)) {
            write_record(&*store, keys::STATS, &Stats::default());
        }
        if matches!(store.get(keys::BYPASS), Ok(None)) {
            write_record(&*store, keys::BYPASS, &BypassMap::new());
        }
    }

    pub fn dispatch(&self, command: Command) -> Response {
        self.dispatch_at(command, Utc::now().timestamp_millis())
    }

    /// Execute one command at an explicit clock reading. Hosts pass
    /// wall-clock time through [`Dispatcher::dispatch`]; tests simulate
    /// elapsed time here.
    pub fn dispatch_at(&self, command: Command, now_ms: i64) -> Response {
        let store = self.lock_store();
        self.settle_expired(&*store, now_ms);
        debug!(?command, "dispatch");

        match command {
            Command::GetState => {
                let session: Session = read_record(&*store, keys::SESSION, Session::idle);
                let remaining = session.remaining_ms(now_ms);
                Response::State {
                    remaining,
                    stats: read_record(&*store, keys::STATS, Stats::default),
                    settings: read_record(&*store, keys::SETTINGS, Settings::default),
                    session,
                }
            }
            Command::Start { minutes, task } => {
                self.start_session(&*store, SessionKind::Focus, minutes, task, now_ms);
                Response::Ack { ok: true }
            }
            Command::StartBreak { minutes } => {
                self.start_session(&*store, SessionKind::Break, minutes, String::new(), now_ms);
                Response::Ack { ok: true }
            }
            Command::Pause => {
                self.pause_session(&*store, now_ms);
                Response::Ack { ok: true }
            }
            Command::Resume => {
                self.resume_session(&*store, now_ms);
                Response::Ack { ok: true }
            }
            Command::Cancel => {
                self.end_session(&*store, CompleteTrigger::Manual, now_ms);
                Response::Ack { ok: true }
            }
            Command::GetSettings => Response::Settings {
                settings: read_record(&*store, keys::SETTINGS, Settings::default),
            },
            Command::SaveSettings { settings: patch } => {
                let mut settings: Settings =
                    read_record(&*store, keys::SETTINGS, Settings::default);
                settings.apply(&patch);
                write_record(&*store, keys::SETTINGS, &settings);
                Response::Ack { ok: true }
            }
            Command::GetBlocklist => Response::Blocklist {
                blocklist: read_record(&*store, keys::BLOCKLIST, Vec::new),
            },
            Command::AddDomain { domain } => {
                let mut list: Vec<String> = read_record(&*store, keys::BLOCKLIST, Vec::new);
                if blocklist::insert(&mut list, &domain) {
                    write_record(&*store, keys::BLOCKLIST, &list);
                }
                Response::Blocklist { blocklist: list }
            }
            Command::RemoveDomain { domain } => {
                let mut list: Vec<String> = read_record(&*store, keys::BLOCKLIST, Vec::new);
                if blocklist::remove(&mut list, &domain) {
                    write_record(&*store, keys::BLOCKLIST, &list);
                }
                Response::Blocklist { blocklist: list }
            }
            Command::Snooze { hostname, minutes } => {
                let until = now_ms + i64::from(minutes.max(1)) * 60_000;
                let mut bypass: BypassMap = read_record(&*store, keys::BYPASS, BypassMap::new);
                bypass.insert(hostname.clone(), until);
                write_record(&*store, keys::BYPASS, &bypass);
                info!(%hostname, until, "snoozed");
                Response::Snoozed { ok: true, until }
            }
        }
    }

    /// Wake-up timer handler: the only mutator besides command dispatch
    /// and navigation.
    pub fn on_wake(&self) {
        self.on_wake_at(Utc::now().timestamp_millis());
    }

    pub fn on_wake_at(&self, now_ms: i64) {
        let store = self.lock_store();
        let session: Session = read_record(&*store, keys::SESSION, Session::idle);
        if session.is_due(now_ms) {
            self.end_session(&*store, CompleteTrigger::Alarm, now_ms);
        }
    }

    /// Navigation observer entry point. Returns the interstitial URL when
    /// the navigating tab must be redirected; `None` lets it proceed.
    pub fn on_navigation(
        &self,
        tab_id: u32,
        frame_id: u32,
        url: &str,
        interstitial_base: &str,
    ) -> Option<String> {
        self.on_navigation_at(
            tab_id,
            frame_id,
            url,
            interstitial_base,
            Utc::now().timestamp_millis(),
        )
    }

    pub fn on_navigation_at(
        &self,
        tab_id: u32,
        frame_id: u32,
        url: &str,
        interstitial_base: &str,
        now_ms: i64,
    ) -> Option<String> {
        if frame_id != TOP_FRAME {
            return None;
        }
        let store = self.lock_store();
        self.settle_expired(&*store, now_ms);

        let session: Session = read_record(&*store, keys::SESSION, Session::idle);
        let list: Vec<String> = read_record(&*store, keys::BLOCKLIST, Vec::new);
        let bypass: BypassMap = read_record(&*store, keys::BYPASS, BypassMap::new);

        match policy::evaluate(url, &session, &list, &bypass, now_ms) {
            Verdict::Allow => None,
            Verdict::AllowAndPause => {
                info!(tab_id, url, "snoozed destination, pausing session");
                self.pause_session(&*store, now_ms);
                None
            }
            Verdict::Block => {
                info!(tab_id, url, "navigation blocked");
                Some(policy::interstitial_url(interstitial_base, url))
            }
        }
    }

    /// Periodic indicator refresh, driven by the host's poll loop.
    pub fn refresh_badge(&self) {
        self.refresh_badge_at(Utc::now().timestamp_millis());
    }

    pub fn refresh_badge_at(&self, now_ms: i64) {
        let store = self.lock_store();
        let session: Session = read_record(&*store, keys::SESSION, Session::idle);
        self.badge.set_text(&session.badge_text(now_ms));
    }

    /// Re-arm the wake-up timer from the persisted session, for hosts that
    /// attach to an already-running session.
    pub fn rearm(&self) {
        let store = self.lock_store();
        let session: Session = read_record(&*store, keys::SESSION, Session::idle);
        if session.is_running() {
            self.timer.arm(session.end_time);
        }
    }

    // ── Session operations ───────────────────────────────────────────

    /// A host without a live timer service completes overdue sessions on
    /// the next entry, equivalent to the wake-up timer firing late.
    fn settle_expired(&self, store: &S, now_ms: i64) {
        let session: Session = read_record(store, keys::SESSION, Session::idle);
        if session.is_due(now_ms) {
            self.end_session(store, CompleteTrigger::Alarm, now_ms);
        }
    }

    fn start_session(&self, store: &S, kind: SessionKind, minutes: u32, task: String, now_ms: i64) {
        let session = Session::start(kind, minutes, task, now_ms);
        write_record(store, keys::SESSION, &session);
        self.badge.set_text(&session.badge_text(now_ms));
        self.timer.cancel();
        self.timer.arm(session.end_time);
        info!(?kind, minutes, "session started");
    }

    fn pause_session(&self, store: &S, now_ms: i64) {
        let mut session: Session = read_record(store, keys::SESSION, Session::idle);
        if session.pause(now_ms) {
            write_record(store, keys::SESSION, &session);
            self.timer.cancel();
            self.badge.set_text(&session.badge_text(now_ms));
            info!(remaining_ms = session.remaining, "session paused");
        }
    }

    fn resume_session(&self, store: &S, now_ms: i64) {
        let mut session: Session = read_record(store, keys::SESSION, Session::idle);
        if session.resume(now_ms) {
            write_record(store, keys::SESSION, &session);
            self.timer.cancel();
            self.timer.arm(session.end_time);
            self.badge.set_text(&session.badge_text(now_ms));
            info!(end_time = session.end_time, "session resumed");
        }
    }

    fn end_session(&self, store: &S, trigger: CompleteTrigger, now_ms: i64) {
        let session: Session = read_record(store, keys::SESSION, Session::idle);
        if !session.active {
            return;
        }
        let settings: Settings = read_record(store, keys::SETTINGS, Settings::default);

        match session.kind {
            SessionKind::Focus => {
                let mut stats: Stats = read_record(store, keys::STATS, Stats::default);
                stats.completed_focus += 1;
                write_record(store, keys::STATS, &stats);
                let message = if settings.auto_start_break {
                    "Starting your break now."
                } else {
                    "Time for a break!"
                };
                self.notifier.notify("Focus session complete 🎉", message);
                info!(?trigger, completed_focus = stats.completed_focus, "focus session ended");
                if settings.auto_start_break {
                    self.start_session(
                        store,
                        SessionKind::Break,
                        settings.break_minutes,
                        String::new(),
                        now_ms,
                    );
                    return;
                }
            }
            SessionKind::Break => {
                self.notifier
                    .notify("Break ended ⏰", "Ready for another focus sprint?");
                info!(?trigger, "break ended");
            }
            SessionKind::Idle => {}
        }

        write_record(store, keys::SESSION, &Session::idle());
        self.badge.set_text("");
        self.timer.cancel();
    }
}
