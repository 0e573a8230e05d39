//! End-to-end flows through the dispatcher against an in-memory store.

use std::sync::{Arc, Mutex};

use focusguard_core::dispatcher::{Command, Response};
use focusguard_core::hooks::{NotificationSink, NullBadge, WakeTimer};
use focusguard_core::policy::TOP_FRAME;
use focusguard_core::records::SettingsPatch;
use focusguard_core::{Dispatcher, MemoryStore, SessionKind};

const T0: i64 = 1_750_000_000_000;
const MINUTE: i64 = 60_000;

#[derive(Clone, Default)]
struct Notifications(Arc<Mutex<Vec<(String, String)>>>);

impl NotificationSink for Notifications {
    fn notify(&self, title: &str, message: &str) {
        self.0.lock().unwrap().push((title.into(), message.into()));
    }
}

/// Records every armed fire time, standing in for the host alarm service.
#[derive(Clone, Default)]
struct ArmedTimes(Arc<Mutex<Vec<Option<i64>>>>);

impl WakeTimer for ArmedTimes {
    fn arm(&self, at_ms: i64) {
        self.0.lock().unwrap().push(Some(at_ms));
    }
    fn cancel(&self) {
        self.0.lock().unwrap().push(None);
    }
}

fn harness() -> (
    Dispatcher<MemoryStore>,
    Arc<Mutex<Vec<(String, String)>>>,
    Arc<Mutex<Vec<Option<i64>>>>,
) {
    let notifications = Notifications::default();
    let timer = ArmedTimes::default();
    let notes = notifications.0.clone();
    let armed = timer.0.clone();
    let dispatcher = Dispatcher::with_hooks(
        MemoryStore::new(),
        Box::new(timer),
        Box::new(notifications),
        Box::new(NullBadge),
    );
    dispatcher.initialize();
    (dispatcher, notes, armed)
}

fn state(d: &Dispatcher<MemoryStore>, now_ms: i64) -> (bool, SessionKind, i64, u64) {
    match d.dispatch_at(Command::GetState, now_ms) {
        Response::State {
            session,
            remaining,
            stats,
            ..
        } => (session.active, session.kind, remaining, stats.completed_focus),
        other => panic!("expected state response, got {other:?}"),
    }
}

#[test]
fn focus_session_runs_to_completion() {
    let (d, notes, armed) = harness();

    d.dispatch_at(
        Command::Start {
            minutes: 25,
            task: "write docs".into(),
        },
        T0,
    );
    assert_eq!(armed.lock().unwrap().last(), Some(&Some(T0 + 25 * MINUTE)));

    let (active, kind, remaining, completed) = state(&d, T0);
    assert!(active);
    assert_eq!(kind, SessionKind::Focus);
    assert_eq!(remaining, 25 * MINUTE);
    assert_eq!(completed, 0);

    // The wake-up timer fires after the simulated 25 minutes.
    d.on_wake_at(T0 + 25 * MINUTE);

    let (active, kind, remaining, completed) = state(&d, T0 + 25 * MINUTE);
    assert!(!active);
    assert_eq!(kind, SessionKind::Idle);
    assert_eq!(remaining, 0);
    assert_eq!(completed, 1);

    let notes = notes.lock().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, "Focus session complete 🎉");
    assert_eq!(notes[0].1, "Time for a break!");
}

#[test]
fn auto_start_break_chains_focus_into_break() {
    let (d, notes, armed) = harness();
    d.dispatch_at(
        Command::SaveSettings {
            settings: SettingsPatch {
                auto_start_break: Some(true),
                break_minutes: Some(10),
                ..Default::default()
            },
        },
        T0,
    );
    d.dispatch_at(Command::Start { minutes: 25, task: String::new() }, T0);
    d.on_wake_at(T0 + 25 * MINUTE);

    let (active, kind, remaining, completed) = state(&d, T0 + 25 * MINUTE);
    assert!(active);
    assert_eq!(kind, SessionKind::Break);
    assert_eq!(remaining, 10 * MINUTE);
    assert_eq!(completed, 1);
    assert_eq!(notes.lock().unwrap()[0].1, "Starting your break now.");
    // The break re-armed the timer at its own completion time.
    assert_eq!(
        armed.lock().unwrap().last(),
        Some(&Some(T0 + 35 * MINUTE))
    );

    d.on_wake_at(T0 + 35 * MINUTE);
    let (active, kind, _, completed) = state(&d, T0 + 35 * MINUTE);
    assert!(!active);
    assert_eq!(kind, SessionKind::Idle);
    assert_eq!(completed, 1);
    assert_eq!(notes.lock().unwrap()[1].0, "Break ended ⏰");
}

#[test]
fn bypass_precedence_pauses_instead_of_redirecting() {
    let (d, _, _) = harness();
    d.dispatch_at(
        Command::AddDomain {
            domain: "youtube.com".into(),
        },
        T0,
    );
    d.dispatch_at(Command::Start { minutes: 25, task: String::new() }, T0);
    d.dispatch_at(
        Command::Snooze {
            hostname: "youtube.com".into(),
            minutes: 5,
        },
        T0 + MINUTE,
    );

    let redirect = d.on_navigation_at(
        3,
        TOP_FRAME,
        "https://youtube.com/feed",
        "focusguard://blocked",
        T0 + 2 * MINUTE,
    );
    assert!(redirect.is_none(), "snoozed domain must never redirect");

    match d.dispatch_at(Command::GetState, T0 + 2 * MINUTE) {
        Response::State { session, remaining, .. } => {
            assert!(session.active && session.paused);
            assert_eq!(remaining, 23 * MINUTE);
        }
        other => panic!("expected state response, got {other:?}"),
    }

    // Once the snooze expires the same navigation is blocked again; the
    // session stays paused (stepping away does not auto-resume), and a
    // paused focus session still gates navigation.
    let redirect = d.on_navigation_at(
        3,
        TOP_FRAME,
        "https://youtube.com/feed",
        "focusguard://blocked",
        T0 + 10 * MINUTE,
    );
    assert!(redirect.is_some(), "expired snooze no longer exempts");

    match d.dispatch_at(Command::GetState, T0 + 10 * MINUTE) {
        Response::State { session, .. } => assert!(session.paused),
        other => panic!("expected state response, got {other:?}"),
    }
}

#[test]
fn blocked_navigation_during_focus_redirects() {
    let (d, _, _) = harness();
    d.dispatch_at(
        Command::AddDomain {
            domain: "reddit.com".into(),
        },
        T0,
    );
    d.dispatch_at(Command::Start { minutes: 25, task: String::new() }, T0);

    let redirect = d
        .on_navigation_at(
            1,
            TOP_FRAME,
            "https://old.reddit.com/r/rust",
            "focusguard://blocked",
            T0 + MINUTE,
        )
        .expect("blocklisted subdomain redirects");
    assert!(redirect.starts_with("focusguard://blocked?url="));

    // Outside a focus session the same navigation is allowed.
    d.dispatch_at(Command::Cancel, T0 + 2 * MINUTE);
    let redirect = d.on_navigation_at(
        1,
        TOP_FRAME,
        "https://old.reddit.com/r/rust",
        "focusguard://blocked",
        T0 + 3 * MINUTE,
    );
    assert!(redirect.is_none());
}

#[test]
fn pause_resume_and_restart_semantics() {
    let (d, _, armed) = harness();
    d.dispatch_at(Command::Start { minutes: 25, task: String::new() }, T0);
    d.dispatch_at(Command::Pause, T0 + 5 * MINUTE);
    // Pausing cancels the pending wake-up.
    assert_eq!(armed.lock().unwrap().last(), Some(&None));

    d.dispatch_at(Command::Resume, T0 + 50 * MINUTE);
    let (_, _, remaining, _) = state(&d, T0 + 50 * MINUTE);
    assert_eq!(remaining, 20 * MINUTE);
    assert_eq!(
        armed.lock().unwrap().last(),
        Some(&Some(T0 + 70 * MINUTE))
    );

    // Starting again is an explicit restart, not an idempotent retry.
    d.dispatch_at(Command::Start { minutes: 25, task: String::new() }, T0 + 51 * MINUTE);
    let (_, _, remaining, _) = state(&d, T0 + 51 * MINUTE);
    assert_eq!(remaining, 25 * MINUTE);
}
