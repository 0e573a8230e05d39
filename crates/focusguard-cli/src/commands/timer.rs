use std::io::{self, Write};
use std::time::Duration;

use clap::Subcommand;
use focusguard_core::dispatcher::{Command, Response};
use focusguard_core::hooks::{BadgeSink, TokioWakeTimer};
use focusguard_core::records::Settings;
use focusguard_core::storage::Config;
use focusguard_core::{Dispatcher, SqliteStore, StateStore};
use tracing::debug;

use crate::common::{notifier, open_dispatcher, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session
    Start {
        /// Session length; defaults to the stored focus minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// Free-text label for the session
        #[arg(long, default_value = "")]
        task: String,
    },
    /// Start a break
    Break {
        /// Break length; defaults to the stored break minutes
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Freeze the countdown
    Pause,
    /// Continue a paused session
    Resume,
    /// End the session now
    Cancel,
    /// Print current state as JSON
    Status,
    /// Live countdown until the session ends
    Watch,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    if let TimerAction::Watch = action {
        return watch();
    }

    let config = Config::load_or_default();
    let dispatcher = open_dispatcher(&config)?;
    match action {
        TimerAction::Start { minutes, task } => {
            let minutes = minutes.unwrap_or_else(|| stored_settings(&dispatcher).focus_minutes);
            dispatcher.dispatch(Command::Start { minutes, task });
        }
        TimerAction::Break { minutes } => {
            let minutes = minutes.unwrap_or_else(|| stored_settings(&dispatcher).break_minutes);
            dispatcher.dispatch(Command::StartBreak { minutes });
        }
        TimerAction::Pause => {
            dispatcher.dispatch(Command::Pause);
        }
        TimerAction::Resume => {
            dispatcher.dispatch(Command::Resume);
        }
        TimerAction::Cancel => {
            dispatcher.dispatch(Command::Cancel);
        }
        TimerAction::Status | TimerAction::Watch => {}
    }

    print_json(&dispatcher.dispatch(Command::GetState))
}

fn stored_settings<S: StateStore>(dispatcher: &Dispatcher<S>) -> Settings {
    match dispatcher.dispatch(Command::GetSettings) {
        Response::Settings { settings } => settings,
        _ => Settings::default(),
    }
}

/// Badge surface for a terminal host; the label lands in the log stream.
struct TermBadge;

impl BadgeSink for TermBadge {
    fn set_text(&self, text: &str) {
        debug!(badge = text, "badge updated");
    }
}

/// Poll state on the configured cadence and let the wake-up timer drive
/// completion, until the session goes idle.
fn watch() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async move {
        let (fired, mut wakeups) = tokio::sync::mpsc::channel(4);
        let store = SqliteStore::open()?;
        let dispatcher = Dispatcher::with_hooks(
            store,
            Box::new(TokioWakeTimer::new(fired)),
            notifier(&config),
            Box::new(TermBadge),
        );
        dispatcher.initialize();
        dispatcher.rearm();

        let mut countdown = tokio::time::interval(Duration::from_secs(
            config.display.countdown_refresh_secs.max(1),
        ));
        let mut badge = tokio::time::interval(Duration::from_secs(
            config.display.badge_refresh_secs.max(1),
        ));

        loop {
            tokio::select! {
                _ = countdown.tick() => {
                    let Response::State { session, remaining, .. } =
                        dispatcher.dispatch(Command::GetState)
                    else {
                        continue;
                    };
                    if !session.active {
                        println!("session idle");
                        break;
                    }
                    let label = if session.paused { "paused" } else { "running" };
                    print!("\r{label:<8} {}  ", fmt_mmss(remaining));
                    io::stdout().flush().ok();
                }
                _ = badge.tick() => dispatcher.refresh_badge(),
                Some(_) = wakeups.recv() => dispatcher.on_wake(),
            }
        }
        Ok(())
    })
}

/// MM:SS, clamped at zero.
fn fmt_mmss(ms: i64) -> String {
    let total = ms.max(0) / 1000;
    format!("{:02}:{:02}", total / 60, total % 60)
}
