//! # FocusGuard Core Library
//!
//! Core logic for the FocusGuard focus timer and domain-blocking gate.
//! Front ends (CLI, desktop shells) are thin layers over this library:
//! they forward user intent as commands and poll state for display.
//!
//! ## Architecture
//!
//! - **Session state machine**: wall-clock-based transitions between
//!   idle, running and paused; remaining time is derived from the stored
//!   completion timestamp, never tracked while running
//! - **Blocking gate**: per-navigation decision over the blocklist and the
//!   per-hostname snooze map, enforced only during focus sessions
//! - **Command dispatcher**: the single writer of persisted state,
//!   serialized behind one lock
//! - **Storage**: pluggable key-value store (SQLite-backed or in-memory)
//!   holding five JSON records, plus TOML host configuration
//!
//! ## Key Components
//!
//! - [`Session`]: session record and transition logic
//! - [`Dispatcher`]: command execution, navigation and wake-up handling
//! - [`StateStore`]: injected storage abstraction
//! - [`Config`]: host configuration management

pub mod blocklist;
pub mod dispatcher;
pub mod error;
pub mod hooks;
pub mod policy;
pub mod records;
pub mod session;
pub mod storage;

pub use dispatcher::{Command, CompleteTrigger, Dispatcher, Response};
pub use error::{ConfigError, CoreError, StoreError};
pub use hooks::{BadgeSink, NotificationSink, WakeTimer};
pub use policy::Verdict;
pub use records::{BypassMap, Settings, SettingsPatch, Stats};
pub use session::{Session, SessionKind};
pub use storage::{Config, MemoryStore, SqliteStore, StateStore};
