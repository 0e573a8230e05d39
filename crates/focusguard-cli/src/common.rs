//! Shared CLI plumbing.

use focusguard_core::hooks::{NotificationSink, NullBadge, NullNotifier, NullTimer, TracingNotifier};
use focusguard_core::storage::Config;
use focusguard_core::{CoreError, Dispatcher, SqliteStore};

/// Open the on-disk store and build a dispatcher with inert host surfaces.
/// One-shot commands settle overdue sessions at dispatch time, so no live
/// wake-up timer is needed here.
pub fn open_dispatcher(config: &Config) -> Result<Dispatcher<SqliteStore>, CoreError> {
    let store = SqliteStore::open()?;
    let dispatcher = Dispatcher::with_hooks(
        store,
        Box::new(NullTimer),
        notifier(config),
        Box::new(NullBadge),
    );
    dispatcher.initialize();
    Ok(dispatcher)
}

/// Notification surface selected by host config.
pub fn notifier(config: &Config) -> Box<dyn NotificationSink> {
    if config.notifications.enabled {
        Box::new(TracingNotifier)
    } else {
        Box::new(NullNotifier)
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
