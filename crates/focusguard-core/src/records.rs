//! Persisted records and their first-run defaults.
//!
//! Field names serialize in the camelCase layout the front ends read
//! (`focusMinutes`, `completedFocus`, ...). The session record lives in
//! [`crate::session`]; everything else is a plain mutable record with no
//! transition logic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Timer durations and break behavior. Singleton, mutated via an explicit
/// save command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub auto_start_break: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            auto_start_break: false,
        }
    }
}

/// Partial settings update; unset fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub focus_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
    pub auto_start_break: Option<bool>,
}

impl Settings {
    /// Merge a patch over the stored record.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(focus) = patch.focus_minutes {
            self.focus_minutes = focus;
        }
        if let Some(brk) = patch.break_minutes {
            self.break_minutes = brk;
        }
        if let Some(auto) = patch.auto_start_break {
            self.auto_start_break = auto;
        }
    }
}

/// Completed-focus counter. Monotonically incremented, never decremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub completed_focus: u64,
}

/// Hostname -> absolute expiry timestamp (epoch ms). Entries are logically
/// expired once `now` passes the expiry; they are not eagerly removed.
pub type BypassMap = HashMap<String, i64>;

/// Blocklist seeded on first run. Reads of a missing blocklist yield an
/// empty list, not this seed.
pub fn default_blocklist() -> Vec<String> {
    [
        "youtube.com",
        "facebook.com",
        "twitter.com",
        "instagram.com",
        "reddit.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serialize_with_wire_field_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["focusMinutes"], 25);
        assert_eq!(json["breakMinutes"], 5);
        assert_eq!(json["autoStartBreak"], false);
    }

    #[test]
    fn settings_patch_merges_only_set_fields() {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch {
            focus_minutes: Some(45),
            break_minutes: None,
            auto_start_break: Some(true),
        });
        assert_eq!(settings.focus_minutes, 45);
        assert_eq!(settings.break_minutes, 5);
        assert!(settings.auto_start_break);
    }

    #[test]
    fn settings_tolerate_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"focusMinutes": 50}"#).unwrap();
        assert_eq!(settings.focus_minutes, 50);
        assert_eq!(settings.break_minutes, 5);
    }

    #[test]
    fn stats_default_to_zero() {
        let stats: Stats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.completed_focus, 0);
    }

    #[test]
    fn default_blocklist_has_five_entries() {
        let list = default_blocklist();
        assert_eq!(list.len(), 5);
        assert!(list.contains(&"youtube.com".to_string()));
    }
}
