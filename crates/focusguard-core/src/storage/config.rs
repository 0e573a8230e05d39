//! TOML-based host configuration.
//!
//! Distinct from the persisted `settings` record: these are per-install
//! knobs for the host process (notification enablement, poll cadence, the
//! interstitial location), stored at `~/.config/focusguard/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Poll cadence for the indicator and countdown displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_badge_refresh")]
    pub badge_refresh_secs: u64,
    #[serde(default = "default_countdown_refresh")]
    pub countdown_refresh_secs: u64,
}

/// Blocking gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockingConfig {
    /// Where blocked navigations are redirected; the original destination
    /// is appended as a query parameter.
    #[serde(default = "default_interstitial_base")]
    pub interstitial_base: String,
    #[serde(default = "default_snooze_minutes")]
    pub default_snooze_minutes: u32,
}

/// Host configuration.
///
/// Serialized to/from TOML at `~/.config/focusguard/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub blocking: BlockingConfig,
}

fn default_true() -> bool {
    true
}
fn default_badge_refresh() -> u64 {
    60
}
fn default_countdown_refresh() -> u64 {
    1
}
fn default_interstitial_base() -> String {
    "focusguard://blocked".into()
}
fn default_snooze_minutes() -> u32 {
    5
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            badge_refresh_secs: default_badge_refresh(),
            countdown_refresh_secs: default_countdown_refresh(),
        }
    }
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            interstitial_base: default_interstitial_base(),
            default_snooze_minutes: default_snooze_minutes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notifications: NotificationsConfig::default(),
            display: DisplayConfig::default(),
            blocking: BlockingConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
