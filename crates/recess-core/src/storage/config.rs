//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Daily work budget, countdown length, rerolls, "ending soon" threshold
//! - Reward ladder (interval, maximum, offer count)
//! - Notification toggle
//!
//! Configuration is stored at `~/.config/recess/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::reward::{MAX_REWARD_TIME, REWARD_OFFER_COUNT, REWARD_TIME_INTERVAL};
use crate::timer::{
    TimerSettings, DEFAULT_FOCUS_SESSION_COUNTDOWN_TIME, DEFAULT_REROLLS,
    DEFAULT_WORK_SESSION_DURATION, NOTIFY_TIME_LEFT_SECONDS,
};

/// Timer-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_daily_work_minutes")]
    pub daily_work_minutes: u64,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
    #[serde(default = "default_rerolls")]
    pub rerolls: u32,
    #[serde(default = "default_ending_soon_secs")]
    pub ending_soon_secs: u64,
}

/// Reward ladder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
    #[serde(default = "default_offer_count")]
    pub offer_count: usize,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/recess/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_daily_work_minutes() -> u64 {
    DEFAULT_WORK_SESSION_DURATION / 60
}
fn default_countdown_secs() -> u64 {
    DEFAULT_FOCUS_SESSION_COUNTDOWN_TIME
}
fn default_rerolls() -> u32 {
    DEFAULT_REROLLS
}
fn default_ending_soon_secs() -> u64 {
    NOTIFY_TIME_LEFT_SECONDS
}
fn default_interval_minutes() -> u32 {
    REWARD_TIME_INTERVAL
}
fn default_max_minutes() -> u32 {
    MAX_REWARD_TIME
}
fn default_offer_count() -> usize {
    REWARD_OFFER_COUNT
}
fn default_true() -> bool {
    true
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            daily_work_minutes: default_daily_work_minutes(),
            countdown_secs: default_countdown_secs(),
            rerolls: default_rerolls(),
            ending_soon_secs: default_ending_soon_secs(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            max_minutes: default_max_minutes(),
            offer_count: default_offer_count(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot replace a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without touching disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value has the wrong type,
    /// or the reward offer would hold more than [`REWARD_OFFER_COUNT`] items.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        if !(1..=REWARD_OFFER_COUNT).contains(&updated.rewards.offer_count) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("offer count must be between 1 and {REWARD_OFFER_COUNT}"),
            }
            .into());
        }
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }

    /// Project onto the settings consumed by the timer engine.
    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            daily_work_secs: self.timer.daily_work_minutes.saturating_mul(60),
            countdown_secs: self.timer.countdown_secs,
            rerolls: self.timer.rerolls,
            ending_soon_secs: self.timer.ending_soon_secs,
            reward_interval_minutes: self.rewards.interval_minutes,
            reward_max_minutes: self.rewards.max_minutes,
            reward_offer_count: self.rewards.offer_count.min(REWARD_OFFER_COUNT),
        }
    }
}
