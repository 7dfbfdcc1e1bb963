//! Persistence adapter.
//!
//! The timer only needs a string key-value store holding JSON documents:
//! one whole-aggregate snapshot plus a couple of auxiliary keys.

mod config;
pub mod database;
mod memory;

pub use config::{Config, NotificationsConfig, RewardsConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};
use crate::reward::SiteSource;

/// Whole timer aggregate.
pub const TIMER_STATE_KEY: &str = "timerState";
/// JSON array of reward site candidates.
pub const SITES_KEY: &str = "blockedSites";
/// Daily work target in minutes.
pub const WORK_TARGET_KEY: &str = "workSessionTarget";

/// Durable string key-value store.
pub trait KvStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).kv_set(key, value)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::rc::Rc<S> {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).kv_set(key, value)
    }
}

/// Read and decode a JSON document. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned, S: KvStore + ?Sized>(store: &S, key: &str) -> Result<Option<T>> {
    match store.kv_get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized, S: KvStore + ?Sized>(store: &S, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.kv_set(key, &json)?;
    Ok(())
}

/// Site list stored under [`SITES_KEY`]. Unreadable lists count as empty.
pub fn load_sites<S: KvStore + ?Sized>(store: &S) -> Vec<String> {
    match load_json::<Vec<String>, S>(store, SITES_KEY) {
        Ok(sites) => sites.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read site list");
            Vec::new()
        }
    }
}

impl SiteSource for Database {
    fn sites(&self) -> Vec<String> {
        load_sites(self)
    }
}

impl SiteSource for MemoryStore {
    fn sites(&self) -> Vec<String> {
        load_sites(self)
    }
}

/// Returns `~/.config/recess[-dev]/` based on RECESS_ENV.
///
/// Set RECESS_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RECESS_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("recess-dev")
    } else {
        base_dir.join("recess")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
