use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{ApiConfig, Topic};
use crate::storage::LocalStorage;

pub const API_CONFIG_KEY: &str = "topicGeneratorApiConfig";
pub const FAVORITES_KEY: &str = "topicGeneratorFavorites";

/// Read and decode a record. Missing, unreadable and unparsable records all come
/// back as `None`; the cause is logged.
fn read_record<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!("Failed to read saved record '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("Failed to parse saved record '{}': {}", key, e);
            None
        }
    }
}

fn write_record<T: Serialize + ?Sized>(storage: &dyn LocalStorage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    storage.set_item(key, &json)
}

/// Persisted API configuration
pub struct ConfigStore {
    storage: Arc<dyn LocalStorage>,
    defaults: ApiConfig,
}

impl ConfigStore {
    pub fn new(storage: Arc<dyn LocalStorage>, defaults: ApiConfig) -> Self {
        Self { storage, defaults }
    }

    /// Saved config, or the defaults when nothing usable is stored
    pub fn load(&self) -> ApiConfig {
        read_record(self.storage.as_ref(), API_CONFIG_KEY).unwrap_or_else(|| {
            tracing::debug!("No saved API config - using defaults");
            self.defaults.clone()
        })
    }

    /// Overwrites the saved record; the config is not validated
    pub fn save(&self, config: &ApiConfig) -> Result<()> {
        write_record(self.storage.as_ref(), API_CONFIG_KEY, config)?;
        tracing::info!("Saved API config for model {}", config.model);
        Ok(())
    }
}

/// Persisted favorites list
pub struct FavoritesStore {
    storage: Arc<dyn LocalStorage>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Vec<Topic> {
        read_record(self.storage.as_ref(), FAVORITES_KEY).unwrap_or_default()
    }

    /// Mirror the in-memory favorites. An empty list clears the record so that
    /// removing the last favorite is remembered across restarts.
    pub fn persist(&self, favorites: &[Topic]) -> Result<()> {
        if favorites.is_empty() {
            return self.storage.remove_item(FAVORITES_KEY);
        }
        write_record(self.storage.as_ref(), FAVORITES_KEY, favorites)
    }
}
