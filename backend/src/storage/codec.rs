//! # Persistence Codec
//!
//! Durable round-trip of the trip collection and the standalone checklist
//! template to a [`KeyValueStore`].
//!
//! Both values are encoded as JSON arrays under fixed keys:
//!
//! ```text
//! savedTrips      -> [Trip, ...]
//! globalChecklist -> [ChecklistItem, ...]
//! ```
//!
//! Field names are camelCase and every field added after the first release
//! is `#[serde(default)]`, so older payloads keep decoding.
//!
//! Loads never fail: a missing or undecodable value falls back to an empty
//! trip list or the default checklist. Saves report their errors and leave
//! it to the caller whether to ignore them.

use log::{debug, warn};
use shared::{ChecklistItem, Trip};

use crate::storage::traits::KeyValueStore;

pub const TRIPS_KEY: &str = "savedTrips";
pub const CHECKLIST_KEY: &str = "globalChecklist";

/// Names of the checklist used when none has been saved yet
pub const DEFAULT_CHECKLIST_NAMES: [&str; 5] = ["Rod", "Tackle", "Baits", "Clothes", "Food"];

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to decode {key}: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage failure for {key}: {source}")]
    Storage {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// The default checklist template, all items incomplete
pub fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CHECKLIST_NAMES.iter().map(ChecklistItem::new).collect()
}

#[derive(Clone)]
pub struct PersistenceCodec<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceCodec<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store, shared with other repositories
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize and flush the whole trip collection
    pub fn save_trips(&self, trips: &[Trip]) -> Result<(), PersistenceError> {
        self.save(TRIPS_KEY, trips)?;
        debug!("Persisted {} trips", trips.len());
        Ok(())
    }

    /// Load the trip collection, `None` if nothing was ever saved
    pub fn try_load_trips(&self) -> Result<Option<Vec<Trip>>, PersistenceError> {
        self.load(TRIPS_KEY)
    }

    /// Load the trip collection, falling back to empty on a missing or corrupt value
    pub fn load_trips(&self) -> Vec<Trip> {
        match self.try_load_trips() {
            Ok(Some(trips)) => trips,
            Ok(None) => {
                debug!("No saved trips found, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("{}. Starting with an empty trip list.", e);
                Vec::new()
            }
        }
    }

    pub fn clear_trips(&self) -> Result<(), PersistenceError> {
        self.remove(TRIPS_KEY)
    }

    pub fn save_checklist(&self, items: &[ChecklistItem]) -> Result<(), PersistenceError> {
        self.save(CHECKLIST_KEY, items)?;
        debug!("Persisted checklist template with {} items", items.len());
        Ok(())
    }

    pub fn try_load_checklist(&self) -> Result<Option<Vec<ChecklistItem>>, PersistenceError> {
        self.load(CHECKLIST_KEY)
    }

    /// Load the checklist template, falling back to the default on a missing or corrupt value
    pub fn load_checklist(&self) -> Vec<ChecklistItem> {
        match self.try_load_checklist() {
            Ok(Some(items)) => items,
            Ok(None) => {
                debug!("No saved checklist found, using default template");
                default_checklist()
            }
            Err(e) => {
                warn!("{}. Using default checklist template.", e);
                default_checklist()
            }
        }
    }

    pub fn clear_checklist(&self) -> Result<(), PersistenceError> {
        self.remove(CHECKLIST_KEY)
    }

    fn save<T: serde::Serialize + ?Sized>(
        &self,
        key: &'static str,
        value: &T,
    ) -> Result<(), PersistenceError> {
        let bytes =
            serde_json::to_vec(value).map_err(|source| PersistenceError::Encode { key, source })?;
        self.store
            .set(key, &bytes)
            .map_err(|source| PersistenceError::Storage { key, source })
    }

    fn load<T: serde::de::DeserializeOwned>(
        &self,
        key: &'static str,
    ) -> Result<Option<T>, PersistenceError> {
        let bytes = self
            .store
            .get(key)
            .map_err(|source| PersistenceError::Storage { key, source })?;

        match bytes {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| PersistenceError::Decode { key, source }),
            None => Ok(None),
        }
    }

    fn remove(&self, key: &'static str) -> Result<(), PersistenceError> {
        self.store
            .remove(key)
            .map_err(|source| PersistenceError::Storage { key, source })
    }
}
