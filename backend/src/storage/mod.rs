//! # Storage Module
//!
//! Handles all data persistence for the trip planner.
//!
//! The domain layer never touches files directly. It talks to a
//! [`PersistenceCodec`] (trips and checklist template) and a
//! [`PreferencesRepository`] (settings flags), both of which sit on top of a
//! [`KeyValueStore`]. Swapping the file-backed store for the in-memory one is
//! how tests run without touching disk.
//!
//! ## Key Layout
//!
//! - `savedTrips`: JSON array of trips
//! - `globalChecklist`: JSON array of checklist items
//! - `isDarkMode`, `tripNotifications`, `autoBackup`: JSON booleans

pub mod codec;
pub mod kv;
pub mod preferences_repository;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use codec::{default_checklist, PersistenceCodec, PersistenceError, CHECKLIST_KEY, TRIPS_KEY};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore};
pub use preferences_repository::{PreferenceFlag, PreferencesRepository};
pub use traits::KeyValueStore;
