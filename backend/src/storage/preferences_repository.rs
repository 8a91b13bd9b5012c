//! # Preferences Repository
//!
//! Stores the three settings flags, each under its own key, as JSON booleans.
//! The core never reads these; they belong to the settings surface and are
//! only touched here so the reset interface can wipe them.

use anyhow::{Context, Result};
use log::{debug, warn};
use shared::Preferences;

use crate::storage::traits::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceFlag {
    DarkMode,
    TripNotifications,
    AutoBackup,
}

impl PreferenceFlag {
    pub fn all() -> [PreferenceFlag; 3] {
        [
            PreferenceFlag::DarkMode,
            PreferenceFlag::TripNotifications,
            PreferenceFlag::AutoBackup,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            PreferenceFlag::DarkMode => "isDarkMode",
            PreferenceFlag::TripNotifications => "tripNotifications",
            PreferenceFlag::AutoBackup => "autoBackup",
        }
    }
}

#[derive(Clone)]
pub struct PreferencesRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PreferencesRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read one flag; missing or unreadable values read as `false`
    pub fn get(&self, flag: PreferenceFlag) -> bool {
        let bytes = match self.store.get(flag.key()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return false,
            Err(e) => {
                warn!("Failed to read preference {}: {}", flag.key(), e);
                return false;
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring corrupt preference {}: {}", flag.key(), e);
            false
        })
    }

    pub fn set(&self, flag: PreferenceFlag, value: bool) -> Result<()> {
        let bytes = serde_json::to_vec(&value)?;
        self.store
            .set(flag.key(), &bytes)
            .with_context(|| format!("Failed to save preference {}", flag.key()))?;
        debug!("Preference {} set to {}", flag.key(), value);
        Ok(())
    }

    pub fn load(&self) -> Preferences {
        Preferences {
            dark_mode: self.get(PreferenceFlag::DarkMode),
            trip_notifications: self.get(PreferenceFlag::TripNotifications),
            auto_backup: self.get(PreferenceFlag::AutoBackup),
        }
    }

    /// Reset every flag to `false`
    pub fn reset(&self) -> Result<()> {
        for flag in PreferenceFlag::all() {
            self.set(flag, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::InMemoryKeyValueStore;

    #[test]
    fn test_missing_flags_read_false() {
        let repo = PreferencesRepository::new(InMemoryKeyValueStore::new());
        assert_eq!(repo.load(), Preferences::default());
    }

    #[test]
    fn test_flags_are_stored_under_separate_keys() {
        let store = InMemoryKeyValueStore::new();
        let repo = PreferencesRepository::new(store.clone());

        repo.set(PreferenceFlag::DarkMode, true).unwrap();
        repo.set(PreferenceFlag::AutoBackup, true).unwrap();

        assert_eq!(store.get("isDarkMode").unwrap(), Some(b"true".to_vec()));
        assert_eq!(store.get("tripNotifications").unwrap(), None);
        assert_eq!(
            repo.load(),
            Preferences {
                dark_mode: true,
                trip_notifications: false,
                auto_backup: true,
            }
        );
    }

    #[test]
    fn test_corrupt_flag_reads_false() {
        let store = InMemoryKeyValueStore::new();
        store.set("tripNotifications", b"maybe").unwrap();

        let repo = PreferencesRepository::new(store);
        assert!(!repo.get(PreferenceFlag::TripNotifications));
    }

    #[test]
    fn test_reset_clears_all_flags() {
        let repo = PreferencesRepository::new(InMemoryKeyValueStore::new());
        for flag in PreferenceFlag::all() {
            repo.set(flag, true).unwrap();
        }

        repo.reset().unwrap();
        assert_eq!(repo.load(), Preferences::default());
    }
}
