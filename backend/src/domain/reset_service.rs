//! Reset service: wipes trips, the checklist template, and preference flags.
//!
//! Each clear is independent and idempotent, so all three always run. If any
//! of them fails the first error is returned after the rest have been tried.

use anyhow::Result;
use log::{error, info};

use crate::domain::checklist_service::ChecklistService;
use crate::domain::trip_store::TripStore;
use crate::storage::{KeyValueStore, PreferencesRepository};

#[derive(Clone)]
pub struct ResetService<S: KeyValueStore> {
    trip_store: TripStore<S>,
    checklist_service: ChecklistService<S>,
    preferences: PreferencesRepository<S>,
}

impl<S: KeyValueStore> ResetService<S> {
    pub fn new(
        trip_store: TripStore<S>,
        checklist_service: ChecklistService<S>,
        preferences: PreferencesRepository<S>,
    ) -> Self {
        Self {
            trip_store,
            checklist_service,
            preferences,
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        info!("Resetting all planner data");

        let results = [
            self.trip_store.clear_all().map_err(anyhow::Error::from),
            self.checklist_service.reset().map_err(anyhow::Error::from),
            self.preferences.reset(),
        ];

        let mut first_error = None;
        for result in results {
            if let Err(e) = result {
                error!("Reset step failed: {:#}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("All planner data reset");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip_store::PersistencePolicy;
    use crate::storage::test_utils::{sample_trip, ymd};
    use crate::storage::{InMemoryKeyValueStore, PersistenceCodec, PreferenceFlag, CHECKLIST_KEY};
    use shared::Preferences;

    #[test]
    fn test_reset_all_wipes_everything() {
        let kv = InMemoryKeyValueStore::new();
        let codec = PersistenceCodec::new(kv.clone());
        let trip_store = TripStore::load(codec.clone(), PersistencePolicy::BestEffort);
        let checklist = ChecklistService::load(codec.clone(), PersistencePolicy::BestEffort);
        let preferences = PreferencesRepository::new(kv.clone());

        trip_store.save_trip(sample_trip("A", ymd(2025, 3, 1))).unwrap();
        checklist.add_item("Cooler").unwrap();
        preferences.set(PreferenceFlag::DarkMode, true).unwrap();
        preferences.set(PreferenceFlag::AutoBackup, true).unwrap();

        let service = ResetService::new(trip_store.clone(), checklist.clone(), preferences.clone());
        service.reset_all().unwrap();

        assert!(trip_store.is_empty());
        assert!(codec.load_trips().is_empty());
        assert_eq!(kv.get(CHECKLIST_KEY).unwrap(), None);
        assert_eq!(checklist.items().len(), 5);
        assert_eq!(preferences.load(), Preferences::default());

        // Idempotent
        service.reset_all().unwrap();
        assert!(trip_store.is_empty());
    }
}
