//! # Fishing Trip Planner Backend
//!
//! Contains all non-UI logic for the fishing trip planner.
//!
//! - **Domain**: the trip store, checklist template, calendar grid, export and reset
//! - **Storage**: the key-value persistence layer underneath the domain
//! - **Config**: where data lives and how persistence failures are treated
//!
//! ## Architecture
//!
//! ```text
//! Presentation (screens, widgets)
//!     ↓  calls mutations / reads snapshots, subscribes to changes
//! Domain (TripStore, ChecklistService, CalendarService, ExportService, ResetService)
//!     ↓
//! Storage (PersistenceCodec, PreferencesRepository)
//!     ↓
//! KeyValueStore (files on disk, or memory in tests)
//! ```
//!
//! On launch the codec loads saved trips into the store; after that the store
//! is the single source of truth and flushes on every mutation.

pub mod config;
pub mod domain;
pub mod storage;

use anyhow::Result;
use log::info;

use crate::config::PlannerConfig;
use crate::domain::{CalendarService, ChecklistService, ExportService, ResetService, TripStore};
use crate::storage::{FileKeyValueStore, KeyValueStore, PersistenceCodec, PreferencesRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState<S: KeyValueStore> {
    pub trip_store: TripStore<S>,
    pub checklist_service: ChecklistService<S>,
    pub calendar_service: CalendarService,
    pub export_service: ExportService,
    pub preferences: PreferencesRepository<S>,
    pub reset_service: ResetService<S>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Wire up every service over one key-value store
    pub fn new(store: S, config: &PlannerConfig) -> Self {
        let codec = PersistenceCodec::new(store.clone());
        let trip_store = TripStore::load(codec.clone(), config.persistence_policy);
        let checklist_service = ChecklistService::load(codec, config.persistence_policy);
        let preferences = PreferencesRepository::new(store);
        let reset_service = ResetService::new(
            trip_store.clone(),
            checklist_service.clone(),
            preferences.clone(),
        );

        Self {
            trip_store,
            checklist_service,
            calendar_service: CalendarService::new(),
            export_service: ExportService::new(),
            preferences,
            reset_service,
        }
    }
}

/// Initialize the backend over the file store in the configured data directory
pub fn initialize_backend(config: &PlannerConfig) -> Result<AppState<FileKeyValueStore>> {
    info!("Setting up storage in {}", config.data_directory.display());
    let store = FileKeyValueStore::new(&config.data_directory)?;

    info!("Setting up domain services");
    Ok(AppState::new(store, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::calendar::CalendarMonthQuery;
    use crate::domain::commands::trips::CreateTripCommand;
    use crate::domain::PersistencePolicy;
    use crate::storage::test_utils::ymd;
    use shared::FishingType;
    use tempfile::TempDir;

    fn create(name: &str, date: chrono::NaiveDate) -> shared::Trip {
        CreateTripCommand {
            name: name.to_string(),
            location: "Mirror Lake".to_string(),
            date,
            fishing_type: FishingType::Shore,
            target_fish: None,
            notes: None,
            use_template: false,
        }
        .into_trip()
        .unwrap()
    }

    #[test]
    fn test_state_survives_relaunch() {
        let dir = TempDir::new().unwrap();
        let config = PlannerConfig::from_directory(dir.path()).unwrap();

        let state = initialize_backend(&config).unwrap();
        let trip = create("Opening day", ymd(2025, 4, 26));
        state.trip_store.save_trip(trip.clone()).unwrap();
        state.checklist_service.add_item("Waders").unwrap();

        let relaunched = initialize_backend(&config).unwrap();
        assert_eq!(relaunched.trip_store.trips(), vec![trip]);
        assert_eq!(relaunched.checklist_service.items().len(), 6);
    }

    #[test]
    fn test_march_calendar_counts_only_pending_trip() {
        let dir = TempDir::new().unwrap();
        let config = PlannerConfig {
            data_directory: dir.path().to_path_buf(),
            persistence_policy: PersistencePolicy::Strict,
        };
        let state = initialize_backend(&config).unwrap();

        let pending = create("Pending", ymd(2025, 3, 8));
        let done_a = create("Done A", ymd(2025, 3, 15));
        let done_b = create("Done B", ymd(2025, 3, 22));
        for trip in [&pending, &done_a, &done_b] {
            state.trip_store.save_trip(trip.clone()).unwrap();
        }
        state.trip_store.mark_completed(done_a.id).unwrap();
        state.trip_store.mark_completed(done_b.id).unwrap();

        let query = CalendarMonthQuery {
            month: 3,
            year: 2025,
            today: ymd(2025, 3, 1),
            selected: None,
        };
        let calendar = state
            .calendar_service
            .generate_calendar_month(&query, &state.trip_store.trips())
            .unwrap();

        assert_eq!(calendar.day(pending.date).unwrap().trip_count, 1);
        assert_eq!(calendar.day(done_a.date).unwrap().trip_count, 0);
        assert_eq!(calendar.day(done_b.date).unwrap().trip_count, 0);
    }

    #[test]
    fn test_fresh_install_has_default_checklist() {
        let dir = TempDir::new().unwrap();
        let config = PlannerConfig::from_directory(dir.path()).unwrap();
        let state = initialize_backend(&config).unwrap();

        let names: Vec<String> = state.checklist_service.items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Rod", "Tackle", "Baits", "Clothes", "Food"]);
        assert!(state.trip_store.is_empty());
    }
}
