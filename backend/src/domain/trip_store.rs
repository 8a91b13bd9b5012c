//! Trip store domain logic for the fishing trip planner.
//!
//! The [`TripStore`] is the single owner and writer of the trip collection.
//! Every mutation goes through it, is flushed to the [`PersistenceCodec`],
//! and then pushed to registered listeners so presentation code can
//! re-render.
//!
//! ## Business Rules
//!
//! - Trips keep insertion order; updates replace in place, deletes keep the
//!   relative order of everything else
//! - Lookups by id are linear scans; a miss is a silent no-op, reported as
//!   `Ok(false)` / `Ok(0)` rather than an error
//! - Name and location must be non-blank on save and update
//! - Completion is one-way: nothing in the store turns a completed trip back
//!   into a planned one, including a whole-record `update_trip`
//! - Mutations are serialized behind one lock, so find-then-replace is atomic
//!   even when the store handle is shared between threads

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use shared::{ChecklistItem, Trip, TripStats};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::domain::commands::trips::UpdateTripCommand;
use crate::domain::models::trip::{validate_checklist_item_name, validate_trip, TripValidationError};
use crate::storage::{KeyValueStore, PersistenceCodec, PersistenceError};

/// What to do when a flush to durable storage fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Log the failure and carry on; the mutation stays in memory only
    #[default]
    BestEffort,
    /// Report the failure to the caller. The in-memory mutation has
    /// already been applied when the error is returned.
    Strict,
}

#[derive(Debug, thiserror::Error)]
pub enum TripStoreError {
    #[error(transparent)]
    Validation(#[from] TripValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Handle returned by [`TripStore::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&[Trip]) + Send + Sync>;

#[derive(Clone)]
pub struct TripStore<S: KeyValueStore> {
    codec: PersistenceCodec<S>,
    policy: PersistencePolicy,
    trips: Arc<Mutex<Vec<Trip>>>,
    listeners: Arc<Mutex<Vec<(ListenerId, Listener)>>>,
    next_listener_id: Arc<AtomicU64>,
    /// Bumped under the trips lock on every commit
    version: Arc<AtomicU64>,
    /// Version of the last snapshot handed to listeners
    delivered_version: Arc<Mutex<u64>>,
}

impl<S: KeyValueStore> TripStore<S> {
    /// Hydrate a store from whatever the codec has persisted
    pub fn load(codec: PersistenceCodec<S>, policy: PersistencePolicy) -> Self {
        let trips = codec.load_trips();
        info!("Loaded {} trips", trips.len());
        Self::with_trips(codec, policy, trips)
    }

    fn with_trips(codec: PersistenceCodec<S>, policy: PersistencePolicy, trips: Vec<Trip>) -> Self {
        Self {
            codec,
            policy,
            trips: Arc::new(Mutex::new(trips)),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(0)),
            version: Arc::new(AtomicU64::new(0)),
            delivered_version: Arc::new(Mutex::new(0)),
        }
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    // ---- queries ----

    /// Snapshot of the whole collection in store order
    pub fn trips(&self) -> Vec<Trip> {
        self.lock_trips().clone()
    }

    pub fn len(&self) -> usize {
        self.lock_trips().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_trips().is_empty()
    }

    pub fn get_trip(&self, id: Uuid) -> Option<Trip> {
        self.lock_trips().iter().find(|t| t.id == id).cloned()
    }

    /// Incomplete trips on `date`. Completed trips are not calendar-relevant.
    pub fn trips_on(&self, date: NaiveDate) -> Vec<Trip> {
        self.lock_trips()
            .iter()
            .filter(|t| !t.is_completed && t.is_on(date))
            .cloned()
            .collect()
    }

    /// Incomplete trips dated today or later, soonest first
    pub fn upcoming_trips(&self, today: NaiveDate) -> Vec<Trip> {
        let mut upcoming: Vec<Trip> = self
            .lock_trips()
            .iter()
            .filter(|t| !t.is_completed && t.date >= today)
            .cloned()
            .collect();
        upcoming.sort_by_key(|t| t.date);
        upcoming
    }

    /// Completed trips, most recent first
    pub fn completed_trips(&self) -> Vec<Trip> {
        let mut completed: Vec<Trip> = self
            .lock_trips()
            .iter()
            .filter(|t| t.is_completed)
            .cloned()
            .collect();
        completed.sort_by(|a, b| b.date.cmp(&a.date));
        completed
    }

    pub fn stats(&self) -> TripStats {
        let trips = self.lock_trips();
        let completed = trips.iter().filter(|t| t.is_completed).count();
        TripStats {
            total: trips.len(),
            planned: trips.len() - completed,
            completed,
        }
    }

    // ---- trip mutations ----

    /// Append a trip to the end of the collection.
    ///
    /// No duplicate-id check is made; ids come from `Trip::new`.
    pub fn save_trip(&self, trip: Trip) -> Result<(), TripStoreError> {
        validate_trip(&trip)?;
        info!("Saving trip {} ({})", trip.id, trip.name);

        let mut trips = self.lock_trips();
        trips.push(trip);
        self.commit(trips)
    }

    /// Replace the trip with the same id, keeping its position.
    ///
    /// Returns `Ok(false)` without touching anything if no trip has that id.
    /// A completed trip stays completed even if `trip.is_completed` is false.
    pub fn update_trip(&self, mut trip: Trip) -> Result<bool, TripStoreError> {
        validate_trip(&trip)?;

        let mut trips = self.lock_trips();
        let Some(index) = trips.iter().position(|t| t.id == trip.id) else {
            debug!("update_trip: no trip with id {}", trip.id);
            return Ok(false);
        };

        if trips[index].is_completed && !trip.is_completed {
            warn!("Keeping trip {} completed; update tried to clear the flag", trip.id);
            trip.is_completed = true;
        }

        info!("Updating trip {} ({})", trip.id, trip.name);
        trips[index] = trip;
        self.commit(trips)?;
        Ok(true)
    }

    /// Remove every trip with this id. Returns how many were removed.
    pub fn delete_trip(&self, id: Uuid) -> Result<usize, TripStoreError> {
        let mut trips = self.lock_trips();
        let before = trips.len();
        trips.retain(|t| t.id != id);
        let removed = before - trips.len();

        if removed == 0 {
            debug!("delete_trip: no trip with id {}", id);
            return Ok(0);
        }

        info!("Deleted trip {}", id);
        self.commit(trips)?;
        Ok(removed)
    }

    /// Apply field edits to a stored trip. Lookup, rebuild and write-back
    /// happen under one lock, so concurrent checklist edits are kept.
    pub fn edit_trip(&self, command: UpdateTripCommand) -> Result<bool, TripStoreError> {
        let trip_id = command.trip_id;
        self.modify_trip(trip_id, move |trip| {
            *trip = command.apply_to(trip)?;
            info!("Edited trip {} ({})", trip.id, trip.name);
            Ok(())
        })
    }

    /// Mark a trip completed. Idempotent; returns `Ok(false)` if not found.
    /// An already-completed trip is left alone: no flush, no notification.
    pub fn mark_completed(&self, id: Uuid) -> Result<bool, TripStoreError> {
        let mut trips = self.lock_trips();
        let Some(trip) = trips.iter_mut().find(|t| t.id == id) else {
            debug!("mark_completed: no trip with id {}", id);
            return Ok(false);
        };

        if trip.is_completed {
            debug!("Trip {} already completed", id);
            return Ok(true);
        }

        trip.is_completed = true;
        info!("Trip {} completed", id);
        self.commit(trips)?;
        Ok(true)
    }

    /// Drop every trip. Used by the reset interface.
    pub fn clear_all(&self) -> Result<(), TripStoreError> {
        let mut trips = self.lock_trips();
        info!("Clearing all {} trips", trips.len());
        trips.clear();
        self.commit(trips)
    }

    // ---- checklist mutations on a single trip ----

    /// Append a new item to a trip's checklist. Returns the new item, or
    /// `None` if the trip does not exist.
    pub fn add_checklist_item(
        &self,
        trip_id: Uuid,
        name: &str,
    ) -> Result<Option<ChecklistItem>, TripStoreError> {
        validate_checklist_item_name(name)?;
        let item = ChecklistItem::new(name);
        let added = item.clone();

        let found = self.modify_trip(trip_id, move |trip| {
            trip.checklist.push(item);
            Ok(())
        })?;
        Ok(found.then_some(added))
    }

    /// Flip an item's completion flag. Returns `Ok(false)` if the trip or
    /// item does not exist.
    pub fn toggle_checklist_item(&self, trip_id: Uuid, item_id: Uuid) -> Result<bool, TripStoreError> {
        self.modify_item(trip_id, item_id, |item| {
            item.is_completed = !item.is_completed;
        })
    }

    pub fn rename_checklist_item(
        &self,
        trip_id: Uuid,
        item_id: Uuid,
        name: &str,
    ) -> Result<bool, TripStoreError> {
        validate_checklist_item_name(name)?;
        let name = name.trim().to_string();
        self.modify_item(trip_id, item_id, move |item| {
            item.name = name;
        })
    }

    pub fn remove_checklist_item(&self, trip_id: Uuid, item_id: Uuid) -> Result<bool, TripStoreError> {
        let mut trips = self.lock_trips();
        let Some(trip) = trips.iter_mut().find(|t| t.id == trip_id) else {
            return Ok(false);
        };

        let before = trip.checklist.len();
        trip.checklist.retain(|i| i.id != item_id);
        if trip.checklist.len() == before {
            return Ok(false);
        }

        debug!("Removed checklist item {} from trip {}", item_id, trip_id);
        self.commit(trips)?;
        Ok(true)
    }

    /// Append fresh, incomplete copies of `template` to a trip's checklist
    pub fn apply_checklist_template(
        &self,
        trip_id: Uuid,
        template: &[ChecklistItem],
    ) -> Result<bool, TripStoreError> {
        let copies: Vec<ChecklistItem> = template.iter().map(ChecklistItem::fresh_copy).collect();
        self.modify_trip(trip_id, move |trip| {
            trip.checklist.extend(copies);
            Ok(())
        })
    }

    // ---- observation ----

    /// Register a listener called with a snapshot after every mutation.
    ///
    /// Under concurrent mutation a listener may skip intermediate snapshots,
    /// but never receives an older one after a newer one. Listeners may read
    /// the store; they must not mutate it synchronously.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&[Trip]) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Returns whether a listener was registered under `id`
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    // ---- internals ----

    fn modify_trip<F>(&self, id: Uuid, apply: F) -> Result<bool, TripStoreError>
    where
        F: FnOnce(&mut Trip) -> Result<(), TripStoreError>,
    {
        let mut trips = self.lock_trips();
        let Some(trip) = trips.iter_mut().find(|t| t.id == id) else {
            debug!("No trip with id {}", id);
            return Ok(false);
        };

        apply(trip)?;
        self.commit(trips)?;
        Ok(true)
    }

    fn modify_item<F>(&self, trip_id: Uuid, item_id: Uuid, apply: F) -> Result<bool, TripStoreError>
    where
        F: FnOnce(&mut ChecklistItem),
    {
        let mut trips = self.lock_trips();
        let Some(item) = trips
            .iter_mut()
            .find(|t| t.id == trip_id)
            .and_then(|t| t.checklist.iter_mut().find(|i| i.id == item_id))
        else {
            return Ok(false);
        };

        apply(item);
        self.commit(trips)?;
        Ok(true)
    }

    /// Flush the mutated collection, release the lock, then notify listeners
    fn commit(&self, trips: MutexGuard<'_, Vec<Trip>>) -> Result<(), TripStoreError> {
        let flushed = self.codec.save_trips(&trips);
        let snapshot = trips.clone();
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        drop(trips);

        self.notify(version, &snapshot);

        match flushed {
            Ok(()) => Ok(()),
            Err(e) => match self.policy {
                PersistencePolicy::BestEffort => {
                    warn!("Trip change kept in memory only: {}", e);
                    Ok(())
                }
                PersistencePolicy::Strict => Err(e.into()),
            },
        }
    }

    fn notify(&self, version: u64, snapshot: &[Trip]) {
        let mut delivered = self
            .delivered_version
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if version <= *delivered {
            debug!("Skipping stale snapshot v{} (delivered v{})", version, *delivered);
            return;
        }
        *delivered = version;

        // Clone the handles so a listener can subscribe or unsubscribe
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(snapshot);
        }
    }

    fn lock_trips(&self) -> MutexGuard<'_, Vec<Trip>> {
        self.trips.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
