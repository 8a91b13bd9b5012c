//! Global checklist template service.
//!
//! Keeps the trip-independent packing list that users can copy onto any
//! trip. The template lives under its own key and is unaffected by trip
//! mutations.

use log::{info, warn};
use shared::ChecklistItem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::domain::models::trip::validate_checklist_item_name;
use crate::domain::trip_store::{PersistencePolicy, TripStoreError};
use crate::storage::{default_checklist, KeyValueStore, PersistenceCodec};

#[derive(Clone)]
pub struct ChecklistService<S: KeyValueStore> {
    codec: PersistenceCodec<S>,
    policy: PersistencePolicy,
    items: Arc<Mutex<Vec<ChecklistItem>>>,
}

impl<S: KeyValueStore> ChecklistService<S> {
    /// Hydrate the template from storage, or the default five items
    pub fn load(codec: PersistenceCodec<S>, policy: PersistencePolicy) -> Self {
        let items = codec.load_checklist();
        info!("Loaded checklist template with {} items", items.len());
        Self {
            codec,
            policy,
            items: Arc::new(Mutex::new(items)),
        }
    }

    pub fn items(&self) -> Vec<ChecklistItem> {
        self.lock_items().clone()
    }

    pub fn add_item(&self, name: &str) -> Result<ChecklistItem, TripStoreError> {
        validate_checklist_item_name(name)?;
        let item = ChecklistItem::new(name);

        let mut items = self.lock_items();
        items.push(item.clone());
        self.flush(&items)?;
        Ok(item)
    }

    pub fn toggle_item(&self, id: Uuid) -> Result<bool, TripStoreError> {
        self.modify_item(id, |item| item.is_completed = !item.is_completed)
    }

    pub fn rename_item(&self, id: Uuid, name: &str) -> Result<bool, TripStoreError> {
        validate_checklist_item_name(name)?;
        let name = name.trim().to_string();
        self.modify_item(id, move |item| item.name = name)
    }

    pub fn remove_item(&self, id: Uuid) -> Result<bool, TripStoreError> {
        let mut items = self.lock_items();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.flush(&items)?;
        Ok(true)
    }

    /// Forget the saved template and go back to the default items
    pub fn reset(&self) -> Result<(), TripStoreError> {
        let mut items = self.lock_items();
        *items = default_checklist();
        info!("Checklist template reset to default");

        match self.codec.clear_checklist() {
            Ok(()) => Ok(()),
            Err(e) if self.policy == PersistencePolicy::BestEffort => {
                warn!("Failed to clear saved checklist: {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn modify_item<F>(&self, id: Uuid, apply: F) -> Result<bool, TripStoreError>
    where
        F: FnOnce(&mut ChecklistItem),
    {
        let mut items = self.lock_items();
        let Some(item) = items.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        apply(item);
        self.flush(&items)?;
        Ok(true)
    }

    fn flush(&self, items: &[ChecklistItem]) -> Result<(), TripStoreError> {
        match self.codec.save_checklist(items) {
            Ok(()) => Ok(()),
            Err(e) if self.policy == PersistencePolicy::BestEffort => {
                warn!("Checklist change kept in memory only: {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<ChecklistItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
