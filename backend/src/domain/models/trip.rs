use shared::{ChecklistItem, Trip};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("Trip name cannot be empty")]
    EmptyName,
    #[error("Trip location cannot be empty")]
    EmptyLocation,
    #[error("Checklist item name cannot be empty")]
    EmptyChecklistItemName,
}

/// Check the invariants a trip must hold before it is stored
pub fn validate_trip(trip: &Trip) -> Result<(), TripValidationError> {
    if trip.name.trim().is_empty() {
        return Err(TripValidationError::EmptyName);
    }
    if trip.location.trim().is_empty() {
        return Err(TripValidationError::EmptyLocation);
    }
    trip.checklist.iter().try_for_each(validate_checklist_item)
}

pub fn validate_checklist_item(item: &ChecklistItem) -> Result<(), TripValidationError> {
    validate_checklist_item_name(&item.name)
}

pub fn validate_checklist_item_name(name: &str) -> Result<(), TripValidationError> {
    if name.trim().is_empty() {
        return Err(TripValidationError::EmptyChecklistItemName);
    }
    Ok(())
}

/// Collapse whitespace-only optional text to `None`, trimming the rest
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
