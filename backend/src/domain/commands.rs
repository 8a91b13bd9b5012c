//! Domain-level command types
//!
//! These are the inputs a presentation layer builds from form fields. They
//! own the creation-boundary rules: trimming, collapsing blank optional text
//! to `None`, and seeding checklists from a template.

pub mod trips {
    use chrono::NaiveDate;
    use shared::{FishingType, Trip};
    use uuid::Uuid;

    use crate::domain::models::trip::{normalize_optional, validate_trip, TripValidationError};

    /// Input for creating a new trip.
    #[derive(Debug, Clone)]
    pub struct CreateTripCommand {
        pub name: String,
        pub location: String,
        pub date: NaiveDate,
        pub fishing_type: FishingType,
        pub target_fish: Option<String>,
        pub notes: Option<String>,
        /// Seed the checklist from the fishing type's packing template
        pub use_template: bool,
    }

    impl CreateTripCommand {
        pub fn into_trip(self) -> Result<Trip, TripValidationError> {
            let mut trip = Trip::new(
                self.name.trim(),
                self.location.trim(),
                self.date,
                self.fishing_type,
            );
            trip.target_fish = normalize_optional(self.target_fish);
            trip.notes = normalize_optional(self.notes);
            if self.use_template {
                trip.checklist = self.fishing_type.default_checklist();
            }

            validate_trip(&trip)?;
            Ok(trip)
        }
    }

    /// Field edits for an existing trip. Identity, checklist and completion
    /// status are carried over from the stored record untouched.
    #[derive(Debug, Clone)]
    pub struct UpdateTripCommand {
        pub trip_id: Uuid,
        pub name: String,
        pub location: String,
        pub date: NaiveDate,
        pub fishing_type: FishingType,
        pub target_fish: Option<String>,
        pub notes: Option<String>,
    }

    impl UpdateTripCommand {
        /// Build the replacement record for `existing`
        pub fn apply_to(self, existing: &Trip) -> Result<Trip, TripValidationError> {
            let trip = Trip {
                id: existing.id,
                name: self.name.trim().to_string(),
                location: self.location.trim().to_string(),
                date: self.date,
                fishing_type: self.fishing_type,
                target_fish: normalize_optional(self.target_fish),
                notes: normalize_optional(self.notes),
                is_completed: existing.is_completed,
                checklist: existing.checklist.clone(),
            };

            validate_trip(&trip)?;
            Ok(trip)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use shared::ChecklistItem;

        fn create_command() -> CreateTripCommand {
            CreateTripCommand {
                name: "  Lake Run ".to_string(),
                location: "North Lake".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                fishing_type: FishingType::Boat,
                target_fish: Some("Pike".to_string()),
                notes: Some("   ".to_string()),
                use_template: false,
            }
        }

        #[test]
        fn test_create_normalizes_fields() {
            let trip = create_command().into_trip().unwrap();

            assert_eq!(trip.name, "Lake Run");
            assert_eq!(trip.target_fish.as_deref(), Some("Pike"));
            assert_eq!(trip.notes, None);
            assert!(!trip.is_completed);
            assert!(trip.checklist.is_empty());
        }

        #[test]
        fn test_create_with_template_seeds_checklist() {
            let command = CreateTripCommand {
                use_template: true,
                ..create_command()
            };
            let trip = command.into_trip().unwrap();

            let expected: Vec<String> = FishingType::Boat
                .default_checklist()
                .into_iter()
                .map(|i| i.name)
                .collect();
            let actual: Vec<String> = trip.checklist.iter().map(|i| i.name.clone()).collect();
            assert_eq!(actual, expected);
        }

        #[test]
        fn test_create_rejects_blank_location() {
            let command = CreateTripCommand {
                location: " ".to_string(),
                ..create_command()
            };
            assert_eq!(command.into_trip(), Err(TripValidationError::EmptyLocation));
        }

        #[test]
        fn test_update_keeps_identity_checklist_and_status() {
            let mut existing = create_command().into_trip().unwrap();
            existing.is_completed = true;
            existing.checklist.push(ChecklistItem::new("Net"));

            let command = UpdateTripCommand {
                trip_id: existing.id,
                name: "Renamed".to_string(),
                location: "South Bay".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                fishing_type: FishingType::Shore,
                target_fish: None,
                notes: Some("Windy".to_string()),
            };
            let updated = command.apply_to(&existing).unwrap();

            assert_eq!(updated.id, existing.id);
            assert_eq!(updated.name, "Renamed");
            assert_eq!(updated.fishing_type, FishingType::Shore);
            assert!(updated.is_completed);
            assert_eq!(updated.checklist, existing.checklist);
        }
    }
}

pub mod calendar {
    use chrono::NaiveDate;

    /// Query for one month of the calendar grid.
    #[derive(Debug, Clone)]
    pub struct CalendarMonthQuery {
        pub month: u32,
        pub year: i32,
        /// Day highlighted as "today"
        pub today: NaiveDate,
        /// Day the user has tapped, if any
        pub selected: Option<NaiveDate>,
    }
}
