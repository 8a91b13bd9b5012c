use serde::{Deserialize, Serialize};
use std::fmt;
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// A single packing/preparation task with a completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    /// Display name, trimmed of surrounding whitespace at creation
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl ChecklistItem {
    /// Create a new, incomplete checklist item with a fresh id
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.as_ref().trim().to_string(),
            is_completed: false,
        }
    }

    /// Copy of this item with a fresh id and the completion flag cleared.
    /// Used when a template is copied onto a trip.
    pub fn fresh_copy(&self) -> Self {
        Self::new(&self.name)
    }
}

/// Kind of fishing outing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FishingType {
    Ice,
    Shore,
    Boat,
}

impl FishingType {
    pub fn all() -> [FishingType; 3] {
        [FishingType::Ice, FishingType::Shore, FishingType::Boat]
    }

    /// Human-readable name used in exports and display
    pub fn display_name(&self) -> &'static str {
        match self {
            FishingType::Ice => "Ice",
            FishingType::Shore => "Shore",
            FishingType::Boat => "Boat",
        }
    }

    /// Packing template seeded onto a new trip of this type
    pub fn default_checklist(&self) -> Vec<ChecklistItem> {
        let names: &[&str] = match self {
            FishingType::Ice => &["Ice auger", "Ice picks", "Sled", "Warm layers", "Tip-ups"],
            FishingType::Shore => &["Rod", "Tackle box", "Folding chair", "Rod holder"],
            FishingType::Boat => &["Life jackets", "Anchor", "Fuel", "Fishing license", "Net"],
        };
        names.iter().map(ChecklistItem::new).collect()
    }
}

impl fmt::Display for FishingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A planned or completed fishing outing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    /// Calendar date of the trip; time of day is not tracked
    pub date: NaiveDate,
    pub fishing_type: FishingType,
    #[serde(default)]
    pub target_fish: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Packing checklist in insertion order
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl Trip {
    /// Create a planned trip with a fresh id and an empty checklist
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        date: NaiveDate,
        fishing_type: FishingType,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
            date,
            fishing_type,
            target_fish: None,
            notes: None,
            is_completed: false,
            checklist: Vec::new(),
        }
    }

    /// Whether this trip falls on the given calendar day
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Number of checklist items marked complete
    pub fn completed_item_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.is_completed).count()
    }
}

/// Boolean preference flags owned by the settings surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub dark_mode: bool,
    pub trip_notifications: bool,
    pub auto_backup: bool,
}

/// Counts of trips by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripStats {
    pub total: usize,
    pub planned: usize,
    pub completed: usize,
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Filler day from the previous month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Filler day from the next month, completing the last week
    PaddingAfter,
}

/// Represents a calendar month grid, always a whole number of weeks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub days: Vec<CalendarDay>,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
}

impl CalendarMonth {
    /// Split the grid into rows of seven days
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay]> {
        self.days.chunks(7)
    }

    /// Look up the cell for a specific date, if it is on the grid
    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// Represents a single cell in the calendar grid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub day_type: CalendarDayType,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    /// Number of incomplete trips on this date
    pub trip_count: usize,
}

/// Represents the current focus date for calendar navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarFocusDate {
    pub month: u32,
    pub year: i32,
}

impl Default for CalendarFocusDate {
    fn default() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDateResponse {
    pub month: u32,
    pub year: i32,
    pub day: u32,
    pub formatted_date: String,
    pub iso_date: String,
}

/// CSV export payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportDataResponse {
    pub csv_content: String,
    pub filename: String,
    pub trip_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_path: String,
    pub trip_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_item_trims_name() {
        let item = ChecklistItem::new("  Rod  ");
        assert_eq!(item.name, "Rod");
        assert!(!item.is_completed);
    }

    #[test]
    fn test_fresh_copy_gets_new_id() {
        let mut item = ChecklistItem::new("Baits");
        item.is_completed = true;

        let copy = item.fresh_copy();
        assert_ne!(copy.id, item.id);
        assert_eq!(copy.name, "Baits");
        assert!(!copy.is_completed);
    }

    #[test]
    fn test_fishing_type_display_names() {
        assert_eq!(FishingType::Ice.display_name(), "Ice");
        assert_eq!(FishingType::Shore.to_string(), "Shore");
        assert_eq!(FishingType::Boat.display_name(), "Boat");
    }

    #[test]
    fn test_default_checklists_are_non_empty() {
        for fishing_type in FishingType::all() {
            let items = fishing_type.default_checklist();
            assert!(!items.is_empty());
            assert!(items.iter().all(|i| !i.is_completed && !i.name.is_empty()));
        }
    }

    #[test]
    fn test_trip_serializes_camel_case() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let trip = Trip::new("Lake Run", "North Lake", date, FishingType::Boat);
        let json = serde_json::to_value(&trip).unwrap();

        assert_eq!(json["fishingType"], "boat");
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["date"], "2025-03-14");
    }

    #[test]
    fn test_trip_decodes_without_optional_fields() {
        let json = r#"{
            "id": "6f1c2d3e-4b5a-4c6d-8e7f-9a0b1c2d3e4f",
            "name": "Dawn Patrol",
            "location": "Pier 7",
            "date": "2025-05-02",
            "fishingType": "shore"
        }"#;

        let trip: Trip = serde_json::from_str(json).unwrap();
        assert_eq!(trip.name, "Dawn Patrol");
        assert_eq!(trip.target_fish, None);
        assert!(!trip.is_completed);
        assert!(trip.checklist.is_empty());
    }

    #[test]
    fn test_trip_is_on() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let trip = Trip::new("Lake Run", "North Lake", date, FishingType::Ice);
        assert!(trip.is_on(date));
        assert!(!trip.is_on(date.succ_opt().unwrap()));
    }

    #[test]
    fn test_calendar_focus_date_default_is_valid() {
        let focus = CalendarFocusDate::default();
        assert!((1..=12).contains(&focus.month));
    }
}
