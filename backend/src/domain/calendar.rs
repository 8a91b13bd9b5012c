//! Calendar domain logic for the fishing trip planner.
//!
//! Projects a month and a trip collection into a week-aligned grid of day
//! cells. Leading and trailing cells are real dates from the neighbouring
//! months so every row has seven days. Only incomplete trips are counted:
//! a completed trip no longer needs a reminder on the calendar.

use chrono::{Datelike, Days, Local, NaiveDate};
use log::debug;
use shared::{CalendarDay, CalendarDayType, CalendarFocusDate, CalendarMonth, CurrentDateResponse, Trip};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::commands::calendar::CalendarMonthQuery;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid month: {month}/{year}")]
    InvalidMonth { month: u32, year: i32 },
}

/// Calendar service that handles all calendar-related business logic
#[derive(Clone)]
pub struct CalendarService {
    /// Current focus month for calendar navigation.
    /// This is kept in memory and not persisted.
    current_focus_date: Arc<Mutex<CalendarFocusDate>>,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new() -> Self {
        Self {
            current_focus_date: Arc::new(Mutex::new(CalendarFocusDate::default())),
        }
    }

    /// Generate the grid for one month, annotated with trip counts
    pub fn generate_calendar_month(
        &self,
        query: &CalendarMonthQuery,
        trips: &[Trip],
    ) -> Result<CalendarMonth, CalendarError> {
        let (month, year) = (query.month, query.year);
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { month, year })?;
        let last = last_day_of_month(first).ok_or(CalendarError::InvalidMonth { month, year })?;

        let leading = first.weekday().num_days_from_sunday();
        let trailing = (6 - last.weekday().num_days_from_sunday()) % 7;
        debug!(
            "Calendar {}/{}: {} leading, {} days, {} trailing",
            month,
            year,
            leading,
            last.day(),
            trailing
        );

        let trip_counts = count_pending_trips_by_date(trips);
        let grid_start = first
            .checked_sub_days(Days::new(leading.into()))
            .ok_or(CalendarError::InvalidMonth { month, year })?;
        let total = leading + last.day() + trailing;

        let days = grid_start
            .iter_days()
            .take(total as usize)
            .map(|date| {
                let day_type = if date < first {
                    CalendarDayType::PaddingBefore
                } else if date > last {
                    CalendarDayType::PaddingAfter
                } else {
                    CalendarDayType::MonthDay
                };
                CalendarDay {
                    date,
                    day: date.day(),
                    day_type,
                    is_current_month: day_type == CalendarDayType::MonthDay,
                    is_today: date == query.today,
                    is_selected: query.selected == Some(date),
                    trip_count: trip_counts.get(&date).copied().unwrap_or(0),
                }
            })
            .collect();

        Ok(CalendarMonth {
            month,
            year,
            days,
            first_day_of_week: leading,
        })
    }

    /// Incomplete trips on a specific date
    pub fn trips_for_date<'a>(&self, date: NaiveDate, trips: &'a [Trip]) -> Vec<&'a Trip> {
        trips
            .iter()
            .filter(|t| !t.is_completed && t.is_on(date))
            .collect()
    }

    /// Get the number of days in a given month and year
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => if self.is_leap_year(year) { 29 } else { 28 },
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year
    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the first day of month (0 = Sunday, 1 = Monday, etc.)
    pub fn first_day_of_month(&self, month: u32, year: i32) -> Option<u32> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Format a date for human-readable display, e.g. "June 13, 2025"
    pub fn format_date_for_display(&self, date: NaiveDate) -> String {
        format!("{} {}, {}", self.month_name(date.month()), date.day(), date.year())
    }

    /// Navigate to the previous month
    pub fn previous_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 1 {
            (12, current_year - 1)
        } else {
            (current_month - 1, current_year)
        }
    }

    /// Navigate to the next month
    pub fn next_month(&self, current_month: u32, current_year: i32) -> (u32, i32) {
        if current_month == 12 {
            (1, current_year + 1)
        } else {
            (current_month + 1, current_year)
        }
    }

    /// Get current date information
    pub fn get_current_date(&self) -> CurrentDateResponse {
        let today = Local::now().date_naive();
        CurrentDateResponse {
            month: today.month(),
            year: today.year(),
            day: today.day(),
            formatted_date: self.format_date_for_display(today),
            iso_date: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// Get the current focus date for calendar navigation
    pub fn get_focus_date(&self) -> CalendarFocusDate {
        self.lock_focus().clone()
    }

    /// Set the focus date for calendar navigation
    pub fn set_focus_date(&self, month: u32, year: i32) -> Result<CalendarFocusDate, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month, year });
        }

        let new_focus_date = CalendarFocusDate { month, year };
        *self.lock_focus() = new_focus_date.clone();
        Ok(new_focus_date)
    }

    /// Move the focus to the previous month
    pub fn navigate_previous_month(&self) -> CalendarFocusDate {
        let mut focus = self.lock_focus();
        let (month, year) = self.previous_month(focus.month, focus.year);
        *focus = CalendarFocusDate { month, year };
        focus.clone()
    }

    /// Move the focus to the next month
    pub fn navigate_next_month(&self) -> CalendarFocusDate {
        let mut focus = self.lock_focus();
        let (month, year) = self.next_month(focus.month, focus.year);
        *focus = CalendarFocusDate { month, year };
        focus.clone()
    }

    fn lock_focus(&self) -> MutexGuard<'_, CalendarFocusDate> {
        self.current_focus_date.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}

/// Last day of the month containing `first`: the day before the first of the next month
fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(chrono::Months::new(1))?.pred_opt()
}

fn count_pending_trips_by_date(trips: &[Trip]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for trip in trips.iter().filter(|t| !t.is_completed) {
        *counts.entry(trip.date).or_insert(0) += 1;
    }
    counts
}
