//! # Domain Module
//!
//! Contains all business logic for the fishing trip planner.
//!
//! ## Module Organization
//!
//! - **trip_store**: Owner of the trip collection; create/update/delete/complete,
//!   per-trip checklist edits, and change notification
//! - **checklist_service**: The standalone packing template
//! - **calendar**: Month grid generation and focus-month navigation
//! - **export_service**: CSV export of the trip collection
//! - **reset_service**: All-or-nothing wipe of planner data
//! - **commands**: Creation-boundary inputs (trimming, optional-text normalization)
//! - **models**: Validation rules
//!
//! ## Business Rules
//!
//! - Trips must have non-blank names and locations
//! - Completing a trip is one-way
//! - Only incomplete trips show up on the calendar
//! - Every mutation is flushed to storage before listeners are told about it

pub mod calendar;
pub mod checklist_service;
pub mod commands;
pub mod export_service;
pub mod models;
pub mod reset_service;
pub mod trip_store;

pub use calendar::*;
pub use checklist_service::*;
pub use export_service::*;
pub use reset_service::*;
pub use trip_store::*;
