//! Export service domain logic for the fishing trip planner.
//!
//! Turns the trip collection into CSV text for the settings screen's
//! "export" action, and optionally writes it to disk.
//!
//! ## CSV Format
//!
//! ```csv
//! Trip Name,Date,Location,Fishing Type,Target Fish,Status
//! "Lake Run","3/14/25","North Lake","Boat","Pike","Planned"
//! ```
//!
//! The header is plain; every data value is double-quoted. Dates use the
//! short month/day/two-digit-year form.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{error, info};
use shared::{ExportDataResponse, ExportToPathResponse, Trip};
use std::fs;
use std::path::PathBuf;

pub const CSV_HEADER: &str = "Trip Name,Date,Location,Fishing Type,Target Fish,Status";

/// Export service that handles all export-related business logic
#[derive(Clone)]
pub struct ExportService {
    // No internal state needed for now
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new() -> Self {
        Self {}
    }

    /// Render the trips as CSV, in collection order
    pub fn export_trips_csv(&self, trips: &[Trip]) -> Result<ExportDataResponse> {
        info!("Exporting {} trips as CSV", trips.len());

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for trip in trips {
            let date = format_short_date(trip.date);
            writer.write_record([
                trip.name.as_str(),
                date.as_str(),
                trip.location.as_str(),
                trip.fishing_type.display_name(),
                trip.target_fish.as_deref().unwrap_or(""),
                status_label(trip),
            ])?;
        }

        let rows = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e.error()))?;
        let rows = String::from_utf8(rows).context("CSV export produced invalid UTF-8")?;

        let mut csv_content = String::with_capacity(CSV_HEADER.len() + 1 + rows.len());
        csv_content.push_str(CSV_HEADER);
        csv_content.push('\n');
        csv_content.push_str(&rows);

        let filename = format!("fishing_trips_{}.csv", Local::now().format("%Y%m%d"));

        Ok(ExportDataResponse {
            csv_content,
            filename,
            trip_count: trips.len(),
        })
    }

    /// Export trips into a directory (or the user's Documents folder)
    pub fn export_to_path(&self, trips: &[Trip], custom_path: Option<&str>) -> Result<ExportToPathResponse> {
        let export = self.export_trips_csv(trips)?;

        let export_dir = match custom_path {
            Some(path) if !path.trim().is_empty() => PathBuf::from(self.sanitize_path(path)),
            _ => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("Could not determine default export directory");
                    return Ok(ExportToPathResponse {
                        success: false,
                        message: "Failed to determine export directory".to_string(),
                        file_path: String::new(),
                        trip_count: 0,
                    });
                }
            },
        };

        if let Err(e) = fs::create_dir_all(&export_dir) {
            error!("Failed to create export directory {:?}: {}", export_dir, e);
            return Ok(ExportToPathResponse {
                success: false,
                message: format!("Failed to create export directory: {}", e),
                file_path: export_dir.to_string_lossy().to_string(),
                trip_count: 0,
            });
        }

        let file_path = export_dir.join(&export.filename);
        let file_path_str = file_path.to_string_lossy().to_string();
        match fs::write(&file_path, &export.csv_content) {
            Ok(()) => {
                info!("Exported {} trips to {}", export.trip_count, file_path_str);
                Ok(ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    trip_count: export.trip_count,
                })
            }
            Err(e) => {
                error!("Failed to write export file to {:?}: {}", file_path, e);
                Ok(ExportToPathResponse {
                    success: false,
                    message: format!("Failed to write export file: {}", e),
                    file_path: file_path_str,
                    trip_count: 0,
                })
            }
        }
    }

    /// Basic path sanitization to handle common user input issues
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim();

        // Remove surrounding quotes (single or double)
        if cleaned.len() >= 2
            && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
                || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
        {
            cleaned = cleaned[1..cleaned.len() - 1].trim();
        }

        let mut cleaned = cleaned.replace("\\ ", " ");
        while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
            cleaned.pop();
        }

        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                return home.to_string_lossy().to_string();
            }
            if let Some(rest) = cleaned.strip_prefix("~/").or_else(|| cleaned.strip_prefix("~\\")) {
                return home.join(rest).to_string_lossy().to_string();
            }
        }

        cleaned
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

/// Short numeric date, e.g. 3/14/25
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}

fn status_label(trip: &Trip) -> &'static str {
    if trip.is_completed {
        "Completed"
    } else {
        "Planned"
    }
}
