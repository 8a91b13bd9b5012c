/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail.

use anyhow::Result;
use chrono::NaiveDate;
use shared::{FishingType, Trip};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::kv::FileKeyValueStore;

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// The file store rooted in the temporary directory
    pub store: FileKeyValueStore,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with automatic cleanup
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let store = FileKeyValueStore::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            store,
            base_path,
        })
    }

    /// Get the base directory path for this test environment
    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// Open a second, independent store over the same directory,
    /// as a relaunched app would
    pub fn reopen(&self) -> Result<FileKeyValueStore> {
        FileKeyValueStore::new(&self.base_path)
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("FISHING_PLANNER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// A planned boat trip at "Test Lake" on the given date
pub fn sample_trip(name: &str, date: NaiveDate) -> Trip {
    Trip::new(name, "Test Lake", date, FishingType::Boat)
}

/// Shorthand for building dates in tests
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}
