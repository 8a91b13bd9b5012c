//! # File Key-Value Store
//!
//! File-based implementation of [`KeyValueStore`]. Each key is stored as a
//! single file directly under the data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── planner_config.yaml   (optional, see config module)
//! ├── savedTrips
//! ├── globalChecklist
//! ├── isDarkMode
//! ├── tripNotifications
//! └── autoBackup
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! mid-write never leaves a half-written value behind.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::storage::traits::KeyValueStore;

/// FileKeyValueStore manages one file per key inside a base directory
#[derive(Clone)]
pub struct FileKeyValueStore {
    base_directory: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Open a store rooted at `base_directory`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get the base directory path
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file path backing a key
    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_directory.join(key))
    }
}

/// Keys become file names, so only a conservative character set is allowed
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(anyhow::anyhow!("Invalid storage key: {:?}", key));
    }
    Ok(())
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for_key(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes for key '{}'", bytes.len(), key);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for_key(key)?;
        let temp_path = path.with_extension("tmp");
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        fs::write(&temp_path, value)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move {} into place", path.display()))?;

        debug!("Wrote {} bytes for key '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed key '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_utils::TestEnvironment;

    #[test]
    fn test_get_missing_key_returns_none() {
        let env = TestEnvironment::new().unwrap();
        assert_eq!(env.store.get("savedTrips").unwrap(), None);
        assert!(!env.store.contains("savedTrips").unwrap());
    }

    #[test]
    fn test_set_then_get() {
        let env = TestEnvironment::new().unwrap();
        env.store.set("savedTrips", b"[]").unwrap();

        assert_eq!(env.store.get("savedTrips").unwrap(), Some(b"[]".to_vec()));
        assert!(env.base_directory().join("savedTrips").exists());
        assert!(!env.base_directory().join("savedTrips.tmp").exists());
    }

    #[test]
    fn test_set_overwrites() {
        let env = TestEnvironment::new().unwrap();
        env.store.set("autoBackup", b"true").unwrap();
        env.store.set("autoBackup", b"false").unwrap();

        assert_eq!(env.store.get("autoBackup").unwrap(), Some(b"false".to_vec()));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let env = TestEnvironment::new().unwrap();
        env.store.set("globalChecklist", b"[]").unwrap();

        env.store.remove("globalChecklist").unwrap();
        env.store.remove("globalChecklist").unwrap();
        assert_eq!(env.store.get("globalChecklist").unwrap(), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let env = TestEnvironment::new().unwrap();
        let other = env.store.clone();
        other.set("isDarkMode", b"true").unwrap();

        assert_eq!(env.store.get("isDarkMode").unwrap(), Some(b"true".to_vec()));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let env = TestEnvironment::new().unwrap();
        assert!(env.store.set("../escape", b"x").is_err());
        assert!(env.store.get("").is_err());
        assert!(env.store.remove("a/b").is_err());
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let env = TestEnvironment::new().unwrap();
        let nested = env.base_directory().join("nested").join("data");

        let store = FileKeyValueStore::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(store.base_directory(), nested.as_path());
    }
}
