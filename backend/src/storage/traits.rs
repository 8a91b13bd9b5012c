//! # Storage Traits
//!
//! This module defines the storage abstraction that allows different
//! durable backends to be used interchangeably by the persistence codec.

use anyhow::Result;

/// Trait defining a durable key-value byte store
///
/// Values are opaque bytes keyed by fixed string keys. Implementations are
/// cheap to clone and share their underlying storage between clones, so the
/// trip store, checklist service and preferences repository can all hold the
/// same backend.
pub trait KeyValueStore: Send + Sync + Clone {
    /// Read the bytes stored under `key`, or `None` if nothing was written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the bytes stored under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether anything is stored under `key`
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
