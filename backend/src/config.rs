//! # Configuration
//!
//! Resolves where planner data lives and how persistence failures are handled.
//!
//! The data directory is `$FISHING_PLANNER_DATA_DIR` when set, otherwise
//! `~/Documents/Fishing Trip Planner`. An optional `planner_config.yaml` in
//! that directory can override settings:
//!
//! ```yaml
//! persistence_policy: strict   # or best_effort (default)
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::trip_store::PersistencePolicy;

pub const DATA_DIR_ENV: &str = "FISHING_PLANNER_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "planner_config.yaml";
const DEFAULT_DIR_NAME: &str = "Fishing Trip Planner";

/// Overrides read from `planner_config.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    persistence_policy: Option<PersistencePolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub data_directory: PathBuf,
    pub persistence_policy: PersistencePolicy,
}

impl PlannerConfig {
    /// Resolve the data directory from the environment and read its config file
    pub fn load() -> Result<Self> {
        let data_directory = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => {
                info!("Using data directory from {}", DATA_DIR_ENV);
                PathBuf::from(dir)
            }
            _ => default_data_directory()?,
        };
        Self::from_directory(data_directory)
    }

    /// Build a config rooted at `data_directory`, applying its config file if present
    pub fn from_directory<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let data_directory = data_directory.as_ref().to_path_buf();
        let config_path = data_directory.join(CONFIG_FILE_NAME);

        let file = if config_path.exists() {
            let yaml = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&yaml)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            debug!("Loaded config from {:?}", config_path);
            file
        } else {
            ConfigFile::default()
        };

        let config = Self {
            persistence_policy: file.persistence_policy.unwrap_or_default(),
            data_directory,
        };
        info!(
            "Data directory: {} (persistence: {:?})",
            config.data_directory.display(),
            config.persistence_policy
        );
        Ok(config)
    }
}

fn default_data_directory() -> Result<PathBuf> {
    let base = dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(base.join(DEFAULT_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = PlannerConfig::from_directory(dir.path()).unwrap();

        assert_eq!(config.data_directory, dir.path());
        assert_eq!(config.persistence_policy, PersistencePolicy::BestEffort);
    }

    #[test]
    fn test_config_file_overrides_policy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "persistence_policy: strict\n").unwrap();

        let config = PlannerConfig::from_directory(dir.path()).unwrap();
        assert_eq!(config.persistence_policy, PersistencePolicy::Strict);
    }

    #[test]
    fn test_empty_config_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{}\n").unwrap();

        let config = PlannerConfig::from_directory(dir.path()).unwrap();
        assert_eq!(config.persistence_policy, PersistencePolicy::BestEffort);
    }

    #[test]
    fn test_invalid_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "persistence_policy: sometimes\n").unwrap();

        assert!(PlannerConfig::from_directory(dir.path()).is_err());
    }
}
