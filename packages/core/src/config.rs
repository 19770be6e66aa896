//! Library configuration
//!
//! The storage location is the only thing to configure. It resolves, in order:
//!
//! 1. `SPRIG_DB_PATH` environment variable
//! 2. `~/.sprig/sprig.db`

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that overrides the database location
pub const DB_PATH_ENV: &str = "SPRIG_DB_PATH";

const DATA_DIR_NAME: &str = ".sprig";
const DB_FILE_NAME: &str = "sprig.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set SPRIG_DB_PATH instead")]
    HomeDirUnavailable,
}

/// Where the library lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryConfig {
    pub database_path: PathBuf,
}

impl LibraryConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    /// Resolve from `SPRIG_DB_PATH`, falling back to the home directory default
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(std::env::var(DB_PATH_ENV).ok(), dirs::home_dir())
    }

    fn resolve(env_path: Option<String>, home_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
            tracing::info!("Using database path from {}: {}", DB_PATH_ENV, path);
            return Ok(Self::new(path));
        }

        let home_dir = home_dir.ok_or(ConfigError::HomeDirUnavailable)?;
        Ok(Self::new(home_dir.join(DATA_DIR_NAME).join(DB_FILE_NAME)))
    }
}
