//! Path management for the address book
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` argument or `ABA_DATA_DIR` environment variable
//! 2. The platform data directory (`~/.local/share/aba` on Linux,
//!    `~/Library/Application Support/aba` on macOS, `%APPDATA%\aba` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::AbaError;

/// Manages all paths used by the address book
#[derive(Debug, Clone)]
pub struct AbaPaths {
    /// Base directory for all address book data
    base_dir: PathBuf,
}

impl AbaPaths {
    /// Resolve paths, preferring an explicit directory when one is given
    ///
    /// # Errors
    ///
    /// Returns an error if no explicit directory is given and the platform
    /// data directory cannot be determined.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, AbaError> {
        let base_dir = match explicit {
            Some(dir) => dir,
            None => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AbaPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the account/credential table
    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.txt")
    }

    /// Get the path to records.json
    pub fn records_file(&self) -> PathBuf {
        self.data_dir().join("records.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), AbaError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AbaError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AbaError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, AbaError> {
    ProjectDirs::from("", "", "aba")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AbaError::Config("Could not determine a data directory".into()))
}
