//! User settings for the address book
//!
//! Settings live in `config.json` next to the audit log. Missing fields fall
//! back to defaults so older files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::AbaPaths;
use crate::audit::format_timestamp;
use crate::error::AbaError;

/// Persisted preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// strftime format for audit timestamps (must not produce commas)
    #[serde(default = "default_audit_timestamp_format")]
    pub audit_timestamp_format: String,

    /// Default `tracing` filter directive when neither flags nor RUST_LOG are set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_timestamp_format() -> String {
    "%c".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            audit_timestamp_format: default_audit_timestamp_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &AbaPaths) -> Result<Self, AbaError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AbaError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AbaError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AbaPaths) -> Result<(), AbaError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AbaError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AbaError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings that would corrupt the audit file format
    pub fn validate(&self) -> Result<(), AbaError> {
        let sample = format_timestamp(&self.audit_timestamp_format).ok_or_else(|| {
            AbaError::Config(format!(
                "audit_timestamp_format '{}' is not a valid strftime format",
                self.audit_timestamp_format
            ))
        })?;
        if sample.contains(',') || sample.contains('\n') {
            return Err(AbaError::Config(format!(
                "audit_timestamp_format '{}' produces commas or newlines",
                self.audit_timestamp_format
            )));
        }
        Ok(())
    }
}
