//! Storage layer for the address book
//!
//! Every handle (account table, record table, audit log) is opened once at
//! startup and held until [`Storage::shutdown`].

pub mod accounts;
pub mod file_io;
pub mod records;

pub use accounts::AccountStore;
pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use records::RecordStore;

use tracing::{error, info};

use crate::audit::{AuditEventType, AuditLog};
use crate::config::{AbaPaths, Settings};
use crate::crypto::CredentialHasher;
use crate::error::{AbaError, AbaResult};
use crate::models::UserId;

/// Main storage coordinator that owns every persistent store
pub struct Storage {
    paths: AbaPaths,
    pub accounts: AccountStore,
    pub records: RecordStore,
    pub audit: AuditLog,
}

/// What went wrong during shutdown, one slot per store
#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub records: Option<AbaError>,
    pub audit: Option<AbaError>,
    pub accounts: Option<AbaError>,
}

impl ShutdownReport {
    /// Whether every store closed cleanly
    pub fn is_clean(&self) -> bool {
        self.records.is_none() && self.audit.is_none() && self.accounts.is_none()
    }

    /// Failures as `(store, error)` pairs
    pub fn failures(&self) -> Vec<(&'static str, &AbaError)> {
        [
            ("records", self.records.as_ref()),
            ("audit log", self.audit.as_ref()),
            ("accounts", self.accounts.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| (name, e)))
        .collect()
    }
}

impl Storage {
    /// Open every store under the given paths
    pub fn open(paths: AbaPaths, settings: &Settings, hasher: CredentialHasher) -> AbaResult<Self> {
        paths.ensure_directories()?;

        let accounts = AccountStore::open(paths.accounts_file(), hasher)?;
        let records = RecordStore::open(paths.records_file())?;
        let audit = AuditLog::open(paths.audit_log(), settings.audit_timestamp_format.clone())?;

        info!(base = %paths.base_dir().display(), "Storage opened");

        Ok(Self {
            paths,
            accounts,
            records,
            audit,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &AbaPaths {
        &self.paths
    }

    /// Append an audit event
    ///
    /// A failed append is logged and swallowed; it never undoes the
    /// operation that triggered it.
    pub fn log_event(&mut self, event: AuditEventType, subject: Option<&UserId>) {
        if let Err(e) = self.audit.append(event, subject) {
            error!(event = %event, error = %e, "Failed to write audit entry");
        }
    }

    /// Commit records, close the audit log and persist accounts
    ///
    /// Each step runs regardless of whether an earlier one failed.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let report = ShutdownReport {
            records: self.records.commit().err(),
            audit: self.audit.close().err(),
            accounts: self.accounts.persist().err(),
        };

        for (store, e) in report.failures() {
            error!(store, error = %e, "Failed to close store");
        }
        if report.is_clean() {
            info!("Storage closed");
        }

        report
    }
}
