//! Audit log for security-relevant events
//!
//! The log file stays open for the life of the process. Each append is
//! written and flushed before returning.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{AbaError, AbaResult};
use crate::models::UserId;

use super::entry::{AuditEntry, AuditEventType};

/// Append-only log of login, logout, password and account events
pub struct AuditLog {
    log_path: PathBuf,
    file: File,
    timestamp_format: String,
}

impl AuditLog {
    /// Open (or create) the audit log at the given path
    pub fn open(log_path: PathBuf, timestamp_format: impl Into<String>) -> AbaResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&log_path)
            .map_err(|e| AbaError::Io(format!("Failed to open audit log: {}", e)))?;

        debug!(path = %log_path.display(), "Audit log opened");

        Ok(Self {
            log_path,
            file,
            timestamp_format: timestamp_format.into(),
        })
    }

    /// Record an event
    ///
    /// `subject` is `None` when there is no syntactically valid identifier to
    /// record.
    pub fn append(&mut self, event: AuditEventType, subject: Option<&UserId>) -> AbaResult<()> {
        let entry = AuditEntry::now(event, subject, &self.timestamp_format);

        writeln!(self.file, "{}", entry.to_line())
            .map_err(|e| AbaError::Io(format!("Failed to write audit entry: {}", e)))?;

        self.file
            .flush()
            .map_err(|e| AbaError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read entries in chronological order
    ///
    /// With a subject filter, only entries whose subject matches exactly are
    /// returned.
    pub fn read_all(&self, subject: Option<&str>) -> AbaResult<Vec<AuditEntry>> {
        let mut reader = self
            .file
            .try_clone()
            .map_err(|e| AbaError::Io(format!("Failed to open audit log: {}", e)))?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| AbaError::Io(format!("Failed to read audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| {
                AbaError::Io(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match AuditEntry::parse_line(&line) {
                Some(entry) => {
                    if subject.map_or(true, |s| entry.subject == s) {
                        entries.push(entry);
                    }
                }
                None => warn!(line = line_num + 1, "Skipping malformed audit entry"),
            }
        }

        Ok(entries)
    }

    /// Discard every entry
    pub fn clear(&mut self) -> AbaResult<()> {
        self.file
            .set_len(0)
            .map_err(|e| AbaError::Io(format!("Failed to clear audit log: {}", e)))?;
        debug!(path = %self.log_path.display(), "Audit log cleared");
        Ok(())
    }

    /// Flush and sync the log before shutdown
    pub fn close(&mut self) -> AbaResult<()> {
        self.file
            .flush()
            .and_then(|_| self.file.sync_all())
            .map_err(|e| AbaError::Io(format!("Failed to close audit log: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_log() -> (TempDir, AuditLog) {
        let temp_dir = TempDir::new().unwrap();
        let log = AuditLog::open(temp_dir.path().join("audit.log"), "%c").unwrap();
        (temp_dir, log)
    }

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[test]
    fn test_append_and_read() {
        let (_temp_dir, mut log) = create_test_log();

        log.append(AuditEventType::AccountAdded, Some(&user("alice")))
            .unwrap();
        log.append(AuditEventType::LoginFailure, None).unwrap();

        let entries = log.read_all(None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, AuditEventType::AccountAdded);
        assert_eq!(entries[0].subject, "alice");
        assert_eq!(entries[1].subject, "(None)");
    }

    #[test]
    fn test_append_is_visible_on_disk() {
        let (temp_dir, mut log) = create_test_log();
        log.append(AuditEventType::Logout, Some(&user("bob"))).unwrap();

        let contents = std::fs::read_to_string(temp_dir.path().join("audit.log")).unwrap();
        assert!(contents.ends_with(",LO,bob\n"));
    }

    #[test]
    fn test_filter_is_exact() {
        let (_temp_dir, mut log) = create_test_log();
        log.append(AuditEventType::AccountAdded, Some(&user("bob")))
            .unwrap();
        log.append(AuditEventType::AccountAdded, Some(&user("bobby")))
            .unwrap();
        log.append(AuditEventType::LoginSuccess, Some(&user("bob")))
            .unwrap();

        let entries = log.read_all(Some("bob")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.subject == "bob"));
        assert!(log.read_all(Some("carol")).unwrap().is_empty());
    }

    #[test]
    fn test_clear_then_append() {
        let (_temp_dir, mut log) = create_test_log();
        log.append(AuditEventType::AccountAdded, Some(&user("alice")))
            .unwrap();

        log.clear().unwrap();
        assert!(log.read_all(None).unwrap().is_empty());

        log.append(AuditEventType::AccountDeleted, Some(&user("alice")))
            .unwrap();
        let entries = log.read_all(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, AuditEventType::AccountDeleted);
    }

    #[test]
    fn test_existing_log_is_appended() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit.log");
        std::fs::write(&path, "Mon Jan  1 00:00:00 2024,AU,alice\ngarbage\n").unwrap();

        let mut log = AuditLog::open(path, "%c").unwrap();
        log.append(AuditEventType::LoginSuccess, Some(&user("alice")))
            .unwrap();

        let entries = log.read_all(Some("alice")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp, "Mon Jan  1 00:00:00 2024");
    }
}
