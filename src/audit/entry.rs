//! Audit entry data structures
//!
//! One entry per line: `timestamp,code,subject`. The timestamp is local time
//! in a human-readable format; the subject is the account the event is
//! about, or `(None)` when there isn't a valid one.

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::Local;

use crate::models::UserId;

/// Placeholder written when an event has no valid subject
pub const NO_SUBJECT: &str = "(None)";

/// Format the current local time, or `None` if `timestamp_format` is not a
/// usable strftime string
pub fn format_timestamp(timestamp_format: &str) -> Option<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(timestamp_format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }

    let mut out = String::new();
    write!(out, "{}", Local::now().format_with_items(items.into_iter())).ok()?;
    Some(out)
}

/// Security-relevant events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventType {
    LoginFailure,
    LoginSuccess,
    FirstLogin,
    Logout,
    PasswordChangeSuccess,
    PasswordChangeFailure,
    AccountAdded,
    AccountDeleted,
}

impl AuditEventType {
    pub const ALL: [AuditEventType; 8] = [
        Self::LoginFailure,
        Self::LoginSuccess,
        Self::FirstLogin,
        Self::Logout,
        Self::PasswordChangeSuccess,
        Self::PasswordChangeFailure,
        Self::AccountAdded,
        Self::AccountDeleted,
    ];

    /// Short code stored in the log file
    pub fn code(&self) -> &'static str {
        match self {
            Self::LoginFailure => "LF",
            Self::LoginSuccess => "LS",
            Self::FirstLogin => "L1",
            Self::Logout => "LO",
            Self::PasswordChangeSuccess => "SPC",
            Self::PasswordChangeFailure => "FPC",
            Self::AccountAdded => "AU",
            Self::AccountDeleted => "DU",
        }
    }

    /// Parse a stored code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Local time, already formatted
    pub timestamp: String,

    /// What happened
    pub event: AuditEventType,

    /// Who it happened to, or [`NO_SUBJECT`]
    pub subject: String,
}

impl AuditEntry {
    /// Create an entry stamped with the current local time
    pub fn now(event: AuditEventType, subject: Option<&UserId>, timestamp_format: &str) -> Self {
        Self {
            timestamp: format_timestamp(timestamp_format)
                .unwrap_or_else(|| Local::now().format("%c").to_string()),
            event,
            subject: subject.map_or_else(|| NO_SUBJECT.to_string(), |u| u.to_string()),
        }
    }

    /// Render as one log line (without newline)
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.timestamp, self.event.code(), self.subject)
    }

    /// Parse one log line
    ///
    /// Splits from the right so the subject and code are found even if a
    /// timestamp format ever produced a comma.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.rsplitn(3, ',');
        let subject = parts.next()?.trim();
        let event = AuditEventType::from_code(parts.next()?.trim())?;
        let timestamp = parts.next()?;

        Some(Self {
            timestamp: timestamp.to_string(),
            event,
            subject: subject.to_string(),
        })
    }

    /// Whether the entry was recorded without a subject
    pub fn has_subject(&self) -> bool {
        self.subject != NO_SUBJECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for event in AuditEventType::ALL {
            assert_eq!(AuditEventType::from_code(event.code()), Some(event));
        }
        assert_eq!(AuditEventType::from_code("XX"), None);
    }

    #[test]
    fn test_entry_line() {
        let alice = UserId::new("alice").unwrap();
        let entry = AuditEntry::now(AuditEventType::LoginSuccess, Some(&alice), "%c");

        let line = entry.to_line();
        assert!(line.ends_with(",LS,alice"));
        assert_eq!(line.matches(',').count(), 2);
    }

    #[test]
    fn test_missing_subject_placeholder() {
        let entry = AuditEntry::now(AuditEventType::LoginFailure, None, "%c");
        assert_eq!(entry.subject, "(None)");
        assert!(!entry.has_subject());
        assert!(entry.to_line().ends_with(",LF,(None)"));
    }

    #[test]
    fn test_bad_timestamp_format() {
        assert!(format_timestamp("%Q").is_none());
        assert!(format_timestamp("%Y-%m-%d").is_some());

        let entry = AuditEntry::now(AuditEventType::Logout, None, "%Q");
        assert!(!entry.timestamp.is_empty());
        assert!(entry.to_line().ends_with(",LO,(None)"));
    }

    #[test]
    fn test_parse_line() {
        let entry = AuditEntry::parse_line("Sun Jul  8 00:34:60 2001,DU,bob").unwrap();
        assert_eq!(entry.timestamp, "Sun Jul  8 00:34:60 2001");
        assert_eq!(entry.event, AuditEventType::AccountDeleted);
        assert_eq!(entry.subject, "bob");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(AuditEntry::parse_line("").is_none());
        assert!(AuditEntry::parse_line("just text").is_none());
        assert!(AuditEntry::parse_line("time,ZZ,bob").is_none());
    }
}
