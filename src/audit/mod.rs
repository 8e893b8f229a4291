//! Audit logging
//!
//! Records login, logout, password-change and account-lifecycle events in
//! an append-only text log. The administrator can read it (optionally
//! filtered by account) and clear it.

mod entry;
mod logger;

pub use entry::{format_timestamp, AuditEntry, AuditEventType, NO_SUBJECT};
pub use logger::AuditLog;
