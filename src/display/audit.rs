//! Audit log display formatting

use crate::audit::AuditEntry;

/// Format audit entries in their stored line form
pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    entries
        .iter()
        .map(AuditEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}
