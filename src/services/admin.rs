//! Administrative operations
//!
//! Account creation and deletion, the user list, and audit log access.
//! Callers must have passed the authorization gate with `AdminOnly`.

use tracing::info;

use crate::audit::{AuditEntry, AuditEventType};
use crate::error::{AbaError, AbaResult};
use crate::models::UserId;
use crate::storage::Storage;

/// One row of the user list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    /// False until the account's first login
    pub has_password: bool,
}

/// Service for account and audit administration
pub struct AdminService<'a> {
    storage: &'a mut Storage,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Create an account with no password
    pub fn add_user(&mut self, id: &str) -> AbaResult<UserId> {
        let user = self.storage.accounts.add(id)?;
        self.storage
            .log_event(AuditEventType::AccountAdded, Some(&user));

        info!(user = %user, "Account added");
        Ok(user)
    }

    /// Delete an account and every record it owns
    ///
    /// The records go first; if they cannot be deleted the account stays.
    pub fn delete_user(&mut self, id: &str) -> AbaResult<UserId> {
        let user = self
            .storage
            .accounts
            .get(id)?
            .map(|account| account.id.clone())
            .ok_or_else(|| AbaError::account_not_found(id))?;
        if user.is_admin() {
            return Err(AbaError::Validation(
                "The admin account cannot be deleted".into(),
            ));
        }

        let removed = self.storage.records.delete_all_for_owner(&user)?;
        self.storage.accounts.remove(user.as_str())?;
        self.storage
            .log_event(AuditEventType::AccountDeleted, Some(&user));

        info!(user = %user, records = removed, "Account deleted");
        Ok(user)
    }

    /// Every account, sorted
    pub fn list_users(&self) -> AbaResult<Vec<UserSummary>> {
        self.storage
            .accounts
            .list()
            .into_iter()
            .map(|id| {
                let has_password = self.storage.accounts.has_credential(id.as_str())?;
                Ok(UserSummary { id, has_password })
            })
            .collect()
    }

    /// Audit entries, optionally only those about one account
    pub fn read_audit(&self, subject: Option<&str>) -> AbaResult<Vec<AuditEntry>> {
        self.storage.audit.read_all(subject)
    }

    /// Discard the audit log
    pub fn clear_audit(&mut self) -> AbaResult<()> {
        self.storage.audit.clear()?;
        info!("Audit log cleared");
        Ok(())
    }
}
