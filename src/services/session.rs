//! Session management
//!
//! Tracks the single identity active in this process and runs the login,
//! first-login password setup, logout and password-change flows. Every
//! outcome of those flows is written to the audit log.

use std::fmt;

use tracing::{debug, info, warn};

use crate::audit::AuditEventType;
use crate::crypto::SecureString;
use crate::error::{AbaError, AbaResult, AccessDenial};
use crate::models::UserId;
use crate::storage::Storage;

use super::password_policy::check_new_password;

/// Shown before a new password is requested
pub const NEW_PASSWORD_NOTICE: &str = "Create a new password.\n\
Passwords may contain up to 24 upper- or lower-case letters or numbers.\n\
Choose an uncommon password that would be difficult to guess.";

const PASSWORD_PROMPT: &str = "Enter your password: ";
const NEW_PASSWORD_PROMPT: &str = "Enter new password: ";
const CONFIRM_PASSWORD_PROMPT: &str = "Reenter the same password: ";

/// Source of secrets typed by the operator
pub trait SecretPrompt {
    /// Ask for a secret without echoing it
    fn read_secret(&mut self, prompt: &str) -> AbaResult<SecureString>;

    /// Show an informational message
    fn notice(&mut self, text: &str);
}

/// Which operation classes an identity may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn of(id: &UserId) -> Self {
        if id.is_admin() {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// The logged-in identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    pub id: UserId,
    pub role: Role,
}

impl fmt::Display for ActiveUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Authentication state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    /// Waiting on the candidate's secret
    Authenticating(UserId),
    LoggedIn(ActiveUser),
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: UserId,
    pub role: Role,
    /// The account had no password and one was just set
    pub first_login: bool,
}

/// The process-wide session
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in identity, if any
    pub fn current(&self) -> Option<&ActiveUser> {
        match &self.state {
            SessionState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    /// The logged-in identity, or `NoSession`
    pub fn require_user(&self) -> AbaResult<&ActiveUser> {
        self.current()
            .ok_or(AbaError::Authorization(AccessDenial::NoSession))
    }

    pub fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    /// Log in as `user`
    ///
    /// Unknown accounts are prompted for a password exactly like real ones
    /// and then fail with the same `Authentication` error as a wrong
    /// password.
    pub fn login(
        &mut self,
        storage: &mut Storage,
        prompt: &mut dyn SecretPrompt,
        user: &str,
    ) -> AbaResult<LoginOutcome> {
        // Malformed input never reaches the audit file
        let attempted = UserId::new(user).ok();

        if !matches!(self.state, SessionState::LoggedOut) {
            storage.log_event(AuditEventType::LoginFailure, attempted.as_ref());
            return Err(AbaError::SessionActive);
        }

        let Some(candidate) = attempted else {
            storage.log_event(AuditEventType::LoginFailure, None);
            return Err(AbaError::Validation("Invalid userID".into()));
        };

        self.state = SessionState::Authenticating(candidate.clone());

        match self.authenticate(storage, prompt, &candidate) {
            Ok((id, first_login)) => {
                let role = Role::of(&id);
                self.state = SessionState::LoggedIn(ActiveUser {
                    id: id.clone(),
                    role,
                });

                storage.log_event(AuditEventType::LoginSuccess, Some(&id));
                if first_login {
                    storage.log_event(AuditEventType::FirstLogin, Some(&id));
                }
                info!(user = %id, first_login, "Login succeeded");

                Ok(LoginOutcome {
                    user: id,
                    role,
                    first_login,
                })
            }
            Err(e) => {
                self.state = SessionState::LoggedOut;
                // Known accounts are audited under their stored spelling
                let subject = storage
                    .accounts
                    .get(candidate.as_str())
                    .ok()
                    .flatten()
                    .map_or_else(|| candidate.clone(), |a| a.id.clone());
                storage.log_event(AuditEventType::LoginFailure, Some(&subject));
                warn!(user = %subject, error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Returns the account's stored spelling and whether this was a first login
    fn authenticate(
        &self,
        storage: &mut Storage,
        prompt: &mut dyn SecretPrompt,
        candidate: &UserId,
    ) -> AbaResult<(UserId, bool)> {
        let Some(account) = storage.accounts.get(candidate.as_str())? else {
            let secret = prompt.read_secret(PASSWORD_PROMPT)?;
            storage.accounts.verify(candidate.as_str(), &secret)?;
            debug!(user = %candidate, "Login attempt for unknown account");
            return Err(AbaError::Authentication);
        };
        let id = account.id.clone();

        if account.credential.is_set() {
            let secret = prompt.read_secret(PASSWORD_PROMPT)?;
            if storage.accounts.verify(id.as_str(), &secret)? {
                Ok((id, false))
            } else {
                Err(AbaError::Authentication)
            }
        } else {
            let secret = read_new_password(prompt)?;
            storage.accounts.set_credential(id.as_str(), &secret)?;
            Ok((id, true))
        }
    }

    /// End the session
    pub fn logout(&mut self, storage: &mut Storage) -> AbaResult<UserId> {
        let user = self.require_user()?.id.clone();

        self.state = SessionState::LoggedOut;
        storage.log_event(AuditEventType::Logout, Some(&user));
        info!(user = %user, "Logged out");

        Ok(user)
    }

    /// Replace the current user's password
    pub fn change_password(
        &mut self,
        storage: &mut Storage,
        prompt: &mut dyn SecretPrompt,
    ) -> AbaResult<()> {
        let user = self.require_user()?.id.clone();

        let result = read_new_password(prompt)
            .and_then(|secret| storage.accounts.set_credential(user.as_str(), &secret));

        match result {
            Ok(()) => {
                storage.log_event(AuditEventType::PasswordChangeSuccess, Some(&user));
                info!(user = %user, "Password changed");
                Ok(())
            }
            Err(e) => {
                storage.log_event(AuditEventType::PasswordChangeFailure, Some(&user));
                warn!(user = %user, error = %e, "Password change failed");
                Err(e)
            }
        }
    }
}

/// Double-entry new password, checked against the strength policy
fn read_new_password(prompt: &mut dyn SecretPrompt) -> AbaResult<SecureString> {
    prompt.notice(NEW_PASSWORD_NOTICE);
    let first = prompt.read_secret(NEW_PASSWORD_PROMPT)?;
    let second = prompt.read_secret(CONFIRM_PASSWORD_PROMPT)?;

    check_new_password(&first, &second).map_err(AbaError::PasswordRejected)?;
    Ok(second)
}
