//! Custom error types for the address book
//!
//! Every core operation returns an `AbaResult`. The variants are grouped into
//! a small, closed set of [`ErrorKind`]s so the dispatcher can decide how to
//! present a failure without string-matching on messages.

use std::fmt;

use thiserror::Error;

/// Why the authorization gate refused an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// Nobody is logged in
    NoSession,
    /// The administrator tried to touch address-book records
    AdminNotAuthorized,
    /// A regular user tried an administrative operation
    AdminNotActive,
}

impl fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => write!(f, "No active login session"),
            Self::AdminNotAuthorized => write!(f, "Admin not authorized"),
            Self::AdminNotActive => write!(f, "Admin not active"),
        }
    }
}

/// Why a proposed new password was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRejection {
    /// The two entries differ
    Mismatch,
    /// Wrong length or a non-alphanumeric character
    BadFormat,
    /// On the deny-list of commonly breached passwords
    TooCommon,
}

impl fmt::Display for PasswordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch => write!(f, "Passwords do not match"),
            Self::BadFormat => write!(f, "Password must be 1-24 alphanumeric characters"),
            Self::TooCommon => write!(f, "Password is too easy to guess"),
        }
    }
}

/// Coarse classification of every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    StorageIo,
}

/// The main error type for address book operations
#[derive(Error, Debug)]
pub enum AbaError {
    /// Malformed identifier, record id, field name or command
    #[error("{0}")]
    Validation(String),

    /// A new password failed confirmation or the strength policy
    #[error("{0}")]
    PasswordRejected(PasswordRejection),

    /// Unknown account or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    Authentication,

    /// Session or role violation
    #[error("{0}")]
    Authorization(AccessDenial),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A login was attempted while another session is active
    #[error("An account is currently active; logout before proceeding")]
    SessionActive,

    /// Terminal or file I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AbaError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Create a "duplicate" error for records
    pub fn duplicate_record(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::PasswordRejected(_) => ErrorKind::Validation,
            Self::Authentication => ErrorKind::Authentication,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::SessionActive => ErrorKind::Conflict,
            Self::Io(_) | Self::Storage(_) | Self::Config(_) => ErrorKind::StorageIo,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<std::io::Error> for AbaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AbaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for AbaError {
    fn from(err: csv::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for address book operations
pub type AbaResult<T> = Result<T, AbaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_messages_are_distinct() {
        let no_session = AbaError::Authorization(AccessDenial::NoSession).to_string();
        let admin = AbaError::Authorization(AccessDenial::AdminNotAuthorized).to_string();
        let user = AbaError::Authorization(AccessDenial::AdminNotActive).to_string();

        assert_eq!(no_session, "No active login session");
        assert_eq!(admin, "Admin not authorized");
        assert_eq!(user, "Admin not active");
    }

    #[test]
    fn test_not_found_error() {
        let err = AbaError::record_not_found("rec1");
        assert_eq!(err.to_string(), "Record not found: rec1");
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_conflict_kinds() {
        assert_eq!(AbaError::SessionActive.kind(), ErrorKind::Conflict);
        assert_eq!(AbaError::duplicate_record("rec1").kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_password_rejection_is_validation() {
        let err = AbaError::PasswordRejected(PasswordRejection::TooCommon);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Password is too easy to guess");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let aba_err: AbaError = io_err.into();
        assert!(matches!(aba_err, AbaError::Io(_)));
        assert_eq!(aba_err.kind(), ErrorKind::StorageIo);
    }
}
