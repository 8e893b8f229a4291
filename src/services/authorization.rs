//! Authorization gate
//!
//! A pure decision over the session state and the class of operation
//! requested. The administrator never touches address-book records and
//! regular users never run administrative operations.

use crate::error::AccessDenial;

use super::session::{Role, SessionManager};

/// Groups of operations with the same access rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// User management and the audit log
    AdminOnly,
    /// Reading and writing the caller's own records
    UserRecordOnly,
    /// Any logged-in identity
    AuthenticatedAny,
    /// Allowed with or without a session
    UnauthenticatedAllowed,
}

/// Decide whether the current session may run an operation of `class`
pub fn authorize(session: &SessionManager, class: OperationClass) -> Result<(), AccessDenial> {
    decide(session.current().map(|user| user.role), class)
}

fn decide(role: Option<Role>, class: OperationClass) -> Result<(), AccessDenial> {
    use OperationClass::*;

    match (role, class) {
        (_, UnauthenticatedAllowed) => Ok(()),
        (None, _) => Err(AccessDenial::NoSession),
        (Some(_), AuthenticatedAny) => Ok(()),
        (Some(Role::Admin), AdminOnly) => Ok(()),
        (Some(Role::Admin), UserRecordOnly) => Err(AccessDenial::AdminNotAuthorized),
        (Some(Role::User), AdminOnly) => Err(AccessDenial::AdminNotActive),
        (Some(Role::User), UserRecordOnly) => Ok(()),
    }
}
