//! Service layer for the address book
//!
//! Business rules on top of the storage layer: the session state machine,
//! the authorization gate, and the admin and record operations it guards.

pub mod admin;
pub mod authorization;
pub mod import;
pub mod password_policy;
pub mod records;
pub mod session;

pub use admin::{AdminService, UserSummary};
pub use authorization::{authorize, OperationClass};
pub use import::{ImportRow, ImportSummary};
pub use password_policy::check_strength;
pub use records::{RecordService, RecordView};
pub use session::{ActiveUser, LoginOutcome, Role, SecretPrompt, SessionManager, SessionState};
