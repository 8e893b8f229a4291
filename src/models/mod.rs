//! Core data models for the address book
//!
//! Identifiers, accounts and the fixed-schema address records.

pub mod account;
pub mod ids;
pub mod record;

pub use account::{Account, Credential};
pub use ids::{is_valid_identifier, RecordId, UserId, ADMIN_USER, MAX_IDENTIFIER_LEN};
pub use record::{
    parse_field_selection, ContactFields, Record, RecordField, RecordPatch, OWNER_FIELD,
    RECORD_ID_FIELD,
};
