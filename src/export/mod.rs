//! Export of address-book records
//!
//! CSV only, in the layout the importer accepts.

pub mod csv;

pub use self::csv::{export_records_csv, export_user_records};
