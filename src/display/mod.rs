//! Display formatting for terminal output

pub mod audit;
pub mod records;
pub mod users;

pub use audit::format_audit_entries;
pub use records::{format_record_line, format_record_list};
pub use users::format_user_list;
