//! Validated identifier newtypes
//!
//! Account names and record ids share one syntax: 1 to 16 alphanumeric
//! characters. Wrapping them means anything that reaches storage has already
//! been checked, and the two can never be swapped by accident.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AbaError;

/// Maximum identifier length, in characters
pub const MAX_IDENTIFIER_LEN: usize = 16;

/// The built-in administrator account
pub const ADMIN_USER: &str = "admin";

/// Check the shared identifier syntax
pub fn is_valid_identifier(s: &str) -> bool {
    let len = s.chars().count();
    (1..=MAX_IDENTIFIER_LEN).contains(&len) && s.chars().all(char::is_alphanumeric)
}

/// Macro to generate validated identifier newtypes
macro_rules! define_identifier {
    ($name:ident, $invalid_message:literal) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier
            pub fn new(s: impl Into<String>) -> Result<Self, AbaError> {
                let s = s.into();
                if is_valid_identifier(&s) {
                    Ok(Self(s))
                } else {
                    Err(AbaError::Validation($invalid_message.to_string()))
                }
            }

            /// The identifier as typed
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = AbaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = AbaError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_identifier!(UserId, "Invalid userID");
define_identifier!(RecordId, "Invalid record_id");

impl UserId {
    /// The administrator's identifier
    pub fn admin() -> Self {
        Self(ADMIN_USER.to_string())
    }

    /// Whether this is the administrator (in any letter case)
    pub fn is_admin(&self) -> bool {
        self.0.to_lowercase() == ADMIN_USER
    }

    /// Lower-cased form used for comparisons
    pub fn canonical(&self) -> String {
        self.0.to_lowercase()
    }
}

// User ids keep their spelling but compare case-insensitively
impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for UserId {}

impl Hash for UserId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl PartialOrd for UserId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
