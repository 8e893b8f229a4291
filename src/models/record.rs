//! Address-book record model
//!
//! A record is keyed by `(owner, record_id)` and carries a fixed schema of
//! eleven text fields. The key is never part of [`RecordField`], so no
//! user-supplied `name=value` assignment can reach the owner or the id.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{RecordId, UserId};
use crate::error::{AbaError, AbaResult};

/// Reserved name of the owner column
pub const OWNER_FIELD: &str = "uname";

/// Reserved name of the record id column
pub const RECORD_ID_FIELD: &str = "recordid";

/// An editable record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    Surname,
    GivenName,
    PersonalEmail,
    WorkEmail,
    PersonalPhone,
    WorkPhone,
    StreetAddress,
    City,
    StateProvince,
    Country,
    PostalCode,
}

impl RecordField {
    /// All fields in storage/export order
    pub const ALL: [RecordField; 11] = [
        Self::Surname,
        Self::GivenName,
        Self::PersonalEmail,
        Self::WorkEmail,
        Self::PersonalPhone,
        Self::WorkPhone,
        Self::StreetAddress,
        Self::City,
        Self::StateProvince,
        Self::Country,
        Self::PostalCode,
    ];

    /// Short field name used on the command line and in output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Surname => "sn",
            Self::GivenName => "gn",
            Self::PersonalEmail => "pem",
            Self::WorkEmail => "wem",
            Self::PersonalPhone => "pph",
            Self::WorkPhone => "wph",
            Self::StreetAddress => "sa",
            Self::City => "city",
            Self::StateProvince => "stp",
            Self::Country => "cty",
            Self::PostalCode => "pc",
        }
    }

    /// Human description for help output
    pub fn description(&self) -> &'static str {
        match self {
            Self::Surname => "Surname",
            Self::GivenName => "Given name",
            Self::PersonalEmail => "Personal email",
            Self::WorkEmail => "Work email",
            Self::PersonalPhone => "Personal phone",
            Self::WorkPhone => "Work phone",
            Self::StreetAddress => "Street address",
            Self::City => "City",
            Self::StateProvince => "State/province",
            Self::Country => "Country",
            Self::PostalCode => "Postal code",
        }
    }

    /// Look up a field by name (case-insensitive)
    ///
    /// Returns `None` for unknown names, including the reserved key columns.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eleven payload fields of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub sn: String,
    #[serde(default)]
    pub gn: String,
    #[serde(default)]
    pub pem: String,
    #[serde(default)]
    pub wem: String,
    #[serde(default)]
    pub pph: String,
    #[serde(default)]
    pub wph: String,
    #[serde(default)]
    pub sa: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub stp: String,
    #[serde(default)]
    pub cty: String,
    #[serde(default)]
    pub pc: String,
}

impl ContactFields {
    /// Read one field
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::Surname => &self.sn,
            RecordField::GivenName => &self.gn,
            RecordField::PersonalEmail => &self.pem,
            RecordField::WorkEmail => &self.wem,
            RecordField::PersonalPhone => &self.pph,
            RecordField::WorkPhone => &self.wph,
            RecordField::StreetAddress => &self.sa,
            RecordField::City => &self.city,
            RecordField::StateProvince => &self.stp,
            RecordField::Country => &self.cty,
            RecordField::PostalCode => &self.pc,
        }
    }

    /// Overwrite one field
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        let slot = match field {
            RecordField::Surname => &mut self.sn,
            RecordField::GivenName => &mut self.gn,
            RecordField::PersonalEmail => &mut self.pem,
            RecordField::WorkEmail => &mut self.wem,
            RecordField::PersonalPhone => &mut self.pph,
            RecordField::WorkPhone => &mut self.wph,
            RecordField::StreetAddress => &mut self.sa,
            RecordField::City => &mut self.city,
            RecordField::StateProvince => &mut self.stp,
            RecordField::Country => &mut self.cty,
            RecordField::PostalCode => &mut self.pc,
        };
        *slot = value.into();
    }

    /// Values in schema order
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        RecordField::ALL.into_iter().map(move |f| self.get(f))
    }
}

/// A complete address-book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Account that created the record
    pub owner: UserId,

    /// Owner-scoped identifier
    pub record_id: RecordId,

    /// Payload
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Record {
    /// A template with every field empty
    pub fn empty(owner: UserId, record_id: RecordId) -> Self {
        Self {
            owner,
            record_id,
            fields: ContactFields::default(),
        }
    }

    /// Overwrite every field named in the patch, empty values included
    pub fn assign(&mut self, patch: &RecordPatch) {
        for (field, value) in patch.iter() {
            self.fields.set(field, value);
        }
    }

    /// Overwrite only the fields the patch gives a non-empty value
    pub fn merge(&mut self, patch: &RecordPatch) {
        for (field, value) in patch.iter() {
            if !value.is_empty() {
                self.fields.set(field, value);
            }
        }
    }
}

/// A bounded set of `field -> new value` assignments
///
/// Built only from [`RecordField`] keys, so the owner and record id are
/// unreachable through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    values: BTreeMap<RecordField, String>,
}

impl RecordPatch {
    /// Parse `name=value` assignments typed by the user
    ///
    /// Names are case-insensitive and must be one of the eleven payload
    /// fields. Values may be empty. A later assignment to the same field wins.
    pub fn parse<S: AsRef<str>>(assignments: &[S]) -> AbaResult<Self> {
        let mut patch = Self::default();

        for assignment in assignments {
            let (name, value) = assignment
                .as_ref()
                .split_once('=')
                .ok_or_else(invalid_fields)?;

            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(invalid_fields());
            }

            let field = RecordField::parse(name).ok_or_else(invalid_fields)?;
            patch.set(field, value);
        }

        Ok(patch)
    }

    /// Add or replace one assignment
    pub fn set(&mut self, field: RecordField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    #[cfg(test)]
    pub(crate) fn get(&self, field: RecordField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Iterate over assignments in schema order
    pub fn iter(&self) -> impl Iterator<Item = (RecordField, &str)> + '_ {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

fn invalid_fields() -> AbaError {
    AbaError::Validation("One or more invalid record data fields".into())
}

/// Parse a list of field names to display
///
/// An empty list selects every field. The key columns are not selectable.
pub fn parse_field_selection<S: AsRef<str>>(names: &[S]) -> AbaResult<Vec<RecordField>> {
    if names.is_empty() {
        return Ok(RecordField::ALL.to_vec());
    }

    names
        .iter()
        .map(|name| {
            RecordField::parse(name.as_ref())
                .ok_or_else(|| AbaError::Validation("Invalid fieldname(s)".into()))
        })
        .collect()
}
