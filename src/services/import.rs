//! CSV import parsing
//!
//! An import file has no header row. Each line is a record id followed by
//! the eleven payload fields in schema order; the owner is never part of
//! the file. The whole file is validated before anything is applied.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{AbaError, AbaResult};
use crate::models::{ContactFields, RecordField, RecordId};

/// Columns per import line: record id plus every payload field
pub const IMPORT_COLUMNS: usize = RecordField::ALL.len() + 1;

/// One validated line of an import file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub record_id: RecordId,
    pub fields: ContactFields,
}

/// What an import changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records that did not exist before
    pub inserted: usize,
    /// Existing records overwritten by the file
    pub replaced: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.replaced
    }
}

/// Read and validate an import file
pub fn parse_import_file(path: &Path) -> AbaResult<Vec<ImportRow>> {
    if !path.exists() {
        return Err(AbaError::NotFound {
            entity_type: "File",
            identifier: path.display().to_string(),
        });
    }

    let file = File::open(path)
        .map_err(|e| AbaError::Io(format!("Can't open file {}: {}", path.display(), e)))?;
    parse_import(file)
}

/// Validate import data from any reader
///
/// Blank lines are skipped. When a record id appears more than once, the
/// last line wins.
pub fn parse_import<R: Read>(reader: R) -> AbaResult<Vec<ImportRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: BTreeMap<RecordId, ContactFields> = BTreeMap::new();

    for result in reader.records() {
        let line = result?;

        if line.iter().all(|value| value.is_empty()) {
            continue;
        }
        if line.len() != IMPORT_COLUMNS {
            return Err(AbaError::Validation(
                "Incomplete record or invalid format in import file".into(),
            ));
        }

        let record_id = RecordId::new(&line[0])?;
        let mut fields = ContactFields::default();
        for (field, value) in RecordField::ALL.into_iter().zip(line.iter().skip(1)) {
            fields.set(field, value);
        }
        rows.insert(record_id, fields);
    }

    debug!(count = rows.len(), "Import file validated");

    Ok(rows
        .into_iter()
        .map(|(record_id, fields)| ImportRow { record_id, fields })
        .collect())
}
