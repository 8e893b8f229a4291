//! Record service
//!
//! Address-book operations for the logged-in user. The owner always comes
//! from the session; nothing the user types can change it.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{AbaError, AbaResult};
use crate::models::{parse_field_selection, Record, RecordField, RecordId, RecordPatch, UserId};
use crate::storage::Storage;

use super::import::{parse_import_file, ImportSummary};

/// Selected fields of one record, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub record_id: RecordId,
    pub values: Vec<(RecordField, String)>,
}

impl RecordView {
    /// Project a record onto the chosen fields, in the order given
    pub fn project(record: &Record, fields: &[RecordField]) -> Self {
        Self {
            record_id: record.record_id.clone(),
            values: fields
                .iter()
                .map(|&f| (f, record.fields.get(f).to_string()))
                .collect(),
        }
    }

    /// Value of one field, if it was selected
    pub fn value(&self, field: RecordField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }
}

/// Service for the current user's records
pub struct RecordService<'a> {
    storage: &'a mut Storage,
    owner: UserId,
}

impl<'a> RecordService<'a> {
    /// Create a record service acting for `owner`
    pub fn new(storage: &'a mut Storage, owner: UserId) -> Self {
        Self { storage, owner }
    }

    /// Create a record; unnamed fields start empty
    pub fn add<S: AsRef<str>>(&mut self, record_id: &str, assignments: &[S]) -> AbaResult<()> {
        let record_id = RecordId::new(record_id)?;
        let patch = RecordPatch::parse(assignments)?;

        let mut record = self.storage.records.create_empty(&self.owner, &record_id);
        record.assign(&patch);
        self.storage.records.insert(record)?;

        info!(owner = %self.owner, record_id = %record_id, "Record added");
        Ok(())
    }

    /// Delete a record
    pub fn delete(&mut self, record_id: &str) -> AbaResult<()> {
        let record_id = RecordId::new(record_id)?;
        self.storage.records.delete_one(&self.owner, &record_id)?;

        info!(owner = %self.owner, record_id = %record_id, "Record deleted");
        Ok(())
    }

    /// Replace a record with its stored values overlaid by the non-empty
    /// values in `assignments`
    ///
    /// The old record is deleted before the merged one is inserted; a
    /// failure between those two commits loses the record.
    pub fn edit<S: AsRef<str>>(&mut self, record_id: &str, assignments: &[S]) -> AbaResult<()> {
        let record_id = RecordId::new(record_id)?;
        let patch = RecordPatch::parse(assignments)?;

        let mut record = self
            .storage
            .records
            .read(&self.owner, Some(&record_id))?
            .into_iter()
            .next()
            .ok_or_else(|| AbaError::record_not_found(record_id.as_str()))?;
        record.merge(&patch);

        self.storage.records.delete_one(&self.owner, &record_id)?;
        self.storage.records.insert(record)?;

        info!(owner = %self.owner, record_id = %record_id, fields = patch.len(), "Record edited");
        Ok(())
    }

    /// Read one record, showing the named fields (all when none are named)
    pub fn read<S: AsRef<str>>(&self, record_id: &str, field_names: &[S]) -> AbaResult<Vec<RecordView>> {
        let record_id = RecordId::new(record_id)?;
        let fields = parse_field_selection(field_names)?;
        self.read_views(Some(&record_id), &fields)
    }

    /// Read every record the user owns
    pub fn read_all<S: AsRef<str>>(&self, field_names: &[S]) -> AbaResult<Vec<RecordView>> {
        let fields = parse_field_selection(field_names)?;
        self.read_views(None, &fields)
    }

    /// Load records from a CSV file, replacing any with the same id
    ///
    /// Nothing is applied unless every line of the file is valid.
    pub fn import(&mut self, path: &Path) -> AbaResult<ImportSummary> {
        let rows = parse_import_file(path)?;
        let mut summary = ImportSummary::default();

        for row in rows {
            if self.storage.records.contains(&self.owner, &row.record_id) {
                self.storage.records.delete_one(&self.owner, &row.record_id)?;
                summary.replaced += 1;
            } else {
                summary.inserted += 1;
            }

            let mut record = self.storage.records.create_empty(&self.owner, &row.record_id);
            record.fields = row.fields;
            self.storage.records.insert(record)?;
        }

        info!(
            owner = %self.owner,
            inserted = summary.inserted,
            replaced = summary.replaced,
            path = %path.display(),
            "Records imported"
        );
        Ok(summary)
    }

    /// Every record the user owns, unprojected
    pub fn records(&self) -> AbaResult<Vec<Record>> {
        self.storage.records.read(&self.owner, None)
    }

    fn read_views(
        &self,
        record_id: Option<&RecordId>,
        fields: &[RecordField],
    ) -> AbaResult<Vec<RecordView>> {
        let records = self.storage.records.read(&self.owner, record_id)?;
        debug!(owner = %self.owner, count = records.len(), "Records read");

        Ok(records
            .iter()
            .map(|r| RecordView::project(r, fields))
            .collect())
    }
}
