//! Record store
//!
//! Owns every address-book record, keyed by `(owner, record_id)`. Each
//! committed mutation rewrites `records.json` atomically before returning,
//! so a successful insert or delete is durable.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{AbaError, AbaResult};
use crate::models::{ContactFields, Record, RecordId, UserId};

use super::file_io::{read_json, write_json_atomic};

type RecordKey = (UserId, RecordId);

/// Per-owner record storage with a global `(owner, record_id)` uniqueness constraint
pub struct RecordStore {
    path: PathBuf,
    records: BTreeMap<RecordKey, ContactFields>,
}

impl RecordStore {
    /// Load records from disk
    pub fn open(path: PathBuf) -> AbaResult<Self> {
        let file_data: Vec<Record> = read_json(&path)?;
        let mut records = BTreeMap::new();

        for record in file_data {
            let key = (record.owner, record.record_id);
            if records.insert(key.clone(), record.fields).is_some() {
                return Err(AbaError::Storage(format!(
                    "Duplicate record {} for {} in {}",
                    key.1,
                    key.0,
                    path.display()
                )));
            }
        }

        debug!(count = records.len(), path = %path.display(), "Loaded records");
        Ok(Self { path, records })
    }

    /// A template with every field empty, to be filled in before [`insert`](Self::insert)
    pub fn create_empty(&self, owner: &UserId, record_id: &RecordId) -> Record {
        Record::empty(owner.clone(), record_id.clone())
    }

    /// Insert a new record
    pub fn insert(&mut self, record: Record) -> AbaResult<()> {
        let key = (record.owner, record.record_id);

        if self.records.contains_key(&key) {
            return Err(AbaError::duplicate_record(key.1.as_str()));
        }

        self.records.insert(key.clone(), record.fields);
        if let Err(e) = self.commit() {
            self.records.remove(&key);
            return Err(e);
        }

        debug!(owner = %key.0, record_id = %key.1, "Record inserted");
        Ok(())
    }

    /// Delete one record
    pub fn delete_one(&mut self, owner: &UserId, record_id: &RecordId) -> AbaResult<()> {
        let key = (owner.clone(), record_id.clone());

        let removed = self
            .records
            .remove(&key)
            .ok_or_else(|| AbaError::record_not_found(record_id.as_str()))?;

        if let Err(e) = self.commit() {
            self.records.insert(key, removed);
            return Err(e);
        }

        debug!(owner = %owner, record_id = %record_id, "Record deleted");
        Ok(())
    }

    /// Delete every record an owner has
    ///
    /// Returns how many were removed; zero is not an error.
    pub fn delete_all_for_owner(&mut self, owner: &UserId) -> AbaResult<usize> {
        let keys: Vec<RecordKey> = self
            .records
            .keys()
            .filter(|key| &key.0 == owner)
            .cloned()
            .collect();

        if keys.is_empty() {
            return Ok(0);
        }

        let removed: Vec<(RecordKey, ContactFields)> = keys
            .into_iter()
            .filter_map(|k| self.records.remove(&k).map(|v| (k, v)))
            .collect();

        if let Err(e) = self.commit() {
            self.records.extend(removed);
            return Err(e);
        }

        info!(owner = %owner, count = removed.len(), "Deleted all records for owner");
        Ok(removed.len())
    }

    /// Read one record, or all of an owner's records when `record_id` is `None`
    ///
    /// Returns `NotFound` when nothing matches.
    pub fn read(&self, owner: &UserId, record_id: Option<&RecordId>) -> AbaResult<Vec<Record>> {
        let found: Vec<Record> = match record_id {
            Some(id) => self
                .records
                .get(&(owner.clone(), id.clone()))
                .map(|fields| Record {
                    owner: owner.clone(),
                    record_id: id.clone(),
                    fields: fields.clone(),
                })
                .into_iter()
                .collect(),
            None => self
                .records
                .iter()
                .filter(|(key, _)| &key.0 == owner)
                .map(|((o, id), fields)| Record {
                    owner: o.clone(),
                    record_id: id.clone(),
                    fields: fields.clone(),
                })
                .collect(),
        };

        if found.is_empty() {
            let identifier = record_id.map_or_else(|| owner.to_string(), |id| id.to_string());
            return Err(AbaError::record_not_found(identifier));
        }

        Ok(found)
    }

    /// Whether a record exists
    pub fn contains(&self, owner: &UserId, record_id: &RecordId) -> bool {
        self.records
            .contains_key(&(owner.clone(), record_id.clone()))
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.records.len()
    }

    /// Write the whole table to disk
    pub fn commit(&self) -> AbaResult<()> {
        let file_data: Vec<Record> = self
            .records
            .iter()
            .map(|((owner, record_id), fields)| Record {
                owner: owner.clone(),
                record_id: record_id.clone(),
                fields: fields.clone(),
            })
            .collect();

        write_json_atomic(&self.path, &file_data)
    }
}
