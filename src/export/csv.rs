//! CSV export of a user's records
//!
//! Same layout the importer reads: no header, record id first, then the
//! eleven payload fields in schema order. The owner is never written.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use csv::WriterBuilder;
use tracing::{info, warn};

use crate::error::{AbaError, AbaResult};
use crate::models::{Record, UserId};
use crate::storage::Storage;

/// Write records as CSV lines, returning how many were written
pub fn export_records_csv<W: Write>(records: &[Record], writer: W) -> AbaResult<usize> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    for record in records {
        let row = std::iter::once(record.record_id.as_str()).chain(record.fields.values());
        writer.write_record(row)?;
    }

    writer
        .flush()
        .map_err(|e| AbaError::Io(format!("Can't write to output file: {}", e)))?;
    Ok(records.len())
}

/// Export every record `owner` has to a new file at `path`
///
/// Never overwrites: an existing path is a `Duplicate` error. An owner with
/// no records gets an empty file.
pub fn export_user_records(storage: &Storage, owner: &UserId, path: &Path) -> AbaResult<usize> {
    let records = match storage.records.read(owner, None) {
        Ok(records) => records,
        Err(e) if e.is_not_found() => Vec::new(),
        Err(e) => return Err(e),
    };

    let count = write_new_file(path, |file| export_records_csv(&records, file))?;
    info!(owner = %owner, count, path = %path.display(), "Records exported");
    Ok(count)
}

/// Create `path`, which must not exist, and fill it with `write`
///
/// A failed write removes the partial file.
fn write_new_file<F>(path: &Path, write: F) -> AbaResult<usize>
where
    F: FnOnce(File) -> AbaResult<usize>,
{
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => AbaError::Duplicate {
                entity_type: "File",
                identifier: path.display().to_string(),
            },
            _ => AbaError::Io(format!("Can't open output file {}: {}", path.display(), e)),
        })?;

    write(file).inspect_err(|_| {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial export");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use crate::services::import::parse_import;
    use crate::services::RecordService;
    use crate::services::session::tests::create_test_storage;

    fn record(owner: &str, id: &str, sn: &str) -> Record {
        let mut record = Record::empty(UserId::new(owner).unwrap(), RecordId::new(id).unwrap());
        record.fields.sn = sn.to_string();
        record
    }

    #[test]
    fn test_csv_layout() {
        let mut output = Vec::new();
        let count = export_records_csv(&[record("alice", "rec1", "Doe")], &mut output).unwrap();

        assert_eq!(count, 1);
        assert_eq!(String::from_utf8(output).unwrap(), "rec1,Doe,,,,,,,,,,\n");
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let mut output = Vec::new();
        export_records_csv(&[record("alice", "rec1", "Doe, Jr.")], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("rec1,\"Doe, Jr.\","));
        let rows = parse_import(text.as_bytes()).unwrap();
        assert_eq!(rows[0].fields.sn, "Doe, Jr.");
    }

    #[test]
    fn test_export_only_owner_records() {
        let (temp_dir, mut storage) = create_test_storage();
        storage.records.insert(record("alice", "b", "Bee")).unwrap();
        storage.records.insert(record("alice", "a", "Ay")).unwrap();
        storage.records.insert(record("bob", "c", "Cee")).unwrap();

        let path = temp_dir.path().join("out.csv");
        let alice = UserId::new("alice").unwrap();
        assert_eq!(export_user_records(&storage, &alice, &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let ids: Vec<&str> = text.lines().map(|l| l.split(',').next().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_export_never_overwrites() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("out.csv");
        std::fs::write(&path, "keep me").unwrap();

        let alice = UserId::new("alice").unwrap();
        let err = export_user_records(&storage, &alice, &path).unwrap_err();
        assert!(matches!(err, AbaError::Duplicate { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_export_with_no_records() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("out.csv");

        let alice = UserId::new("alice").unwrap();
        assert_eq!(export_user_records(&storage, &alice, &path).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_failed_write_removes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        let err = write_new_file(&path, |_| Err(AbaError::Io("disk full".into()))).unwrap_err();
        assert!(matches!(err, AbaError::Io(_)));
        assert!(!path.exists());

        assert_eq!(write_new_file(&path, |_| Ok(0)).unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_export_then_import_restores_fields() {
        let (temp_dir, mut storage) = create_test_storage();
        let alice = UserId::new("alice").unwrap();

        let mut quoted = record("alice", "rec1", "Doe, Jr.");
        quoted.fields.gn = "John \"JJ\"".to_string();
        quoted.fields.sa = "1 Main St, Apt 2".to_string();
        quoted.fields.pc = "02134".to_string();
        let mut sparse = record("alice", "rec2", "");
        sparse.fields.city = "Boston".to_string();
        storage.records.insert(quoted.clone()).unwrap();
        storage.records.insert(sparse.clone()).unwrap();

        let path = temp_dir.path().join("backup.csv");
        assert_eq!(export_user_records(&storage, &alice, &path).unwrap(), 2);

        storage.records.delete_all_for_owner(&alice).unwrap();
        let summary = RecordService::new(&mut storage, alice.clone())
            .import(&path)
            .unwrap();
        assert_eq!(summary.inserted, 2);

        let restored = storage.records.read(&alice, None).unwrap();
        assert_eq!(restored, vec![quoted, sparse]);
    }
}
