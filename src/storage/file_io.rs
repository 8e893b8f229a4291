//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AbaError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, AbaError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| AbaError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| AbaError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a text file, returning an empty string if it doesn't exist
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, AbaError> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(String::new());
    }

    fs::read_to_string(path)
        .map_err(|e| AbaError::Storage(format!("Failed to read {}: {}", path.display(), e)))
}

/// Write a file atomically (write to temp, then rename)
///
/// The file is either completely replaced or left untouched, even if the
/// process dies mid-write.
pub fn write_atomic<P, F>(path: P, write_body: F) -> Result<(), AbaError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<(), AbaError>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AbaError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    let result = (|| {
        let file = File::create(temp_path)
            .map_err(|e| AbaError::Storage(format!("Failed to create temp file: {}", e)))?;

        let mut writer = BufWriter::new(file);
        write_body(&mut writer)?;

        writer
            .flush()
            .map_err(|e| AbaError::Storage(format!("Failed to flush data: {}", e)))?;

        writer
            .get_ref()
            .sync_all()
            .map_err(|e| AbaError::Storage(format!("Failed to sync data: {}", e)))?;

        fs::rename(temp_path, path)
            .map_err(|e| AbaError::Storage(format!("Failed to rename temp file: {}", e)))
    })();

    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }

    result
}

/// Write JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AbaError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(writer, data)
            .map_err(|e| AbaError::Storage(format!("Failed to serialize data: {}", e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
        assert_eq!(read_text(&path).unwrap(), "");
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.txt");

        write_atomic(&path, |w| {
            writeln!(w, "admin:")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "admin:\n");
        assert!(!temp_dir.path().join("accounts.txt.tmp").exists());
    }

    #[test]
    fn test_failed_body_leaves_original() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.txt");
        fs::write(&path, "admin:\n").unwrap();

        let result = write_atomic(&path, |_| Err(AbaError::Storage("boom".into())));

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "admin:\n");
        assert!(!temp_dir.path().join("accounts.txt.tmp").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        write_json_atomic(&path, &TestData::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_json_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        let result: Result<TestData, _> = read_json(&path);
        assert!(matches!(result, Err(AbaError::Storage(_))));
    }
}
