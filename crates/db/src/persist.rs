//! Disk I/O: read the collection file and rewrite it atomically.
//!
//! File layout is one JSON object: the collection array under
//! `Record::COLLECTION` and the id counter under `next_id`.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, StoreError};
use crate::record::Record;

const NEXT_ID_KEY: &str = "next_id";

/// Decoded file contents.
pub(crate) struct Contents<T> {
    pub records: Vec<T>,
    /// Absent in files written before the counter existed.
    pub next_id: Option<u64>,
}

impl<T> Default for Contents<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: None,
        }
    }
}

/// Reads the file at `path`. A missing or zero-length file is an empty
/// collection, not an error.
pub(crate) fn read<T: Record>(path: &Path) -> Result<Contents<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Contents::default()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Contents::default());
    }

    let malformed = |message: String| StoreError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let mut root = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(root)) => root,
        Ok(_) => return Err(malformed("top-level value is not an object".to_string())),
        Err(e) => return Err(malformed(e.to_string())),
    };

    let records = match root.remove(T::COLLECTION) {
        Some(value) => serde_json::from_value::<Vec<T>>(value)
            .map_err(|e| malformed(format!("`{}`: {}", T::COLLECTION, e)))?,
        None => Vec::new(),
    };

    let next_id = match root.remove(NEXT_ID_KEY) {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_u64()
                .ok_or_else(|| malformed(format!("`{NEXT_ID_KEY}` is not an unsigned integer")))?,
        ),
    };

    Ok(Contents { records, next_id })
}

/// Serializes `records` pretty-printed, writes `<path>.tmp`, syncs it,
/// renames it over `path`, and syncs the containing directory.
pub(crate) fn write<T: Record>(path: &Path, records: &[T], next_id: u64) -> Result<()> {
    let mut root = Map::new();
    root.insert(T::COLLECTION.to_string(), serde_json::to_value(records)?);
    root.insert(NEXT_ID_KEY.to_string(), Value::from(next_id));
    let mut bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
    bytes.push(b'\n');

    atomic_write(path, &bytes).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));

    let mut file = File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    sync_parent_dir(path)
}

/// Flush the directory entry created by the rename.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
    }

    impl Record for Row {
        const COLLECTION: &'static str = "rows";

        fn id(&self) -> u64 {
            self.id
        }
    }

    #[test]
    fn write_replaces_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");

        write(&path, &[Row { id: 1 }], 2).unwrap();
        write(&path, &[Row { id: 1 }, Row { id: 2 }], 3).unwrap();

        let contents = read::<Row>(&path).unwrap();
        assert_eq!(contents.records, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(contents.next_id, Some(3));
        assert!(!dir.path().join("rows.json.tmp").exists());
    }

    #[test]
    fn parent_dir_sync_succeeds_for_nested_and_bare_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("rows.json");

        write(&nested, &[Row { id: 1 }], 2).unwrap();
        sync_parent_dir(&nested).unwrap();
        sync_parent_dir(Path::new("rows.json")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn missing_parent_dir_fails_the_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone").join("rows.json");
        assert!(sync_parent_dir(&path).is_err());
    }
}
