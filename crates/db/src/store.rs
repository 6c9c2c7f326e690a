use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::persist;
use crate::record::Record;

/// Authoritative holder of one record collection and its backing file.
///
/// The collection is read from disk once in [`Store::open`] and never
/// reloaded; afterwards memory is the source of truth and every
/// [`Store::save`] rewrites the file.
#[derive(Debug)]
pub struct Store<T> {
    path: PathBuf,
    records: Vec<T>,
    next_id: u64,
}

impl<T: Record> Store<T> {
    /// Open the store backed by `path`, loading whatever is there.
    ///
    /// A missing file yields an empty store; the file is created by the
    /// first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = persist::read::<T>(&path)?;

        let next_id = contents
            .next_id
            .unwrap_or(1)
            .max(high_water(&contents.records));

        tracing::info!(
            path = %path.display(),
            collection = T::COLLECTION,
            records = contents.records.len(),
            next_id,
            "collection loaded"
        );

        Ok(Self {
            path,
            records: contents.records,
            next_id,
        })
    }

    /// Read the collection stored at `path` without opening a store.
    pub fn load(path: &Path) -> Result<Vec<T>> {
        Ok(persist::read::<T>(path)?.records)
    }

    /// Current collection, in order.
    pub fn snapshot(&self) -> &[T] {
        &self.records
    }

    /// Replace the collection with `records`, writing it to disk first.
    ///
    /// On error neither the file nor the in-memory collection changes.
    pub fn save(&mut self, records: Vec<T>) -> Result<()> {
        let next_id = self.next_id.max(high_water(&records));
        persist::write(&self.path, &records, next_id)?;

        tracing::debug!(
            path = %self.path.display(),
            collection = T::COLLECTION,
            records = records.len(),
            "collection saved"
        );

        self.records = records;
        self.next_id = next_id;
        Ok(())
    }

    /// Id the next new record should receive. Ids handed out are never
    /// handed out again, even after the record is deleted.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Smallest id greater than every id in `records`.
fn high_water<T: Record>(records: &[T]) -> u64 {
    records
        .iter()
        .map(|record| record.id())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
