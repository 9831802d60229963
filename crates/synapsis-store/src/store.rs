//! Metadata store
//!
//! Records live in `<data_dir>/metadata.json`, a pretty-printed JSON object
//! keyed by map id. The file is the source of truth: every operation reads it,
//! and mutations write it back while holding the store's lock.

use crate::error::StoreError;
use crate::record::{to_megabytes, MapRecord, StoreStats};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata file name inside the data directory
pub const METADATA_FILE: &str = "metadata.json";

pub(crate) type Metadata = BTreeMap<String, MapRecord>;

/// Persistent map metadata
#[derive(Debug)]
pub struct MapStore {
    data_dir: PathBuf,
    metadata_path: PathBuf,
    max_maps: usize,
    lock: Mutex<()>,
}

impl MapStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directory cannot be created.
    pub fn open(data_dir: impl Into<PathBuf>, max_maps: usize) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io_error(&data_dir, e))?;
        let metadata_path = data_dir.join(METADATA_FILE);
        tracing::debug!(data_dir = %data_dir.display(), max_maps, "map store opened");
        Ok(Self {
            data_dir,
            metadata_path,
            max_maps,
            lock: Mutex::new(()),
        })
    }

    /// Directory holding artifacts and metadata
    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Configured record limit
    #[inline]
    #[must_use]
    pub fn max_maps(&self) -> usize {
        self.max_maps
    }

    /// Record a rendered artifact
    ///
    /// The size is read from the artifact on disk.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the artifact cannot be inspected
    /// - [`StoreError::Metadata`] if the metadata file is corrupt or unwritable
    pub fn save(&self, id: &str, topic: &str, path: &Path) -> Result<MapRecord, StoreError> {
        let record = artifact_record(id, topic, path)?;
        self.insert(record.clone())?;
        tracing::debug!(id, size_bytes = record.size_bytes, "map record saved");
        Ok(record)
    }

    /// Record a rendered artifact unless the store is full
    ///
    /// The limit check and the insert happen under one lock acquisition, so
    /// concurrent callers never push the store past `max_maps`. Replacing an
    /// existing id does not count against the limit.
    ///
    /// # Errors
    /// - [`StoreError::LimitReached`] if the store already holds `max_maps` records
    /// - [`StoreError::Io`] / [`StoreError::Metadata`] as for [`MapStore::save`]
    pub fn save_within_limit(
        &self,
        id: &str,
        topic: &str,
        path: &Path,
    ) -> Result<MapRecord, StoreError> {
        let record = artifact_record(id, topic, path)?;
        let _guard = self.lock.lock();
        let mut metadata = self.load()?;
        if metadata.len() >= self.max_maps && !metadata.contains_key(id) {
            return Err(StoreError::LimitReached(self.max_maps));
        }
        metadata.insert(record.id.clone(), record.clone());
        self.persist(&metadata)?;
        tracing::debug!(id, size_bytes = record.size_bytes, "map record saved");
        Ok(record)
    }

    /// Insert or replace a record as-is
    ///
    /// # Errors
    /// [`StoreError::Metadata`] / [`StoreError::Io`] on metadata failures.
    pub fn insert(&self, record: MapRecord) -> Result<(), StoreError> {
        self.update(|metadata| {
            metadata.insert(record.id.clone(), record);
            true
        })
    }

    /// Look up a record
    ///
    /// # Errors
    /// [`StoreError::Metadata`] / [`StoreError::Io`] on metadata failures.
    pub fn get(&self, id: &str) -> Result<Option<MapRecord>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(id))
    }

    /// Up to `limit` records, newest first
    ///
    /// # Errors
    /// [`StoreError::Metadata`] / [`StoreError::Io`] on metadata failures.
    pub fn list(&self, limit: usize) -> Result<Vec<MapRecord>, StoreError> {
        let _guard = self.lock.lock();
        let mut records: Vec<MapRecord> = self.load()?.into_values().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        records.truncate(limit);
        Ok(records)
    }

    /// Number of records
    ///
    /// # Errors
    /// [`StoreError::Metadata`] / [`StoreError::Io`] on metadata failures.
    pub fn count(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.len())
    }

    /// Remove a record and its artifact
    ///
    /// Returns `false` if no record has this id.
    ///
    /// # Errors
    /// - [`StoreError::Io`] if the artifact exists but cannot be removed
    /// - [`StoreError::Metadata`] on metadata failures
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock();
        let mut metadata = self.load()?;
        let Some(record) = metadata.remove(id) else {
            return Ok(false);
        };
        remove_artifact(&record.path)?;
        self.persist(&metadata)?;
        tracing::debug!(id, "map record deleted");
        Ok(true)
    }

    /// Usage summary; only artifacts still on disk count toward size
    ///
    /// # Errors
    /// [`StoreError::Metadata`] / [`StoreError::Io`] on metadata failures.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let _guard = self.lock.lock();
        let metadata = self.load()?;
        let total_size_bytes = metadata
            .values()
            .filter_map(|record| fs::metadata(&record.path).ok())
            .map(|meta| meta.len())
            .sum();
        Ok(StoreStats {
            total_maps: metadata.len(),
            total_size_bytes,
            total_size_mb: to_megabytes(total_size_bytes),
            max_maps: self.max_maps,
        })
    }

    /// Read-modify-write under the lock; `f` returns whether to persist
    pub(crate) fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Metadata) -> bool,
    {
        let _guard = self.lock.lock();
        let mut metadata = self.load()?;
        if f(&mut metadata) {
            self.persist(&metadata)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Metadata, StoreError> {
        let text = match fs::read_to_string(&self.metadata_path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Metadata::new()),
            Err(e) => return Err(StoreError::io_error(&self.metadata_path, e)),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::metadata_error(&self.metadata_path, e))
    }

    fn persist(&self, metadata: &Metadata) -> Result<(), StoreError> {
        let path = &self.metadata_path;
        let text = serde_json::to_string_pretty(metadata)
            .map_err(|e| StoreError::metadata_error(path, e))?;
        fs::write(path, text).map_err(|e| StoreError::io_error(path, e))
    }
}

fn artifact_record(id: &str, topic: &str, path: &Path) -> Result<MapRecord, StoreError> {
    let size_bytes = fs::metadata(path)
        .map_err(|e| StoreError::io_error(path, e))?
        .len();
    Ok(MapRecord {
        id: id.to_string(),
        topic: topic.to_string(),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.to_path_buf(),
        size_bytes,
        created_at: Utc::now(),
    })
}

/// Remove an artifact, treating an already-missing file as removed
pub(crate) fn remove_artifact(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io_error(path, e)),
    }
}
