//! Map service
//!
//! Ties the pipeline to the store: checks the topic and the map limit,
//! renders into `<data_dir>/<id>.html` and records the result.

use crate::error::StoreError;
use crate::record::{MapRecord, StoreStats};
use crate::store::{remove_artifact, MapStore};
use std::path::PathBuf;
use std::sync::Arc;
use synapsis_core::{MindMapBuilder, TextGenerator};
use uuid::Uuid;

/// Default number of maps returned by [`MapService::list_maps`]
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Generates, stores and serves mind maps
#[derive(Debug)]
pub struct MapService<G> {
    generator: G,
    store: Arc<MapStore>,
    max_topic_chars: usize,
    style: String,
}

impl<G: TextGenerator> MapService<G> {
    /// Create service over generator and store
    pub fn new(generator: G, store: Arc<MapStore>, max_topic_chars: usize) -> Self {
        Self {
            generator,
            store,
            max_topic_chars,
            style: String::new(),
        }
    }

    /// With style hint passed to every expansion
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Underlying store
    #[inline]
    pub fn store(&self) -> &Arc<MapStore> {
        &self.store
    }

    /// Generate and store a map for `topic`
    ///
    /// # Errors
    /// - [`StoreError::InvalidTopic`] if the trimmed topic is empty or too long
    /// - [`StoreError::LimitReached`] if the store is full
    /// - [`StoreError::Pipeline`] if generation, validation or rendering fails
    /// - [`StoreError::Io`] / [`StoreError::Metadata`] on storage failures
    #[tracing::instrument(skip(self))]
    pub fn create_map(&self, topic: &str) -> Result<MapRecord, StoreError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(StoreError::InvalidTopic("topic must not be empty".to_string()));
        }
        if topic.chars().count() > self.max_topic_chars {
            return Err(StoreError::InvalidTopic(format!(
                "topic too long (max {} characters)",
                self.max_topic_chars
            )));
        }

        // Early rejection; the authoritative check runs with the insert.
        let max_maps = self.store.max_maps();
        if self.store.count()? >= max_maps {
            tracing::warn!(max_maps, "map limit reached");
            return Err(StoreError::LimitReached(max_maps));
        }

        let id = Uuid::new_v4().to_string();
        let output = self.store.data_dir().join(format!("{id}.html"));
        tracing::info!(id = %id, "generating map");

        let mut builder = MindMapBuilder::new(&self.generator);
        let path = builder
            .expand(topic, &self.style)?
            .validate()?
            .render(Some(output.as_path()))?;

        let record = match self.store.save_within_limit(&id, topic, &path) {
            Ok(record) => record,
            Err(e) => {
                if let Err(cleanup) = remove_artifact(&path) {
                    tracing::warn!(
                        id = %id,
                        error = %cleanup,
                        "failed to remove unrecorded artifact"
                    );
                }
                return Err(e);
            }
        };
        tracing::info!(id = %id, size_bytes = record.size_bytes, "map stored");
        Ok(record)
    }

    /// Record for `id`
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no such map exists.
    pub fn get_map(&self, id: &str) -> Result<MapRecord, StoreError> {
        self.store.get(id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Up to `limit` records, newest first
    ///
    /// # Errors
    /// [`StoreError`] on metadata failures.
    pub fn list_maps(&self, limit: usize) -> Result<Vec<MapRecord>, StoreError> {
        self.store.list(limit)
    }

    /// Delete a map and its artifact
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no such map exists.
    #[tracing::instrument(skip(self))]
    pub fn delete_map(&self, id: &str) -> Result<(), StoreError> {
        if !self.store.delete(id)? {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::info!("map deleted");
        Ok(())
    }

    /// Artifact path for `id`
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if no such map exists
    /// - [`StoreError::FileMissing`] if the artifact is gone
    pub fn map_file(&self, id: &str) -> Result<PathBuf, StoreError> {
        let record = self.get_map(id)?;
        if !record.path.exists() {
            return Err(StoreError::FileMissing {
                id: record.id,
                path: record.path,
            });
        }
        Ok(record.path)
    }

    /// Storage usage summary
    ///
    /// # Errors
    /// [`StoreError`] on metadata failures.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        self.store.stats()
    }
}
