//! File-backed persister
//!
//! Writes the versioned schema file to a single path. The file plays the
//! role of the remote store: it assigns the identifier and timestamps.

use super::{Persister, SavedDocument, stamp};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use studio_core::{ResultExt, StudioError, StudioResult};
use studio_ir::{SchemaDocument, save_schema_to_string};
use tracing::debug;

/// Persists each save to one schema file
#[derive(Debug, Clone)]
pub struct FilePersister {
    path: PathBuf,
}

impl FilePersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file being written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Persister for FilePersister {
    async fn persist(&self, doc: &SchemaDocument) -> StudioResult<SavedDocument> {
        let stored = stamp(doc, Utc::now());
        let json = save_schema_to_string(&stored).with_context("Encoding schema file")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StudioError::DirectoryCreate {
                        path: parent.to_path_buf(),
                        message: e.to_string(),
                    }
                })?;
            }
        }

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StudioError::FileWrite {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %self.path.display(), schema_id = ?stored.schema_id, "schema written");
        Ok(SavedDocument { document: stored })
    }
}
