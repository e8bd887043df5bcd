//! In-process persister for tests and dry runs

use super::{Persister, SavedDocument, stamp};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use studio_core::{StudioError, StudioResult};
use studio_ir::SchemaDocument;
use tokio::sync::RwLock;

/// Keeps every saved document in memory
#[derive(Debug, Default)]
pub struct MemoryPersister {
    saved: RwLock<Vec<SchemaDocument>>,
    fail_on_persist: RwLock<bool>,
    latency: Duration,
    attempts: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persist call sleeps this long before completing
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub async fn set_fail_on_persist(&self, fail: bool) {
        *self.fail_on_persist.write().await = fail;
    }

    /// Number of successful saves
    pub async fn saved_count(&self) -> usize {
        self.saved.read().await.len()
    }

    /// Documents as submitted, oldest first
    pub async fn saved(&self) -> Vec<SchemaDocument> {
        self.saved.read().await.clone()
    }

    /// Most recently saved document
    pub async fn last_saved(&self) -> Option<SchemaDocument> {
        self.saved.read().await.last().cloned()
    }

    /// Number of persist calls, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Highest number of persist calls that were running at the same time
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Persister for MemoryPersister {
    async fn persist(&self, doc: &SchemaDocument) -> StudioResult<SavedDocument> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = if *self.fail_on_persist.read().await {
            Err(StudioError::persist("Mock persist failure"))
        } else {
            self.saved.write().await.push(doc.clone());
            Ok(SavedDocument {
                document: stamp(doc, Utc::now()),
            })
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
