//! Editor session
//!
//! Composes a [`History`] of snapshots with an [`AutosaveHandle`]. Every
//! change to the current snapshot (edit, undo, redo, load) is published to
//! autosave. The storage identifier lives on the session rather than in
//! history, so undoing past the first save keeps saving to the same record.

use crate::autosave::{AutosaveCoordinator, AutosaveHandle, SaveEvent, SaveOutcome};
use crate::config::EditorConfig;
use crate::history::{History, PushOutcome};
use crate::persist::Persister;
use std::sync::Arc;
use studio_core::StudioResult;
use studio_ir::{Edit, SchemaDocument, Snapshot};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// One open document with undo/redo and autosave
#[derive(Debug)]
pub struct EditorSession {
    history: History<Snapshot>,
    autosave: AutosaveHandle,
    schema_id: Option<String>,
}

impl EditorSession {
    /// Open a document; it becomes the first history entry and the
    /// autosave baseline
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(doc: SchemaDocument, persister: Arc<dyn Persister>, config: &EditorConfig) -> Self {
        let coordinator = Arc::new(AutosaveCoordinator::with_config(
            persister,
            &config.autosave,
        ));
        let autosave = AutosaveHandle::spawn(coordinator, config.autosave.delay());
        let schema_id = doc.schema_id.clone();
        let snapshot = doc.into_snapshot();

        let session = Self {
            history: History::with_max_size(snapshot.clone(), config.history.max_size),
            autosave,
            schema_id,
        };
        session.autosave.observe(snapshot);
        info!(max_history = config.history.max_size, "editor session opened");
        session
    }

    /// Start from a blank untitled document
    pub fn untitled(persister: Arc<dyn Persister>, config: &EditorConfig) -> Self {
        Self::open(SchemaDocument::untitled(), persister, config)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The current document, storage identifier attached
    pub fn current(&self) -> Snapshot {
        self.with_identity(self.history.current())
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn autosave(&self) -> &AutosaveHandle {
        &self.autosave
    }

    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.autosave.subscribe()
    }

    pub fn set_autosave_enabled(&self, enabled: bool) {
        self.autosave.coordinator().set_enabled(enabled);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Apply an edit to the current document
    ///
    /// Returns `false` when the edit changed nothing; no history entry is
    /// recorded in that case.
    pub fn apply(&mut self, edit: &Edit) -> StudioResult<bool> {
        let Some(next) = edit.apply(self.history.current())? else {
            debug!(edit = edit.label(), "edit is a no-op");
            return Ok(false);
        };
        debug!(edit = edit.label(), "edit applied");
        Ok(self.record(next.into_snapshot()))
    }

    /// Step back one snapshot
    pub fn undo(&mut self) -> Option<Snapshot> {
        let transition = self.history.undo()?;
        let snapshot = transition.snapshot().clone();
        self.publish(&snapshot);
        self.history.settle(transition);
        Some(self.with_identity(&snapshot))
    }

    /// Step forward one snapshot
    pub fn redo(&mut self) -> Option<Snapshot> {
        let transition = self.history.redo()?;
        let snapshot = transition.snapshot().clone();
        self.publish(&snapshot);
        self.history.settle(transition);
        Some(self.with_identity(&snapshot))
    }

    /// Replace the document with one fetched from storage
    ///
    /// The load is undoable, and the loaded content counts as saved.
    pub fn load(&mut self, doc: SchemaDocument) {
        self.schema_id = doc.schema_id.clone();
        self.autosave.coordinator().mark_saved(&doc);
        info!(name = %doc.name, schema_id = ?self.schema_id, "schema loaded");
        self.record(doc.into_snapshot());
    }

    /// Start over with a blank document that will be stored as a new record
    pub fn new_schema(&mut self) {
        self.schema_id = None;
        self.autosave.coordinator().clear_schema_id();
        self.record(SchemaDocument::untitled().into_snapshot());
    }

    /// Replace the content with an exported document, keeping this
    /// session's storage identifier
    pub fn import_json(&mut self, json: &str) -> StudioResult<()> {
        let mut doc = studio_ir::import_json(json)?;
        doc.schema_id = self.schema_id.clone();
        self.record(doc.into_snapshot());
        Ok(())
    }

    /// The current document as pretty JSON
    pub fn export_json(&self) -> StudioResult<String> {
        studio_ir::export_json(&self.current())
    }

    /// Record the identifier the store assigned
    pub fn adopt_schema_id(&mut self, schema_id: impl Into<String>) {
        self.schema_id = Some(schema_id.into());
    }

    // ========================================================================
    // Autosave
    // ========================================================================

    /// Save the current document now if it changed
    pub async fn flush(&self) -> StudioResult<SaveOutcome> {
        self.autosave.flush().await
    }

    /// Flush and stop autosave
    pub async fn close(self) -> StudioResult<SaveOutcome> {
        let outcome = self.autosave.close().await?;
        info!(outcome = %outcome, "editor session closed");
        Ok(outcome)
    }

    fn record(&mut self, snapshot: Snapshot) -> bool {
        match self.history.push(snapshot.clone()) {
            PushOutcome::Recorded => {
                self.publish(&snapshot);
                true
            }
            PushOutcome::Suppressed => false,
        }
    }

    fn publish(&mut self, snapshot: &Snapshot) {
        if self.schema_id.is_none() {
            self.schema_id = self.autosave.coordinator().schema_id();
        }
        self.autosave.observe(self.with_identity(snapshot));
    }

    fn with_identity(&self, snapshot: &Snapshot) -> Snapshot {
        if snapshot.schema_id == self.schema_id {
            return snapshot.clone();
        }
        let mut doc = (**snapshot).clone();
        doc.schema_id = self.schema_id.clone();
        doc.into_snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
