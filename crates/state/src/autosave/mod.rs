//! Autosave coordination
//!
//! The [`AutosaveCoordinator`] decides whether a candidate document needs
//! persisting and makes sure at most one persist call is in flight. The
//! [`AutosaveHandle`] drives it from a debounced stream of documents.
//!
//! A save decision runs these checks, in order, and stops at the first one
//! that applies:
//!
//! 1. a save is in flight, autosave is disabled, or there is no document
//! 2. the document's signature equals the last saved signature
//! 3. the document is not saveable (blank name)
//!
//! Only then is the persister called. A failed persist leaves the last saved
//! signature untouched so the same content is attempted again later. A save
//! that completes after [`AutosaveCoordinator::mark_saved`] or
//! [`AutosaveCoordinator::clear_schema_id`] leaves the new baseline alone.

mod debounce;
mod events;

pub use debounce::AutosaveHandle;
pub use events::{EVENT_CAPACITY, SaveEvent};

use crate::config::AutosaveConfig;
use crate::persist::Persister;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use studio_ir::{SchemaDocument, Signature, Snapshot, is_saveable, signature};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

// ============================================================================
// Outcomes
// ============================================================================

/// Result of one save decision
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The document was persisted
    Saved(DateTime<Utc>),
    /// Nothing was persisted
    Skipped(SkipReason),
    /// The persist call failed
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, SaveOutcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SaveOutcome::Failed(_))
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOutcome::Saved(at) => write!(f, "saved at {}", at.to_rfc3339()),
            SaveOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            SaveOutcome::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

/// Why a save decision did not persist anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    Disabled,
    NoDocument,
    Unchanged,
    Invalid,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::InFlight => "save in flight",
            SkipReason::Disabled => "autosave disabled",
            SkipReason::NoDocument => "no document",
            SkipReason::Unchanged => "unchanged",
            SkipReason::Invalid => "not saveable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Save Record
// ============================================================================

/// Ephemeral per-session save state
#[derive(Debug, Clone)]
pub struct SaveRecord {
    /// Signature of the content last known to be stored
    pub last_signature: Option<Signature>,
    /// When that content was stored
    pub last_saved: Option<DateTime<Utc>>,
    /// Whether a persist call is running
    pub saving: bool,
    /// Whether autosave runs at all
    pub enabled: bool,
    /// Identifier the store assigned to this document
    pub schema_id: Option<String>,
    seeded: bool,
    // Bumped on every re-seed; a save started under an older value must not
    // write its result back
    epoch: u64,
}

impl SaveRecord {
    fn new(enabled: bool) -> Self {
        Self {
            last_signature: None,
            last_saved: None,
            saving: false,
            enabled,
            schema_id: None,
            seeded: false,
            epoch: 0,
        }
    }
}

// ============================================================================
// AutosaveCoordinator
// ============================================================================

/// Change-detected, single-flight save decisions
pub struct AutosaveCoordinator {
    persister: Arc<dyn Persister>,
    record: Mutex<SaveRecord>,
    events: broadcast::Sender<SaveEvent>,
}

impl fmt::Debug for AutosaveCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutosaveCoordinator")
            .field("record", &*self.record())
            .finish_non_exhaustive()
    }
}

impl AutosaveCoordinator {
    /// Create an enabled coordinator
    pub fn new(persister: Arc<dyn Persister>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            persister,
            record: Mutex::new(SaveRecord::new(true)),
            events,
        }
    }

    /// Create a coordinator from config
    pub fn with_config(persister: Arc<dyn Persister>, config: &AutosaveConfig) -> Self {
        let coordinator = Self::new(persister);
        coordinator.set_enabled(config.enabled);
        coordinator
    }

    // The guard is never held across an await, so a poisoned lock only
    // means another thread panicked mid-update of plain fields.
    fn record(&self) -> MutexGuard<'_, SaveRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Receive save notifications
    pub fn subscribe(&self) -> broadcast::Receiver<SaveEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: SaveEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.record().enabled = enabled;
        debug!(enabled, "autosave toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.record().enabled
    }

    pub fn is_saving(&self) -> bool {
        self.record().saving
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.record().last_saved
    }

    pub fn last_signature(&self) -> Option<Signature> {
        self.record().last_signature.clone()
    }

    /// Identifier assigned by the store, once known
    pub fn schema_id(&self) -> Option<String> {
        self.record().schema_id.clone()
    }

    /// Forget the assigned identifier so the next save creates a new record
    pub fn clear_schema_id(&self) {
        let mut record = self.record();
        record.schema_id = None;
        record.epoch += 1;
    }

    /// Seed the baseline from the first observed document without saving
    ///
    /// Only the first call per coordinator has any effect; returns whether
    /// this call seeded.
    pub fn seed_baseline(&self, doc: &SchemaDocument) -> bool {
        let mut record = self.record();
        if record.seeded {
            return false;
        }
        record.seeded = true;
        match signature(doc) {
            Ok(sig) => {
                debug!(len = sig.len(), "autosave baseline seeded");
                record.last_signature = Some(sig);
            }
            Err(e) => warn!(error = %e, "could not sign baseline document"),
        }
        if record.schema_id.is_none() {
            record.schema_id = doc.schema_id.clone();
        }
        true
    }

    /// Declare a document as already stored, e.g. right after loading it
    pub fn mark_saved(&self, doc: &SchemaDocument) {
        let mut record = self.record();
        record.seeded = true;
        match signature(doc) {
            Ok(sig) => record.last_signature = Some(sig),
            Err(e) => warn!(error = %e, "could not sign saved document"),
        }
        record.last_saved = Some(Utc::now());
        if doc.schema_id.is_some() {
            record.schema_id = doc.schema_id.clone();
        }
        record.epoch += 1;
        debug!(name = %doc.name, "autosave re-seeded");
    }

    /// Run one save decision for a candidate document
    pub async fn evaluate(&self, candidate: Option<Snapshot>) -> SaveOutcome {
        let (doc, sig, epoch) = match self.begin(candidate) {
            Ok(ready) => ready,
            Err(outcome) => return outcome,
        };

        info!(name = %doc.name, "autosave started");
        self.notify(SaveEvent::Started);

        let result = self.persister.persist(&doc).await;

        let mut record = self.record();
        record.saving = false;
        match result {
            Ok(saved) => {
                let at = Utc::now();
                if record.epoch == epoch {
                    let assigned = saved.document.schema_id.clone().or(doc.schema_id.clone());
                    let stored_sig = if assigned == doc.schema_id {
                        sig
                    } else {
                        let mut stored = (*doc).clone();
                        stored.schema_id = assigned.clone();
                        signature(&stored).unwrap_or(sig)
                    };
                    record.last_signature = Some(stored_sig);
                    record.last_saved = Some(at);
                    record.schema_id = assigned;
                } else {
                    debug!(name = %doc.name, "document re-seeded during save, result not recorded");
                }
                drop(record);

                info!(schema_id = ?saved.schema_id(), "autosave succeeded");
                self.notify(SaveEvent::Succeeded { at, saved });
                SaveOutcome::Saved(at)
            }
            Err(e) => {
                drop(record);
                let error = e.to_string();
                warn!(error = %error, "autosave failed");
                self.notify(SaveEvent::Failed {
                    error: error.clone(),
                });
                SaveOutcome::Failed(error)
            }
        }
    }

    /// Checks and the in-flight flip, under a single lock
    fn begin(
        &self,
        candidate: Option<Snapshot>,
    ) -> Result<(Snapshot, Signature, u64), SaveOutcome> {
        let mut record = self.record();
        let skip = |reason: SkipReason| {
            debug!(reason = %reason, "autosave skipped");
            SaveOutcome::Skipped(reason)
        };

        if record.saving {
            return Err(skip(SkipReason::InFlight));
        }
        if !record.enabled {
            return Err(skip(SkipReason::Disabled));
        }
        let Some(candidate) = candidate else {
            return Err(skip(SkipReason::NoDocument));
        };

        // Save under the identifier the store already handed out
        let doc = match (&candidate.schema_id, &record.schema_id) {
            (None, Some(id)) => {
                let mut adopted = (*candidate).clone();
                adopted.schema_id = Some(id.clone());
                Arc::new(adopted)
            }
            _ => candidate,
        };

        let sig = signature(&doc).map_err(|e| {
            warn!(error = %e, "could not sign candidate document");
            SaveOutcome::Failed(e.to_string())
        })?;

        if record.last_signature.as_ref() == Some(&sig) {
            return Err(skip(SkipReason::Unchanged));
        }
        if !is_saveable(&doc) {
            return Err(skip(SkipReason::Invalid));
        }

        record.saving = true;
        Ok((doc, sig, record.epoch))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryPersister;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn setup() -> (Arc<MemoryPersister>, Arc<AutosaveCoordinator>) {
        let persister = Arc::new(MemoryPersister::new());
        let coordinator = Arc::new(AutosaveCoordinator::new(persister.clone()));
        (persister, coordinator)
    }

    fn doc(name: &str) -> Option<Snapshot> {
        Some(SchemaDocument::new(name).into_snapshot())
    }

    #[tokio::test]
    async fn test_saves_changed_document() {
        let (persister, coordinator) = setup();
        let outcome = coordinator.evaluate(doc("Shop")).await;

        assert!(outcome.is_saved());
        assert_eq!(persister.saved_count().await, 1);
        assert!(coordinator.last_saved().is_some());
        assert!(!coordinator.is_saving());
        assert!(coordinator.schema_id().is_some());
    }

    #[tokio::test]
    async fn test_unchanged_document_saved_once() {
        let (persister, coordinator) = setup();
        assert!(coordinator.evaluate(doc("Shop")).await.is_saved());
        assert_eq!(
            coordinator.evaluate(doc("Shop")).await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );
        assert_eq!(persister.attempts(), 1);
    }

    #[tokio::test]
    async fn test_adopting_assigned_id_does_not_resave() {
        let (persister, coordinator) = setup();
        coordinator.evaluate(doc("Shop")).await;
        let id = coordinator.schema_id().unwrap();

        let adopted = SchemaDocument::new("Shop").with_schema_id(id.clone());
        assert_eq!(
            coordinator.evaluate(Some(adopted.into_snapshot())).await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );

        coordinator.evaluate(doc("Shop 2")).await;
        let saved = persister.saved().await;
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].schema_id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_blank_name_skipped_then_rename_saved() {
        let (persister, coordinator) = setup();
        assert!(coordinator.evaluate(doc("Shop")).await.is_saved());
        let saved_sig = coordinator.last_signature();

        assert_eq!(
            coordinator.evaluate(doc("")).await,
            SaveOutcome::Skipped(SkipReason::Invalid)
        );
        assert_eq!(
            coordinator.evaluate(doc("   ")).await,
            SaveOutcome::Skipped(SkipReason::Invalid)
        );
        assert_eq!(coordinator.last_signature(), saved_sig);

        assert!(coordinator.evaluate(doc("Shop2")).await.is_saved());
        assert_eq!(persister.saved_count().await, 2);
        assert_eq!(persister.last_saved().await.unwrap().name, "Shop2");
    }

    #[tokio::test]
    async fn test_failure_leaves_signature_stale() {
        let (persister, coordinator) = setup();
        coordinator.evaluate(doc("Shop")).await;
        let before = coordinator.last_signature();
        let before_at = coordinator.last_saved();

        persister.set_fail_on_persist(true).await;
        let outcome = coordinator.evaluate(doc("Shop2")).await;
        assert!(outcome.is_failed());
        assert_eq!(coordinator.last_signature(), before);
        assert_eq!(coordinator.last_saved(), before_at);
        assert!(!coordinator.is_saving());

        persister.set_fail_on_persist(false).await;
        assert!(coordinator.evaluate(doc("Shop2")).await.is_saved());
        assert_eq!(persister.attempts(), 3);
    }

    #[tokio::test]
    async fn test_disabled_and_missing_document_skip() {
        let (persister, coordinator) = setup();
        assert_eq!(
            coordinator.evaluate(None).await,
            SaveOutcome::Skipped(SkipReason::NoDocument)
        );

        coordinator.set_enabled(false);
        assert!(!coordinator.is_enabled());
        assert_eq!(
            coordinator.evaluate(doc("Shop")).await,
            SaveOutcome::Skipped(SkipReason::Disabled)
        );
        assert_eq!(persister.attempts(), 0);
    }

    #[tokio::test]
    async fn test_with_config_disabled() {
        let persister = Arc::new(MemoryPersister::new());
        let config = AutosaveConfig {
            enabled: false,
            ..AutosaveConfig::default()
        };
        let coordinator = AutosaveCoordinator::with_config(persister, &config);
        assert!(!coordinator.is_enabled());
    }

    #[tokio::test]
    async fn test_seed_baseline_only_once() {
        let (persister, coordinator) = setup();
        let loaded = SchemaDocument::new("Loaded");

        assert!(coordinator.seed_baseline(&loaded));
        assert!(!coordinator.seed_baseline(&SchemaDocument::new("Other")));
        assert_eq!(
            coordinator.evaluate(Some(loaded.into_snapshot())).await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );
        assert_eq!(persister.attempts(), 0);
    }

    #[tokio::test]
    async fn test_mark_saved_reseeds() {
        let (persister, coordinator) = setup();
        coordinator.evaluate(doc("Shop")).await;

        let from_server = SchemaDocument::new("Fetched").with_schema_id("700001");
        coordinator.mark_saved(&from_server);
        assert_eq!(coordinator.schema_id().as_deref(), Some("700001"));
        assert_eq!(
            coordinator
                .evaluate(Some(from_server.into_snapshot()))
                .await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );
        assert_eq!(persister.attempts(), 1);
    }

    #[tokio::test]
    async fn test_volatile_fields_do_not_trigger_save() {
        let (persister, coordinator) = setup();
        coordinator.evaluate(doc("Shop")).await;

        let stored = persister.last_saved().await.unwrap();
        let mut touched = stored.with_schema_id(coordinator.schema_id().unwrap());
        touched.updated_at = Some(Utc::now());
        touched.last_modified = Some(Utc::now());
        assert_eq!(
            coordinator.evaluate(Some(touched.into_snapshot())).await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_save_rejects_second_evaluation() {
        let persister = Arc::new(MemoryPersister::with_latency(Duration::from_secs(1)));
        let coordinator = Arc::new(AutosaveCoordinator::new(persister.clone()));

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.evaluate(doc("Shop")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(coordinator.is_saving());

        assert_eq!(
            coordinator.evaluate(doc("Shop2")).await,
            SaveOutcome::Skipped(SkipReason::InFlight)
        );

        assert!(first.await.unwrap().is_saved());
        assert_eq!(persister.attempts(), 1);
        assert_eq!(persister.max_concurrent(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_saved_during_save_keeps_new_baseline() {
        let persister = Arc::new(MemoryPersister::with_latency(Duration::from_secs(5)));
        let coordinator = Arc::new(AutosaveCoordinator::new(persister.clone()));

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.evaluate(doc("Shop")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(coordinator.is_saving());

        let fetched = SchemaDocument::new("Fetched").with_schema_id("123456");
        coordinator.mark_saved(&fetched);
        let baseline = coordinator.last_signature();

        assert!(first.await.unwrap().is_saved());
        assert!(!coordinator.is_saving());
        assert_eq!(coordinator.schema_id().as_deref(), Some("123456"));
        assert_eq!(coordinator.last_signature(), baseline);
        assert_eq!(
            coordinator.evaluate(Some(fetched.into_snapshot())).await,
            SaveOutcome::Skipped(SkipReason::Unchanged)
        );
        assert_eq!(persister.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleared_id_stays_cleared_after_save() {
        let persister = Arc::new(MemoryPersister::with_latency(Duration::from_secs(5)));
        let coordinator = Arc::new(AutosaveCoordinator::new(persister.clone()));
        let mut events = coordinator.subscribe();

        let first = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.evaluate(doc("Shop")).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        coordinator.clear_schema_id();

        assert!(first.await.unwrap().is_saved());
        assert_eq!(coordinator.schema_id(), None);
        assert_eq!(events.recv().await.unwrap(), SaveEvent::Started);
        assert!(matches!(
            events.recv().await.unwrap(),
            SaveEvent::Succeeded { .. }
        ));

        assert!(coordinator.evaluate(doc("Untitled")).await.is_saved());
        let saved = persister.saved().await;
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].schema_id, None);
    }

    #[tokio::test]
    async fn test_notifications() {
        let (persister, coordinator) = setup();
        let mut events = coordinator.subscribe();

        coordinator.evaluate(doc("Shop")).await;
        assert_eq!(events.recv().await.unwrap(), SaveEvent::Started);
        match events.recv().await.unwrap() {
            SaveEvent::Succeeded { saved, .. } => assert_eq!(saved.document.name, "Shop"),
            other => panic!("Expected Succeeded, got {:?}", other),
        }

        persister.set_fail_on_persist(true).await;
        coordinator.evaluate(doc("Shop2")).await;
        assert_eq!(events.recv().await.unwrap(), SaveEvent::Started);
        assert!(matches!(
            events.recv().await.unwrap(),
            SaveEvent::Failed { .. }
        ));

        // Skips are silent
        coordinator.evaluate(doc("")).await;
        assert!(events.try_recv().is_err());
    }
}
