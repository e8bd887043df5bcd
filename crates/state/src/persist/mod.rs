//! Persistence seam
//!
//! Autosave never talks to storage directly. It calls a [`Persister`],
//! which stores the document and returns it as stored: with its
//! identifier assigned and its server-side timestamps stamped.

mod file;
mod memory;

pub use file::FilePersister;
pub use memory::MemoryPersister;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use studio_core::StudioResult;
use studio_ir::SchemaDocument;

/// Lowest identifier handed out for a new schema
const SCHEMA_ID_MIN: u128 = 100_000;

/// Number of distinct identifiers (six digits)
const SCHEMA_ID_SPAN: u128 = 900_000;

/// Stores documents on behalf of the autosave coordinator
#[async_trait]
pub trait Persister: Send + Sync {
    /// Store a document, returning it as stored
    async fn persist(&self, doc: &SchemaDocument) -> StudioResult<SavedDocument>;
}

/// A document as accepted by the store
#[derive(Debug, Clone, PartialEq)]
pub struct SavedDocument {
    /// The stored document, identifier and timestamps included
    pub document: SchemaDocument,
}

impl SavedDocument {
    /// The identifier the store filed the document under
    pub fn schema_id(&self) -> Option<&str> {
        self.document.schema_id.as_deref()
    }
}

/// Generate a six-digit schema identifier (`100000`..=`999999`)
pub fn generate_schema_id() -> String {
    let n = uuid::Uuid::new_v4().as_u128() % SCHEMA_ID_SPAN + SCHEMA_ID_MIN;
    n.to_string()
}

/// Apply the store-side bookkeeping to a document about to be saved
///
/// Assigns an identifier if the document has none, keeps an existing
/// creation time, and sets both modification timestamps to `now`.
pub fn stamp(doc: &SchemaDocument, now: DateTime<Utc>) -> SchemaDocument {
    let mut stored = doc.clone();
    if stored.schema_id.is_none() {
        stored.schema_id = Some(generate_schema_id());
    }
    stored.created_at = stored.created_at.or(Some(now));
    stored.updated_at = Some(now);
    stored.last_modified = Some(now);
    stored
}
