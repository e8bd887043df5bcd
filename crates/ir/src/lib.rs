//! # Studio IR
//!
//! This crate provides the document model edited by Schema Studio. It
//! contains the data structures for a schema, the editing vocabulary that
//! turns one snapshot into the next, and the canonical signature used for
//! change detection.
//!
//! ## Core Concepts
//!
//! - **SchemaDocument**: The root container (name, description, entities,
//!   relationships, storage identifier)
//! - **Entity**: A table card on the canvas (e.g., Customer, Order)
//! - **Field**: A column of an entity (e.g., email, total)
//! - **Relationship**: A link between two entities
//! - **Snapshot**: An immutable, shareable copy of a document
//! - **Signature**: The canonical content string used for change detection
//!

// Module declarations
pub mod document;
pub mod edit;
pub mod entity;
pub mod field;
pub mod relationship;
pub mod serialization;
pub mod signature;
pub mod validation;

// Re-export commonly used types at crate root
pub use document::{SchemaDocument, Snapshot, UNTITLED_DESCRIPTION, UNTITLED_NAME};
pub use edit::Edit;
pub use entity::Entity;
pub use field::{DEFAULT_FIELD_TYPE, Field};
pub use relationship::Relationship;
pub use serialization::{
    SchemaFile, export_json, import_json, load_schema, load_schema_from_string, save_schema,
    save_schema_to_string,
};
pub use signature::{Signature, VOLATILE_FIELDS, canonical_json, normalize, signature};
pub use validation::{ValidationResult, ValidationRule, Validator, is_saveable};

// Re-export core types that are commonly used with IR
pub use studio_core::{Position, RelationType, StudioError, StudioResult};

/// Current schema version for schema files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate a fresh identifier such as `entity_3f2a...`
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Edit, Entity, Field, Position, RelationType, Relationship, SchemaDocument, Signature,
        Snapshot, StudioError, StudioResult, signature,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        assert_eq!(SCHEMA_VERSION, 1);
    }

    #[test]
    fn test_new_id_is_prefixed_and_unique() {
        let a = new_id("entity");
        let b = new_id("entity");
        assert!(a.starts_with("entity_"));
        assert_ne!(a, b);
    }
}
