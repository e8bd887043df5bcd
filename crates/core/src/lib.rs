//! # Studio Core
//!
//! Core types, traits, and error handling for Schema Studio.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Types**: Identifiers, canvas positions, relationship cardinality
//! - **Traits**: Common behaviors like `Validatable` and `Persistable`
//! - **Errors**: Unified error handling with `StudioError` and `StudioResult`
//!

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ResultExt, StudioError, StudioResult};
pub use traits::{Named, Persistable, Positioned, Validatable};
pub use types::{EntityId, FieldId, Position, RelationType, RelationshipId, SchemaId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
