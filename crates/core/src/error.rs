//! Error types for Schema Studio
//!
//! This module provides unified error handling across the workspace,
//! including validation errors, lookup failures, persistence failures,
//! IO and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Schema Studio
#[derive(Debug, Error)]
pub enum StudioError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity validation failed
    #[error("Entity validation failed for '{entity}': {message}")]
    EntityValidation { entity: String, message: String },

    /// Field validation failed
    #[error("Field validation failed for '{entity}.{field}': {message}")]
    FieldValidation {
        entity: String,
        field: String,
        message: String,
    },

    /// Relationship validation failed
    #[error("Relationship validation failed: {0}")]
    RelationshipValidation(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Entity not found
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    /// Field not found
    #[error("Field '{field}' not found in entity '{entity}'")]
    FieldNotFound { entity: String, field: String },

    /// Relationship not found
    #[error("Relationship not found: {0}")]
    RelationshipNotFound(String),

    /// Schema file not found
    #[error("Schema not found at path: {0}")]
    SchemaNotFound(PathBuf),

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// Duplicate field name
    #[error("Duplicate field name: '{field}' already exists in entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    /// Duplicate relationship
    #[error("Duplicate relationship between '{from}' and '{to}'")]
    DuplicateRelationship { from: String, to: String },

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// The injected persist call failed
    #[error("Persist failed: {0}")]
    Persist(String),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// Directory creation failed
    #[error("Failed to create directory '{path}': {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Invalid schema file format
    #[error("Invalid schema file format: {0}")]
    InvalidSchemaFormat(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch { expected: u32, found: u32 },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl StudioError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        StudioError::Validation(msg.into())
    }

    /// Create an entity validation error
    pub fn entity_validation(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        StudioError::EntityValidation {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a field validation error
    pub fn field_validation(
        entity: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        StudioError::FieldValidation {
            entity: entity.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a persist error
    pub fn persist(msg: impl Into<String>) -> Self {
        StudioError::Persist(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        StudioError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        StudioError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StudioError::Validation(_)
                | StudioError::EntityValidation { .. }
                | StudioError::FieldValidation { .. }
                | StudioError::RelationshipValidation(_)
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StudioError::EntityNotFound(_)
                | StudioError::FieldNotFound { .. }
                | StudioError::RelationshipNotFound(_)
                | StudioError::SchemaNotFound(_)
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            StudioError::Io(_)
                | StudioError::FileRead { .. }
                | StudioError::FileWrite { .. }
                | StudioError::DirectoryCreate { .. }
        )
    }
}

/// Result type alias using StudioError
pub type StudioResult<T> = Result<T, StudioError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> StudioResult<T>;
}

impl<T, E: Into<StudioError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> StudioResult<T> {
        self.map_err(|e| {
            let err: StudioError = e.into();
            StudioError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = StudioError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_field_validation_error() {
        let err = StudioError::field_validation("Order", "total", "Duplicate field name");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Field validation failed for 'Order.total': Duplicate field name"
        );
    }

    #[test]
    fn test_not_found_errors() {
        let err = StudioError::EntityNotFound("entity_42".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Entity not found: entity_42");
    }

    #[test]
    fn test_persist_error() {
        let err = StudioError::persist("connection refused");
        assert!(!err.is_validation());
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "Persist failed: connection refused");
    }

    #[test]
    fn test_duplicate_relationship() {
        let err = StudioError::DuplicateRelationship {
            from: "User".to_string(),
            to: "Order".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate relationship between 'User' and 'Order'"
        );
    }

    #[test]
    fn test_result_ext_context() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = io.with_context("Saving schema").unwrap_err();
        assert_eq!(err.to_string(), "Saving schema: IO error: denied");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: StudioError = io_err.into();
        assert!(err.is_io());
    }
}
