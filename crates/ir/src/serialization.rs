//! Serialization and deserialization for schema files
//!
//! This module provides functionality for saving and loading schema files,
//! JSON export/import of bare documents, and schema version migration.

use crate::{SCHEMA_VERSION, SchemaDocument};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use studio_core::{Persistable, StudioError, StudioResult};

// ============================================================================
// Constants
// ============================================================================

/// File extension for schema files
pub const SCHEMA_EXTENSION: &str = "json";

// ============================================================================
// Schema File Wrapper
// ============================================================================

/// Wrapper for schema files that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFile {
    /// Schema version for migration purposes
    pub schema_version: u32,

    /// The document
    pub schema: SchemaDocument,
}

impl SchemaFile {
    /// Create a new schema file from a document
    pub fn new(schema: SchemaDocument) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema,
        }
    }

    /// Check if migration is needed
    pub fn needs_migration(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Migrate to the latest schema version
    pub fn migrate(&mut self) -> StudioResult<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(StudioError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: self.schema_version,
            });
        }
        if self.needs_migration() {
            // Version 1 is the only format so far
            self.schema_version = SCHEMA_VERSION;
        }
        Ok(())
    }
}

impl Persistable for SchemaFile {
    fn file_extension() -> &'static str {
        SCHEMA_EXTENSION
    }

    fn schema_version() -> u32 {
        SCHEMA_VERSION
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a document to a file
///
/// # Example
///
/// ```rust,ignore
/// use studio_ir::{SchemaDocument, save_schema};
///
/// let doc = SchemaDocument::new("Shop");
/// save_schema(&doc, "shop.json").unwrap();
/// ```
pub fn save_schema(doc: &SchemaDocument, path: impl AsRef<Path>) -> StudioResult<()> {
    let path = path.as_ref();
    let json = save_schema_to_string(doc).map_err(|e| StudioError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| StudioError::DirectoryCreate {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
    }

    std::fs::write(path, json).map_err(|e| StudioError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Save a document to a versioned JSON string
pub fn save_schema_to_string(doc: &SchemaDocument) -> StudioResult<String> {
    SchemaFile::new(doc.clone()).to_json()
}

/// Export the bare document as pretty JSON
pub fn export_json(doc: &SchemaDocument) -> StudioResult<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a document from a file
pub fn load_schema(path: impl AsRef<Path>) -> StudioResult<SchemaDocument> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StudioError::SchemaNotFound(path.to_path_buf()));
    }

    let json = std::fs::read_to_string(path).map_err(|e| StudioError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_schema_from_string(&json).map_err(|e| match e {
        StudioError::JsonSerialization(je) => {
            StudioError::InvalidSchemaFormat(format!("{}: {}", path.display(), je))
        }
        other => other,
    })
}

/// Load a document from a JSON string, accepting the versioned wrapper or a
/// bare document
pub fn load_schema_from_string(json: &str) -> StudioResult<SchemaDocument> {
    if let Ok(mut file) = SchemaFile::from_json(json) {
        file.migrate()?;
        return Ok(file.schema);
    }

    import_json(json)
}

/// Import a bare exported document
pub fn import_json(json: &str) -> StudioResult<SchemaDocument> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Get the default file name for a schema (`My Shop` -> `my-shop.json`)
pub fn default_file_name(schema_name: &str) -> String {
    let slug = schema_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    let slug = if slug.is_empty() {
        "schema".to_string()
    } else {
        slug
    };
    format!("{}.{}", slug, SchemaFile::file_extension())
}

/// Ensure a path has the correct extension
pub fn ensure_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if path.extension().is_none_or(|e| e != SCHEMA_EXTENSION) {
        let mut new_path = path.to_path_buf();
        new_path.set_extension(SCHEMA_EXTENSION);
        new_path
    } else {
        path.to_path_buf()
    }
}

// ============================================================================
// Tests
// ============================================================================
