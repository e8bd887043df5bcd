//! Field definitions for entity properties
//!
//! This module contains the `Field` struct, one column of an entity card.
//! Column types are kept as free-form strings (`VARCHAR`, `INT`, `string`,
//! ...) because the target database is chosen at export time.

use crate::new_id;
use serde::{Deserialize, Serialize};
use studio_core::{FieldId, Named, StudioError, StudioResult, Validatable};

/// Column type assigned to fields created without an explicit type
pub const DEFAULT_FIELD_TYPE: &str = "string";

// ============================================================================
// Field
// ============================================================================

/// Represents a field within an entity (maps to a database column)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Unique identifier for this field (unique within its entity)
    pub id: FieldId,

    /// Field name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether this is the primary key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,

    /// Whether the field is required (NOT NULL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,

    /// Whether the field must be unique
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
}

impl Field {
    /// Create a new field with the given name and column type
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id: new_id("field"),
            name: name.into(),
            field_type: field_type.into(),
            is_primary: None,
            is_required: None,
            is_unique: None,
        }
    }

    /// Create the default `id` primary key field of a new entity
    pub fn primary_key() -> Self {
        Self {
            id: "id".to_string(),
            name: "id".to_string(),
            field_type: DEFAULT_FIELD_TYPE.to_string(),
            is_primary: Some(true),
            is_required: Some(true),
            is_unique: None,
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set an explicit identifier
    pub fn with_id(mut self, id: impl Into<FieldId>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark as primary key
    pub fn primary(mut self) -> Self {
        self.is_primary = Some(true);
        self.is_required = Some(true);
        self
    }

    /// Mark as required (NOT NULL)
    pub fn required(mut self) -> Self {
        self.is_required = Some(true);
        self
    }

    /// Mark as unique
    pub fn unique(mut self) -> Self {
        self.is_unique = Some(true);
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Whether this field is the primary key
    pub fn is_primary_key(&self) -> bool {
        self.is_primary.unwrap_or(false)
    }

    /// Whether this field is NOT NULL (primary keys always are)
    pub fn is_not_null(&self) -> bool {
        self.is_required.unwrap_or(false) || self.is_primary_key()
    }

    /// Whether this field carries a uniqueness constraint
    pub fn is_unique_key(&self) -> bool {
        self.is_unique.unwrap_or(false) || self.is_primary_key()
    }
}

impl Named for Field {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Validatable for Field {
    fn validate(&self) -> StudioResult<()> {
        if self.name.trim().is_empty() {
            return Err(StudioError::validation("Field name cannot be empty"));
        }
        if self.field_type.trim().is_empty() {
            return Err(StudioError::validation(format!(
                "Field '{}' has no type",
                self.name
            )));
        }
        Ok(())
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
    fn test_primary_key_field() {
        let pk = Field::primary_key();
        assert_eq!(pk.id, "id");
        assert!(pk.is_primary_key());
        assert!(pk.is_not_null());
        assert!(pk.is_unique_key());
    }

    #[test]
    fn test_optional_flags_omitted_on_wire() {
        let field = Field::new("email", "VARCHAR").with_id("f1").unique();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "f1",
                "name": "email",
                "type": "VARCHAR",
                "isUnique": true
            })
        );
    }

    #[test]
    fn test_deserialize_camel_case() {
        let field: Field = serde_json::from_str(
            r#"{"id":"f2","name":"total","type":"DECIMAL","isRequired":true}"#,
        )
        .unwrap();
        assert_eq!(field.field_type, "DECIMAL");
        assert!(field.is_not_null());
        assert!(!field.is_unique_key());
    }

    #[test]
    fn test_validate_blank_name() {
        let field = Field::new("  ", "INT");
        assert!(!field.is_valid());
    }
}
