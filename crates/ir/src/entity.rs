//! Entity definitions for data models
//!
//! This module contains the `Entity` struct, a card on the canvas that
//! maps to a database table.

use crate::field::Field;
use crate::new_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use studio_core::{
    EntityId, FieldId, Named, Position, Positioned, StudioError, StudioResult, Validatable,
};

// ============================================================================
// Entity
// ============================================================================

/// Represents a data entity (maps to a database table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique identifier for this entity
    pub id: EntityId,

    /// Entity name (e.g., "Customer", "Order")
    pub name: String,

    /// Fields (columns) in this entity, in display order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Position on the canvas
    #[serde(default)]
    pub position: Position,
}

impl Entity {
    /// Create a new entity with the given name and a default `id` primary key
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id("entity"),
            name: name.into(),
            fields: vec![Field::primary_key()],
            position: Position::zero(),
        }
    }

    /// Create an entity with no fields at all
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            ..Self::new(name)
        }
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set an explicit identifier
    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the position using x, y coordinates
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Add a field using builder pattern
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    // ========================================================================
    // Field management
    // ========================================================================

    /// Add a field, rejecting a name already used in this entity
    pub fn add_field(&mut self, field: Field) -> StudioResult<()> {
        if self.has_field_named(&field.name) {
            return Err(StudioError::DuplicateField {
                entity: self.name.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Remove a field by ID
    pub fn remove_field(&mut self, field_id: &str) -> Option<Field> {
        let pos = self.fields.iter().position(|f| f.id == field_id)?;
        Some(self.fields.remove(pos))
    }

    /// Get a field by ID
    pub fn get_field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// Get a mutable field by ID
    pub fn get_field_mut(&mut self, field_id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }

    /// Get a field by name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check whether a field with this name exists (case-insensitive)
    pub fn has_field_named(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name_matches(name))
    }

    /// Resolve a field by ID first, then by name
    pub fn resolve_field(&self, key: &str) -> Option<&Field> {
        self.get_field(key).or_else(|| self.get_field_by_name(key))
    }

    /// Identifier of the field matching `key`, by ID first then by name
    pub fn resolve_field_id(&self, key: &str) -> Option<FieldId> {
        self.resolve_field(key).map(|f| f.id.clone())
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    /// Get the primary key field
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_primary_key())
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Names of fields that appear more than once (case-insensitive)
    pub fn duplicate_field_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for field in &self.fields {
            let key = field.name.to_lowercase();
            if !seen.insert(key) && !duplicates.contains(&field.name) {
                duplicates.push(field.name.clone());
            }
        }
        duplicates
    }
}

impl Named for Entity {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Positioned for Entity {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

impl Validatable for Entity {
    fn validate(&self) -> StudioResult<()> {
        if self.name.trim().is_empty() {
            return Err(StudioError::entity_validation(
                &self.id,
                "Entity name cannot be empty",
            ));
        }

        for field in &self.fields {
            field
                .validate()
                .map_err(|e| StudioError::field_validation(&self.name, &field.name, e.to_string()))?;
        }

        if let Some(name) = self.duplicate_field_names().into_iter().next() {
            return Err(StudioError::DuplicateField {
                entity: self.name.clone(),
                field: name,
            });
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
