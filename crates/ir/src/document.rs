//! Schema document - the root container edited on the canvas
//!
//! A `SchemaDocument` is the full, self-contained value that the editor
//! snapshots on every discrete edit. History entries hold it behind an
//! `Arc` (see [`Snapshot`]) and never mutate it afterwards; edits clone the
//! current document and produce a new value.

use crate::entity::Entity;
use crate::relationship::Relationship;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use studio_core::{EntityId, Named, Position, StudioError, StudioResult, Validatable};

/// Immutable, shareable snapshot of a schema document
pub type Snapshot = Arc<SchemaDocument>;

/// Name given to a brand new schema
pub const UNTITLED_NAME: &str = "Untitled Schema";

/// Description given to a brand new schema
pub const UNTITLED_DESCRIPTION: &str = "A new database schema";

// ============================================================================
// SchemaDocument
// ============================================================================

/// The edited document: entities and the relationships between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    /// Identifier assigned by the storage backend on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,

    /// Schema name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Entities, in canvas creation order
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Relationships, in creation order
    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Server-assigned creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Server-assigned update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Server-assigned modification timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl SchemaDocument {
    /// Create an empty schema with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_id: None,
            name: name.into(),
            description: String::new(),
            entities: Vec::new(),
            relationships: Vec::new(),
            created_at: None,
            updated_at: None,
            last_modified: None,
        }
    }

    /// The document a fresh editing session starts from
    pub fn untitled() -> Self {
        Self::new(UNTITLED_NAME).with_description(UNTITLED_DESCRIPTION)
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the storage identifier
    pub fn with_schema_id(mut self, schema_id: impl Into<String>) -> Self {
        self.schema_id = Some(schema_id.into());
        self
    }

    /// Add an entity using builder pattern
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a relationship using builder pattern
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Freeze this document into a history snapshot
    pub fn into_snapshot(self) -> Snapshot {
        Arc::new(self)
    }

    // ========================================================================
    // Entity management
    // ========================================================================

    /// Get an entity by ID
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable entity by ID
    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Get an entity by name
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Resolve an entity reference: an ID first, then an exact name
    pub fn resolve_entity(&self, key: &str) -> Option<&Entity> {
        self.entity(key).or_else(|| self.entity_by_name(key))
    }

    /// Resolve an entity reference to its ID, or fail with `EntityNotFound`
    pub fn resolve_entity_id(&self, key: &str) -> StudioResult<EntityId> {
        self.resolve_entity(key)
            .map(|e| e.id.clone())
            .ok_or_else(|| StudioError::EntityNotFound(key.to_string()))
    }

    /// Add an entity
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity and every relationship that references it
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let pos = self.entities.iter().position(|e| e.id == id)?;
        self.relationships.retain(|r| !r.involves(id));
        Some(self.entities.remove(pos))
    }

    /// Default canvas position for the next entity, staggered so new cards
    /// do not stack on top of each other
    pub fn next_entity_position(&self) -> Position {
        let n = self.entities.len() as f32;
        Position::new(50.0 + n * 80.0, 50.0 + n * 50.0)
    }

    // ========================================================================
    // Relationship management
    // ========================================================================

    /// Get a relationship by ID
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Find the relationship linking two entities in either direction
    pub fn relationship_between(&self, a: &str, b: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(a, b))
    }

    /// All relationships touching an entity
    pub fn relationships_for(&self, entity_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.involves(entity_id))
            .collect()
    }

    /// Add a relationship after checking both ends exist and the pair is
    /// not already linked
    pub fn add_relationship(&mut self, relationship: Relationship) -> StudioResult<()> {
        relationship.validate()?;

        let from = self
            .entity(&relationship.from_entity)
            .ok_or_else(|| StudioError::EntityNotFound(relationship.from_entity.clone()))?;
        let to = self
            .entity(&relationship.to_entity)
            .ok_or_else(|| StudioError::EntityNotFound(relationship.to_entity.clone()))?;

        if self
            .relationship_between(&relationship.from_entity, &relationship.to_entity)
            .is_some()
        {
            return Err(StudioError::DuplicateRelationship {
                from: from.name.clone(),
                to: to.name.clone(),
            });
        }

        self.relationships.push(relationship);
        Ok(())
    }

    /// Remove a relationship by ID
    pub fn remove_relationship(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.relationships.iter().position(|r| r.id == id)?;
        Some(self.relationships.remove(pos))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Number of entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Total number of fields across all entities
    pub fn field_count(&self) -> usize {
        self.entities.iter().map(Entity::field_count).sum()
    }

    /// Number of relationships
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the document has no entities and no relationships
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::untitled()
    }
}

impl Named for SchemaDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Validatable for SchemaDocument {
    fn validate(&self) -> StudioResult<()> {
        crate::validation::Validator::with_default_rules().validate_result(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
