//! Editing vocabulary
//!
//! Every discrete canvas action is an [`Edit`]. Applying an edit never
//! touches the input document: it returns a new document, or `None` when
//! the action would not change anything (so no history entry is created).
//!
//! Entity references accept either an entity ID or its exact name, which
//! keeps hand-written edit scripts readable.

use crate::document::SchemaDocument;
use crate::entity::Entity;
use crate::field::Field;
use crate::relationship::Relationship;
use serde::{Deserialize, Serialize};
use studio_core::{Position, RelationType, StudioError, StudioResult};

/// A single discrete edit to a schema document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    /// Add an entity with the default primary key, at the next free position
    AddEntity {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// Rename an entity
    RenameEntity { entity: String, name: String },
    /// Replace an entity wholesale
    UpdateEntity { value: Entity },
    /// Delete an entity and its relationships
    DeleteEntity { entity: String },
    /// Move an entity card; coordinates are clamped to the canvas
    MoveEntity { entity: String, x: f32, y: f32 },
    /// Append a field to an entity
    AddField { entity: String, field: Field },
    /// Replace a field (matched by ID)
    UpdateField { entity: String, field: Field },
    /// Remove a field (by ID or name)
    RemoveField { entity: String, field: String },
    /// Link two entities
    AddRelationship {
        from: String,
        to: String,
        #[serde(rename = "type", default)]
        relation_type: RelationType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    /// Delete a relationship
    DeleteRelationship { relationship: String },
    /// Rename the schema
    RenameSchema { name: String },
    /// Change the schema description
    SetDescription { description: String },
}

impl Edit {
    /// Short human-readable label, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Edit::AddEntity { .. } => "add entity",
            Edit::RenameEntity { .. } => "rename entity",
            Edit::UpdateEntity { .. } => "update entity",
            Edit::DeleteEntity { .. } => "delete entity",
            Edit::MoveEntity { .. } => "move entity",
            Edit::AddField { .. } => "add field",
            Edit::UpdateField { .. } => "update field",
            Edit::RemoveField { .. } => "remove field",
            Edit::AddRelationship { .. } => "add relationship",
            Edit::DeleteRelationship { .. } => "delete relationship",
            Edit::RenameSchema { .. } => "rename schema",
            Edit::SetDescription { .. } => "set description",
        }
    }

    /// Apply this edit, producing the next document
    ///
    /// Returns `Ok(None)` when the edit leaves the document unchanged.
    pub fn apply(&self, doc: &SchemaDocument) -> StudioResult<Option<SchemaDocument>> {
        let mut next = doc.clone();

        match self {
            Edit::AddEntity { name, id } => {
                let mut entity = Entity::new(name.trim());
                if let Some(id) = id {
                    if next.entity(id).is_some() {
                        return Err(StudioError::entity_validation(
                            id,
                            "an entity with this id already exists",
                        ));
                    }
                    entity.id = id.clone();
                }
                entity.position = next.next_entity_position();
                next.add_entity(entity);
            }

            Edit::RenameEntity { entity, name } => {
                let id = next.resolve_entity_id(entity)?;
                let name = name.trim();
                let target = entity_mut(&mut next, &id)?;
                if target.name == name {
                    return Ok(None);
                }
                target.name = name.to_string();
            }

            Edit::UpdateEntity { value } => {
                let target = entity_mut(&mut next, &value.id)?;
                if target == value {
                    return Ok(None);
                }
                *target = value.clone();
            }

            Edit::DeleteEntity { entity } => {
                let id = next.resolve_entity_id(entity)?;
                next.remove_entity(&id);
            }

            Edit::MoveEntity { entity, x, y } => {
                let id = next.resolve_entity_id(entity)?;
                let target = entity_mut(&mut next, &id)?;
                let position = Position::new(*x, *y).clamped();
                if target.position == position {
                    return Ok(None);
                }
                target.position = position;
            }

            Edit::AddField { entity, field } => {
                let id = next.resolve_entity_id(entity)?;
                entity_mut(&mut next, &id)?.add_field(field.clone())?;
            }

            Edit::UpdateField { entity, field } => {
                let id = next.resolve_entity_id(entity)?;
                let target = entity_mut(&mut next, &id)?;
                let entity_name = target.name.clone();
                let existing = target.get_field_mut(&field.id).ok_or_else(|| {
                    StudioError::FieldNotFound {
                        entity: entity_name,
                        field: field.id.clone(),
                    }
                })?;
                if existing == field {
                    return Ok(None);
                }
                *existing = field.clone();
            }

            Edit::RemoveField { entity, field } => {
                let id = next.resolve_entity_id(entity)?;
                let target = entity_mut(&mut next, &id)?;
                let field_id =
                    target
                        .resolve_field_id(field)
                        .ok_or_else(|| StudioError::FieldNotFound {
                            entity: target.name.clone(),
                            field: field.clone(),
                        })?;
                target.remove_field(&field_id);
            }

            Edit::AddRelationship {
                from,
                to,
                relation_type,
                id,
            } => {
                let from = next.resolve_entity_id(from)?;
                let to = next.resolve_entity_id(to)?;
                let mut relationship = Relationship::new(from, to, *relation_type);
                if let Some(id) = id {
                    relationship.id = id.clone();
                }
                next.add_relationship(relationship)?;
            }

            Edit::DeleteRelationship { relationship } => {
                if next.remove_relationship(relationship).is_none() {
                    return Err(StudioError::RelationshipNotFound(relationship.clone()));
                }
            }

            Edit::RenameSchema { name } => {
                let name = name.trim();
                if next.name == name {
                    return Ok(None);
                }
                next.name = name.to_string();
            }

            Edit::SetDescription { description } => {
                if next.description == *description {
                    return Ok(None);
                }
                next.description = description.clone();
            }
        }

        Ok(Some(next))
    }
}

fn entity_mut<'a>(doc: &'a mut SchemaDocument, id: &str) -> StudioResult<&'a mut Entity> {
    doc.entity_mut(id)
        .ok_or_else(|| StudioError::EntityNotFound(id.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
