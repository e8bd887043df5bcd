//! Relationship definitions between entities
//!
//! A relationship is an arrow on the canvas linking two entity cards.

use crate::new_id;
use serde::{Deserialize, Serialize};
use studio_core::{EntityId, RelationType, RelationshipId, StudioError, StudioResult, Validatable};

// ============================================================================
// Relationship
// ============================================================================

/// Represents a relationship between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    /// Unique identifier for this relationship
    pub id: RelationshipId,

    /// ID of the source entity (the "from" side)
    pub from_entity: EntityId,

    /// ID of the target entity (the "to" side)
    pub to_entity: EntityId,

    /// Cardinality of the relationship
    #[serde(rename = "type")]
    pub relation_type: RelationType,
}

impl Relationship {
    /// Create a new relationship between two entities
    pub fn new(
        from_entity: impl Into<EntityId>,
        to_entity: impl Into<EntityId>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            id: new_id("rel"),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            relation_type,
        }
    }

    /// Create a one-to-one relationship
    pub fn one_to_one(from_entity: impl Into<EntityId>, to_entity: impl Into<EntityId>) -> Self {
        Self::new(from_entity, to_entity, RelationType::OneToOne)
    }

    /// Create a one-to-many relationship
    pub fn one_to_many(from_entity: impl Into<EntityId>, to_entity: impl Into<EntityId>) -> Self {
        Self::new(from_entity, to_entity, RelationType::OneToMany)
    }

    /// Create a many-to-many relationship
    pub fn many_to_many(from_entity: impl Into<EntityId>, to_entity: impl Into<EntityId>) -> Self {
        Self::new(from_entity, to_entity, RelationType::ManyToMany)
    }

    /// Set an explicit identifier
    pub fn with_id(mut self, id: impl Into<RelationshipId>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether this relationship touches the given entity on either side
    pub fn involves(&self, entity_id: &str) -> bool {
        self.from_entity == entity_id || self.to_entity == entity_id
    }

    /// Whether this relationship links `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from_entity == a && self.to_entity == b)
            || (self.from_entity == b && self.to_entity == a)
    }

    /// Whether both ends point at the same entity
    pub fn is_self_referential(&self) -> bool {
        self.from_entity == self.to_entity
    }
}

impl Validatable for Relationship {
    fn validate(&self) -> StudioResult<()> {
        if self.from_entity.is_empty() || self.to_entity.is_empty() {
            return Err(StudioError::RelationshipValidation(format!(
                "relationship '{}' has an empty endpoint",
                self.id
            )));
        }
        if self.is_self_referential() {
            return Err(StudioError::RelationshipValidation(format!(
                "relationship '{}' links entity '{}' to itself",
                self.id, self.from_entity
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
    fn test_connects_either_direction() {
        let rel = Relationship::one_to_many("customer", "order");
        assert!(rel.connects("customer", "order"));
        assert!(rel.connects("order", "customer"));
        assert!(!rel.connects("customer", "invoice"));
        assert!(rel.involves("order"));
    }

    #[test]
    fn test_self_reference_is_invalid() {
        let rel = Relationship::one_to_one("node", "node");
        assert!(rel.is_self_referential());
        assert!(!rel.is_valid());
    }

    #[test]
    fn test_wire_format() {
        let rel = Relationship::many_to_many("a", "b").with_id("r1");
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "r1",
                "fromEntity": "a",
                "toEntity": "b",
                "type": "many-to-many"
            })
        );
    }
}
