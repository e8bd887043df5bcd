//! Core types used throughout Schema Studio
//!
//! This module contains the primitive types shared by the document model,
//! the editing state engine and the command-line tools.

use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of an entity within a schema document
pub type EntityId = String;

/// Identifier of a field within an entity
pub type FieldId = String;

/// Identifier of a relationship within a schema document
pub type RelationshipId = String;

/// Identifier assigned to a schema by the storage backend
pub type SchemaId = String;

// ============================================================================
// Geometry Types
// ============================================================================

/// Position on the 2D canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a position at the origin (0, 0)
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Add an offset to this position
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp both coordinates so the position stays inside the canvas
    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

// ============================================================================
// Relationship Types
// ============================================================================

/// Cardinality of a relationship between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RelationType {
    /// One record relates to exactly one other record
    OneToOne,
    /// One record relates to many others (e.g., Customer has many Orders)
    #[default]
    OneToMany,
    /// Many-to-many through a junction table
    ManyToMany,
}

impl RelationType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "One to One",
            RelationType::OneToMany => "One to Many",
            RelationType::ManyToMany => "Many to Many",
        }
    }

    /// Get the wire name (`one-to-many`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "one-to-one",
            RelationType::OneToMany => "one-to-many",
            RelationType::ManyToMany => "many-to-many",
        }
    }

    /// Get arrow symbol for visual representation
    pub fn arrow_symbol(&self) -> &'static str {
        match self {
            RelationType::OneToOne => "1 ─── 1",
            RelationType::OneToMany => "1 ───< *",
            RelationType::ManyToMany => "* >──< *",
        }
    }

    /// Check if this relationship requires a junction table
    pub fn requires_junction_table(&self) -> bool {
        matches!(self, RelationType::ManyToMany)
    }

    /// All relationship types, in menu order
    pub fn all() -> &'static [RelationType] {
        &[
            RelationType::OneToOne,
            RelationType::OneToMany,
            RelationType::ManyToMany,
        ]
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for RelationType {
    type Err = crate::error::StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                crate::error::StudioError::RelationshipValidation(format!(
                    "unknown relationship type '{}'",
                    s
                ))
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
