//! Core traits for Schema Studio
//!
//! This module defines the traits that document components implement to
//! provide consistent behavior for validation, persistence and canvas layout.

use crate::error::StudioResult;
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use studio_core::{Validatable, StudioResult, StudioError};
///
/// struct Column {
///     name: String,
/// }
///
/// impl Validatable for Column {
///     fn validate(&self) -> StudioResult<()> {
///         if self.name.trim().is_empty() {
///             return Err(StudioError::validation("Name cannot be empty"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or a `StudioError` describing the problem.
    fn validate(&self) -> StudioResult<()>;

    /// Check if the object is valid without returning error details
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get all validation errors (for types that can have multiple errors)
    fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => vec![],
            Err(e) => vec![e.to_string()],
        }
    }
}

// ============================================================================
// Persistable Trait
// ============================================================================

/// Trait for types that can be serialized to and deserialized from JSON
pub trait Persistable: Serialize + DeserializeOwned + Sized {
    /// Get the file extension for this type (without the leading dot)
    fn file_extension() -> &'static str;

    /// Get the schema version for migration purposes
    fn schema_version() -> u32 {
        1
    }

    /// Save to a pretty JSON string
    fn to_json(&self) -> StudioResult<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Load from a JSON string
    fn from_json(json: &str) -> StudioResult<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

// ============================================================================
// Named Trait
// ============================================================================

/// Trait for types that have a human-readable name
pub trait Named {
    /// Get the name
    fn name(&self) -> &str;

    /// Set the name
    fn set_name(&mut self, name: String);

    /// Check if the name matches (case-insensitive)
    fn name_matches(&self, other: &str) -> bool {
        self.name().eq_ignore_ascii_case(other)
    }
}

// ============================================================================
// Positioned Trait
// ============================================================================

/// Trait for types that have a position on the canvas
pub trait Positioned {
    /// Get the current position
    fn position(&self) -> crate::types::Position;

    /// Set the position
    fn set_position(&mut self, position: crate::types::Position);

    /// Move by a relative offset
    fn translate(&mut self, dx: f32, dy: f32) {
        let pos = self.position();
        self.set_position(pos.offset(dx, dy));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    struct TestValidatable {
        valid: bool,
    }

    impl Validatable for TestValidatable {
        fn validate(&self) -> StudioResult<()> {
            if self.valid {
                Ok(())
            } else {
                Err(crate::error::StudioError::validation("Invalid state"))
            }
        }
    }

    #[test]
    fn test_validatable_trait() {
        let valid = TestValidatable { valid: true };
        assert!(valid.is_valid());
        assert!(valid.validation_errors().is_empty());

        let invalid = TestValidatable { valid: false };
        assert!(!invalid.is_valid());
        assert_eq!(invalid.validation_errors().len(), 1);
    }

    struct Card {
        name: String,
        position: Position,
    }

    impl Named for Card {
        fn name(&self) -> &str {
            &self.name
        }

        fn set_name(&mut self, name: String) {
            self.name = name;
        }
    }

    impl Positioned for Card {
        fn position(&self) -> Position {
            self.position
        }

        fn set_position(&mut self, position: Position) {
            self.position = position;
        }
    }

    #[test]
    fn test_named_and_positioned() {
        let mut card = Card {
            name: "Customer".to_string(),
            position: Position::zero(),
        };
        assert!(card.name_matches("customer"));

        card.translate(20.0, 30.0);
        assert_eq!(card.position(), Position::new(20.0, 30.0));
    }
}
