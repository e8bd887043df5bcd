//! Validation rules and utilities for schema documents
//!
//! Two levels of checking live here:
//!
//! - [`is_saveable`]: the minimal shape check autosave applies before
//!   persisting. A document that fails it is "not ready to save", not broken.
//! - [`Validator`]: a rule-based pass over the whole document, reporting
//!   errors and warnings for the command-line `validate` command.

use crate::SchemaDocument;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use studio_core::{StudioError, StudioResult};

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Minimal validity required before a document is persisted
pub fn is_saveable(doc: &SchemaDocument) -> bool {
    !doc.name.trim().is_empty()
}

/// Whether a name can be used as a table/type identifier in generated code
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether any error carries the given code
    pub fn has_error_code(&self, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Convert to StudioResult (fails if any errors)
    pub fn to_result(self) -> StudioResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            Err(StudioError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g., "entities.Customer.fields.email")
    pub path: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    // Schema errors
    EmptySchemaName,

    // Entity errors
    EmptyEntityName,
    DuplicateEntityId,
    DuplicateEntityName,

    // Field errors
    EmptyFieldName,
    DuplicateFieldName,

    // Relationship errors
    OrphanRelationship,
    SelfRelationship,
    DuplicateRelationship,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Warning code
    pub code: ValidationWarningCode,

    /// Human-readable warning message
    pub message: String,

    /// Path to the element
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Create a new warning
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] Warning: {}", path, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningCode {
    NoPrimaryKey,
    InvalidIdentifier,
    NoDescription,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait for validation rules
pub trait ValidationRule: Send + Sync {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Validate a document and return the result
    fn validate(&self, doc: &SchemaDocument) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Document validator that runs multiple validation rules
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a validator with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with the built-in rules
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(SchemaMetaRule));
        validator.add_rule(Box::new(EntityNamesRule));
        validator.add_rule(Box::new(EntityFieldsRule));
        validator.add_rule(Box::new(RelationshipsRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate a document with all rules
    pub fn validate(&self, doc: &SchemaDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for rule in &self.rules {
            result.merge(rule.validate(doc));
        }
        result
    }

    /// Validate and return Result
    pub fn validate_result(&self, doc: &SchemaDocument) -> StudioResult<()> {
        self.validate(doc).to_result()
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

/// Rule: schema name and description
pub struct SchemaMetaRule;

impl ValidationRule for SchemaMetaRule {
    fn name(&self) -> &'static str {
        "schema_meta"
    }

    fn description(&self) -> &'static str {
        "Validates that the schema has a name"
    }

    fn validate(&self, doc: &SchemaDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if !is_saveable(doc) {
            result.add_error(
                ValidationError::new(
                    ValidationErrorCode::EmptySchemaName,
                    "Schema name cannot be empty",
                )
                .with_path("name"),
            );
        }

        if doc.description.trim().is_empty() {
            result.add_warning(
                ValidationWarning::new(
                    ValidationWarningCode::NoDescription,
                    "Schema has no description",
                )
                .with_path("description"),
            );
        }

        result
    }
}

/// Rule: entity identifiers and names
pub struct EntityNamesRule;

impl ValidationRule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity_names"
    }

    fn description(&self) -> &'static str {
        "Validates that entity ids and names are present and unique"
    }

    fn validate(&self, doc: &SchemaDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_ids: HashSet<&str> = HashSet::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for entity in &doc.entities {
            if !seen_ids.insert(entity.id.as_str()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateEntityId,
                        format!("Duplicate entity id: '{}'", entity.id),
                    )
                    .with_path(format!("entities.{}", entity.id)),
                );
            }

            let name = entity.name.trim();
            if name.is_empty() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::EmptyEntityName,
                        "Entity name cannot be empty",
                    )
                    .with_path(format!("entities.{}", entity.id)),
                );
                continue;
            }

            if !is_valid_identifier(name) {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::InvalidIdentifier,
                        format!("Entity name '{}' is not a valid identifier", name),
                    )
                    .with_path(format!("entities.{}", name)),
                );
            }

            if !seen_names.insert(name.to_lowercase()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateEntityName,
                        format!("Duplicate entity name: '{}'", name),
                    )
                    .with_path(format!("entities.{}", name)),
                );
            }
        }

        result
    }
}

/// Rule: fields within each entity
pub struct EntityFieldsRule;

impl ValidationRule for EntityFieldsRule {
    fn name(&self) -> &'static str {
        "entity_fields"
    }

    fn description(&self) -> &'static str {
        "Validates field names and primary keys"
    }

    fn validate(&self, doc: &SchemaDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for entity in &doc.entities {
            let entity_path = format!("entities.{}", entity.name);

            if entity.primary_key().is_none() {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::NoPrimaryKey,
                        format!("Entity '{}' has no primary key", entity.name),
                    )
                    .with_path(&entity_path),
                );
            }

            for field in &entity.fields {
                if field.name.trim().is_empty() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::EmptyFieldName,
                            format!("Entity '{}' has a field without a name", entity.name),
                        )
                        .with_path(format!("{}.fields.{}", entity_path, field.id)),
                    );
                }
            }

            for name in entity.duplicate_field_names() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateFieldName,
                        format!("Duplicate field '{}' in entity '{}'", name, entity.name),
                    )
                    .with_path(format!("{}.fields.{}", entity_path, name)),
                );
            }
        }

        result
    }
}

/// Rule: relationship endpoints
pub struct RelationshipsRule;

impl ValidationRule for RelationshipsRule {
    fn name(&self) -> &'static str {
        "relationships"
    }

    fn description(&self) -> &'static str {
        "Validates that relationships link two distinct existing entities once"
    }

    fn validate(&self, doc: &SchemaDocument) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();

        for rel in &doc.relationships {
            let path = format!("relationships.{}", rel.id);

            for end in [&rel.from_entity, &rel.to_entity] {
                if doc.entity(end).is_none() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::OrphanRelationship,
                            format!("Relationship '{}' references unknown entity '{}'", rel.id, end),
                        )
                        .with_path(&path),
                    );
                }
            }

            if rel.is_self_referential() {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::SelfRelationship,
                        format!("Relationship '{}' links an entity to itself", rel.id),
                    )
                    .with_path(&path),
                );
                continue;
            }

            let pair = if rel.from_entity <= rel.to_entity {
                (rel.from_entity.as_str(), rel.to_entity.as_str())
            } else {
                (rel.to_entity.as_str(), rel.from_entity.as_str())
            };
            if !seen_pairs.insert(pair) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateRelationship,
                        format!(
                            "Entities '{}' and '{}' are linked more than once",
                            pair.0, pair.1
                        ),
                    )
                    .with_path(&path),
                );
            }
        }

        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, Field, Relationship};

    fn valid_doc() -> SchemaDocument {
        SchemaDocument::new("Shop")
            .with_description("Online shop")
            .with_entity(Entity::new("Customer").with_id("c"))
            .with_entity(Entity::new("Order").with_id("o"))
            .with_relationship(Relationship::one_to_many("c", "o"))
    }

    #[test]
    fn test_is_saveable() {
        assert!(is_saveable(&SchemaDocument::new("Shop")));
        assert!(!is_saveable(&SchemaDocument::new("")));
        assert!(!is_saveable(&SchemaDocument::new("   ")));
    }

    #[test]
    fn test_valid_identifier() {
        assert!(is_valid_identifier("OrderLine"));
        assert!(is_valid_identifier("_tmp2"));
        assert!(!is_valid_identifier("Order Line"));
        assert!(!is_valid_identifier("2fa"));
    }

    #[test]
    fn test_valid_document() {
        let result = Validator::with_default_rules().validate(&valid_doc());
        assert!(result.valid, "{:?}", result.errors);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_blank_schema_name() {
        let mut doc = valid_doc();
        doc.name = " ".to_string();
        let result = Validator::with_default_rules().validate(&doc);
        assert!(result.has_error_code(ValidationErrorCode::EmptySchemaName));
    }

    #[test]
    fn test_duplicate_entities() {
        let doc = valid_doc()
            .with_entity(Entity::new("customer").with_id("c"));
        let result = Validator::with_default_rules().validate(&doc);
        assert!(result.has_error_code(ValidationErrorCode::DuplicateEntityId));
        assert!(result.has_error_code(ValidationErrorCode::DuplicateEntityName));
    }

    #[test]
    fn test_field_problems() {
        let doc = SchemaDocument::new("Shop").with_entity(
            Entity::empty("Order")
                .with_field(Field::new("total", "DECIMAL"))
                .with_field(Field::new("Total", "INT"))
                .with_field(Field::new("", "INT")),
        );
        let result = Validator::with_default_rules().validate(&doc);
        assert!(result.has_error_code(ValidationErrorCode::DuplicateFieldName));
        assert!(result.has_error_code(ValidationErrorCode::EmptyFieldName));
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.code == ValidationWarningCode::NoPrimaryKey)
        );
    }

    #[test]
    fn test_relationship_problems() {
        let doc = valid_doc()
            .with_relationship(Relationship::one_to_one("o", "c"))
            .with_relationship(Relationship::one_to_one("c", "ghost"))
            .with_relationship(Relationship::one_to_one("o", "o"));
        let result = Validator::with_default_rules().validate(&doc);
        assert!(result.has_error_code(ValidationErrorCode::DuplicateRelationship));
        assert!(result.has_error_code(ValidationErrorCode::OrphanRelationship));
        assert!(result.has_error_code(ValidationErrorCode::SelfRelationship));
    }

    #[test]
    fn test_to_result_joins_messages() {
        let err = Validator::with_default_rules()
            .validate_result(&SchemaDocument::new(""))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Schema name cannot be empty"));
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(
            Validator::with_default_rules().rule_names(),
            vec!["schema_meta", "entity_names", "entity_fields", "relationships"]
        );
    }
}
