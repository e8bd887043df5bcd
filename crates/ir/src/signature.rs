//! Change-detection signatures
//!
//! A [`Signature`] is the canonical textual form of a document's content.
//! Two documents with the same logical content always produce the same
//! signature, whatever order their object keys were inserted in.
//!
//! Fields the storage backend rewrites on every save are excluded, otherwise
//! each successful save would change the signature and schedule the next one.
//! The exclusion list is fixed: a new server-managed field must be added to
//! [`VOLATILE_FIELDS`] by hand.

use crate::document::SchemaDocument;
use serde_json::Value;
use std::fmt::Write as _;
use studio_core::StudioResult;

/// Document-level keys excluded from change detection
pub const VOLATILE_FIELDS: &[&str] = &["lastModified", "updatedAt", "createdAt"];

/// Canonical content signature of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the canonical text in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical text is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize a document and strip its volatile fields
pub fn normalize(doc: &SchemaDocument) -> StudioResult<Value> {
    let mut value = serde_json::to_value(doc)?;
    strip_volatile(&mut value);
    Ok(value)
}

/// Remove [`VOLATILE_FIELDS`] from a top-level JSON object
pub fn strip_volatile(value: &mut Value) {
    if let Value::Object(map) = value {
        for key in VOLATILE_FIELDS {
            map.remove(*key);
        }
    }
}

/// Compute the change-detection signature of a document
pub fn signature(doc: &SchemaDocument) -> StudioResult<Signature> {
    Ok(Signature(canonical_json(&normalize(doc)?)))
}

/// Render a JSON value with object keys sorted at every depth
///
/// Arrays keep their order: entity, field and relationship order is part
/// of the document's content.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        // Scalars already have a single canonical rendering
        other => {
            let _ = write!(out, "{}", other);
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    // serde_json's Display for a string value applies JSON escaping
    let _ = write!(out, "{}", Value::String(s.to_string()));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, Field, Relationship};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn shop() -> SchemaDocument {
        SchemaDocument::new("Shop")
            .with_entity(
                Entity::new("Customer")
                    .with_id("c")
                    .with_field(Field::new("email", "VARCHAR").with_id("f1").unique()),
            )
            .with_entity(Entity::new("Order").with_id("o"))
            .with_relationship(Relationship::one_to_many("c", "o").with_id("r1"))
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let a = json!({"b": {"z": 1, "a": [{"y": true, "x": null}]}, "a": "s"});
        assert_eq!(
            canonical_json(&a),
            r#"{"a":"s","b":{"a":[{"x":null,"y":true}],"z":1}}"#
        );
    }

    #[test]
    fn test_canonical_json_independent_of_insertion_order() {
        let mut first = serde_json::Map::new();
        first.insert("name".to_string(), json!("Shop"));
        first.insert("entities".to_string(), json!([{"name": "A", "id": "1"}]));

        let mut second = serde_json::Map::new();
        second.insert("entities".to_string(), json!([{"id": "1", "name": "A"}]));
        second.insert("name".to_string(), json!("Shop"));

        assert_eq!(
            canonical_json(&Value::Object(first)),
            canonical_json(&Value::Object(second))
        );
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let value = json!({"name": "say \"hi\"\n"});
        assert_eq!(canonical_json(&value), r#"{"name":"say \"hi\"\n"}"#);
    }

    #[test]
    fn test_signature_ignores_volatile_fields() {
        let plain = shop();
        let mut stamped = shop();
        stamped.created_at = Some(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        stamped.updated_at = Some(Utc::now());
        stamped.last_modified = Some(Utc::now());

        assert_eq!(signature(&plain).unwrap(), signature(&stamped).unwrap());
    }

    #[test]
    fn test_signature_tracks_content() {
        let base = signature(&shop()).unwrap();

        let mut renamed = shop();
        renamed.name = "Shop2".to_string();
        assert_ne!(base, signature(&renamed).unwrap());

        let mut moved = shop();
        moved.entities[1].position.x += 1.0;
        assert_ne!(base, signature(&moved).unwrap());

        let mut nested = shop();
        nested.entities[0].fields[1].is_required = Some(true);
        assert_ne!(base, signature(&nested).unwrap());
    }

    #[test]
    fn test_signature_includes_schema_id() {
        let base = signature(&shop()).unwrap();
        let identified = signature(&shop().with_schema_id("123456")).unwrap();
        assert_ne!(base, identified);
    }

    #[test]
    fn test_normalize_strips_only_top_level() {
        let mut stamped = shop();
        stamped.updated_at = Some(Utc::now());
        let value = normalize(&stamped).unwrap();
        assert!(value.get("updatedAt").is_none());
        assert_eq!(value["name"], json!("Shop"));
    }
}
