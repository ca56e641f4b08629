//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings; document fields are
//! stored as compact JSON objects.

use patas_core::entity::{Document, Entity};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Documents ────────────────────────────────────────────────────────────────

/// Rebuild a typed document from a `documents` row.
pub fn decode_document<E: Entity>(
  doc_id: &str,
  fields_json: &str,
) -> Result<Document<E>> {
  Ok(Document {
    id:     decode_uuid(doc_id)?,
    fields: serde_json::from_str(fields_json)?,
  })
}

// ─── Patch merge ──────────────────────────────────────────────────────────────

/// Shallow-merge a serialised patch into a stored fields object.
///
/// The patch serialises only the fields it writes, so every key present in
/// it overwrites the stored value; everything else is left untouched. An
/// explicit `null` clears the field — its key is removed from the stored
/// object. Both inputs must be JSON objects.
pub fn merge_fields(existing: &str, patch: &str) -> Result<String> {
  let mut doc: serde_json::Value = serde_json::from_str(existing)?;
  let patch: serde_json::Value = serde_json::from_str(patch)?;

  let serde_json::Value::Object(patch_map) = patch else {
    return Err(Error::InvalidDocument("patch is not a JSON object".into()));
  };
  let Some(doc_map) = doc.as_object_mut() else {
    return Err(Error::InvalidDocument(
      "stored fields are not a JSON object".into(),
    ));
  };

  for (key, value) in patch_map {
    if value.is_null() {
      doc_map.remove(&key);
    } else {
      doc_map.insert(key, value);
    }
  }

  Ok(doc.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn merge_overwrites_named_fields_only() {
    let existing = r#"{"name":"Rex","species":"dog","breed":"vira-lata"}"#;
    let patch = r#"{"name":"Max"}"#;
    let merged: serde_json::Value =
      serde_json::from_str(&merge_fields(existing, patch).unwrap()).unwrap();
    assert_eq!(merged["name"], "Max");
    assert_eq!(merged["species"], "dog");
    assert_eq!(merged["breed"], "vira-lata");
  }

  #[test]
  fn merge_can_introduce_new_fields() {
    // A legacy visit gains service_ids on its first edit.
    let existing = r#"{"animal_id":"a","service_id":"s1"}"#;
    let patch = r#"{"service_ids":["s1","s2"]}"#;
    let merged: serde_json::Value =
      serde_json::from_str(&merge_fields(existing, patch).unwrap()).unwrap();
    assert_eq!(merged["service_ids"].as_array().unwrap().len(), 2);
    assert_eq!(merged["service_id"], "s1");
  }

  #[test]
  fn merge_drops_fields_patched_to_null() {
    let existing = r#"{"name":"Rex","species":"dog","tutor_id":"t1"}"#;
    let patch = r#"{"tutor_id":null}"#;
    let merged: serde_json::Value =
      serde_json::from_str(&merge_fields(existing, patch).unwrap()).unwrap();
    assert!(merged.get("tutor_id").is_none());
    assert_eq!(merged["name"], "Rex");
  }

  #[test]
  fn non_object_patch_is_rejected() {
    assert!(matches!(
      merge_fields(r#"{"name":"Rex"}"#, "[1,2]"),
      Err(Error::InvalidDocument(_))
    ));
  }
}
