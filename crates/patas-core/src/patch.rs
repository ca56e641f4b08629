//! Field-level update shapes, one per entity type.
//!
//! A patch names exactly the fields it sets: absent fields are left
//! untouched by the store, and unknown fields are rejected at
//! deserialisation rather than silently accepted. Optional entity fields are
//! double-`Option`: the outer level distinguishes "leave unchanged" (key
//! absent) from "write" (key present), and an inner `None` serialises as an
//! explicit JSON `null`, which clears the stored value. Required fields stay
//! single-`Option` — they can be changed but never cleared. Updates are
//! always field-level merges, never full-document replaces, and `created_at`
//! is never patchable.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Deserialiser for double-`Option` fields. `#[serde(default)]` keeps an
/// absent key at `None`; this maps an explicit `null` to `Some(None)` instead
/// of collapsing it into the outer level.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimalPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:     Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub species:  Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub breed:    Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub tutor_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TutorPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub phone:       Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub email:       Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub address:     Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub postal_code: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub city:        Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServicePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub category:    Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub price:       Option<Option<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub description: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub price:       Option<Option<f64>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub stock:       Option<Option<u32>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SalePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub product:  Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub quantity: Option<Option<u32>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub total:    Option<Option<f64>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date:     Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaffPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub age:  Option<Option<u32>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub role: Option<Option<String>>,
}

/// Visit updates always write the list form, so editing a legacy
/// single-service record migrates it to `service_ids`. The legacy
/// `service_id` field is deliberately not patchable, and the service set and
/// date are required on every edit — no double-`Option` here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisitPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_ids: Option<Vec<Uuid>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date:        Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:       Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn absent_null_and_set_fields_are_distinguished() {
    let p: AnimalPatch =
      serde_json::from_str(r#"{"name":"Max","tutor_id":null}"#).unwrap();
    assert_eq!(p.name.as_deref(), Some("Max"));
    // Explicit null: write a clear.
    assert_eq!(p.tutor_id, Some(None));
    // Absent: leave unchanged.
    assert_eq!(p.species, None);
  }

  #[test]
  fn clears_serialise_as_explicit_null() {
    let p = AnimalPatch { tutor_id: Some(None), ..Default::default() };
    assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"tutor_id":null}"#);
  }

  #[test]
  fn set_values_serialise_plainly() {
    let p = TutorPatch {
      phone: Some(Some("11 91234-5678".into())),
      ..Default::default()
    };
    assert_eq!(
      serde_json::to_string(&p).unwrap(),
      r#"{"phone":"11 91234-5678"}"#
    );
  }

  #[test]
  fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<AnimalPatch>(r#"{"color":"brown"}"#).is_err());
  }
}
