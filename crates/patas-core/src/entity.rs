//! Entity types — the documents managed by the console.
//!
//! Every entity is a document in a schemaless store. The store assigns
//! opaque ids; the `created_at` timestamp is set by the client at form
//! submission time and never changes afterwards. Optional fields default on
//! deserialisation so documents written by older versions still decode.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::patch::{
  AnimalPatch, ProductPatch, SalePatch, ServicePatch, StaffPatch, TutorPatch,
  VisitPatch,
};

// ─── Entity trait ────────────────────────────────────────────────────────────

/// Ties a document type to its collection name and its field-level update
/// shape. Implemented by the seven entity types below and nothing else.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
  /// Collection name in the document store; doubles as the API route
  /// segment.
  const COLLECTION: &'static str;

  /// The patch accepted by [`crate::store::DocumentStore::update`].
  type Patch: Serialize + DeserializeOwned + Send + Sync + 'static;
}

/// A stored document: the store-assigned id plus the typed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<E> {
  pub id:     Uuid,
  #[serde(flatten)]
  pub fields: E,
}

// ─── Animal ──────────────────────────────────────────────────────────────────

/// An animal under care, belonging to at most one tutor by reference.
///
/// `tutor_id` is resolved at read time only; the store does not enforce it.
/// A dangling reference is an expected, labelled case — see
/// [`crate::view::resolve_tutor_labels`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
  pub name:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub species:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub breed:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tutor_id:   Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

impl Entity for Animal {
  const COLLECTION: &'static str = "animals";
  type Patch = AnimalPatch;
}

// ─── Tutor ───────────────────────────────────────────────────────────────────

/// The owner/guardian of zero or more animals — the client of the business.
/// Only the name is required at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutor {
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postal_code: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:        Option<String>,
  pub created_at:  DateTime<Utc>,
}

impl Entity for Tutor {
  const COLLECTION: &'static str = "tutors";
  type Patch = TutorPatch;
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// A service offered by the business, referenced by visits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category:    Option<String>,
  /// Non-negative or absent; validated client-side before submission.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price:       Option<f64>,
  pub created_at:  DateTime<Utc>,
}

impl Entity for Service {
  const COLLECTION: &'static str = "services";
  type Patch = ServicePatch;
}

// ─── Product ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  pub name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub price:       Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub stock:       Option<u32>,
  pub created_at:  DateTime<Utc>,
}

impl Entity for Product {
  const COLLECTION: &'static str = "products";
  type Patch = ProductPatch;
}

// ─── Sale ────────────────────────────────────────────────────────────────────

/// A recorded sale. `product` is free text, intentionally not a reference —
/// sales are denormalised and never joined against the product collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
  pub product:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quantity:   Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total:      Option<f64>,
  pub date:       NaiveDate,
  pub created_at: DateTime<Utc>,
}

impl Entity for Sale {
  const COLLECTION: &'static str = "sales";
  type Patch = SalePatch;
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
  pub name:       String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age:        Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:       Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Entity for Staff {
  const COLLECTION: &'static str = "staff";
  type Patch = StaffPatch;
}

// ─── Visit ───────────────────────────────────────────────────────────────────

/// A recorded instance of one or more services performed on one animal on a
/// given date.
///
/// Records written before the multi-service migration carry a single
/// `service_id`; newer records carry `service_ids`. Exactly one of the two is
/// the source of truth per record, and [`Visit::canonical_service_ids`]
/// always prefers the list form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
  pub animal_id:   Uuid,
  /// Legacy single-service reference; never written by current code.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_id:  Option<Uuid>,
  /// Preferred multi-service form.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub service_ids: Option<Vec<Uuid>>,
  pub date:        NaiveDate,
  #[serde(default)]
  pub notes:       String,
  pub created_at:  DateTime<Utc>,
}

impl Visit {
  /// The ordered service list to treat as canonical.
  ///
  /// Priority: a present, non-empty `service_ids` verbatim; else a singleton
  /// of the legacy `service_id`; else empty. Idempotent — re-normalising an
  /// already-canonical record yields the same list.
  pub fn canonical_service_ids(&self) -> Vec<Uuid> {
    match &self.service_ids {
      Some(ids) if !ids.is_empty() => ids.clone(),
      _ => self.service_id.map(|id| vec![id]).unwrap_or_default(),
    }
  }
}

impl Entity for Visit {
  const COLLECTION: &'static str = "visits";
  type Patch = VisitPatch;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn visit(service_id: Option<Uuid>, service_ids: Option<Vec<Uuid>>) -> Visit {
    Visit {
      animal_id: Uuid::new_v4(),
      service_id,
      service_ids,
      date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      notes: String::new(),
      created_at: Utc::now(),
    }
  }

  #[test]
  fn legacy_single_reference_becomes_singleton_list() {
    let s1 = Uuid::new_v4();
    let v = visit(Some(s1), None);
    assert_eq!(v.canonical_service_ids(), vec![s1]);
  }

  #[test]
  fn list_form_takes_priority_over_legacy() {
    let s1 = Uuid::new_v4();
    let s2 = Uuid::new_v4();
    let v = visit(Some(s1), Some(vec![s1, s2]));
    assert_eq!(v.canonical_service_ids(), vec![s1, s2]);
  }

  #[test]
  fn neither_field_yields_empty() {
    let v = visit(None, None);
    assert!(v.canonical_service_ids().is_empty());
  }

  #[test]
  fn empty_list_falls_back_to_legacy() {
    let s1 = Uuid::new_v4();
    let v = visit(Some(s1), Some(vec![]));
    assert_eq!(v.canonical_service_ids(), vec![s1]);
  }

  #[test]
  fn normalisation_is_idempotent() {
    let s1 = Uuid::new_v4();
    let s2 = Uuid::new_v4();
    for v in [
      visit(None, None),
      visit(Some(s1), None),
      visit(None, Some(vec![s1, s2])),
      visit(Some(s1), Some(vec![s2, s1])),
    ] {
      let once = v.canonical_service_ids();
      let renormalised = Visit {
        service_id:  None,
        service_ids: Some(once.clone()),
        ..v
      };
      assert_eq!(renormalised.canonical_service_ids(), once);
    }
  }

  #[test]
  fn legacy_visit_json_still_decodes() {
    // Shape written before the multi-service migration.
    let raw = r#"{
      "animal_id": "7f8a6e2e-45b2-4bd8-9f0a-0bd1c8f3a111",
      "service_id": "11f7c2a0-1b2c-4d3e-8f4a-5b6c7d8e9f00",
      "date": "2023-11-20",
      "notes": "nail trim",
      "created_at": "2023-11-20T14:00:00Z"
    }"#;
    let v: Visit = serde_json::from_str(raw).unwrap();
    assert!(v.service_ids.is_none());
    assert_eq!(v.canonical_service_ids().len(), 1);
  }
}
