//! Computed read models — never stored, always derived.
//!
//! The store keeps references denormalised (an animal carries only a tutor
//! id), so the joins happen here, client-side, over already-fetched
//! snapshots. Every function is pure and total: an unset or dangling
//! reference resolves to a sentinel label, never to an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Animal, Document, Service, Tutor};

/// Label substituted when an animal carries no tutor reference.
pub const NO_TUTOR: &str = "no tutor";

/// Label substituted when a tutor reference does not resolve.
pub const TUTOR_NOT_FOUND: &str = "tutor not found";

// ─── Name indexes ────────────────────────────────────────────────────────────

/// Hash index from tutor id to tutor name, for O(1) reference resolution.
pub fn tutor_name_index(tutors: &[Document<Tutor>]) -> HashMap<Uuid, String> {
  tutors
    .iter()
    .map(|t| (t.id, t.fields.name.clone()))
    .collect()
}

/// Hash index from service id to service name.
pub fn service_name_index(
  services: &[Document<Service>],
) -> HashMap<Uuid, String> {
  services
    .iter()
    .map(|s| (s.id, s.fields.name.clone()))
    .collect()
}

// ─── Reference resolver ──────────────────────────────────────────────────────

/// An animal document enriched with a human-readable tutor label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalRow {
  pub doc:         Document<Animal>,
  pub tutor_label: String,
}

/// Resolve one tutor reference against a name index.
///
/// This is the single home of the resolution policy: no reference →
/// [`NO_TUTOR`]; a reference that does not match any indexed tutor →
/// [`TUTOR_NOT_FOUND`]; otherwise the tutor's name. Row renderers resolving
/// a single reference go through here too.
pub fn tutor_label(
  tutor_id: Option<Uuid>,
  names: &HashMap<Uuid, String>,
) -> String {
  match tutor_id {
    None => NO_TUTOR.to_string(),
    Some(id) => names
      .get(&id)
      .cloned()
      .unwrap_or_else(|| TUTOR_NOT_FOUND.to_string()),
  }
}

/// Resolve each animal's tutor reference to a display label, applying
/// [`tutor_label`] over a snapshot. The output preserves the animals' fetch
/// order.
pub fn resolve_tutor_labels(
  animals: &[Document<Animal>],
  tutors: &[Document<Tutor>],
) -> Vec<AnimalRow> {
  let names = tutor_name_index(tutors);
  animals
    .iter()
    .map(|a| AnimalRow {
      doc:         a.clone(),
      tutor_label: tutor_label(a.fields.tutor_id, &names),
    })
    .collect()
}

// ─── Per-tutor aggregator ────────────────────────────────────────────────────

/// Group animals by owner.
///
/// The mapping contains every fetched tutor id exactly once — tutors with no
/// animals map to an empty list — and each list follows the animals' fetch
/// order. Animals whose reference is unset or dangling appear in no list.
/// Drives the tutors screen's expand/collapse detail only; no write path
/// reads this.
pub fn animals_by_tutor(
  tutors: &[Document<Tutor>],
  animals: &[Document<Animal>],
) -> HashMap<Uuid, Vec<Document<Animal>>> {
  let mut grouped: HashMap<Uuid, Vec<Document<Animal>>> =
    tutors.iter().map(|t| (t.id, Vec::new())).collect();

  for animal in animals {
    if let Some(tutor_id) = animal.fields.tutor_id
      && let Some(list) = grouped.get_mut(&tutor_id)
    {
      list.push(animal.clone());
    }
  }

  grouped
}

// ─── Service labels ──────────────────────────────────────────────────────────

/// Resolve a canonical service-id list to display labels, defaulting to the
/// raw id string when a service is not in the index (e.g. deleted since the
/// visit was recorded).
pub fn service_labels(
  ids: &[Uuid],
  names: &HashMap<Uuid, String>,
) -> Vec<String> {
  ids
    .iter()
    .map(|id| names.get(id).cloned().unwrap_or_else(|| id.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, Utc};

  use super::*;
  use crate::entity::Visit;

  fn tutor(name: &str) -> Document<Tutor> {
    Document {
      id:     Uuid::new_v4(),
      fields: Tutor {
        name:        name.into(),
        phone:       None,
        email:       None,
        address:     None,
        postal_code: None,
        city:        None,
        created_at:  Utc::now(),
      },
    }
  }

  fn animal(name: &str, tutor_id: Option<Uuid>) -> Document<Animal> {
    Document {
      id:     Uuid::new_v4(),
      fields: Animal {
        name: name.into(),
        species: None,
        breed: None,
        tutor_id,
        created_at: Utc::now(),
      },
    }
  }

  fn service(name: &str) -> Document<Service> {
    Document {
      id:     Uuid::new_v4(),
      fields: Service {
        name:        name.into(),
        description: None,
        category:    None,
        price:       None,
        created_at:  Utc::now(),
      },
    }
  }

  // ── Reference resolver ────────────────────────────────────────────────────

  #[test]
  fn resolves_matching_reference_to_tutor_name() {
    let t = tutor("Maria");
    let rows = resolve_tutor_labels(&[animal("Rex", Some(t.id))], &[t]);
    assert_eq!(rows[0].tutor_label, "Maria");
  }

  #[test]
  fn unset_reference_gets_no_tutor_sentinel() {
    let rows = resolve_tutor_labels(&[animal("Rex", None)], &[tutor("Maria")]);
    assert_eq!(rows[0].tutor_label, NO_TUTOR);
  }

  #[test]
  fn dangling_reference_gets_not_found_sentinel() {
    let rows =
      resolve_tutor_labels(&[animal("Rex", Some(Uuid::new_v4()))], &[]);
    assert_eq!(rows[0].tutor_label, TUTOR_NOT_FOUND);
  }

  #[test]
  fn single_reference_labels_match_the_resolver() {
    let t = tutor("Maria");
    let names = tutor_name_index(&[t.clone()]);
    assert_eq!(tutor_label(Some(t.id), &names), "Maria");
    assert_eq!(tutor_label(None, &names), NO_TUTOR);
    assert_eq!(tutor_label(Some(Uuid::new_v4()), &names), TUTOR_NOT_FOUND);
  }

  #[test]
  fn resolver_preserves_fetch_order() {
    let t = tutor("Maria");
    let animals =
      vec![animal("Rex", Some(t.id)), animal("Bidu", None), animal("Mel", Some(t.id))];
    let rows = resolve_tutor_labels(&animals, &[t]);
    let names: Vec<_> = rows.iter().map(|r| r.doc.fields.name.as_str()).collect();
    assert_eq!(names, ["Rex", "Bidu", "Mel"]);
  }

  // ── Aggregator ────────────────────────────────────────────────────────────

  #[test]
  fn every_tutor_appears_even_with_no_animals() {
    let t1 = tutor("Maria");
    let t2 = tutor("João");
    let grouped = animals_by_tutor(&[t1.clone(), t2.clone()], &[]);
    assert_eq!(grouped.len(), 2);
    assert!(grouped[&t1.id].is_empty());
    assert!(grouped[&t2.id].is_empty());
  }

  #[test]
  fn union_of_groups_equals_animals_with_matching_references() {
    let t1 = tutor("Maria");
    let t2 = tutor("João");
    let a1 = animal("Rex", Some(t1.id));
    let a2 = animal("Mel", Some(t1.id));
    let a3 = animal("Bidu", Some(t2.id));
    let orphan = animal("Fred", None);
    let dangling = animal("Ghost", Some(Uuid::new_v4()));

    let grouped = animals_by_tutor(
      &[t1.clone(), t2.clone()],
      &[a1.clone(), a2.clone(), a3.clone(), orphan, dangling],
    );

    let mut union: Vec<Uuid> =
      grouped.values().flatten().map(|a| a.id).collect();
    union.sort();
    let mut expected = vec![a1.id, a2.id, a3.id];
    expected.sort();
    assert_eq!(union, expected);
  }

  #[test]
  fn group_lists_follow_fetch_order() {
    let t = tutor("Maria");
    let a1 = animal("Rex", Some(t.id));
    let a2 = animal("Mel", Some(t.id));
    let grouped = animals_by_tutor(&[t.clone()], &[a1.clone(), a2.clone()]);
    let names: Vec<_> =
      grouped[&t.id].iter().map(|a| a.fields.name.as_str()).collect();
    assert_eq!(names, ["Rex", "Mel"]);
  }

  // ── Service labels ────────────────────────────────────────────────────────

  #[test]
  fn known_service_ids_resolve_to_names() {
    let s = service("Bath");
    let names = service_name_index(&[s.clone()]);
    assert_eq!(service_labels(&[s.id], &names), vec!["Bath".to_string()]);
  }

  #[test]
  fn unknown_service_id_falls_back_to_raw_id() {
    let id = Uuid::new_v4();
    let labels = service_labels(&[id], &HashMap::new());
    assert_eq!(labels, vec![id.to_string()]);
  }

  #[test]
  fn legacy_visit_renders_through_canonical_list() {
    let s = service("Grooming");
    let names = service_name_index(&[s.clone()]);
    let v = Visit {
      animal_id:   Uuid::new_v4(),
      service_id:  Some(s.id),
      service_ids: None,
      date:        NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
      notes:       String::new(),
      created_at:  Utc::now(),
    };
    let labels = service_labels(&v.canonical_service_ids(), &names);
    assert_eq!(labels, vec!["Grooming".to_string()]);
  }
}
