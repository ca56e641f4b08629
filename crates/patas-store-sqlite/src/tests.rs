//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use patas_core::{
  entity::{Animal, Document, Sale, Tutor, Visit},
  patch::{AnimalPatch, VisitPatch},
  store::DocumentStore,
  view::{self, TUTOR_NOT_FOUND},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn animal(name: &str, tutor_id: Option<Uuid>) -> Animal {
  Animal {
    name: name.into(),
    species: Some("dog".into()),
    breed: None,
    tutor_id,
    created_at: Utc::now(),
  }
}

fn tutor(name: &str) -> Tutor {
  Tutor {
    name:        name.into(),
    phone:       Some("11 91234-5678".into()),
    email:       None,
    address:     None,
    postal_code: None,
    city:        Some("São Paulo".into()),
    created_at:  Utc::now(),
  }
}

fn visit(animal_id: Uuid, service_ids: Vec<Uuid>) -> Visit {
  Visit {
    animal_id,
    service_id: None,
    service_ids: Some(service_ids),
    date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    notes: "routine".into(),
    created_at: Utc::now(),
  }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_document() {
  let s = store().await;

  let id = s.create(animal("Rex", None)).await.unwrap();
  let fetched: Document<Animal> = s.get(id).await.unwrap().unwrap();

  assert_eq!(fetched.id, id);
  assert_eq!(fetched.fields.name, "Rex");
  assert_eq!(fetched.fields.species.as_deref(), Some("dog"));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result: Option<Document<Animal>> = s.get(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn get_is_scoped_to_the_collection() {
  let s = store().await;
  let id = s.create(tutor("Maria")).await.unwrap();

  // The same id looked up in another collection must not resolve.
  let as_animal: Option<Document<Animal>> = s.get(id).await.unwrap();
  assert!(as_animal.is_none());
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_insertion_order() {
  let s = store().await;
  s.create(animal("Rex", None)).await.unwrap();
  s.create(animal("Bidu", None)).await.unwrap();
  s.create(animal("Mel", None)).await.unwrap();

  let all: Vec<Document<Animal>> = s.list().await.unwrap();
  let names: Vec<_> = all.iter().map(|d| d.fields.name.as_str()).collect();
  assert_eq!(names, ["Rex", "Bidu", "Mel"]);
}

#[tokio::test]
async fn list_separates_collections() {
  let s = store().await;
  s.create(animal("Rex", None)).await.unwrap();
  s.create(tutor("Maria")).await.unwrap();
  s.create(tutor("João")).await.unwrap();

  let animals: Vec<Document<Animal>> = s.list().await.unwrap();
  let tutors: Vec<Document<Tutor>> = s.list().await.unwrap();
  assert_eq!(animals.len(), 1);
  assert_eq!(tutors.len(), 2);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_merges_only_named_fields() {
  let s = store().await;
  let id = s.create(animal("Rex", None)).await.unwrap();

  let found = s
    .update::<Animal>(
      id,
      AnimalPatch { name: Some("Max".into()), ..Default::default() },
    )
    .await
    .unwrap();
  assert!(found);

  let fetched: Document<Animal> = s.get(id).await.unwrap().unwrap();
  assert_eq!(fetched.fields.name, "Max");
  // Untouched by the patch.
  assert_eq!(fetched.fields.species.as_deref(), Some("dog"));
}

#[tokio::test]
async fn update_can_clear_an_optional_field() {
  let s = store().await;
  let tutor_id = s.create(tutor("Maria")).await.unwrap();
  let id = s.create(animal("Rex", Some(tutor_id))).await.unwrap();

  // Picking "(no tutor)" in the edit form sends an explicit null, which
  // must unset the stored reference rather than leave it in place.
  let found = s
    .update::<Animal>(
      id,
      AnimalPatch { tutor_id: Some(None), ..Default::default() },
    )
    .await
    .unwrap();
  assert!(found);

  let fetched: Document<Animal> = s.get(id).await.unwrap().unwrap();
  assert_eq!(fetched.fields.tutor_id, None);
  // Untouched by the patch.
  assert_eq!(fetched.fields.name, "Rex");
}

#[tokio::test]
async fn update_missing_returns_false() {
  let s = store().await;
  let found = s
    .update::<Animal>(Uuid::new_v4(), AnimalPatch::default())
    .await
    .unwrap();
  assert!(!found);
}

#[tokio::test]
async fn editing_a_legacy_visit_migrates_it_to_the_list_form() {
  let s = store().await;

  // A pre-migration record: single service_id, no list.
  let legacy_service = Uuid::new_v4();
  let mut legacy = visit(Uuid::new_v4(), vec![]);
  legacy.service_ids = None;
  legacy.service_id = Some(legacy_service);
  let id = s.create(legacy).await.unwrap();

  let stored: Document<Visit> = s.get(id).await.unwrap().unwrap();
  assert_eq!(stored.fields.canonical_service_ids(), vec![legacy_service]);

  // Saving an edit always writes the list form.
  let replacement = vec![legacy_service, Uuid::new_v4()];
  s.update::<Visit>(
    id,
    VisitPatch {
      service_ids: Some(replacement.clone()),
      ..Default::default()
    },
  )
  .await
  .unwrap();

  let stored: Document<Visit> = s.get(id).await.unwrap().unwrap();
  assert_eq!(stored.fields.canonical_service_ids(), replacement);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_the_document() {
  let s = store().await;
  let id = s.create(animal("Rex", None)).await.unwrap();

  assert!(s.delete::<Animal>(id).await.unwrap());
  let gone: Option<Document<Animal>> = s.get(id).await.unwrap();
  assert!(gone.is_none());
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete::<Animal>(Uuid::new_v4()).await.unwrap());
}

// ─── Round-trips ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn sale_fields_roundtrip() {
  let s = store().await;
  let id = s
    .create(Sale {
      product:    "flea shampoo".into(),
      quantity:   Some(2),
      total:      Some(59.8),
      date:       NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
      created_at: Utc::now(),
    })
    .await
    .unwrap();

  let fetched: Document<Sale> = s.get(id).await.unwrap().unwrap();
  assert_eq!(fetched.fields.product, "flea shampoo");
  assert_eq!(fetched.fields.quantity, Some(2));
  assert_eq!(fetched.fields.total, Some(59.8));
}

// ─── End to end: reference resolution over store snapshots ───────────────────

#[tokio::test]
async fn animal_lists_show_tutor_name_until_the_tutor_is_deleted() {
  let s = store().await;

  let tutor_id = s.create(tutor("Maria")).await.unwrap();
  s.create(animal("Rex", Some(tutor_id))).await.unwrap();

  // While the tutor exists, the animal resolves to her name.
  let animals: Vec<Document<Animal>> = s.list().await.unwrap();
  let tutors: Vec<Document<Tutor>> = s.list().await.unwrap();
  let rows = view::resolve_tutor_labels(&animals, &tutors);
  assert_eq!(rows[0].tutor_label, "Maria");

  // Deleting the tutor leaves a dangling reference; listing must still
  // succeed and substitute the sentinel, never fail.
  assert!(s.delete::<Tutor>(tutor_id).await.unwrap());

  let animals: Vec<Document<Animal>> = s.list().await.unwrap();
  let tutors: Vec<Document<Tutor>> = s.list().await.unwrap();
  let rows = view::resolve_tutor_labels(&animals, &tutors);
  assert_eq!(rows[0].tutor_label, TUTOR_NOT_FOUND);
  assert_eq!(rows[0].doc.fields.tutor_id, Some(tutor_id));
}
