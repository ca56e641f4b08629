//! Per-entity screen descriptors.
//!
//! [`ScreenEntity`] is the seam between the generic pane machinery in
//! `app.rs`/`ui` and the seven concrete entities: table columns, row
//! rendering, form construction and form extraction. Field indices used by
//! the extractors match the order the form constructors push fields in.

use std::collections::HashMap;

use chrono::Utc;
use patas_core::{
  Document, Entity,
  entity::{Animal, Product, Sale, Service, Staff, Tutor, Visit},
  patch::{
    AnimalPatch, ProductPatch, SalePatch, ServicePatch, StaffPatch, TutorPatch,
    VisitPatch,
  },
  view,
};
use uuid::Uuid;

use crate::form::{FormField, FormState, SelectOption};

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// Owned snapshots of the cross-entity name maps, rebuilt from the loaded
/// panes each time a frame is drawn or a form is opened. Owning (rather than
/// borrowing the panes) keeps the pane mutable while rows and forms read
/// reference labels.
#[derive(Default)]
pub struct Lookups {
  pub tutor_names:     HashMap<Uuid, String>,
  pub service_names:   HashMap<Uuid, String>,
  pub animal_names:    HashMap<Uuid, String>,
  /// Select options for an animal's tutor; first entry is "no tutor".
  pub tutor_options:   Vec<SelectOption>,
  /// Multi-select options for a visit's services.
  pub service_options: Vec<SelectOption>,
  /// Select options for a visit's animal.
  pub animal_options:  Vec<SelectOption>,
}

impl Lookups {
  pub fn build(
    tutors: &[Document<Tutor>],
    services: &[Document<Service>],
    animals: &[Document<Animal>],
  ) -> Self {
    let mut tutor_options = vec![SelectOption { id: None, label: "(no tutor)".into() }];
    tutor_options.extend(tutors.iter().map(|t| SelectOption {
      id:    Some(t.id),
      label: t.fields.name.clone(),
    }));

    let service_options = services
      .iter()
      .map(|s| SelectOption { id: Some(s.id), label: s.fields.name.clone() })
      .collect();

    let animal_options = animals
      .iter()
      .map(|a| SelectOption { id: Some(a.id), label: a.fields.name.clone() })
      .collect();

    Self {
      tutor_names: view::tutor_name_index(tutors),
      service_names: view::service_name_index(services),
      animal_names: animals
        .iter()
        .map(|a| (a.id, a.fields.name.clone()))
        .collect(),
      tutor_options,
      service_options,
      animal_options,
    }
  }
}

// ─── ScreenEntity ────────────────────────────────────────────────────────────

pub trait ScreenEntity: Entity + Clone {
  const TITLE: &'static str;
  const HEADERS: &'static [&'static str];

  fn row(doc: &Document<Self>, lookups: &Lookups) -> Vec<String>;

  /// Name shown in the delete confirmation and matched by the `/` filter.
  fn display_name(doc: &Document<Self>) -> String;

  fn blank_form(lookups: &Lookups) -> FormState;
  fn edit_form(doc: &Document<Self>, lookups: &Lookups) -> FormState;

  /// Build the create payload from a validated blank form.
  fn from_form(form: &FormState) -> Self;
  /// Build the update payload from a validated edit form.
  fn patch_from(form: &FormState) -> Self::Patch;
}

fn opt(value: &Option<String>) -> String {
  value.clone().unwrap_or_default()
}

fn price(value: Option<f64>) -> String {
  value.map(|p| format!("{p:.2}")).unwrap_or_default()
}

fn count(value: Option<u32>) -> String {
  value.map(|n| n.to_string()).unwrap_or_default()
}

/// Position the select cursor on `id`, defaulting to the first option.
fn select_cursor(options: &[SelectOption], id: Option<Uuid>) -> usize {
  options.iter().position(|opt| opt.id == id).unwrap_or(0)
}

// ─── Animal ──────────────────────────────────────────────────────────────────

impl ScreenEntity for Animal {
  const TITLE: &'static str = "Animals";
  const HEADERS: &'static [&'static str] = &["Name", "Species", "Breed", "Tutor"];

  fn row(doc: &Document<Self>, lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.name.clone(),
      opt(&doc.fields.species),
      opt(&doc.fields.breed),
      view::tutor_label(doc.fields.tutor_id, &lookups.tutor_names),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.name.clone()
  }

  fn blank_form(lookups: &Lookups) -> FormState {
    FormState::new(
      "New animal",
      vec![
        FormField::text("name", "", true),
        FormField::text("species", "", false),
        FormField::text("breed", "", false),
        FormField::select("tutor", lookups.tutor_options.clone(), 0, false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, lookups: &Lookups) -> FormState {
    let cursor = select_cursor(&lookups.tutor_options, doc.fields.tutor_id);
    FormState::new(
      format!("Edit {}", doc.fields.name),
      vec![
        FormField::text("name", doc.fields.name.clone(), true),
        FormField::text("species", opt(&doc.fields.species), false),
        FormField::text("breed", opt(&doc.fields.breed), false),
        FormField::select("tutor", lookups.tutor_options.clone(), cursor, false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Animal {
      name:       form.text_value(0),
      species:    form.opt_text_value(1),
      breed:      form.opt_text_value(2),
      tutor_id:   form.select_id(3),
      created_at: Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> AnimalPatch {
    AnimalPatch {
      name:     Some(form.text_value(0)),
      species:  Some(form.opt_text_value(1)),
      breed:    Some(form.opt_text_value(2)),
      tutor_id: Some(form.select_id(3)),
    }
  }
}

// ─── Tutor ───────────────────────────────────────────────────────────────────

impl ScreenEntity for Tutor {
  const TITLE: &'static str = "Tutors";
  const HEADERS: &'static [&'static str] = &["Name", "Phone", "Email", "City"];

  fn row(doc: &Document<Self>, _lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.name.clone(),
      opt(&doc.fields.phone),
      opt(&doc.fields.email),
      opt(&doc.fields.city),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.name.clone()
  }

  fn blank_form(_lookups: &Lookups) -> FormState {
    FormState::new(
      "New tutor",
      vec![
        FormField::text("name", "", true),
        FormField::text("phone", "", false),
        FormField::text("email", "", false),
        FormField::text("address", "", false),
        FormField::text("postal code", "", false),
        FormField::text("city", "", false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, _lookups: &Lookups) -> FormState {
    FormState::new(
      format!("Edit {}", doc.fields.name),
      vec![
        FormField::text("name", doc.fields.name.clone(), true),
        FormField::text("phone", opt(&doc.fields.phone), false),
        FormField::text("email", opt(&doc.fields.email), false),
        FormField::text("address", opt(&doc.fields.address), false),
        FormField::text("postal code", opt(&doc.fields.postal_code), false),
        FormField::text("city", opt(&doc.fields.city), false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Tutor {
      name:        form.text_value(0),
      phone:       form.opt_text_value(1),
      email:       form.opt_text_value(2),
      address:     form.opt_text_value(3),
      postal_code: form.opt_text_value(4),
      city:        form.opt_text_value(5),
      created_at:  Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> TutorPatch {
    TutorPatch {
      name:        Some(form.text_value(0)),
      phone:       Some(form.opt_text_value(1)),
      email:       Some(form.opt_text_value(2)),
      address:     Some(form.opt_text_value(3)),
      postal_code: Some(form.opt_text_value(4)),
      city:        Some(form.opt_text_value(5)),
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

impl ScreenEntity for Service {
  const TITLE: &'static str = "Services";
  const HEADERS: &'static [&'static str] = &["Name", "Category", "Price", "Description"];

  fn row(doc: &Document<Self>, _lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.name.clone(),
      opt(&doc.fields.category),
      price(doc.fields.price),
      opt(&doc.fields.description),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.name.clone()
  }

  fn blank_form(_lookups: &Lookups) -> FormState {
    FormState::new(
      "New service",
      vec![
        FormField::text("name", "", true),
        FormField::text("category", "", false),
        FormField::number("price", ""),
        FormField::text("description", "", false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, _lookups: &Lookups) -> FormState {
    FormState::new(
      format!("Edit {}", doc.fields.name),
      vec![
        FormField::text("name", doc.fields.name.clone(), true),
        FormField::text("category", opt(&doc.fields.category), false),
        FormField::number("price", price(doc.fields.price)),
        FormField::text("description", opt(&doc.fields.description), false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Service {
      name:        form.text_value(0),
      category:    form.opt_text_value(1),
      price:       form.number_value(2),
      description: form.opt_text_value(3),
      created_at:  Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> ServicePatch {
    ServicePatch {
      name:        Some(form.text_value(0)),
      category:    Some(form.opt_text_value(1)),
      price:       Some(form.number_value(2)),
      description: Some(form.opt_text_value(3)),
    }
  }
}

// ─── Product ─────────────────────────────────────────────────────────────────

impl ScreenEntity for Product {
  const TITLE: &'static str = "Products";
  const HEADERS: &'static [&'static str] = &["Name", "Price", "Stock", "Description"];

  fn row(doc: &Document<Self>, _lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.name.clone(),
      price(doc.fields.price),
      count(doc.fields.stock),
      opt(&doc.fields.description),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.name.clone()
  }

  fn blank_form(_lookups: &Lookups) -> FormState {
    FormState::new(
      "New product",
      vec![
        FormField::text("name", "", true),
        FormField::number("price", ""),
        FormField::integer("stock", ""),
        FormField::text("description", "", false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, _lookups: &Lookups) -> FormState {
    FormState::new(
      format!("Edit {}", doc.fields.name),
      vec![
        FormField::text("name", doc.fields.name.clone(), true),
        FormField::number("price", price(doc.fields.price)),
        FormField::integer("stock", count(doc.fields.stock)),
        FormField::text("description", opt(&doc.fields.description), false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Product {
      name:        form.text_value(0),
      price:       form.number_value(1),
      stock:       form.integer_value(2),
      description: form.opt_text_value(3),
      created_at:  Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> ProductPatch {
    ProductPatch {
      name:        Some(form.text_value(0)),
      price:       Some(form.number_value(1)),
      stock:       Some(form.integer_value(2)),
      description: Some(form.opt_text_value(3)),
    }
  }
}

// ─── Sale ────────────────────────────────────────────────────────────────────

impl ScreenEntity for Sale {
  const TITLE: &'static str = "Sales";
  const HEADERS: &'static [&'static str] = &["Product", "Qty", "Total", "Date"];

  fn row(doc: &Document<Self>, _lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.product.clone(),
      count(doc.fields.quantity),
      price(doc.fields.total),
      doc.fields.date.to_string(),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.product.clone()
  }

  fn blank_form(_lookups: &Lookups) -> FormState {
    FormState::new(
      "New sale",
      vec![
        FormField::text("product", "", true),
        FormField::integer("quantity", ""),
        FormField::number("total", ""),
        FormField::date("date", "", true),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, _lookups: &Lookups) -> FormState {
    FormState::new(
      format!("Edit sale of {}", doc.fields.product),
      vec![
        FormField::text("product", doc.fields.product.clone(), true),
        FormField::integer("quantity", count(doc.fields.quantity)),
        FormField::number("total", price(doc.fields.total)),
        FormField::date("date", doc.fields.date.to_string(), true),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Sale {
      product:    form.text_value(0),
      quantity:   form.integer_value(1),
      total:      form.number_value(2),
      // Validation guarantees a parseable date for required fields.
      date:       form.date_value(3).unwrap_or_default(),
      created_at: Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> SalePatch {
    SalePatch {
      product:  Some(form.text_value(0)),
      quantity: Some(form.integer_value(1)),
      total:    Some(form.number_value(2)),
      date:     form.date_value(3),
    }
  }
}

// ─── Staff ───────────────────────────────────────────────────────────────────

impl ScreenEntity for Staff {
  const TITLE: &'static str = "Staff";
  const HEADERS: &'static [&'static str] = &["Name", "Age", "Role"];

  fn row(doc: &Document<Self>, _lookups: &Lookups) -> Vec<String> {
    vec![
      doc.fields.name.clone(),
      count(doc.fields.age),
      opt(&doc.fields.role),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    doc.fields.name.clone()
  }

  fn blank_form(_lookups: &Lookups) -> FormState {
    FormState::new(
      "New staff member",
      vec![
        FormField::text("name", "", true),
        FormField::integer("age", ""),
        FormField::text("role", "", false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, _lookups: &Lookups) -> FormState {
    FormState::new(
      format!("Edit {}", doc.fields.name),
      vec![
        FormField::text("name", doc.fields.name.clone(), true),
        FormField::integer("age", count(doc.fields.age)),
        FormField::text("role", opt(&doc.fields.role), false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Staff {
      name:       form.text_value(0),
      age:        form.integer_value(1),
      role:       form.opt_text_value(2),
      created_at: Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> StaffPatch {
    StaffPatch {
      name: Some(form.text_value(0)),
      age:  Some(form.integer_value(1)),
      role: Some(form.opt_text_value(2)),
    }
  }
}

// ─── Visit ───────────────────────────────────────────────────────────────────

impl ScreenEntity for Visit {
  const TITLE: &'static str = "Visits";
  const HEADERS: &'static [&'static str] = &["Date", "Services", "Notes"];

  fn row(doc: &Document<Self>, lookups: &Lookups) -> Vec<String> {
    let labels = view::service_labels(
      &doc.fields.canonical_service_ids(),
      &lookups.service_names,
    );
    vec![
      doc.fields.date.to_string(),
      labels.join(", "),
      doc.fields.notes.clone(),
    ]
  }

  fn display_name(doc: &Document<Self>) -> String {
    format!("visit on {}", doc.fields.date)
  }

  /// The create form carries the animal select; the animal of an existing
  /// visit is fixed, so the edit form drops it and indices shift by one.
  fn blank_form(lookups: &Lookups) -> FormState {
    let n = lookups.service_options.len();
    FormState::new(
      "New visit",
      vec![
        FormField::select("animal", lookups.animal_options.clone(), 0, true),
        FormField::multi_select(
          "service",
          lookups.service_options.clone(),
          vec![false; n],
          true,
        ),
        FormField::date("date", "", true),
        FormField::text("notes", "", false),
      ],
      None,
    )
  }

  fn edit_form(doc: &Document<Self>, lookups: &Lookups) -> FormState {
    // Preselect the canonical service set, legacy records included.
    let canonical = doc.fields.canonical_service_ids();
    let picked = lookups
      .service_options
      .iter()
      .map(|opt| opt.id.is_some_and(|id| canonical.contains(&id)))
      .collect();
    FormState::new(
      format!("Edit visit on {}", doc.fields.date),
      vec![
        FormField::multi_select(
          "service",
          lookups.service_options.clone(),
          picked,
          true,
        ),
        FormField::date("date", doc.fields.date.to_string(), true),
        FormField::text("notes", doc.fields.notes.clone(), false),
      ],
      Some(doc.id),
    )
  }

  fn from_form(form: &FormState) -> Self {
    Visit {
      // Validation guarantees a selected animal.
      animal_id:   form.select_id(0).unwrap_or_default(),
      service_id:  None,
      service_ids: Some(form.multi_ids(1)),
      date:        form.date_value(2).unwrap_or_default(),
      notes:       form.text_value(3),
      created_at:  Utc::now(),
    }
  }

  fn patch_from(form: &FormState) -> VisitPatch {
    VisitPatch {
      service_ids: Some(form.multi_ids(0)),
      date:        form.date_value(1),
      notes:       Some(form.text_value(2)),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::form::FieldKind;

  fn tutor_doc(name: &str) -> Document<Tutor> {
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

  fn animal_doc(tutor_id: Option<Uuid>) -> Document<Animal> {
    Document {
      id:     Uuid::new_v4(),
      fields: Animal {
        name: "Rex".into(),
        species: Some("dog".into()),
        breed: Some("vira-lata".into()),
        tutor_id,
        created_at: Utc::now(),
      },
    }
  }

  #[test]
  fn emptied_edit_fields_become_explicit_clears() {
    let tutor = tutor_doc("Maria");
    let lookups = Lookups::build(&[tutor.clone()], &[], &[]);
    let doc = animal_doc(Some(tutor.id));

    let mut form = Animal::edit_form(&doc, &lookups);
    // Wipe the species text and move the tutor select back to "(no tutor)".
    form.fields[1].kind = FieldKind::Text(String::new());
    if let FieldKind::Select { cursor, .. } = &mut form.fields[3].kind {
      *cursor = 0;
    }

    let patch = Animal::patch_from(&form);
    assert_eq!(patch.species, Some(None));
    assert_eq!(patch.tutor_id, Some(None));
    // Untouched fields still carry their values.
    assert_eq!(patch.name.as_deref(), Some("Rex"));
    assert_eq!(patch.breed, Some(Some("vira-lata".into())));
  }

  #[test]
  fn animal_rows_use_the_shared_resolution_policy() {
    let tutor = tutor_doc("Maria");
    let lookups = Lookups::build(&[tutor.clone()], &[], &[]);

    let owned = Animal::row(&animal_doc(Some(tutor.id)), &lookups);
    assert_eq!(owned[3], "Maria");

    let unset = Animal::row(&animal_doc(None), &lookups);
    assert_eq!(unset[3], view::NO_TUTOR);

    let dangling = Animal::row(&animal_doc(Some(Uuid::new_v4())), &lookups);
    assert_eq!(dangling[3], view::TUTOR_NOT_FOUND);
  }
}
