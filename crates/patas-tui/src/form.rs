//! Form state as an explicit value object with reducer-style transitions.
//!
//! A [`FormState`] holds everything a modal form renders: labelled fields,
//! the focus index, the in-flight flag and the inline error. All mutation
//! goes through [`FormState::apply`], so the transition set is closed and
//! testable without a terminal.

use chrono::NaiveDate;
use uuid::Uuid;

// ─── Fields ──────────────────────────────────────────────────────────────────

/// One choice in a select or multi-select field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
  /// `None` stands for "no reference" (e.g. an animal without a tutor).
  pub id:    Option<Uuid>,
  pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
  /// Free text.
  Text(String),
  /// Text edited as `YYYY-MM-DD`, validated on submit.
  Date(String),
  /// Text validated on submit as a non-negative number.
  Number(String),
  /// Text validated on submit as a non-negative whole number. Counts like
  /// stock, quantity and age reject fractional input instead of rounding it.
  Integer(String),
  /// Exactly one option, cycled with left/right.
  Select { options: Vec<SelectOption>, cursor: usize },
  /// Zero or more options, toggled with space.
  MultiSelect {
    options: Vec<SelectOption>,
    picked:  Vec<bool>,
    cursor:  usize,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
  pub label:    &'static str,
  pub kind:     FieldKind,
  pub required: bool,
}

impl FormField {
  pub fn text(label: &'static str, value: impl Into<String>, required: bool) -> Self {
    Self { label, kind: FieldKind::Text(value.into()), required }
  }

  pub fn date(label: &'static str, value: impl Into<String>, required: bool) -> Self {
    Self { label, kind: FieldKind::Date(value.into()), required }
  }

  pub fn number(label: &'static str, value: impl Into<String>) -> Self {
    Self { label, kind: FieldKind::Number(value.into()), required: false }
  }

  pub fn integer(label: &'static str, value: impl Into<String>) -> Self {
    Self { label, kind: FieldKind::Integer(value.into()), required: false }
  }

  pub fn select(
    label: &'static str,
    options: Vec<SelectOption>,
    cursor: usize,
    required: bool,
  ) -> Self {
    Self { label, kind: FieldKind::Select { options, cursor }, required }
  }

  pub fn multi_select(
    label: &'static str,
    options: Vec<SelectOption>,
    picked: Vec<bool>,
    required: bool,
  ) -> Self {
    debug_assert_eq!(options.len(), picked.len());
    Self {
      label,
      kind: FieldKind::MultiSelect { options, picked, cursor: 0 },
      required,
    }
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

/// The closed set of form transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
  /// A printable character typed into the focused text-like field.
  Input(char),
  Backspace,
  FocusNext,
  FocusPrev,
  /// Move the focused select/multi-select cursor.
  OptionNext,
  OptionPrev,
  /// Toggle the cursor option of the focused multi-select.
  Toggle,
  SubmitStart,
  SubmitSuccess,
  SubmitFailure(String),
}

// ─── FormState ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
  pub title:      String,
  pub fields:     Vec<FormField>,
  pub focus:      usize,
  pub submitting: bool,
  pub error:      Option<String>,
  /// `Some(id)` when editing an existing document, `None` when creating.
  pub editing:    Option<Uuid>,
}

impl FormState {
  pub fn new(title: impl Into<String>, fields: Vec<FormField>, editing: Option<Uuid>) -> Self {
    Self {
      title: title.into(),
      fields,
      focus: 0,
      submitting: false,
      error: None,
      editing,
    }
  }

  /// Apply one transition. Every event clears the inline error except the
  /// ones that set it; a submitting form ignores edits until the submission
  /// resolves.
  pub fn apply(&mut self, event: FormEvent) {
    if self.submitting
      && !matches!(event, FormEvent::SubmitSuccess | FormEvent::SubmitFailure(_))
    {
      return;
    }

    match event {
      FormEvent::Input(c) => {
        self.error = None;
        if let Some(value) = self.focused_text_mut() {
          value.push(c);
        }
      }
      FormEvent::Backspace => {
        self.error = None;
        if let Some(value) = self.focused_text_mut() {
          value.pop();
        }
      }
      FormEvent::FocusNext => {
        self.error = None;
        if !self.fields.is_empty() {
          self.focus = (self.focus + 1) % self.fields.len();
        }
      }
      FormEvent::FocusPrev => {
        self.error = None;
        if !self.fields.is_empty() {
          self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
      }
      FormEvent::OptionNext => {
        self.error = None;
        match &mut self.fields[self.focus].kind {
          FieldKind::Select { options, cursor } if !options.is_empty() => {
            *cursor = (*cursor + 1) % options.len();
          }
          FieldKind::MultiSelect { options, cursor, .. } if !options.is_empty() => {
            *cursor = (*cursor + 1) % options.len();
          }
          _ => {}
        }
      }
      FormEvent::OptionPrev => {
        self.error = None;
        match &mut self.fields[self.focus].kind {
          FieldKind::Select { options, cursor } if !options.is_empty() => {
            *cursor = (*cursor + options.len() - 1) % options.len();
          }
          FieldKind::MultiSelect { options, cursor, .. } if !options.is_empty() => {
            *cursor = (*cursor + options.len() - 1) % options.len();
          }
          _ => {}
        }
      }
      FormEvent::Toggle => {
        self.error = None;
        if let FieldKind::MultiSelect { picked, cursor, .. } =
          &mut self.fields[self.focus].kind
          && let Some(slot) = picked.get_mut(*cursor)
        {
          *slot = !*slot;
        }
      }
      FormEvent::SubmitStart => {
        self.error = None;
        self.submitting = true;
      }
      FormEvent::SubmitSuccess => {
        self.submitting = false;
      }
      FormEvent::SubmitFailure(msg) => {
        self.submitting = false;
        self.error = Some(msg);
      }
    }
  }

  fn focused_text_mut(&mut self) -> Option<&mut String> {
    match &mut self.fields.get_mut(self.focus)?.kind {
      FieldKind::Text(v)
      | FieldKind::Date(v)
      | FieldKind::Number(v)
      | FieldKind::Integer(v) => Some(v),
      _ => None,
    }
  }

  // ── Validation ────────────────────────────────────────────────────────────

  /// Check every field; run before any network call. The first violation
  /// wins, reading top to bottom.
  pub fn validate(&self) -> Result<(), String> {
    for field in &self.fields {
      match &field.kind {
        FieldKind::Text(v) => {
          if field.required && v.trim().is_empty() {
            return Err(format!("{} is required", field.label));
          }
        }
        FieldKind::Date(v) => {
          let v = v.trim();
          if v.is_empty() {
            if field.required {
              return Err(format!("{} is required", field.label));
            }
          } else if NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() {
            return Err(format!("{} must be YYYY-MM-DD", field.label));
          }
        }
        FieldKind::Number(v) => {
          let v = v.trim();
          if !v.is_empty() {
            match v.parse::<f64>() {
              Ok(n) if n >= 0.0 => {}
              _ => return Err(format!("{} must be a non-negative number", field.label)),
            }
          }
        }
        FieldKind::Integer(v) => {
          let v = v.trim();
          // `u32` parsing also bounds the value, so out-of-range input is an
          // inline error rather than a saturated store write.
          if !v.is_empty() && v.parse::<u32>().is_err() {
            return Err(format!(
              "{} must be a non-negative whole number",
              field.label
            ));
          }
        }
        FieldKind::Select { options, cursor } => {
          if field.required
            && options.get(*cursor).is_none_or(|opt| opt.id.is_none())
          {
            return Err(format!("{} is required", field.label));
          }
        }
        FieldKind::MultiSelect { picked, .. } => {
          if field.required && !picked.iter().any(|p| *p) {
            return Err(format!("select at least one {}", field.label));
          }
        }
      }
    }
    Ok(())
  }

  // ── Typed accessors (used after a successful validate) ────────────────────

  pub fn text_value(&self, idx: usize) -> String {
    match &self.fields[idx].kind {
      FieldKind::Text(v)
      | FieldKind::Date(v)
      | FieldKind::Number(v)
      | FieldKind::Integer(v) => v.trim().to_string(),
      _ => String::new(),
    }
  }

  /// Trimmed text, `None` when empty. For optional string fields.
  pub fn opt_text_value(&self, idx: usize) -> Option<String> {
    let v = self.text_value(idx);
    (!v.is_empty()).then_some(v)
  }

  pub fn date_value(&self, idx: usize) -> Option<NaiveDate> {
    match &self.fields[idx].kind {
      FieldKind::Date(v) => NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok(),
      _ => None,
    }
  }

  pub fn number_value(&self, idx: usize) -> Option<f64> {
    match &self.fields[idx].kind {
      FieldKind::Number(v) => v.trim().parse().ok(),
      _ => None,
    }
  }

  pub fn integer_value(&self, idx: usize) -> Option<u32> {
    match &self.fields[idx].kind {
      FieldKind::Integer(v) => v.trim().parse().ok(),
      _ => None,
    }
  }

  pub fn select_id(&self, idx: usize) -> Option<Uuid> {
    match &self.fields[idx].kind {
      FieldKind::Select { options, cursor } => options.get(*cursor)?.id,
      _ => None,
    }
  }

  /// Picked ids of a multi-select, in option order.
  pub fn multi_ids(&self, idx: usize) -> Vec<Uuid> {
    match &self.fields[idx].kind {
      FieldKind::MultiSelect { options, picked, .. } => options
        .iter()
        .zip(picked)
        .filter(|(_, p)| **p)
        .filter_map(|(opt, _)| opt.id)
        .collect(),
      _ => Vec::new(),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn service_options(n: usize) -> Vec<SelectOption> {
    (0..n)
      .map(|i| SelectOption { id: Some(Uuid::new_v4()), label: format!("svc {i}") })
      .collect()
  }

  fn visit_like_form() -> FormState {
    FormState::new(
      "New visit",
      vec![
        FormField::multi_select("service", service_options(3), vec![false; 3], true),
        FormField::date("date", "2024-05-01", true),
        FormField::text("notes", "", false),
      ],
      None,
    )
  }

  #[test]
  fn empty_required_text_blocks_submission() {
    let form = FormState::new(
      "New animal",
      vec![FormField::text("name", "", true)],
      None,
    );
    assert_eq!(form.validate(), Err("name is required".into()));
  }

  #[test]
  fn empty_service_set_reports_select_at_least_one() {
    let form = visit_like_form();
    assert_eq!(form.validate(), Err("select at least one service".into()));
  }

  #[test]
  fn toggled_service_passes_validation_and_is_collected() {
    let mut form = visit_like_form();
    form.apply(FormEvent::OptionNext);
    form.apply(FormEvent::Toggle);
    assert!(form.validate().is_ok());
    assert_eq!(form.multi_ids(0).len(), 1);
  }

  #[test]
  fn negative_number_is_rejected() {
    let mut form = FormState::new(
      "New service",
      vec![FormField::number("price", "")],
      None,
    );
    for c in "-5".chars() {
      form.apply(FormEvent::Input(c));
    }
    assert_eq!(
      form.validate(),
      Err("price must be a non-negative number".into())
    );
  }

  #[test]
  fn fractional_count_is_rejected_not_rounded() {
    let form = FormState::new(
      "New sale",
      vec![FormField::integer("quantity", "2.7")],
      None,
    );
    assert_eq!(
      form.validate(),
      Err("quantity must be a non-negative whole number".into())
    );
    assert_eq!(form.integer_value(0), None);
  }

  #[test]
  fn whole_count_passes_and_parses() {
    let form = FormState::new(
      "New product",
      vec![FormField::integer("stock", "12")],
      None,
    );
    assert!(form.validate().is_ok());
    assert_eq!(form.integer_value(0), Some(12));
  }

  #[test]
  fn out_of_range_count_is_rejected() {
    for value in ["-3", "4294967296"] {
      let form = FormState::new(
        "New product",
        vec![FormField::integer("stock", value)],
        None,
      );
      assert_eq!(
        form.validate(),
        Err("stock must be a non-negative whole number".into())
      );
    }
  }

  #[test]
  fn malformed_date_is_rejected() {
    let form = FormState::new(
      "New sale",
      vec![FormField::date("date", "01/05/2024", true)],
      None,
    );
    assert_eq!(form.validate(), Err("date must be YYYY-MM-DD".into()));
  }

  #[test]
  fn input_goes_to_the_focused_field_only() {
    let mut form = FormState::new(
      "New tutor",
      vec![
        FormField::text("name", "", true),
        FormField::text("phone", "", false),
      ],
      None,
    );
    form.apply(FormEvent::Input('a'));
    form.apply(FormEvent::FocusNext);
    form.apply(FormEvent::Input('9'));
    assert_eq!(form.text_value(0), "a");
    assert_eq!(form.text_value(1), "9");
  }

  #[test]
  fn focus_wraps_in_both_directions() {
    let mut form = visit_like_form();
    form.apply(FormEvent::FocusPrev);
    assert_eq!(form.focus, 2);
    form.apply(FormEvent::FocusNext);
    assert_eq!(form.focus, 0);
  }

  #[test]
  fn submitting_form_ignores_edits_until_resolution() {
    let mut form = visit_like_form();
    form.apply(FormEvent::SubmitStart);
    form.apply(FormEvent::FocusNext);
    assert_eq!(form.focus, 0);

    form.apply(FormEvent::SubmitFailure("boom".into()));
    assert!(!form.submitting);
    assert_eq!(form.error.as_deref(), Some("boom"));

    // Interactive again, and the next edit clears the error.
    form.apply(FormEvent::FocusNext);
    assert_eq!(form.focus, 1);
    assert!(form.error.is_none());
  }

  #[test]
  fn failure_preserves_typed_values() {
    let mut form = FormState::new(
      "New staff",
      vec![FormField::text("name", "", true)],
      None,
    );
    for c in "jo".chars() {
      form.apply(FormEvent::Input(c));
    }
    form.apply(FormEvent::SubmitStart);
    form.apply(FormEvent::SubmitFailure("offline".into()));
    assert_eq!(form.text_value(0), "jo");
  }

  #[test]
  fn select_cursor_cycles_through_options() {
    let mut form = FormState::new(
      "New animal",
      vec![FormField::select(
        "tutor",
        vec![
          SelectOption { id: None, label: "(no tutor)".into() },
          SelectOption { id: Some(Uuid::new_v4()), label: "ana".into() },
        ],
        0,
        false,
      )],
      None,
    );
    assert_eq!(form.select_id(0), None);
    form.apply(FormEvent::OptionNext);
    assert!(form.select_id(0).is_some());
    form.apply(FormEvent::OptionNext);
    assert_eq!(form.select_id(0), None);
  }
}
