//! Application state machine and event dispatcher.
//!
//! One [`Pane`] per entity tab, all sharing the generic machinery below. A
//! pane is Idle until its tab first becomes visible, then Loading → Loaded
//! (or back to Idle with an error toast). Writes always go through a form or
//! a delete confirmation and re-fetch on success.

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use patas_core::entity::{Animal, Product, Sale, Service, Staff, Tutor, Visit};
use uuid::Uuid;

use crate::{
  client::ApiClient,
  form::{FieldKind, FormEvent, FormState},
  screen::{Lookups, ScreenEntity},
};

// ─── Tabs ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Animals,
  Tutors,
  Services,
  Products,
  Sales,
  Staff,
  Visits,
}

impl Tab {
  pub const ALL: [Tab; 7] = [
    Tab::Animals,
    Tab::Tutors,
    Tab::Services,
    Tab::Products,
    Tab::Sales,
    Tab::Staff,
    Tab::Visits,
  ];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Animals => Animal::TITLE,
      Tab::Tutors => Tutor::TITLE,
      Tab::Services => Service::TITLE,
      Tab::Products => Product::TITLE,
      Tab::Sales => Sale::TITLE,
      Tab::Staff => Staff::TITLE,
      Tab::Visits => Visit::TITLE,
    }
  }

  pub fn next(self) -> Tab {
    let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  /// Number-key navigation: `1` through `7`.
  pub fn from_digit(c: char) -> Option<Tab> {
    let idx = c.to_digit(10)? as usize;
    (1..=Self::ALL.len()).contains(&idx).then(|| Self::ALL[idx - 1])
  }
}

// ─── Toasts ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
  Success,
  Error,
}

/// A transient status-bar notification.
#[derive(Debug, Clone)]
pub struct Toast {
  pub message: String,
  pub kind:    ToastKind,
  expires:     Instant,
}

const TOAST_TTL: Duration = Duration::from_secs(3);

impl Toast {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      kind:    ToastKind::Success,
      expires: Instant::now() + TOAST_TTL,
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      kind:    ToastKind::Error,
      expires: Instant::now() + TOAST_TTL,
    }
  }

  pub fn expired(&self) -> bool {
    Instant::now() >= self.expires
  }
}

// ─── Pane ────────────────────────────────────────────────────────────────────

/// Per-screen state for one entity collection.
pub struct Pane<E: ScreenEntity> {
  pub items:          Vec<patas_core::Document<E>>,
  pub loading:        bool,
  pub loaded:         bool,
  pub cursor:         usize,
  pub filter:         String,
  pub filter_active:  bool,
  pub form:           Option<FormState>,
  pub confirm_delete: Option<Uuid>,
  generation:         u64,
}

impl<E: ScreenEntity> Pane<E> {
  pub fn new() -> Self {
    Self {
      items:          Vec::new(),
      loading:        false,
      loaded:         false,
      cursor:         0,
      filter:         String::new(),
      filter_active:  false,
      form:           None,
      confirm_delete: None,
      generation:     0,
    }
  }

  // ── Fetch generation counter ──────────────────────────────────────────────
  //
  // Each issued fetch captures the incremented generation; a completed fetch
  // is applied only while its generation is still current, so a superseded
  // response can never overwrite fresher state.

  pub fn begin_fetch(&mut self) -> u64 {
    self.generation += 1;
    self.loading = true;
    self.generation
  }

  /// Apply a completed fetch. Returns `false` (and changes nothing) when a
  /// newer fetch has been issued since `generation` was captured.
  pub fn apply_fetch(
    &mut self,
    generation: u64,
    items: Vec<patas_core::Document<E>>,
  ) -> bool {
    if generation != self.generation {
      return false;
    }
    self.items = items;
    self.loading = false;
    self.loaded = true;
    self.clamp_cursor();
    true
  }

  /// Record a failed fetch. Returns `false` when the failure is stale.
  pub fn fail_fetch(&mut self, generation: u64) -> bool {
    if generation != self.generation {
      return false;
    }
    self.loading = false;
    true
  }

  // ── Filtered view ─────────────────────────────────────────────────────────

  /// Items matching the current fuzzy filter, in fetch order.
  pub fn filtered(&self) -> Vec<&patas_core::Document<E>> {
    if self.filter.is_empty() {
      return self.items.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .items
      .iter()
      .filter(|doc| {
        matcher
          .fuzzy_match(&E::display_name(doc), &self.filter)
          .is_some()
      })
      .collect()
  }

  pub fn cursor_doc(&self) -> Option<&patas_core::Document<E>> {
    let list = self.filtered();
    list.get(self.cursor).copied()
  }

  pub fn clamp_cursor(&mut self) {
    let len = self.filtered().len();
    if len == 0 {
      self.cursor = 0;
    } else if self.cursor >= len {
      self.cursor = len - 1;
    }
  }
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab: Tab,

  pub animals:  Pane<Animal>,
  pub tutors:   Pane<Tutor>,
  pub services: Pane<Service>,
  pub products: Pane<Product>,
  pub sales:    Pane<Sale>,
  pub staff:    Pane<Staff>,
  pub visits:   Pane<Visit>,

  /// Tutor whose animal list is expanded on the tutors screen.
  pub expanded_tutor: Option<Uuid>,

  /// Animal gating the visits history table; `None` shows the selector.
  pub visit_animal: Option<Uuid>,
  /// Cursor within the visits screen's animal selector.
  pub selector_cursor: usize,

  pub toast: Option<Toast>,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      tab: Tab::Animals,
      animals: Pane::new(),
      tutors: Pane::new(),
      services: Pane::new(),
      products: Pane::new(),
      sales: Pane::new(),
      staff: Pane::new(),
      visits: Pane::new(),
      expanded_tutor: None,
      visit_animal: None,
      selector_cursor: 0,
      toast: None,
      client: Arc::new(client),
    }
  }

  /// Drop the toast once its TTL elapses. Called every event-loop tick.
  pub fn tick(&mut self) {
    if self.toast.as_ref().is_some_and(Toast::expired) {
      self.toast = None;
    }
  }

  /// Owned name maps and option lists for the current snapshots.
  pub fn lookups(&self) -> Lookups {
    Lookups::build(&self.tutors.items, &self.services.items, &self.animals.items)
  }

  /// Visits of the selected animal, filter applied, in fetch order.
  pub fn visible_visits(&self) -> Vec<&patas_core::Document<Visit>> {
    let Some(animal) = self.visit_animal else {
      return Vec::new();
    };
    let matcher = SkimMatcherV2::default();
    self
      .visits
      .items
      .iter()
      .filter(|v| v.fields.animal_id == animal)
      .filter(|v| {
        self.visits.filter.is_empty()
          || matcher
            .fuzzy_match(&Visit::display_name(v), &self.visits.filter)
            .is_some()
      })
      .collect()
  }

  fn form_open(&self) -> bool {
    match self.tab {
      Tab::Animals => self.animals.form.is_some(),
      Tab::Tutors => self.tutors.form.is_some(),
      Tab::Services => self.services.form.is_some(),
      Tab::Products => self.products.form.is_some(),
      Tab::Sales => self.sales.form.is_some(),
      Tab::Staff => self.staff.form.is_some(),
      Tab::Visits => self.visits.form.is_some(),
    }
  }

  fn confirm_open(&self) -> bool {
    match self.tab {
      Tab::Animals => self.animals.confirm_delete.is_some(),
      Tab::Tutors => self.tutors.confirm_delete.is_some(),
      Tab::Services => self.services.confirm_delete.is_some(),
      Tab::Products => self.products.confirm_delete.is_some(),
      Tab::Sales => self.sales.confirm_delete.is_some(),
      Tab::Staff => self.staff.confirm_delete.is_some(),
      Tab::Visits => self.visits.confirm_delete.is_some(),
    }
  }

  fn filter_open(&self) -> bool {
    match self.tab {
      Tab::Animals => self.animals.filter_active,
      Tab::Tutors => self.tutors.filter_active,
      Tab::Services => self.services.filter_active,
      Tab::Products => self.products.filter_active,
      Tab::Sales => self.sales.filter_active,
      Tab::Staff => self.staff.filter_active,
      Tab::Visits => self.visits.filter_active,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch whatever the current tab needs and has not loaded yet. Screens
  /// that resolve references also need the referenced collections.
  pub async fn ensure_tab_loaded(&mut self) {
    let client = Arc::clone(&self.client);
    match self.tab {
      Tab::Animals => {
        ensure_loaded(&client, &mut self.animals, &mut self.toast).await;
        ensure_loaded(&client, &mut self.tutors, &mut self.toast).await;
      }
      Tab::Tutors => {
        ensure_loaded(&client, &mut self.tutors, &mut self.toast).await;
        ensure_loaded(&client, &mut self.animals, &mut self.toast).await;
      }
      Tab::Services => {
        ensure_loaded(&client, &mut self.services, &mut self.toast).await;
      }
      Tab::Products => {
        ensure_loaded(&client, &mut self.products, &mut self.toast).await;
      }
      Tab::Sales => {
        ensure_loaded(&client, &mut self.sales, &mut self.toast).await;
      }
      Tab::Staff => {
        ensure_loaded(&client, &mut self.staff, &mut self.toast).await;
      }
      Tab::Visits => {
        ensure_loaded(&client, &mut self.visits, &mut self.toast).await;
        ensure_loaded(&client, &mut self.animals, &mut self.toast).await;
        ensure_loaded(&client, &mut self.services, &mut self.toast).await;
      }
    }
  }

  async fn switch_tab(&mut self, tab: Tab) {
    self.tab = tab;
    self.ensure_tab_loaded().await;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    let client = Arc::clone(&self.client);
    let lookups = self.lookups();

    // Modal layers first: form, delete confirmation, filter input.
    if self.form_open() {
      match self.tab {
        Tab::Animals => {
          handle_form_key(&client, &mut self.animals, &mut self.toast, key).await
        }
        Tab::Tutors => {
          handle_form_key(&client, &mut self.tutors, &mut self.toast, key).await
        }
        Tab::Services => {
          handle_form_key(&client, &mut self.services, &mut self.toast, key).await
        }
        Tab::Products => {
          handle_form_key(&client, &mut self.products, &mut self.toast, key).await
        }
        Tab::Sales => {
          handle_form_key(&client, &mut self.sales, &mut self.toast, key).await
        }
        Tab::Staff => {
          handle_form_key(&client, &mut self.staff, &mut self.toast, key).await
        }
        Tab::Visits => {
          handle_form_key(&client, &mut self.visits, &mut self.toast, key).await
        }
      }
      return Ok(true);
    }

    if self.confirm_open() {
      match self.tab {
        Tab::Animals => {
          handle_confirm_key(&client, &mut self.animals, &mut self.toast, key).await
        }
        Tab::Tutors => {
          handle_confirm_key(&client, &mut self.tutors, &mut self.toast, key).await
        }
        Tab::Services => {
          handle_confirm_key(&client, &mut self.services, &mut self.toast, key).await
        }
        Tab::Products => {
          handle_confirm_key(&client, &mut self.products, &mut self.toast, key).await
        }
        Tab::Sales => {
          handle_confirm_key(&client, &mut self.sales, &mut self.toast, key).await
        }
        Tab::Staff => {
          handle_confirm_key(&client, &mut self.staff, &mut self.toast, key).await
        }
        Tab::Visits => {
          handle_confirm_key(&client, &mut self.visits, &mut self.toast, key).await
        }
      }
      return Ok(true);
    }

    if self.filter_open() {
      match self.tab {
        Tab::Animals => handle_filter_key(&mut self.animals, key),
        Tab::Tutors => handle_filter_key(&mut self.tutors, key),
        Tab::Services => handle_filter_key(&mut self.services, key),
        Tab::Products => handle_filter_key(&mut self.products, key),
        Tab::Sales => handle_filter_key(&mut self.sales, key),
        Tab::Staff => handle_filter_key(&mut self.staff, key),
        Tab::Visits => handle_filter_key(&mut self.visits, key),
      }
      return Ok(true);
    }

    // Global navigation.
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => {
        let next = self.tab.next();
        self.switch_tab(next).await;
        return Ok(true);
      }
      KeyCode::Char(c) if Tab::from_digit(c).is_some() => {
        // from_digit checked above; safe to re-resolve.
        if let Some(tab) = Tab::from_digit(c) {
          self.switch_tab(tab).await;
        }
        return Ok(true);
      }
      _ => {}
    }

    // Per-screen keys.
    match self.tab {
      Tab::Tutors => self.handle_tutors_key(&client, &lookups, key).await,
      Tab::Visits => self.handle_visits_key(&client, &lookups, key).await,
      Tab::Animals => {
        handle_list_key(&client, &mut self.animals, &lookups, &mut self.toast, key)
          .await
      }
      Tab::Services => {
        handle_list_key(&client, &mut self.services, &lookups, &mut self.toast, key)
          .await
      }
      Tab::Products => {
        handle_list_key(&client, &mut self.products, &lookups, &mut self.toast, key)
          .await
      }
      Tab::Sales => {
        handle_list_key(&client, &mut self.sales, &lookups, &mut self.toast, key).await
      }
      Tab::Staff => {
        handle_list_key(&client, &mut self.staff, &lookups, &mut self.toast, key).await
      }
    }

    Ok(true)
  }

  /// Tutors screen: the generic list keys plus expand/collapse.
  async fn handle_tutors_key(
    &mut self,
    client: &ApiClient,
    lookups: &Lookups,
    key: KeyEvent,
  ) {
    match key.code {
      KeyCode::Enter | KeyCode::Char(' ') => {
        let under_cursor = self.tutors.cursor_doc().map(|t| t.id);
        self.expanded_tutor = match (self.expanded_tutor, under_cursor) {
          (Some(open), Some(id)) if open == id => None,
          (_, id) => id,
        };
      }
      _ => {
        handle_list_key(client, &mut self.tutors, lookups, &mut self.toast, key).await;
      }
    }
  }

  /// Visits screen: an animal selector gates the history table.
  async fn handle_visits_key(
    &mut self,
    client: &ApiClient,
    lookups: &Lookups,
    key: KeyEvent,
  ) {
    // Selector mode: pick the animal whose history to show.
    let Some(animal) = self.visit_animal else {
      match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
          let len = self.animals.items.len();
          if len > 0 && self.selector_cursor + 1 < len {
            self.selector_cursor += 1;
          }
        }
        KeyCode::Up | KeyCode::Char('k') => {
          self.selector_cursor = self.selector_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
          if let Some(doc) = self.animals.items.get(self.selector_cursor) {
            self.visit_animal = Some(doc.id);
            self.visits.cursor = 0;
          }
        }
        KeyCode::Char('r') => {
          refresh_pane(client, &mut self.animals, &mut self.toast).await;
        }
        _ => {}
      }
      return;
    };

    match key.code {
      KeyCode::Esc => {
        self.visit_animal = None;
        self.visits.filter.clear();
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.visible_visits().len();
        if len > 0 && self.visits.cursor + 1 < len {
          self.visits.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.visits.cursor = self.visits.cursor.saturating_sub(1);
      }
      KeyCode::Char('n') => {
        let mut form = Visit::blank_form(lookups);
        // Preset the animal select to the gating animal.
        if let Some(FieldKind::Select { options, cursor }) =
          form.fields.first_mut().map(|f| &mut f.kind)
          && let Some(idx) = options.iter().position(|opt| opt.id == Some(animal))
        {
          *cursor = idx;
        }
        self.visits.form = Some(form);
      }
      KeyCode::Char('e') => {
        let doc = self
          .visible_visits()
          .get(self.visits.cursor)
          .map(|d| (*d).clone());
        if let Some(doc) = doc {
          self.visits.form = Some(Visit::edit_form(&doc, lookups));
        }
      }
      KeyCode::Char('d') => {
        let id = self.visible_visits().get(self.visits.cursor).map(|d| d.id);
        if let Some(id) = id {
          self.visits.confirm_delete = Some(id);
        }
      }
      KeyCode::Char('r') => {
        refresh_pane(client, &mut self.visits, &mut self.toast).await;
      }
      KeyCode::Char('/') => {
        self.visits.filter_active = true;
        self.visits.filter.clear();
        self.visits.cursor = 0;
      }
      _ => {}
    }
  }
}

// ─── Generic pane handlers ───────────────────────────────────────────────────
//
// Free functions over `Pane<E>` so each call borrows only the fields it
// touches; `App::handle_key` dispatches per tab.

/// Fetch the pane's collection if it has never loaded.
async fn ensure_loaded<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  toast: &mut Option<Toast>,
) {
  if !pane.loaded && !pane.loading {
    refresh_pane(client, pane, toast).await;
  }
}

/// Issue a fetch and apply the result under the generation counter.
async fn refresh_pane<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  toast: &mut Option<Toast>,
) {
  let generation = pane.begin_fetch();
  match client.list::<E>().await {
    Ok(items) => {
      pane.apply_fetch(generation, items);
    }
    Err(e) => {
      if pane.fail_fetch(generation) {
        *toast = Some(Toast::error(format!("{e:#}")));
      }
    }
  }
}

async fn handle_list_key<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  lookups: &Lookups,
  toast: &mut Option<Toast>,
  key: KeyEvent,
) {
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      let len = pane.filtered().len();
      if len > 0 && pane.cursor + 1 < len {
        pane.cursor += 1;
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      pane.cursor = pane.cursor.saturating_sub(1);
    }
    KeyCode::Char('n') => {
      pane.form = Some(E::blank_form(lookups));
    }
    KeyCode::Char('e') => {
      let doc = pane.cursor_doc().cloned();
      if let Some(doc) = doc {
        pane.form = Some(E::edit_form(&doc, lookups));
      }
    }
    KeyCode::Char('d') => {
      let id = pane.cursor_doc().map(|d| d.id);
      if let Some(id) = id {
        pane.confirm_delete = Some(id);
      }
    }
    KeyCode::Char('r') => {
      refresh_pane(client, pane, toast).await;
    }
    KeyCode::Char('/') => {
      pane.filter_active = true;
      pane.filter.clear();
      pane.cursor = 0;
    }
    KeyCode::Esc => {
      pane.filter.clear();
      pane.clamp_cursor();
    }
    _ => {}
  }
}

async fn handle_form_key<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  toast: &mut Option<Toast>,
  key: KeyEvent,
) {
  let Some(form) = pane.form.as_mut() else {
    return;
  };

  match key.code {
    KeyCode::Esc => {
      pane.form = None;
    }
    KeyCode::Tab | KeyCode::Down => form.apply(FormEvent::FocusNext),
    KeyCode::BackTab | KeyCode::Up => form.apply(FormEvent::FocusPrev),
    KeyCode::Left => form.apply(FormEvent::OptionPrev),
    KeyCode::Right => form.apply(FormEvent::OptionNext),
    KeyCode::Backspace => form.apply(FormEvent::Backspace),
    KeyCode::Enter => {
      submit_form(client, pane, toast).await;
    }
    KeyCode::Char(' ') => {
      // Space toggles in a multi-select, types in a text field.
      match form.fields.get(form.focus).map(|f| &f.kind) {
        Some(FieldKind::MultiSelect { .. }) => form.apply(FormEvent::Toggle),
        Some(FieldKind::Select { .. }) => {}
        _ => form.apply(FormEvent::Input(' ')),
      }
    }
    KeyCode::Char(c) => form.apply(FormEvent::Input(c)),
    _ => {}
  }
}

/// Validate, then create or update. Success closes the form and re-fetches;
/// failure keeps the form intact with an inline error.
async fn submit_form<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  toast: &mut Option<Toast>,
) {
  let Some(form) = pane.form.as_mut() else {
    return;
  };

  if let Err(msg) = form.validate() {
    form.error = Some(msg);
    return;
  }
  form.apply(FormEvent::SubmitStart);

  let snapshot = form.clone();
  let result = match snapshot.editing {
    Some(id) => client.update::<E>(id, &E::patch_from(&snapshot)).await,
    None => client.create(&E::from_form(&snapshot)).await.map(|_| ()),
  };

  match result {
    Ok(()) => {
      pane.form = None;
      *toast = Some(Toast::success(if snapshot.editing.is_some() {
        "saved"
      } else {
        "created"
      }));
      refresh_pane(client, pane, toast).await;
    }
    Err(e) => {
      if let Some(form) = pane.form.as_mut() {
        form.apply(FormEvent::SubmitFailure(format!("{e:#}")));
      }
    }
  }
}

async fn handle_confirm_key<E: ScreenEntity>(
  client: &ApiClient,
  pane: &mut Pane<E>,
  toast: &mut Option<Toast>,
  key: KeyEvent,
) {
  match key.code {
    KeyCode::Char('y') | KeyCode::Char('Y') => {
      let Some(id) = pane.confirm_delete.take() else {
        return;
      };
      match client.delete::<E>(id).await {
        Ok(()) => {
          *toast = Some(Toast::success("deleted"));
          refresh_pane(client, pane, toast).await;
        }
        Err(e) => {
          *toast = Some(Toast::error(format!("{e:#}")));
        }
      }
    }
    KeyCode::Char('n') | KeyCode::Esc => {
      pane.confirm_delete = None;
    }
    _ => {}
  }
}

fn handle_filter_key<E: ScreenEntity>(pane: &mut Pane<E>, key: KeyEvent) {
  match key.code {
    KeyCode::Esc => {
      pane.filter_active = false;
      pane.filter.clear();
      pane.cursor = 0;
    }
    KeyCode::Enter => {
      pane.filter_active = false;
      pane.cursor = 0;
    }
    KeyCode::Backspace => {
      pane.filter.pop();
      pane.cursor = 0;
    }
    KeyCode::Char(c) => {
      pane.filter.push(c);
      pane.cursor = 0;
    }
    _ => {}
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use patas_core::Document;

  use super::*;

  fn staff_doc(name: &str) -> Document<Staff> {
    Document {
      id:     Uuid::new_v4(),
      fields: Staff {
        name:       name.into(),
        age:        None,
        role:       None,
        created_at: Utc::now(),
      },
    }
  }

  #[test]
  fn stale_fetch_result_is_discarded() {
    let mut pane: Pane<Staff> = Pane::new();
    let first = pane.begin_fetch();
    let second = pane.begin_fetch();

    // The older fetch resolves after the newer one was issued.
    assert!(!pane.apply_fetch(first, vec![staff_doc("old")]));
    assert!(pane.items.is_empty());

    assert!(pane.apply_fetch(second, vec![staff_doc("new")]));
    assert_eq!(pane.items[0].fields.name, "new");
    assert!(pane.loaded);
  }

  #[test]
  fn stale_fetch_failure_does_not_clear_loading() {
    let mut pane: Pane<Staff> = Pane::new();
    let first = pane.begin_fetch();
    let second = pane.begin_fetch();

    assert!(!pane.fail_fetch(first));
    assert!(pane.loading);

    assert!(pane.fail_fetch(second));
    assert!(!pane.loading);
    assert!(!pane.loaded);
  }

  #[test]
  fn refetch_clamps_the_cursor_to_the_shorter_list() {
    let mut pane: Pane<Staff> = Pane::new();
    let generation = pane.begin_fetch();
    pane.apply_fetch(
      generation,
      vec![staff_doc("a"), staff_doc("b"), staff_doc("c")],
    );
    pane.cursor = 2;

    let generation = pane.begin_fetch();
    pane.apply_fetch(generation, vec![staff_doc("a")]);
    assert_eq!(pane.cursor, 0);
  }

  #[test]
  fn filter_narrows_by_display_name() {
    let mut pane: Pane<Staff> = Pane::new();
    let generation = pane.begin_fetch();
    pane.apply_fetch(
      generation,
      vec![staff_doc("ana"), staff_doc("bruno"), staff_doc("marina")],
    );

    pane.filter = "an".into();
    let names: Vec<_> = pane
      .filtered()
      .iter()
      .map(|d| d.fields.name.clone())
      .collect();
    assert!(names.contains(&"ana".to_string()));
    assert!(names.contains(&"marina".to_string()));
    assert!(!names.contains(&"bruno".to_string()));
  }

  #[test]
  fn number_keys_map_to_tabs_in_order() {
    assert_eq!(Tab::from_digit('1'), Some(Tab::Animals));
    assert_eq!(Tab::from_digit('7'), Some(Tab::Visits));
    assert_eq!(Tab::from_digit('8'), None);
    assert_eq!(Tab::from_digit('0'), None);
  }

  #[test]
  fn tab_cycle_wraps() {
    let mut tab = Tab::Animals;
    for _ in 0..Tab::ALL.len() {
      tab = tab.next();
    }
    assert_eq!(tab, Tab::Animals);
  }
}
