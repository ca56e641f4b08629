//! TUI rendering — orchestrates all panes.

pub mod form;
pub mod table;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::{
  app::{App, Tab, ToastKind},
  form::FormState,
  screen::ScreenEntity,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();
  let lookups = app.lookups();

  // Vertical stack: tab bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tab bar
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  draw_body(f, rows[1], app, &lookups);
  draw_status(f, rows[2], app);

  // Modal layers on top of the body.
  if let Some(form_state) = current_form(app) {
    form::draw_form(f, area, form_state);
  } else if let Some(name) = pending_delete_name(app) {
    form::draw_confirm(f, area, &name);
  }
}

// ─── Tab bar ──────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let mut spans = vec![Span::styled(
    " patas ",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];

  for (i, tab) in Tab::ALL.iter().enumerate() {
    let label = format!(" {} {} ", i + 1, tab.title());
    let style = if *tab == app.tab {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(label, style));
  }

  let line = Line::from(spans);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App, lookups: &crate::screen::Lookups) {
  match app.tab {
    Tab::Animals => table::draw_pane(f, area, &app.animals, lookups),
    Tab::Tutors => table::draw_tutors(f, area, app, lookups),
    Tab::Services => table::draw_pane(f, area, &app.services, lookups),
    Tab::Products => table::draw_pane(f, area, &app.products, lookups),
    Tab::Sales => table::draw_pane(f, area, &app.sales, lookups),
    Tab::Staff => table::draw_pane(f, area, &app.staff, lookups),
    Tab::Visits => table::draw_visits(f, area, app, lookups),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  // A live toast takes the whole bar.
  if let Some(toast) = &app.toast {
    let style = match toast.kind {
      ToastKind::Success => Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD),
      ToastKind::Error => Style::default()
        .fg(Color::White)
        .bg(Color::Red)
        .add_modifier(Modifier::BOLD),
    };
    f.render_widget(
      Paragraph::new(format!(" {}", toast.message)).style(style),
      area,
    );
    return;
  }

  let hints = if current_form(app).is_some() {
    "Tab/↑↓ focus  ←→ option  Space toggle  Enter save  Esc cancel"
  } else if pending_delete_name(app).is_some() {
    "y confirm delete  n cancel"
  } else if app.tab == Tab::Visits && app.visit_animal.is_none() {
    "↑↓/jk navigate  Enter select animal  1-7 tabs  q quit"
  } else {
    "↑↓/jk navigate  n new  e edit  d delete  r refresh  / search  1-7 tabs  q quit"
  };

  f.render_widget(
    Paragraph::new(format!(" {hints}"))
      .style(Style::default().fg(Color::DarkGray).bg(Color::Black)),
    area,
  );
}

// ─── Modal helpers ────────────────────────────────────────────────────────────

fn current_form(app: &App) -> Option<&FormState> {
  match app.tab {
    Tab::Animals => app.animals.form.as_ref(),
    Tab::Tutors => app.tutors.form.as_ref(),
    Tab::Services => app.services.form.as_ref(),
    Tab::Products => app.products.form.as_ref(),
    Tab::Sales => app.sales.form.as_ref(),
    Tab::Staff => app.staff.form.as_ref(),
    Tab::Visits => app.visits.form.as_ref(),
  }
}

/// Display name of the document pending deletion on the current tab.
fn pending_delete_name(app: &App) -> Option<String> {
  fn name_of<E: ScreenEntity>(pane: &crate::app::Pane<E>) -> Option<String> {
    let id = pane.confirm_delete?;
    pane
      .items
      .iter()
      .find(|doc| doc.id == id)
      .map(E::display_name)
  }

  match app.tab {
    Tab::Animals => name_of(&app.animals),
    Tab::Tutors => name_of(&app.tutors),
    Tab::Services => name_of(&app.services),
    Tab::Products => name_of(&app.products),
    Tab::Sales => name_of(&app.sales),
    Tab::Staff => name_of(&app.staff),
    Tab::Visits => name_of(&app.visits),
  }
}
