//! Table panes — one generic table per entity screen, plus the two screens
//! with extra structure (tutors detail, visits selector).

use patas_core::{
  entity::{Animal, Tutor, Visit},
  view,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use crate::{
  app::{App, Pane},
  screen::{Lookups, ScreenEntity},
};

// ─── Generic entity table ─────────────────────────────────────────────────────

/// Render a pane as a bordered table with the entity's columns.
pub fn draw_pane<E: ScreenEntity>(
  f: &mut Frame,
  area: Rect,
  pane: &Pane<E>,
  lookups: &Lookups,
) {
  let filtered = pane.filtered();
  let title = pane_title(E::TITLE, filtered.len(), pane.items.len(), pane);

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner = block.inner(area);
  f.render_widget(block, area);

  draw_filter_bar(f, &mut inner, pane);

  let rows: Vec<Row> = filtered
    .iter()
    .map(|doc| Row::new(E::row(doc, lookups)))
    .collect();

  render_table(f, inner, E::HEADERS, rows, filtered.len(), pane.cursor);
}

fn pane_title<E: ScreenEntity>(
  title: &str,
  shown: usize,
  total: usize,
  pane: &Pane<E>,
) -> String {
  if pane.loading {
    format!(" {title} (loading…) ")
  } else if pane.filter_active || !pane.filter.is_empty() {
    format!(" {title} ({shown}/{total}) ")
  } else {
    format!(" {title} ({total}) ")
  }
}

/// Reserve the bottom inner line for the live filter query: a leading slash
/// plus the current text, with a trailing cursor while typing.
fn draw_filter_bar<E: ScreenEntity>(f: &mut Frame, inner: &mut Rect, pane: &Pane<E>) {
  if !(pane.filter_active || !pane.filter.is_empty()) || inner.height < 2 {
    return;
  }
  let filter_area = Rect {
    x:      inner.x,
    y:      inner.y + inner.height - 1,
    width:  inner.width,
    height: 1,
  };
  inner.height = inner.height.saturating_sub(1);

  let filter_text = if pane.filter_active {
    format!("/{}_", pane.filter)
  } else {
    format!("/{}", pane.filter)
  };
  f.render_widget(
    Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
    filter_area,
  );
}

fn render_table(
  f: &mut Frame,
  area: Rect,
  headers: &'static [&'static str],
  rows: Vec<Row>,
  len: usize,
  cursor: usize,
) {
  let widths: Vec<Constraint> =
    headers.iter().map(|_| Constraint::Ratio(1, headers.len() as u32)).collect();

  let header = Row::new(headers.to_vec()).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );

  let table = Table::new(rows, widths)
    .header(header)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default();
  state.select((len > 0).then_some(cursor));
  f.render_stateful_widget(table, area, &mut state);
}

// ─── Tutors: list + expandable detail ─────────────────────────────────────────

/// Left: the tutor table. Right: the expanded tutor's contact details and
/// owned animals, via the per-tutor aggregation.
pub fn draw_tutors(f: &mut Frame, area: Rect, app: &App, lookups: &Lookups) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_pane(f, cols[0], &app.tutors, lookups);

  let expanded = app
    .expanded_tutor
    .and_then(|id| app.tutors.items.iter().find(|t| t.id == id));

  match expanded {
    Some(tutor) => draw_tutor_detail(f, cols[1], app, tutor),
    None => {
      let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
      let inner = block.inner(cols[1]);
      f.render_widget(block, cols[1]);
      f.render_widget(
        Paragraph::new("Press Enter on a tutor to expand.")
          .style(Style::default().fg(Color::DarkGray)),
        inner,
      );
    }
  }
}

fn draw_tutor_detail(
  f: &mut Frame,
  area: Rect,
  app: &App,
  tutor: &patas_core::Document<Tutor>,
) {
  let block = Block::default()
    .title(format!(" {} ", tutor.fields.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label_style = Style::default()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

  let mut lines: Vec<Line> = Vec::new();
  let contact: [(&str, &Option<String>); 5] = [
    ("phone", &tutor.fields.phone),
    ("email", &tutor.fields.email),
    ("address", &tutor.fields.address),
    ("postal", &tutor.fields.postal_code),
    ("city", &tutor.fields.city),
  ];
  for (label, value) in contact {
    if let Some(value) = value {
      lines.push(Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::raw(value.clone()),
      ]));
    }
  }

  let grouped = view::animals_by_tutor(&app.tutors.items, &app.animals.items);
  let owned: &[patas_core::Document<Animal>] =
    grouped.get(&tutor.id).map(Vec::as_slice).unwrap_or_default();

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("animals ({})", owned.len()),
    label_style,
  )));
  for animal in owned {
    let species = animal.fields.species.as_deref().unwrap_or("?");
    lines.push(Line::from(format!("  {} — {}", animal.fields.name, species)));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Visits: animal selector + gated history ──────────────────────────────────

pub fn draw_visits(f: &mut Frame, area: Rect, app: &App, lookups: &Lookups) {
  let Some(animal) = app.visit_animal else {
    draw_animal_selector(f, area, app);
    return;
  };

  let animal_name = lookups
    .animal_names
    .get(&animal)
    .map(String::as_str)
    .unwrap_or("?");

  let visible = app.visible_visits();
  let title = if app.visits.loading {
    format!(" Visits — {animal_name} (loading…) ")
  } else {
    format!(" Visits — {animal_name} ({})  [Esc] change animal ", visible.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  draw_filter_bar(f, &mut inner, &app.visits);

  let rows: Vec<Row> = visible
    .iter()
    .map(|doc| Row::new(Visit::row(doc, lookups)))
    .collect();

  render_table(f, inner, Visit::HEADERS, rows, visible.len(), app.visits.cursor);
}

fn draw_animal_selector(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" Select animal ({}) ", app.animals.items.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.animals.items.is_empty() {
    f.render_widget(
      Paragraph::new("No animals yet — create one on the Animals tab.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = app
    .animals
    .items
    .iter()
    .map(|a| {
      let species = a.fields.species.as_deref().unwrap_or("?");
      ListItem::new(format!("{} — {}", a.fields.name, species))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.selector_cursor.min(app.animals.items.len() - 1)));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}
