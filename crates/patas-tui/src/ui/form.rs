//! Modal overlays: the entity form and the delete confirmation dialog.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph},
};

use crate::form::{FieldKind, FormField, FormState};

// ─── Form modal ───────────────────────────────────────────────────────────────

/// Draw the form centered over the body.
pub fn draw_form(f: &mut Frame, area: Rect, form: &FormState) {
  let mut lines: Vec<Line> = Vec::new();
  for (i, field) in form.fields.iter().enumerate() {
    lines.extend(field_lines(field, i == form.focus));
  }

  lines.push(Line::from(""));
  if form.submitting {
    lines.push(Line::from(Span::styled(
      "saving…",
      Style::default().fg(Color::Yellow),
    )));
  } else if let Some(error) = &form.error {
    lines.push(Line::from(Span::styled(
      error.clone(),
      Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD),
    )));
  } else {
    lines.push(Line::from(Span::styled(
      "Enter to save, Esc to cancel",
      Style::default().fg(Color::DarkGray),
    )));
  }

  // Height: content plus borders, clamped to the available area.
  let height = (lines.len() as u16 + 2).min(area.height);
  let rect = centered_rect(area, 60, height);

  let block = Block::default()
    .title(format!(" {} ", form.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));

  f.render_widget(Clear, rect);
  let inner = block.inner(rect);
  f.render_widget(block, rect);
  f.render_widget(Paragraph::new(lines), inner);
}

/// One or more display lines for a field; multi-selects get one line per
/// option.
fn field_lines(field: &FormField, focused: bool) -> Vec<Line<'static>> {
  let label_style = if focused {
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let marker = if field.required { "*" } else { " " };
  let label = Span::styled(format!("{marker}{:<12}", field.label), label_style);

  match &field.kind {
    FieldKind::Text(v)
    | FieldKind::Date(v)
    | FieldKind::Number(v)
    | FieldKind::Integer(v) => {
      let value = if focused { format!("{v}_") } else { v.clone() };
      vec![Line::from(vec![label, Span::raw(value)])]
    }
    FieldKind::Select { options, cursor } => {
      let current = options
        .get(*cursor)
        .map(|opt| opt.label.as_str())
        .unwrap_or("—");
      let value = if focused {
        format!("◀ {current} ▶")
      } else {
        current.to_string()
      };
      vec![Line::from(vec![label, Span::raw(value)])]
    }
    FieldKind::MultiSelect { options, picked, cursor } => {
      let mut lines = vec![Line::from(vec![label])];
      for (i, (opt, on)) in options.iter().zip(picked).enumerate() {
        let mark = if *on { "[x]" } else { "[ ]" };
        let pointer = if focused && i == *cursor { ">" } else { " " };
        let style = if focused && i == *cursor {
          Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
          Style::default()
        };
        lines.push(Line::from(Span::styled(
          format!("  {pointer} {mark} {}", opt.label),
          style,
        )));
      }
      if options.is_empty() {
        lines.push(Line::from(Span::styled(
          "  (none available)",
          Style::default().fg(Color::DarkGray),
        )));
      }
      lines
    }
  }
}

// ─── Delete confirmation ──────────────────────────────────────────────────────

/// Blocking yes/no dialog shown before any delete is issued.
pub fn draw_confirm(f: &mut Frame, area: Rect, name: &str) {
  let rect = centered_rect(area, 50, 5);

  let block = Block::default()
    .title(" Confirm delete ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let lines = vec![
    Line::from(format!("Delete {name}?")),
    Line::from(""),
    Line::from(Span::styled(
      "[y] delete   [n] cancel",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Clear, rect);
  let inner = block.inner(rect);
  f.render_widget(block, rect);
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Layout helper ────────────────────────────────────────────────────────────

/// A rect of `width_pct` percent width and fixed `height`, centered in
/// `area`.
fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
  let width = (area.width * width_pct / 100).max(20).min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width.saturating_sub(width)) / 2,
    y: area.y + (area.height.saturating_sub(height)) / 2,
    width,
    height,
  }
}
