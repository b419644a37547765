//! Terminal rendering for a derived [`TableView`].
//!
//! The renderer is a pure consumer: it paints headers (with sort indicators
//! and resize feedback), rows (with selection styling and a cursor
//! highlight), and the empty state. All interaction state lives in the
//! engine; nothing here mutates it.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::state::{HeaderView, SortDirection, TableView};

/// Sort indicator appended to a sorted header.
const ARROW_ASCENDING: &str = " ▲";
const ARROW_DESCENDING: &str = " ▼";

/// Header label with its sort indicator.
pub fn header_label(header: &HeaderView) -> String {
    match header.sort {
        Some(SortDirection::Ascending) => format!("{}{}", header.title, ARROW_ASCENDING),
        Some(SortDirection::Descending) => format!("{}{}", header.title, ARROW_DESCENDING),
        None => header.title.clone(),
    }
}

/// Column constraints from resolved widths, with an optional live override
/// for the column currently being drag-resized.
pub fn column_constraints(view: &TableView, live: Option<(&str, f32)>) -> Vec<Constraint> {
    view.headers
        .iter()
        .map(|h| {
            let width = match live {
                Some((id, w)) if id == h.id => w,
                _ => h.width,
            };
            Constraint::Length(width.round().max(0.0) as u16)
        })
        .collect()
}

/// Block title carrying cursor position and selection count.
pub fn build_title(view: &TableView, name: &str, cursor_row: Option<usize>) -> String {
    let position = cursor_row
        .filter(|_| !view.empty)
        .map(|r| format!(" [Row {}/{}]", r + 1, view.total_rows))
        .unwrap_or_default();
    let selected = if view.selected_count > 0 {
        format!(" ({} selected)", view.selected_count)
    } else {
        String::new()
    };
    format!(" {}{}{} ", name, position, selected)
}

/// Context hint shown under the table.
pub fn build_controls_hint() -> String {
    "s: sort, Space: select, a: select all, +/-: width, 0: reset, drag border: resize, \
     E: export, q: quit"
        .to_string()
}

/// Render the grid into `area`.
///
/// `cursor_row` highlights one row; `live` overrides one column width during
/// a resize drag so pointer movement repaints without a full re-derivation.
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    view: &TableView,
    name: &str,
    cursor_row: Option<usize>,
    cursor_col: Option<usize>,
    live: Option<(&str, f32)>,
) {
    let block = Block::default()
        .title(build_title(view, name, cursor_row))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if view.empty {
        let empty = Paragraph::new("No data")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header_cells: Vec<Cell> = view
        .headers
        .iter()
        .map(|h| {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if h.resizing {
                style = style.fg(Color::Cyan);
            }
            Cell::from(header_label(h)).style(style)
        })
        .collect();
    let header_row = Row::new(header_cells).style(Style::default().fg(Color::Yellow));

    let data_rows: Vec<Row> = view
        .rows
        .iter()
        .map(|r| {
            let cells: Vec<Cell> = r.cells.iter().map(|c| Cell::from(c.as_str())).collect();
            let mut row = Row::new(cells);
            if r.selected {
                row = row.style(Style::default().fg(Color::Green));
            }
            row
        })
        .collect();

    let widths = column_constraints(view, live);

    let table = Table::new(data_rows, widths)
        .header(header_row)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_highlight_style(Style::default().fg(Color::Cyan));

    let mut table_state = TableState::default().with_selected(cursor_row);
    table_state.select_column(cursor_col);
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Render the bottom controls hint.
pub fn render_hint_bar(frame: &mut Frame, area: Rect, status: Option<&str>) {
    let text = match status {
        Some(msg) => msg.to_string(),
        None => build_controls_hint(),
    };
    let widget = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(widget, area);
}

/// Render the export filename input bar.
pub fn render_input_bar(frame: &mut Frame, area: Rect, input_buffer: &str) {
    let input_widget = Paragraph::new(format!("Save as: {}", input_buffer))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(input_widget, area);
}

/// Render the export format selection prompt.
pub fn render_format_prompt(frame: &mut Frame, area: Rect) {
    let prompt = Paragraph::new("Export: c/j = CSV/JSON all rows, C/J = selected rows only (Esc to cancel)")
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, area);
}
