//! Input handling for the terminal viewer.
//!
//! Maps crossterm key and mouse events onto engine operations. Handlers
//! return a [`KeyAction`] telling the main loop what to do next; the engine's
//! dirty flag drives re-derivation afterwards.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;

use crate::engine::TableEngine;
use crate::export::{self, ExportFormat, ExportScope};
use crate::loader::Record;
use crate::state::TableView;

/// Keyboard width adjustment per keypress, in cells.
const KEY_RESIZE_STEP: f32 = 4.0;

/// Application input mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppMode {
    /// Regular grid navigation.
    Normal,
    /// 'E' pressed, selecting export format and scope.
    ExportFormat,
    /// Format selected, entering a filename.
    ExportFilename,
}

/// Result of handling an input event.
#[derive(Debug)]
pub enum KeyAction {
    /// No action needed.
    None,
    /// Exit the application.
    Quit,
    /// Display a status message.
    StatusMessage(String),
    /// Change input mode.
    ModeChange(AppMode),
}

/// Viewer state: the engine, the caller-owned records, and cursor/input
/// state around them.
pub struct App {
    pub engine: TableEngine<Record>,
    pub records: Vec<Record>,
    pub view: TableView,
    pub name: String,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub mode: AppMode,
    pub input_buffer: String,
    pub status: Option<String>,
    pub export_format: ExportFormat,
    pub export_scope: ExportScope,
}

impl App {
    pub fn new(mut engine: TableEngine<Record>, records: Vec<Record>, name: String) -> Self {
        let view = engine.derive(&records);
        Self {
            engine,
            records,
            view,
            name,
            cursor_row: 0,
            cursor_col: 0,
            mode: AppMode::Normal,
            input_buffer: String::new(),
            status: None,
            export_format: ExportFormat::Csv,
            export_scope: ExportScope::All,
        }
    }

    /// Re-derive the view if any engine state changed, clamping cursors to
    /// the new shape.
    pub fn refresh(&mut self) {
        if self.engine.take_dirty() {
            self.view = self.engine.derive(&self.records);
        }
        self.cursor_row = self
            .cursor_row
            .min(self.view.rows.len().saturating_sub(1));
        self.cursor_col = self
            .cursor_col
            .min(self.view.headers.len().saturating_sub(1));
    }

    /// Column id under the column cursor.
    fn cursor_column_id(&self) -> Option<String> {
        self.view
            .headers
            .get(self.cursor_col)
            .map(|h| h.id.clone())
    }

    /// Row id under the row cursor, in derived order.
    fn cursor_row_id(&self) -> Option<String> {
        self.view.rows.get(self.cursor_row).map(|r| r.id.clone())
    }
}

/// Run a whole resize gesture from one keypress: begin, one movement of
/// `delta`, commit. Clamping and no-op rules come from the engine.
fn keyboard_resize(app: &mut App, delta: f32) {
    if let Some(col) = app.cursor_column_id() {
        app.engine.begin_resize(&col, 0.0);
        app.engine.update_resize(delta);
        app.engine.end_resize();
    }
}

/// Handle key events in normal mode.
pub fn handle_normal_mode(key: &KeyEvent, app: &mut App) -> KeyAction {
    match key.code {
        // Quit on 'q' or Ctrl+C
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        // Vertical navigation over derived rows
        KeyCode::Char('j') | KeyCode::Down => {
            if app.cursor_row + 1 < app.view.rows.len() {
                app.cursor_row += 1;
            }
            KeyAction::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            app.cursor_row = 0;
            KeyAction::None
        }
        KeyCode::Char('G') | KeyCode::End => {
            app.cursor_row = app.view.rows.len().saturating_sub(1);
            KeyAction::None
        }

        // Horizontal column navigation
        KeyCode::Char('h') | KeyCode::Left => {
            app.cursor_col = app.cursor_col.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if app.cursor_col + 1 < app.view.headers.len() {
                app.cursor_col += 1;
            }
            KeyAction::None
        }

        // Sort cycle on the cursor column
        KeyCode::Char('s') => {
            if let Some(col) = app.cursor_column_id() {
                app.engine.toggle_sort(&col);
            }
            KeyAction::None
        }

        // Selection
        KeyCode::Char(' ') => {
            if let Some(row_id) = app.cursor_row_id() {
                app.engine.toggle_row_selected(&app.records, &row_id);
            }
            KeyAction::None
        }
        KeyCode::Char('a') => {
            app.engine.toggle_all_selected(&app.records);
            KeyAction::None
        }

        // Keyboard resize: a one-step drag gesture on the cursor column
        KeyCode::Char('+') | KeyCode::Char('=') => {
            keyboard_resize(app, KEY_RESIZE_STEP);
            KeyAction::None
        }
        KeyCode::Char('-') => {
            keyboard_resize(app, -KEY_RESIZE_STEP);
            KeyAction::None
        }
        KeyCode::Char('0') => {
            app.engine.reset_widths();
            KeyAction::StatusMessage("Column widths reset".to_string())
        }

        // Export
        KeyCode::Char('E') => {
            if app.view.empty {
                KeyAction::StatusMessage("Nothing to export".to_string())
            } else {
                KeyAction::ModeChange(AppMode::ExportFormat)
            }
        }

        // Esc abandons an in-flight resize drag
        KeyCode::Esc => {
            app.engine.cancel_resize();
            KeyAction::None
        }

        _ => KeyAction::None,
    }
}

/// Handle key events in export-format mode.
pub fn handle_export_format_mode(key: &KeyEvent, app: &mut App) -> KeyAction {
    let (format, scope) = match key.code {
        KeyCode::Char('c') => (ExportFormat::Csv, ExportScope::All),
        KeyCode::Char('j') => (ExportFormat::Json, ExportScope::All),
        KeyCode::Char('C') => (ExportFormat::Csv, ExportScope::Selected),
        KeyCode::Char('J') => (ExportFormat::Json, ExportScope::Selected),
        KeyCode::Esc => return KeyAction::ModeChange(AppMode::Normal),
        _ => return KeyAction::None,
    };
    if scope == ExportScope::Selected && app.view.selected_count == 0 {
        return KeyAction::StatusMessage("No rows selected".to_string());
    }
    app.export_format = format;
    app.export_scope = scope;
    app.input_buffer.clear();
    KeyAction::ModeChange(AppMode::ExportFilename)
}

/// Handle key events while entering the export filename.
pub fn handle_export_filename_mode(key: &KeyEvent, app: &mut App) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::ModeChange(AppMode::Normal),
        KeyCode::Backspace => {
            app.input_buffer.pop();
            KeyAction::None
        }
        KeyCode::Enter => {
            if app.input_buffer.is_empty() {
                return KeyAction::None;
            }
            let path = app.input_buffer.clone();
            let result = export::export_table(
                &app.records,
                app.engine.columns(),
                &app.view,
                app.export_scope,
                app.export_format,
            )
            .and_then(|content| export::save_to_file(&content, &path));
            let message = match result {
                Ok(()) => format!("Exported to {}", path),
                Err(e) => format!("Export failed: {}", e),
            };
            app.mode = AppMode::Normal;
            KeyAction::StatusMessage(message)
        }
        KeyCode::Char(c) => {
            app.input_buffer.push(c);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handle mouse events: drag on a header column border resizes the column.
///
/// `table_area` is the rect the grid was rendered into; the header row sits
/// just inside its top border.
pub fn handle_mouse(event: &MouseEvent, app: &mut App, table_area: Rect) -> KeyAction {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let header_y = table_area.y + 1;
            if event.row == header_y && event.column > table_area.x {
                let x_rel = event.column - table_area.x - 1;
                if let Some(col) = resize_target(&app.view, x_rel) {
                    app.engine.begin_resize(&col, event.column as f32);
                }
            }
            KeyAction::None
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.engine.update_resize(event.column as f32);
            KeyAction::None
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.engine.end_resize();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Find the resizable column whose right border sits at `x_rel` (relative to
/// the first content cell), within one cell of tolerance.
pub fn resize_target(view: &TableView, x_rel: u16) -> Option<String> {
    let mut edge: u16 = 0;
    for header in &view.headers {
        let width = header.width.round().max(0.0) as u16;
        edge = edge.saturating_add(width);
        if header.resizable && (x_rel == edge || x_rel + 1 == edge) {
            return Some(header.id.clone());
        }
        // one cell of inter-column spacing
        edge = edge.saturating_add(1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{HeaderView, RowView, SelectionSummary};

    fn header(id: &str, width: f32, resizable: bool) -> HeaderView {
        HeaderView {
            id: id.to_string(),
            title: id.to_string(),
            width,
            sort: None,
            sortable: true,
            resizable,
            resizing: false,
        }
    }

    fn view_with_headers(headers: Vec<HeaderView>) -> TableView {
        TableView {
            empty: false,
            headers,
            rows: vec![RowView {
                id: "1".to_string(),
                source_index: 0,
                selected: false,
                cells: Vec::new(),
            }],
            selected_count: 0,
            total_rows: 1,
            selection: SelectionSummary::Unchecked,
        }
    }

    #[test]
    fn test_resize_target_hits_column_edge() {
        let view = view_with_headers(vec![header("a", 10.0, true), header("b", 20.0, true)]);
        assert_eq!(resize_target(&view, 10), Some("a".to_string()));
        assert_eq!(resize_target(&view, 9), Some("a".to_string()), "One cell of tolerance");
        // edge of b: 10 + 1 spacing + 20 = 31
        assert_eq!(resize_target(&view, 31), Some("b".to_string()));
        assert_eq!(resize_target(&view, 5), None, "Mid-column is not a handle");
    }

    #[test]
    fn test_resize_target_skips_non_resizable() {
        let view = view_with_headers(vec![header("a", 10.0, false), header("b", 20.0, true)]);
        assert_eq!(resize_target(&view, 10), None);
    }
}
