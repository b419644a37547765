//! Table engine: derivation and interaction operations.
//!
//! The engine combines caller-owned row records, immutable column
//! definitions, and the state store into a render-ready [`TableView`]. It
//! owns no row data and retains nothing between derivation passes; the caller
//! may replace the row collection at any time and simply derive again.
//!
//! Interaction entry points follow UI robustness rules: operations aimed at a
//! missing column, a non-sortable/non-resizable column, or a stale row id are
//! silent no-ops, and resize widths clamp instead of erroring.

use std::collections::HashSet;

use crate::column::{Column, ColumnRole};
use crate::state::{
    HeaderView, RowView, SelectionSummary, SortDirection, SortEntry, TableStateStore, TableView,
};
use crate::value::CellValue;

/// Checkbox glyph for a selected row, and the checked select-all header.
pub const GLYPH_CHECKED: &str = "[x]";
/// Checkbox glyph for an unselected row, and the unchecked select-all header.
pub const GLYPH_UNCHECKED: &str = "[ ]";
/// Select-all header glyph when some but not all rows are selected.
pub const GLYPH_INDETERMINATE: &str = "[-]";

/// In-progress resize drag. Live width is transient render feedback; nothing
/// is committed to sizing state until the drag ends.
#[derive(Debug, Clone)]
struct ResizeDrag {
    column: String,
    start_width: f32,
    start_x: f32,
    live_width: f32,
}

/// Notified with the new selected-row count after every selection change.
pub type SelectionChanged = Box<dyn FnMut(usize)>;

/// Sorting, sizing, and selection engine over caller-owned rows.
pub struct TableEngine<R> {
    columns: Vec<Column<R>>,
    row_id: Box<dyn Fn(&R) -> String>,
    store: TableStateStore,
    drag: Option<ResizeDrag>,
    on_selection_change: Option<SelectionChanged>,
}

impl<R> TableEngine<R> {
    /// Create an engine over the given columns. `row_id` must produce a
    /// stable identifier per row record; it is the selection key.
    ///
    /// Panics if two columns share an id. That is a caller programming
    /// error, caught here rather than silently rendering wrong cells.
    pub fn new(columns: Vec<Column<R>>, row_id: impl Fn(&R) -> String + 'static) -> Self {
        let mut seen = HashSet::new();
        for col in &columns {
            assert!(
                seen.insert(col.id().to_string()),
                "duplicate column id: {}",
                col.id()
            );
        }
        Self {
            columns,
            row_id: Box::new(row_id),
            store: TableStateStore::new(),
            drag: None,
            on_selection_change: None,
        }
    }

    /// Register the selection-count callback. Fires on every selection
    /// change, including implicit deselection of removed rows.
    pub fn on_selection_change(&mut self, callback: impl FnMut(usize) + 'static) {
        self.on_selection_change = Some(Box::new(callback));
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn store(&self) -> &TableStateStore {
        &self.store
    }

    /// Replace the column set. State for columns no longer present is reset;
    /// an in-flight resize drag is abandoned.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.drag = None;
        let ids: HashSet<&str> = columns.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), columns.len(), "duplicate column id");
        self.store.retain_columns(&ids);
        self.columns = columns;
    }

    /// Consume the re-derivation flag raised by any state mutation.
    pub fn take_dirty(&mut self) -> bool {
        self.store.take_dirty()
    }

    fn column(&self, column_id: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.id() == column_id)
    }

    // --- sorting -----------------------------------------------------------

    /// Cycle the sort on a column: unsorted -> ascending -> descending ->
    /// unsorted. Replaces the whole sort state; a no-op for unknown or
    /// non-sortable columns.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let Some(col) = self.column(column_id) else {
            return;
        };
        if !col.is_sortable() {
            return;
        }
        let next = match self.store.sorting().first() {
            Some(entry) if entry.column == column_id => match entry.direction {
                SortDirection::Ascending => {
                    vec![SortEntry::new(column_id, SortDirection::Descending)]
                }
                SortDirection::Descending => Vec::new(),
            },
            _ => vec![SortEntry::new(column_id, SortDirection::Ascending)],
        };
        self.store.set_sorting(next);
    }

    // --- resizing ----------------------------------------------------------

    /// Begin a resize drag on a column. No-op if a drag is already active or
    /// the column is unknown or non-resizable.
    pub fn begin_resize(&mut self, column_id: &str, pointer_x: f32) {
        if self.drag.is_some() {
            return;
        }
        let Some(col) = self.column(column_id) else {
            return;
        };
        if !col.is_resizable() {
            return;
        }
        let start_width = col.clamp_width(
            self.store
                .committed_width(column_id)
                .unwrap_or_else(|| col.initial_width()),
        );
        self.drag = Some(ResizeDrag {
            column: column_id.to_string(),
            start_width,
            start_x: pointer_x,
            live_width: start_width,
        });
        // Re-derive once so headers pick up the resizing flag; per-pixel
        // movement stays on the live override.
        self.store.mark_dirty();
    }

    /// Update the live width from pointer movement. Transient: updates render
    /// feedback only, without touching committed sizing state.
    pub fn update_resize(&mut self, pointer_x: f32) {
        let Some(drag) = &self.drag else {
            return;
        };
        let candidate = drag.start_width + (pointer_x - drag.start_x);
        let Some(col) = self.column(&drag.column) else {
            return;
        };
        let live = col.clamp_width(candidate);
        if let Some(drag) = &mut self.drag {
            drag.live_width = live;
        }
    }

    /// End the drag and commit the clamped live width to sizing state.
    pub fn end_resize(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.store.update_sizing([(drag.column, drag.live_width)]);
        }
    }

    /// Abandon the drag, discarding the live width. Committed sizing state is
    /// left unchanged regardless of intermediate movement.
    pub fn cancel_resize(&mut self) {
        if self.drag.take().is_some() {
            // Live width was shown during the drag; repaint without it.
            self.store.mark_dirty();
        }
    }

    /// True while a resize drag is active on the given column.
    pub fn is_resizing(&self, column_id: &str) -> bool {
        self.drag.as_ref().is_some_and(|d| d.column == column_id)
    }

    /// The column and live width of the active drag, if any. Lets a renderer
    /// patch one header width per pointer movement instead of re-deriving
    /// the whole view.
    pub fn live_resize(&self) -> Option<(&str, f32)> {
        self.drag.as_ref().map(|d| (d.column.as_str(), d.live_width))
    }

    /// Resolved width for a column: live drag value while a drag is active,
    /// else committed sizing value, else the declared initial width.
    pub fn resolved_width(&self, column_id: &str) -> Option<f32> {
        let col = self.column(column_id)?;
        if let Some(drag) = &self.drag {
            if drag.column == column_id {
                return Some(drag.live_width);
            }
        }
        Some(col.clamp_width(
            self.store
                .committed_width(column_id)
                .unwrap_or_else(|| col.initial_width()),
        ))
    }

    /// Reset every column to its declared initial width.
    pub fn reset_widths(&mut self) {
        self.store.clear_sizing();
    }

    // --- selection ---------------------------------------------------------

    /// Flip the selection of one row. A no-op for ids not present in `rows`,
    /// which never reintroduces a stale id.
    pub fn toggle_row_selected(&mut self, rows: &[R], row_id: &str) {
        let exists = rows.iter().any(|r| (self.row_id)(r) == row_id);
        if !exists {
            return;
        }
        self.store.set_selection_with(|prev| {
            let mut next = prev.clone();
            if !next.remove(row_id) {
                next.insert(row_id.to_string());
            }
            next
        });
        self.notify_selection();
    }

    /// Select-all toggle: moves unchecked or indeterminate to checked, and
    /// checked to unchecked. No-op on an empty row collection.
    pub fn toggle_all_selected(&mut self, rows: &[R]) {
        if rows.is_empty() {
            return;
        }
        let ids: Vec<String> = rows.iter().map(|r| (self.row_id)(r)).collect();
        let all_selected = ids.iter().all(|id| self.store.is_selected(id));
        if all_selected {
            self.store.set_selection(HashSet::new());
        } else {
            self.store.set_selection(ids.into_iter().collect());
        }
        self.notify_selection();
    }

    /// Replace the selection with an explicit set of row ids. Ids not in the
    /// current row collection are pruned on the next derivation.
    pub fn set_selection(&mut self, selection: HashSet<String>) {
        self.store.set_selection(selection);
        self.notify_selection();
    }

    fn notify_selection(&mut self) {
        if let Some(callback) = &mut self.on_selection_change {
            callback(self.store.selected_count());
        }
    }

    // --- derivation --------------------------------------------------------

    /// Derive the render-ready view from the current row collection.
    ///
    /// Pure with respect to the rows: they are read through accessors for
    /// this pass only and no reference is kept. Selection entries for rows
    /// absent from `rows` are removed (implicit deselect) before the view is
    /// built.
    pub fn derive(&mut self, rows: &[R]) -> TableView {
        let ids: Vec<String> = rows.iter().map(|r| (self.row_id)(r)).collect();

        let live: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if self.store.retain_selection(&live) {
            self.notify_selection();
        }

        let order = self.derive_order(rows);

        let selected_count = self.store.selected_count();
        let summary = SelectionSummary::from_counts(selected_count, rows.len());

        let headers = self
            .columns
            .iter()
            .map(|col| {
                let title = match col.role() {
                    ColumnRole::Data => col.title().to_string(),
                    ColumnRole::Selection => summary_glyph(summary).to_string(),
                };
                let sort = self
                    .store
                    .sorting()
                    .first()
                    .filter(|e| e.column == col.id())
                    .map(|e| e.direction);
                HeaderView {
                    id: col.id().to_string(),
                    title,
                    // resolved_width is Some for every id taken from columns
                    width: self.resolved_width(col.id()).unwrap_or_default(),
                    sort,
                    sortable: col.is_sortable(),
                    resizable: col.is_resizable(),
                    resizing: self.is_resizing(col.id()),
                }
            })
            .collect();

        let row_views = order
            .iter()
            .map(|&idx| {
                let row = &rows[idx];
                let id = ids[idx].clone();
                let selected = self.store.is_selected(&id);
                let cells = self
                    .columns
                    .iter()
                    .map(|col| match col.role() {
                        ColumnRole::Data => col.render_cell(row),
                        ColumnRole::Selection => {
                            let glyph = if selected { GLYPH_CHECKED } else { GLYPH_UNCHECKED };
                            glyph.to_string()
                        }
                    })
                    .collect();
                RowView {
                    id,
                    source_index: idx,
                    selected,
                    cells,
                }
            })
            .collect();

        TableView {
            empty: rows.is_empty(),
            headers,
            rows: row_views,
            selected_count,
            total_rows: rows.len(),
            selection: summary,
        }
    }

    /// Row order for the current sort state: input order when unsorted,
    /// otherwise a stable sort by the active column (ties keep input order;
    /// undefined values sort last in both directions).
    fn derive_order(&self, rows: &[R]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..rows.len()).collect();
        let Some(entry) = self.store.sorting().first() else {
            return order;
        };
        let Some(col) = self.column(&entry.column) else {
            return order;
        };
        if !col.is_sortable() {
            return order;
        }

        let keys: Vec<CellValue> = rows.iter().map(|r| col.value(r)).collect();
        let direction = entry.direction;
        order.sort_by(|&a, &b| {
            let (ka, kb) = (&keys[a], &keys[b]);
            match (ka.is_undefined(), kb.is_undefined()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => {
                    let ord = col.compare_values(ka, kb);
                    match direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                }
            }
        });
        order
    }
}

fn summary_glyph(summary: SelectionSummary) -> &'static str {
    match summary {
        SelectionSummary::Unchecked => GLYPH_UNCHECKED,
        SelectionSummary::Indeterminate => GLYPH_INDETERMINATE,
        SelectionSummary::Checked => GLYPH_CHECKED,
    }
}
