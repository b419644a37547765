//! Interaction state for a table instance.
//!
//! Three independent slices live here: sort order, committed column widths,
//! and row selection. The engine is the only writer; the renderer never
//! touches this directly. Also contains the render-ready view types produced
//! by derivation.

use std::collections::{HashMap, HashSet};

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One entry of the sort state. The sequence is ordered, but only the first
/// entry drives derivation (single-column sort).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortEntry {
    pub column: String,
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Tri-state summary of the selection, displayed by the select-all control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    /// No rows selected.
    Unchecked,
    /// Some but not all rows selected.
    Indeterminate,
    /// Every row selected.
    Checked,
}

impl SelectionSummary {
    /// Indeterminate iff `0 < selected < total`; checked iff `selected ==
    /// total` with at least one row.
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if selected == 0 || total == 0 {
            SelectionSummary::Unchecked
        } else if selected < total {
            SelectionSummary::Indeterminate
        } else {
            SelectionSummary::Checked
        }
    }
}

/// Holds the three state slices and flags re-derivation for the next paint.
///
/// Setters replace or merge as documented per slice; every mutation raises a
/// dirty flag that the owning loop consumes via [`TableStateStore::take_dirty`].
#[derive(Debug, Default)]
pub struct TableStateStore {
    sorting: Vec<SortEntry>,
    sizing: HashMap<String, f32>,
    selection: HashSet<String>,
    dirty: bool,
}

impl TableStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sort entries, in priority order.
    pub fn sorting(&self) -> &[SortEntry] {
        &self.sorting
    }

    /// Replace the sort state wholesale. Sort state is never merged.
    pub fn set_sorting(&mut self, sorting: Vec<SortEntry>) {
        self.sorting = sorting;
        self.dirty = true;
    }

    /// Committed width for a column, if one has been set.
    pub fn committed_width(&self, column: &str) -> Option<f32> {
        self.sizing.get(column).copied()
    }

    /// Merge the given widths into the sizing state. Columns absent from the
    /// update keep their current widths.
    pub fn update_sizing(&mut self, widths: impl IntoIterator<Item = (String, f32)>) {
        for (column, width) in widths {
            self.sizing.insert(column, width);
        }
        self.dirty = true;
    }

    /// Drop all committed widths, returning every column to its declared
    /// initial width.
    pub fn clear_sizing(&mut self) {
        self.sizing.clear();
        self.dirty = true;
    }

    /// Current selection set (row ids).
    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, row_id: &str) -> bool {
        self.selection.contains(row_id)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Replace the selection set wholesale.
    pub fn set_selection(&mut self, selection: HashSet<String>) {
        self.selection = selection;
        self.dirty = true;
    }

    /// Update the selection by applying `update` to the previous set.
    pub fn set_selection_with(&mut self, update: impl FnOnce(&HashSet<String>) -> HashSet<String>) {
        self.selection = update(&self.selection);
        self.dirty = true;
    }

    /// Drop selected ids not present in `live_ids`. Returns true if anything
    /// was removed. Does not raise the dirty flag: this runs inside
    /// derivation, which is already producing the fresh view.
    pub(crate) fn retain_selection(&mut self, live_ids: &HashSet<&str>) -> bool {
        let before = self.selection.len();
        self.selection.retain(|id| live_ids.contains(id.as_str()));
        self.selection.len() != before
    }

    /// Drop sort entries and committed widths referring to columns not in
    /// `columns`. Used when the caller replaces the column set.
    pub fn retain_columns(&mut self, columns: &HashSet<&str>) {
        self.sorting.retain(|e| columns.contains(e.column.as_str()));
        self.sizing.retain(|id, _| columns.contains(id.as_str()));
        self.dirty = true;
    }

    /// Flag a re-derivation without changing any slice. Used when transient
    /// render feedback (a live resize width) appears or disappears.
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consume the dirty flag. Returns true if any setter ran since the last
    /// call, meaning the view must be re-derived before the next paint.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// One rendered header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    /// Column id, stable across derivations.
    pub id: String,
    /// Header text. For the selection column this is the tri-state glyph.
    pub title: String,
    /// Resolved width: live drag value, else committed, else initial.
    pub width: f32,
    /// Active sort direction on this column, if any.
    pub sort: Option<SortDirection>,
    pub sortable: bool,
    pub resizable: bool,
    /// True while a resize drag is in progress on this column.
    pub resizing: bool,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Row id from the caller's id accessor.
    pub id: String,
    /// Index of this row in the caller's input collection.
    pub source_index: usize,
    pub selected: bool,
    /// Cell text, one entry per column in header order.
    pub cells: Vec<String>,
}

/// Render-ready view produced by one derivation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    /// True iff the input row collection was empty.
    pub empty: bool,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub selected_count: usize,
    pub total_rows: usize,
    pub selection: SelectionSummary,
}

impl TableView {
    /// Resolved width of a column by id.
    pub fn width(&self, column_id: &str) -> Option<f32> {
        self.headers
            .iter()
            .find(|h| h.id == column_id)
            .map(|h| h.width)
    }
}
