//! Column definitions: how to read, compare, size, and render one column.
//!
//! A [`Column`] is immutable for the lifetime of a table. All dynamic state
//! (committed widths, sort order, selection) lives in the state store; the
//! column only declares the initial width and the bounds that resizing is
//! clamped to.

use std::cmp::Ordering;

use crate::value::CellValue;

/// Default initial width when the caller does not declare one.
pub const DEFAULT_WIDTH: f32 = 150.0;

/// Fixed width of the selection checkbox column.
pub const SELECTION_WIDTH: f32 = 4.0;

/// Reads a cell value out of a row record.
pub type Accessor<R> = Box<dyn Fn(&R) -> CellValue>;

/// Custom comparison over accessor output, replacing the default ordering.
pub type Comparator = Box<dyn Fn(&CellValue, &CellValue) -> Ordering>;

/// Custom cell renderer, replacing the default value display.
pub type CellRenderer<R> = Box<dyn Fn(&R) -> String>;

/// What a column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Ordinary data column driven by its accessor.
    Data,
    /// Checkbox column bound to selection state (see `Column::selection`).
    Selection,
}

/// Static description of one table column.
pub struct Column<R> {
    id: String,
    title: String,
    role: ColumnRole,
    accessor: Accessor<R>,
    comparator: Option<Comparator>,
    renderer: Option<CellRenderer<R>>,
    width: f32,
    min_width: f32,
    max_width: f32,
    sortable: bool,
    resizable: bool,
}

impl<R> Column<R> {
    /// Create a data column with the given stable id, header title, and
    /// accessor. Defaults: width 150, unbounded resize, sortable, resizable.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            role: ColumnRole::Data,
            accessor: Box::new(accessor),
            comparator: None,
            renderer: None,
            width: DEFAULT_WIDTH,
            min_width: 0.0,
            max_width: f32::INFINITY,
            sortable: true,
            resizable: true,
        }
    }

    /// Create the selection checkbox column: fixed narrow width, not
    /// sortable, not resizable. Conventionally placed first.
    pub fn selection() -> Self {
        Self {
            id: "select".to_string(),
            title: String::new(),
            role: ColumnRole::Selection,
            accessor: Box::new(|_| CellValue::Null),
            comparator: None,
            renderer: None,
            width: SELECTION_WIDTH,
            min_width: SELECTION_WIDTH,
            max_width: SELECTION_WIDTH,
            sortable: false,
            resizable: false,
        }
    }

    /// Set the initial width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the minimum width resizing clamps to.
    pub fn with_min_width(mut self, min: f32) -> Self {
        self.min_width = min;
        self
    }

    /// Set the maximum width resizing clamps to.
    pub fn with_max_width(mut self, max: f32) -> Self {
        self.max_width = max;
        self
    }

    /// Replace the default value ordering for this column.
    pub fn with_comparator(
        mut self,
        comparator: impl Fn(&CellValue, &CellValue) -> Ordering + 'static,
    ) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Replace the default cell rendering (value display) for this column.
    pub fn with_renderer(mut self, renderer: impl Fn(&R) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Allow or forbid sorting on this column.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Allow or forbid resizing of this column.
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> ColumnRole {
        self.role
    }

    /// Declared initial width, before any committed override.
    pub fn initial_width(&self) -> f32 {
        self.width
    }

    pub fn min_width(&self) -> f32 {
        self.min_width
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    /// Clamp a candidate width into this column's declared bounds.
    pub fn clamp_width(&self, width: f32) -> f32 {
        width.clamp(self.min_width, self.max_width)
    }

    /// Read this column's value from a row record.
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Render this column's cell text for a row record.
    pub fn render_cell(&self, row: &R) -> String {
        match &self.renderer {
            Some(render) => render(row),
            None => self.value(row).to_string(),
        }
    }

    /// Compare two accessor values using the column comparator, falling back
    /// to the default value ordering.
    pub fn compare_values(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => crate::value::compare(a, b),
        }
    }
}
