//! tabgrid: a sortable, resizable, selectable data-grid engine.
//!
//! The core is framework-free: [`column::Column`] describes how to read,
//! compare, size, and render one column of caller-owned row records;
//! [`state::TableStateStore`] holds sort, sizing, and selection state; and
//! [`engine::TableEngine`] derives a render-ready [`state::TableView`] and
//! exposes the interaction operations (toggle sort, resize drags, selection
//! toggles). The `render`, `handlers`, `loader`, and `export` modules are the
//! terminal front-end built on top of the core.

pub mod column;
pub mod engine;
pub mod export;
pub mod handlers;
pub mod loader;
pub mod render;
pub mod state;
pub mod value;

pub use column::{Column, ColumnRole};
pub use engine::TableEngine;
pub use state::{SelectionSummary, SortDirection, SortEntry, TableStateStore, TableView};
pub use value::CellValue;
