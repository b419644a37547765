//! Export of the derived view to CSV and JSON.
//!
//! Exports honor the derived row order and can be limited to the selected
//! rows. CSV carries rendered cell text; JSON carries typed accessor values.

use thiserror::Error;

use crate::column::{Column, ColumnRole};
use crate::state::TableView;

/// Export format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Which rows of the view to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Every row, in derived order.
    All,
    /// Only selected rows, in derived order.
    Selected,
}

/// Errors from serializing or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write file '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// UTF-8 BOM for Excel compatibility.
const UTF8_BOM: &str = "\u{FEFF}";

/// Export rows to a string in the given format.
///
/// `view` supplies row order and selection; `rows` and `columns` supply the
/// data. The selection checkbox column is excluded from output.
pub fn export_table<R>(
    rows: &[R],
    columns: &[Column<R>],
    view: &TableView,
    scope: ExportScope,
    format: ExportFormat,
) -> Result<String, ExportError> {
    let exported: Vec<&R> = view
        .rows
        .iter()
        .filter(|r| scope == ExportScope::All || r.selected)
        .map(|r| &rows[r.source_index])
        .collect();
    let data_columns: Vec<&Column<R>> = columns
        .iter()
        .filter(|c| c.role() == ColumnRole::Data)
        .collect();

    match format {
        ExportFormat::Csv => export_csv(&exported, &data_columns),
        ExportFormat::Json => export_json(&exported, &data_columns),
    }
}

/// CSV with header row and rendered cell text, plus a UTF-8 BOM.
fn export_csv<R>(rows: &[&R], columns: &[&Column<R>]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let headers: Vec<&str> = columns.iter().map(|c| c.title()).collect();
    wtr.write_record(&headers)?;

    for row in rows {
        let values: Vec<String> = columns.iter().map(|c| c.render_cell(row)).collect();
        wtr.write_record(&values)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // csv output of valid UTF-8 input is valid UTF-8
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(format!("{}{}", UTF8_BOM, content))
}

/// JSON array of objects keyed by column title, with typed values.
fn export_json<R>(rows: &[&R], columns: &[&Column<R>]) -> Result<String, ExportError> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut obj = serde_json::Map::new();
        for col in columns {
            obj.insert(col.title().to_string(), serde_json::to_value(col.value(row))?);
        }
        out.push(serde_json::Value::Object(obj));
    }
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Save exported content to a file.
pub fn save_to_file(content: &str, path: &str) -> Result<(), ExportError> {
    std::fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TableEngine;
    use crate::value::CellValue;

    struct Person {
        id: &'static str,
        name: &'static str,
        age: i64,
    }

    fn people() -> Vec<Person> {
        vec![
            Person { id: "1", name: "Alice", age: 30 },
            Person { id: "2", name: "Bob", age: 25 },
        ]
    }

    fn columns() -> Vec<Column<Person>> {
        vec![
            Column::selection(),
            Column::new("name", "Name", |p: &Person| {
                CellValue::Text(p.name.to_string())
            }),
            Column::new("age", "Age", |p: &Person| CellValue::Int(p.age)),
        ]
    }

    fn engine() -> TableEngine<Person> {
        TableEngine::new(columns(), |p: &Person| p.id.to_string())
    }

    #[test]
    fn test_export_csv_all() {
        let rows = people();
        let mut eng = engine();
        let view = eng.derive(&rows);
        let out = export_table(&rows, eng.columns(), &view, ExportScope::All, ExportFormat::Csv)
            .unwrap();
        assert!(out.contains("Name,Age"), "Selection column should be excluded");
        assert!(out.contains("Alice,30"));
        assert!(out.contains("Bob,25"));
    }

    #[test]
    fn test_export_csv_selected_only() {
        let rows = people();
        let mut eng = engine();
        eng.toggle_row_selected(&rows, "2");
        let view = eng.derive(&rows);
        let out = export_table(
            &rows,
            eng.columns(),
            &view,
            ExportScope::Selected,
            ExportFormat::Csv,
        )
        .unwrap();
        assert!(out.contains("Bob,25"));
        assert!(!out.contains("Alice"), "Unselected rows should be excluded");
    }

    #[test]
    fn test_export_follows_derived_order() {
        let rows = people();
        let mut eng = engine();
        eng.toggle_sort("age");
        let view = eng.derive(&rows);
        let out = export_table(&rows, eng.columns(), &view, ExportScope::All, ExportFormat::Csv)
            .unwrap();
        let bob = out.find("Bob").unwrap();
        let alice = out.find("Alice").unwrap();
        assert!(bob < alice, "Export should follow the sorted row order");
    }

    #[test]
    fn test_export_json_typed_values() {
        let rows = people();
        let mut eng = engine();
        let view = eng.derive(&rows);
        let out = export_table(&rows, eng.columns(), &view, ExportScope::All, ExportFormat::Json)
            .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["Name"], "Alice");
        assert_eq!(parsed[0]["Age"], 30, "JSON export should carry typed values");
    }

    #[test]
    fn test_export_empty_view() {
        let rows: Vec<Person> = Vec::new();
        let mut eng = engine();
        let view = eng.derive(&rows);
        let json = export_table(&rows, eng.columns(), &view, ExportScope::All, ExportFormat::Json)
            .unwrap();
        assert_eq!(json.trim(), "[]");
        let csv = export_table(&rows, eng.columns(), &view, ExportScope::All, ExportFormat::Csv)
            .unwrap();
        assert!(csv.contains("Name,Age"), "CSV of an empty table should still have headers");
    }
}
