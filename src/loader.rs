//! CSV ingestion for the terminal viewer.
//!
//! Reads a CSV stream into [`Record`] rows with type-sniffed cell values, and
//! builds a column set sized to the content. The engine itself never sees
//! CSV; it only sees records through accessors.

use std::collections::HashSet;
use std::io::Read;

use thiserror::Error;

use crate::column::Column;
use crate::value::CellValue;

/// Errors from reading and parsing CSV input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("input has no header row")]
    NoHeader,
}

/// One loaded row: a stable id plus typed cells in column order.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub cells: Vec<CellValue>,
}

impl Record {
    /// Cell value at a column index; `Null` for short rows.
    pub fn cell(&self, idx: usize) -> CellValue {
        self.cells.get(idx).cloned().unwrap_or(CellValue::Null)
    }
}

/// A loaded CSV table: header titles plus records.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Parse a cell string into a typed value: empty -> Null, then bool, int,
/// float, falling back to text.
fn sniff(cell: &str) -> CellValue {
    if cell.is_empty() {
        return CellValue::Null;
    }
    match cell {
        "true" | "TRUE" | "True" => return CellValue::Bool(true),
        "false" | "FALSE" | "False" => return CellValue::Bool(false),
        _ => {}
    }
    if let Ok(i) = cell.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = cell.parse::<f64>() {
        return CellValue::Float(f);
    }
    CellValue::Text(cell.to_string())
}

/// Load a CSV stream. The first row is the header. Row ids come from a
/// leading `id` column when one exists, else from the record index.
pub fn load_csv(reader: impl Read) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(LoadError::NoHeader);
    }

    let id_col = headers.iter().position(|h| h.eq_ignore_ascii_case("id"));

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        let cells: Vec<CellValue> = row.iter().map(sniff).collect();
        let id = match id_col.and_then(|c| row.get(c)) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => idx.to_string(),
        };
        records.push(Record { id, cells });
    }

    Ok(Dataset { headers, records })
}

/// Build one data column per header, sized to the widest content.
///
/// Column ids are the header names, deduplicated with an index suffix when a
/// header repeats (the engine requires unique ids). Initial width fits the
/// longest rendered cell, clamped to a sane terminal range.
pub fn build_columns(dataset: &Dataset) -> Vec<Column<Record>> {
    let mut seen: HashSet<String> = HashSet::new();
    dataset
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let mut id = header.clone();
            if !seen.insert(id.clone()) {
                id = format!("{}_{}", header, idx);
                seen.insert(id.clone());
            }

            let content_width = dataset
                .records
                .iter()
                .map(|r| r.cell(idx).to_string().len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0);
            // +1 padding, bounded so one huge cell cannot eat the terminal
            let width = ((content_width + 1) as f32).clamp(4.0, 60.0);

            Column::new(id, header.clone(), move |r: &Record| r.cell(idx))
                .with_width(width)
                .with_min_width(4.0)
                .with_max_width(120.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "id,name,age,active\n1,Alice,30,true\n2,Bob,25,false\n3,Carol,,true\n";

    #[test]
    fn test_load_csv_basic() {
        let data = load_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["id", "name", "age", "active"]);
        assert_eq!(data.records.len(), 3);
        assert_eq!(data.records[0].id, "1", "Row id should come from the id column");
        assert_eq!(data.records[0].cell(1), CellValue::Text("Alice".to_string()));
        assert_eq!(data.records[0].cell(2), CellValue::Int(30));
        assert_eq!(data.records[0].cell(3), CellValue::Bool(true));
    }

    #[test]
    fn test_missing_cell_is_null() {
        let data = load_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.records[2].cell(2), CellValue::Null);
    }

    #[test]
    fn test_row_ids_fall_back_to_index() {
        let csv = "name,age\nAlice,30\nBob,25\n";
        let data = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.records[0].id, "0");
        assert_eq!(data.records[1].id, "1");
    }

    #[test]
    fn test_sniff_types() {
        assert_eq!(sniff(""), CellValue::Null);
        assert_eq!(sniff("42"), CellValue::Int(42));
        assert_eq!(sniff("2.5"), CellValue::Float(2.5));
        assert_eq!(sniff("true"), CellValue::Bool(true));
        assert_eq!(sniff("hello"), CellValue::Text("hello".to_string()));
    }

    #[test]
    fn test_build_columns_unique_ids() {
        let csv = "name,name\nA,B\n";
        let data = load_csv(csv.as_bytes()).unwrap();
        let columns = build_columns(&data);
        assert_eq!(columns[0].id(), "name");
        assert_eq!(columns[1].id(), "name_1", "Duplicate headers should get unique ids");
    }

    #[test]
    fn test_build_columns_width_fits_content() {
        let data = load_csv(SAMPLE.as_bytes()).unwrap();
        let columns = build_columns(&data);
        // "active" header (6 chars) is wider than its values
        let active = columns.iter().find(|c| c.id() == "active").unwrap();
        assert_eq!(active.initial_width(), 7.0);
    }

    #[test]
    fn test_empty_data_rows_is_ok() {
        let data = load_csv("a,b\n".as_bytes()).unwrap();
        assert!(data.records.is_empty());
        assert_eq!(data.headers.len(), 2);
    }
}
