//! Workbook decoding using the calamine library

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::{CellValue, Header, Row, Table};
use crate::error::{Result, WorkbenchError};

fn decode_error(name: &str, reason: impl ToString) -> WorkbenchError {
    WorkbenchError::Decode {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Convert a calamine cell. Empty cells are absent; date-typed cells keep their serial.
pub fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(CellValue::Text(s.clone())),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::DateTime(d) => Some(CellValue::DateTime(d.as_f64())),
        Data::DateTimeIso(s) => Some(CellValue::Text(s.clone())),
        Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(e) => Some(CellValue::Text(e.to_string())),
    }
}

/// Header cells that are empty or blank strings are dropped; the rest keep their position
fn header_name(cell: &Data) -> Option<String> {
    match cell_value(cell)? {
        CellValue::Text(s) if s.is_empty() => None,
        value => Some(value.to_string()),
    }
}

/// Turn a sheet range into a table: first row is the header, every later non-blank row a record
pub fn decode_range(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let headers: Vec<Header> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| header_name(cell).map(|n| Header::new(n, idx)))
            .collect(),
        None => Vec::new(),
    };

    let records: Vec<Row> = rows
        .map(|cells| {
            Row::new(
                headers
                    .iter()
                    .map(|h| cells.get(h.source_index).and_then(cell_value))
                    .collect(),
            )
        })
        .filter(|row| !row.is_blank())
        .collect();

    debug!(
        "Decoded '{}': {} columns, {} rows",
        name,
        headers.len(),
        records.len()
    );
    Table::new(name, headers, records)
}

/// Decode the first sheet of an in-memory workbook (xlsx, xlsm, xlsb, xls or ods)
pub fn decode_bytes(name: &str, bytes: Vec<u8>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| decode_error(name, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| decode_error(name, "workbook contains no sheets"))?
        .map_err(|e| {
            warn!("Failed to read first sheet of '{}': {}", name, e);
            decode_error(name, e)
        })?;
    Ok(decode_range(name, &range))
}

/// Read and decode a workbook from disk; the table is named after the file name
pub fn decode_path(path: &Path) -> Result<Table> {
    let name = file_name(path);
    let bytes = std::fs::read(path).map_err(|source| WorkbenchError::Io {
        name: name.clone(),
        source,
    })?;
    decode_bytes(&name, bytes)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(cells: Vec<Vec<Data>>) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in cells.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[test]
    fn test_blank_headers_are_dropped_but_columns_stay_aligned() {
        let sheet = range(vec![
            vec![Data::String("Name".into()), Data::Empty, Data::String("".into()), Data::String("Age".into())],
            vec![Data::String("Ann".into()), Data::String("x".into()), Data::Empty, Data::Int(31)],
        ]);
        let table = decode_range("people.xlsx", &sheet);

        assert_eq!(table.header_names(), vec!["Name", "Age"]);
        assert_eq!(table.headers[1].source_index, 3);
        assert_eq!(table.value(0, "Age"), Some(&CellValue::Number(31.0)));
    }

    #[test]
    fn test_duplicate_headers_are_kept() {
        let sheet = range(vec![
            vec![Data::String("Id".into()), Data::String("Id".into())],
            vec![Data::Int(1), Data::Int(2)],
        ]);
        let table = decode_range("dup.xlsx", &sheet);
        assert_eq!(table.header_names(), vec!["Id", "Id"]);
        assert_eq!(
            table.rows[0].cells,
            vec![Some(CellValue::Number(1.0)), Some(CellValue::Number(2.0))]
        );
    }

    #[test]
    fn test_cells_and_blank_rows() {
        let sheet = range(vec![
            vec![Data::String("a".into()), Data::String("b".into()), Data::Float(2.0)],
            vec![Data::Bool(true), Data::String("".into()), Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Float(1.5)],
        ]);
        let table = decode_range("t.xlsx", &sheet);

        // numeric header is stringified
        assert_eq!(table.header_names(), vec!["a", "b", "2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0].cells,
            vec![Some(CellValue::Bool(true)), Some(CellValue::Text(String::new())), None]
        );
        assert_eq!(table.rows[1].cells, vec![None, None, Some(CellValue::Number(1.5))]);
    }

    #[test]
    fn test_empty_range() {
        let table = decode_range("empty.xlsx", &Range::empty());
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = decode_bytes("notes.xlsx", b"definitely not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, WorkbenchError::Decode { ref name, .. } if name == "notes.xlsx"));
    }
}
