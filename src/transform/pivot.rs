//! Reshape selected columns from several tables into one row-oriented table.

use tracing::debug;

use crate::core::{CellValue, ColumnSelection, Header, Row, Table};
use crate::transform::date::{DateDetection, normalize};

/// Build the combined table for an ordered selection list.
///
/// One output column per selection, in selection order (names may repeat across files).
/// The row count is the longest source column; shorter columns leave absent gaps rather
/// than being padded. A selection whose file or column is not loaded contributes an
/// all-absent column.
pub fn combine(
    name: &str,
    selections: &[ColumnSelection],
    tables: &[&Table],
    detection: DateDetection,
) -> Table {
    let columns: Vec<Vec<Option<CellValue>>> = selections
        .iter()
        .map(|selection| {
            let values = tables
                .iter()
                .find(|t| t.name == selection.file_name)
                .and_then(|t| t.column_values(&selection.column));
            match values {
                Some(values) => values
                    .into_iter()
                    .map(|v| v.map(|v| normalize(v, detection)))
                    .collect(),
                None => {
                    debug!(
                        "Selection {}:{} has no source column",
                        selection.file_name, selection.column
                    );
                    Vec::new()
                }
            }
        })
        .collect();

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let rows = (0..height)
        .map(|i| {
            Row::new(
                columns
                    .iter()
                    .map(|column| column.get(i).cloned().flatten())
                    .collect(),
            )
        })
        .collect();

    let headers = selections
        .iter()
        .enumerate()
        .map(|(idx, s)| Header::new(s.column.clone(), idx))
        .collect();
    Table::new(name, headers, rows)
}
