use crate::core::types::{CellValue, TableId};
use serde::{Deserialize, Serialize};

/// A column header. `source_index` is the column position in the source sheet and stays
/// stable even when blank headers were dropped or names repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub source_index: usize,
}

impl Header {
    pub fn new(name: impl Into<String>, source_index: usize) -> Self {
        Self {
            name: name.into(),
            source_index,
        }
    }
}

/// One row record, aligned with the owning table's headers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Option<CellValue>>,
}

impl Row {
    pub fn new(cells: Vec<Option<CellValue>>) -> Self {
        Self { cells }
    }

    /// Value at a column position; positions past the end are absent
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index).and_then(|c| c.as_ref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// A decoded sheet (or a derived view of one): ordered headers plus row records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub headers: Vec<Header>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<Header>, rows: Vec<Row>) -> Self {
        Self {
            id: TableId::new(),
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build a table from header names and row values; convenient for derived tables and tests
    pub fn from_rows<H, S>(name: &str, headers: H, rows: Vec<Vec<Option<CellValue>>>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Header::new(name, idx))
            .collect();
        Self::new(name, headers, rows.into_iter().map(Row::new).collect())
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|h| h.name.as_str()).collect()
    }

    /// Position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.name == name)
    }

    /// Full value sequence of the first column with this name
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<&CellValue>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row.get(idx)).collect())
    }

    /// Value of a named column in one row; absent when either is missing
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of this table restricted to the given rows, keeping identity and headers
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            "people.xlsx",
            ["Name", "Age", "Name"],
            vec![
                vec![Some("Ann".into()), Some(31.0.into()), Some("A".into())],
                vec![Some("Bob".into()), None],
            ],
        )
    }

    #[test]
    fn test_lookup_resolves_first_duplicate() {
        let table = sample();
        assert_eq!(table.column_index("Name"), Some(0));
        assert_eq!(table.value(0, "Name"), Some(&CellValue::from("Ann")));
        assert_eq!(table.headers[2].source_index, 2);
    }

    #[test]
    fn test_missing_cells_are_absent() {
        let table = sample();
        assert_eq!(table.value(1, "Age"), None);
        assert_eq!(table.rows[1].get(2), None);
        assert_eq!(table.value(5, "Age"), None);
        assert_eq!(table.value(0, "Email"), None);
        assert_eq!(
            table.column_values("Age").unwrap(),
            vec![Some(&CellValue::Number(31.0)), None]
        );
    }
}
