//! Per-column substring filters over a single table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{Row, Table};

/// Column name -> substring pattern. A missing key means no filter on that column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, pattern: impl Into<String>) {
        self.0.insert(column.into(), pattern.into());
    }

    /// Remove the filter on a column; returns whether one was present
    pub fn clear(&mut self, column: &str) -> bool {
        self.0.remove(column).is_some()
    }

    pub fn clear_all(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn summary(&self) -> String {
        self.iter()
            .map(|(c, p)| format!("{c} contains '{p}'"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

impl<C: Into<String>, P: Into<String>> FromIterator<(C, P)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (C, P)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(c, p)| (c.into(), p.into())).collect())
    }
}

/// Case-insensitive containment of `pattern` in the cell's text. Absent cells never match.
fn matches(table: &Table, row: &Row, column: &str, pattern_lower: &str) -> bool {
    table
        .column_index(column)
        .and_then(|idx| row.get(idx))
        .is_some_and(|value| value.to_string().to_lowercase().contains(pattern_lower))
}

/// Rows of `table` that satisfy every filter, in original order
pub fn filter_rows<'a>(table: &'a Table, filters: &FilterSet) -> Vec<&'a Row> {
    if filters.is_empty() {
        return table.rows.iter().collect();
    }
    let lowered: Vec<(&str, String)> = filters.iter().map(|(c, p)| (c, p.to_lowercase())).collect();
    table
        .rows
        .iter()
        .filter(|row| lowered.iter().all(|(column, pattern)| matches(table, row, column, pattern)))
        .collect()
}

/// Same as [`filter_rows`] but returns an owned table, ready for paging or export
pub fn filter_table(table: &Table, filters: &FilterSet) -> Table {
    let rows = filter_rows(table, filters).into_iter().cloned().collect();
    table.with_rows(rows)
}
