//! Column registry: per-file header lists plus the ordered (file, column) selection list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A column chosen for the combined view. Unique by (file_name, column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub file_name: String,
    pub column: String,
}

impl ColumnSelection {
    pub fn new(file_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRegistry {
    columns: BTreeMap<String, Vec<String>>,
    selections: Vec<ColumnSelection>,
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) the header list of a file
    pub fn register(&mut self, file_name: &str, headers: Vec<String>) {
        self.columns.insert(file_name.to_string(), headers);
    }

    pub fn columns(&self, file_name: &str) -> Option<&[String]> {
        self.columns.get(file_name).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn selections(&self) -> &[ColumnSelection] {
        &self.selections
    }

    pub fn is_selected(&self, file_name: &str, column: &str) -> bool {
        self.position(file_name, column).is_some()
    }

    fn position(&self, file_name: &str, column: &str) -> Option<usize> {
        self.selections
            .iter()
            .position(|s| s.file_name == file_name && s.column == column)
    }

    /// Remove the pair if selected, otherwise append it. Returns whether it is now selected.
    pub fn toggle(&mut self, file_name: &str, column: &str) -> bool {
        match self.position(file_name, column) {
            Some(idx) => {
                self.selections.remove(idx);
                false
            }
            None => {
                self.selections.push(ColumnSelection::new(file_name, column));
                true
            }
        }
    }

    /// Forget a file and every selection that points at it
    pub fn remove_file(&mut self, file_name: &str) {
        self.columns.remove(file_name);
        self.selections.retain(|s| s.file_name != file_name);
    }

    /// Swap a file for its replacement; selections keep their position and follow the new name
    pub fn replace_file(&mut self, old_name: &str, new_name: &str, headers: Vec<String>) {
        self.columns.remove(old_name);
        self.columns.insert(new_name.to_string(), headers);
        for selection in self.selections.iter_mut().filter(|s| s.file_name == old_name) {
            selection.file_name = new_name.to_string();
        }
        // a rename onto an already-selected pair would break uniqueness
        let mut seen = std::collections::HashSet::new();
        self.selections.retain(|s| seen.insert(s.clone()));
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
    }
}
