use serde::{Deserialize, Serialize};
use strum::Display;

/// The two paged views of the workbench
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum View {
    /// Filtered rows of the active file
    Filtered,
    /// Columns picked across files
    Combined,
}

/// State transitions the workbench understands.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Action {
    /// Make the n-th loaded file the active one for filtering
    SelectTable(usize),
    /// Remove a loaded file and every selection pointing at it
    DeleteFile(String),
    /// Add or remove a (file, column) pair from the combined view
    ToggleSelection { file: String, column: String },
    /// Set (or overwrite) the substring filter on a column of the active file
    SetFilter { column: String, pattern: String },
    ClearFilter(String),
    ClearAllFilters,
    /// Jump to a page; out-of-range pages are clamped
    SetPage { view: View, page: isize },
    NextPage(View),
    PrevPage(View),
    NextColumn,
    PrevColumn,
}
