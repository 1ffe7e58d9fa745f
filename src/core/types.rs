use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use crate::transform::date::format_iso_serial;

/// Unique identifier for a loaded table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    /// Create a new unique table ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s).map_err(|e| e.to_string())?))
    }
}

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// Accepted spreadsheet file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            XLSX_MIME => Some(Self::Xlsx),
            XLS_MIME => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Xlsx => XLSX_MIME,
            Self::Xls => XLS_MIME,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Xls => write!(f, "xls"),
        }
    }
}

/// A single decoded cell. Absent cells are `None` at the row level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Serial value of a cell the workbook typed as a date
    DateTime(f64),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::DateTime(serial) => f.write_str(&format_iso_serial(*serial)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_id_creation() {
        let id1 = TableId::new();
        let id2 = TableId::new();

        assert_ne!(id1, id2, "IDs should be unique");
        assert_eq!(TableId::from_str(&id1.to_string()).unwrap(), id1);
    }

    #[test]
    fn test_file_kind_detection() {
        assert_eq!(FileKind::from_mime(XLSX_MIME), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_mime("application/vnd.ms-excel"), Some(FileKind::Xls));
        assert_eq!(FileKind::from_mime("text/csv"), None);

        assert_eq!(FileKind::from_path(Path::new("book.XLSX")), Some(FileKind::Xlsx));
        assert_eq!(FileKind::from_path(Path::new("old.xls")), Some(FileKind::Xls));
        assert_eq!(FileKind::from_path(Path::new("data.csv")), None);
        assert_eq!(FileKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::from("x").to_string(), "x");
        assert_eq!(CellValue::DateTime(44197.5).to_string(), "2021-01-01 12:00:00");
    }
}
