//! Error taxonomy for the workbench.
//!
//! Every per-file failure carries the file name so a batch report can say which file failed
//! and why. "No data" states (no shared columns, nothing selected) are not errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// The file is not a spreadsheet type we accept.
    #[error("{name}: invalid file type{}", mime_suffix(.mime))]
    InvalidFileType { name: String, mime: Option<String> },

    /// The bytes could not be parsed as a workbook.
    #[error("{name}: failed to decode workbook: {reason}")]
    Decode { name: String, reason: String },

    #[error("{name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("no loaded file named '{0}'")]
    UnknownFile(String),

    #[error("no file is loaded")]
    NoActiveFile,

    #[error("no column named '{column}' in '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl WorkbenchError {
    /// Name of the file the error belongs to, when it belongs to one.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::InvalidFileType { name, .. } | Self::Decode { name, .. } | Self::Io { name, .. } => {
                Some(name)
            }
            Self::UnknownFile(name) => Some(name),
            Self::UnknownColumn { table, .. } => Some(table),
            Self::Export(_) | Self::Config(_) | Self::NoActiveFile => None,
        }
    }
}

fn mime_suffix(mime: &Option<String>) -> String {
    mime.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
}

pub type Result<T, E = WorkbenchError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file_type_message() {
        let err = WorkbenchError::InvalidFileType {
            name: "notes.txt".to_string(),
            mime: Some("text/plain".to_string()),
        };
        assert_eq!(err.to_string(), "notes.txt: invalid file type (text/plain)");
        assert_eq!(err.file_name(), Some("notes.txt"));

        let err = WorkbenchError::InvalidFileType { name: "a.pdf".to_string(), mime: None };
        assert_eq!(err.to_string(), "a.pdf: invalid file type");
    }
}
