//! File intake: validate, read and decode batches of spreadsheet files.
//!
//! Every file in a batch is read concurrently and the batch is joined once all reads have
//! finished. Failures stay with their file; the report lists what loaded and what did not.

use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::{FileKind, Table};
use crate::error::{Result, WorkbenchError};
use crate::services::decoder::{decode_bytes, file_name};

/// A file handed to the workbench, as a browser or caller would supply it
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    /// Declared MIME type, when the source knows one
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            bytes,
        }
    }
}

/// Outcome of one intake batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub loaded: Vec<Table>,
    pub failed: Vec<WorkbenchError>,
}

impl BatchReport {
    fn push(&mut self, result: Result<Table>) {
        match result {
            Ok(table) => self.loaded.push(table),
            Err(e) => {
                warn!("{e}");
                self.failed.push(e);
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// "N loaded, M failed" plus one line per failure
    pub fn summary(&self) -> String {
        let mut out = format!("{} loaded, {} failed", self.loaded.len(), self.failed.len());
        for failure in &self.failed {
            out.push_str("\n  ");
            out.push_str(&failure.to_string());
        }
        out
    }
}

impl FromIterator<Result<Table>> for BatchReport {
    fn from_iter<I: IntoIterator<Item = Result<Table>>>(iter: I) -> Self {
        let mut report = Self::default();
        for result in iter {
            report.push(result);
        }
        report
    }
}

/// Service for bringing files into the workbench
pub struct IntakeService;

impl IntakeService {
    /// Accept a file by declared MIME type, or by extension when no type was declared
    pub fn classify(name: &str, mime: Option<&str>) -> Result<FileKind> {
        let kind = match mime {
            Some(mime) if !mime.is_empty() => FileKind::from_mime(mime),
            _ => FileKind::from_path(Path::new(name)),
        };
        kind.ok_or_else(|| WorkbenchError::InvalidFileType {
            name: name.to_string(),
            mime: mime.map(str::to_string),
        })
    }

    /// Validate and decode one in-memory file
    pub fn decode(file: IncomingFile) -> Result<Table> {
        Self::classify(&file.name, file.mime.as_deref())?;
        decode_bytes(&file.name, file.bytes)
    }

    /// Validate and decode in-memory files; one report entry per file
    pub fn decode_batch(files: Vec<IncomingFile>) -> BatchReport {
        files.into_iter().map(Self::decode).collect()
    }

    /// Read and decode one file from disk. Decoding runs on the blocking pool.
    pub async fn load(path: PathBuf) -> Result<Table> {
        let name = file_name(&path);
        Self::classify(&name, None)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| WorkbenchError::Io {
                name: name.clone(),
                source,
            })?;
        let task_name = name.clone();
        tokio::task::spawn_blocking(move || decode_bytes(&task_name, bytes))
            .await
            .map_err(|e| WorkbenchError::Decode {
                name,
                reason: e.to_string(),
            })?
    }

    /// Read every path concurrently and join once all are done
    pub async fn load_batch(paths: &[PathBuf]) -> BatchReport {
        let results = join_all(paths.iter().cloned().map(Self::load)).await;
        let report: BatchReport = results.into_iter().collect();
        info!("Intake batch: {} loaded, {} failed", report.loaded.len(), report.failed.len());
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_mime() {
        assert_eq!(
            IntakeService::classify(
                "a.bin",
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            )
            .unwrap(),
            FileKind::Xlsx
        );
        assert_eq!(
            IntakeService::classify("a.xls", Some("application/vnd.ms-excel")).unwrap(),
            FileKind::Xls
        );
        // a declared type wins over the extension
        let err = IntakeService::classify("a.xlsx", Some("text/csv")).unwrap_err();
        assert!(matches!(err, WorkbenchError::InvalidFileType { .. }));
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(IntakeService::classify("a.xlsx", None).unwrap(), FileKind::Xlsx);
        assert_eq!(IntakeService::classify("a.xlsx", Some("")).unwrap(), FileKind::Xlsx);
        assert!(IntakeService::classify("a.csv", None).is_err());
    }

    #[test]
    fn test_decode_batch_isolates_failures() {
        let files = vec![
            IncomingFile::new("notes.txt", Some("text/plain"), b"hello".to_vec()),
            IncomingFile::new("broken.xlsx", None, b"not a zip".to_vec()),
        ];
        let report = IntakeService::decode_batch(files);

        assert!(report.loaded.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert!(matches!(report.failed[0], WorkbenchError::InvalidFileType { .. }));
        assert!(matches!(report.failed[1], WorkbenchError::Decode { .. }));
        assert!(report.summary().starts_with("0 loaded, 2 failed"));
        assert!(!report.is_clean());
    }
}
