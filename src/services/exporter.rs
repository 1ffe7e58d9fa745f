//! Write row tables back to xlsx with rust_xlsxwriter

use rust_xlsxwriter::{ColNum, RowNum, Workbook};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::Display;
use tracing::info;

use crate::core::{CellValue, Table};
use crate::error::{Result, WorkbenchError};
use crate::transform::date::format_iso_serial;

/// Which view an export comes from; decides the file and sheet names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ExportTarget {
    /// Columns picked across files
    Combined,
    /// Filtered rows of one file
    Filtered,
}

impl ExportTarget {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Combined => "combined_data.xlsx",
            Self::Filtered => "filtered_data.xlsx",
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Combined => "Combined Data",
            Self::Filtered => "FilteredData",
        }
    }
}

/// Service for exporting tables
pub struct ExportService;

impl ExportService {
    /// Columns written for a target. A combined export keeps every selected column, even an
    /// empty one; a filtered export skips columns with no value in any row.
    pub fn exported_columns(table: &Table, target: ExportTarget) -> Vec<usize> {
        match target {
            ExportTarget::Combined => (0..table.headers.len()).collect(),
            ExportTarget::Filtered => (0..table.headers.len())
                .filter(|&idx| table.rows.iter().any(|row| row.get(idx).is_some()))
                .collect(),
        }
    }

    /// Serialize a table into xlsx bytes. Nothing touches disk here.
    pub fn to_buffer(table: &Table, target: ExportTarget) -> Result<Vec<u8>> {
        let columns = Self::exported_columns(table, target);
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(target.sheet_name())?;

        for (out_col, &idx) in columns.iter().enumerate() {
            worksheet.write_string(0, out_col as ColNum, table.headers[idx].name.as_str())?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let out_row = (row_idx + 1) as RowNum;
            for (out_col, &idx) in columns.iter().enumerate() {
                let out_col = out_col as ColNum;
                match row.get(idx) {
                    None => {}
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string(out_row, out_col, s.as_str())?;
                    }
                    Some(CellValue::Number(n)) => {
                        worksheet.write_number(out_row, out_col, *n)?;
                    }
                    Some(CellValue::Bool(b)) => {
                        worksheet.write_boolean(out_row, out_col, *b)?;
                    }
                    Some(CellValue::DateTime(serial)) => {
                        worksheet.write_string(out_row, out_col, format_iso_serial(*serial))?;
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Export into `dir` under the target's fixed file name; returns the written path.
    /// The workbook is fully built before the file is created.
    pub fn to_dir(table: &Table, target: ExportTarget, dir: &Path) -> Result<PathBuf> {
        let buffer = Self::to_buffer(table, target)?;
        let path = dir.join(target.file_name());
        std::fs::write(&path, buffer).map_err(|source| WorkbenchError::Io {
            name: target.file_name().to_string(),
            source,
        })?;
        info!("Exported {} rows of '{}' to {}", table.row_count(), table.name, path.display());
        Ok(path)
    }
}
