//! Shape table data into `{ labels, datasets }` series for a charting surface.

use serde::{Deserialize, Serialize};

use crate::core::Table;
use crate::error::{Result, WorkbenchError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    /// `None` marks a gap (absent or non-numeric cell)
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

fn require_column(table: &Table, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| WorkbenchError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        })
}

/// Pie series: one label per distinct value (first appearance order) with its count
pub fn category_counts(table: &Table, column: &str) -> Result<ChartSeries> {
    let idx = require_column(table, column)?;
    let mut labels: Vec<String> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();

    for value in table.rows.iter().filter_map(|row| row.get(idx)) {
        let label = value.to_string();
        match labels.iter().position(|l| *l == label) {
            Some(pos) => counts[pos] += 1.0,
            None => {
                labels.push(label);
                counts.push(1.0);
            }
        }
    }

    Ok(ChartSeries {
        labels,
        datasets: vec![Dataset {
            label: column.to_string(),
            data: counts.into_iter().map(Some).collect(),
        }],
    })
}

/// Line series: x labels from `label_column`, one dataset per value column
pub fn line_series(table: &Table, label_column: &str, value_columns: &[&str]) -> Result<ChartSeries> {
    let label_idx = require_column(table, label_column)?;
    let value_idx = value_columns
        .iter()
        .map(|c| require_column(table, c))
        .collect::<Result<Vec<_>>>()?;

    let labels = table
        .rows
        .iter()
        .map(|row| row.get(label_idx).map(|v| v.to_string()).unwrap_or_default())
        .collect();
    let datasets = value_columns
        .iter()
        .zip(value_idx)
        .map(|(name, idx)| Dataset {
            label: name.to_string(),
            data: table
                .rows
                .iter()
                .map(|row| row.get(idx).and_then(|v| v.as_number()))
                .collect(),
        })
        .collect();

    Ok(ChartSeries { labels, datasets })
}
