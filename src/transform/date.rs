//! Spreadsheet serial dates.
//!
//! A serial is a day count where 25569 is 1970-01-01 (UTC) and the fractional part is the
//! time of day.

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::CellValue;

pub const UNIX_EPOCH_SERIAL: f64 = 25569.0;
const SECONDS_PER_DAY: i64 = 86_400;
// Nudges values like 0.9999999 (float noise for a whole second) up to the second they mean.
const FRACTION_EPSILON: f64 = 0.000_000_1;

/// How the combined view decides that a number is a date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateDetection {
    /// Every number strictly greater than 1 is a serial date
    #[default]
    Heuristic,
    /// Only cells the workbook typed as dates; plain numbers pass through
    Typed,
}

/// Heuristic test for a serial date. Plain quantities above 1 are misread as dates.
pub fn is_serial_date(value: f64) -> bool {
    value > 1.0
}

pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial - UNIX_EPOCH_SERIAL).floor() as i64;
    let fraction = serial - serial.floor() + FRACTION_EPSILON;
    let seconds = (SECONDS_PER_DAY as f64 * fraction).floor() as i64;

    let midnight = DateTime::from_timestamp(days.checked_mul(SECONDS_PER_DAY)?, 0)?.naive_utc();
    midnight.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// `DD/MM/YYYY HH:MM:SS`, 24-hour
pub fn format_serial(serial: f64) -> Option<String> {
    serial_to_datetime(serial).map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
}

/// `yyyy-mm-dd hh:mm:ss`, used to render date-typed cells as text
pub fn format_iso_serial(serial: f64) -> String {
    serial_to_datetime(serial)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| serial.to_string())
}

/// Rewrite a date cell as display text. Date-typed cells always convert; plain numbers only
/// under [`DateDetection::Heuristic`]. Anything else is returned unchanged.
pub fn normalize(value: &CellValue, detection: DateDetection) -> CellValue {
    match (value, detection) {
        (CellValue::Number(n), DateDetection::Heuristic) if is_serial_date(*n) => format_serial(*n)
            .map(CellValue::Text)
            .unwrap_or_else(|| value.clone()),
        (CellValue::DateTime(serial), _) => format_serial(*serial)
            .map(CellValue::Text)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}
