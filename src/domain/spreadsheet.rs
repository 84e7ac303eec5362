//! Calendar dates as they arrive from forms and spreadsheet imports.
//!
//! Spreadsheets store dates as a day count from 1899-12-30, so an imported
//! row may carry `44562` where a form would send `"2022-01-01"`.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_INSTALLATION_DATE, SPREADSHEET_EPOCH};
use crate::errors::{AppError, AppResult};

/// Largest serial a spreadsheet can represent (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// A date given either as a spreadsheet serial or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    Serial(f64),
    Text(String),
}

impl DateInput {
    /// Resolve to a calendar date.
    ///
    /// Text holding only a number is treated as a serial, since spreadsheet
    /// exports frequently quote every cell.
    pub fn to_date(&self) -> AppResult<NaiveDate> {
        match self {
            DateInput::Serial(serial) => serial_to_date(*serial),
            DateInput::Text(text) => {
                let text = text.trim();
                match text.parse::<f64>() {
                    Ok(serial) => serial_to_date(serial),
                    Err(_) => parse_date_text(text),
                }
            }
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Text(date.format("%Y-%m-%d").to_string())
    }
}

/// Build a date from a `(year, month, day)` constant.
pub fn ymd((year, month, day): (i32, u32, u32)) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::internal(format!("Invalid calendar date {year}-{month}-{day}")))
}

/// Installation date applied when none is supplied.
pub fn default_installation_date() -> AppResult<NaiveDate> {
    ymd(DEFAULT_INSTALLATION_DATE)
}

/// Resolve an optional input, falling back to the default installation date.
pub fn date_or_default(input: Option<&DateInput>) -> AppResult<NaiveDate> {
    match input {
        Some(input) => input.to_date(),
        None => default_installation_date(),
    }
}

/// Convert a spreadsheet serial to a calendar date. The time-of-day
/// fraction is discarded.
pub fn serial_to_date(serial: f64) -> AppResult<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return Err(AppError::validation(format!(
            "Invalid spreadsheet date serial: {serial}"
        )));
    }

    let days = serial.trunc() as u64;
    ymd(SPREADSHEET_EPOCH)?
        .checked_add_days(Days::new(days))
        .ok_or_else(|| AppError::validation(format!("Invalid spreadsheet date serial: {serial}")))
}

/// Convert a calendar date back to its spreadsheet serial.
pub fn date_to_serial(date: NaiveDate) -> AppResult<i64> {
    Ok((date - ymd(SPREADSHEET_EPOCH)?).num_days())
}

fn parse_date_text(text: &str) -> AppResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(timestamp.date());
    }

    Err(AppError::validation(format!(
        "Invalid date '{text}', expected YYYY-MM-DD or a spreadsheet serial"
    )))
}
