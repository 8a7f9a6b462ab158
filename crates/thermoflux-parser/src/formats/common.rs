use chrono::NaiveDateTime;
use polars::prelude::*;

use crate::errors::ParserError;

/// Drop the fixed instrument preamble and return the remainder of the
/// file starting at the column header row.
pub(crate) fn skip_preamble<'a>(
    parser: &'static str,
    content: &'a str,
    lines: usize,
) -> Result<&'a str, ParserError> {
    let mut offset = 0;
    for _ in 0..lines {
        match content[offset..].find('\n') {
            Some(pos) => offset += pos + 1,
            None => {
                return Err(ParserError::FormatMismatch {
                    parser,
                    reason: format!("file shorter than its {lines}-line preamble"),
                })
            }
        }
    }
    Ok(&content[offset..])
}

/// Locate a required column in the header row by exact (trimmed) name.
pub(crate) fn find_column(
    parser: &'static str,
    header: &csv::StringRecord,
    column: &'static str,
) -> Result<usize, ParserError> {
    header
        .iter()
        .position(|name| name.trim() == column)
        .ok_or(ParserError::MissingColumn { parser, column })
}

/// Per-row timestamp formats accepted across instrument exports.
///
/// Failure here is never an error; callers drop the row and record it.
static ROW_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub(crate) fn parse_row_timestamp(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    for fmt in ROW_TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    None
}

/// Coerce a numeric cell, treating blanks, NANs, and unparseable text
/// as null so bad sensor values propagate instead of failing the file.
pub(crate) fn coerce_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub(crate) fn datetime_column(
    parser: &'static str,
    name: &str,
    micros: Vec<i64>,
) -> Result<Column, ParserError> {
    let series = Series::new(name.into(), micros);
    let series = series
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .map_err(|err| ParserError::Validation {
            parser,
            message: format!("failed to cast timestamp column: {err}"),
        })?;
    Ok(series.into())
}

pub(crate) fn build_dataframe(
    parser: &'static str,
    columns: Vec<Column>,
) -> Result<DataFrame, ParserError> {
    DataFrame::new(columns).map_err(|err| ParserError::Validation {
        parser,
        message: format!("failed to build dataframe: {err}"),
    })
}
