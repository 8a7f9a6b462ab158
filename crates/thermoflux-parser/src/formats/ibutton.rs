use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::{Instrument, ParsedLogData, SkippedRow};
use crate::registry::LogParser;

use super::schema::{
    IBUTTON_DATE_COLUMN, IBUTTON_PREAMBLE_LINES, IBUTTON_TEMPERATURE_COLUMN, IBUTTON_TIME_COLUMN,
    IBUTTON_VALUE_COLUMN, TIMESTAMP_COLUMN,
};
use super::{build_dataframe, coerce_f64, datetime_column, find_column, skip_preamble};

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parser for the iButton logger export: a 24-line device preamble,
/// then `Date`, `Time`, `Value` columns.
///
/// The logger flushes partial and garbage rows into its export, so row
/// sanitization is the bulk of the work: rows with missing fields or a
/// date/time that fails the shape check are dropped silently (recorded
/// in `skipped_rows`), never raised.
#[derive(Default)]
pub struct IButtonParser;

impl IButtonParser {
    const NAME: &'static str = "IBUTTON_EXPORT";
}

impl LogParser for IButtonParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedLogData, ParserError> {
        let body = skip_preamble(Self::NAME, content, IBUTTON_PREAMBLE_LINES)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());
        let mut records = reader.records();

        let header = records
            .next()
            .ok_or(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "file missing column header row".to_string(),
            })?
            .map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

        let date_idx = find_column(Self::NAME, &header, IBUTTON_DATE_COLUMN)?;
        let time_idx = find_column(Self::NAME, &header, IBUTTON_TIME_COLUMN)?;
        let value_idx = find_column(Self::NAME, &header, IBUTTON_VALUE_COLUMN)?;

        let mut timestamps: Vec<i64> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();
        let mut skipped_rows: Vec<SkippedRow> = Vec::new();

        for (row_idx, record) in records.enumerate() {
            let record = record.map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

            let line_index = row_idx + IBUTTON_PREAMBLE_LINES + 2;

            let date = record.get(date_idx).unwrap_or("").trim();
            let time = record.get(time_idx).unwrap_or("").trim();

            if date.is_empty() || time.is_empty() {
                skipped_rows.push(SkippedRow::new(line_index, "missing date or time field"));
                continue;
            }
            if !DATE_SHAPE.is_match(date) {
                skipped_rows.push(SkippedRow::new(
                    line_index,
                    format!("date '{date}' is not YYYY-MM-DD"),
                ));
                continue;
            }
            if !TIME_SHAPE.is_match(time) {
                skipped_rows.push(SkippedRow::new(
                    line_index,
                    format!("time '{time}' is not HH:MM:SS"),
                ));
                continue;
            }

            let combined = format!("{date} {time}");
            let Ok(dt) = NaiveDateTime::parse_from_str(&combined, DATETIME_FORMAT) else {
                skipped_rows.push(SkippedRow::new(
                    line_index,
                    format!("'{combined}' is not a valid calendar date-time"),
                ));
                continue;
            };

            timestamps.push(dt.and_utc().timestamp_micros());
            values.push(coerce_f64(record.get(value_idx).unwrap_or("")));
        }

        let columns = vec![
            datetime_column(Self::NAME, TIMESTAMP_COLUMN, timestamps)?,
            Series::new(IBUTTON_TEMPERATURE_COLUMN.into(), values).into(),
        ];
        let table = build_dataframe(Self::NAME, columns)?;

        Ok(ParsedLogData {
            instrument: Instrument::IButton,
            format: Self::NAME,
            table,
            skipped_rows,
        })
    }
}
