use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{Instrument, ParsedLogData, SkippedRow};
use crate::registry::LogParser;

use super::schema::{
    CALREA_TIME_COLUMN, HEAT_FLUX_COLUMN, SKIN_TEMPERATURE_COLUMN, TIMESTAMP_COLUMN,
};
use super::{build_dataframe, coerce_f64, datetime_column, find_column, parse_row_timestamp};

/// Parser for the calibrated Calrea CSV written by the conversion
/// step: no preamble, original columns plus the two appended physical
/// channels.
///
/// Rows whose timestamp does not parse are dropped into
/// `skipped_rows`; a file with zero data rows parses to an empty table
/// so an out-of-range query window can still surface the "no data"
/// sentinel instead of an error.
#[derive(Default)]
pub struct CalreaCalibratedParser;

impl CalreaCalibratedParser {
    const NAME: &'static str = "CALREA_CALIBRATED";
}

impl LogParser for CalreaCalibratedParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedLogData, ParserError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());
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

        let time_idx = find_column(Self::NAME, &header, CALREA_TIME_COLUMN)?;
        let skin_idx = find_column(Self::NAME, &header, SKIN_TEMPERATURE_COLUMN)?;
        let flux_idx = find_column(Self::NAME, &header, HEAT_FLUX_COLUMN)?;

        let mut timestamps: Vec<i64> = Vec::new();
        let mut skin: Vec<Option<f64>> = Vec::new();
        let mut flux: Vec<Option<f64>> = Vec::new();
        let mut skipped_rows: Vec<SkippedRow> = Vec::new();

        for (row_idx, record) in records.enumerate() {
            let record = record.map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

            let line_index = row_idx + 2;
            if record.len() != header.len() {
                return Err(ParserError::DataRow {
                    parser: Self::NAME,
                    line_index,
                    message: format!(
                        "expected {} columns but found {}",
                        header.len(),
                        record.len()
                    ),
                });
            }

            let time_value = record.get(time_idx).unwrap_or("");
            let Some(micros) = parse_row_timestamp(time_value) else {
                skipped_rows.push(SkippedRow::new(
                    line_index,
                    format!("unparseable timestamp '{}'", time_value.trim()),
                ));
                continue;
            };

            timestamps.push(micros);
            skin.push(coerce_f64(record.get(skin_idx).unwrap_or("")));
            flux.push(coerce_f64(record.get(flux_idx).unwrap_or("")));
        }

        let columns = vec![
            datetime_column(Self::NAME, TIMESTAMP_COLUMN, timestamps)?,
            Series::new(SKIN_TEMPERATURE_COLUMN.into(), skin).into(),
            Series::new(HEAT_FLUX_COLUMN.into(), flux).into(),
        ];
        let table = build_dataframe(Self::NAME, columns)?;

        Ok(ParsedLogData {
            instrument: Instrument::Calrea,
            format: Self::NAME,
            table,
            skipped_rows,
        })
    }
}
