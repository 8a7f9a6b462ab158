use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{Instrument, ParsedLogData};
use crate::registry::LogParser;

use super::schema::{
    CALREA_FLUX_COLUMN, CALREA_PREAMBLE_LINES, CALREA_TEMP_COLUMN, CALREA_TIME_COLUMN,
};
use super::{build_dataframe, coerce_f64, find_column, skip_preamble};

/// Column payload for the raw pass-through table: the two instrument
/// channels are typed, everything else is carried verbatim so the
/// calibrated output keeps the original columns intact.
enum RawColumn {
    Channel(Vec<Option<f64>>),
    Passthrough(Vec<String>),
}

/// Parser for the raw Calrea instrument export: a 14-line device
/// preamble, then a header row with the time and channel columns.
#[derive(Default)]
pub struct CalreaRawParser;

impl CalreaRawParser {
    const NAME: &'static str = "CALREA_RAW";
}

impl LogParser for CalreaRawParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<ParsedLogData, ParserError> {
        let body = skip_preamble(Self::NAME, content, CALREA_PREAMBLE_LINES)?;

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

        find_column(Self::NAME, &header, CALREA_TIME_COLUMN)?;
        let temp_idx = find_column(Self::NAME, &header, CALREA_TEMP_COLUMN)?;
        let flux_idx = find_column(Self::NAME, &header, CALREA_FLUX_COLUMN)?;

        let mut columns: Vec<RawColumn> = (0..header.len())
            .map(|idx| {
                if idx == temp_idx || idx == flux_idx {
                    RawColumn::Channel(Vec::new())
                } else {
                    RawColumn::Passthrough(Vec::new())
                }
            })
            .collect();

        let mut row_count = 0usize;
        for (row_idx, record) in records.enumerate() {
            let record = record.map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

            // preamble + header are 1-indexed lines ahead of the data
            let line_index = row_idx + CALREA_PREAMBLE_LINES + 2;
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

            for (idx, column) in columns.iter_mut().enumerate() {
                let value = record.get(idx).unwrap_or("");
                match column {
                    RawColumn::Channel(values) => values.push(coerce_f64(value)),
                    RawColumn::Passthrough(values) => values.push(value.to_string()),
                }
            }
            row_count += 1;
        }

        if row_count == 0 {
            return Err(ParserError::EmptyData { parser: Self::NAME });
        }

        let series: Vec<Column> = columns
            .into_iter()
            .enumerate()
            .map(|(idx, column)| {
                let name = header.get(idx).unwrap_or("").trim();
                match column {
                    RawColumn::Channel(values) => Series::new(name.into(), values).into(),
                    RawColumn::Passthrough(values) => Series::new(name.into(), values).into(),
                }
            })
            .collect();

        let table = build_dataframe(Self::NAME, series)?;

        Ok(ParsedLogData {
            instrument: Instrument::Calrea,
            format: Self::NAME,
            table,
            skipped_rows: Vec::new(),
        })
    }
}
