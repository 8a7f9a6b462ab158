use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Which lab instrument produced a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Calrea,
    IButton,
}

impl Instrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Calrea => "calrea",
            Instrument::IButton => "ibutton",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row dropped during parsing, with the reason it was dropped.
///
/// Malformed rows are sensor noise, not fatal input faults, so parsers
/// accumulate them here instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-indexed line number in the source file.
    pub line_index: usize,
    pub reason: String,
}

impl SkippedRow {
    pub fn new(line_index: usize, reason: impl Into<String>) -> Self {
        Self {
            line_index,
            reason: reason.into(),
        }
    }
}

/// A parsed instrument log: the typed table plus drop diagnostics.
#[derive(Debug, Clone)]
pub struct ParsedLogData {
    pub instrument: Instrument,
    /// Name of the format parser that recognized the file.
    pub format: &'static str,
    pub table: DataFrame,
    pub skipped_rows: Vec<SkippedRow>,
}
