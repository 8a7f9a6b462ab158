use thiserror::Error;

use thermoflux_parser::ParserError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Log parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("Calibration config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid timestamp '{value}'; use 'MM/DD/YYYY HH:MM'")]
    InvalidTimestamp { value: String },

    #[error("window holds {points} usable point(s); a gradient needs two distinct timestamps")]
    DegenerateWindow { points: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
