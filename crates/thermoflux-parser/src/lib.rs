pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::{Instrument, ParsedLogData, SkippedRow};
pub use registry::{parse_log_file, parse_with_parsers, LogParser};

#[cfg(test)]
mod tests;
