use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{CalreaCalibratedParser, CalreaRawParser, IButtonParser};
use crate::model::ParsedLogData;

pub trait LogParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<ParsedLogData, ParserError>;
}

pub fn parse_log_file(content: &str) -> Result<ParsedLogData, ParserError> {
    let calrea_raw = CalreaRawParser;
    let calrea_calibrated = CalreaCalibratedParser;
    let ibutton = IButtonParser;
    let parsers: [&dyn LogParser; 3] = [&calrea_raw, &calrea_calibrated, &ibutton];
    parse_with_parsers(content, &parsers)
}

pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn LogParser],
) -> Result<ParsedLogData, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            // A wrong format usually manifests as the header not
            // containing this parser's required columns.
            Err(ParserError::MissingColumn { column, .. }) => {
                attempts.push(ParserAttempt::new(
                    parser.name(),
                    format!("missing required column '{column}'"),
                ));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
