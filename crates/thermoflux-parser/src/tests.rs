use std::fs;
use std::path::PathBuf;

use polars::prelude::{DataType, TimeUnit};

use crate::errors::ParserError;
use crate::formats::schema::{
    CALREA_TEMP_COLUMN, HEAT_FLUX_COLUMN, IBUTTON_TEMPERATURE_COLUMN, SKIN_TEMPERATURE_COLUMN,
    TIMESTAMP_COLUMN,
};
use crate::formats::{CalreaCalibratedParser, CalreaRawParser, IButtonParser};
use crate::model::Instrument;
use crate::parse_log_file;
use crate::registry::LogParser;

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn parses_calrea_raw_export() {
    let content = fixture("calrea_raw_sample.csv");
    let parsed = parse_log_file(&content).expect("calrea raw parse failed");

    assert_eq!(parsed.instrument, Instrument::Calrea);
    assert_eq!(parsed.format, "CALREA_RAW");
    assert_eq!(parsed.table.height(), 6);
    assert!(parsed.skipped_rows.is_empty());
    assert_eq!(
        parsed.table.get_column_names_str(),
        vec![
            "seq",
            "time [UTC-OFS=-0500]",
            "temp_a0 [mC]",
            "hf_a0 [counts]"
        ]
    );

    let temp = parsed
        .table
        .column(CALREA_TEMP_COLUMN)
        .expect("temp channel missing")
        .f64()
        .expect("temp channel not f64");
    assert_eq!(temp.get(0), Some(787.0));
    // NAN cells coerce to null rather than failing the file
    assert_eq!(temp.get(3), None);

    // untyped columns pass through verbatim
    let seq = parsed
        .table
        .column("seq")
        .expect("seq column missing")
        .str()
        .expect("seq column not utf8");
    assert_eq!(seq.get(5), Some("5"));
}

#[test]
fn calrea_raw_renamed_channel_column_is_fatal() {
    let content = fixture("calrea_raw_sample.csv");
    let mutated = content.replacen("temp_a0 [mC]", "temp_a0 [C]", 1);

    let parser = CalreaRawParser;
    let err = parser
        .parse(&mutated)
        .expect_err("parser should reject a renamed channel column");
    match err {
        ParserError::MissingColumn { column, .. } => assert_eq!(column, CALREA_TEMP_COLUMN),
        other => panic!("expected MissingColumn error, got {other:?}"),
    }
}

#[test]
fn calrea_raw_truncated_preamble_is_format_mismatch() {
    let content = fixture("calrea_raw_sample.csv");
    let truncated = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let parser = CalreaRawParser;
    match parser.parse(&truncated) {
        Err(ParserError::FormatMismatch { .. }) => {}
        other => panic!("expected FormatMismatch error, got {other:?}"),
    }
}

#[test]
fn calrea_raw_header_only_is_empty_data() {
    let content = fixture("calrea_raw_sample.csv");
    let header_only = content.lines().take(15).collect::<Vec<_>>().join("\n") + "\n";

    let parser = CalreaRawParser;
    match parser.parse(&header_only) {
        Err(ParserError::EmptyData { .. }) => {}
        other => panic!("expected EmptyData error, got {other:?}"),
    }
}

#[test]
fn calrea_raw_rejects_row_with_missing_columns() {
    let mut content = fixture("calrea_raw_sample.csv");
    content.push_str("6,2025-01-17 10:01:00.000,1200\n");

    let parser = CalreaRawParser;
    let err = parser
        .parse(&content)
        .expect_err("parser should flag data rows with missing columns");
    match err {
        ParserError::DataRow { line_index, .. } => assert_eq!(line_index, 22),
        other => panic!("expected DataRow error, got {other:?}"),
    }
}

#[test]
fn parses_calrea_calibrated_file() {
    let content = fixture("calrea_calibrated_sample.csv");
    let parsed = parse_log_file(&content).expect("calibrated parse failed");

    assert_eq!(parsed.format, "CALREA_CALIBRATED");
    assert_eq!(parsed.table.height(), 5);
    assert_eq!(
        parsed.table.get_column_names_str(),
        vec![TIMESTAMP_COLUMN, SKIN_TEMPERATURE_COLUMN, HEAT_FLUX_COLUMN]
    );
    assert_eq!(
        parsed.table.column(TIMESTAMP_COLUMN).unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );

    let skin = parsed
        .table
        .column(SKIN_TEMPERATURE_COLUMN)
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(skin.get(0), Some(1.0));

    // the row with a malformed timestamp is dropped, not fatal
    assert_eq!(parsed.skipped_rows.len(), 1);
    assert_eq!(parsed.skipped_rows[0].line_index, 5);
    assert!(parsed.skipped_rows[0].reason.contains("not-a-time"));
}

#[test]
fn calibrated_file_with_no_data_rows_parses_empty() {
    let content = fixture("calrea_calibrated_sample.csv");
    let header_only = content.lines().take(1).collect::<Vec<_>>().join("\n") + "\n";

    let parser = CalreaCalibratedParser;
    let parsed = parser
        .parse(&header_only)
        .expect("header-only calibrated file should parse");
    assert_eq!(parsed.table.height(), 0);
}

#[test]
fn ibutton_sanitizes_malformed_rows() {
    let content = fixture("ibutton_sample.csv");
    let parsed = parse_log_file(&content).expect("ibutton parse failed");

    assert_eq!(parsed.instrument, Instrument::IButton);
    assert_eq!(parsed.format, "IBUTTON_EXPORT");
    assert_eq!(
        parsed.table.get_column_names_str(),
        vec![TIMESTAMP_COLUMN, IBUTTON_TEMPERATURE_COLUMN]
    );

    // 9 data rows: missing time, slashed date, unpadded time, and an
    // impossible month all drop; a non-numeric value does not.
    assert_eq!(parsed.table.height(), 5);
    assert_eq!(parsed.skipped_rows.len(), 4);

    let reasons: Vec<&str> = parsed
        .skipped_rows
        .iter()
        .map(|row| row.reason.as_str())
        .collect();
    assert!(reasons[0].contains("missing date or time"));
    assert!(reasons[1].contains("not YYYY-MM-DD"));
    assert!(reasons[2].contains("not HH:MM:SS"));
    assert!(reasons[3].contains("valid calendar"));

    let values = parsed
        .table
        .column(IBUTTON_TEMPERATURE_COLUMN)
        .unwrap()
        .f64()
        .unwrap();
    assert_eq!(values.get(0), Some(32.0));
    assert_eq!(values.get(4), None);
}

#[test]
fn ibutton_missing_value_column_is_fatal() {
    let content = fixture("ibutton_sample.csv");
    let mutated = content.replacen("Date,Time,Value", "Date,Time,Reading", 1);

    let parser = IButtonParser;
    let err = parser
        .parse(&mutated)
        .expect_err("parser should reject a renamed value column");
    match err {
        ParserError::MissingColumn { column, .. } => assert_eq!(column, "Value"),
        other => panic!("expected MissingColumn error, got {other:?}"),
    }
}

#[test]
fn parse_unknown_format_returns_no_matching_parser() {
    let content = "a,b\n".repeat(40);

    match parse_log_file(&content) {
        Err(ParserError::NoMatchingParser { attempts }) => {
            assert_eq!(attempts.len(), 3);
        }
        other => panic!("expected NoMatchingParser error, got {other:?}"),
    }
}
