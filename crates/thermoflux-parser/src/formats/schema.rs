//! Canonical column names shared by the parsers and the pipelines.

/// Raw Calrea export, as written by the instrument.
pub const CALREA_TIME_COLUMN: &str = "time [UTC-OFS=-0500]";
pub const CALREA_TEMP_COLUMN: &str = "temp_a0 [mC]";
pub const CALREA_FLUX_COLUMN: &str = "hf_a0 [counts]";

/// Columns appended by the calibration step.
pub const SKIN_TEMPERATURE_COLUMN: &str = "skin_temperature_C";
pub const HEAT_FLUX_COLUMN: &str = "heat_flux_W_m2";

/// iButton export columns.
pub const IBUTTON_DATE_COLUMN: &str = "Date";
pub const IBUTTON_TIME_COLUMN: &str = "Time";
pub const IBUTTON_VALUE_COLUMN: &str = "Value";

/// Typed stats-view columns produced by the parsers.
pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const IBUTTON_TEMPERATURE_COLUMN: &str = "temperature_c";

/// Preamble lengths, in raw lines before the column header row.
pub const CALREA_PREAMBLE_LINES: usize = 14;
pub const IBUTTON_PREAMBLE_LINES: usize = 24;
