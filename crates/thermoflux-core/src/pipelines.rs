use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use thermoflux_parser::formats::schema::{
    HEAT_FLUX_COLUMN, IBUTTON_TEMPERATURE_COLUMN, SKIN_TEMPERATURE_COLUMN,
};
use thermoflux_parser::formats::{CalreaCalibratedParser, CalreaRawParser, IButtonParser};
use thermoflux_parser::{LogParser, ParsedLogData};

use crate::calibration::CalreaCalibration;
use crate::error::Result;
use crate::window::{windowed_mean, windowed_slope, Anchor, TimeWindow, UpperBound};

/// What the Calrea conversion step wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub rows_written: usize,
    pub output_path: PathBuf,
}

/// Windowed averages for a Calrea query. Both fields are `None` when
/// the window holds no usable data; never a partial sentinel.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalreaAverages {
    pub average_skin_temperature_c: Option<f64>,
    pub average_heat_flux_w_m2: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IButtonAverages {
    pub average_temperature_c: Option<f64>,
}

/// Calibrated channel a Calrea gradient query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalreaChannel {
    SkinTemperature,
    HeatFlux,
}

impl CalreaChannel {
    pub fn column_name(&self) -> &'static str {
        match self {
            CalreaChannel::SkinTemperature => SKIN_TEMPERATURE_COLUMN,
            CalreaChannel::HeatFlux => HEAT_FLUX_COLUMN,
        }
    }
}

/// Batch pipeline for the Calrea heat-flux/temperature sensor.
///
/// Anchored on the calibrated CSV: `convert_raw` produces it from an
/// instrument export, and every query reopens it from disk (no
/// in-memory cache between calls).
pub struct CalreaPipeline {
    calibrated_path: PathBuf,
    calibration: CalreaCalibration,
}

impl CalreaPipeline {
    /// Calrea windows exclude the anchor timestamp itself.
    const UPPER_BOUND: UpperBound = UpperBound::Exclusive;

    pub fn new(calibrated_path: impl Into<PathBuf>, calibration: CalreaCalibration) -> Self {
        Self {
            calibrated_path: calibrated_path.into(),
            calibration,
        }
    }

    /// Parse a raw instrument export, append the calibrated channels,
    /// and write the calibrated CSV. Full overwrite, not transactional:
    /// a crash mid-write leaves a partial file.
    pub fn convert_raw(&self, raw_path: &Path) -> Result<ConversionSummary> {
        let content = fs::read_to_string(raw_path)?;
        let parsed = CalreaRawParser.parse(&content)?;
        let mut calibrated = self.calibration.apply(&parsed.table)?;

        let mut file = fs::File::create(&self.calibrated_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut calibrated)?;

        info!(
            rows = calibrated.height(),
            path = %self.calibrated_path.display(),
            "wrote calibrated Calrea output"
        );
        Ok(ConversionSummary {
            rows_written: calibrated.height(),
            output_path: self.calibrated_path.clone(),
        })
    }

    pub fn extract(
        &self,
        anchor: impl Into<Anchor>,
        interval_minutes: i64,
    ) -> Result<CalreaAverages> {
        let anchor = anchor.into().resolve()?;
        let window = TimeWindow::ending_at(anchor, interval_minutes, Self::UPPER_BOUND);
        let parsed = self.load_calibrated()?;

        Ok(CalreaAverages {
            average_skin_temperature_c: windowed_mean(
                &parsed.table,
                SKIN_TEMPERATURE_COLUMN,
                &window,
            )?,
            average_heat_flux_w_m2: windowed_mean(&parsed.table, HEAT_FLUX_COLUMN, &window)?,
        })
    }

    pub fn gradient(
        &self,
        anchor: impl Into<Anchor>,
        interval_minutes: i64,
        channel: CalreaChannel,
    ) -> Result<f64> {
        let anchor = anchor.into().resolve()?;
        let window = TimeWindow::ending_at(anchor, interval_minutes, Self::UPPER_BOUND);
        let parsed = self.load_calibrated()?;
        windowed_slope(&parsed.table, channel.column_name(), &window)
    }

    fn load_calibrated(&self) -> Result<ParsedLogData> {
        let content = fs::read_to_string(&self.calibrated_path)?;
        let parsed = CalreaCalibratedParser.parse(&content)?;
        if !parsed.skipped_rows.is_empty() {
            debug!(
                skipped = parsed.skipped_rows.len(),
                path = %self.calibrated_path.display(),
                "dropped rows with malformed timestamps"
            );
        }
        Ok(parsed)
    }
}

/// Batch pipeline for the standalone iButton temperature logger.
///
/// Queries read the raw export directly; there is no conversion step.
pub struct IButtonPipeline {
    path: PathBuf,
}

impl IButtonPipeline {
    /// iButton windows include a reading taken exactly at the anchor.
    const UPPER_BOUND: UpperBound = UpperBound::Inclusive;

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn extract(
        &self,
        anchor: impl Into<Anchor>,
        interval_minutes: i64,
    ) -> Result<IButtonAverages> {
        let anchor = anchor.into().resolve()?;
        let window = TimeWindow::ending_at(anchor, interval_minutes, Self::UPPER_BOUND);
        let parsed = self.load()?;

        Ok(IButtonAverages {
            average_temperature_c: windowed_mean(
                &parsed.table,
                IBUTTON_TEMPERATURE_COLUMN,
                &window,
            )?,
        })
    }

    pub fn gradient(&self, anchor: impl Into<Anchor>, interval_minutes: i64) -> Result<f64> {
        let anchor = anchor.into().resolve()?;
        let window = TimeWindow::ending_at(anchor, interval_minutes, Self::UPPER_BOUND);
        let parsed = self.load()?;
        windowed_slope(&parsed.table, IBUTTON_TEMPERATURE_COLUMN, &window)
    }

    fn load(&self) -> Result<ParsedLogData> {
        let content = fs::read_to_string(&self.path)?;
        let parsed = IButtonParser.parse(&content)?;
        if !parsed.skipped_rows.is_empty() {
            debug!(
                skipped = parsed.skipped_rows.len(),
                path = %self.path.display(),
                "dropped malformed logger rows"
            );
        }
        Ok(parsed)
    }
}
