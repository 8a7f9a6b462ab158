pub mod convert;
pub mod inspect;
pub mod query;

use std::path::Path;

use anyhow::{Context, Result};
use thermoflux_core::CalibrationConfig;

/// Load calibration constants, falling back to the reference-device
/// defaults when no file is given.
pub fn load_calibration(path: Option<&Path>) -> Result<CalibrationConfig> {
    match path {
        Some(path) => CalibrationConfig::from_path(path)
            .with_context(|| format!("failed to load calibration file {}", path.display())),
        None => Ok(CalibrationConfig::default()),
    }
}
