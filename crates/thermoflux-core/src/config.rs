use std::path::Path;

use serde::Deserialize;

use crate::calibration::CalreaCalibration;
use crate::error::Result;

/// Calibration constants file, e.g.
///
/// ```toml
/// [calrea]
/// temp_offset_mc = -213.0
/// flux_gain = 1.953125
/// flux_sensitivity = 768.0
/// ```
///
/// Missing sections and fields fall back to the reference-device
/// defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub calrea: CalreaCalibration,
}

impl CalibrationConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: CalibrationConfig = toml::from_str("[calrea]\ntemp_offset_mc = -100.0\n")
            .expect("partial config should deserialize");
        assert_eq!(config.calrea.temp_offset_mc, -100.0);
        assert_eq!(config.calrea.flux_sensitivity, 768.0);
    }

    #[test]
    fn empty_config_is_reference_device() {
        let config: CalibrationConfig = toml::from_str("").unwrap();
        assert_eq!(config.calrea.temp_offset_mc, -213.0);
        assert_eq!(config.calrea.flux_gain, 1.953125);
    }
}
