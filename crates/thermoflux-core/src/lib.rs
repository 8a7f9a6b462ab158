pub mod calibration;
pub mod config;
pub mod error;
pub mod pipelines;
pub mod window;

pub use calibration::CalreaCalibration;
pub use config::CalibrationConfig;
pub use error::{PipelineError, Result};
pub use pipelines::{
    CalreaAverages, CalreaChannel, CalreaPipeline, ConversionSummary, IButtonAverages,
    IButtonPipeline,
};
pub use window::{Anchor, TimeWindow, UpperBound};
