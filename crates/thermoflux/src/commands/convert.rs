use std::path::Path;

use anyhow::{Context, Result};
use thermoflux_core::CalreaPipeline;
use tracing::info;

use super::load_calibration;

pub fn handle_convert(raw: &Path, out: &Path, calibration: Option<&Path>) -> Result<()> {
    let config = load_calibration(calibration)?;
    let pipeline = CalreaPipeline::new(out, config.calrea);
    let summary = pipeline
        .convert_raw(raw)
        .with_context(|| format!("failed to convert {}", raw.display()))?;
    info!(rows = summary.rows_written, raw = %raw.display(), "conversion finished");

    println!(
        "Wrote {} calibrated rows to {}",
        summary.rows_written,
        summary.output_path.display()
    );
    Ok(())
}
