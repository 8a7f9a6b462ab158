use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::Table;
use serde_json::json;
use thermoflux_core::{CalreaChannel, CalreaPipeline, IButtonPipeline};

use super::load_calibration;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InstrumentArg {
    Calrea,
    Ibutton,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ChannelArg {
    SkinTemperature,
    HeatFlux,
}

impl From<ChannelArg> for CalreaChannel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::SkinTemperature => CalreaChannel::SkinTemperature,
            ChannelArg::HeatFlux => CalreaChannel::HeatFlux,
        }
    }
}

fn render(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value}"),
        None => "no data".to_string(),
    }
}

pub fn handle_extract(
    instrument: InstrumentArg,
    file: &Path,
    at: &str,
    minutes: i64,
    calibration: Option<&Path>,
    as_json: bool,
) -> Result<()> {
    match instrument {
        InstrumentArg::Calrea => {
            let config = load_calibration(calibration)?;
            let pipeline = CalreaPipeline::new(file, config.calrea);
            let averages = pipeline
                .extract(at, minutes)
                .with_context(|| format!("failed to query {}", file.display()))?;

            if as_json {
                println!("{}", serde_json::to_string_pretty(&averages)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec!["channel", "average"]);
                table.add_row(vec![
                    "skin_temperature_C".to_string(),
                    render(averages.average_skin_temperature_c),
                ]);
                table.add_row(vec![
                    "heat_flux_W_m2".to_string(),
                    render(averages.average_heat_flux_w_m2),
                ]);
                println!("{table}");
            }
        }
        InstrumentArg::Ibutton => {
            let pipeline = IButtonPipeline::new(file);
            let averages = pipeline
                .extract(at, minutes)
                .with_context(|| format!("failed to query {}", file.display()))?;

            if as_json {
                println!("{}", serde_json::to_string_pretty(&averages)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec!["channel", "average"]);
                table.add_row(vec![
                    "temperature_c".to_string(),
                    render(averages.average_temperature_c),
                ]);
                println!("{table}");
            }
        }
    }
    Ok(())
}

pub fn handle_gradient(
    instrument: InstrumentArg,
    file: &Path,
    at: &str,
    minutes: i64,
    channel: ChannelArg,
    calibration: Option<&Path>,
    as_json: bool,
) -> Result<()> {
    let (column, slope) = match instrument {
        InstrumentArg::Calrea => {
            let config = load_calibration(calibration)?;
            let pipeline = CalreaPipeline::new(file, config.calrea);
            let channel = CalreaChannel::from(channel);
            let slope = pipeline
                .gradient(at, minutes, channel)
                .with_context(|| format!("failed to fit gradient over {}", file.display()))?;
            (channel.column_name(), slope)
        }
        InstrumentArg::Ibutton => {
            let pipeline = IButtonPipeline::new(file);
            let slope = pipeline
                .gradient(at, minutes)
                .with_context(|| format!("failed to fit gradient over {}", file.display()))?;
            ("temperature_c", slope)
        }
    };

    if as_json {
        let body = json!({ "channel": column, "slope_per_second": slope });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{column}: {slope} units/second");
    }
    Ok(())
}
