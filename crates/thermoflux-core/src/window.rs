use chrono::{Duration, NaiveDateTime};
use polars::prelude::*;

use thermoflux_parser::formats::schema::TIMESTAMP_COLUMN;

use crate::error::{PipelineError, Result};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Canonical text form for anchor timestamps.
pub const ANCHOR_FORMAT: &str = "%m/%d/%Y %H:%M";

/// The timestamp a query window ends at: either already structured or
/// caller-supplied text in `MM/DD/YYYY HH:MM` form.
///
/// Text parsing is strict. A malformed anchor halts the operation,
/// unlike per-row file timestamps which are dropped silently.
#[derive(Debug, Clone)]
pub enum Anchor {
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Anchor {
    pub fn resolve(&self) -> Result<NaiveDateTime> {
        match self {
            Anchor::Timestamp(ts) => Ok(*ts),
            Anchor::Text(raw) => NaiveDateTime::parse_from_str(raw.trim(), ANCHOR_FORMAT)
                .map_err(|_| PipelineError::InvalidTimestamp { value: raw.clone() }),
        }
    }
}

impl From<NaiveDateTime> for Anchor {
    fn from(value: NaiveDateTime) -> Self {
        Anchor::Timestamp(value)
    }
}

impl From<&str> for Anchor {
    fn from(value: &str) -> Self {
        Anchor::Text(value.to_string())
    }
}

impl From<String> for Anchor {
    fn from(value: String) -> Self {
        Anchor::Text(value)
    }
}

/// Whether the window's end is part of the window.
///
/// The two instruments historically disagree: Calrea windows are
/// `[start, anchor)`, iButton windows are `[start, anchor]`. Each
/// pipeline declares its policy explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpperBound {
    Exclusive,
    Inclusive,
}

#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    start_micros: i64,
    end_micros: i64,
    upper: UpperBound,
}

impl TimeWindow {
    pub fn ending_at(anchor: NaiveDateTime, interval_minutes: i64, upper: UpperBound) -> Self {
        let start = anchor - Duration::minutes(interval_minutes);
        Self {
            start_micros: start.and_utc().timestamp_micros(),
            end_micros: anchor.and_utc().timestamp_micros(),
            upper,
        }
    }

    pub fn contains(&self, micros: i64) -> bool {
        if micros < self.start_micros {
            return false;
        }
        match self.upper {
            UpperBound::Exclusive => micros < self.end_micros,
            UpperBound::Inclusive => micros <= self.end_micros,
        }
    }
}

/// Arithmetic mean of `value_column` over rows inside the window.
///
/// `Ok(None)` is the "no data" sentinel: no rows in the window, or
/// none of them carry a usable value. Never an error.
pub fn windowed_mean(
    df: &DataFrame,
    value_column: &str,
    window: &TimeWindow,
) -> Result<Option<f64>> {
    let timestamps = df.column(TIMESTAMP_COLUMN)?.datetime()?;
    let values = df.column(value_column)?.f64()?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for idx in 0..df.height() {
        let Some(micros) = timestamps.get(idx) else {
            continue;
        };
        if !window.contains(micros) {
            continue;
        }
        if let Some(value) = values.get(idx) {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        Ok(None)
    } else {
        Ok(Some(sum / count as f64))
    }
}

/// Ordinary-least-squares slope of `value_column` against elapsed
/// seconds from the earliest in-window timestamp.
///
/// Intercept and fit diagnostics are discarded. Fewer than two usable
/// points, or all points at a single timestamp, is a
/// `DegenerateWindow` error rather than a NaN.
pub fn windowed_slope(df: &DataFrame, value_column: &str, window: &TimeWindow) -> Result<f64> {
    let timestamps = df.column(TIMESTAMP_COLUMN)?.datetime()?;
    let values = df.column(value_column)?.f64()?;

    let mut points: Vec<(i64, f64)> = Vec::new();
    for idx in 0..df.height() {
        let (Some(micros), Some(value)) = (timestamps.get(idx), values.get(idx)) else {
            continue;
        };
        if window.contains(micros) {
            points.push((micros, value));
        }
    }

    if points.len() < 2 {
        return Err(PipelineError::DegenerateWindow {
            points: points.len(),
        });
    }

    let origin = points.iter().map(|(micros, _)| *micros).min().unwrap_or(0);
    let xs: Vec<f64> = points
        .iter()
        .map(|(micros, _)| (micros - origin) as f64 / MICROS_PER_SECOND)
        .collect();

    let n = points.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, value)| value).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, (_, y)) in xs.iter().zip(points.iter()) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 {
        return Err(PipelineError::DegenerateWindow {
            points: points.len(),
        });
    }

    Ok(sxy / sxx)
}
