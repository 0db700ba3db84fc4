//! CSV and JSON export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::sim::daily::DailyAggregate;
use crate::sim::histogram::PowerHistogram;
use crate::sim::types::SimulationResult;

/// Column header for the power-history CSV export.
pub const HEADER: &str = "interval,time_hr,hour_of_day,power_kw,concurrency";

/// Summary document written by [`export_summary_json`].
///
/// Carries the headline figures of a run without its full power history.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub seed: u64,
    pub total_energy_kwh: f64,
    pub max_power_kw: f64,
    pub max_theoretical_power_kw: f64,
    pub concurrency_factor: f64,
    pub mean_power_kw: f64,
    /// Share of intervals with any charging, in `[0, 1]`.
    pub utilization_share: f64,
    pub intervals: usize,
    pub interval_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<&'a DailyAggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<&'a PowerHistogram>,
}

impl<'a> RunSummary<'a> {
    pub fn new(result: &SimulationResult, seed: u64) -> Self {
        Self {
            seed,
            total_energy_kwh: result.total_energy_kwh,
            max_power_kw: result.max_power_kw,
            max_theoretical_power_kw: result.max_theoretical_power_kw,
            concurrency_factor: result.concurrency_factor,
            mean_power_kw: result.mean_power_kw(),
            utilization_share: result.utilization_share(),
            intervals: result.power_history.len(),
            interval_minutes: result.interval_minutes,
            daily: None,
            histogram: None,
        }
    }

    pub fn with_daily(mut self, daily: &'a DailyAggregate) -> Self {
        self.daily = Some(daily);
        self
    }

    pub fn with_histogram(mut self, histogram: &'a PowerHistogram) -> Self {
        self.histogram = Some(histogram);
        self
    }
}

/// Exports the power history of a run to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &SimulationResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes the power history of a run as CSV to any writer.
///
/// One row per interval; `concurrency` is the interval's power over the
/// theoretical peak.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &SimulationResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(','))?;

    let interval_hours = f64::from(result.interval_minutes) / 60.0;
    for (i, &power_kw) in result.power_history.iter().enumerate() {
        let time_hr = i as f64 * interval_hours;
        let concurrency = if result.max_theoretical_power_kw > 0.0 {
            power_kw / result.max_theoretical_power_kw
        } else {
            0.0
        };
        wtr.write_record(&[
            i.to_string(),
            format!("{time_hr:.2}"),
            ((time_hr as u64) % 24).to_string(),
            format!("{power_kw:.4}"),
            format!("{concurrency:.4}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes a JSON summary of a run to the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization or writing fails.
pub fn export_summary_json(summary: &RunSummary<'_>, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut buf = io::BufWriter::new(file);
    write_summary_json(summary, &mut buf)?;
    buf.flush()
}

/// Serializes a run summary as pretty JSON to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_summary_json(summary: &RunSummary<'_>, writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(writer, summary).map_err(io::Error::other)
}
