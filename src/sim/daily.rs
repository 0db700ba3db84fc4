//! Post-hoc daily aggregation of a power history.

use std::fmt;

use serde::Serialize;

use crate::error::{SimError, SimResult};

use super::types::SimulationResult;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Average, maximum and minimum of a set of energy values (kWh).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyStats {
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

impl DailyStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(Self {
            avg: sum / values.len() as f64,
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}

/// Energy delivered in one interval-of-day slot, across all simulated days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalDataPoint {
    /// Position of the interval within the day.
    pub interval: usize,
    /// Start time of the interval as `HH:MM`.
    pub time: String,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
}

/// Daily energy statistics and the average daily load profile of a run.
///
/// Energy per interval is `power * interval_minutes / 60`. The trailing
/// boundary interval of a run starts a final partial day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyAggregate {
    /// Statistics over per-day energy totals.
    pub daily_stats: DailyStats,
    /// Energy delivered per day, in order (kWh).
    pub daily_energy_kwh: Vec<f64>,
    /// Per-slot statistics, one entry per interval of the day.
    pub interval_data_points: Vec<IntervalDataPoint>,
    pub interval_minutes: u32,
}

impl DailyAggregate {
    /// Aggregates the power history of `result` by day and by time of day.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if the history is empty or the
    /// interval length does not divide a day evenly.
    pub fn from_result(result: &SimulationResult) -> SimResult<Self> {
        Self::from_history(&result.power_history, result.interval_minutes)
    }

    /// Aggregates a raw power history sampled every `interval_minutes`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if the history is empty or the
    /// interval length does not divide a day evenly.
    pub fn from_history(power_history: &[f64], interval_minutes: u32) -> SimResult<Self> {
        if interval_minutes == 0 || MINUTES_PER_DAY % interval_minutes != 0 {
            return Err(SimError::InvalidArgument(format!(
                "interval of {interval_minutes} min does not divide a day"
            )));
        }
        if power_history.is_empty() {
            return Err(SimError::InvalidArgument(
                "cannot aggregate an empty power history".to_string(),
            ));
        }

        let per_day = (MINUTES_PER_DAY / interval_minutes) as usize;
        let interval_hours = f64::from(interval_minutes) / 60.0;
        let energies: Vec<f64> = power_history.iter().map(|p| p * interval_hours).collect();

        let daily_energy_kwh: Vec<f64> = energies
            .chunks(per_day)
            .map(|day| day.iter().sum())
            .collect();
        let daily_stats = DailyStats::from_values(&daily_energy_kwh).ok_or_else(|| {
            SimError::InvalidArgument("no complete day to aggregate".to_string())
        })?;

        let mut interval_data_points = Vec::with_capacity(per_day);
        for slot in 0..per_day {
            let values: Vec<f64> = energies.iter().skip(slot).step_by(per_day).copied().collect();
            let Some(stats) = DailyStats::from_values(&values) else {
                continue;
            };
            interval_data_points.push(IntervalDataPoint {
                interval: slot,
                time: time_label(slot, interval_minutes),
                avg: stats.avg,
                max: stats.max,
                min: stats.min,
            });
        }

        Ok(Self {
            daily_stats,
            daily_energy_kwh,
            interval_data_points,
            interval_minutes,
        })
    }

    /// The slot with the highest average energy, if any.
    pub fn busiest_interval(&self) -> Option<&IntervalDataPoint> {
        self.interval_data_points
            .iter()
            .max_by(|a, b| a.avg.total_cmp(&b.avg))
    }
}

fn time_label(slot: usize, interval_minutes: u32) -> String {
    let minutes = slot * interval_minutes as usize;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

impl fmt::Display for DailyAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Daily Energy ---")?;
        writeln!(f, "Days:                {}", self.daily_energy_kwh.len())?;
        writeln!(f, "Average per day:     {:.1} kWh", self.daily_stats.avg)?;
        writeln!(f, "Busiest day:         {:.1} kWh", self.daily_stats.max)?;
        write!(f, "Quietest day:        {:.1} kWh", self.daily_stats.min)?;
        if let Some(peak) = self.busiest_interval() {
            write!(f, "\nBusiest time of day: {} ({:.2} kWh avg)", peak.time, peak.avg)?;
        }
        Ok(())
    }
}
