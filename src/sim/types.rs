//! Core simulation types: configuration and the run result record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A set of identical chargepoints sharing one rated power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargepointGroup {
    /// Number of chargepoints in the group.
    pub count: usize,
    /// Rated power of each chargepoint (kW).
    pub power_kw: f64,
}

impl ChargepointGroup {
    pub fn new(count: usize, power_kw: f64) -> Self {
        Self { count, power_kw }
    }

    /// Combined rated power of the group (kW).
    pub fn total_power_kw(&self) -> f64 {
        self.count as f64 * self.power_kw
    }
}

/// Engine configuration for one simulation run.
///
/// # Examples
///
/// ```
/// use ev_concurrency_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::default();
/// assert_eq!(cfg.chargepoint_count(), 20);
/// assert_eq!(cfg.max_theoretical_power_kw(), 220.0);
/// assert_eq!(cfg.total_intervals(), 35_041);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Chargepoint groups, built in order.
    pub chargepoints: Vec<ChargepointGroup>,
    /// Vehicle energy consumption (kWh per 100 km).
    pub consumption_kwh_per_100km: f64,
    /// Simulated horizon in days.
    pub days: u32,
    /// Length of one interval in minutes.
    pub interval_minutes: u32,
    /// Scales every hourly arrival probability.
    pub arrival_multiplier: f64,
}

impl SimConfig {
    /// Creates a configuration with a single group of identical chargepoints.
    pub fn new(
        chargepoint_count: usize,
        rated_power_kw: f64,
        consumption_kwh_per_100km: f64,
        days: u32,
        interval_minutes: u32,
        arrival_multiplier: f64,
    ) -> Self {
        Self {
            chargepoints: vec![ChargepointGroup::new(chargepoint_count, rated_power_kw)],
            consumption_kwh_per_100km,
            days,
            interval_minutes,
            arrival_multiplier,
        }
    }

    /// Creates a configuration from several chargepoint groups.
    pub fn with_groups(
        chargepoints: Vec<ChargepointGroup>,
        consumption_kwh_per_100km: f64,
        days: u32,
        interval_minutes: u32,
        arrival_multiplier: f64,
    ) -> Self {
        Self {
            chargepoints,
            consumption_kwh_per_100km,
            days,
            interval_minutes,
            arrival_multiplier,
        }
    }

    /// Total number of chargepoints across all groups.
    pub fn chargepoint_count(&self) -> usize {
        self.chargepoints.iter().map(|g| g.count).sum()
    }

    /// Power draw if every chargepoint charged at once (kW).
    pub fn max_theoretical_power_kw(&self) -> f64 {
        self.chargepoints
            .iter()
            .map(ChargepointGroup::total_power_kw)
            .sum()
    }

    /// Length of one interval in hours.
    pub fn interval_hours(&self) -> f64 {
        f64::from(self.interval_minutes) / 60.0
    }

    /// Number of intervals the run will simulate.
    pub fn total_intervals(&self) -> u64 {
        super::clock::IntervalClock::total_intervals(self.days, self.interval_minutes)
    }

    /// Checks the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` describing the first violation.
    pub fn validate(&self) -> SimResult<()> {
        if self.chargepoint_count() == 0 {
            return Err(SimError::InvalidArgument(
                "at least one chargepoint is required".to_string(),
            ));
        }
        if let Some(g) = self
            .chargepoints
            .iter()
            .find(|g| !(g.power_kw.is_finite() && g.power_kw > 0.0))
        {
            return Err(SimError::InvalidArgument(format!(
                "chargepoint power must be > 0 kW, got {}",
                g.power_kw
            )));
        }
        if !(self.consumption_kwh_per_100km.is_finite() && self.consumption_kwh_per_100km >= 0.0)
        {
            return Err(SimError::InvalidArgument(format!(
                "consumption must be >= 0 kWh/100km, got {}",
                self.consumption_kwh_per_100km
            )));
        }
        if self.days == 0 {
            return Err(SimError::InvalidArgument("days must be > 0".to_string()));
        }
        if self.interval_minutes == 0 {
            return Err(SimError::InvalidArgument(
                "interval_minutes must be > 0".to_string(),
            ));
        }
        if !(self.arrival_multiplier.is_finite() && self.arrival_multiplier >= 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "arrival_multiplier must be >= 0, got {}",
                self.arrival_multiplier
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(20, 11.0, 18.0, 365, 15, 1.0)
    }
}

/// Outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Energy delivered to vehicles over the whole run (kWh).
    pub total_energy_kwh: f64,
    /// Highest aggregate power draw observed in any interval (kW).
    pub max_power_kw: f64,
    /// Sum of the rated power of every chargepoint (kW).
    pub max_theoretical_power_kw: f64,
    /// `max_power_kw / max_theoretical_power_kw`.
    pub concurrency_factor: f64,
    /// Interval length the history was sampled at (minutes).
    pub interval_minutes: u32,
    /// Aggregate power draw per interval (kW).
    pub power_history: Vec<f64>,
}

impl SimulationResult {
    /// Mean aggregate power over the run (kW).
    pub fn mean_power_kw(&self) -> f64 {
        if self.power_history.is_empty() {
            return 0.0;
        }
        self.power_history.iter().sum::<f64>() / self.power_history.len() as f64
    }

    /// Share of intervals with at least one chargepoint charging.
    pub fn utilization_share(&self) -> f64 {
        if self.power_history.is_empty() {
            return 0.0;
        }
        let busy = self.power_history.iter().filter(|&&p| p > 0.0).count();
        busy as f64 / self.power_history.len() as f64
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Total energy delivered: {:.0} kWh", self.total_energy_kwh)?;
        writeln!(f, "Maximum power draw:     {:.0} kW", self.max_power_kw)?;
        writeln!(
            f,
            "Max theoretical power:  {:.0} kW",
            self.max_theoretical_power_kw
        )?;
        writeln!(f, "Mean power draw:        {:.1} kW", self.mean_power_kw())?;
        writeln!(
            f,
            "Busy intervals:         {:.1}%",
            self.utilization_share() * 100.0
        )?;
        write!(f, "Concurrency factor:     {:.2}", self.concurrency_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.chargepoint_count(), 20);
        assert_eq!(cfg.chargepoints[0].power_kw, 11.0);
        assert_eq!(cfg.consumption_kwh_per_100km, 18.0);
        assert_eq!(cfg.days, 365);
        assert_eq!(cfg.interval_minutes, 15);
        assert_eq!(cfg.arrival_multiplier, 1.0);
        assert_eq!(cfg.interval_hours(), 0.25);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn mixed_groups_sum_theoretical_power() {
        let cfg = SimConfig::with_groups(
            vec![ChargepointGroup::new(4, 11.0), ChargepointGroup::new(2, 50.0)],
            18.0,
            1,
            15,
            1.0,
        );
        assert_eq!(cfg.chargepoint_count(), 6);
        assert_eq!(cfg.max_theoretical_power_kw(), 144.0);
    }

    #[test]
    fn validation_rejects_degenerate_configs() {
        let bad = [
            SimConfig::new(0, 11.0, 18.0, 1, 15, 1.0),
            SimConfig::new(2, 0.0, 18.0, 1, 15, 1.0),
            SimConfig::new(2, 11.0, -1.0, 1, 15, 1.0),
            SimConfig::new(2, 11.0, 18.0, 0, 15, 1.0),
            SimConfig::new(2, 11.0, 18.0, 1, 0, 1.0),
            SimConfig::new(2, 11.0, 18.0, 1, 15, -0.5),
            SimConfig::new(2, 11.0, 18.0, 1, 15, f64::NAN),
        ];
        for cfg in &bad {
            assert!(
                matches!(cfg.validate(), Err(SimError::InvalidArgument(_))),
                "{cfg:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_group_alongside_real_group_is_valid() {
        let cfg = SimConfig::with_groups(
            vec![ChargepointGroup::new(0, 22.0), ChargepointGroup::new(3, 11.0)],
            18.0,
            1,
            15,
            1.0,
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn result_display_does_not_panic() {
        let r = SimulationResult {
            total_energy_kwh: 1234.5,
            max_power_kw: 55.0,
            max_theoretical_power_kw: 220.0,
            concurrency_factor: 0.25,
            interval_minutes: 15,
            power_history: vec![0.0, 11.0, 55.0],
        };
        let s = format!("{r}");
        assert!(s.contains("0.25"));
        assert!(s.contains("Mean power draw:        22.0 kW"));
        assert!(s.contains("Busy intervals:         66.7%"));
    }

    #[test]
    fn utilization_and_mean_power() {
        let r = SimulationResult {
            total_energy_kwh: 0.0,
            max_power_kw: 22.0,
            max_theoretical_power_kw: 22.0,
            concurrency_factor: 1.0,
            interval_minutes: 15,
            power_history: vec![0.0, 11.0, 22.0, 11.0],
        };
        assert_eq!(r.mean_power_kw(), 11.0);
        assert_eq!(r.utilization_share(), 0.75);
    }
}
