//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::histogram::DEFAULT_BINS;
use crate::sim::types::{ChargepointGroup, SimConfig};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation timing, demand and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Chargepoint groups installed at the site.
    #[serde(default = "default_chargepoints")]
    pub chargepoints: Vec<ChargepointGroup>,
    /// Post-run analysis and batch settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_chargepoints() -> Vec<ChargepointGroup> {
    vec![ChargepointGroup::new(20, 11.0)]
}

/// Simulation timing, demand and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days to simulate (must be > 0).
    pub days: u32,
    /// Interval length in minutes (must be > 0).
    pub interval_minutes: u32,
    /// Vehicle consumption in kWh per 100 km.
    pub consumption_kwh_per_100km: f64,
    /// Multiplier applied to every hourly arrival probability.
    pub arrival_multiplier: f64,
    /// Master random seed.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: 365,
            interval_minutes: 15,
            consumption_kwh_per_100km: 18.0,
            arrival_multiplier: 1.0,
            seed: 42,
        }
    }
}

/// Post-run analysis and batch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Number of power histogram bins.
    pub histogram_bins: usize,
    /// Number of runs for batch averaging (0 disables it).
    pub runs: usize,
    /// Largest chargepoint count for the sweep (0 disables it).
    pub sweep_max_chargepoints: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_BINS,
            runs: 0,
            sweep_max_chargepoints: 0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: 20 × 11 kW for one year.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            chargepoints: default_chargepoints(),
            analysis: AnalysisConfig::default(),
        }
    }

    /// Returns the urban-peak preset: fewer, faster chargepoints with busy arrivals.
    pub fn urban_peak() -> Self {
        Self {
            simulation: SimulationConfig {
                arrival_multiplier: 2.0,
                consumption_kwh_per_100km: 20.0,
                ..SimulationConfig::default()
            },
            chargepoints: vec![ChargepointGroup::new(10, 22.0)],
            analysis: AnalysisConfig::default(),
        }
    }

    /// Returns the fleet-depot preset: mixed AC and DC chargepoints.
    pub fn fleet_depot() -> Self {
        Self {
            simulation: SimulationConfig {
                arrival_multiplier: 1.5,
                consumption_kwh_per_100km: 22.0,
                ..SimulationConfig::default()
            },
            chargepoints: vec![
                ChargepointGroup::new(16, 11.0),
                ChargepointGroup::new(4, 50.0),
            ],
            analysis: AnalysisConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "urban_peak", "fleet_depot"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "urban_peak" => Ok(Self::urban_peak()),
            "fleet_depot" => Ok(Self::fleet_depot()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Builds the engine configuration for this scenario.
    pub fn sim_config(&self) -> SimConfig {
        let s = &self.simulation;
        SimConfig::with_groups(
            self.chargepoints.clone(),
            s.consumption_kwh_per_100km,
            s.days,
            s.interval_minutes,
            s.arrival_multiplier,
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if s.interval_minutes == 0 {
            errors.push(ConfigError::new("simulation.interval_minutes", "must be > 0"));
        } else if (24 * 60) % s.interval_minutes != 0 {
            errors.push(ConfigError::new(
                "simulation.interval_minutes",
                "must divide a day (1440 min) evenly",
            ));
        }
        if !(s.consumption_kwh_per_100km.is_finite() && s.consumption_kwh_per_100km >= 0.0) {
            errors.push(ConfigError::new(
                "simulation.consumption_kwh_per_100km",
                "must be >= 0",
            ));
        }
        if !(s.arrival_multiplier.is_finite() && s.arrival_multiplier >= 0.0) {
            errors.push(ConfigError::new("simulation.arrival_multiplier", "must be >= 0"));
        }

        if self.chargepoints.iter().map(|g| g.count).sum::<usize>() == 0 {
            errors.push(ConfigError::new(
                "chargepoints",
                "at least one chargepoint is required",
            ));
        }
        for (i, g) in self.chargepoints.iter().enumerate() {
            if !(g.power_kw.is_finite() && g.power_kw > 0.0) {
                errors.push(ConfigError::new(
                    format!("chargepoints[{i}].power_kw"),
                    "must be > 0",
                ));
            }
        }

        if self.analysis.histogram_bins == 0 {
            errors.push(ConfigError::new("analysis.histogram_bins", "must be > 0"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_maps_to_default_sim_config() {
        assert_eq!(ScenarioConfig::baseline().sim_config(), SimConfig::default());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
days = 30
interval_minutes = 30
consumption_kwh_per_100km = 20.0
arrival_multiplier = 1.5
seed = 99

[[chargepoints]]
count = 6
power_kw = 11.0

[[chargepoints]]
count = 2
power_kw = 50.0

[analysis]
histogram_bins = 10
runs = 25
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(30));
        assert_eq!(cfg.as_ref().map(|c| c.chargepoints.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.analysis.runs), Some(25));
        assert_eq!(
            cfg.as_ref().map(|c| c.sim_config().max_theoretical_power_kw()),
            Some(166.0)
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
days = 1
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_chargepoint_field_rejected() {
        let toml = r#"
[[chargepoints]]
count = 1
power_kw = 11.0
phases = 3
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn validation_catches_uneven_interval() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.interval_minutes = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.interval_minutes"));
    }

    #[test]
    fn validation_catches_empty_site() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.chargepoints = vec![ChargepointGroup::new(0, 11.0)];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "chargepoints"));
    }

    #[test]
    fn validation_catches_bad_group_power() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.chargepoints.push(ChargepointGroup::new(2, -3.0));
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "chargepoints[1].power_kw"));
    }

    #[test]
    fn validation_reports_every_violation() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.days = 0;
        cfg.simulation.arrival_multiplier = -1.0;
        cfg.analysis.histogram_bins = 0;
        assert_eq!(cfg.validate().len(), 3);
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn fleet_depot_mixes_power_levels() {
        let cfg = ScenarioConfig::fleet_depot().sim_config();
        assert_eq!(cfg.chargepoint_count(), 20);
        assert_eq!(cfg.max_theoretical_power_kw(), 376.0);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // seed overridden
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        // horizon kept default
        assert_eq!(cfg.as_ref().map(|c| c.simulation.days), Some(365));
        // site kept default
        assert_eq!(
            cfg.as_ref().map(|c| c.sim_config().chargepoint_count()),
            Some(20)
        );
    }
}
