//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use ev_concurrency_sim::sim::distributions::DistanceDistribution;
use ev_concurrency_sim::sim::engine::Simulator;
use ev_concurrency_sim::sim::types::{SimConfig, SimulationResult};

/// Seed used by fixtures that need a reproducible stream.
pub const SEED: u64 = 42;

/// One day, 15-minute intervals, default demand (97 intervals).
pub fn one_day_config(chargepoints: usize) -> SimConfig {
    SimConfig::new(chargepoints, 11.0, 18.0, 1, 15, 1.0)
}

/// One week at the default site size.
pub fn one_week_config() -> SimConfig {
    SimConfig {
        days: 7,
        ..SimConfig::default()
    }
}

/// Runs `config` with a `StdRng` seeded from `seed`.
pub fn run_seeded(config: SimConfig, seed: u64) -> SimulationResult {
    Simulator::seeded(config, seed)
        .and_then(|mut sim| sim.run())
        .expect("valid configuration should run")
}

/// Runs `config` with every vehicle arriving with no charging need.
pub fn run_zero_demand(config: SimConfig, seed: u64) -> SimulationResult {
    Simulator::seeded(config, seed)
        .map(|sim| sim.with_distance_distribution(DistanceDistribution::constant(0)))
        .and_then(|mut sim| sim.run())
        .expect("valid configuration should run")
}
