//! Monte Carlo simulator for the power demand of a bank of EV chargepoints.
//!
//! The engine in [`sim::engine`] steps every chargepoint through fixed
//! intervals, sampling independent vehicle arrivals and charging demand,
//! and reports the concurrency factor: observed peak power over the peak
//! if every chargepoint drew its rated power at once.

pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod runner;
/// Simulation engine, clock, sampling and post-run analysis.
pub mod sim;

pub use error::{SimError, SimResult};
pub use sim::engine::Simulator;
pub use sim::types::{ChargepointGroup, SimConfig, SimulationResult};
