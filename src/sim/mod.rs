/// Interval clock for the simulation horizon.
pub mod clock;
/// Post-hoc daily energy aggregation.
pub mod daily;
/// Arrival and charging-demand sampling.
pub mod distributions;
pub mod engine;
/// Power-draw histogram.
pub mod histogram;
pub mod types;
