//! Charging-site devices: chargepoints and the vehicles they serve.

/// Charging stall model.
pub mod chargepoint;
pub mod types;
/// Vehicle energy-need state machine.
pub mod vehicle;

pub use chargepoint::Chargepoint;
pub use types::Device;
pub use vehicle::Vehicle;
