//! Common traits for charging-site devices.

/// A device that draws power from the site connection.
pub trait Device {
    /// Instantaneous power draw in kilowatts (positive = load).
    fn power_kw(&self) -> f64;
}
