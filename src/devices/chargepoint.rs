use super::types::Device;
use super::vehicle::Vehicle;

/// A single charging stall with a fixed rated power.
///
/// Holds at most one [`Vehicle`]. Occupancy is changed only by the
/// simulator, which attaches arrivals and detaches finished vehicles.
#[derive(Debug, Clone)]
pub struct Chargepoint {
    /// Rated charging power in kilowatts.
    pub rated_power_kw: f64,

    vehicle: Option<Vehicle>,
}

impl Chargepoint {
    /// Creates an empty chargepoint.
    pub fn new(rated_power_kw: f64) -> Self {
        Self {
            rated_power_kw,
            vehicle: None,
        }
    }

    /// Whether a vehicle is plugged in and still needs energy.
    pub fn is_charging(&self) -> bool {
        self.vehicle.as_ref().is_some_and(Vehicle::is_charging)
    }

    /// Whether any vehicle occupies the stall.
    pub fn is_occupied(&self) -> bool {
        self.vehicle.is_some()
    }

    pub(crate) fn vehicle_mut(&mut self) -> Option<&mut Vehicle> {
        self.vehicle.as_mut()
    }

    pub(crate) fn attach(&mut self, vehicle: Vehicle) {
        debug_assert!(self.vehicle.is_none(), "chargepoint already occupied");
        self.vehicle = Some(vehicle);
    }

    pub(crate) fn detach(&mut self) -> Option<Vehicle> {
        self.vehicle.take()
    }
}

impl Device for Chargepoint {
    /// Full rated power while charging, zero otherwise.
    fn power_kw(&self) -> f64 {
        if self.is_charging() {
            self.rated_power_kw
        } else {
            0.0
        }
    }
}
