use crate::error::{SimError, SimResult};

/// An electric vehicle plugged into a chargepoint.
///
/// The only state is the energy still needed. A vehicle with no remaining
/// need is finished and gets detached by the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    energy_remaining_kwh: f64,
}

impl Vehicle {
    /// Creates a vehicle that needs `energy_kwh` before it leaves.
    pub fn new(energy_kwh: f64) -> Self {
        Self {
            energy_remaining_kwh: energy_kwh.max(0.0),
        }
    }

    /// Energy still needed, in kWh.
    pub fn energy_remaining_kwh(&self) -> f64 {
        self.energy_remaining_kwh
    }

    /// Delivers up to `energy_offered_kwh` and returns the amount accepted.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidState` if the vehicle is already fully charged.
    pub fn charge(&mut self, energy_offered_kwh: f64) -> SimResult<f64> {
        if !self.is_charging() {
            return Err(SimError::InvalidState(
                "vehicle has no remaining energy need".to_string(),
            ));
        }

        let delivered_kwh = energy_offered_kwh.max(0.0).min(self.energy_remaining_kwh);
        self.energy_remaining_kwh -= delivered_kwh;
        Ok(delivered_kwh)
    }

    /// Whether the vehicle still needs energy.
    pub fn is_charging(&self) -> bool {
        self.energy_remaining_kwh > 0.0
    }
}
