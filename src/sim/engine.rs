//! Simulation engine that steps a bank of chargepoints through time.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::devices::{Chargepoint, Device, Vehicle};
use crate::error::SimResult;

use super::clock::{IntervalClock, Tick};
use super::distributions::{ARRIVAL_BANDS, DistanceDistribution, sample_arrival};
use super::types::{SimConfig, SimulationResult};

/// Monte Carlo engine owning the chargepoints and their random stream.
///
/// Generic over the random source so callers can replay a fixed stream;
/// [`Simulator::seeded`] covers the common case. Each simulator owns its
/// stream, so independent runs never share state.
#[derive(Debug)]
pub struct Simulator<R: Rng = StdRng> {
    config: SimConfig,
    chargepoints: Vec<Chargepoint>,
    distances: DistanceDistribution,
    rng: R,
    total_energy_kwh: f64,
    power_history: Vec<f64>,
}

impl Simulator<StdRng> {
    /// Creates a simulator driven by a `StdRng` seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if the configuration is invalid.
    pub fn seeded(config: SimConfig, seed: u64) -> SimResult<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulator<R> {
    /// Creates a simulator and builds one chargepoint per configured slot.
    ///
    /// # Arguments
    ///
    /// * `config` - Fleet, demand and timing parameters
    /// * `rng` - Random stream used for every arrival and demand draw
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if the configuration is invalid.
    pub fn new(config: SimConfig, rng: R) -> SimResult<Self> {
        config.validate()?;

        let peak_probability = ARRIVAL_BANDS
            .iter()
            .map(|&(_, _, p)| p)
            .fold(0.0_f64, f64::max)
            * config.interval_hours()
            * config.arrival_multiplier;
        if peak_probability > 1.0 {
            warn!(
                "per-interval arrival probability reaches {peak_probability:.3}; \
                 arrivals become certain in peak hours"
            );
        }

        let chargepoints = config
            .chargepoints
            .iter()
            .flat_map(|g| (0..g.count).map(move |_| Chargepoint::new(g.power_kw)))
            .collect();

        Ok(Self {
            config,
            chargepoints,
            distances: DistanceDistribution::default(),
            rng,
            total_energy_kwh: 0.0,
            power_history: Vec::new(),
        })
    }

    /// Replaces the distance distribution used to sample charging demand.
    pub fn with_distance_distribution(mut self, distances: DistanceDistribution) -> Self {
        debug!(
            "distance distribution replaced, mean {:.1} km",
            distances.mean_km()
        );
        self.distances = distances;
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn chargepoints(&self) -> &[Chargepoint] {
        &self.chargepoints
    }

    /// Energy delivered so far in the current run (kWh).
    pub fn total_energy_kwh(&self) -> f64 {
        self.total_energy_kwh
    }

    /// Power recorded so far in the current run (kW per interval).
    pub fn power_history(&self) -> &[f64] {
        &self.power_history
    }

    /// Executes one interval: charge, then arrivals, then measurement.
    ///
    /// # Returns
    ///
    /// The aggregate power draw recorded for the interval (kW).
    ///
    /// # Errors
    ///
    /// Propagates `SimError` from the charging or sampling contracts.
    pub fn step(&mut self, tick: Tick) -> SimResult<f64> {
        self.total_energy_kwh += self.charge_step()?;
        self.arrival_step(tick.hour)?;

        let power_kw = self.measure_power_kw();
        self.power_history.push(power_kw);
        Ok(power_kw)
    }

    /// Runs the whole horizon and aggregates the result.
    ///
    /// Chargepoints start empty on every call; the random stream carries on
    /// from wherever the previous call left it.
    ///
    /// # Errors
    ///
    /// Propagates `SimError` from the charging or sampling contracts.
    pub fn run(&mut self) -> SimResult<SimulationResult> {
        self.reset();

        let clock = IntervalClock::new(self.config.days, self.config.interval_minutes);
        debug!(
            "simulating {} chargepoints over {} intervals of {} min",
            self.chargepoints.len(),
            clock.total(),
            self.config.interval_minutes
        );
        self.power_history
            .reserve(usize::try_from(clock.total()).unwrap_or(0));

        for tick in clock {
            self.step(tick)?;
        }

        let result = self.aggregate();
        info!(
            "run complete: {:.0} kWh delivered, peak {:.1} of {:.1} kW, concurrency {:.2}",
            result.total_energy_kwh,
            result.max_power_kw,
            result.max_theoretical_power_kw,
            result.concurrency_factor
        );
        Ok(result)
    }

    fn reset(&mut self) {
        for cp in &mut self.chargepoints {
            cp.detach();
        }
        self.total_energy_kwh = 0.0;
        self.power_history.clear();
    }

    /// Charges every occupied chargepoint for one interval.
    ///
    /// Vehicles that finish are detached immediately so the stall can take
    /// a new arrival in the same interval.
    fn charge_step(&mut self) -> SimResult<f64> {
        let interval_hours = self.config.interval_hours();
        let mut delivered_kwh = 0.0;

        for cp in &mut self.chargepoints {
            let offered_kwh = cp.rated_power_kw * interval_hours;
            let Some(vehicle) = cp.vehicle_mut() else {
                continue;
            };

            delivered_kwh += vehicle.charge(offered_kwh)?;
            if !vehicle.is_charging() {
                cp.detach();
            }
        }

        Ok(delivered_kwh)
    }

    /// Samples an independent arrival for every empty chargepoint.
    fn arrival_step(&mut self, hour: u32) -> SimResult<()> {
        let interval_minutes = self.config.interval_minutes;
        let multiplier = self.config.arrival_multiplier;
        let consumption = self.config.consumption_kwh_per_100km;

        for cp in &mut self.chargepoints {
            if cp.is_occupied() {
                continue;
            }
            if !sample_arrival(hour, interval_minutes, multiplier, &mut self.rng)? {
                continue;
            }

            let energy_kwh = self.distances.sample_energy_kwh(consumption, &mut self.rng);
            if energy_kwh > 0.0 {
                cp.attach(Vehicle::new(energy_kwh));
            }
        }

        Ok(())
    }

    fn measure_power_kw(&self) -> f64 {
        self.chargepoints.iter().map(Device::power_kw).sum()
    }

    fn aggregate(&self) -> SimulationResult {
        let max_power_kw = self.power_history.iter().copied().fold(0.0, f64::max);
        let max_theoretical_power_kw: f64 =
            self.chargepoints.iter().map(|cp| cp.rated_power_kw).sum();

        SimulationResult {
            total_energy_kwh: self.total_energy_kwh,
            max_power_kw,
            max_theoretical_power_kw,
            concurrency_factor: max_power_kw / max_theoretical_power_kw,
            interval_minutes: self.config.interval_minutes,
            power_history: self.power_history.clone(),
        }
    }
}
