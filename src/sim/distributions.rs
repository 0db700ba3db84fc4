//! Stochastic inputs of the simulation: hourly arrival probabilities and
//! the charging-demand distribution.

use std::sync::LazyLock;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::error::{SimError, SimResult};

/// Hourly arrival bands as `(first hour, end hour exclusive, probability)`.
///
/// Each probability is the chance that a vehicle arrives at one
/// chargepoint within a one-hour window.
pub const ARRIVAL_BANDS: [(u32, u32, f64); 7] = [
    (0, 8, 0.0094),
    (8, 10, 0.0283),
    (10, 13, 0.0566),
    (13, 16, 0.0755),
    (16, 19, 0.1038),
    (19, 22, 0.0472),
    (22, 24, 0.0094),
];

/// Candidate distances driven since the last charge, in km.
pub const DISTANCES_KM: [u32; 9] = [0, 5, 10, 20, 30, 50, 100, 200, 300];

/// Relative weight of each entry in [`DISTANCES_KM`].
pub const DISTANCE_WEIGHTS: [f64; 9] = [
    0.3431, 0.049, 0.098, 0.1176, 0.0882, 0.1176, 0.1078, 0.049, 0.0294,
];

static STANDARD_DISTANCES: LazyLock<DistanceDistribution> =
    LazyLock::new(DistanceDistribution::default);

/// Probability of an arrival within a one-hour window starting at `hour`.
///
/// # Errors
///
/// Returns `SimError::InvalidArgument` if `hour` is not in `0..24`.
pub fn arrival_probability(hour: u32) -> SimResult<f64> {
    ARRIVAL_BANDS
        .iter()
        .find(|(start, end, _)| (*start..*end).contains(&hour))
        .map(|&(_, _, p)| p)
        .ok_or_else(|| SimError::InvalidArgument(format!("invalid hour: {hour}")))
}

/// Arrival probability for one chargepoint over one interval.
///
/// Scales the hourly probability linearly by interval length and the
/// arrival multiplier. The result is not clamped and may exceed 1.
///
/// # Errors
///
/// Returns `SimError::InvalidArgument` if `hour` is not in `0..24`.
pub fn interval_arrival_probability(
    hour: u32,
    interval_minutes: u32,
    arrival_multiplier: f64,
) -> SimResult<f64> {
    Ok(arrival_probability(hour)? * (f64::from(interval_minutes) / 60.0) * arrival_multiplier)
}

/// Bernoulli trial: does a vehicle arrive at one chargepoint in this interval?
///
/// Intervals that straddle an hour boundary use the probability of the
/// hour they start in.
///
/// # Errors
///
/// Returns `SimError::InvalidArgument` if `hour` is not in `0..24`.
pub fn sample_arrival<R: Rng + ?Sized>(
    hour: u32,
    interval_minutes: u32,
    arrival_multiplier: f64,
    rng: &mut R,
) -> SimResult<bool> {
    let p = interval_arrival_probability(hour, interval_minutes, arrival_multiplier)?;
    Ok(rng.random::<f64>() < p)
}

/// Draws a distance from the built-in distribution.
pub fn sample_charging_distance_km<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    STANDARD_DISTANCES.sample_km(rng)
}

/// Draws a charging demand from the built-in distance distribution.
///
/// Returns `0.0` when the sampled distance is zero, meaning the vehicle has
/// no real charging need.
pub fn sample_charging_energy_kwh<R: Rng + ?Sized>(
    consumption_kwh_per_100km: f64,
    rng: &mut R,
) -> f64 {
    STANDARD_DISTANCES.sample_energy_kwh(consumption_kwh_per_100km, rng)
}

/// Converts a driven distance into the energy needed to recharge it.
pub fn distance_to_energy_kwh(distance_km: u32, consumption_kwh_per_100km: f64) -> f64 {
    f64::from(distance_km) / 100.0 * consumption_kwh_per_100km
}

/// Discrete distribution over distances driven since the last charge.
///
/// Weights are relative; sampling normalizes them, so tables that sum to
/// slightly more or less than one are accepted.
///
/// # Examples
///
/// ```
/// use ev_concurrency_sim::sim::distributions::DistanceDistribution;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let dist = DistanceDistribution::new(&[0, 100], &[1.0, 3.0]).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let km = dist.sample_km(&mut rng);
/// assert!(km == 0 || km == 100);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceDistribution {
    distances_km: Vec<u32>,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl DistanceDistribution {
    /// Builds a distribution from parallel distance and weight tables.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if the tables are empty, differ
    /// in length, or the weights are negative, non-finite or all zero.
    pub fn new(distances_km: &[u32], weights: &[f64]) -> SimResult<Self> {
        if distances_km.is_empty() {
            return Err(SimError::InvalidArgument(
                "distance table must not be empty".to_string(),
            ));
        }
        if distances_km.len() != weights.len() {
            return Err(SimError::InvalidArgument(format!(
                "{} distances but {} weights",
                distances_km.len(),
                weights.len()
            )));
        }
        let index = WeightedIndex::new(weights)
            .map_err(|e| SimError::InvalidArgument(format!("distance weights: {e}")))?;

        Ok(Self {
            distances_km: distances_km.to_vec(),
            weights: weights.to_vec(),
            index,
        })
    }

    /// A distribution that always yields `distance_km`.
    pub fn constant(distance_km: u32) -> Self {
        Self {
            distances_km: vec![distance_km],
            weights: vec![1.0],
            index: WeightedIndex::new([1.0]).unwrap_or_else(|_| unreachable!()),
        }
    }

    pub fn distances_km(&self) -> &[u32] {
        &self.distances_km
    }

    /// Weights normalized to sum to one.
    pub fn probabilities(&self) -> Vec<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weights.iter().map(|w| w / total).collect()
    }

    /// Expected distance in km.
    pub fn mean_km(&self) -> f64 {
        self.probabilities()
            .iter()
            .zip(&self.distances_km)
            .map(|(p, &km)| p * f64::from(km))
            .sum()
    }

    /// Draws one distance.
    pub fn sample_km<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.distances_km[self.index.sample(rng)]
    }

    /// Draws one distance and converts it into an energy demand.
    pub fn sample_energy_kwh<R: Rng + ?Sized>(
        &self,
        consumption_kwh_per_100km: f64,
        rng: &mut R,
    ) -> f64 {
        distance_to_energy_kwh(self.sample_km(rng), consumption_kwh_per_100km)
    }
}

impl Default for DistanceDistribution {
    fn default() -> Self {
        Self::new(&DISTANCES_KM, &DISTANCE_WEIGHTS)
            .unwrap_or_else(|e| unreachable!("built-in distance table rejected: {e}"))
    }
}
