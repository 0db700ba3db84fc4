//! Batch drivers layered on the engine: repeated runs and fleet-size sweeps.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use log::info;
use serde::Serialize;

use crate::error::SimResult;
use crate::sim::engine::Simulator;
use crate::sim::types::{ChargepointGroup, SimConfig};

/// Number of runs that produced a given (rounded) concurrency factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcurrencyBucket {
    /// Concurrency factor rounded to two decimals.
    pub concurrency_factor: f64,
    pub count: usize,
}

/// Outcome of [`average_runs`].
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub runs: usize,
    /// Mean of the unrounded concurrency factors.
    pub mean_concurrency_factor: f64,
    /// Highest concurrency factor seen in any run.
    pub max_concurrency_factor: f64,
    /// Buckets sorted by concurrency factor.
    pub buckets: Vec<ConcurrencyBucket>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// One row of [`sweep_chargepoints`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub chargepoints: usize,
    pub concurrency_factor: f64,
    pub max_power_kw: f64,
    pub max_theoretical_power_kw: f64,
}

/// Seed of the `run`-th run derived from `base_seed`.
pub fn derive_seed(base_seed: u64, run: usize) -> u64 {
    base_seed.wrapping_add(run as u64)
}

/// Runs `runs` independent simulations and tallies their concurrency factors.
///
/// Each run gets its own simulator and its own seed, so no random state is
/// shared between runs.
///
/// # Errors
///
/// Propagates the first `SimError` raised by any run.
pub fn average_runs(config: &SimConfig, runs: usize, base_seed: u64) -> SimResult<BatchSummary> {
    let start = Instant::now();
    let mut factors = Vec::with_capacity(runs);

    for run in 0..runs {
        let mut sim = Simulator::seeded(config.clone(), derive_seed(base_seed, run))?;
        factors.push(sim.run()?.concurrency_factor);
    }

    let mut tally: BTreeMap<u64, usize> = BTreeMap::new();
    for cf in &factors {
        *tally.entry((cf * 100.0).round() as u64).or_insert(0) += 1;
    }
    let buckets = tally
        .into_iter()
        .map(|(key, count)| ConcurrencyBucket {
            concurrency_factor: key as f64 / 100.0,
            count,
        })
        .collect();

    let mean = if factors.is_empty() {
        0.0
    } else {
        factors.iter().sum::<f64>() / factors.len() as f64
    };
    let summary = BatchSummary {
        runs,
        mean_concurrency_factor: mean,
        max_concurrency_factor: factors.iter().copied().fold(0.0, f64::max),
        buckets,
        elapsed: start.elapsed(),
    };
    info!(
        "{runs} runs finished in {:?}, mean concurrency {:.3}",
        summary.elapsed, summary.mean_concurrency_factor
    );
    Ok(summary)
}

/// Runs one simulation per fleet size from 1 to `max_chargepoints`.
///
/// Every size uses a single group at the rated power of the first
/// non-empty configured group and the same `seed`.
///
/// # Errors
///
/// Propagates the first `SimError` raised by any run.
pub fn sweep_chargepoints(
    config: &SimConfig,
    max_chargepoints: usize,
    seed: u64,
) -> SimResult<Vec<SweepRow>> {
    let power_kw = config
        .chargepoints
        .iter()
        .find(|g| g.count > 0)
        .map_or(0.0, |g| g.power_kw);
    let mut rows = Vec::with_capacity(max_chargepoints);

    for count in 1..=max_chargepoints {
        let sized = SimConfig {
            chargepoints: vec![ChargepointGroup::new(count, power_kw)],
            ..config.clone()
        };
        let result = Simulator::seeded(sized, seed)?.run()?;
        info!(
            "sweep: {count} chargepoints, concurrency {:.2}",
            result.concurrency_factor
        );
        rows.push(SweepRow {
            chargepoints: count,
            concurrency_factor: result.concurrency_factor,
            max_power_kw: result.max_power_kw,
            max_theoretical_power_kw: result.max_theoretical_power_kw,
        });
    }

    Ok(rows)
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Batch of {} runs ---", self.runs)?;
        for b in &self.buckets {
            writeln!(
                f,
                "Concurrency factor: {:.2}, Count: {}",
                b.concurrency_factor, b.count
            )?;
        }
        writeln!(f, "Mean concurrency factor: {:.3}", self.mean_concurrency_factor)?;
        write!(f, "Time taken: {:.2?}", self.elapsed)
    }
}
