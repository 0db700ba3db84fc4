//! Distribution of interval power draw across equal-width bins.

use serde::Serialize;

use crate::error::{SimError, SimResult};

use super::types::SimulationResult;

/// Bin count used when none is configured.
pub const DEFAULT_BINS: usize = 20;

/// One histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerBin {
    /// Upper edge of the bin (kW).
    pub max_power_kw: f64,
    /// Intervals whose power fell in the bin.
    pub count: usize,
    /// Share of all intervals, in percent.
    pub percentage: f64,
}

/// Histogram of aggregate power draw over `[0, max_theoretical_power_kw]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerHistogram {
    pub bins: Vec<PowerBin>,
}

impl PowerHistogram {
    /// Bins the power history of `result`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if `bins` is zero or the
    /// theoretical peak is not positive.
    pub fn from_result(result: &SimulationResult, bins: usize) -> SimResult<Self> {
        Self::from_history(&result.power_history, result.max_theoretical_power_kw, bins)
    }

    /// Bins a raw power history.
    ///
    /// Values at or above the upper edge land in the last bin.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidArgument` if `bins` is zero or
    /// `max_power_kw` is not positive.
    pub fn from_history(power_history: &[f64], max_power_kw: f64, bins: usize) -> SimResult<Self> {
        if bins == 0 {
            return Err(SimError::InvalidArgument(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if !(max_power_kw.is_finite() && max_power_kw > 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "histogram range must be > 0 kW, got {max_power_kw}"
            )));
        }

        let width = max_power_kw / bins as f64;
        let mut counts = vec![0usize; bins];
        for &p in power_history {
            let idx = ((p / width).floor().max(0.0) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let total = power_history.len();
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| PowerBin {
                max_power_kw: (i + 1) as f64 * width,
                count,
                percentage: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Ok(Self { bins })
    }

    /// Total number of binned intervals.
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_land_in_expected_bins() {
        let history = [0.0, 0.0, 11.0, 22.0, 44.0, 43.9];
        let hist = PowerHistogram::from_history(&history, 44.0, 4).unwrap();
        let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1, 2]);
        assert_eq!(hist.bins[3].max_power_kw, 44.0);
        assert_eq!(hist.total_count(), history.len());
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let history: Vec<f64> = (0..97).map(|i| (i % 5) as f64 * 11.0).collect();
        let hist = PowerHistogram::from_history(&history, 220.0, DEFAULT_BINS).unwrap();
        let sum: f64 = hist.bins.iter().map(|b| b.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(hist.bins.len(), DEFAULT_BINS);
    }

    #[test]
    fn rejects_zero_bins_and_zero_range() {
        assert!(PowerHistogram::from_history(&[1.0], 10.0, 0).is_err());
        assert!(PowerHistogram::from_history(&[1.0], 0.0, 5).is_err());
    }

    #[test]
    fn empty_history_has_zero_percentages() {
        let hist = PowerHistogram::from_history(&[], 11.0, 2).unwrap();
        assert!(hist.bins.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }
}
