//! Integration tests covering presets, analysis and batch drivers end to end.

mod common;

use ev_concurrency_sim::config::ScenarioConfig;
use ev_concurrency_sim::io::export::{RunSummary, write_csv, write_summary_json};
use ev_concurrency_sim::runner::{average_runs, sweep_chargepoints};
use ev_concurrency_sim::sim::daily::DailyAggregate;
use ev_concurrency_sim::sim::histogram::{DEFAULT_BINS, PowerHistogram};

/// Shortens a preset so the suite stays fast.
fn short(mut cfg: ScenarioConfig) -> ScenarioConfig {
    cfg.simulation.days = 14;
    cfg
}

#[test]
fn every_preset_runs_within_bounds() {
    for name in ScenarioConfig::PRESETS {
        let scenario = short(ScenarioConfig::from_preset(name).expect("preset"));
        let config = scenario.sim_config();
        let result = common::run_seeded(config.clone(), scenario.simulation.seed);
        assert_eq!(
            result.max_theoretical_power_kw,
            config.max_theoretical_power_kw(),
            "{name}"
        );
        assert!(result.max_power_kw <= result.max_theoretical_power_kw, "{name}");
        assert!((0.0..=1.0).contains(&result.concurrency_factor), "{name}");
    }
}

#[test]
fn mixed_site_history_uses_group_powers() {
    let scenario = short(ScenarioConfig::fleet_depot());
    let result = common::run_seeded(scenario.sim_config(), 3);
    // Every reading is a sum of 11 kW and 50 kW chargepoints.
    for &p in &result.power_history {
        let feasible = (0..=4).any(|dc| {
            let rest = p - 50.0 * dc as f64;
            rest >= 0.0 && (rest / 11.0 - (rest / 11.0).round()).abs() < 1e-9
        });
        assert!(feasible, "power {p} is not reachable");
    }
}

#[test]
fn daily_aggregate_covers_whole_history() {
    let result = common::run_seeded(common::one_week_config(), 21);
    let daily = DailyAggregate::from_result(&result).expect("aggregate");

    // 7 full days plus the boundary interval.
    assert_eq!(daily.daily_energy_kwh.len(), 8);
    assert_eq!(daily.interval_data_points.len(), 96);

    let recorded: f64 = result.power_history.iter().map(|p| p * 0.25).sum();
    let aggregated: f64 = daily.daily_energy_kwh.iter().sum();
    assert!((recorded - aggregated).abs() < 1e-6);
    assert!(daily.daily_stats.min <= daily.daily_stats.avg);
    assert!(daily.daily_stats.avg <= daily.daily_stats.max);
}

#[test]
fn histogram_counts_every_interval() {
    let result = common::run_seeded(common::one_week_config(), 4);
    let hist = PowerHistogram::from_result(&result, DEFAULT_BINS).expect("histogram");
    assert_eq!(hist.total_count(), result.power_history.len());
    assert_eq!(
        hist.bins.last().map(|b| b.max_power_kw),
        Some(result.max_theoretical_power_kw)
    );
}

#[test]
fn exports_are_deterministic() {
    let a = common::run_seeded(common::one_day_config(4), 9);
    let b = common::run_seeded(common::one_day_config(4), 9);

    let mut csv_a = Vec::new();
    let mut csv_b = Vec::new();
    write_csv(&a, &mut csv_a).expect("csv");
    write_csv(&b, &mut csv_b).expect("csv");
    assert_eq!(csv_a, csv_b);
    assert_eq!(String::from_utf8_lossy(&csv_a).lines().count(), 98);

    let mut json = Vec::new();
    write_summary_json(&RunSummary::new(&a, 9), &mut json).expect("json");
    let value: serde_json::Value = serde_json::from_slice(&json).expect("valid json");
    assert_eq!(value["intervals"], 97);
}

#[test]
fn batch_average_is_bounded() {
    let config = common::one_day_config(5);
    let summary = average_runs(&config, 10, common::SEED).expect("batch");
    assert_eq!(summary.buckets.iter().map(|b| b.count).sum::<usize>(), 10);
    assert!((0.0..=1.0).contains(&summary.mean_concurrency_factor));
    assert!(summary.max_concurrency_factor >= summary.mean_concurrency_factor);
}

#[test]
fn sweep_theoretical_power_grows_linearly() {
    let rows = sweep_chargepoints(&common::one_day_config(1), 6, common::SEED).expect("sweep");
    let powers: Vec<f64> = rows.iter().map(|r| r.max_theoretical_power_kw).collect();
    assert_eq!(powers, vec![11.0, 22.0, 33.0, 44.0, 55.0, 66.0]);
}
