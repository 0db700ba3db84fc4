//! Simulator entry point: CLI wiring, scenario loading and reporting.

use std::process;

use ev_concurrency_sim::cli::{CliOptions, parse_args, print_usage};
use ev_concurrency_sim::config::ScenarioConfig;
use ev_concurrency_sim::io::export::{RunSummary, export_csv, export_summary_json};
use ev_concurrency_sim::runner::{average_runs, sweep_chargepoints};
use ev_concurrency_sim::sim::daily::DailyAggregate;
use ev_concurrency_sim::sim::engine::Simulator;
use ev_concurrency_sim::sim::histogram::PowerHistogram;

fn load_scenario(cli: &CliOptions) -> ScenarioConfig {
    // --scenario takes priority, then --preset
    let loaded = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path)
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("baseline"))
    };

    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(seed) = cli.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(runs) = cli.runs {
        scenario.analysis.runs = runs;
    }
    if let Some(n) = cli.sweep {
        scenario.analysis.sweep_max_chargepoints = n;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    scenario
}

fn print_parameters(scenario: &ScenarioConfig) {
    let s = &scenario.simulation;
    let sim = scenario.sim_config();
    println!(
        "Starting simulation with {} chargepoints...",
        sim.chargepoint_count()
    );
    for g in &scenario.chargepoints {
        println!("  Power: {} × {} kW", g.count, g.power_kw);
    }
    println!("  Consumption: {} kWh/100km", s.consumption_kwh_per_100km);
    println!("  Duration: {} days", s.days);
    println!("  Arrival multiplier: {}", s.arrival_multiplier);
    println!("  Interval minutes: {}", s.interval_minutes);
    println!("  Seed: {}", s.seed);
    println!();
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("error: {context}: {err}");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let cli = parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        print_usage();
        process::exit(1);
    });
    if cli.help {
        print_usage();
        return;
    }

    let scenario = load_scenario(&cli);
    let sim_config = scenario.sim_config();
    let seed = scenario.simulation.seed;
    print_parameters(&scenario);

    let result = Simulator::seeded(sim_config.clone(), seed)
        .and_then(|mut sim| sim.run())
        .unwrap_or_else(|e| fail("simulation failed", e));
    println!("{result}");

    let daily = DailyAggregate::from_result(&result).unwrap_or_else(|e| fail("daily aggregation", e));
    println!("\n{daily}");

    let histogram = PowerHistogram::from_result(&result, scenario.analysis.histogram_bins)
        .unwrap_or_else(|e| fail("histogram", e));
    println!("\n--- Power Distribution ---");
    for bin in histogram.bins.iter().filter(|b| b.count > 0) {
        println!(
            "<= {:>7.1} kW: {:>6} intervals ({:>5.1}%)",
            bin.max_power_kw, bin.count, bin.percentage
        );
    }

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&result, path) {
            fail("failed to write CSV", e);
        }
        eprintln!("Telemetry written to {}", path.display());
    }

    if let Some(ref path) = cli.summary_out {
        let summary = RunSummary::new(&result, seed)
            .with_daily(&daily)
            .with_histogram(&histogram);
        if let Err(e) = export_summary_json(&summary, path) {
            fail("failed to write summary", e);
        }
        eprintln!("Summary written to {}", path.display());
    }

    if scenario.analysis.runs > 0 {
        let batch = average_runs(&sim_config, scenario.analysis.runs, seed)
            .unwrap_or_else(|e| fail("batch run failed", e));
        println!("\n{batch}");
    }

    if scenario.analysis.sweep_max_chargepoints > 0 {
        let rows = sweep_chargepoints(&sim_config, scenario.analysis.sweep_max_chargepoints, seed)
            .unwrap_or_else(|e| fail("sweep failed", e));
        println!("\n--- Chargepoint Sweep ---");
        for row in &rows {
            println!(
                "Number of chargepoints: {:>3}, Concurrency factor: {:.2}",
                row.chargepoints, row.concurrency_factor
            );
        }
    }
}
