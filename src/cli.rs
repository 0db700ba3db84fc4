//! Command-line argument parsing for the simulator binary.

use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub runs: Option<usize>,
    pub sweep: Option<usize>,
    pub telemetry_out: Option<PathBuf>,
    pub summary_out: Option<PathBuf>,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first malformed argument.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses an argument list (without the program name).
///
/// # Errors
///
/// Returns a message describing the first malformed argument.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                opts.seed = Some(args.parse_at(i, "--seed", "u64")?);
            }
            "--runs" => {
                i += 1;
                opts.runs = Some(args.parse_at(i, "--runs", "run count")?);
            }
            "--sweep" => {
                i += 1;
                opts.sweep = Some(args.parse_at(i, "--sweep", "chargepoint count")?);
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if opts.telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--summary-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --summary-out (expected a file path)",
                )?;
                if opts.summary_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--summary-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("baseline".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
    fn parse_at<T: std::str::FromStr>(&self, index: usize, flag: &str, kind: &str)
    -> Result<T, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }

    fn parse_at<T: std::str::FromStr>(
        &self,
        index: usize,
        flag: &str,
        kind: &str,
    ) -> Result<T, String> {
        let raw = self.next_or_err(index, &format!("missing value for {flag} (expected a {kind})"))?;
        raw.parse()
            .map_err(|_| format!("{flag} value \"{raw}\" is not a valid {kind}"))
    }
}

pub fn print_usage() {
    eprintln!("ev-concurrency-sim - EV chargepoint concurrency factor simulator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  ev-concurrency-sim [--scenario <path> | --preset <name>] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, urban_peak, fleet_depot)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --runs <n>               Repeat the run n times and tally concurrency factors");
    eprintln!("  --sweep <n>              Sweep chargepoint counts 1..=n");
    eprintln!("  --telemetry-out <path>   Export the power history to CSV");
    eprintln!("  --summary-out <path>     Export a JSON summary");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=debug for engine diagnostics.");
}
