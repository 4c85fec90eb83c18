//! Tower Coverage Simulation CLI
//!
//! Simulates the coverage of a tower network over a bounding area.
//!
//! Usage:
//!   simulate-coverage --scenario data/new_york.json \
//!                     --output data/new_york_coverage.json --geojson

use anyhow::Result;
use clap::Parser;
use coverage_cli::{diagnostics, load_scenario, CoverageReport, LogObserver, RunMetadata};
use coverage_engine::{CoverageEngine, EngineConfig, Environment, SimulationParameters};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "coverage_cli=info,coverage_engine=info";
const VERBOSE_LOG_FILTER: &str = "coverage_cli=debug,coverage_engine=debug";

/// Progress events per run at most, roughly
const PROGRESS_STEPS: usize = 20;

#[derive(Parser, Debug)]
#[command(
    name = "simulate-coverage",
    about = "Simulate signal coverage of a tower network over an area"
)]
struct Args {
    /// Path to scenario JSON file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "coverage.json")]
    output: PathBuf,

    /// Also output GeoJSON
    #[arg(long)]
    geojson: bool,

    /// Override the scenario's grid resolution
    #[arg(short = 'r', long)]
    grid_resolution: Option<u32>,

    /// Override the scenario's environment (sets the path-loss exponent)
    #[arg(short, long)]
    environment: Option<Environment>,

    /// Simulate towers in maintenance or inactive status too
    #[arg(long)]
    include_inactive: bool,

    /// Evaluate on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Dedicated worker threads (default: global rayon pool)
    #[arg(long, env = "COVERAGE_THREADS")]
    threads: Option<usize>,

    /// Grid points per work unit
    #[arg(long, env = "COVERAGE_CHUNK_SIZE", default_value_t = 1024)]
    chunk_size: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn engine_config(&self, total_points: usize) -> EngineConfig {
        let base = if self.sequential {
            EngineConfig::sequential()
        } else {
            EngineConfig::default()
        };
        let config = base
            .with_chunk_size(self.chunk_size)
            .with_progress_interval(total_points / PROGRESS_STEPS);
        match self.threads {
            Some(threads) if !self.sequential => config.with_worker_threads(threads),
            _ => config,
        }
    }

    fn apply_overrides(&self, params: &mut SimulationParameters, grid_resolution: &mut u32) {
        if let Some(environment) = self.environment {
            *params = SimulationParameters::for_environment(environment)
                .with_receiver_sensitivity(params.receiver_sensitivity);
        }
        if let Some(resolution) = self.grid_resolution {
            *grid_resolution = resolution;
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("{}", "=".repeat(60));
    info!("Tower Coverage Simulation");
    info!("{}", "=".repeat(60));

    let mut scenario = load_scenario(&args.scenario, args.include_inactive)?;
    args.apply_overrides(&mut scenario.parameters, &mut scenario.grid_resolution);
    diagnostics::log_diagnostics(&scenario);

    let side = scenario.grid_resolution as usize + 1;
    let engine = CoverageEngine::new(args.engine_config(side.saturating_mul(side)));
    let token = engine.cancellation_token();

    info!(
        "Simulating '{}': resolution {}, {} environment, n = {}, sensitivity {} dBm",
        scenario.name,
        scenario.grid_resolution,
        scenario.parameters.environment,
        scenario.parameters.path_loss_exponent,
        scenario.parameters.receiver_sensitivity
    );

    let scenario = Arc::new(scenario);
    let started = Instant::now();
    let mut run = tokio::task::spawn_blocking({
        let scenario = Arc::clone(&scenario);
        move || {
            engine.run(
                &scenario.area,
                &scenario.towers,
                &scenario.parameters,
                scenario.grid_resolution,
                Some(&LogObserver),
            )
        }
    });

    let result = tokio::select! {
        joined = &mut run => joined?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, cancelling simulation");
            token.cancel();
            run.await?
        }
    }?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let report = CoverageReport::new(
        RunMetadata::new(&scenario, &result, elapsed_ms),
        &scenario,
        &result,
    );

    info!("Writing output to {:?}", args.output);
    report.write_json(&args.output)?;

    if args.geojson {
        let geojson_path = args.output.with_extension("geojson");
        info!("Writing GeoJSON to {:?}", geojson_path);
        report.write_geojson(&geojson_path)?;
    }

    let stats = &result.statistics;
    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Grid points:      {}", result.points.len());
    info!("Overall coverage: {:.1}%", stats.overall_coverage);
    info!("Strong coverage:  {:.1}%", stats.strong_coverage);
    info!("Weak coverage:    {:.1}%", stats.weak_coverage);
    info!("No coverage:      {:.1}%", stats.no_coverage);
    match stats.average_signal_strength {
        Some(avg) => info!("Average signal:   {:.1} dBm", avg),
        None => info!("Average signal:   n/a"),
    }
    info!("Coverage area:    {:.2} km²", stats.coverage_area);
    for (network, count) in &scenario.inventory.networks {
        info!("  {}: {} towers", network, count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["simulate-coverage", "--scenario", "s.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.output, PathBuf::from("coverage.json"));
        assert!(!args.geojson);
        assert!(args.environment.is_none());

        let config = args.engine_config(10_201);
        assert!(config.parallel);
        assert_eq!(config.progress_interval, 510);
    }

    #[test]
    fn test_sequential_ignores_threads() {
        let args = parse(&["--sequential", "--threads", "4", "--chunk-size", "64"]);
        let config = args.engine_config(4);
        assert!(!config.parallel);
        assert_eq!(config.worker_threads, None);
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.progress_interval, 1);
    }

    #[test]
    fn test_overrides() {
        let args = parse(&["--environment", "rural", "--grid-resolution", "25"]);
        let mut params = SimulationParameters::default().with_receiver_sensitivity(-110.0);
        let mut resolution = 100;

        args.apply_overrides(&mut params, &mut resolution);
        assert_eq!(resolution, 25);
        assert_eq!(params.environment, Environment::Rural);
        assert_eq!(params.path_loss_exponent, 2.5);
        assert_eq!(params.receiver_sensitivity, -110.0);
    }

    #[test]
    fn test_rejects_unknown_environment() {
        let argv = ["simulate-coverage", "--scenario", "s.json", "--environment", "desert"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
