//! Simulation binary for the flood adaptation model.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `floodadapt-config.yaml` (or the path given
//!    as the first argument)
//! 2. Initialize structured logging (tracing) to stderr
//! 3. Spawn households, social network and government
//! 4. Run the simulation for `world.max_ticks` ticks
//! 5. Log the result and print the JSON report to stdout

mod error;
mod report;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use floodadapt_core::config::{LoggingConfig, SimulationConfig};
use floodadapt_core::{runner, spawn};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::ReportCallback;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "floodadapt-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, spawning, the run, or writing the
/// report fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    init_tracing(&config.logging);
    info!("floodadapt-engine starting");
    if !from_file {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        households = config.world.household_count,
        max_ticks = config.world.max_ticks,
        activation = ?config.world.activation,
        network = ?config.network,
        "Configuration loaded"
    );

    let mut state = spawn::spawn(&config).map_err(EngineError::from)?;

    let mut callback = ReportCallback::new();
    let result = runner::run_simulation(&mut state, config.world.max_ticks, &mut callback)
        .map_err(EngineError::from)?;
    runner::log_simulation_end(&result);

    let report = callback.into_report(config.world.seed, &result, &state);
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").map_err(EngineError::from)?;

    info!(total_ticks = result.total_ticks, "floodadapt-engine shutdown complete");
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the simulation configuration, falling back to defaults when the
/// file does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        Ok((SimulationConfig::from_file(path)?, true))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok((config, false))
    }
}
