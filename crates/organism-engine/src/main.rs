//! Headless runner for the organism survival simulation.
//!
//! Loads configuration, runs the configured number of episodes with the
//! selected decision policy, and writes the aggregate report as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `organism-config.yaml` (or the path given
//!    as the first argument), applying environment overrides
//! 2. Initialize structured logging (tracing)
//! 3. Run every episode
//! 4. Write the report to `output.results_path`

mod error;

use std::path::{Path, PathBuf};

use organism_core::{SimulationConfig, run_experiment};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "organism-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an episode cannot
/// be built, or the report cannot be written.
fn main() -> Result<(), EngineError> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    // 1. Load configuration.
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config)?;
    info!(
        path = %config_path.display(),
        from_file,
        episodes = config.simulation.episodes,
        policy = %config.simulation.policy,
        tick_seconds = config.simulation.tick_seconds,
        time_scale = config.simulation.time_scale,
        seed = config.simulation.seed,
        "Configuration loaded"
    );

    // 3. Run episodes.
    let report = run_experiment(&config)?;

    // 4. Persist the report.
    report.write_to(&config.output.results_path)?;
    info!(
        path = %config.output.results_path.display(),
        episodes = report.episode_count,
        mean_survival_seconds = report.mean_survival_seconds,
        "Report written"
    );

    Ok(())
}

/// Load configuration from `path`.
///
/// A missing file yields the defaults; environment overrides and
/// validation apply either way. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        return Ok((SimulationConfig::from_file(path)?, true));
    }

    let mut config = SimulationConfig::default();
    config.apply_env_overrides()?;
    config.validate()?;
    Ok((config, false))
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &SimulationConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", config.logging.level),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}
