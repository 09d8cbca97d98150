//! Repeated episodes and the aggregate report.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SimulationConfig;
use crate::episode::{Episode, EpisodeError, EpisodeStats};

/// Errors from running an experiment or persisting its report.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// An episode could not be built.
    #[error(transparent)]
    Episode(#[from] EpisodeError),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Aggregate statistics over a batch of episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Policy that drove every episode.
    pub policy: String,
    /// Number of episodes aggregated.
    pub episode_count: u32,
    /// How many episodes ended in death.
    pub deaths: u32,
    /// Mean simulated survival time in seconds.
    pub mean_survival_seconds: f64,
    /// Mean health at the end of an episode.
    pub mean_terminal_health: f64,
    /// Mean hunger at the end of an episode.
    pub mean_terminal_hunger: f64,
    /// Mean sleep at the end of an episode.
    pub mean_terminal_sleep: f64,
    /// Mean number of action changes per episode.
    pub mean_action_changes: f64,
    /// Per-episode records.
    pub episodes: Vec<EpisodeStats>,
}

impl ExperimentReport {
    /// Aggregate finished episodes. An empty batch yields zero means.
    pub fn aggregate(policy: &str, episodes: Vec<EpisodeStats>) -> Self {
        let count = u32::try_from(episodes.len()).unwrap_or(u32::MAX);
        let mean = |value: fn(&EpisodeStats) -> f64| -> f64 {
            if count == 0 {
                return 0.0;
            }
            episodes.iter().map(value).sum::<f64>() / f64::from(count)
        };

        Self {
            generated_at: Utc::now(),
            policy: policy.to_owned(),
            episode_count: count,
            deaths: u32::try_from(episodes.iter().filter(|e| e.died).count()).unwrap_or(u32::MAX),
            mean_survival_seconds: mean(|e| f64::from(e.survival_seconds)),
            mean_terminal_health: mean(|e| f64::from(e.terminal_health)),
            mean_terminal_hunger: mean(|e| f64::from(e.terminal_hunger)),
            mean_terminal_sleep: mean(|e| f64::from(e.terminal_sleep)),
            mean_action_changes: mean(|e| f64::from(e.action_changes)),
            episodes,
        }
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), ExperimentError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run `simulation.episodes` episodes and aggregate them.
pub fn run_experiment(config: &SimulationConfig) -> Result<ExperimentReport, ExperimentError> {
    let dt = config.effective_dt();
    let mut episodes = Vec::new();

    for index in 0..config.simulation.episodes {
        let episode = Episode::new(config, index)?;
        episodes.push(episode.run(dt));
    }

    let report = ExperimentReport::aggregate(&config.simulation.policy.to_string(), episodes);
    info!(
        policy = %report.policy,
        episodes = report.episode_count,
        deaths = report.deaths,
        mean_survival_seconds = report.mean_survival_seconds,
        mean_action_changes = report.mean_action_changes,
        "experiment finished"
    );
    Ok(report)
}
