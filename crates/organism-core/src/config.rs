//! Configuration loading and typed config structures for the organism
//! simulation.
//!
//! The canonical configuration lives in `organism-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates the
//! file. Every key has a default, so an empty file is a valid
//! configuration.

use std::path::{Path, PathBuf};

use organism_agents::{AgentError, CombatConfig, StatusConfig};
use organism_world::{WorldConfig, WorldError};
use serde::{Deserialize, Serialize};

use crate::mpc::MpcConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<AgentError> for ConfigError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidConfig { field, reason } => Self::Invalid {
                field: field.to_owned(),
                reason,
            },
        }
    }
}

impl From<WorldError> for ConfigError {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::InvalidConfig { field, reason } => Self::Invalid {
                field: format!("world.{field}"),
                reason,
            },
            WorldError::EnemyCombat { source } => Self::from(source),
        }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `organism-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Episode count, timing, seed, and policy choice.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Passive decay and recovery rates.
    #[serde(default)]
    pub status: StatusConfig,

    /// Agent body and behavior thresholds.
    #[serde(default)]
    pub agent: AgentConfig,

    /// The agent's own attack.
    #[serde(default)]
    pub combat: CombatConfig,

    /// Planner tuning, used when `simulation.policy` is `mpc`.
    #[serde(default)]
    pub mpc: MpcConfig,

    /// Map, food, enemies, and vision.
    #[serde(default)]
    pub world: WorldConfig,

    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ORGANISM_RESULTS_PATH` overrides `output.results_path`
    /// - `ORGANISM_POLICY` overrides `simulation.policy` (`fsm` or `mpc`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `ORGANISM_POLICY` names an
    /// unknown policy.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("ORGANISM_RESULTS_PATH") {
            self.output.results_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("ORGANISM_POLICY") {
            self.simulation.policy = val.parse()?;
        }
        Ok(())
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        positive("simulation.tick_seconds", sim.tick_seconds)?;
        positive("simulation.time_scale", sim.time_scale)?;
        positive("simulation.max_episode_seconds", sim.max_episode_seconds)?;
        if sim.episodes == 0 {
            return Err(invalid("simulation.episodes", "must be at least 1"));
        }

        self.status.validate()?;
        self.combat.validate()?;

        positive("agent.eating_distance", self.agent.eating_distance)?;
        positive("agent.move_speed", self.agent.move_speed)?;
        positive("agent.sleepy_move_speed", self.agent.sleepy_move_speed)?;
        if !(0.0..=organism_agents::MAX_STATUS).contains(&self.agent.dangerous_hunger) {
            return Err(invalid("agent.dangerous_hunger", "must lie in [0, 100]"));
        }

        if self.mpc.horizon == 0 {
            return Err(invalid("mpc.horizon", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mpc.gamma) {
            return Err(invalid("mpc.gamma", "must lie in [0, 1]"));
        }
        for (field, weight) in [
            ("mpc.w_hunger", self.mpc.w_hunger),
            ("mpc.w_sleep", self.mpc.w_sleep),
            ("mpc.w_health", self.mpc.w_health),
            ("mpc.w_enemy", self.mpc.w_enemy),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(field, "must be a finite non-negative number"));
            }
        }

        self.world.validate()?;
        Ok(())
    }

    /// Elapsed simulated seconds per tick (`tick_seconds * time_scale`).
    pub fn effective_dt(&self) -> f32 {
        self.simulation.tick_seconds * self.simulation.time_scale
    }
}

/// Which decision policy drives the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Rule-table policy.
    #[default]
    Fsm,
    /// Rollout planner.
    Mpc,
}

impl std::str::FromStr for PolicyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fsm" => Ok(Self::Fsm),
            "mpc" => Ok(Self::Mpc),
            other => Err(invalid(
                "simulation.policy",
                &format!("unknown policy {other:?}, expected fsm or mpc"),
            )),
        }
    }
}

impl core::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fsm => f.write_str("fsm"),
            Self::Mpc => f.write_str("mpc"),
        }
    }
}

/// Episode count, timing, and policy choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Episodes per run.
    #[serde(default = "default_episodes")]
    pub episodes: u32,

    /// Simulated seconds per tick before time scaling.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f32,

    /// Multiplier applied to every tick.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// Hard cap on one episode's simulated length.
    #[serde(default = "default_max_episode_seconds")]
    pub max_episode_seconds: f32,

    /// Base random seed; episode `n` uses `seed + n`.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Decision policy.
    #[serde(default)]
    pub policy: PolicyKind,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            episodes: default_episodes(),
            tick_seconds: default_tick_seconds(),
            time_scale: default_time_scale(),
            max_episode_seconds: default_max_episode_seconds(),
            seed: default_seed(),
            policy: PolicyKind::Fsm,
        }
    }
}

/// Agent body and behavior thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Distance at which the agent can eat.
    #[serde(default = "default_eating_distance")]
    pub eating_distance: f32,

    /// Hunger at or below which the agent stops sleeping and keeps eating.
    #[serde(default = "default_dangerous_hunger")]
    pub dangerous_hunger: f32,

    /// Units per second when rested.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,

    /// Units per second when out of sleep.
    #[serde(default = "default_sleepy_move_speed")]
    pub sleepy_move_speed: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            eating_distance: default_eating_distance(),
            dangerous_hunger: default_dangerous_hunger(),
            move_speed: default_move_speed(),
            sleepy_move_speed: default_sleepy_move_speed(),
        }
    }
}

/// Where results are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON file the experiment report is written to.
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be a finite positive number, got {value}")))
    }
}

const fn default_episodes() -> u32 {
    10
}

const fn default_tick_seconds() -> f32 {
    0.1
}

const fn default_time_scale() -> f32 {
    1.0
}

const fn default_max_episode_seconds() -> f32 {
    3_600.0
}

const fn default_seed() -> u64 {
    42
}

const fn default_eating_distance() -> f32 {
    0.75
}

const fn default_dangerous_hunger() -> f32 {
    60.0
}

const fn default_move_speed() -> f32 {
    4.0
}

const fn default_sleepy_move_speed() -> f32 {
    2.0
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results/report.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}
