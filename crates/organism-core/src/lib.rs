//! Action state machine, decision policies, and episode driver for the
//! organism simulation.
//!
//! This crate owns the decision and control layer. Each tick the
//! [`ActionStateMachine`] asks its [`DecisionPolicy`] for the next action,
//! runs exit-cleanup and entry-setup when the action changes, and executes
//! one tick of the current action's behavior against the [`World`].
//!
//! # Modules
//!
//! - [`anomaly`] -- Recoverable conditions logged by the machine.
//! - [`config`] -- Configuration loading from `organism-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`DecisionPolicy`] trait, [`WorldFacts`], and the
//!   shared chase-interrupt rule.
//! - [`episode`] -- Fixed-order tick driver for one agent lifetime.
//! - [`experiment`] -- Repeated episodes and the aggregate report.
//! - [`fsm`] -- Rule-table policy ([`FsmPolicy`]).
//! - [`machine`] -- The [`ActionStateMachine`] and its [`Lifecycle`] hook.
//! - [`mpc`] -- Short-horizon rollout planner ([`MpcPolicy`]).
//! - [`perception`] -- What the agent remembers about the world.
//!
//! [`World`]: organism_world::World
//! [`ActionStateMachine`]: machine::ActionStateMachine
//! [`DecisionPolicy`]: decision::DecisionPolicy
//! [`WorldFacts`]: decision::WorldFacts
//! [`FsmPolicy`]: fsm::FsmPolicy
//! [`Lifecycle`]: machine::Lifecycle
//! [`MpcPolicy`]: mpc::MpcPolicy

pub mod anomaly;
pub mod config;
pub mod decision;
pub mod episode;
pub mod experiment;
pub mod fsm;
pub mod machine;
pub mod mpc;
pub mod perception;

pub use anomaly::Anomaly;
pub use config::{
    AgentConfig, ConfigError, LoggingConfig, OutputConfig, PolicyKind, SimulationConfig,
    SimulationSection,
};
pub use decision::{
    ChaseRequest, DecisionContext, DecisionPolicy, EnemyFact, FoodFact, WorldFacts,
    default_chase_rule,
};
pub use episode::{Episode, EpisodeError, EpisodeStats, LifeSignal, policy_for};
pub use experiment::{ExperimentError, ExperimentReport, run_experiment};
pub use fsm::FsmPolicy;
pub use machine::{ActionStateMachine, Lifecycle, MachineConfig, NoopLifecycle};
pub use mpc::{MpcConfig, MpcPolicy};
pub use perception::{LockedTarget, PerceivedWorld};
