//! Vital status and combat mechanics for the organism simulation.
//!
//! This crate contains the logic layer for the agent's own body -- the
//! bounded vital attributes that decay and recover each tick, and the
//! cooldown-gated attack resolver shared by the agent and hostile actors.
//! Nothing here knows about decisions or the world; callers pass elapsed
//! time and positions in explicitly.
//!
//! # Modules
//!
//! - [`combat`] -- Range and cooldown gated damage ([`CombatResolver`])
//! - [`config`] -- Tunable rates ([`StatusConfig`], [`CombatConfig`])
//! - [`error`] -- Error types for agent operations ([`AgentError`])
//! - [`status`] -- Bounded health, hunger, and sleep ([`Status`])

pub mod combat;
pub mod config;
pub mod error;
pub mod status;

// Re-export primary types at crate root for convenience.
pub use combat::{CombatResolver, DamageTarget};
pub use config::{CombatConfig, StatusConfig};
pub use error::AgentError;
pub use status::{MAX_STATUS, Status, Vitality, clamp_status};
