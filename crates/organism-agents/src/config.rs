//! Configuration and defaults for vital mechanics and combat.
//!
//! Every rate is expressed per simulated second and is multiplied by the
//! elapsed tick time by the caller, so the same configuration works for
//! fixed and variable tick lengths and under time scaling.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Configuration for the agent's passive decay and recovery.
///
/// The engine builds this from the `status` section of
/// `organism-config.yaml`. The predictive planner reads the same values so
/// its rollouts use the real rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Hunger lost per second (default: 1.0).
    pub hunger_decay: f32,

    /// Sleep lost per second (default: 0.5).
    pub sleep_decay: f32,

    /// Health lost per second while hunger is at 0 (default: 2.0).
    pub starvation_damage: f32,

    /// Health regained per second while well fed and not exhausted (default: 1.0).
    pub health_recovery: f32,

    /// Hunger at or above which health recovers (default: 50.0).
    pub min_hunger_for_recovery: f32,

    /// Net sleep gained per second while sleeping (default: 4.0).
    ///
    /// Sleeping adds `(sleep_recovery + sleep_decay) * dt` on top of the
    /// passive decay, so the observed gain is exactly this rate.
    pub sleep_recovery: f32,

    /// Net hunger regained per second while eating (default: 20.0).
    pub hunger_per_food: f32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            hunger_decay: 1.0,
            sleep_decay: 0.5,
            starvation_damage: 2.0,
            health_recovery: 1.0,
            min_hunger_for_recovery: 50.0,
            sleep_recovery: 4.0,
            hunger_per_food: 20.0,
        }
    }
}

impl StatusConfig {
    /// Check that every rate is finite and non-negative.
    pub fn validate(&self) -> Result<(), AgentError> {
        let fields = [
            ("hunger_decay", self.hunger_decay),
            ("sleep_decay", self.sleep_decay),
            ("starvation_damage", self.starvation_damage),
            ("health_recovery", self.health_recovery),
            ("min_hunger_for_recovery", self.min_hunger_for_recovery),
            ("sleep_recovery", self.sleep_recovery),
            ("hunger_per_food", self.hunger_per_food),
        ];
        for (field, value) in fields {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

/// Configuration for a [`CombatResolver`](crate::CombatResolver).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fixed damage applied per successful hit (default: 5.0).
    pub damage: f32,

    /// Seconds between successful hits (default: 1.0).
    pub cooldown: f32,

    /// Maximum distance at which a hit lands (default: 1.0).
    pub range: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            damage: 5.0,
            cooldown: 1.0,
            range: 1.0,
        }
    }
}

impl CombatConfig {
    /// Check that damage, cooldown, and range are finite and non-negative.
    pub fn validate(&self) -> Result<(), AgentError> {
        non_negative("damage", self.damage)?;
        non_negative("cooldown", self.cooldown)?;
        non_negative("range", self.range)
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), AgentError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AgentError::InvalidConfig {
            field,
            reason: format!("must be a finite non-negative number, got {value}"),
        })
    }
}
