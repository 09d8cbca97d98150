//! World configuration: bounds, food layout, enemies, and vision.
//!
//! Mirrors the `world` section of `organism-config.yaml`. Every field has
//! a default so partial files are accepted.

use organism_agents::CombatConfig;
use organism_types::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::WorldBounds;
use crate::error::WorldError;

/// Top-level world configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-extent of the rectangular map (default: 100 x 100).
    pub half_extent: Vec2,

    /// Food source layout and lifecycle.
    pub food: FoodConfig,

    /// Hostile actor stats.
    pub enemy: EnemyConfig,

    /// Enemy spawn cadence.
    pub enemy_spawn: EnemySpawnConfig,

    /// Radius within which the agent notices food and enemies (default: 6.0).
    pub vision_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            half_extent: Vec2::new(100.0, 100.0),
            food: FoodConfig::default(),
            enemy: EnemyConfig::default(),
            enemy_spawn: EnemySpawnConfig::default(),
            vision_radius: 6.0,
        }
    }
}

impl WorldConfig {
    /// The configured map bounds.
    pub const fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.half_extent)
    }

    /// Check bounds, vision, food, and enemy settings.
    pub fn validate(&self) -> Result<(), WorldError> {
        positive("half_extent.x", self.half_extent.x)?;
        positive("half_extent.y", self.half_extent.y)?;
        positive("vision_radius", self.vision_radius)?;
        positive("food.duration_seconds", self.food.duration_seconds)?;
        non_negative("food.respawn_seconds", self.food.respawn_seconds)?;
        non_negative("food.wall_distance", self.food.wall_distance)?;
        non_negative("food.jitter", self.food.jitter)?;
        if self.food.per_axis == 0 {
            return Err(WorldError::InvalidConfig {
                field: "food.per_axis",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.food.wall_distance >= self.half_extent.x.min(self.half_extent.y) {
            return Err(WorldError::InvalidConfig {
                field: "food.wall_distance",
                reason: "must be smaller than the map half-extent".to_owned(),
            });
        }
        positive("enemy.max_health", self.enemy.max_health)?;
        non_negative("enemy.move_speed", self.enemy.move_speed)?;
        self.enemy.combat.validate()?;
        positive("enemy_spawn.interval_seconds", self.enemy_spawn.interval_seconds)?;
        non_negative("enemy_spawn.margin", self.enemy_spawn.margin)
    }
}

/// Food source layout and lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Whether food is placed at all (default: true).
    pub enabled: bool,

    /// Grid cells per axis; the grid has `per_axis + 1` points per row (default: 10).
    pub per_axis: u32,

    /// Minimum distance from the map edge for placement (default: 10.0).
    pub wall_distance: f32,

    /// Maximum random offset applied to each grid point (default: 3.0).
    pub jitter: f32,

    /// Seconds of eating before a source is exhausted (default: 10.0).
    pub duration_seconds: f32,

    /// Seconds an exhausted source stays disabled (default: 150.0).
    pub respawn_seconds: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_axis: 10,
            wall_distance: 10.0,
            jitter: 3.0,
            duration_seconds: 10.0,
            respawn_seconds: 150.0,
        }
    }
}

/// Stats for a hostile actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Starting health (default: 20.0).
    pub max_health: f32,

    /// Units per second while chasing (default: 2.0).
    pub move_speed: f32,

    /// Damage, cooldown, and range of the enemy's strikes.
    pub combat: CombatConfig,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 20.0,
            move_speed: 2.0,
            combat: CombatConfig {
                damage: 2.0,
                cooldown: 1.5,
                range: 1.0,
            },
        }
    }
}

/// Enemy spawn cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySpawnConfig {
    /// Whether enemies spawn at all (default: true).
    pub enabled: bool,

    /// Seconds between spawns (default: 5.0).
    pub interval_seconds: f32,

    /// Distance outside the map edge at which enemies appear (default: 5.0).
    pub margin: f32,

    /// Maximum number of living enemies; further spawns are skipped (default: 8).
    pub max_alive: u32,
}

impl Default for EnemySpawnConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 5.0,
            margin: 5.0,
            max_alive: 8,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), WorldError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidConfig {
            field,
            reason: format!("must be a finite positive number, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), WorldError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidConfig {
            field,
            reason: format!("must be a finite non-negative number, got {value}"),
        })
    }
}
