//! Food layout and enemy spawn cadence.
//!
//! Food is laid on a jittered grid inside the map, keeping a margin from
//! the walls and leaving the centre cell (the agent's spawn point) empty.
//! Enemies appear on a fixed timer just outside a random map edge.

use organism_types::Vec2;
use rand::Rng;

use crate::bounds::WorldBounds;
use crate::config::{EnemySpawnConfig, FoodConfig};

/// Grid positions for the initial food sources.
///
/// The grid has `per_axis + 1` points along each axis spanning
/// `[-(half_extent - wall_distance), half_extent - wall_distance]`, each
/// offset by up to `jitter` in both axes.
pub fn food_grid(config: &FoodConfig, bounds: &WorldBounds, rng: &mut impl Rng) -> Vec<Vec2> {
    let area = bounds.half_extent - Vec2::splat(config.wall_distance);
    let centre = config.per_axis / 2;
    #[allow(clippy::cast_precision_loss)]
    let cells = config.per_axis as f32;
    let step = area * 2.0 / cells;

    let mut positions = Vec::new();
    for i in 0..=config.per_axis {
        for j in 0..=config.per_axis {
            if i == centre && j == centre {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let cell = Vec2::new(i as f32, j as f32);
            let jitter = Vec2::new(
                rng.random_range(-config.jitter..=config.jitter),
                rng.random_range(-config.jitter..=config.jitter),
            );
            positions.push(-area + step * cell + jitter);
        }
    }
    positions
}

/// Countdown that fires once per spawn interval.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawner {
    config: EnemySpawnConfig,
    timer: f32,
}

impl EnemySpawner {
    /// Create a spawner whose first spawn is one full interval away.
    pub const fn new(config: EnemySpawnConfig) -> Self {
        Self {
            timer: config.interval_seconds,
            config,
        }
    }

    /// Count down by `dt`. Returns `true` when a spawn is due, restarting the timer.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.timer = self.config.interval_seconds;
            return true;
        }
        false
    }

    /// Maximum number of living enemies.
    pub const fn max_alive(&self) -> u32 {
        self.config.max_alive
    }

    /// A spawn point just outside a random edge of `bounds`.
    pub fn spawn_position(&self, bounds: &WorldBounds, rng: &mut impl Rng) -> Vec2 {
        let edge = bounds.half_extent + Vec2::splat(self.config.margin);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        if rng.random_bool(0.5) {
            // Left or right edge.
            let y = rng.random_range(-bounds.half_extent.y..=bounds.half_extent.y);
            Vec2::new(sign * edge.x, y)
        } else {
            // Top or bottom edge.
            let x = rng.random_range(-bounds.half_extent.x..=bounds.half_extent.x);
            Vec2::new(x, sign * edge.y)
        }
    }
}
