//! Depletable food sources that respawn after a cooldown.
//!
//! A source holds a number of seconds of eating. Each [`Food::eat`] call
//! consumes the elapsed tick time; the first call that finds it empty
//! disables the source and starts its respawn timer.

use organism_types::{FoodId, Vec2};

use crate::config::FoodConfig;

/// A food source placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    id: FoodId,
    position: Vec2,
    /// Seconds of eating left before the source is exhausted.
    remaining: f32,
    capacity: f32,
    respawn_seconds: f32,
    /// Seconds until a disabled source comes back.
    disabled_timer: f32,
    disabled: bool,
}

impl Food {
    /// Create an active, full food source.
    pub fn new(position: Vec2, config: &FoodConfig) -> Self {
        Self {
            id: FoodId::new(),
            position,
            remaining: config.duration_seconds,
            capacity: config.duration_seconds,
            respawn_seconds: config.respawn_seconds,
            disabled_timer: 0.0,
            disabled: false,
        }
    }

    /// Create an active source with an explicit amount left.
    pub fn with_remaining(position: Vec2, remaining: f32, config: &FoodConfig) -> Self {
        Self {
            remaining,
            ..Self::new(position, config)
        }
    }

    /// The source's identifier.
    pub const fn id(&self) -> FoodId {
        self.id
    }

    /// The source's position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Seconds of eating left.
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the source can currently be seen and eaten.
    pub const fn is_active(&self) -> bool {
        !self.disabled
    }

    /// Consume `dt` seconds of food.
    ///
    /// Returns `true` while food remains. When the source is already empty
    /// it is disabled, its respawn timer starts, and `false` is returned.
    pub fn eat(&mut self, dt: f32) -> bool {
        if self.disabled {
            return false;
        }
        if self.remaining <= 0.0 {
            self.disabled = true;
            self.disabled_timer = self.respawn_seconds;
            return false;
        }

        self.remaining -= dt;
        true
    }

    /// Count down the respawn timer. Returns `true` if the source came back this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.disabled {
            return false;
        }

        self.disabled_timer -= dt;
        if self.disabled_timer <= 0.0 {
            self.disabled = false;
            self.disabled_timer = 0.0;
            self.remaining = self.capacity;
            return true;
        }
        false
    }
}
