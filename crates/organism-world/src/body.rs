//! Movement collaborator.
//!
//! The agent never integrates its own position. It only requests a
//! heading through [`Locomotion::set_move_direction`]; the driver calls
//! [`Locomotion::integrate`] once per tick to advance the body.

use organism_types::Vec2;

/// Movement surface the agent drives.
pub trait Locomotion: std::fmt::Debug {
    /// Current position.
    fn position(&self) -> Vec2;

    /// Last non-zero heading requested.
    fn last_direction(&self) -> Vec2;

    /// Base movement speed in units per second.
    fn move_speed(&self) -> f32;

    /// Request movement along `direction` (expected unit length).
    ///
    /// A zero vector stops the body. When `sleepy` is set the body moves
    /// at its reduced speed.
    fn set_move_direction(&mut self, direction: Vec2, sleepy: bool);

    /// Advance the position by the current velocity over `dt` seconds.
    fn integrate(&mut self, dt: f32);
}

/// Simple kinematic body with a constant velocity between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Vec2,
    velocity: Vec2,
    last_direction: Vec2,
    move_speed: f32,
    sleepy_move_speed: f32,
}

impl Body {
    /// Create a stationary body.
    pub const fn new(position: Vec2, move_speed: f32, sleepy_move_speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            last_direction: Vec2::ZERO,
            move_speed,
            sleepy_move_speed,
        }
    }

    /// Current velocity.
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Move the body to `position` without changing its velocity.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
    }
}

impl Locomotion for Body {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn last_direction(&self) -> Vec2 {
        self.last_direction
    }

    fn move_speed(&self) -> f32 {
        self.move_speed
    }

    fn set_move_direction(&mut self, direction: Vec2, sleepy: bool) {
        if direction == Vec2::ZERO {
            self.velocity = Vec2::ZERO;
            return;
        }
        let speed = if sleepy {
            self.sleepy_move_speed
        } else {
            self.move_speed
        };
        self.velocity = direction * speed;
        self.last_direction = direction;
    }

    fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}
