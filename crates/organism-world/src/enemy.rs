//! Hostile actors that chase the agent and strike it when in range.
//!
//! Each enemy owns its own [`CombatResolver`], the same resolver type the
//! agent uses. Enemies cannot touch the agent directly: a landed hit is
//! reported as an [`EnemyStrike`] that the driver routes into the agent's
//! damage handler.

use organism_agents::{CombatResolver, DamageTarget};
use organism_types::{EnemyId, Vec2};

use crate::config::EnemyConfig;

/// A hit an enemy landed on the agent this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStrike {
    /// The enemy that struck.
    pub enemy: EnemyId,
    /// Damage dealt.
    pub damage: f32,
}

/// A hostile actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    position: Vec2,
    health: f32,
    move_speed: f32,
    combat: CombatResolver,
}

impl Enemy {
    /// Spawn an enemy at full health.
    pub fn new(position: Vec2, config: &EnemyConfig) -> Self {
        Self {
            id: EnemyId::new(),
            position,
            health: config.max_health,
            move_speed: config.move_speed,
            combat: CombatResolver::new(config.combat),
        }
    }

    /// The enemy's identifier.
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Current position.
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current health. The world removes enemies at or below zero.
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Whether the enemy still has health.
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Damage dealt per landed hit.
    pub const fn damage_per_hit(&self) -> f32 {
        self.combat.damage()
    }

    /// Distance at which this enemy's hits land.
    pub const fn attack_range(&self) -> f32 {
        self.combat.range()
    }

    /// The enemy's combat resolver.
    pub const fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    /// Advance the enemy by one tick against an agent at `target`.
    ///
    /// Counts the cooldown down, then either strikes (when in range and
    /// ready) or steps toward the agent. Returns the damage landed, if any.
    pub fn step(&mut self, dt: f32, target: Vec2) -> Option<f32> {
        if !self.is_alive() {
            return None;
        }
        self.combat.tick(dt);

        if self.combat.is_in_range(self.position, target) {
            let mut hit = IncomingHit {
                position: target,
                landed: None,
            };
            self.combat.attack(self.position, &mut hit);
            return hit.landed;
        }

        let heading = (target - self.position).normalize_or_zero();
        self.position += heading * self.move_speed * dt;
        None
    }
}

impl DamageTarget for Enemy {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn receive_damage(&mut self, amount: f32) {
        self.health -= amount;
    }
}

/// Stand-in target that records a hit on the agent for later routing.
struct IncomingHit {
    position: Vec2,
    landed: Option<f32>,
}

impl DamageTarget for IncomingHit {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn receive_damage(&mut self, amount: f32) {
        self.landed = Some(amount);
    }
}

#[cfg(test)]
mod tests {
    use organism_agents::CombatConfig;

    use super::*;

    fn config() -> EnemyConfig {
        EnemyConfig {
            max_health: 10.0,
            move_speed: 2.0,
            combat: CombatConfig {
                damage: 3.0,
                cooldown: 1.0,
                range: 1.0,
            },
        }
    }

    #[test]
    fn chases_when_out_of_range() {
        let mut enemy = Enemy::new(Vec2::new(10.0, 0.0), &config());
        assert_eq!(enemy.step(1.0, Vec2::ZERO), None);
        assert!((enemy.position().x - 8.0).abs() < 1e-5);
    }

    #[test]
    fn strikes_immediately_then_waits_for_cooldown() {
        let mut enemy = Enemy::new(Vec2::new(0.5, 0.0), &config());
        assert_eq!(enemy.step(0.1, Vec2::ZERO), Some(3.0));
        assert_eq!(enemy.step(0.5, Vec2::ZERO), None);
        assert_eq!(enemy.step(0.5, Vec2::ZERO), Some(3.0));
    }

    #[test]
    fn does_not_move_while_in_range() {
        let mut enemy = Enemy::new(Vec2::new(0.5, 0.0), &config());
        let _ = enemy.step(0.1, Vec2::ZERO);
        let _ = enemy.step(0.1, Vec2::ZERO);
        assert_eq!(enemy.position(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn dead_enemy_is_inert() {
        let mut enemy = Enemy::new(Vec2::new(0.5, 0.0), &config());
        enemy.receive_damage(10.0);
        assert!(!enemy.is_alive());
        assert_eq!(enemy.step(0.1, Vec2::ZERO), None);
    }
}
