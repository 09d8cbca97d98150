//! Range and cooldown gated damage, shared by the agent and hostile actors.
//!
//! A [`CombatResolver`] owns a single countdown timer. The owner ticks it
//! once per simulated tick regardless of what it is doing; other
//! components only observe it through [`CombatResolver::is_ready`] and
//! [`CombatResolver::remaining`].
//!
//! ## Attack flow
//!
//! 1. Fail silently if the cooldown is still running
//! 2. Fail silently if the target is farther than `range`
//! 3. Apply the fixed `damage` to the target and restart the cooldown

use organism_types::Vec2;
use tracing::trace;

use crate::config::CombatConfig;

/// Something that can be struck by a [`CombatResolver`].
pub trait DamageTarget {
    /// Current position of the target.
    fn position(&self) -> Vec2;

    /// Apply `amount` of damage to the target.
    fn receive_damage(&mut self, amount: f32);
}

/// Cooldown-gated attack resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatResolver {
    config: CombatConfig,
    /// Seconds until the next attack may land. Ready at or below zero.
    timer: f32,
}

impl CombatResolver {
    /// Create a resolver that is ready to strike immediately.
    pub const fn new(config: CombatConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    /// The resolver's configuration.
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Maximum distance at which a hit lands.
    pub const fn range(&self) -> f32 {
        self.config.range
    }

    /// Fixed damage per successful hit.
    pub const fn damage(&self) -> f32 {
        self.config.damage
    }

    /// Whether `target` is within attack range of `origin`.
    pub fn is_in_range(&self, origin: Vec2, target: Vec2) -> bool {
        origin.distance(target) <= self.config.range
    }

    /// Reset the timer to the full configured cooldown.
    pub fn start_cooldown(&mut self) {
        self.timer = self.config.cooldown;
    }

    /// Count the timer down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
        }
    }

    /// Whether the cooldown has elapsed.
    pub fn is_ready(&self) -> bool {
        self.timer <= 0.0
    }

    /// Seconds left on the cooldown.
    pub fn remaining(&self) -> f32 {
        self.timer.max(0.0)
    }

    /// Try to strike `target` from `origin`.
    ///
    /// Returns `false` without side effects if the cooldown is running or
    /// the target is out of range. On success the damage is applied, the
    /// cooldown restarts, and `true` is returned.
    pub fn attack(&mut self, origin: Vec2, target: &mut dyn DamageTarget) -> bool {
        if !self.is_ready() {
            return false;
        }
        if !self.is_in_range(origin, target.position()) {
            return false;
        }

        target.receive_damage(self.config.damage);
        self.start_cooldown();
        trace!(damage = self.config.damage, "hit landed");
        true
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    struct Dummy {
        position: Vec2,
        health: f32,
    }

    impl DamageTarget for Dummy {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn receive_damage(&mut self, amount: f32) {
            self.health -= amount;
        }
    }

    fn resolver() -> CombatResolver {
        CombatResolver::new(CombatConfig {
            damage: 10.0,
            cooldown: 2.0,
            range: 1.5,
        })
    }

    #[test]
    fn range_is_inclusive() {
        let combat = resolver();
        assert!(combat.is_in_range(Vec2::ZERO, Vec2::new(1.5, 0.0)));
        assert!(!combat.is_in_range(Vec2::ZERO, Vec2::new(1.6, 0.0)));
    }

    #[test]
    fn second_attack_within_cooldown_fails() {
        let mut combat = resolver();
        let mut target = Dummy {
            position: Vec2::new(1.0, 0.0),
            health: 100.0,
        };

        assert!(combat.attack(Vec2::ZERO, &mut target));
        combat.tick(0.5);
        assert!(!combat.attack(Vec2::ZERO, &mut target));
        assert_eq!(target.health, 90.0);
    }

    #[test]
    fn attack_succeeds_again_after_cooldown() {
        let mut combat = resolver();
        let mut target = Dummy {
            position: Vec2::new(1.0, 0.0),
            health: 100.0,
        };

        assert!(combat.attack(Vec2::ZERO, &mut target));
        combat.tick(1.0);
        combat.tick(1.0);
        assert!(combat.is_ready());
        assert!(combat.attack(Vec2::ZERO, &mut target));
        assert_eq!(target.health, 80.0);
    }

    #[test]
    fn out_of_range_attack_does_not_start_cooldown() {
        let mut combat = resolver();
        let mut target = Dummy {
            position: Vec2::new(5.0, 0.0),
            health: 100.0,
        };

        assert!(!combat.attack(Vec2::ZERO, &mut target));
        assert!(combat.is_ready());
        assert_eq!(target.health, 100.0);
    }

    #[test]
    fn start_cooldown_blocks_attacks() {
        let mut combat = resolver();
        combat.start_cooldown();
        assert_eq!(combat.remaining(), 2.0);
        let mut target = Dummy {
            position: Vec2::ZERO,
            health: 100.0,
        };
        assert!(!combat.attack(Vec2::ZERO, &mut target));
    }

    #[test]
    fn timer_never_goes_negative() {
        let mut combat = resolver();
        combat.start_cooldown();
        combat.tick(10.0);
        assert_eq!(combat.remaining(), 0.0);
    }
}
