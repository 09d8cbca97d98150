//! Bounded vital attributes and their per-tick mechanics.
//!
//! [`Status`] holds health, hunger, and sleep, each clamped to
//! `[0, MAX_STATUS]` after every mutation. Passive decay and recovery run
//! once per tick before the current action's behavior:
//!
//! - If hunger is 0: health decreases by `starvation_damage * dt`
//! - Else if hunger >= `min_hunger_for_recovery` and sleep > 0: health
//!   increases by `health_recovery * dt`
//! - Hunger and sleep always decay by their rates times `dt`
//!
//! Action effects (eating, sleeping) are defined net of that decay.

use organism_types::StatusKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StatusConfig;

/// Upper bound shared by every vital attribute.
pub const MAX_STATUS: f32 = 100.0;

/// Add `delta` to `original` and clamp the result to `[0, MAX_STATUS]`.
///
/// Infinite deltas saturate at the bounds. A NaN delta leaves the value
/// unchanged.
pub fn clamp_status(original: f32, delta: f32) -> f32 {
    if delta.is_nan() {
        return original.clamp(0.0, MAX_STATUS);
    }
    (original + delta).clamp(0.0, MAX_STATUS)
}

/// Outcome of a mutation that can end the agent's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitality {
    /// Health is still above zero.
    Alive,
    /// Health reached zero. The owner must run its death transition.
    LifeEnded,
}

impl Vitality {
    /// Whether this outcome signals the end of life.
    pub const fn is_life_ended(self) -> bool {
        matches!(self, Self::LifeEnded)
    }
}

/// The agent's vital attributes.
///
/// Owned exclusively by the agent. Decision policies read it but never
/// mutate it; every change goes through the methods below. Deserialized
/// values are clamped the same way as [`Status::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStatus")]
pub struct Status {
    health: f32,
    hunger: f32,
    sleep: f32,
}

/// Unchecked wire form of [`Status`].
#[derive(Deserialize)]
struct RawStatus {
    health: f32,
    hunger: f32,
    sleep: f32,
}

impl From<RawStatus> for Status {
    fn from(raw: RawStatus) -> Self {
        Self::new(raw.health, raw.hunger, raw.sleep)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::full()
    }
}

impl Status {
    /// A status with every attribute at `MAX_STATUS`.
    pub const fn full() -> Self {
        Self {
            health: MAX_STATUS,
            hunger: MAX_STATUS,
            sleep: MAX_STATUS,
        }
    }

    /// Build a status from explicit values, clamping each into range.
    pub fn new(health: f32, hunger: f32, sleep: f32) -> Self {
        Self {
            health: clamp_status(health, 0.0),
            hunger: clamp_status(hunger, 0.0),
            sleep: clamp_status(sleep, 0.0),
        }
    }

    /// Current health.
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Current hunger (satiety).
    pub const fn hunger(&self) -> f32 {
        self.hunger
    }

    /// Current sleep (restedness).
    pub const fn sleep(&self) -> f32 {
        self.sleep
    }

    /// Read one attribute by kind.
    pub const fn get(&self, kind: StatusKind) -> f32 {
        match kind {
            StatusKind::Health => self.health,
            StatusKind::Hunger => self.hunger,
            StatusKind::Sleep => self.sleep,
        }
    }

    /// Whether the agent is out of sleep and moves at its sleepy speed.
    pub fn is_sleepy(&self) -> bool {
        self.sleep <= 0.0
    }

    /// Whether health has reached zero.
    pub fn is_depleted(&self) -> bool {
        self.health <= 0.0
    }

    /// Increase one attribute by `value`, clamped to `[0, MAX_STATUS]`.
    pub fn increment(&mut self, kind: StatusKind, value: f32) {
        let slot = self.slot_mut(kind);
        *slot = clamp_status(*slot, value);
    }

    /// Decrease one attribute by `value`, clamped to `[0, MAX_STATUS]`.
    ///
    /// Returns [`Vitality::LifeEnded`] when the decremented attribute is
    /// health and it is now at or below zero.
    pub fn decrement(&mut self, kind: StatusKind, value: f32) -> Vitality {
        let slot = self.slot_mut(kind);
        *slot = clamp_status(*slot, -value);

        if kind == StatusKind::Health && self.is_depleted() {
            Vitality::LifeEnded
        } else {
            Vitality::Alive
        }
    }

    /// Apply one tick of passive decay and recovery.
    ///
    /// Returns [`Vitality::LifeEnded`] if starvation drained the last of
    /// the agent's health during this tick.
    pub fn apply_passive_tick(&mut self, config: &StatusConfig, dt: f32) -> Vitality {
        let mut vitality = Vitality::Alive;

        if self.hunger <= 0.0 {
            debug!(health = self.health, "starving");
            vitality = self.decrement(StatusKind::Health, config.starvation_damage * dt);
        } else if self.hunger >= config.min_hunger_for_recovery && self.sleep > 0.0 {
            self.increment(StatusKind::Health, config.health_recovery * dt);
        }

        self.hunger = clamp_status(self.hunger, -(config.hunger_decay * dt));
        self.sleep = clamp_status(self.sleep, -(config.sleep_decay * dt));

        vitality
    }

    /// Recover sleep for one tick spent sleeping.
    ///
    /// Adds `(sleep_recovery + sleep_decay) * dt`, compensating for the
    /// passive decay applied in the same tick.
    pub fn recover_sleep(&mut self, config: &StatusConfig, dt: f32) {
        self.increment(
            StatusKind::Sleep,
            (config.sleep_recovery + config.sleep_decay) * dt,
        );
    }

    /// Restore hunger for one tick spent eating.
    ///
    /// Adds `(hunger_decay + hunger_per_food) * dt`, compensating for the
    /// passive decay applied in the same tick.
    pub fn apply_feeding(&mut self, config: &StatusConfig, dt: f32) {
        self.increment(
            StatusKind::Hunger,
            (config.hunger_decay + config.hunger_per_food) * dt,
        );
    }

    fn slot_mut(&mut self, kind: StatusKind) -> &mut f32 {
        match kind {
            StatusKind::Health => &mut self.health,
            StatusKind::Hunger => &mut self.hunger,
            StatusKind::Sleep => &mut self.sleep,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const KINDS: [StatusKind; 3] = [StatusKind::Health, StatusKind::Hunger, StatusKind::Sleep];

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn starts_full() {
        let status = Status::default();
        assert_eq!(status.health(), MAX_STATUS);
        assert_eq!(status.hunger(), MAX_STATUS);
        assert_eq!(status.sleep(), MAX_STATUS);
    }

    #[test]
    fn new_clamps_out_of_range_values() {
        let status = Status::new(150.0, -20.0, 42.0);
        assert_eq!(status.health(), MAX_STATUS);
        assert_eq!(status.hunger(), 0.0);
        assert_eq!(status.sleep(), 42.0);
    }

    #[test]
    fn deserialized_status_is_clamped() {
        let status: Status =
            serde_json::from_str(r#"{"health":500.0,"hunger":-40.0,"sleep":100.0}"#).unwrap();
        assert_eq!(status.health(), MAX_STATUS);
        assert_eq!(status.hunger(), 0.0);
        assert_eq!(status.sleep(), MAX_STATUS);

        let json = serde_json::to_string(&Status::new(12.5, 30.0, 45.0)).unwrap();
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::new(12.5, 30.0, 45.0));
    }

    #[test]
    fn clamp_invariant_holds_for_arbitrary_sequences() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut status = Status::new(50.0, 50.0, 50.0);
        let magnitudes = [0.0, 1.0, 37.5, 1e6, f32::MAX, f32::INFINITY];

        for _ in 0..2_000 {
            let kind = KINDS[rng.random_range(0..KINDS.len())];
            let magnitude = magnitudes[rng.random_range(0..magnitudes.len())]
                * rng.random_range(0.0_f32..=1.0);
            if rng.random_bool(0.5) {
                status.increment(kind, magnitude);
            } else {
                let _ = status.decrement(kind, magnitude);
            }
            for k in KINDS {
                let v = status.get(k);
                assert!((0.0..=MAX_STATUS).contains(&v), "{k} out of range: {v}");
            }
        }
    }

    #[test]
    fn nan_delta_is_ignored() {
        let mut status = Status::new(40.0, 40.0, 40.0);
        status.increment(StatusKind::Sleep, f32::NAN);
        assert_eq!(status.sleep(), 40.0);
    }

    #[test]
    fn decrement_health_to_zero_ends_life() {
        let mut status = Status::new(10.0, 50.0, 50.0);
        assert_eq!(status.decrement(StatusKind::Health, 4.0), Vitality::Alive);
        assert_eq!(status.decrement(StatusKind::Health, 6.0), Vitality::LifeEnded);
        assert_eq!(status.health(), 0.0);
    }

    #[test]
    fn decrement_other_kinds_never_ends_life() {
        let mut status = Status::new(10.0, 5.0, 5.0);
        assert_eq!(status.decrement(StatusKind::Hunger, 100.0), Vitality::Alive);
        assert_eq!(status.decrement(StatusKind::Sleep, 100.0), Vitality::Alive);
    }

    #[test]
    fn passive_tick_decays_hunger_and_sleep() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(100.0, 80.0, 80.0);
        let v = status.apply_passive_tick(&cfg, 2.0);
        assert_eq!(v, Vitality::Alive);
        assert!(close(status.hunger(), 78.0));
        assert!(close(status.sleep(), 79.0));
    }

    #[test]
    fn passive_tick_recovers_health_when_fed_and_rested() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(50.0, 80.0, 80.0);
        let _ = status.apply_passive_tick(&cfg, 1.0);
        assert!(close(status.health(), 51.0));
    }

    #[test]
    fn no_recovery_below_hunger_threshold() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(50.0, 40.0, 80.0);
        let _ = status.apply_passive_tick(&cfg, 1.0);
        assert!(close(status.health(), 50.0));
    }

    #[test]
    fn no_recovery_when_exhausted() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(50.0, 80.0, 0.0);
        let _ = status.apply_passive_tick(&cfg, 1.0);
        assert!(close(status.health(), 50.0));
        assert!(status.is_sleepy());
    }

    #[test]
    fn starvation_damages_health() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(50.0, 0.0, 80.0);
        let _ = status.apply_passive_tick(&cfg, 1.5);
        assert!(close(status.health(), 47.0));
    }

    #[test]
    fn starvation_signals_life_ended() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(1.0, 0.0, 80.0);
        assert_eq!(status.apply_passive_tick(&cfg, 1.0), Vitality::LifeEnded);
    }

    #[test]
    fn sleeping_yields_net_gain_of_recovery_rate() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(100.0, 100.0, 50.0);
        let _ = status.apply_passive_tick(&cfg, 1.0);
        status.recover_sleep(&cfg, 1.0);
        assert!(close(status.sleep(), 50.0 + cfg.sleep_recovery));
    }

    #[test]
    fn eating_yields_net_gain_of_food_rate() {
        let cfg = StatusConfig::default();
        let mut status = Status::new(100.0, 30.0, 100.0);
        let _ = status.apply_passive_tick(&cfg, 0.5);
        status.apply_feeding(&cfg, 0.5);
        assert!(close(status.hunger(), 30.0 + cfg.hunger_per_food * 0.5));
    }
}
