//! Short-horizon rollout planner.
//!
//! For every candidate action the planner copies the real [`Status`] into
//! a throwaway [`SimulatedStatus`], steps it forward `horizon` ticks under
//! that action, and accumulates a discounted cost. The cheapest candidate
//! wins; on a tie the earliest in [`Action::CANDIDATES`] order is kept.
//!
//! ## Rollout step
//!
//! 1. Passive hunger and sleep decay
//! 2. Starvation damage at zero hunger, otherwise health recovery when
//!    well fed and not exhausted
//! 3. Situational effects of the candidate (sleeping, enemy exposure, eating)
//! 4. `cost += gamma^step * step_cost`
//! 5. Projected death adds [`TERMINAL_PENALTY`] and ends the rollout
//!
//! The real status is never written. A decision costs at most
//! `horizon * CANDIDATES.len()` simulated steps.

use organism_agents::{MAX_STATUS, Status, clamp_status};
use organism_types::Action;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision::{DecisionContext, DecisionPolicy};

/// Cost added when a rollout projects the agent's death.
pub const TERMINAL_PENALTY: f32 = 99_999.0;

/// Cost charged per step while simulated sleep is within one unit of full.
pub const OVERSLEEP_PENALTY: f32 = 99_999.0;

/// Planner tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpcConfig {
    /// Simulated steps per rollout (default: 10).
    pub horizon: u16,

    /// Discount applied per step, in `[0, 1]` (default: 0.9).
    pub gamma: f32,

    /// Weight of the squared hunger deficit (default: 1.0).
    pub w_hunger: f32,

    /// Weight of the squared sleep deficit (default: 1.0).
    pub w_sleep: f32,

    /// Weight of the squared health deficit (default: 1.0).
    pub w_health: f32,

    /// Flat cost per step while an enemy is known (default: 1.0).
    pub w_enemy: f32,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            gamma: 0.9,
            w_hunger: 1.0,
            w_sleep: 1.0,
            w_health: 1.0,
            w_enemy: 1.0,
        }
    }
}

/// Ephemeral copy of the agent's status used inside one rollout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedStatus {
    /// Simulated health.
    pub health: f32,
    /// Simulated hunger.
    pub hunger: f32,
    /// Simulated sleep.
    pub sleep: f32,
}

impl From<&Status> for SimulatedStatus {
    fn from(status: &Status) -> Self {
        Self {
            health: status.health(),
            hunger: status.hunger(),
            sleep: status.sleep(),
        }
    }
}

/// Model-predictive decision policy.
#[derive(Debug, Clone, PartialEq)]
pub struct MpcPolicy {
    config: MpcConfig,
}

impl MpcPolicy {
    /// Create a planner with the given tuning.
    pub const fn new(config: MpcConfig) -> Self {
        Self { config }
    }

    /// The planner's tuning.
    pub const fn config(&self) -> &MpcConfig {
        &self.config
    }

    /// Cost of one simulated step.
    ///
    /// Each attribute contributes `weight * ((MAX - value) / MAX)^2`,
    /// except sleep within one unit of full, which costs
    /// [`OVERSLEEP_PENALTY`] instead. A known enemy adds a flat `w_enemy`.
    pub fn step_cost(&self, sim: &SimulatedStatus, enemy_known: bool) -> f32 {
        let c = &self.config;
        let deficit = |value: f32| {
            let d = (MAX_STATUS - value) / MAX_STATUS;
            d * d
        };

        let sleep_cost = if sim.sleep >= MAX_STATUS - 1.0 {
            OVERSLEEP_PENALTY
        } else {
            deficit(sim.sleep)
        };
        let enemy_cost = if enemy_known { 1.0 } else { 0.0 };

        c.w_hunger * deficit(sim.hunger)
            + c.w_sleep * sleep_cost
            + c.w_health * deficit(sim.health)
            + c.w_enemy * enemy_cost
    }

    /// Roll `action` forward `horizon` steps and return its discounted cost.
    pub fn simulate_future(&self, ctx: &DecisionContext<'_>, action: Action) -> f32 {
        let rates = ctx.status_config;
        let facts = ctx.facts;
        let dt = facts.dt;
        let enemy = facts.living_enemy();
        let exposure_share = f32::from(self.config.horizon.max(1));

        let mut sim = SimulatedStatus::from(ctx.status);
        let mut cost = 0.0;
        let mut discount = 1.0;
        let mut steps_ahead = 0.0_f32;

        for _ in 0..self.config.horizon {
            steps_ahead += 1.0;

            sim.hunger = clamp_status(sim.hunger, -(rates.hunger_decay * dt));
            sim.sleep = clamp_status(sim.sleep, -(rates.sleep_decay * dt));

            if sim.hunger <= 0.0 {
                sim.health = clamp_status(sim.health, -(rates.starvation_damage * dt));
            } else if sim.hunger >= rates.min_hunger_for_recovery && sim.sleep > 0.0 {
                sim.health = clamp_status(sim.health, rates.health_recovery * dt);
            }

            if action == Action::Sleeping {
                sim.sleep = clamp_status(sim.sleep, (rates.sleep_decay + rates.sleep_recovery) * dt);
            }

            if let Some(enemy) = enemy {
                let exposure = enemy.damage_per_hit / exposure_share;
                if action != Action::Attacking && enemy.distance <= facts.attack_range {
                    sim.health = clamp_status(sim.health, -exposure);
                }
                if action == Action::WalkToAttack {
                    let heading = (enemy.position - facts.position).normalize_or_zero();
                    let projected = facts.position + heading * facts.move_speed * steps_ahead;
                    if projected.distance(enemy.position) <= facts.attack_range {
                        sim.health = clamp_status(sim.health, -exposure);
                    }
                }
            }

            if action == Action::Eating && facts.food_in_reach() {
                sim.hunger = clamp_status(sim.hunger, (rates.hunger_decay + rates.hunger_per_food) * dt);
            }

            cost += discount * self.step_cost(&sim, enemy.is_some());
            discount *= self.config.gamma;

            if sim.health <= 0.0 {
                cost += TERMINAL_PENALTY;
                break;
            }
        }

        cost
    }

    /// Cost of every candidate, in enumeration order.
    pub fn evaluate(&self, ctx: &DecisionContext<'_>) -> [(Action, f32); 5] {
        Action::CANDIDATES.map(|action| (action, self.simulate_future(ctx, action)))
    }
}

impl DecisionPolicy for MpcPolicy {
    fn name(&self) -> &'static str {
        "mpc"
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> Action {
        if ctx.current == Action::Dead || ctx.status.is_depleted() {
            return Action::Dead;
        }

        let mut best = Action::SearchingFood;
        let mut best_cost = f32::MAX;
        for (action, cost) in self.evaluate(ctx) {
            if cost < best_cost {
                best_cost = cost;
                best = action;
            }
        }

        debug!(
            current = %ctx.current,
            chosen = %best,
            cost = best_cost,
            hunger = ctx.status.hunger(),
            sleep = ctx.status.sleep(),
            health = ctx.status.health(),
            "planner decided"
        );
        best
    }

    fn should_stop_sleeping(&self, ctx: &DecisionContext<'_>) -> bool {
        self.decide(ctx) != Action::Sleeping
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use organism_agents::StatusConfig;
    use organism_types::{EnemyId, FoodId, Vec2};

    use super::*;
    use crate::decision::{EnemyFact, FoodFact, WorldFacts};

    fn policy(horizon: u16, w_enemy: f32) -> MpcPolicy {
        MpcPolicy::new(MpcConfig {
            horizon,
            gamma: 0.9,
            w_hunger: 1.0,
            w_sleep: 1.0,
            w_health: 1.0,
            w_enemy,
        })
    }

    fn ctx<'a>(
        current: Action,
        status: &'a Status,
        config: &'a StatusConfig,
        facts: &'a WorldFacts,
    ) -> DecisionContext<'a> {
        DecisionContext {
            current,
            status,
            status_config: config,
            dangerous_hunger: 60.0,
            facts,
        }
    }

    #[test]
    fn dead_agent_decides_dead() {
        let config = StatusConfig::default();
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let status = Status::new(0.0, 50.0, 50.0);
        let planner = policy(5, 0.0);
        assert_eq!(
            planner.decide(&ctx(Action::SearchingFood, &status, &config, &facts)),
            Action::Dead
        );
    }

    #[test]
    fn starving_agent_does_not_sleep() {
        let config = StatusConfig::default();
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let status = Status::new(100.0, 5.0, 100.0);
        let planner = policy(5, 0.0);

        let chosen = planner.decide(&ctx(Action::SearchingFood, &status, &config, &facts));
        assert!(matches!(chosen, Action::SearchingFood | Action::Eating));
    }

    #[test]
    fn tired_agent_sleeps() {
        let config = StatusConfig::default();
        let facts = WorldFacts::empty(Vec2::ZERO, 0.5);
        let status = Status::new(100.0, 90.0, 10.0);
        let planner = policy(5, 0.0);
        assert_eq!(
            planner.decide(&ctx(Action::SearchingFood, &status, &config, &facts)),
            Action::Sleeping
        );
    }

    #[test]
    fn hungry_agent_next_to_food_eats() {
        let config = StatusConfig::default();
        let facts = WorldFacts {
            nearest_food: Some(FoodFact {
                id: FoodId::new(),
                position: Vec2::new(0.5, 0.0),
                distance: 0.5,
            }),
            ..WorldFacts::empty(Vec2::ZERO, 0.5)
        };
        let status = Status::new(100.0, 20.0, 80.0);
        let planner = policy(5, 0.0);
        assert_eq!(
            planner.decide(&ctx(Action::SearchingFood, &status, &config, &facts)),
            Action::Eating
        );
    }

    #[test]
    fn equal_costs_keep_earliest_candidate() {
        let config = StatusConfig::default();
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let status = Status::new(100.0, 70.0, 50.0);
        let planner = MpcPolicy::new(MpcConfig {
            w_sleep: 0.0,
            w_enemy: 0.0,
            ..MpcConfig::default()
        });
        let context = ctx(Action::Eating, &status, &config, &facts);

        let costs = planner.evaluate(&context);
        assert!(costs.iter().all(|(_, c)| *c == costs[0].1));
        for _ in 0..10 {
            assert_eq!(planner.decide(&context), Action::SearchingFood);
        }
    }

    #[test]
    fn decide_is_idempotent() {
        let config = StatusConfig::default();
        let facts = WorldFacts {
            nearest_enemy: Some(EnemyFact {
                id: EnemyId::new(),
                position: Vec2::new(0.8, 0.0),
                distance: 0.8,
                health: 10.0,
                damage_per_hit: 5.0,
            }),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        let status = Status::new(60.0, 40.0, 30.0);
        let planner = policy(8, 1.0);
        let context = ctx(Action::Sleeping, &status, &config, &facts);
        assert_eq!(planner.decide(&context), planner.decide(&context));
    }

    #[test]
    fn enemy_in_range_penalises_everything_but_attacking() {
        let config = StatusConfig::default();
        let facts = WorldFacts {
            nearest_enemy: Some(EnemyFact {
                id: EnemyId::new(),
                position: Vec2::new(0.5, 0.0),
                distance: 0.5,
                health: 10.0,
                damage_per_hit: 50.0,
            }),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        let status = Status::new(50.0, 80.0, 50.0);
        let planner = policy(5, 0.0);
        let context = ctx(Action::SearchingFood, &status, &config, &facts);

        let attacking = planner.simulate_future(&context, Action::Attacking);
        let searching = planner.simulate_future(&context, Action::SearchingFood);
        assert!(attacking < searching);
        assert_eq!(planner.decide(&context), Action::Attacking);
    }

    fn distant_enemy(move_speed: f32) -> WorldFacts {
        WorldFacts {
            nearest_enemy: Some(EnemyFact {
                id: EnemyId::new(),
                position: Vec2::new(3.0, 0.0),
                distance: 3.0,
                health: 10.0,
                damage_per_hit: 20.0,
            }),
            move_speed,
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        }
    }

    #[test]
    fn walking_into_range_charges_exposure() {
        let config = StatusConfig::default();
        let facts = distant_enemy(4.0);
        let status = Status::new(100.0, 40.0, 50.0);
        let planner = policy(5, 0.0);
        let context = ctx(Action::SearchingFood, &status, &config, &facts);

        // One step at speed 4 lands one unit from the enemy, inside range.
        let walking = planner.simulate_future(&context, Action::WalkToAttack);
        let searching = planner.simulate_future(&context, Action::SearchingFood);
        assert!(walking > searching, "walking {walking} vs searching {searching}");
    }

    #[test]
    fn walking_that_overshoots_range_costs_nothing_extra() {
        let config = StatusConfig::default();
        let facts = distant_enemy(10.0);
        let status = Status::new(100.0, 40.0, 50.0);
        let planner = policy(5, 0.0);
        let context = ctx(Action::SearchingFood, &status, &config, &facts);

        assert_eq!(
            planner.simulate_future(&context, Action::WalkToAttack),
            planner.simulate_future(&context, Action::SearchingFood)
        );
    }

    #[test]
    fn projected_death_adds_terminal_penalty() {
        let config = StatusConfig::default();
        let facts = WorldFacts {
            nearest_enemy: Some(EnemyFact {
                id: EnemyId::new(),
                position: Vec2::new(0.5, 0.0),
                distance: 0.5,
                health: 10.0,
                damage_per_hit: 100.0,
            }),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        let status = Status::new(10.0, 80.0, 50.0);
        let planner = policy(5, 0.0);
        let context = ctx(Action::SearchingFood, &status, &config, &facts);

        assert!(planner.simulate_future(&context, Action::Eating) >= TERMINAL_PENALTY);
        assert!(planner.simulate_future(&context, Action::Attacking) < TERMINAL_PENALTY);
    }

    #[test]
    fn full_sleep_costs_oversleep_penalty() {
        let planner = policy(1, 0.0);
        let rested = SimulatedStatus {
            health: 100.0,
            hunger: 100.0,
            sleep: 99.5,
        };
        let tired = SimulatedStatus {
            sleep: 50.0,
            ..rested
        };
        assert_eq!(planner.step_cost(&rested, false), OVERSLEEP_PENALTY);
        assert!((planner.step_cost(&tired, false) - 0.25).abs() < 1e-6);
        assert!((planner.step_cost(&tired, true) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn enemy_presence_is_flat() {
        let planner = policy(1, 2.0);
        let sim = SimulatedStatus {
            health: 100.0,
            hunger: 100.0,
            sleep: 50.0,
        };
        let delta = planner.step_cost(&sim, true) - planner.step_cost(&sim, false);
        assert!((delta - 2.0).abs() < 1e-6);
    }

    #[test]
    fn should_stop_sleeping_rechecks_plan() {
        let config = StatusConfig::default();
        let facts = WorldFacts::empty(Vec2::ZERO, 0.5);
        let planner = policy(5, 0.0);

        let tired = Status::new(100.0, 90.0, 10.0);
        assert!(!planner.should_stop_sleeping(&ctx(Action::Sleeping, &tired, &config, &facts)));

        let rested = Status::new(100.0, 90.0, 100.0);
        assert!(planner.should_stop_sleeping(&ctx(Action::Sleeping, &rested, &config, &facts)));
    }
}
