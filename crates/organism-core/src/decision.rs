//! Decision policy trait and the facts a policy decides from.
//!
//! The [`ActionStateMachine`] owns one boxed [`DecisionPolicy`] chosen at
//! construction. A policy never mutates anything: it receives a
//! [`DecisionContext`] snapshot (current action, status, and
//! [`WorldFacts`] resolved from the agent's memory) and answers three
//! questions:
//!
//! - which action should run next ([`DecisionPolicy::decide`])
//! - whether a sleeping agent should wake up
//!   ([`DecisionPolicy::should_stop_sleeping`])
//! - whether an enemy event should interrupt the current action
//!   ([`DecisionPolicy::should_start_chasing`])
//!
//! [`ActionStateMachine`]: crate::machine::ActionStateMachine

use organism_agents::{Status, StatusConfig};
use organism_types::{Action, EnemyId, FoodId, Vec2};

/// What the agent knows about its remembered nearest food source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodFact {
    /// The food source.
    pub id: FoodId,
    /// Where it is.
    pub position: Vec2,
    /// Distance from the agent.
    pub distance: f32,
}

/// What the agent knows about an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyFact {
    /// The enemy.
    pub id: EnemyId,
    /// Where it is.
    pub position: Vec2,
    /// Distance from the agent.
    pub distance: f32,
    /// The enemy's current health.
    pub health: f32,
    /// Damage the enemy deals per landed hit.
    pub damage_per_hit: f32,
}

impl EnemyFact {
    /// Whether the enemy still has health.
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// World facts resolved for one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFacts {
    /// The agent's current position.
    pub position: Vec2,
    /// The remembered nearest food source, if it still exists.
    pub nearest_food: Option<FoodFact>,
    /// The remembered nearest enemy, if it still exists.
    pub nearest_enemy: Option<EnemyFact>,
    /// The agent's own attack range.
    pub attack_range: f32,
    /// Distance at which the agent can eat.
    pub eating_distance: f32,
    /// The agent's normal movement speed.
    pub move_speed: f32,
    /// Length of the tick the decision is made for, in seconds.
    pub dt: f32,
}

impl WorldFacts {
    /// Facts for an agent at `position` that knows nothing.
    pub const fn empty(position: Vec2, dt: f32) -> Self {
        Self {
            position,
            nearest_food: None,
            nearest_enemy: None,
            attack_range: 1.0,
            eating_distance: 0.75,
            move_speed: 4.0,
            dt,
        }
    }

    /// The nearest enemy, if it is known and alive.
    pub fn living_enemy(&self) -> Option<&EnemyFact> {
        self.nearest_enemy.as_ref().filter(|e| e.is_alive())
    }

    /// Whether the nearest enemy is within the agent's attack range.
    pub fn enemy_in_range(&self) -> bool {
        self.nearest_enemy
            .is_some_and(|e| e.distance <= self.attack_range)
    }

    /// Whether the nearest food source is within eating distance.
    pub fn food_in_reach(&self) -> bool {
        self.nearest_food
            .is_some_and(|f| f.distance <= self.eating_distance)
    }
}

/// Read-only snapshot handed to a policy.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// The action currently running.
    pub current: Action,
    /// The agent's real status.
    pub status: &'a Status,
    /// Decay and recovery rates the status evolves by.
    pub status_config: &'a StatusConfig,
    /// Hunger at or below which eating is not worth interrupting.
    pub dangerous_hunger: f32,
    /// Resolved world facts.
    pub facts: &'a WorldFacts,
}

/// An enemy event asking whether to abandon the current action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseRequest {
    /// The enemy that triggered the event, if it still exists.
    pub source: Option<EnemyFact>,
    /// Whether the event was a hit on the agent.
    pub took_damage: bool,
}

/// A source of action decisions.
pub trait DecisionPolicy: std::fmt::Debug {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Pick the next action.
    fn decide(&self, ctx: &DecisionContext<'_>) -> Action;

    /// Whether a sleeping agent should wake up this tick.
    fn should_stop_sleeping(&self, ctx: &DecisionContext<'_>) -> bool;

    /// Whether an enemy event should force `WalkToAttack`.
    ///
    /// Defaults to [`default_chase_rule`].
    fn should_start_chasing(&self, ctx: &DecisionContext<'_>, request: &ChaseRequest) -> bool {
        default_chase_rule(ctx, request)
    }
}

/// The chase-interrupt rule shared by both policies.
///
/// Reasons to stay put, checked in order:
///
/// 1. No source enemy
/// 2. The known enemy is at least as urgent: the source is no weaker and
///    farther away
/// 3. Already engaging that same enemy
/// 4. Sleeping and the event was not a hit
/// 5. Eating while hunger is still above the dangerous threshold
pub fn default_chase_rule(ctx: &DecisionContext<'_>, request: &ChaseRequest) -> bool {
    let Some(source) = request.source else {
        return false;
    };

    if let Some(nearest) = ctx.facts.nearest_enemy {
        if source.health >= nearest.health && source.distance > nearest.distance {
            return false;
        }
        if ctx.current.is_combat() && nearest.id == source.id {
            return false;
        }
    }

    if ctx.current == Action::Sleeping && !request.took_damage {
        return false;
    }

    if ctx.current == Action::Eating && ctx.status.hunger() > ctx.dangerous_hunger {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(distance: f32, health: f32) -> EnemyFact {
        EnemyFact {
            id: EnemyId::new(),
            position: Vec2::new(distance, 0.0),
            distance,
            health,
            damage_per_hit: 2.0,
        }
    }

    fn chase(current: Action, status: &Status, facts: &WorldFacts, request: &ChaseRequest) -> bool {
        let config = StatusConfig::default();
        let ctx = DecisionContext {
            current,
            status,
            status_config: &config,
            dangerous_hunger: 60.0,
            facts,
        };
        default_chase_rule(&ctx, request)
    }

    #[test]
    fn no_source_never_chases() {
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let request = ChaseRequest {
            source: None,
            took_damage: true,
        };
        assert!(!chase(Action::SearchingFood, &Status::full(), &facts, &request));
    }

    #[test]
    fn farther_and_healthier_source_is_ignored() {
        let known = enemy(2.0, 10.0);
        let facts = WorldFacts {
            nearest_enemy: Some(known),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        let request = ChaseRequest {
            source: Some(enemy(5.0, 10.0)),
            took_damage: false,
        };
        assert!(!chase(Action::SearchingFood, &Status::full(), &facts, &request));

        let weaker = ChaseRequest {
            source: Some(enemy(5.0, 3.0)),
            took_damage: false,
        };
        assert!(chase(Action::SearchingFood, &Status::full(), &facts, &weaker));
    }

    #[test]
    fn same_enemy_mid_combat_is_ignored() {
        let known = enemy(2.0, 10.0);
        let facts = WorldFacts {
            nearest_enemy: Some(known),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        let request = ChaseRequest {
            source: Some(known),
            took_damage: true,
        };
        assert!(!chase(Action::Attacking, &Status::full(), &facts, &request));
        assert!(!chase(Action::WalkToAttack, &Status::full(), &facts, &request));
        assert!(chase(Action::SearchingFood, &Status::full(), &facts, &request));
    }

    #[test]
    fn sleeper_wakes_only_when_hit() {
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let spotted = ChaseRequest {
            source: Some(enemy(3.0, 10.0)),
            took_damage: false,
        };
        let hit = ChaseRequest {
            took_damage: true,
            ..spotted
        };
        assert!(!chase(Action::Sleeping, &Status::full(), &facts, &spotted));
        assert!(chase(Action::Sleeping, &Status::full(), &facts, &hit));
    }

    #[test]
    fn eating_continues_above_dangerous_hunger() {
        let facts = WorldFacts::empty(Vec2::ZERO, 0.1);
        let request = ChaseRequest {
            source: Some(enemy(3.0, 10.0)),
            took_damage: true,
        };
        let fed = Status::new(100.0, 80.0, 100.0);
        let hungry = Status::new(100.0, 30.0, 100.0);
        assert!(!chase(Action::Eating, &fed, &facts, &request));
        assert!(chase(Action::Eating, &hungry, &facts, &request));
    }

    #[test]
    fn living_enemy_filters_dead() {
        let facts = WorldFacts {
            nearest_enemy: Some(enemy(0.5, 0.0)),
            ..WorldFacts::empty(Vec2::ZERO, 0.1)
        };
        assert!(facts.living_enemy().is_none());
        assert!(facts.enemy_in_range());
    }
}
