//! Rule-table decision policy.
//!
//! | current                      | next                                                  |
//! |------------------------------|-------------------------------------------------------|
//! | `None`                       | `SearchingFood`                                       |
//! | `SearchingFood`              | `Eating` if food is known, else `SearchingFood`       |
//! | `Eating`                     | `Sleeping` if sleep < hunger, else `SearchingFood`    |
//! | `Sleeping`                   | `SearchingFood`                                       |
//! | `WalkToAttack`, `Attacking`  | fight a living enemy, else as after `Eating`          |
//! | `Dead`                       | `Dead`                                                |
//!
//! Waking is decided separately by [`FsmPolicy::should_stop_sleeping`].

use organism_agents::MAX_STATUS;
use organism_types::Action;

use crate::decision::{DecisionContext, DecisionPolicy};

/// Deterministic lookup-table policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsmPolicy;

impl FsmPolicy {
    /// Create the policy.
    pub const fn new() -> Self {
        Self
    }
}

/// `Sleeping` when sleep is the scarcer need, otherwise `SearchingFood`.
fn rest_or_forage(ctx: &DecisionContext<'_>) -> Action {
    if ctx.status.sleep() < ctx.status.hunger() {
        Action::Sleeping
    } else {
        Action::SearchingFood
    }
}

impl DecisionPolicy for FsmPolicy {
    fn name(&self) -> &'static str {
        "fsm"
    }

    fn decide(&self, ctx: &DecisionContext<'_>) -> Action {
        match ctx.current {
            Action::None | Action::Sleeping => Action::SearchingFood,
            Action::SearchingFood => {
                if ctx.facts.nearest_food.is_some() {
                    Action::Eating
                } else {
                    Action::SearchingFood
                }
            }
            Action::Eating => rest_or_forage(ctx),
            Action::WalkToAttack | Action::Attacking => match ctx.facts.living_enemy() {
                Some(enemy) if enemy.distance <= ctx.facts.attack_range => Action::Attacking,
                Some(_) => Action::WalkToAttack,
                None => rest_or_forage(ctx),
            },
            Action::Dead => Action::Dead,
        }
    }

    fn should_stop_sleeping(&self, ctx: &DecisionContext<'_>) -> bool {
        ctx.status.hunger() <= ctx.dangerous_hunger || ctx.status.sleep() >= MAX_STATUS - 1.0
    }
}
