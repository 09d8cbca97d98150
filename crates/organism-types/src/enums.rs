//! Enumeration types for the organism simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The agent's current top-level behavior mode.
///
/// Exactly one action is current at any time. [`Action::None`] and
/// [`Action::Dead`] have no per-tick behavior, and [`Action::Dead`] is
/// absorbing: once entered no further transitions occur.
///
/// Declaration order is significant. The predictive planner enumerates
/// candidates in this order and keeps the earliest one on a cost tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No action selected yet.
    None,
    /// Wandering the map or steering toward a known food source.
    SearchingFood,
    /// Consuming a locked food source.
    Eating,
    /// Recovering sleep in place.
    Sleeping,
    /// Steering toward a locked enemy until it is in attack range.
    WalkToAttack,
    /// Striking a locked enemy that is in attack range.
    Attacking,
    /// Terminal state after health reached zero.
    Dead,
}

impl Action {
    /// Every action in enumeration order.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::SearchingFood,
        Self::Eating,
        Self::Sleeping,
        Self::WalkToAttack,
        Self::Attacking,
        Self::Dead,
    ];

    /// Actions a planner may choose between (everything except `None` and `Dead`).
    pub const CANDIDATES: [Self; 5] = [
        Self::SearchingFood,
        Self::Eating,
        Self::Sleeping,
        Self::WalkToAttack,
        Self::Attacking,
    ];

    /// Whether the action runs behavior every tick.
    pub const fn has_behavior(self) -> bool {
        !matches!(self, Self::None | Self::Dead)
    }

    /// Whether the action is part of an engagement with an enemy.
    pub const fn is_combat(self) -> bool {
        matches!(self, Self::WalkToAttack | Self::Attacking)
    }

    /// Stable `snake_case` name, matching the serialized form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SearchingFood => "searching_food",
            Self::Eating => "eating",
            Self::Sleeping => "sleeping",
            Self::WalkToAttack => "walk_to_attack",
            Self::Attacking => "attacking",
            Self::Dead => "dead",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Vital attributes
// ---------------------------------------------------------------------------

/// One of the agent's bounded vital attributes.
///
/// All three live in `[0, MAX]`. Hunger and sleep read as "fullness":
/// 100 is fully fed or fully rested, 0 is starving or exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Health. Reaching 0 ends the agent's life.
    Health,
    /// Satiety. At 0 the agent starves and loses health.
    Hunger,
    /// Restedness. At 0 the agent is sleepy and moves slower.
    Sleep,
}

impl core::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Health => f.write_str("health"),
            Self::Hunger => f.write_str("hunger"),
            Self::Sleep => f.write_str("sleep"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_exclude_none_and_dead() {
        assert!(!Action::CANDIDATES.contains(&Action::None));
        assert!(!Action::CANDIDATES.contains(&Action::Dead));
        assert_eq!(Action::CANDIDATES.len(), Action::ALL.len() - 2);
    }

    #[test]
    fn candidates_follow_declaration_order() {
        let ordered: Vec<Action> = Action::ALL
            .iter()
            .copied()
            .filter(|a| a.has_behavior())
            .collect();
        assert_eq!(ordered, Action::CANDIDATES.to_vec());
    }

    #[test]
    fn display_matches_serde_name() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap_or_default();
            assert_eq!(json, format!("\"{action}\""));
        }
    }

    #[test]
    fn combat_actions() {
        assert!(Action::WalkToAttack.is_combat());
        assert!(Action::Attacking.is_combat());
        assert!(!Action::Eating.is_combat());
    }
}
