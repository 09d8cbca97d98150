//! Entry-trigger perception.
//!
//! The agent has no polling interface into the detector. [`Vision`]
//! remembers which entities were inside the vision radius on the previous
//! scan and reports only those that newly entered it, the way a trigger
//! volume fires on entry.

use std::collections::BTreeSet;

use organism_types::{EnemyId, FoodId, Vec2};

use crate::enemy::Enemy;
use crate::food::Food;

/// An entity that just came into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// A food source entered the vision radius.
    Food(FoodId),
    /// An enemy entered the vision radius.
    Enemy(EnemyId),
}

/// Tracks what was in view on the previous scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vision {
    food_in_view: BTreeSet<FoodId>,
    enemies_in_view: BTreeSet<EnemyId>,
}

impl Vision {
    /// Create a vision tracker with nothing in view.
    pub const fn new() -> Self {
        Self {
            food_in_view: BTreeSet::new(),
            enemies_in_view: BTreeSet::new(),
        }
    }

    /// Scan from `origin` and return entry events in world order.
    ///
    /// Disabled food is invisible, so a respawned source triggers again
    /// once it comes back while the agent is nearby.
    pub fn scan(
        &mut self,
        origin: Vec2,
        radius: f32,
        foods: &[Food],
        enemies: &[Enemy],
    ) -> Vec<Detection> {
        let mut detections = Vec::new();

        let mut food_now = BTreeSet::new();
        for food in foods {
            if food.is_active() && origin.distance(food.position()) <= radius {
                food_now.insert(food.id());
                if !self.food_in_view.contains(&food.id()) {
                    detections.push(Detection::Food(food.id()));
                }
            }
        }

        let mut enemies_now = BTreeSet::new();
        for enemy in enemies {
            if enemy.is_alive() && origin.distance(enemy.position()) <= radius {
                enemies_now.insert(enemy.id());
                if !self.enemies_in_view.contains(&enemy.id()) {
                    detections.push(Detection::Enemy(enemy.id()));
                }
            }
        }

        self.food_in_view = food_now;
        self.enemies_in_view = enemies_now;
        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyConfig, FoodConfig};

    #[test]
    fn reports_only_on_entry() {
        let foods = vec![Food::new(Vec2::new(2.0, 0.0), &FoodConfig::default())];
        let mut vision = Vision::new();

        let first = vision.scan(Vec2::ZERO, 5.0, &foods, &[]);
        assert_eq!(first, vec![Detection::Food(foods[0].id())]);

        let second = vision.scan(Vec2::ZERO, 5.0, &foods, &[]);
        assert!(second.is_empty());
    }

    #[test]
    fn leaving_and_reentering_triggers_again() {
        let enemies = vec![Enemy::new(Vec2::new(4.0, 0.0), &EnemyConfig::default())];
        let mut vision = Vision::new();

        assert_eq!(vision.scan(Vec2::ZERO, 5.0, &[], &enemies).len(), 1);
        assert!(vision.scan(Vec2::new(-10.0, 0.0), 5.0, &[], &enemies).is_empty());
        assert_eq!(vision.scan(Vec2::ZERO, 5.0, &[], &enemies).len(), 1);
    }

    #[test]
    fn out_of_radius_is_ignored() {
        let foods = vec![Food::new(Vec2::new(20.0, 0.0), &FoodConfig::default())];
        let mut vision = Vision::new();
        assert!(vision.scan(Vec2::ZERO, 5.0, &foods, &[]).is_empty());
    }
}
