//! What the agent remembers about the world between ticks.
//!
//! The agent holds IDs only. Every tick the machine re-resolves them
//! against the [`World`]; references to food that vanished or went
//! inactive and enemies that died or were removed are forgotten.

use organism_types::{EnemyId, FoodId, Vec2};
use organism_world::World;

use crate::decision::{EnemyFact, FoodFact};

/// The object an in-progress action is committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedTarget {
    /// A food source being eaten.
    Food(FoodId),
    /// An enemy being approached or attacked.
    Enemy(EnemyId),
}

/// Remembered nearest food and enemy, plus the current lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerceivedWorld {
    nearest_food: Option<FoodId>,
    nearest_enemy: Option<EnemyId>,
    lock: Option<LockedTarget>,
}

impl PerceivedWorld {
    /// Empty memory.
    pub const fn new() -> Self {
        Self {
            nearest_food: None,
            nearest_enemy: None,
            lock: None,
        }
    }

    /// Remembered nearest food source.
    pub const fn nearest_food(&self) -> Option<FoodId> {
        self.nearest_food
    }

    /// Remembered nearest enemy.
    pub const fn nearest_enemy(&self) -> Option<EnemyId> {
        self.nearest_enemy
    }

    /// The current lock, if any.
    pub const fn lock(&self) -> Option<LockedTarget> {
        self.lock
    }

    /// Commit to `target`.
    pub const fn lock_on(&mut self, target: LockedTarget) {
        self.lock = Some(target);
    }

    /// Drop the lock.
    pub const fn clear_lock(&mut self) {
        self.lock = None;
    }

    /// Forget the nearest food source.
    pub const fn forget_food(&mut self) {
        self.nearest_food = None;
    }

    /// Replace the nearest enemy unconditionally.
    pub const fn set_nearest_enemy(&mut self, id: EnemyId) {
        self.nearest_enemy = Some(id);
    }

    /// Consider a newly seen food source.
    ///
    /// It replaces the remembered one only if none is remembered or it is
    /// strictly closer to `origin`. Returns whether it was taken.
    pub fn offer_food(&mut self, id: FoodId, origin: Vec2, world: &World) -> bool {
        let Some(candidate) = world.food(id) else {
            return false;
        };
        let new_distance = origin.distance(candidate.position());
        let closer = self
            .nearest_food
            .and_then(|known| world.food(known))
            .is_none_or(|known| new_distance < origin.distance(known.position()));
        if closer {
            self.nearest_food = Some(id);
        }
        closer
    }

    /// Consider a newly seen enemy, with the same strictly-closer rule.
    pub fn offer_enemy(&mut self, id: EnemyId, origin: Vec2, world: &World) -> bool {
        let Some(candidate) = world.enemy(id) else {
            return false;
        };
        let new_distance = origin.distance(candidate.position());
        let closer = self
            .nearest_enemy
            .and_then(|known| world.enemy(known))
            .is_none_or(|known| new_distance < origin.distance(known.position()));
        if closer {
            self.nearest_enemy = Some(id);
        }
        closer
    }

    /// Forget references that no longer resolve to usable entities.
    ///
    /// The lock is kept; actions compare it against the nearest reference
    /// and re-plan on mismatch.
    pub fn refresh(&mut self, world: &World) {
        if self
            .nearest_food
            .is_some_and(|id| !world.food(id).is_some_and(organism_world::Food::is_active))
        {
            self.nearest_food = None;
        }
        if self
            .nearest_enemy
            .is_some_and(|id| !world.enemy(id).is_some_and(organism_world::Enemy::is_alive))
        {
            self.nearest_enemy = None;
        }
    }

    /// Resolve the nearest food source into a fact.
    pub fn food_fact(&self, origin: Vec2, world: &World) -> Option<FoodFact> {
        let food = world.food(self.nearest_food?)?;
        Some(FoodFact {
            id: food.id(),
            position: food.position(),
            distance: origin.distance(food.position()),
        })
    }

    /// Resolve the nearest enemy into a fact.
    pub fn enemy_fact(&self, origin: Vec2, world: &World) -> Option<EnemyFact> {
        self.nearest_enemy
            .and_then(|id| enemy_fact(id, origin, world))
    }
}

/// Resolve any enemy into a fact.
pub fn enemy_fact(id: EnemyId, origin: Vec2, world: &World) -> Option<EnemyFact> {
    let enemy = world.enemy(id)?;
    Some(EnemyFact {
        id,
        position: enemy.position(),
        distance: origin.distance(enemy.position()),
        health: enemy.health(),
        damage_per_hit: enemy.damage_per_hit(),
    })
}
