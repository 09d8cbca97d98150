//! The headless world the agent lives in.
//!
//! [`World`] owns every food source and enemy in insertion order, so a
//! seeded world replays identically. The agent never holds references
//! into it; it remembers IDs and resolves them here each tick.

use organism_types::{EnemyId, FoodId, Vec2};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, trace};

use crate::bounds::WorldBounds;
use crate::config::WorldConfig;
use crate::enemy::{Enemy, EnemyStrike};
use crate::error::WorldError;
use crate::food::Food;
use crate::perception::{Detection, Vision};
use crate::spawn::{EnemySpawner, food_grid};

/// What happened in the world during one [`World::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldStep {
    /// Hits enemies landed on the agent, in world order.
    pub strikes: Vec<EnemyStrike>,
    /// Food sources that came back from their respawn delay.
    pub respawned: Vec<FoodId>,
    /// Enemy spawned this step, if any.
    pub spawned: Option<EnemyId>,
    /// Enemies removed because their health reached zero.
    pub removed: Vec<EnemyId>,
}

/// Food, enemies, bounds, and the agent's vision.
#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    bounds: WorldBounds,
    foods: Vec<Food>,
    enemies: Vec<Enemy>,
    vision: Vision,
    spawner: EnemySpawner,
    rng: SmallRng,
}

impl World {
    /// Build a world from `config`, laying out the food grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the configuration fails validation.
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, WorldError> {
        config.validate()?;
        let mut world = Self::empty(config, seed);
        if world.config.food.enabled {
            let positions = food_grid(&world.config.food, &world.bounds, &mut world.rng);
            for position in positions {
                world.spawn_food(position);
            }
        }
        debug!(
            food = world.foods.len(),
            half_extent_x = world.bounds.half_extent.x,
            half_extent_y = world.bounds.half_extent.y,
            "world created"
        );
        Ok(world)
    }

    /// Build a world with no food and no enemies.
    pub fn empty(config: WorldConfig, seed: u64) -> Self {
        Self {
            bounds: config.bounds(),
            spawner: EnemySpawner::new(config.enemy_spawn),
            config,
            foods: Vec::new(),
            enemies: Vec::new(),
            vision: Vision::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// The world's configuration.
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The map bounds.
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Every food source, in placement order.
    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    /// Every living enemy, in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Place a full food source at `position`.
    pub fn spawn_food(&mut self, position: Vec2) -> FoodId {
        let food = Food::new(position, &self.config.food);
        let id = food.id();
        self.foods.push(food);
        id
    }

    /// Place an existing food source (for partially eaten fixtures).
    pub fn insert_food(&mut self, food: Food) -> FoodId {
        let id = food.id();
        self.foods.push(food);
        id
    }

    /// Place an enemy at `position` with the configured stats.
    pub fn spawn_enemy(&mut self, position: Vec2) -> EnemyId {
        let enemy = Enemy::new(position, &self.config.enemy);
        self.insert_enemy(enemy)
    }

    /// Place an existing enemy.
    pub fn insert_enemy(&mut self, enemy: Enemy) -> EnemyId {
        let id = enemy.id();
        debug!(enemy = %id, x = enemy.position().x, y = enemy.position().y, "enemy spawned");
        self.enemies.push(enemy);
        id
    }

    /// Look up a food source.
    pub fn food(&self, id: FoodId) -> Option<&Food> {
        self.foods.iter().find(|f| f.id() == id)
    }

    /// Look up a food source mutably.
    pub fn food_mut(&mut self, id: FoodId) -> Option<&mut Food> {
        self.foods.iter_mut().find(|f| f.id() == id)
    }

    /// Look up an enemy. Removed enemies resolve to `None`.
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Look up an enemy mutably.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    /// Eat from food source `id` for `dt` seconds.
    ///
    /// Returns `None` if the source does not exist, otherwise whether a
    /// serving was obtained.
    pub fn eat(&mut self, id: FoodId, dt: f32) -> Option<bool> {
        let food = self.food_mut(id)?;
        let served = food.eat(dt);
        if !served {
            trace!(food = %id, "food source exhausted");
        }
        Some(served)
    }

    /// Advance food respawns, enemy spawning, and enemy behavior by `dt`.
    ///
    /// Enemies act against an agent standing at `agent_position`. Dead
    /// enemies are removed at the start of the step, so an enemy killed on
    /// the previous tick stays resolvable until now.
    pub fn step(&mut self, dt: f32, agent_position: Vec2) -> WorldStep {
        let mut outcome = WorldStep::default();

        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                true
            } else {
                outcome.removed.push(enemy.id());
                false
            }
        });

        for food in &mut self.foods {
            if food.tick(dt) {
                outcome.respawned.push(food.id());
            }
        }

        if self.spawner.tick(dt) {
            let alive = self.enemies.len();
            if u32::try_from(alive).is_ok_and(|n| n < self.spawner.max_alive()) {
                let position = self.spawner.spawn_position(&self.bounds, &mut self.rng);
                outcome.spawned = Some(self.spawn_enemy(position));
            } else {
                trace!(alive, "enemy spawn skipped at cap");
            }
        }

        for enemy in &mut self.enemies {
            if let Some(damage) = enemy.step(dt, agent_position) {
                outcome.strikes.push(EnemyStrike {
                    enemy: enemy.id(),
                    damage,
                });
            }
        }

        outcome
    }

    /// Report entities that just came into view of an agent at `origin`.
    pub fn detect(&mut self, origin: Vec2) -> Vec<Detection> {
        self.vision.scan(
            origin,
            self.config.vision_radius,
            &self.foods,
            &self.enemies,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use organism_agents::DamageTarget;

    use super::*;
    use crate::config::{EnemySpawnConfig, FoodConfig};

    fn quiet_config() -> WorldConfig {
        WorldConfig {
            food: FoodConfig {
                enabled: false,
                ..FoodConfig::default()
            },
            enemy_spawn: EnemySpawnConfig {
                enabled: false,
                ..EnemySpawnConfig::default()
            },
            ..WorldConfig::default()
        }
    }

    #[test]
    fn new_world_lays_out_food() {
        let world = World::new(WorldConfig::default(), 42).unwrap();
        assert_eq!(world.foods().len(), 11 * 11 - 1);
        assert!(world.enemies().is_empty());
    }

    #[test]
    fn same_seed_same_layout() {
        let a = World::new(WorldConfig::default(), 9).unwrap();
        let b = World::new(WorldConfig::default(), 9).unwrap();
        let pa: Vec<Vec2> = a.foods().iter().map(Food::position).collect();
        let pb: Vec<Vec2> = b.foods().iter().map(Food::position).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WorldConfig {
            vision_radius: -1.0,
            ..WorldConfig::default()
        };
        assert!(World::new(config, 0).is_err());
    }

    #[test]
    fn eat_missing_food_is_none() {
        let mut world = World::empty(quiet_config(), 0);
        assert_eq!(world.eat(FoodId::new(), 0.1), None);
        let id = world.spawn_food(Vec2::ZERO);
        assert_eq!(world.eat(id, 0.1), Some(true));
    }

    #[test]
    fn step_routes_strikes_and_removes_dead() {
        let mut world = World::empty(quiet_config(), 0);
        let striker = world.spawn_enemy(Vec2::new(0.5, 0.0));
        let victim = world.spawn_enemy(Vec2::new(50.0, 0.0));

        let outcome = world.step(0.1, Vec2::ZERO);
        assert_eq!(outcome.strikes.len(), 1);
        assert_eq!(outcome.strikes[0].enemy, striker);

        world.enemy_mut(victim).unwrap().receive_damage(1_000.0);
        assert!(world.enemy(victim).is_some());
        let outcome = world.step(0.1, Vec2::ZERO);
        assert_eq!(outcome.removed, vec![victim]);
        assert!(world.enemy(victim).is_none());
    }

    #[test]
    fn spawner_respects_cap() {
        let config = WorldConfig {
            enemy_spawn: EnemySpawnConfig {
                interval_seconds: 1.0,
                max_alive: 1,
                ..EnemySpawnConfig::default()
            },
            ..quiet_config()
        };
        let mut world = World::empty(config, 5);
        let far = Vec2::new(10_000.0, 10_000.0);
        assert!(world.step(1.0, far).spawned.is_some());
        assert!(world.step(1.0, far).spawned.is_none());
        assert_eq!(world.enemies().len(), 1);
        let spawned = world.enemies()[0].position();
        assert!(world.bounds().is_out_of_bounds(spawned));
    }

    #[test]
    fn detect_fires_on_entry_only() {
        let mut world = World::empty(quiet_config(), 0);
        let food = world.spawn_food(Vec2::new(1.0, 0.0));
        assert_eq!(world.detect(Vec2::ZERO), vec![Detection::Food(food)]);
        assert!(world.detect(Vec2::ZERO).is_empty());
    }
}
