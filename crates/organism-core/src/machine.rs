//! The agent's action state machine.
//!
//! Exactly one [`Action`] is current. Every transition goes through
//! [`ActionStateMachine::force_action`]:
//!
//! 1. Ignore the request if the agent is dead (`Dead` is absorbing)
//! 2. If the action changes, run exit-cleanup: stop moving, drop the lock
//! 3. Run entry-setup for the requested action, even when re-selected
//! 4. Commit it as current
//! 5. If entry could not proceed (no target, already in range), re-plan
//!    from the committed action, up to [`MAX_REPLANS`] times
//!
//! [`ActionStateMachine::on_action_ended`] is the single re-planning
//! point: it asks the policy for the next action and forces it.
//!
//! ## Tick
//!
//! 1. Return immediately when dead
//! 2. Count the attack cooldown down
//! 3. Apply passive status decay and recovery (starvation may kill)
//! 4. Forget food and enemies that no longer resolve
//! 5. Run one tick of the current action's behavior

use organism_agents::{CombatConfig, CombatResolver, Status, StatusConfig};
use organism_types::{Action, EnemyId, FoodId, StatusKind, Vec2};
use organism_world::{Detection, Locomotion, World};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::anomaly::Anomaly;
use crate::config::{AgentConfig, SimulationConfig};
use crate::decision::{ChaseRequest, DecisionContext, DecisionPolicy, EnemyFact, WorldFacts};
use crate::perception::{LockedTarget, PerceivedWorld, enemy_fact};

/// Upper bound on consecutive re-plans inside one transition request.
pub const MAX_REPLANS: usize = 8;

/// Receives the agent's death notification.
pub trait Lifecycle: std::fmt::Debug {
    /// Called exactly once, when health reaches zero and before the
    /// machine enters `Dead`.
    fn agent_died(&mut self, status: &Status);
}

/// A lifecycle hook that ignores the notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLifecycle;

impl Lifecycle for NoopLifecycle {
    fn agent_died(&mut self, _status: &Status) {}
}

/// Everything the machine needs besides its collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineConfig {
    /// Passive decay and recovery rates.
    pub status: StatusConfig,
    /// Agent thresholds.
    pub agent: AgentConfig,
    /// The agent's own attack.
    pub combat: CombatConfig,
    /// Tick length assumed by decisions made before the first tick.
    pub nominal_dt: f32,
    /// Seed for wander headings.
    pub seed: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            status: StatusConfig::default(),
            agent: AgentConfig::default(),
            combat: CombatConfig::default(),
            nominal_dt: 0.1,
            seed: 0,
        }
    }
}

impl MachineConfig {
    /// Take the agent's sections from a loaded configuration.
    pub fn from_simulation(config: &SimulationConfig, seed: u64) -> Self {
        Self {
            status: config.status,
            agent: config.agent,
            combat: config.combat,
            nominal_dt: config.effective_dt(),
            seed,
        }
    }
}

/// Outcome of an action's entry-setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Ready,
    Replan,
}

/// The agent: status, combat, memory, and the current action.
#[derive(Debug)]
pub struct ActionStateMachine {
    current: Action,
    status: Status,
    config: MachineConfig,
    combat: CombatResolver,
    memory: PerceivedWorld,
    policy: Box<dyn DecisionPolicy>,
    body: Box<dyn Locomotion>,
    lifecycle: Box<dyn Lifecycle>,
    /// Set while steering back into the map after leaving it.
    going_back_in: bool,
    rng: SmallRng,
    last_dt: f32,
    action_changes: u32,
}

impl ActionStateMachine {
    /// Build an agent at full status with no action selected.
    pub fn new(
        config: MachineConfig,
        policy: Box<dyn DecisionPolicy>,
        body: Box<dyn Locomotion>,
        lifecycle: Box<dyn Lifecycle>,
    ) -> Self {
        Self {
            current: Action::None,
            status: Status::full(),
            combat: CombatResolver::new(config.combat),
            memory: PerceivedWorld::new(),
            policy,
            body,
            lifecycle,
            going_back_in: false,
            rng: SmallRng::seed_from_u64(config.seed),
            last_dt: config.nominal_dt,
            action_changes: 0,
            config,
        }
    }

    /// Replace the starting status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// The current action.
    pub const fn current(&self) -> Action {
        self.current
    }

    /// The agent's status.
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// What the agent remembers.
    pub const fn perceived(&self) -> &PerceivedWorld {
        &self.memory
    }

    /// The agent's attack resolver.
    pub const fn combat(&self) -> &CombatResolver {
        &self.combat
    }

    /// The agent's body.
    pub fn locomotion(&self) -> &dyn Locomotion {
        self.body.as_ref()
    }

    /// The agent's body, for the driver to integrate.
    pub fn locomotion_mut(&mut self) -> &mut dyn Locomotion {
        self.body.as_mut()
    }

    /// Name of the active policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Number of times the current action changed.
    pub const fn action_changes(&self) -> u32 {
        self.action_changes
    }

    /// Whether the agent is steering back into the map.
    pub const fn is_going_back_in(&self) -> bool {
        self.going_back_in
    }

    /// Whether the agent has died.
    pub fn is_dead(&self) -> bool {
        self.current == Action::Dead
    }

    // -----------------------------------------------------------------------
    // Decisions
    // -----------------------------------------------------------------------

    /// Resolve the agent's memory into facts for a decision.
    pub fn facts(&self, world: &World) -> WorldFacts {
        let position = self.body.position();
        WorldFacts {
            position,
            nearest_food: self.memory.food_fact(position, world),
            nearest_enemy: self.memory.enemy_fact(position, world),
            attack_range: self.combat.range(),
            eating_distance: self.config.agent.eating_distance,
            move_speed: self.body.move_speed(),
            dt: self.last_dt,
        }
    }

    fn context<'a>(&'a self, facts: &'a WorldFacts) -> DecisionContext<'a> {
        DecisionContext {
            current: self.current,
            status: &self.status,
            status_config: &self.config.status,
            dangerous_hunger: self.config.agent.dangerous_hunger,
            facts,
        }
    }

    /// Ask the policy for the next action without acting on it.
    pub fn decide(&self, world: &World) -> Action {
        let facts = self.facts(world);
        self.policy.decide(&self.context(&facts))
    }

    /// Ask the policy whether a sleeping agent should wake up.
    pub fn should_stop_sleeping(&self, world: &World) -> bool {
        let facts = self.facts(world);
        self.policy.should_stop_sleeping(&self.context(&facts))
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Pick the first action. Equivalent to [`Self::on_action_ended`].
    pub fn start(&mut self, world: &World) {
        self.on_action_ended(world);
    }

    /// Re-plan: ask the policy and force its answer.
    pub fn on_action_ended(&mut self, world: &World) {
        let next = self.decide(world);
        self.force_action(next, world);
    }

    /// Switch to `next`, running exit-cleanup and entry-setup.
    ///
    /// A no-op once the agent is dead.
    pub fn force_action(&mut self, next: Action, world: &World) {
        let mut next = next;
        for _ in 0..MAX_REPLANS {
            if self.current == Action::Dead {
                trace!(
                    requested = %next,
                    anomaly = %Anomaly::IllegalTransitionAttempt,
                    "transition ignored"
                );
                return;
            }

            if next != self.current {
                self.exit_current();
                self.action_changes = self.action_changes.saturating_add(1);
                debug!(from = %self.current, to = %next, "action changed");
            }

            let entry = self.enter(next, world);
            self.current = next;
            if entry == Entry::Ready {
                return;
            }
            next = self.decide(world);
        }

        warn!(
            current = %self.current,
            limit = MAX_REPLANS,
            "re-plan limit reached, keeping current action"
        );
    }

    fn exit_current(&mut self) {
        self.stop();
        self.memory.clear_lock();
        self.going_back_in = false;
    }

    fn enter(&mut self, action: Action, world: &World) -> Entry {
        match action {
            Action::None => Entry::Ready,
            Action::SearchingFood => {
                self.enter_searching(world);
                Entry::Ready
            }
            Action::Eating => match self.memory.nearest_food() {
                Some(food) => {
                    self.memory.lock_on(LockedTarget::Food(food));
                    Entry::Ready
                }
                None => Entry::Replan,
            },
            Action::Sleeping | Action::Dead => {
                self.stop();
                Entry::Ready
            }
            Action::WalkToAttack => {
                let Some(enemy) = self.memory.nearest_enemy() else {
                    return Entry::Replan;
                };
                self.memory.lock_on(LockedTarget::Enemy(enemy));
                if self.enemy_in_range(enemy, world) {
                    Entry::Replan
                } else {
                    Entry::Ready
                }
            }
            Action::Attacking => {
                let Some(enemy) = self.memory.nearest_enemy() else {
                    return Entry::Replan;
                };
                self.memory.lock_on(LockedTarget::Enemy(enemy));
                if !self.enemy_in_range(enemy, world) {
                    return Entry::Replan;
                }
                self.combat.start_cooldown();
                Entry::Ready
            }
        }
    }

    fn enter_searching(&mut self, world: &World) {
        let position = self.body.position();
        let bounds = world.bounds();

        let heading = if bounds.is_out_of_bounds(position) {
            let mut dir = -self.body.last_direction();
            // Randomize the axis parallel to the crossed edge so the agent
            // does not retrace its path.
            if bounds.is_out_x(position) {
                dir.y = self.rng.random_range(-1.0..=1.0);
            }
            if bounds.is_out_y(position) {
                dir.x = self.rng.random_range(-1.0..=1.0);
            }
            self.going_back_in = true;
            let dir = dir.normalize_or_zero();
            if dir == Vec2::ZERO {
                (-position).normalize_or_zero()
            } else {
                dir
            }
        } else {
            self.random_heading()
        };

        self.steer(heading);
    }

    fn random_heading(&mut self) -> Vec2 {
        let candidate = Vec2::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        );
        candidate.try_normalize().unwrap_or(Vec2::X)
    }

    fn steer(&mut self, direction: Vec2) {
        self.body
            .set_move_direction(direction, self.status.is_sleepy());
    }

    fn stop(&mut self) {
        self.body
            .set_move_direction(Vec2::ZERO, self.status.is_sleepy());
    }

    fn enemy_in_range(&self, enemy: EnemyId, world: &World) -> bool {
        world
            .enemy(enemy)
            .is_some_and(|e| self.combat.is_in_range(self.body.position(), e.position()))
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the agent by `dt` seconds.
    pub fn tick(&mut self, dt: f32, world: &mut World) {
        if self.current == Action::Dead {
            return;
        }
        self.last_dt = dt;
        self.combat.tick(dt);

        if self
            .status
            .apply_passive_tick(&self.config.status, dt)
            .is_life_ended()
        {
            self.on_life_ended(world);
            return;
        }

        self.memory.refresh(world);

        match self.current {
            Action::SearchingFood => self.behave_searching(world),
            Action::Eating => self.behave_eating(dt, world),
            Action::Sleeping => self.behave_sleeping(dt, world),
            Action::WalkToAttack => self.behave_walk_to_attack(world),
            Action::Attacking => self.behave_attacking(world),
            Action::None | Action::Dead => {}
        }
    }

    fn behave_searching(&mut self, world: &World) {
        let position = self.body.position();

        if world.bounds().is_out_of_bounds(position) {
            if !self.going_back_in {
                // Left the map without finding food.
                self.on_action_ended(world);
                return;
            }
        } else if self.going_back_in {
            self.going_back_in = false;
            self.force_action(Action::SearchingFood, world);
            return;
        }

        if let Some(food) = self.memory.food_fact(position, world) {
            if food.distance > self.config.agent.eating_distance {
                self.steer((food.position - position).normalize_or_zero());
            } else {
                self.on_action_ended(world);
            }
        }
    }

    fn behave_eating(&mut self, dt: f32, world: &mut World) {
        let Some(food) = self.locked_food() else {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };

        let position = self.body.position();
        let Some(food_position) = world.food(food).map(organism_world::Food::position) else {
            self.memory.forget_food();
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };

        // Close the last gap before eating.
        if position.distance(food_position) > self.config.agent.eating_distance {
            self.steer((food_position - position).normalize_or_zero());
            return;
        }
        self.stop();

        match world.eat(food, dt) {
            Some(true) => self.status.apply_feeding(&self.config.status, dt),
            Some(false) => {
                self.memory.forget_food();
                self.memory.clear_lock();
                self.abandon(Anomaly::ExhaustedResource, world);
            }
            None => {
                self.memory.forget_food();
                self.abandon(Anomaly::InvalidTargetReference, world);
            }
        }
    }

    /// The locked food source, if it is still the remembered nearest one.
    fn locked_food(&self) -> Option<FoodId> {
        let nearest = self.memory.nearest_food()?;
        (self.memory.lock() == Some(LockedTarget::Food(nearest))).then_some(nearest)
    }

    fn behave_sleeping(&mut self, dt: f32, world: &World) {
        if self.should_stop_sleeping(world) {
            self.on_action_ended(world);
            return;
        }
        self.status.recover_sleep(&self.config.status, dt);
    }

    fn behave_walk_to_attack(&mut self, world: &World) {
        let Some(LockedTarget::Enemy(id)) = self.memory.lock() else {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };
        let Some(enemy) = world.enemy(id).filter(|e| e.is_alive()) else {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };

        let position = self.body.position();
        if self.combat.is_in_range(position, enemy.position()) {
            self.on_action_ended(world);
            return;
        }
        self.steer((enemy.position() - position).normalize_or_zero());
    }

    fn behave_attacking(&mut self, world: &mut World) {
        let Some(LockedTarget::Enemy(id)) = self.memory.lock() else {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };
        if self.memory.nearest_enemy() != Some(id) {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        }

        let origin = self.body.position();
        let Some(enemy) = world.enemy_mut(id) else {
            self.abandon(Anomaly::InvalidTargetReference, world);
            return;
        };

        if !self.combat.is_in_range(origin, enemy.position()) {
            // Target stepped away; walk back in.
            self.on_action_ended(world);
            return;
        }

        if self.combat.attack(origin, enemy) {
            debug!(
                enemy = %id,
                enemy_health = enemy.health(),
                damage = self.combat.damage(),
                "agent hit enemy"
            );
            self.on_action_ended(world);
        }
    }

    /// Log `anomaly` and re-plan.
    fn abandon(&mut self, anomaly: Anomaly, world: &World) {
        debug!(action = %self.current, %anomaly, "abandoning action");
        self.on_action_ended(world);
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Route a perception event to the matching handler.
    pub fn handle_detection(&mut self, detection: Detection, world: &World) {
        match detection {
            Detection::Food(id) => self.on_food_source_detected(id, world),
            Detection::Enemy(id) => self.on_enemy_spotted(id, world),
        }
    }

    /// A food source came into view. Remembered only if strictly closer.
    pub fn on_food_source_detected(&mut self, food: FoodId, world: &World) {
        if self.is_dead() {
            return;
        }
        if self.memory.offer_food(food, self.body.position(), world) {
            trace!(%food, "nearest food updated");
        }
    }

    /// An enemy came into view.
    pub fn on_enemy_spotted(&mut self, enemy: EnemyId, world: &World) {
        if self.is_dead() {
            return;
        }
        let position = self.body.position();
        self.memory.offer_enemy(enemy, position, world);
        let source = self.memory.enemy_fact(position, world);
        self.consider_chase(source, false, world);
    }

    /// Apply damage from `source`, then consider chasing it.
    pub fn take_damage(&mut self, amount: f32, source: Option<EnemyId>, world: &World) {
        if self.is_dead() {
            return;
        }

        let vitality = self.status.decrement(StatusKind::Health, amount);
        debug!(amount, health = self.status.health(), "agent took damage");
        if vitality.is_life_ended() {
            self.on_life_ended(world);
            return;
        }

        let position = self.body.position();
        if let Some(id) = source {
            self.memory.offer_enemy(id, position, world);
        }
        let source = source.and_then(|id| enemy_fact(id, position, world));
        self.consider_chase(source, true, world);
    }

    fn consider_chase(&mut self, source: Option<EnemyFact>, took_damage: bool, world: &World) {
        let request = ChaseRequest {
            source,
            took_damage,
        };
        let facts = self.facts(world);
        if !self
            .policy
            .should_start_chasing(&self.context(&facts), &request)
        {
            return;
        }

        if let Some(enemy) = source {
            self.memory.set_nearest_enemy(enemy.id);
            debug!(enemy = %enemy.id, took_damage, from = %self.current, "chasing enemy");
        }
        self.force_action(Action::WalkToAttack, world);
    }

    /// Health reached zero: notify the lifecycle once and enter `Dead`.
    pub fn on_life_ended(&mut self, world: &World) {
        if self.is_dead() {
            return;
        }
        info!(
            anomaly = %Anomaly::TerminalHealthLoss,
            action = %self.current,
            hunger = self.status.hunger(),
            sleep = self.status.sleep(),
            "agent died"
        );
        self.lifecycle.agent_died(&self.status);
        self.force_action(Action::Dead, world);
    }
}
