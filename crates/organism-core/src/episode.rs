//! One agent lifetime, driven tick by tick.
//!
//! Every tick runs in a fixed order:
//!
//! 1. World timers: food respawn, enemy spawning, dead enemy removal
//! 2. Enemy strikes, routed into [`ActionStateMachine::take_damage`]
//! 3. Perception events, routed into the machine's event handlers
//! 4. [`ActionStateMachine::tick`]
//! 5. Body integration
//!
//! The episode ends when the machine reports the agent's death through
//! its [`Lifecycle`] hook, or when the configured time cap is reached.

use std::cell::Cell;
use std::rc::Rc;

use organism_agents::Status;
use organism_world::{Body, World, WorldError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ConfigError, PolicyKind, SimulationConfig};
use crate::decision::DecisionPolicy;
use crate::fsm::FsmPolicy;
use crate::machine::{ActionStateMachine, Lifecycle, MachineConfig};
use crate::mpc::MpcPolicy;

/// Errors that prevent an episode from being built.
#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    /// The world could not be laid out.
    #[error("world setup failed: {0}")]
    World(#[from] WorldError),

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Shared "episode ended" signal.
///
/// The machine owns one handle as its [`Lifecycle`]; the episode keeps
/// another and polls it after each tick.
#[derive(Debug, Clone, Default)]
pub struct LifeSignal {
    deaths: Rc<Cell<u32>>,
    last_status: Rc<Cell<Option<Status>>>,
}

impl LifeSignal {
    /// A fresh signal with no deaths recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many death notifications were received.
    pub fn deaths(&self) -> u32 {
        self.deaths.get()
    }

    /// Whether the agent has died.
    pub fn has_ended(&self) -> bool {
        self.deaths.get() > 0
    }

    /// Status at the moment of death.
    pub fn status_at_death(&self) -> Option<Status> {
        self.last_status.get()
    }
}

impl Lifecycle for LifeSignal {
    fn agent_died(&mut self, status: &Status) {
        self.deaths.set(self.deaths.get().saturating_add(1));
        self.last_status.set(Some(*status));
    }
}

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    /// Zero-based episode index.
    pub index: u32,
    /// Simulated seconds the agent stayed alive.
    pub survival_seconds: f32,
    /// Health when the episode ended.
    pub terminal_health: f32,
    /// Hunger when the episode ended.
    pub terminal_hunger: f32,
    /// Sleep when the episode ended.
    pub terminal_sleep: f32,
    /// Number of action changes over the lifetime.
    pub action_changes: u32,
    /// Policy that drove the agent.
    pub policy: String,
    /// Whether the agent died, as opposed to hitting the time cap.
    pub died: bool,
}

/// Build the configured decision policy.
pub fn policy_for(config: &SimulationConfig) -> Box<dyn DecisionPolicy> {
    match config.simulation.policy {
        PolicyKind::Fsm => Box::new(FsmPolicy::new()),
        PolicyKind::Mpc => Box::new(MpcPolicy::new(config.mpc)),
    }
}

/// A world plus the agent living in it.
#[derive(Debug)]
pub struct Episode {
    index: u32,
    world: World,
    machine: ActionStateMachine,
    signal: LifeSignal,
    elapsed: f32,
    max_seconds: f32,
}

impl Episode {
    /// Lay out a fresh world and place the agent at its centre.
    ///
    /// Episode `index` is seeded with `simulation.seed + index`.
    pub fn new(config: &SimulationConfig, index: u32) -> Result<Self, EpisodeError> {
        config.validate()?;
        let seed = config.simulation.seed.wrapping_add(u64::from(index));
        let world = World::new(config.world.clone(), seed)?;
        Ok(Self::with_world(config, index, world))
    }

    /// Run an episode in a prepared world.
    pub fn with_world(config: &SimulationConfig, index: u32, world: World) -> Self {
        let seed = config.simulation.seed.wrapping_add(u64::from(index));
        let signal = LifeSignal::new();
        let body = Body::new(
            organism_types::Vec2::ZERO,
            config.agent.move_speed,
            config.agent.sleepy_move_speed,
        );
        let mut machine = ActionStateMachine::new(
            MachineConfig::from_simulation(config, seed),
            policy_for(config),
            Box::new(body),
            Box::new(signal.clone()),
        );
        machine.start(&world);

        Self {
            index,
            world,
            machine,
            signal,
            elapsed: 0.0,
            max_seconds: config.simulation.max_episode_seconds,
        }
    }

    /// The world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The world, for scenario setup.
    pub const fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The agent.
    pub const fn machine(&self) -> &ActionStateMachine {
        &self.machine
    }

    /// Simulated seconds elapsed.
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The death signal shared with the machine.
    pub const fn signal(&self) -> &LifeSignal {
        &self.signal
    }

    /// Whether the agent died or the time cap was reached.
    pub fn is_over(&self) -> bool {
        self.signal.has_ended() || self.elapsed >= self.max_seconds
    }

    /// Advance the episode by one tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }

        let position = self.machine.locomotion().position();
        let step = self.world.step(dt, position);
        for food in &step.respawned {
            debug!(%food, "food source respawned");
        }
        if let Some(enemy) = step.spawned {
            debug!(%enemy, "enemy spawned");
        }

        for strike in &step.strikes {
            self.machine
                .take_damage(strike.damage, Some(strike.enemy), &self.world);
        }

        for detection in self.world.detect(position) {
            self.machine.handle_detection(detection, &self.world);
        }

        self.machine.tick(dt, &mut self.world);
        self.machine.locomotion_mut().integrate(dt);
        self.elapsed += dt;
    }

    /// Step until the episode is over, then summarise it.
    pub fn run(mut self, dt: f32) -> EpisodeStats {
        while !self.is_over() {
            self.step(dt);
        }
        let stats = self.stats();
        info!(
            episode = stats.index,
            policy = %stats.policy,
            survival_seconds = stats.survival_seconds,
            died = stats.died,
            action_changes = stats.action_changes,
            "episode finished"
        );
        stats
    }

    /// Summary of the episode so far.
    pub fn stats(&self) -> EpisodeStats {
        let status = self
            .signal
            .status_at_death()
            .unwrap_or(*self.machine.status());
        EpisodeStats {
            index: self.index,
            survival_seconds: self.elapsed,
            terminal_health: status.health(),
            terminal_hunger: status.hunger(),
            terminal_sleep: status.sleep(),
            action_changes: self.machine.action_changes(),
            policy: self.machine.policy_name().to_owned(),
            died: self.signal.has_ended(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use organism_types::Action;

    use super::*;

    fn short_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.simulation.max_episode_seconds = 2.0;
        config.world.enemy_spawn.enabled = false;
        config
    }

    #[test]
    fn episode_starts_searching() {
        let episode = Episode::new(&short_config(), 0);
        assert!(episode.is_ok_and(|e| e.machine().current() == Action::SearchingFood));
    }

    #[test]
    fn time_cap_ends_episode_alive() {
        let config = short_config();
        let dt = config.effective_dt();
        let stats = Episode::new(&config, 1).unwrap().run(dt);
        assert!(!stats.died);
        assert!(stats.survival_seconds >= 2.0);
        assert_eq!(stats.policy, "fsm");
    }

    #[test]
    fn tick_of_death_counts_towards_survival() {
        let mut config = short_config();
        config.status.starvation_damage = 100.0;
        let mut episode = Episode::new(&config, 0).unwrap();
        episode.machine = episode.machine.with_status(Status::new(1.0, 0.0, 50.0));

        episode.step(0.1);
        assert!(episode.signal().has_ended());
        let stats = episode.stats();
        assert!(stats.died);
        assert!((stats.survival_seconds - 0.1).abs() < 1e-6);

        episode.step(0.1);
        assert!((episode.elapsed() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn life_signal_counts_deaths() {
        let mut signal = LifeSignal::new();
        let observer = signal.clone();
        signal.agent_died(&Status::new(0.0, 10.0, 20.0));
        assert!(observer.has_ended());
        assert_eq!(observer.deaths(), 1);
        assert_eq!(observer.status_at_death().map(|s| s.sleep()), Some(20.0));
    }
}
