//! Headless world collaborators for the organism simulation.
//!
//! The decision core treats everything in this crate as an external
//! service reached through a narrow surface: where things are, whether a
//! food source still yields, which enemies struck this tick, and which
//! entities just came into view. These implementations are deliberately
//! simple so episodes can run without a game engine.
//!
//! # Modules
//!
//! - [`body`] -- [`Locomotion`] trait and the kinematic [`Body`]
//! - [`bounds`] -- Rectangular map bounds ([`WorldBounds`])
//! - [`config`] -- World configuration ([`WorldConfig`])
//! - [`enemy`] -- Hostile actors that chase and strike the agent ([`Enemy`])
//! - [`error`] -- Error types for world operations ([`WorldError`])
//! - [`food`] -- Depletable, respawning food sources ([`Food`])
//! - [`perception`] -- Entry-trigger detection ([`Detection`])
//! - [`spawn`] -- Food grid layout and enemy spawn timer
//! - [`world`] -- The [`World`] context passed into the agent each tick

pub mod body;
pub mod bounds;
pub mod config;
pub mod enemy;
pub mod error;
pub mod food;
pub mod perception;
pub mod spawn;
pub mod world;

pub use body::{Body, Locomotion};
pub use bounds::WorldBounds;
pub use config::{EnemyConfig, EnemySpawnConfig, FoodConfig, WorldConfig};
pub use enemy::{Enemy, EnemyStrike};
pub use error::WorldError;
pub use food::Food;
pub use perception::{Detection, Vision};
pub use world::{World, WorldStep};
