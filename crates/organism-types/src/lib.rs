//! Shared type definitions for the organism survival simulation.
//!
//! This crate is the vocabulary every other crate in the workspace speaks:
//! the action set the agent chooses from, the vital attributes it tracks,
//! and the identifiers of world entities it can lock onto.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for food sources and enemies
//! - [`enums`] -- [`Action`] and [`StatusKind`]

pub mod enums;
pub mod ids;

pub use enums::{Action, StatusKind};
pub use glam::Vec2;
pub use ids::{EnemyId, FoodId};
