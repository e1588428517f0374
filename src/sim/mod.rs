//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be deterministic:
//! - Fixed tick only
//! - Seeded or scripted randomness only
//! - Stable iteration order (by entity ID)
//! - Drawing goes through the `Surface` trait, never a concrete toolkit

pub mod bonus;
pub mod collision;
pub mod engine;
pub mod entity;
pub mod geom;
pub mod layout;
pub mod rng;
pub mod state;
pub mod timer;

pub use collision::Contact;
pub use engine::GameEngine;
pub use entity::{Entity, EntityId, EntityKind, Registry};
pub use geom::Bounds;
pub use layout::{BrickPlacement, LayoutStrategy};
pub use rng::{RandomSource, ScriptedRandom};
pub use state::{
    Ball, Bonus, BonusKind, BonusSink, Brick, BrickHit, Direction, GameEvent, GamePhase, Paddle,
    Sign, tier_fill,
};
pub use timer::{Scheduler, TimedAction};
