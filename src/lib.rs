//! Brick Breaker - an arcade breakout simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, bonuses, layouts, game state)
//! - `surface`: Host drawable-surface abstraction plus a headless in-memory surface
//! - `settings`: Data-driven round configuration
//! - `error`: Setup failures surfaced to the host

pub mod error;
pub mod settings;
pub mod sim;
pub mod surface;

pub use error::{Result, SetupError};
pub use settings::Settings;
pub use surface::{Arena, Fill, MemorySurface, ShapeHandle, ShapeKind, Surface};

/// Game configuration constants
pub mod consts {
    /// Reference tick period (20 Hz)
    pub const TICK_MS: u32 = 50;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 610.0;
    pub const ARENA_HEIGHT: f32 = 400.0;

    /// Paddle defaults
    pub const PADDLE_Y: f32 = 326.0;
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_EXPANDED_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Horizontal offset applied per move trigger
    pub const PADDLE_STEP: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 8.0;
    /// Vertical center of a freshly served ball (just above the paddle)
    pub const BALL_SERVE_Y: f32 = 310.0;

    /// Brick geometry
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_MARGIN: f32 = 5.0;
    pub const BRICK_TOP: f32 = 50.0;
    pub const BRICK_ROW_GAP: f32 = 6.0;
    pub const PYRAMID_ROWS: u32 = 5;
    /// Probability a cell holds a brick in the random layout
    pub const RANDOM_FILL_CHANCE: f64 = 0.6;

    /// Bonus pickups
    pub const BONUS_WIDTH: f32 = 30.0;
    pub const BONUS_HEIGHT: f32 = 10.0;
    pub const BONUS_SPEED: f32 = 5.0;
    /// Probability a destroyed brick drops a bonus
    pub const BONUS_DROP_CHANCE: f64 = 0.25;

    /// Timed effects (real time, converted to ticks by the engine)
    pub const EXPAND_DURATION_MS: u32 = 10_000;
    pub const RESPAWN_DELAY_MS: u32 = 1_000;

    pub const START_LIVES: u8 = 3;
}

/// Convert a real-time duration to a whole number of ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32, tick_ms: u32) -> u64 {
    let tick_ms = tick_ms.max(1);
    u64::from(ms.div_ceil(tick_ms).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(10_000, 50), 200);
        assert_eq!(ms_to_ticks(1_000, 50), 20);
        assert_eq!(ms_to_ticks(1_000, 30), 34);
        assert_eq!(ms_to_ticks(0, 50), 1);
    }
}
