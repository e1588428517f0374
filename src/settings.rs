//! Round configuration
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SetupError};
use crate::ms_to_ticks;
use crate::sim::LayoutStrategy;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Bricks ===
    /// Brick arrangement
    pub layout: LayoutStrategy,
    /// Rows to attempt (the pyramid picks its own)
    pub rows: u32,
    /// Starting hits per brick (1-3)
    pub brick_hits: u8,

    // === Round ===
    pub lives: u8,
    /// Offset applied by each move trigger
    pub paddle_step: f32,

    // === Timing ===
    /// Tick period the host drives the engine at
    pub tick_ms: u32,
    /// Seed for spawn rolls and random layouts (`None` = from entropy)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutStrategy::Random,
            rows: 5,
            brick_hits: 1,

            lives: START_LIVES,
            paddle_step: PADDLE_STEP,

            tick_ms: TICK_MS,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(SetupError::InvalidSetting("tick_ms must be positive".into()));
        }
        if !(self.paddle_step.is_finite() && self.paddle_step > 0.0) {
            return Err(SetupError::InvalidSetting(format!(
                "paddle_step must be a positive number, got {}",
                self.paddle_step
            )));
        }
        crate::sim::tier_fill(self.brick_hits)?;
        Ok(())
    }

    /// Ticks an expand bonus keeps the paddle wide
    pub fn expand_ticks(&self) -> u64 {
        ms_to_ticks(EXPAND_DURATION_MS, self.tick_ms)
    }

    /// Ticks between losing the last ball and the next serve
    pub fn respawn_ticks(&self) -> u64 {
        ms_to_ticks(RESPAWN_DELAY_MS, self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.layout, LayoutStrategy::Random);
        assert_eq!(settings.rows, 5);
        assert_eq!(settings.lives, 3);
        assert_eq!(settings.expand_ticks(), 200);
        assert_eq!(settings.respawn_ticks(), 20);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "layout": "pyramid", "seed": 9 }"#).unwrap();
        assert_eq!(settings.layout, LayoutStrategy::Pyramid);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.rows, 5);
    }

    #[test]
    fn test_unknown_layout_falls_back_to_grid() {
        let settings = Settings::from_json(r#"{ "layout": "zigzag" }"#).unwrap();
        assert_eq!(settings.layout, LayoutStrategy::Grid);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Settings::from_json(r#"{ "tick_ms": 0 }"#),
            Err(SetupError::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "brick_hits": 5 }"#),
            Err(SetupError::InvalidHits(5))
        ));
        assert!(matches!(Settings::from_json("{ nope"), Err(SetupError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load("/definitely/not/here.json"),
            Err(SetupError::Io(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            layout: LayoutStrategy::Checker,
            seed: Some(3),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
