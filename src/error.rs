//! Setup failures
//!
//! Only round setup can fail. Once the engine is running, stale references
//! are skipped and out-of-range geometry is clamped instead of raised.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("brick hit count {0} has no color tier (expected 1, 2 or 3)")]
    InvalidHits(u8),

    #[error("arena width {arena_width} leaves no room for a single brick column")]
    NoColumns { arena_width: f32 },

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
