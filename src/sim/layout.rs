//! Brick layout generation
//!
//! Bricks sit on a fixed grid: columns fill the arena width minus a margin on
//! each side, rows are spaced one brick height plus a small gap apart starting
//! at a fixed top offset. Each strategy picks which cells get a brick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::tier_fill;
use crate::consts::*;
use crate::error::{Result, SetupError};

/// Named brick arrangements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutStrategy {
    #[default]
    Grid,
    /// Odd rows shifted half a brick right, clipped at the arena edge
    Staggered,
    /// Fixed five centered rows, two bricks shorter each row
    Pyramid,
    Checker,
    /// Each cell filled independently with `RANDOM_FILL_CHANCE`
    Random,
}

impl LayoutStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStrategy::Grid => "grid",
            LayoutStrategy::Staggered => "staggered",
            LayoutStrategy::Pyramid => "pyramid",
            LayoutStrategy::Checker => "checker",
            LayoutStrategy::Random => "random",
        }
    }

    /// Parse a strategy name; unknown names fall back to `Grid`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "grid" => LayoutStrategy::Grid,
            "staggered" => LayoutStrategy::Staggered,
            "pyramid" => LayoutStrategy::Pyramid,
            "checker" => LayoutStrategy::Checker,
            "random" => LayoutStrategy::Random,
            other => {
                log::warn!("Unknown layout '{}', using grid", other);
                LayoutStrategy::Grid
            }
        }
    }
}

impl From<String> for LayoutStrategy {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<LayoutStrategy> for String {
    fn from(strategy: LayoutStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Where a brick goes and how tough it is
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickPlacement {
    pub row: u32,
    pub center: Vec2,
    pub hits: u8,
}

/// Number of whole brick columns that fit inside the side margins
pub fn column_count(arena_width: f32) -> Result<u32> {
    let columns = ((arena_width - 2.0 * BRICK_MARGIN) / BRICK_WIDTH).floor();
    if columns >= 1.0 {
        Ok(columns as u32)
    } else {
        Err(SetupError::NoColumns { arena_width })
    }
}

#[inline]
fn row_y(row: u32) -> f32 {
    BRICK_TOP + row as f32 * (BRICK_HEIGHT + BRICK_ROW_GAP)
}

#[inline]
fn column_x(column: u32) -> f32 {
    BRICK_MARGIN + BRICK_WIDTH / 2.0 + column as f32 * BRICK_WIDTH
}

/// Lay out bricks for `strategy`. `rows` is ignored by the pyramid.
pub fn generate<R: RandomSource + ?Sized>(
    strategy: LayoutStrategy,
    rows: u32,
    hits: u8,
    arena_width: f32,
    rng: &mut R,
) -> Result<Vec<BrickPlacement>> {
    tier_fill(hits)?;
    let columns = column_count(arena_width)?;

    let mut placements = Vec::new();
    let mut place = |row: u32, x: f32| {
        placements.push(BrickPlacement {
            row,
            center: Vec2::new(x, row_y(row)),
            hits,
        });
    };

    match strategy {
        LayoutStrategy::Grid => {
            for r in 0..rows {
                for c in 0..columns {
                    place(r, column_x(c));
                }
            }
        }
        LayoutStrategy::Staggered => {
            for r in 0..rows {
                let offset = if r % 2 == 1 { BRICK_WIDTH / 2.0 } else { 0.0 };
                for c in 0..columns {
                    let x = column_x(c) + offset;
                    if x - BRICK_WIDTH / 2.0 >= 0.0 && x + BRICK_WIDTH / 2.0 <= arena_width {
                        place(r, x);
                    }
                }
            }
        }
        LayoutStrategy::Pyramid => {
            for r in 0..PYRAMID_ROWS {
                let count = columns.saturating_sub(2 * r);
                let row_width = count as f32 * BRICK_WIDTH;
                let x0 = (arena_width - row_width) / 2.0 + BRICK_WIDTH / 2.0;
                for i in 0..count {
                    place(r, x0 + i as f32 * BRICK_WIDTH);
                }
            }
        }
        LayoutStrategy::Checker => {
            for r in 0..rows {
                for c in (0..columns).filter(|c| (r + c) % 2 == 0) {
                    place(r, column_x(c));
                }
            }
        }
        LayoutStrategy::Random => {
            for r in 0..rows {
                for c in 0..columns {
                    if rng.chance(RANDOM_FILL_CHANCE) {
                        place(r, column_x(c));
                    }
                }
            }
        }
    }

    log::info!(
        "Layout {}: {} columns, {} bricks",
        strategy.as_str(),
        columns,
        placements.len()
    );
    Ok(placements)
}
