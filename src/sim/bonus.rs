//! Falling bonus pickups
//!
//! Each tick every live bonus drops, then is either caught by the paddle,
//! lost past the bottom of the arena, or left falling. Finished bonuses are
//! collected during the pass and removed afterwards.

use std::collections::BTreeMap;

use super::entity::{EntityId, Registry};
use super::geom::Bounds;
use super::state::{Bonus, BonusKind};
use crate::surface::Surface;

/// How a bonus left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusFate {
    Collected(BonusKind),
    Missed,
}

/// Advance every bonus one tick and retire the ones that are done.
///
/// Returns retired bonuses in id order; the caller applies collected effects.
pub fn advance<S: Surface + ?Sized>(
    bonuses: &mut BTreeMap<EntityId, Bonus>,
    registry: &mut Registry,
    surface: &mut S,
    paddle: &Bounds,
    arena_height: f32,
) -> Vec<(EntityId, BonusFate)> {
    let mut retired = Vec::new();

    for (&id, bonus) in bonuses.iter_mut() {
        bonus.update(surface);
        let b = bonus.entity.position();
        if b.intersects(paddle) {
            retired.push((id, BonusFate::Collected(bonus.kind)));
        } else if b.y0 > arena_height {
            retired.push((id, BonusFate::Missed));
        }
    }

    for &(id, _) in &retired {
        if let Some(bonus) = bonuses.remove(&id) {
            registry.remove(bonus.entity.handle());
            bonus.entity.delete(surface);
        }
    }

    retired
}
