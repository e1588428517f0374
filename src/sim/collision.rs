//! Ball collision resolution
//!
//! Collisions are discrete: each tick the engine gathers every entity whose
//! box overlaps the ball's box and hands them here. Resolution only changes
//! the ball's heading; movement happens later in `Ball::update`.

use super::entity::{EntityId, EntityKind};
use super::geom::Bounds;
use super::state::{Ball, Direction, Sign};

/// An entity overlapping a ball this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: EntityId,
    pub kind: EntityKind,
    pub bounds: Bounds,
}

/// New heading for a ball centered at `ball_x` touching `contacts`.
///
/// Two or more contacts always flip vertically; multi-body angles are not
/// resolved. A single contact deflects sideways when the ball's center is
/// past one of its edges, otherwise it flips vertically.
pub fn deflect(direction: Direction, ball_x: f32, contacts: &[Contact]) -> Direction {
    let mut direction = direction;
    match contacts {
        [] => {}
        [only] => {
            if ball_x > only.bounds.x1 {
                direction.x = Sign::Pos;
            } else if ball_x < only.bounds.x0 {
                direction.x = Sign::Neg;
            } else {
                direction.flip_y();
            }
        }
        _ => direction.flip_y(),
    }
    direction
}

/// Apply `contacts` to `ball` and return the bricks it struck, in contact order
pub fn resolve(ball: &mut Ball, contacts: &[Contact]) -> Vec<EntityId> {
    ball.direction = deflect(ball.direction, ball.center().x, contacts);

    contacts
        .iter()
        .filter(|c| c.kind == EntityKind::Brick)
        .map(|c| c.id)
        .collect()
}
