//! Game entities and round state types
//!
//! Balls, the paddle, bricks and bonus pickups each own one shape on the
//! surface through an `Entity`. The engine owns every collection; entities
//! never own each other.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::geom::Bounds;
use super::rng::RandomSource;
use crate::consts::*;
use crate::error::{Result, SetupError};
use crate::surface::{Fill, ShapeKind, Surface};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bricks laid out, ball being attached to the paddle
    Setup,
    /// Ball riding the paddle, waiting for the launch trigger
    AwaitingLaunch,
    /// Active gameplay
    Running,
    /// Every ball was lost, respawn pending
    LifeLost,
    /// All bricks destroyed
    Won,
    /// Out of lives
    Lost,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// One axis of a ball's heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Neg,
    Pos,
}

impl Sign {
    #[inline]
    pub fn value(self) -> f32 {
        match self {
            Sign::Neg => -1.0,
            Sign::Pos => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Sign::Neg => Sign::Pos,
            Sign::Pos => Sign::Neg,
        }
    }
}

/// Unit-axis heading; magnitude lives in `Ball::speed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub x: Sign,
    pub y: Sign,
}

impl Direction {
    pub const fn new(x: Sign, y: Sign) -> Self {
        Self { x, y }
    }

    pub fn flip_x(&mut self) {
        self.x = self.x.flipped();
    }

    pub fn flip_y(&mut self) {
        self.y = self.y.flipped();
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }
}

/// Serve heading: up and to the right
pub const SERVE_DIRECTION: Direction = Direction::new(Sign::Pos, Sign::Neg);

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: EntityId,
    pub entity: Entity,
    pub radius: f32,
    pub direction: Direction,
    /// Cleared once the round is won; a ball without speed never moves
    pub speed: Option<f32>,
}

impl Ball {
    pub fn new<S: Surface + ?Sized>(surface: &mut S, id: EntityId, center: Vec2) -> Self {
        let radius = BALL_RADIUS;
        let bounds = Bounds::from_center(center, radius * 2.0, radius * 2.0);
        Self {
            id,
            entity: Entity::spawn(surface, ShapeKind::Oval, bounds, Fill("white")),
            radius,
            direction: SERVE_DIRECTION,
            speed: Some(BALL_SPEED),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.entity.position().center()
    }

    /// Bounce off the side and top walls, then advance one tick.
    ///
    /// There is no bottom wall: leaving through the bottom is a lost ball and
    /// the engine deals with it.
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S, arena_width: f32) {
        let Some(speed) = self.speed else {
            return;
        };

        let b = self.entity.position();
        if b.x0 <= 0.0 || b.x1 >= arena_width {
            self.direction.flip_x();
        }
        if b.y0 <= 0.0 {
            self.direction.flip_y();
        }

        self.entity.move_by(surface, self.direction.as_vec2() * speed);
    }

    pub fn stop(&mut self) {
        self.speed = None;
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub id: EntityId,
    pub entity: Entity,
    pub width: f32,
    pub height: f32,
    /// Carry relation to a ball; the paddle never owns the ball
    ball: Option<EntityId>,
    attached: bool,
}

impl Paddle {
    pub fn new<S: Surface + ?Sized>(surface: &mut S, id: EntityId, center: Vec2) -> Self {
        let bounds = Bounds::from_center(center, PADDLE_WIDTH, PADDLE_HEIGHT);
        Self {
            id,
            entity: Entity::spawn(surface, ShapeKind::Rectangle, bounds, Fill("#FFB643")),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            ball: None,
            attached: false,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.entity.position().center()
    }

    pub fn set_ball(&mut self, ball: EntityId, attached: bool) {
        self.ball = Some(ball);
        self.attached = attached;
    }

    /// Stop carrying the ball; the reference stays but the ball moves on its own
    pub fn release_ball(&mut self) {
        self.attached = false;
    }

    pub fn ball(&self) -> Option<EntityId> {
        self.ball
    }

    /// The ball currently riding the paddle, if any
    pub fn carried_ball(&self) -> Option<EntityId> {
        if self.attached { self.ball } else { None }
    }

    /// Shift horizontally by `offset`, dragging the carried ball along.
    ///
    /// A move that would leave `[0, arena_width]` is rejected outright.
    /// Returns whether the paddle moved.
    pub fn move_by<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        arena_width: f32,
        offset: f32,
        carried: Option<&mut Entity>,
    ) -> bool {
        let b = self.entity.position();
        if b.x0 + offset < 0.0 || b.x1 + offset > arena_width {
            return false;
        }

        let delta = Vec2::new(offset, 0.0);
        self.entity.move_by(surface, delta);
        if self.attached {
            if let Some(ball) = carried {
                ball.move_by(surface, delta);
            }
        }
        true
    }

    /// Pull the paddle back inside `[0, arena_width]` after a host resize.
    /// Returns the applied offset.
    pub fn clamp_into<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        arena_width: f32,
        carried: Option<&mut Entity>,
    ) -> f32 {
        let b = self.entity.position();
        let offset = if b.x0 < 0.0 {
            -b.x0
        } else if b.x1 > arena_width {
            arena_width - b.x1
        } else {
            return 0.0;
        };

        log::warn!("Paddle outside arena (width {}), clamping by {}", arena_width, offset);
        let delta = Vec2::new(offset, 0.0);
        self.entity.move_by(surface, delta);
        if self.attached {
            if let Some(ball) = carried {
                ball.move_by(surface, delta);
            }
        }
        offset
    }

    /// Resize around the unchanged center
    pub fn set_width<S: Surface + ?Sized>(&mut self, surface: &mut S, width: f32) {
        self.width = width;
        let center = self.center();
        self.entity
            .set_bounds(surface, Bounds::from_center(center, self.width, self.height));
    }
}

/// Bonus effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Temporarily widens the paddle
    Expand,
    /// Spawns two extra balls
    Multiball,
}

impl BonusKind {
    pub fn fill(&self) -> Fill {
        match self {
            BonusKind::Expand => Fill("green"),
            BonusKind::Multiball => Fill("red"),
        }
    }

    /// Uniform pick between the two effects
    pub fn roll<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        if rng.next_unit() < 0.5 {
            BonusKind::Expand
        } else {
            BonusKind::Multiball
        }
    }
}

/// Narrow capability handed to bricks so they can request bonus drops
pub trait BonusSink {
    fn spawn_bonus(&mut self, at: Vec2, kind: BonusKind);
}

impl BonusSink for Vec<(Vec2, BonusKind)> {
    fn spawn_bonus(&mut self, at: Vec2, kind: BonusKind) {
        self.push((at, kind));
    }
}

/// Color per remaining-hits tier
const BRICK_TIERS: [Fill; 3] = [Fill("#4535AA"), Fill("#ED639E"), Fill("#8FE1A2")];

/// Fill for a hit-count tier; anything outside 1..=3 is a setup error
pub fn tier_fill(hits: u8) -> Result<Fill> {
    match hits {
        1..=3 => Ok(BRICK_TIERS[usize::from(hits - 1)]),
        _ => Err(SetupError::InvalidHits(hits)),
    }
}

/// Outcome of a single brick hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    Damaged { hits: u8 },
    /// Out of hits; the caller must remove the brick
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: EntityId,
    pub entity: Entity,
    hits: u8,
}

impl Brick {
    pub fn new<S: Surface + ?Sized>(
        surface: &mut S,
        id: EntityId,
        center: Vec2,
        hits: u8,
    ) -> Result<Self> {
        let fill = tier_fill(hits)?;
        let bounds = Bounds::from_center(center, BRICK_WIDTH, BRICK_HEIGHT);
        Ok(Self {
            id,
            entity: Entity::spawn(surface, ShapeKind::Rectangle, bounds, fill),
            hits,
        })
    }

    pub fn hits(&self) -> u8 {
        self.hits
    }

    /// Take one hit. At zero hits there is a `BONUS_DROP_CHANCE` roll for a
    /// bonus at the brick's center; otherwise the brick is recolored.
    pub fn hit<S, R, K>(&mut self, surface: &mut S, rng: &mut R, sink: &mut K) -> BrickHit
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
        K: BonusSink + ?Sized,
    {
        self.hits = self.hits.saturating_sub(1);
        if self.hits == 0 {
            if rng.chance(BONUS_DROP_CHANCE) {
                let kind = BonusKind::roll(rng);
                sink.spawn_bonus(self.entity.position().center(), kind);
            }
            return BrickHit::Destroyed;
        }

        // Tiers were validated on construction and hits only go down
        if let Ok(fill) = tier_fill(self.hits) {
            self.entity.restyle(surface, fill);
        }
        BrickHit::Damaged { hits: self.hits }
    }

    pub fn destroy<S: Surface + ?Sized>(self, surface: &mut S) {
        self.entity.delete(surface);
    }
}

/// A falling bonus pickup
#[derive(Debug, Clone)]
pub struct Bonus {
    pub id: EntityId,
    pub entity: Entity,
    pub kind: BonusKind,
    pub speed: f32,
}

impl Bonus {
    pub fn new<S: Surface + ?Sized>(
        surface: &mut S,
        id: EntityId,
        center: Vec2,
        kind: BonusKind,
    ) -> Self {
        let bounds = Bounds::from_center(center, BONUS_WIDTH, BONUS_HEIGHT);
        Self {
            id,
            entity: Entity::spawn(surface, ShapeKind::Rectangle, bounds, kind.fill()),
            kind,
            speed: BONUS_SPEED,
        }
    }

    /// Fall straight down
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.entity.move_by(surface, Vec2::new(0.0, self.speed));
    }
}

/// What changed during a tick or trigger, for the host to render
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    BallServed { ball: EntityId },
    BallSpawned { ball: EntityId },
    BallLost { ball: EntityId },
    BrickDamaged { brick: EntityId, hits: u8 },
    BrickDestroyed { brick: EntityId, at: Vec2 },
    BonusSpawned { bonus: EntityId, kind: BonusKind, at: Vec2 },
    BonusCollected { bonus: EntityId, kind: BonusKind },
    BonusMissed { bonus: EntityId },
    PaddleResized { width: f32 },
    LifeLost { lives_left: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;
    use crate::surface::MemorySurface;
    use proptest::prelude::*;

    fn surface() -> MemorySurface {
        MemorySurface::new(ARENA_WIDTH, ARENA_HEIGHT)
    }

    #[test]
    fn test_ball_update_moves_by_direction_times_speed() {
        let mut s = surface();
        let mut ball = Ball::new(&mut s, EntityId(1), Vec2::new(305.0, 310.0));
        ball.update(&mut s, ARENA_WIDTH);
        assert_eq!(ball.center(), Vec2::new(313.0, 302.0));
        assert_eq!(s.bounds(ball.entity.handle()), Some(ball.entity.position()));
    }

    #[test]
    fn test_ball_bounces_off_walls() {
        let mut s = surface();
        // Touching the right wall and the ceiling
        let mut ball = Ball::new(&mut s, EntityId(1), Vec2::new(600.0, 10.0));
        ball.update(&mut s, ARENA_WIDTH);
        assert_eq!(ball.direction, Direction::new(Sign::Neg, Sign::Pos));
        assert_eq!(ball.center(), Vec2::new(592.0, 18.0));

        let mut left = Ball::new(&mut s, EntityId(2), Vec2::new(10.0, 200.0));
        left.direction = Direction::new(Sign::Neg, Sign::Pos);
        left.update(&mut s, ARENA_WIDTH);
        assert_eq!(left.direction, Direction::new(Sign::Pos, Sign::Pos));
    }

    #[test]
    fn test_ball_has_no_bottom_wall() {
        let mut s = surface();
        let mut ball = Ball::new(&mut s, EntityId(1), Vec2::new(300.0, 395.0));
        ball.direction = Direction::new(Sign::Pos, Sign::Pos);
        ball.update(&mut s, ARENA_WIDTH);
        assert_eq!(ball.direction.y, Sign::Pos);
        assert_eq!(ball.center().y, 403.0);
    }

    #[test]
    fn test_stopped_ball_does_not_move() {
        let mut s = surface();
        let mut ball = Ball::new(&mut s, EntityId(1), Vec2::new(305.0, 310.0));
        ball.stop();
        let before = ball.entity.position();
        ball.update(&mut s, ARENA_WIDTH);
        assert_eq!(ball.entity.position(), before);
    }

    #[test]
    fn test_paddle_carries_attached_ball() {
        let mut s = surface();
        let mut paddle = Paddle::new(&mut s, EntityId(1), Vec2::new(305.0, PADDLE_Y));
        let mut ball = Ball::new(&mut s, EntityId(2), Vec2::new(305.0, BALL_SERVE_Y));
        paddle.set_ball(ball.id, true);

        assert!(paddle.move_by(&mut s, ARENA_WIDTH, -20.0, Some(&mut ball.entity)));
        assert_eq!(paddle.center().x, 285.0);
        assert_eq!(ball.center().x, 285.0);

        paddle.release_ball();
        assert_eq!(paddle.ball(), Some(ball.id));
        assert_eq!(paddle.carried_ball(), None);
        assert!(paddle.move_by(&mut s, ARENA_WIDTH, 20.0, Some(&mut ball.entity)));
        assert_eq!(paddle.center().x, 305.0);
        assert_eq!(ball.center().x, 285.0);
    }

    #[test]
    fn test_paddle_rejects_move_past_edge() {
        let mut s = surface();
        let mut paddle = Paddle::new(&mut s, EntityId(1), Vec2::new(45.0, PADDLE_Y));
        let before = paddle.entity.position();
        assert!(!paddle.move_by(&mut s, ARENA_WIDTH, -20.0, None));
        assert_eq!(paddle.entity.position(), before);
        assert!(paddle.move_by(&mut s, ARENA_WIDTH, -5.0, None));
        assert_eq!(paddle.entity.position().x0, 0.0);
    }

    #[test]
    fn test_paddle_clamp_into_after_resize() {
        let mut s = surface();
        let mut paddle = Paddle::new(&mut s, EntityId(1), Vec2::new(305.0, PADDLE_Y));
        let mut ball = Ball::new(&mut s, EntityId(2), Vec2::new(305.0, BALL_SERVE_Y));
        paddle.set_ball(ball.id, true);

        assert_eq!(paddle.clamp_into(&mut s, ARENA_WIDTH, Some(&mut ball.entity)), 0.0);
        assert_eq!(paddle.clamp_into(&mut s, 300.0, Some(&mut ball.entity)), -45.0);
        assert_eq!(paddle.entity.position().x1, 300.0);
        assert_eq!(ball.center().x, 260.0);
    }

    #[test]
    fn test_set_width_keeps_center() {
        let mut s = surface();
        let mut paddle = Paddle::new(&mut s, EntityId(1), Vec2::new(305.0, PADDLE_Y));
        paddle.set_width(&mut s, PADDLE_EXPANDED_WIDTH);
        assert_eq!(paddle.entity.position(), Bounds::new(245.0, 321.0, 365.0, 331.0));
        paddle.set_width(&mut s, PADDLE_WIDTH);
        assert_eq!(paddle.entity.position(), Bounds::new(265.0, 321.0, 345.0, 331.0));
    }

    #[test]
    fn test_brick_tiers() {
        assert_eq!(tier_fill(1).ok(), Some(Fill("#4535AA")));
        assert_eq!(tier_fill(3).ok(), Some(Fill("#8FE1A2")));
        assert!(matches!(tier_fill(0), Err(SetupError::InvalidHits(0))));
        assert!(matches!(tier_fill(4), Err(SetupError::InvalidHits(4))));

        let mut s = surface();
        assert!(Brick::new(&mut s, EntityId(1), Vec2::new(100.0, 50.0), 4).is_err());
        assert_eq!(s.shape_count(), 0);
    }

    #[test]
    fn test_brick_recolors_until_destroyed() {
        let mut s = surface();
        let mut rng = ScriptedRandom::constant(0.9);
        let mut drops: Vec<(Vec2, BonusKind)> = Vec::new();
        let mut brick = Brick::new(&mut s, EntityId(1), Vec2::new(100.0, 50.0), 3).unwrap();

        assert_eq!(brick.hit(&mut s, &mut rng, &mut drops), BrickHit::Damaged { hits: 2 });
        assert_eq!(s.shape(brick.entity.handle()).map(|x| x.fill), Some(Fill("#ED639E")));
        assert_eq!(brick.hit(&mut s, &mut rng, &mut drops), BrickHit::Damaged { hits: 1 });
        assert_eq!(brick.hit(&mut s, &mut rng, &mut drops), BrickHit::Destroyed);
        assert!(drops.is_empty());
    }

    #[test]
    fn test_destroyed_brick_drops_bonus_at_center() {
        let mut s = surface();
        let mut rng = ScriptedRandom::constant(0.1);
        let mut drops: Vec<(Vec2, BonusKind)> = Vec::new();
        let mut brick = Brick::new(&mut s, EntityId(1), Vec2::new(117.5, 76.0), 1).unwrap();

        assert_eq!(brick.hit(&mut s, &mut rng, &mut drops), BrickHit::Destroyed);
        assert_eq!(drops, vec![(Vec2::new(117.5, 76.0), BonusKind::Expand)]);
    }

    #[test]
    fn test_bonus_kind_roll() {
        assert_eq!(BonusKind::roll(&mut ScriptedRandom::constant(0.2)), BonusKind::Expand);
        assert_eq!(BonusKind::roll(&mut ScriptedRandom::constant(0.7)), BonusKind::Multiball);
    }

    #[test]
    fn test_bonus_falls_straight_down() {
        let mut s = surface();
        let center = Vec2::new(100.0, 100.0);
        let mut bonus = Bonus::new(&mut s, EntityId(1), center, BonusKind::Multiball);
        bonus.update(&mut s);
        bonus.update(&mut s);
        assert_eq!(bonus.entity.position().center(), Vec2::new(100.0, 110.0));
        assert_eq!(s.shape(bonus.entity.handle()).map(|x| x.fill), Some(Fill("red")));
    }

    proptest! {
        #[test]
        fn prop_brick_hits_never_increase(start in 1u8..=3, roll in 0.0f64..1.0) {
            let mut s = surface();
            let mut rng = ScriptedRandom::constant(roll);
            let mut drops: Vec<(Vec2, BonusKind)> = Vec::new();
            let mut brick = Brick::new(&mut s, EntityId(1), Vec2::new(100.0, 50.0), start).unwrap();

            let mut last = brick.hits();
            loop {
                let outcome = brick.hit(&mut s, &mut rng, &mut drops);
                prop_assert!(brick.hits() < last);
                last = brick.hits();
                if outcome == BrickHit::Destroyed {
                    prop_assert_eq!(brick.hits(), 0);
                    break;
                }
            }
            prop_assert!(drops.len() <= 1);
        }

        #[test]
        fn prop_paddle_never_leaves_arena(offsets in prop::collection::vec(-300i32..300, 1..40)) {
            let mut s = surface();
            let mut paddle = Paddle::new(&mut s, EntityId(1), Vec2::new(305.0, PADDLE_Y));
            for offset in offsets {
                let before = paddle.entity.position();
                let moved = paddle.move_by(&mut s, ARENA_WIDTH, offset as f32, None);
                let after = paddle.entity.position();
                prop_assert!(after.within_width(ARENA_WIDTH));
                if !moved {
                    prop_assert_eq!(after, before);
                }
            }
        }

        #[test]
        fn prop_set_width_preserves_center(cx in 60i32..550, width in 10u32..150) {
            let mut s = surface();
            let center = Vec2::new(cx as f32, PADDLE_Y);
            let mut paddle = Paddle::new(&mut s, EntityId(1), center);
            paddle.set_width(&mut s, (width * 2) as f32);
            prop_assert_eq!(paddle.center(), center);
        }
    }
}
