//! Round orchestration and the fixed tick
//!
//! The host calls `tick()` at a fixed cadence and wires its input events to
//! the trigger methods. Each tick:
//! 1. clamps the paddle after a host resize, then fires due timers
//!    (expand revert, respawn)
//! 2. while running: resolves ball collisions, checks for a cleared board,
//!    advances balls, drops lost ones, then advances falling bonuses
//! 3. reports what changed as a list of `GameEvent`s

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bonus::{self, BonusFate};
use super::collision::{self, Contact};
use super::entity::{EntityId, EntityKind, Registry};
use super::layout;
use super::rng::RandomSource;
use super::state::{
    Ball, Bonus, BonusKind, Brick, BrickHit, Direction, GameEvent, GamePhase, Paddle, Sign,
};
use super::timer::{Scheduler, TimedAction};
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;
use crate::surface::{ShapeHandle, Surface};

/// Owns every entity and drives the round state machine
pub struct GameEngine<S: Surface, R: RandomSource> {
    surface: S,
    rng: R,
    settings: Settings,
    phase: GamePhase,
    lives: u8,
    /// Simulation tick counter
    time_ticks: u64,
    paddle: Paddle,
    /// Entity collections, keyed by id for stable iteration order
    balls: BTreeMap<EntityId, Ball>,
    bricks: BTreeMap<EntityId, Brick>,
    bonuses: BTreeMap<EntityId, Bonus>,
    registry: Registry,
    timers: Scheduler,
    next_id: u32,
    /// Arena width seen at the last tick; a change means the host resized
    arena_width: f32,
}

impl<S: Surface> GameEngine<S, Pcg32> {
    /// Engine with a PCG stream seeded from `settings.seed` (or entropy)
    pub fn seeded(surface: S, settings: &Settings) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Round seed: {}", seed);
        Self::new(surface, Pcg32::seed_from_u64(seed), settings)
    }
}

impl<S: Surface, R: RandomSource> GameEngine<S, R> {
    /// Lay out bricks, place the paddle and serve the first ball.
    ///
    /// Fails fast on bad settings or layout geometry; nothing after this
    /// point returns an error.
    pub fn new(mut surface: S, mut rng: R, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let arena = surface.arena();
        let placements = layout::generate(
            settings.layout,
            settings.rows,
            settings.brick_hits,
            arena.width,
            &mut rng,
        )?;

        let paddle = Paddle::new(
            &mut surface,
            EntityId(1),
            Vec2::new(arena.width / 2.0, PADDLE_Y),
        );
        let mut registry = Registry::new();
        registry.insert(paddle.entity.handle(), paddle.id, EntityKind::Paddle);

        let mut engine = Self {
            surface,
            rng,
            settings: settings.clone(),
            phase: GamePhase::Setup,
            lives: settings.lives,
            time_ticks: 0,
            paddle,
            balls: BTreeMap::new(),
            bricks: BTreeMap::new(),
            bonuses: BTreeMap::new(),
            registry,
            timers: Scheduler::new(),
            next_id: 2,
            arena_width: arena.width,
        };

        for placement in placements {
            engine.add_brick(placement.center, placement.hits)?;
        }

        let mut events = Vec::new();
        engine.setup_round(&mut events);
        log::info!(
            "Round ready: {} bricks, {} lives",
            engine.bricks.len(),
            engine.lives
        );
        log::debug!("{} collision shapes registered", engine.registry.len());
        Ok(engine)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn set_phase(&mut self, to: GamePhase, events: &mut Vec<GameEvent>) {
        let from = self.phase;
        if from != to {
            log::info!("Phase {:?} -> {:?}", from, to);
            self.phase = to;
            events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Place a brick. Fails only for a hit count without a color tier.
    pub fn add_brick(&mut self, center: Vec2, hits: u8) -> Result<EntityId> {
        let id = self.allocate_id();
        let brick = Brick::new(&mut self.surface, id, center, hits)?;
        self.registry.insert(brick.entity.handle(), id, EntityKind::Brick);
        self.bricks.insert(id, brick);
        Ok(id)
    }

    /// Drop a bonus pickup at `center`
    pub fn spawn_bonus(&mut self, center: Vec2, kind: BonusKind) -> EntityId {
        let id = self.allocate_id();
        let bonus = Bonus::new(&mut self.surface, id, center, kind);
        self.registry.insert(bonus.entity.handle(), id, EntityKind::Bonus);
        self.bonuses.insert(id, bonus);
        log::debug!("Bonus {:?} spawned at {}", kind, center);
        id
    }

    /// Replace every ball with one riding the paddle, then await launch
    fn setup_round(&mut self, events: &mut Vec<GameEvent>) {
        self.set_phase(GamePhase::Setup, events);

        for (_, ball) in std::mem::take(&mut self.balls) {
            ball.entity.delete(&mut self.surface);
        }

        let id = self.allocate_id();
        let x = self.paddle.center().x;
        let ball = Ball::new(&mut self.surface, id, Vec2::new(x, BALL_SERVE_Y));
        self.paddle.set_ball(id, true);
        self.balls.insert(id, ball);
        events.push(GameEvent::BallServed { ball: id });

        self.set_phase(GamePhase::AwaitingLaunch, events);
    }

    // === Input triggers ===

    pub fn on_move_left(&mut self) -> bool {
        self.move_paddle(-self.settings.paddle_step)
    }

    pub fn on_move_right(&mut self) -> bool {
        self.move_paddle(self.settings.paddle_step)
    }

    fn move_paddle(&mut self, offset: f32) -> bool {
        let width = self.surface.arena().width;
        let carried = self
            .paddle
            .carried_ball()
            .and_then(|id| self.balls.get_mut(&id))
            .map(|ball| &mut ball.entity);
        self.paddle.move_by(&mut self.surface, width, offset, carried)
    }

    /// Release the served ball. Ignored outside `AwaitingLaunch`.
    pub fn on_launch(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::AwaitingLaunch {
            return events;
        }
        self.paddle.release_ball();
        self.set_phase(GamePhase::Running, &mut events);
        events
    }

    // === Tick ===

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.time_ticks += 1;

        let width = self.surface.arena().width;
        if width != self.arena_width {
            self.arena_width = width;
            self.clamp_paddle(width);
        }

        for action in self.timers.take_due(self.time_ticks) {
            self.fire(action, &mut events);
        }

        if self.phase == GamePhase::Running {
            self.step(&mut events);
        }

        events
    }

    /// Pull the paddle back inside a resized arena.
    ///
    /// Only runs on resize: an expanded paddle may overhang a wall and must
    /// shrink back around the same center.
    fn clamp_paddle(&mut self, width: f32) {
        let carried = self
            .paddle
            .carried_ball()
            .and_then(|id| self.balls.get_mut(&id))
            .map(|ball| &mut ball.entity);
        self.paddle.clamp_into(&mut self.surface, width, carried);
    }

    fn fire(&mut self, action: TimedAction, events: &mut Vec<GameEvent>) {
        match action {
            TimedAction::RevertPaddleWidth => {
                self.paddle.set_width(&mut self.surface, PADDLE_WIDTH);
                log::debug!("Paddle width reverted to {}", PADDLE_WIDTH);
                events.push(GameEvent::PaddleResized { width: PADDLE_WIDTH });
            }
            TimedAction::Respawn => {
                if self.phase == GamePhase::LifeLost {
                    self.setup_round(events);
                }
            }
        }
    }

    fn step(&mut self, events: &mut Vec<GameEvent>) {
        self.resolve_collisions(events);

        if self.bricks.is_empty() {
            for ball in self.balls.values_mut() {
                ball.stop();
            }
            self.set_phase(GamePhase::Won, events);
            return;
        }

        let arena = self.surface.arena();
        let mut lost = Vec::new();
        for (&id, ball) in self.balls.iter_mut() {
            if ball.entity.position().y1 >= arena.height {
                lost.push(id);
            } else {
                ball.update(&mut self.surface, arena.width);
            }
        }
        for id in lost {
            if let Some(ball) = self.balls.remove(&id) {
                ball.entity.delete(&mut self.surface);
                events.push(GameEvent::BallLost { ball: id });
            }
        }

        if self.balls.is_empty() {
            self.lose_life(events);
        } else {
            self.advance_bonuses(events);
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        match self.lives.checked_sub(1) {
            Some(left) => {
                self.lives = left;
                events.push(GameEvent::LifeLost { lives_left: left });
                self.set_phase(GamePhase::LifeLost, events);
                let fire_at = self.time_ticks + self.settings.respawn_ticks();
                self.timers.schedule(fire_at, TimedAction::Respawn);
            }
            None => self.set_phase(GamePhase::Lost, events),
        }
    }

    /// Typed view of an overlapping shape; `None` for balls and stale handles
    fn contact(&self, handle: ShapeHandle) -> Option<Contact> {
        let (id, kind) = self.registry.resolve(handle)?;
        let bounds = match kind {
            EntityKind::Paddle => Some(self.paddle.entity.position()),
            EntityKind::Brick => self.bricks.get(&id).map(|b| b.entity.position()),
            EntityKind::Bonus => self.bonuses.get(&id).map(|b| b.entity.position()),
        };
        if bounds.is_none() {
            log::trace!("Skipping stale {:?} {:?}", kind, id);
        }
        bounds.map(|bounds| Contact { id, kind, bounds })
    }

    fn resolve_collisions(&mut self, events: &mut Vec<GameEvent>) {
        let ids: Vec<EntityId> = self.balls.keys().copied().collect();
        for id in ids {
            let Some(area) = self.balls.get(&id).map(|b| b.entity.position()) else {
                continue;
            };
            let contacts: Vec<Contact> = self
                .surface
                .query_overlapping(&area)
                .into_iter()
                .filter_map(|handle| self.contact(handle))
                .collect();
            if contacts.is_empty() {
                continue;
            }

            let struck = match self.balls.get_mut(&id) {
                Some(ball) => collision::resolve(ball, &contacts),
                None => continue,
            };

            let mut drops: Vec<(Vec2, BonusKind)> = Vec::new();
            for brick in struck {
                self.hit_brick(brick, &mut drops, events);
            }
            for (at, kind) in drops {
                let bonus = self.spawn_bonus(at, kind);
                events.push(GameEvent::BonusSpawned { bonus, kind, at });
            }
        }
    }

    fn hit_brick(
        &mut self,
        id: EntityId,
        drops: &mut Vec<(Vec2, BonusKind)>,
        events: &mut Vec<GameEvent>,
    ) {
        let Some(brick) = self.bricks.get_mut(&id) else {
            log::trace!("Brick {:?} already destroyed this tick", id);
            return;
        };

        match brick.hit(&mut self.surface, &mut self.rng, drops) {
            BrickHit::Damaged { hits } => {
                events.push(GameEvent::BrickDamaged { brick: id, hits });
            }
            BrickHit::Destroyed => {
                if let Some(brick) = self.bricks.remove(&id) {
                    let at = brick.entity.position().center();
                    self.registry.remove(brick.entity.handle());
                    brick.destroy(&mut self.surface);
                    log::debug!("Brick {:?} destroyed, {} left", id, self.bricks.len());
                    events.push(GameEvent::BrickDestroyed { brick: id, at });
                }
            }
        }
    }

    fn advance_bonuses(&mut self, events: &mut Vec<GameEvent>) {
        let paddle = self.paddle.entity.position();
        let height = self.surface.arena().height;
        let retired = bonus::advance(
            &mut self.bonuses,
            &mut self.registry,
            &mut self.surface,
            &paddle,
            height,
        );

        for (id, fate) in retired {
            match fate {
                BonusFate::Collected(kind) => {
                    events.push(GameEvent::BonusCollected { bonus: id, kind });
                    self.activate_bonus(kind, events);
                }
                BonusFate::Missed => events.push(GameEvent::BonusMissed { bonus: id }),
            }
        }
    }

    fn activate_bonus(&mut self, kind: BonusKind, events: &mut Vec<GameEvent>) {
        log::debug!("Bonus {:?} activated at tick {}", kind, self.time_ticks);
        match kind {
            BonusKind::Expand => {
                if self.paddle.width != PADDLE_EXPANDED_WIDTH {
                    self.paddle.set_width(&mut self.surface, PADDLE_EXPANDED_WIDTH);
                    events.push(GameEvent::PaddleResized { width: PADDLE_EXPANDED_WIDTH });
                }
                let fire_at = self.time_ticks + self.settings.expand_ticks();
                self.timers.extend(fire_at, TimedAction::RevertPaddleWidth);
                if let Some(until) = self.timers.pending(TimedAction::RevertPaddleWidth) {
                    log::debug!("Paddle expanded until tick {}", until);
                }
            }
            BonusKind::Multiball => {
                for _ in 0..2 {
                    let ball = self.spawn_extra_ball();
                    events.push(GameEvent::BallSpawned { ball });
                }
            }
        }
    }

    /// Free ball launched upward from the paddle with a random sideways heading
    fn spawn_extra_ball(&mut self) -> EntityId {
        let id = self.allocate_id();
        let x = self.paddle.center().x;
        let mut ball = Ball::new(&mut self.surface, id, Vec2::new(x, BALL_SERVE_Y));
        ball.direction = Direction::new(self.rng.pick_sign(), Sign::Neg);
        self.balls.insert(id, ball);
        id
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.len()
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values()
    }

    pub fn bonuses(&self) -> impl Iterator<Item = &Bonus> {
        self.bonuses.values()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Centered message for the current phase
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Setup | GamePhase::AwaitingLaunch => Some("Press Enter to start"),
            GamePhase::Won => Some("You win! You the Breaker of Bricks."),
            GamePhase::Lost => Some("You Lose! Game Over!"),
            GamePhase::Running | GamePhase::LifeLost => None,
        }
    }

    pub fn hud(&self) -> String {
        format!("Lives: {}", self.lives)
    }
}
