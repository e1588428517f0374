//! Brick Breaker headless runner
//!
//! Drives a round on an in-memory surface with a simple autopilot and
//! prints every game event as a JSON line.
//!
//! Usage: `brick-breaker [settings.json] [max_ticks]`

use brick_breaker::consts::*;
use brick_breaker::sim::{GameEngine, GameEvent, GamePhase, RandomSource};
use brick_breaker::{MemorySurface, Settings};

const DEFAULT_MAX_TICKS: u64 = 20_000;

fn main() {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let surface = MemorySurface::new(ARENA_WIDTH, ARENA_HEIGHT);
    let mut engine = match GameEngine::seeded(surface, &settings) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Round setup failed: {}", e);
            std::process::exit(1);
        }
    };

    while engine.time_ticks() < max_ticks && !engine.phase().is_terminal() {
        if engine.phase() == GamePhase::AwaitingLaunch {
            emit(&engine.on_launch());
        }
        autopilot(&mut engine);
        emit(&engine.tick());
    }

    log::info!(
        "Finished after {} ticks: {:?}, {} lives, {} bricks left",
        engine.time_ticks(),
        engine.phase(),
        engine.lives(),
        engine.bricks_remaining()
    );
    if let Some(banner) = engine.banner() {
        println!("{}", banner);
    }
}

/// Step the paddle toward the lowest ball
fn autopilot<R: RandomSource>(engine: &mut GameEngine<MemorySurface, R>) {
    let Some(target) = engine
        .balls()
        .map(|ball| ball.center())
        .max_by(|a, b| a.y.total_cmp(&b.y))
    else {
        return;
    };

    let step = engine.settings().paddle_step;
    let offset = target.x - engine.paddle().center().x;
    if offset > step / 2.0 {
        engine.on_move_right();
    } else if offset < -step / 2.0 {
        engine.on_move_left();
    }
}

fn emit(events: &[GameEvent]) {
    for event in events {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Failed to serialize {:?}: {}", event, e),
        }
    }
}
