//! Breakout Simulator
//!
//! Headless driver for the engine. Loads a map, plays it with an
//! auto-pilot paddle, then replays the recorded frames to verify that the
//! simulation is deterministic.
//!
//! ```text
//! breakout-sim [MAP] [--millis N] [--config FILE] [--dump]
//! ```
//!
//! `MAP` is a bundled map name (default `ogp`) or a path to a text map.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use breakout::{
    VERSION, MAXIMUM_TIME_DELTA,
    game::{
        events::GameEventData,
        map::{self, maps, MapConfig},
        state::GameState,
        tick::{replay, tick, Frame},
        PaddleMotionDirection,
    },
};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "breakout-sim", version, about = "Headless Breakout simulator with replay verification")]
struct Options {
    /// Bundled map name or path to a text map.
    #[arg(default_value = "ogp")]
    map: String,
    /// Simulated milliseconds to run before stopping.
    #[arg(
        long,
        value_name = "MILLISECONDS",
        default_value_t = 60_000,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    millis: i64,
    /// JSON file with map settings.
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    /// Print the final state as JSON.
    #[arg(long)]
    dump: bool,
}

fn load_config(path: Option<&str>) -> anyhow::Result<MapConfig> {
    let Some(path) = path else {
        return Ok(MapConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {path}"))
}

fn load_game(name: &str, config: &MapConfig) -> anyhow::Result<GameState> {
    if let Ok(lines) = maps::bundled_map(name) {
        return Ok(map::parse_map(lines, config)?);
    }

    let text = std::fs::read_to_string(name).with_context(|| format!("no bundled map or file named {name}"))?;
    let lines: Vec<&str> = text.lines().collect();
    map::parse_map(&lines, config).with_context(|| format!("parsing map {name}"))
}

/// Steer toward the lowest ball, the one closest to falling out.
fn autopilot(state: &GameState) -> PaddleMotionDirection {
    let Some(target) = state.balls().into_iter().max_by_key(|b| b.center().y) else {
        return PaddleMotionDirection::Stationary;
    };

    let paddle = state.paddle();
    let dx = target.center().x - paddle.top_center().x;
    let dead_zone = paddle.speed() * MAXIMUM_TIME_DELTA;
    if dx > dead_zone {
        PaddleMotionDirection::Right
    } else if dx < -dead_zone {
        PaddleMotionDirection::Left
    } else {
        PaddleMotionDirection::Stationary
    }
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("tracing subscriber already set");

    let options = Options::parse();
    let config = load_config(options.config.as_deref())?;

    info!("Breakout Simulator v{}", VERSION);
    info!("Map: {}", options.map);
    info!("Simulated time: {} ms", options.millis);

    let initial = load_game(&options.map, &config)?;
    let grid = initial.brick_grid();
    info!(
        "Grid: {}x{} cells, {} bricks",
        grid.column_count(),
        grid.row_count(),
        grid.brick_count()
    );

    // Play with the auto-pilot, recording every frame
    let mut state = initial.clone();
    let mut frames = Vec::new();
    let mut destroyed = 0;
    while state.elapsed_millis() < options.millis {
        let frame = Frame::new(autopilot(&state), MAXIMUM_TIME_DELTA);
        state.set_paddle_direction(frame.direction);
        let result = tick(&mut state, frame.elapsed_millis)?;
        frames.push(frame);

        for event in &result.events {
            match event.data {
                GameEventData::BrickDestroyed { .. } => destroyed += 1,
                GameEventData::BallLost { ball } => info!("{} lost at {} ms", ball, event.time_millis),
                GameEventData::KeyBallSpawned { ball, locked } => {
                    info!("{} carries the key to {}", ball, locked)
                }
                _ => {}
            }
        }

        if result.game_won {
            info!("Game won at {} ms", state.elapsed_millis());
            break;
        }
        if result.game_lost {
            info!("Game lost at {} ms", state.elapsed_millis());
            break;
        }
    }

    // Summary
    info!("Bricks destroyed: {}", destroyed);
    info!("Bricks left: {}", state.brick_grid().brick_count());
    info!("Balls in play: {}", state.ball_count());
    let hash = state.compute_hash();
    info!("State hash: {}", hex::encode(hash));

    // Replay the recorded frames from the initial state
    info!("Replaying {} frames", frames.len());
    let (replayed, _) = replay(initial, &frames)?;
    let replay_hash = replayed.compute_hash();
    info!("Replay hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("Replay matches the live run");
    } else {
        bail!("replay diverged from the live run");
    }

    if options.dump {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    Ok(())
}
