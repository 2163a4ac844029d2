//! Simulation Tick
//!
//! Advances a game by an arbitrary number of milliseconds. Long ticks are
//! cut into sub-steps of at most [`MAXIMUM_TIME_DELTA`] so a fast ball
//! cannot skip over a brick row between collision checks.
//!
//! The engine is deterministic: integer math only, balls processed in id
//! order, no clocks or randomness. Replaying the same frames from the same
//! initial state always reaches the same state hash.

use serde::{Serialize, Deserialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;
use tracing::info;

use crate::error::{BreakoutError, Result};
use crate::game::behavior;
use crate::game::events::GameEvent;
use crate::game::paddle::PaddleMotionDirection;
use crate::game::state::GameState;

/// Longest slice of time simulated in one sub-step.
pub const MAXIMUM_TIME_DELTA: i64 = 20;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// No bricks left
    pub game_won: bool,
    /// No balls left
    pub game_lost: bool,
}

impl TickResult {
    /// Won or lost.
    pub fn game_over(&self) -> bool {
        self.game_won || self.game_lost
    }
}

/// One recorded input: a paddle direction held for some milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Direction held during the frame
    pub direction: PaddleMotionDirection,
    /// Length of the frame
    pub elapsed_millis: i64,
}

impl Frame {
    /// Create a frame.
    pub fn new(direction: PaddleMotionDirection, elapsed_millis: i64) -> Self {
        Self { direction, elapsed_millis }
    }
}

/// Advance the game by `elapsed_millis`.
///
/// # Determinism
///
/// Each sub-step:
/// - moves the paddle first
/// - then moves every ball present at the start of the sub-step, in id
///   order; balls added during the sub-step wait for the next one
/// - never reads a clock or floats
pub fn tick(state: &mut GameState, elapsed_millis: i64) -> Result<TickResult> {
    if elapsed_millis < 0 {
        return Err(BreakoutError::NegativeElapsedTime(elapsed_millis));
    }

    let mut remaining = elapsed_millis;
    while remaining > 0 {
        let dt = remaining.min(MAXIMUM_TIME_DELTA);
        sub_step(state, dt);
        remaining -= dt;
    }

    Ok(TickResult {
        events: state.take_events(),
        game_won: state.is_game_won(),
        game_lost: state.is_game_lost(),
    })
}

fn sub_step(state: &mut GameState, dt: i64) {
    // 1. Move the paddle
    state.paddle_mut().tick(dt);

    // 2. Move each ball from a snapshot of the ids
    for id in state.ball_ids() {
        #[cfg(feature = "debug-tracing")]
        trace!(ball = %id, dt, "ball sub-step");

        behavior::update(state, id, dt);
    }

    // 3. Advance the clock
    state.advance_clock(dt);
}

/// Replay a list of frames against an initial state.
///
/// Stops early once the game is over. Returns the final state and every
/// event emitted along the way.
pub fn replay(initial_state: GameState, frames: &[Frame]) -> Result<(GameState, Vec<GameEvent>)> {
    let mut state = initial_state;
    let mut all_events = state.take_events();

    for frame in frames {
        state.set_paddle_direction(frame.direction);
        let result = tick(&mut state, frame.elapsed_millis)?;
        let (over, won) = (result.game_over(), result.game_won);
        all_events.extend(result.events);

        if over {
            info!(elapsed = state.elapsed_millis(), won, "game over during replay");
            break;
        }
    }

    Ok((state, all_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shapes::Circle;
    use crate::core::vec2::{Point, Vector};
    use crate::game::behavior::BallBehavior;
    use crate::game::events::GameEventData;
    use crate::game::grid::BrickGrid;
    use proptest::prelude::*;

    fn game() -> GameState {
        let mut grid = BrickGrid::new(10, 10, 10000, 2000).unwrap();
        for column in 0..10 {
            grid.add_standard_brick(Point::new(column, 1)).unwrap();
        }
        grid.add_sturdy_brick(Point::new(4, 2), 3).unwrap();
        grid.add_speed_up_brick(Point::new(6, 2)).unwrap();
        let mut state = GameState::new(grid, 10000, 100).unwrap();
        let ball = Circle::new(Point::new(50000, 15000), 500).unwrap();
        state.add_ball(ball, Vector::new(25, -25), BallBehavior::Standard).unwrap();
        state
    }

    #[test]
    fn test_negative_elapsed_rejected() {
        let mut state = game();
        let before = state.clone();
        assert!(matches!(tick(&mut state, -1), Err(BreakoutError::NegativeElapsedTime(-1))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_zero_tick_is_noop() {
        let mut state = game();
        state.take_events();
        let before = state.compute_hash();
        let result = tick(&mut state, 0).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(state.compute_hash(), before);
    }

    #[test]
    fn test_paddle_moves_before_balls() {
        let mut state = game();
        state.set_paddle_direction(PaddleMotionDirection::Right);
        tick(&mut state, 20).unwrap();
        assert_eq!(state.paddle().top_center().x, 52000);
        assert_eq!(state.elapsed_millis(), 20);
    }

    #[test]
    fn test_tick_determinism() {
        let mut a = game();
        let mut b = game();
        for _ in 0..200 {
            tick(&mut a, 33).unwrap();
            tick(&mut b, 33).unwrap();
            assert_eq!(a.compute_hash(), b.compute_hash());
        }
    }

    #[test]
    fn test_ball_breaks_bricks() {
        let mut state = game();
        let bricks_before = state.bricks().len();
        let mut destroyed = 0;
        for _ in 0..100 {
            let result = tick(&mut state, 100).unwrap();
            destroyed += result
                .events
                .iter()
                .filter(|e| matches!(e.data, GameEventData::BrickDestroyed { .. }))
                .count();
            if result.game_over() {
                break;
            }
        }
        assert!(destroyed > 0);
        assert_eq!(state.bricks().len(), bricks_before - destroyed);
    }

    #[test]
    fn test_replay_matches_live_run() {
        let frames = vec![
            Frame::new(PaddleMotionDirection::Left, 200),
            Frame::new(PaddleMotionDirection::Stationary, 150),
            Frame::new(PaddleMotionDirection::Right, 400),
        ];

        let mut live = game();
        for frame in &frames {
            live.set_paddle_direction(frame.direction);
            tick(&mut live, frame.elapsed_millis).unwrap();
        }

        let (replayed, events) = replay(game(), &frames).unwrap();
        assert_eq!(replayed.compute_hash(), live.compute_hash());
        assert!(matches!(events[0].data, GameEventData::BallAdded { .. }));
    }

    #[test]
    fn test_replay_stops_at_game_over() {
        // A lone ball falling beside the paddle is lost in the first frame
        let grid = {
            let mut g = BrickGrid::new(10, 10, 10000, 2000).unwrap();
            g.add_standard_brick(Point::new(0, 0)).unwrap();
            g
        };
        let mut initial = GameState::new(grid, 10000, 100).unwrap();
        let ball = Circle::new(Point::new(5000, 20300), 500).unwrap();
        let id = initial.add_ball(ball, Vector::new(0, 50), BallBehavior::Standard).unwrap();

        let frames = vec![Frame::new(PaddleMotionDirection::Stationary, 20); 5];
        let (state, events) = replay(initial, &frames).unwrap();

        assert!(state.is_game_lost());
        assert_eq!(state.elapsed_millis(), 20);
        assert_eq!(events.last().map(|e| &e.data), Some(&GameEventData::BallLost { ball: id }));
    }

    proptest! {
        #[test]
        fn test_sub_stepping_is_transparent(ms in 0i64..400) {
            // One long tick equals the same time fed in slices of the max delta
            let mut whole = game();
            tick(&mut whole, ms).unwrap();

            let mut sliced = game();
            let mut left = ms;
            while left > 0 {
                let dt = left.min(MAXIMUM_TIME_DELTA);
                tick(&mut sliced, dt).unwrap();
                left -= dt;
            }

            prop_assert_eq!(whole.compute_hash(), sliced.compute_hash());
        }
    }
}
