//! Ball Behaviors
//!
//! A ball's behavior decides how it reacts to surfaces. All behaviors share
//! one motion-resolution loop; they differ only in their bounce handlers.
//!
//! ```text
//!                 Weakening brick            Strengthening brick
//!   Standard ───────────────────► Weak(5 s)   Strong(5 s) ◄──────── Standard
//!      ▲                             │            │
//!      └──────── timer runs out ─────┴────────────┘
//!
//!   Standard ── hits linked Master ──► spawns KeyBall(L) balls
//!   KeyBall(L) ── destroys L ──► Standard
//! ```
//!
//! ## Motion resolution
//!
//! For a slice of `ms` milliseconds:
//! 1. Find the earliest collision among the walls, the paddle and the
//!    brick grid.
//! 2. If there is none within `ms`, move the full distance and stop.
//! 3. Otherwise let the behavior's bounce handler move the ball to the
//!    impact point and react, then continue with the time left.
//! 4. Whenever the ball's centre leaves the playfield it is lost.

use serde::{Serialize, Deserialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;
use tracing::debug;

use crate::core::color::Color;
use crate::core::vec2::Vector;
use crate::error::{BreakoutError, Result};
use crate::game::ball::BallId;
use crate::game::brick::{self, BrickId};
use crate::game::collision::{earliest_collision, BrickCollision, Collision, Timed};
use crate::game::events::GameEventData;
use crate::game::state::GameState;

/// How long weak and strong behaviors last.
pub const TEMPORARY_DURATION: i64 = 5000;

/// Color of a strong ball.
pub const STRONG_COLOR: Color = Color::new(0, 128, 255);

/// Collisions resolved per slice before the rest of the slice is taken
/// as free flight.
const MAX_COLLISIONS_PER_SLICE: usize = 64;

// =============================================================================
// BEHAVIOR
// =============================================================================

/// The behavior state of a ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallBehavior {
    /// Bounces off everything and hits bricks normally
    Standard,
    /// Bounces off bricks without damaging them, for a while
    Weak {
        /// Milliseconds until the ball reverts to standard
        time_left: i64,
    },
    /// Strong-hits bricks and passes through the ones it destroys, for a while
    Strong {
        /// Milliseconds until the ball reverts to standard
        time_left: i64,
    },
    /// Carries the key to one locked brick
    KeyBall {
        /// The locked brick this ball can open
        locked: BrickId,
        /// Speed-ups (positive) or slow-downs (negative) applied per wall bounce
        speed_modifier: i64,
    },
}

impl Default for BallBehavior {
    fn default() -> Self {
        BallBehavior::Standard
    }
}

impl BallBehavior {
    /// Weak behavior with the default duration.
    pub fn weak() -> Self {
        BallBehavior::Weak { time_left: TEMPORARY_DURATION }
    }

    /// Strong behavior with the default duration.
    pub fn strong() -> Self {
        BallBehavior::Strong { time_left: TEMPORARY_DURATION }
    }

    /// Weak behavior lasting `duration` milliseconds.
    pub fn weak_for(duration: i64) -> Result<Self> {
        if duration < 0 {
            return Err(BreakoutError::NegativeDuration(duration));
        }
        Ok(BallBehavior::Weak { time_left: duration })
    }

    /// Strong behavior lasting `duration` milliseconds.
    pub fn strong_for(duration: i64) -> Result<Self> {
        if duration < 0 {
            return Err(BreakoutError::NegativeDuration(duration));
        }
        Ok(BallBehavior::Strong { time_left: duration })
    }

    /// Key-ball behavior for `locked`. The speed modifier is filled in when
    /// the ball is added to a game.
    pub fn key_ball(locked: BrickId) -> Self {
        BallBehavior::KeyBall { locked, speed_modifier: 0 }
    }

    /// Color a renderer should draw the ball with.
    pub fn color(&self) -> Color {
        match self {
            BallBehavior::Standard => Color::WHITE,
            BallBehavior::Weak { .. } => Color::GRAY,
            BallBehavior::Strong { .. } => STRONG_COLOR,
            BallBehavior::KeyBall { .. } => Color::RED,
        }
    }

    /// Remaining time of a temporary behavior.
    pub fn time_left(&self) -> Option<i64> {
        match *self {
            BallBehavior::Weak { time_left } | BallBehavior::Strong { time_left } => Some(time_left),
            _ => None,
        }
    }

    /// Locked brick bound to a key ball.
    pub fn locked_brick(&self) -> Option<BrickId> {
        match *self {
            BallBehavior::KeyBall { locked, .. } => Some(locked),
            _ => None,
        }
    }

    /// Speed modifier of a key ball.
    pub fn speed_modifier(&self) -> Option<i64> {
        match *self {
            BallBehavior::KeyBall { speed_modifier, .. } => Some(speed_modifier),
            _ => None,
        }
    }

    fn with_time_left(self, time_left: i64) -> Self {
        match self {
            BallBehavior::Weak { .. } => BallBehavior::Weak { time_left },
            BallBehavior::Strong { .. } => BallBehavior::Strong { time_left },
            other => other,
        }
    }
}

// =============================================================================
// UPDATE
// =============================================================================

/// Advance `ball` by `elapsed_millis` under its current behavior.
pub(crate) fn update(state: &mut GameState, ball: BallId, elapsed_millis: i64) {
    let Some(behavior) = state.ball(ball).map(|b| *b.behavior()) else {
        return;
    };

    match behavior.time_left() {
        Some(time_left) => update_temporary(state, ball, behavior, time_left, elapsed_millis),
        None => resolve_motion(state, ball, elapsed_millis),
    }
}

/// A temporary behavior runs for at most `time_left`; whatever remains of
/// the slice is spent under the standard behavior.
fn update_temporary(
    state: &mut GameState,
    ball: BallId,
    behavior: BallBehavior,
    time_left: i64,
    elapsed_millis: i64,
) {
    if time_left > elapsed_millis {
        state.set_ball_behavior(ball, behavior.with_time_left(time_left - elapsed_millis));
        resolve_motion(state, ball, elapsed_millis);
        return;
    }

    state.set_ball_behavior(ball, behavior.with_time_left(0));
    resolve_motion(state, ball, time_left);
    if state.ball(ball).is_none() {
        return;
    }

    // Expiry always reverts to standard, even if a brick installed another
    // behavior during the last stretch
    state.set_ball_behavior(ball, BallBehavior::Standard);
    debug!(%ball, "temporary behavior expired");
    state.push_event(GameEventData::BehaviorExpired { ball });

    resolve_motion(state, ball, elapsed_millis - time_left);
}

/// What the ball is about to hit.
#[derive(Clone, Copy, Debug)]
enum Impact {
    Wall(Collision),
    Paddle(Collision),
    Brick(BrickCollision),
}

impl Timed for Impact {
    fn time(&self) -> i64 {
        match self {
            Impact::Wall(c) | Impact::Paddle(c) => c.millis_until_collision(),
            Impact::Brick(c) => c.millis_until_collision(),
        }
    }
}

/// Earliest impact for `ball`: walls first, then the paddle, then bricks.
/// Ties go to the earlier category.
fn find_earliest_impact(state: &GameState, ball: BallId) -> Option<Impact> {
    let ball = state.ball(ball)?;

    let wall = state
        .walls()
        .iter()
        .map(|w| w.find_collision(ball))
        .fold(None, earliest_collision);
    let paddle = state.paddle().find_collision(ball);
    let brick = state.brick_grid().find_earliest_collision(ball);

    let impact = earliest_collision(wall.map(Impact::Wall), paddle.map(Impact::Paddle));
    earliest_collision(impact, brick.map(Impact::Brick))
}

/// Move `ball` through `remaining` milliseconds, resolving every collision
/// on the way.
fn resolve_motion(state: &mut GameState, ball: BallId, mut remaining: i64) {
    for _ in 0..MAX_COLLISIONS_PER_SLICE {
        let Some(behavior) = state.ball(ball).map(|b| *b.behavior()) else {
            return;
        };

        match find_earliest_impact(state, ball) {
            Some(impact) if impact.time() <= remaining => {
                #[cfg(feature = "debug-tracing")]
                trace!(%ball, ?impact, remaining, "collision");

                remaining -= impact.time();
                match impact {
                    Impact::Wall(c) => bounce_off_wall(state, ball, behavior, c),
                    Impact::Paddle(c) => bounce_off_paddle(state, ball, c),
                    Impact::Brick(c) => bounce_off_brick(state, ball, behavior, c),
                }
                if check_lost(state, ball) {
                    return;
                }
            }
            _ => break,
        }
    }

    if let Some(b) = state.ball_mut(ball) {
        b.advance(remaining);
    }
    check_lost(state, ball);
}

/// Run the loss handler if the ball has left the playfield.
fn check_lost(state: &mut GameState, ball: BallId) -> bool {
    let lost = match state.ball(ball) {
        Some(b) => state.is_ball_lost(b),
        None => return true,
    };
    if lost {
        ball_lost(state, ball);
    }
    lost
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Move to the impact point and reflect off the surface normal.
fn move_and_bounce(state: &mut GameState, ball: BallId, millis: i64, kilo_normal: Vector) {
    if let Some(b) = state.ball_mut(ball) {
        b.advance(millis);
        let v = b.velocity().kilo_bounce(kilo_normal);
        b.set_velocity(v);
    }
}

fn move_only(state: &mut GameState, ball: BallId, millis: i64) {
    if let Some(b) = state.ball_mut(ball) {
        b.advance(millis);
    }
}

fn bounce_off_wall(state: &mut GameState, ball: BallId, behavior: BallBehavior, c: Collision) {
    move_and_bounce(state, ball, c.millis_until_collision(), c.kilo_normal());

    // Key balls change speed on every wall bounce
    if let BallBehavior::KeyBall { speed_modifier, .. } = behavior {
        for _ in 0..speed_modifier.abs() {
            state.change_ball_speed(ball, speed_modifier > 0);
        }
    }
}

fn bounce_off_paddle(state: &mut GameState, ball: BallId, c: Collision) {
    move_and_bounce(state, ball, c.millis_until_collision(), c.kilo_normal());
}

fn bounce_off_brick(state: &mut GameState, ball: BallId, behavior: BallBehavior, c: BrickCollision) {
    let t = c.millis_until_collision();
    match behavior {
        BallBehavior::Standard => {
            move_only(state, ball, t);
            brick::hit(state, c.brick(), ball);
            bounce(state, ball, c);
        }
        BallBehavior::Weak { .. } => {
            move_and_bounce(state, ball, t, c.kilo_normal());
        }
        BallBehavior::Strong { .. } => {
            move_only(state, ball, t);
            if brick::strong_hit(state, c.brick(), ball) {
                bounce(state, ball, c);
            }
        }
        BallBehavior::KeyBall { locked, .. } => {
            move_only(state, ball, t);
            if locked == c.brick() {
                // Opening the lock leaves the velocity untouched
                brick::hit(state, c.brick(), ball);
            } else {
                bounce(state, ball, c);
            }
        }
    }
}

fn bounce(state: &mut GameState, ball: BallId, c: BrickCollision) {
    move_and_bounce(state, ball, 0, c.kilo_normal());
}

/// The ball left the playfield: remove it. A key ball also releases its
/// locked brick so a master can issue a new key.
fn ball_lost(state: &mut GameState, ball: BallId) {
    if let Ok(lost) = state.remove_ball(ball) {
        debug!(%ball, center = %lost.center(), "ball lost");
        state.push_event(GameEventData::BallLost { ball });
    }
}

// =============================================================================
// TESTS
// =============================================================================
