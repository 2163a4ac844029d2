//! Game State
//!
//! The whole simulated world: balls, the brick grid, the paddle and the
//! three walls.
//!
//! ```text
//!   (0,0) ──────── North wall (y = 0) ──────── (W,0)
//!     │                                          │
//!     │   brick grid  W x H                      │
//!   West                                        East
//!   wall            o  balls                    wall
//!  (x = 0)                                     (x = W)
//!     │              ▀▀▀▀▀▀ paddle, top at y = H │
//!   (0,H+paddle height) ───── open bottom ─────┘
//! ```
//!
//! Balls are keyed by [`BallId`] in a `BTreeMap`. Ids only grow, so map
//! order equals insertion order and iteration is deterministic.
//!
//! Every accessor hands out either a shared borrow or an owned copy, so no
//! caller can change the state except through the command methods.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::hash::{StateHash, StateHasher};
use crate::core::shapes::{Circle, Interval, Rectangle};
use crate::core::vec2::Vector;
use crate::error::{BreakoutError, Result};
use crate::game::ball::{Ball, BallId};
use crate::game::behavior::BallBehavior;
use crate::game::brick::{Brick, BrickId, BrickKind};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::grid::BrickGrid;
use crate::game::paddle::{self, Paddle, PaddleMotionDirection};
use crate::game::wall::Wall;

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Balls in play, in insertion order
    balls: BTreeMap<BallId, Ball>,

    grid: BrickGrid,

    paddle: Paddle,

    /// North, east and west, fixed at construction
    walls: [Wall; 3],

    next_ball_id: u32,

    /// Simulated milliseconds since the game started
    elapsed_millis: i64,

    /// Events not yet drained
    #[serde(skip)]
    pending_events: Vec<GameEvent>,

    #[serde(skip)]
    next_event_sequence: u64,
}

impl GameState {
    /// Create a game around `grid` with a paddle centred under it.
    pub fn new(grid: BrickGrid, paddle_half_width: i64, paddle_speed: i64) -> Result<Self> {
        let allowed = Interval::new(0, grid.width())?;
        let top_center = grid.bounding_rectangle().bottom_center();
        let paddle = Paddle::new(allowed, top_center, paddle_half_width, paddle_speed)?;
        let walls = [
            Wall::North { y: 0 },
            Wall::East { x: grid.width() },
            Wall::West { x: 0 },
        ];

        Ok(Self {
            balls: BTreeMap::new(),
            grid,
            paddle,
            walls,
            next_ball_id: 0,
            elapsed_millis: 0,
            pending_events: Vec::new(),
            next_event_sequence: 0,
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of every ball, in insertion order.
    pub fn balls(&self) -> Vec<Ball> {
        self.balls.values().cloned().collect()
    }

    /// Handles of every ball, in insertion order.
    pub fn ball_ids(&self) -> Vec<BallId> {
        self.balls.keys().copied().collect()
    }

    /// Ball with this handle.
    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub(crate) fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.get_mut(&id)
    }

    /// Number of balls in play.
    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// The brick grid.
    pub fn brick_grid(&self) -> &BrickGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut BrickGrid {
        &mut self.grid
    }

    /// Snapshot of every brick, in row-major order.
    pub fn bricks(&self) -> Vec<Brick> {
        self.grid.bricks()
    }

    /// The paddle.
    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub(crate) fn paddle_mut(&mut self) -> &mut Paddle {
        &mut self.paddle
    }

    /// North, east and west walls.
    pub fn walls(&self) -> Vec<Wall> {
        self.walls.to_vec()
    }

    /// The playfield: the grid plus the paddle's strip below it.
    pub fn bounding_rectangle(&self) -> Rectangle {
        Rectangle::from_parts(0, 0, self.grid.width(), self.grid.height() + paddle::HEIGHT)
    }

    /// True once the ball's centre has left the playfield.
    pub fn is_ball_lost(&self, ball: &Ball) -> bool {
        !self.bounding_rectangle().contains_point(ball.center())
    }

    /// Won or lost.
    pub fn is_game_over(&self) -> bool {
        self.is_game_won() || self.is_game_lost()
    }

    /// No bricks left.
    pub fn is_game_won(&self) -> bool {
        self.grid.is_empty()
    }

    /// No balls left.
    pub fn is_game_lost(&self) -> bool {
        self.balls.is_empty()
    }

    /// Simulated milliseconds since the game started.
    pub fn elapsed_millis(&self) -> i64 {
        self.elapsed_millis
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Set the direction the paddle moves in on the next ticks.
    pub fn set_paddle_direction(&mut self, direction: PaddleMotionDirection) {
        self.paddle.set_motion_direction(direction);
    }

    /// Put a new ball into play.
    ///
    /// The ball must fit in the playfield extended by one brick row. A
    /// key-ball behavior must name a locked brick without a key ball; its
    /// speed modifier is computed from the lock graph and the lock is bound
    /// to the new ball.
    pub fn add_ball(&mut self, geometry: Circle, velocity: Vector, behavior: BallBehavior) -> Result<BallId> {
        let area = self.bounding_rectangle();
        if !area.grow_height(self.grid.brick_height())?.contains_circle(&geometry) {
            return Err(BreakoutError::BallOutOfBounds {
                center: geometry.center(),
                radius: geometry.radius(),
            });
        }

        let behavior = match behavior {
            BallBehavior::Weak { time_left } | BallBehavior::Strong { time_left } if time_left < 0 => {
                return Err(BreakoutError::NegativeDuration(time_left));
            }
            BallBehavior::KeyBall { locked, .. } => {
                self.grid.require_locked(locked)?;
                if self.grid.key_ball_of(locked).is_some() {
                    return Err(BreakoutError::KeyBallAlreadyBound(locked));
                }
                BallBehavior::KeyBall {
                    locked,
                    speed_modifier: self.grid.locks().speed_modifier(locked),
                }
            }
            other => other,
        };

        let id = BallId(self.next_ball_id);
        self.next_ball_id += 1;
        if let Some(locked) = behavior.locked_brick() {
            self.grid.set_key_ball(locked, Some(id))?;
        }
        self.balls.insert(id, Ball::new(id, area, geometry, velocity, behavior));

        debug!(ball = %id, center = %geometry.center(), %velocity, "ball added");
        self.push_event(GameEventData::BallAdded { ball: id });
        Ok(id)
    }

    /// Take a ball out of play. A key ball releases its locked brick.
    pub fn remove_ball(&mut self, id: BallId) -> Result<Ball> {
        let ball = self.balls.remove(&id).ok_or(BreakoutError::UnknownBall(id))?;
        if let Some(locked) = ball.behavior().locked_brick() {
            if self.grid.key_ball_of(locked) == Some(id) {
                // The lock may already be gone
                let _ = self.grid.set_key_ball(locked, None);
            }
        }
        Ok(ball)
    }

    /// Make `master` control `locked`. Returns false if it already did.
    ///
    /// Key balls of every locked brick whose speed modifier may have
    /// changed are updated.
    pub fn link_lock(&mut self, master: BrickId, locked: BrickId) -> Result<bool> {
        let changed = self.grid.link_lock(master, locked)?;
        if changed {
            debug!(%master, %locked, "lock linked");
            self.refresh_peers(&[master], &[locked]);
        }
        Ok(changed)
    }

    /// Stop `master` controlling `locked`. Returns false if it did not.
    pub fn unlink_lock(&mut self, master: BrickId, locked: BrickId) -> Result<bool> {
        let changed = self.grid.unlink_lock(master, locked)?;
        if changed {
            debug!(%master, %locked, "lock unlinked");
            self.refresh_peers(&[master], &[locked]);
        }
        Ok(changed)
    }

    // =========================================================================
    // Effects (driven by the hit and behavior protocols)
    // =========================================================================

    /// Remove a brick from the grid and refresh the key balls its lock
    /// edges influenced.
    pub(crate) fn destroy_brick(&mut self, id: BrickId) {
        let masters = self.grid.locks().master_bricks_of(id);
        let locked = self.grid.locks().locked_bricks_of(id);

        let Ok(brick) = self.grid.remove_brick(id) else {
            return;
        };

        // A lock destroyed under its key ball leaves that ball standard
        if let BrickKind::Locked { key_ball: Some(ball) } = *brick.kind() {
            if let Some(b) = self.balls.get_mut(&ball) {
                if b.behavior().locked_brick() == Some(id) {
                    b.set_behavior(BallBehavior::Standard);
                }
            }
        }

        self.refresh_peers(&masters, &locked);

        debug!(brick = %id, kind = brick.kind().name(), position = %brick.grid_position(), "brick destroyed");
        self.push_event(GameEventData::BrickDestroyed {
            brick: id,
            grid_position: brick.grid_position(),
        });
    }

    /// Recompute the speed modifier of every key ball bound to `locked` or
    /// to any locked brick of `masters`, from the current lock graph.
    fn refresh_peers(&mut self, masters: &[BrickId], locked: &[BrickId]) {
        let mut affected: Vec<BrickId> = locked.to_vec();
        for &master in masters {
            affected.extend(self.grid.locks().locked_bricks_of(master));
        }
        affected.sort();
        affected.dedup();

        for lock in affected {
            let Some(ball) = self.grid.key_ball_of(lock) else {
                continue;
            };
            let speed_modifier = self.grid.locks().speed_modifier(lock);
            if let Some(b) = self.balls.get_mut(&ball) {
                b.set_behavior(BallBehavior::KeyBall { locked: lock, speed_modifier });
            }
        }
    }

    /// Grow or shrink the paddle.
    pub(crate) fn resize_paddle(&mut self, grow: bool) {
        if grow {
            self.paddle.grow();
        } else {
            self.paddle.shrink();
        }
        let half_width = self.paddle.half_width();
        debug!(half_width, grow, "paddle resized");
        self.push_event(GameEventData::PaddleResized { half_width });
    }

    /// Speed a ball up or slow it down, within the speed limits.
    pub(crate) fn change_ball_speed(&mut self, id: BallId, up: bool) {
        let Some(ball) = self.balls.get_mut(&id) else {
            return;
        };
        let changed = if up { ball.speed_up() } else { ball.slow_down() };
        if changed {
            let velocity = ball.velocity();
            self.push_event(GameEventData::BallSpeedChanged { ball: id, velocity });
        }
    }

    /// Replace a ball's behavior. Leaving the key-ball behavior unbinds the
    /// ball from its locked brick.
    pub(crate) fn set_ball_behavior(&mut self, id: BallId, behavior: BallBehavior) {
        let Some(ball) = self.balls.get_mut(&id) else {
            return;
        };
        let old_lock = ball.behavior().locked_brick();
        ball.set_behavior(behavior);

        if let Some(locked) = old_lock {
            if behavior.locked_brick() != Some(locked) && self.grid.key_ball_of(locked) == Some(id) {
                let _ = self.grid.set_key_ball(locked, None);
            }
        }
    }

    pub(crate) fn advance_clock(&mut self, elapsed_millis: i64) {
        self.elapsed_millis += elapsed_millis;
    }

    /// Record an event at the current simulated time.
    pub(crate) fn push_event(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.elapsed_millis, self.next_event_sequence, data);
        self.next_event_sequence += 1;
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // =========================================================================
    // Hashing
    // =========================================================================

    /// Deterministic digest of the simulated state. Pending events are not
    /// part of it.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_game_state();
        hasher.update_i64(self.elapsed_millis);

        // Balls in id order (BTreeMap guarantees this)
        hasher.update_u32(self.balls.len() as u32);
        for ball in self.balls.values() {
            hasher.update_u32(ball.id().0);
            hasher.update_circle(&ball.geometry());
            hasher.update_vector(ball.velocity());
            hash_behavior(&mut hasher, ball.behavior());
        }

        // Bricks in row-major order
        let bricks = self.grid.bricks();
        hasher.update_u32(bricks.len() as u32);
        for brick in &bricks {
            hasher.update_u32(brick.id().0);
            hasher.update_point(brick.grid_position());
            hash_brick_kind(&mut hasher, brick.kind());
        }
        for edge in self.grid.locks().edges() {
            hasher.update_u32(edge.master.0);
            hasher.update_u32(edge.locked.0);
        }

        hasher.update_rectangle(&self.paddle.geometry());
        hasher.update_u8(self.paddle.motion_direction() as u8);

        hasher.finalize()
    }
}

fn hash_behavior(hasher: &mut StateHasher, behavior: &BallBehavior) {
    match *behavior {
        BallBehavior::Standard => hasher.update_u8(0),
        BallBehavior::Weak { time_left } => {
            hasher.update_u8(1);
            hasher.update_i64(time_left);
        }
        BallBehavior::Strong { time_left } => {
            hasher.update_u8(2);
            hasher.update_i64(time_left);
        }
        BallBehavior::KeyBall { locked, speed_modifier } => {
            hasher.update_u8(3);
            hasher.update_u32(locked.0);
            hasher.update_i64(speed_modifier);
        }
    }
}

fn hash_brick_kind(hasher: &mut StateHasher, kind: &BrickKind) {
    hasher.update_bytes(kind.name().as_bytes());
    match *kind {
        BrickKind::Sturdy { lives_left } => hasher.update_i64(lives_left),
        BrickKind::Locked { key_ball } => {
            hasher.update_bool(key_ball.is_some());
            if let Some(ball) = key_ball {
                hasher.update_u32(ball.0);
            }
        }
        _ => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================
