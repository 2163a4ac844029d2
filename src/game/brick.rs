//! Bricks
//!
//! A brick has immutable geometry and grid position plus a [`BrickKind`]
//! that decides what happens when a ball hits it. Master/locked links live
//! in the grid's [`LockGraph`](crate::game::lock::LockGraph), not in the
//! bricks themselves.
//!
//! ## Hit protocol
//!
//! | Kind            | `hit`                                   | `strong_hit` survives? |
//! |-----------------|-----------------------------------------|------------------------|
//! | Standard        | destroyed                               | no (hit)               |
//! | Sturdy          | loses a life, destroyed at 0            | no, destroyed outright |
//! | Grow/Shrink     | destroyed, paddle resized               | no (hit)               |
//! | SpeedUp/SlowDown| destroyed, ball velocity scaled         | no (hit)               |
//! | Weakening       | destroyed, ball becomes weak            | no (hit)               |
//! | Strengthening   | destroyed, ball becomes strong          | no (hit)               |
//! | Master          | spawns key balls, or destroyed if unlinked | yes while linked    |
//! | Locked          | destroyed only by its own key ball      | yes                    |

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::core::color::Color;
use crate::core::shapes::Rectangle;
use crate::core::vec2::{Point, Vector};
use crate::game::ball::BallId;
use crate::game::behavior::BallBehavior;
use crate::game::events::GameEventData;
use crate::game::state::GameState;

/// Velocities of spawned key balls, used round-robin.
pub const KEY_BALL_VELOCITIES: [Vector; 4] = [
    Vector::new(-5, 30),
    Vector::new(-2, 30),
    Vector::new(2, 30),
    Vector::new(5, 30),
];

/// Sturdy brick colors, indexed by remaining lives minus one.
pub const STURDY_COLORS: [Color; 3] = [
    Color::new(160, 82, 45),
    Color::new(123, 63, 0),
    Color::new(92, 64, 51),
];

/// Stable handle of a brick within one grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrickId(pub u32);

impl fmt::Display for BrickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brick#{}", self.0)
    }
}

// =============================================================================
// BRICK KIND
// =============================================================================

/// What a brick does when hit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickKind {
    /// Destroyed by one hit
    Standard,
    /// Destroyed after `lives_left` hits
    Sturdy {
        /// Remaining hits
        lives_left: i64,
    },
    /// Widens the paddle when destroyed
    GrowPaddle,
    /// Narrows the paddle when destroyed
    ShrinkPaddle,
    /// Speeds up the hitting ball when destroyed
    SpeedUp,
    /// Slows down the hitting ball when destroyed
    SlowDown,
    /// Makes the hitting ball weak when destroyed
    Weakening,
    /// Makes the hitting ball strong when destroyed
    Strengthening,
    /// Releases key balls for its locked bricks
    Master,
    /// Only its own key ball can destroy it
    Locked {
        /// Ball currently carrying this brick's key, if any
        key_ball: Option<BallId>,
    },
}

impl BrickKind {
    /// Short lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            BrickKind::Standard => "standard",
            BrickKind::Sturdy { .. } => "sturdy",
            BrickKind::GrowPaddle => "grow-paddle",
            BrickKind::ShrinkPaddle => "shrink-paddle",
            BrickKind::SpeedUp => "speed-up",
            BrickKind::SlowDown => "slow-down",
            BrickKind::Weakening => "weakening",
            BrickKind::Strengthening => "strengthening",
            BrickKind::Master => "master",
            BrickKind::Locked { .. } => "locked",
        }
    }
}

// =============================================================================
// BRICK
// =============================================================================

/// A brick placed in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    id: BrickId,
    geometry: Rectangle,
    grid_position: Point,
    kind: BrickKind,
}

impl Brick {
    pub(crate) fn new(id: BrickId, geometry: Rectangle, grid_position: Point, kind: BrickKind) -> Self {
        Self { id, geometry, grid_position, kind }
    }

    /// Handle of this brick.
    pub fn id(&self) -> BrickId {
        self.id
    }

    /// Rectangle occupied by the brick.
    pub fn geometry(&self) -> Rectangle {
        self.geometry
    }

    /// Cell of the grid holding this brick.
    pub fn grid_position(&self) -> Point {
        self.grid_position
    }

    /// The brick's kind and mutable state.
    pub fn kind(&self) -> &BrickKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut BrickKind {
        &mut self.kind
    }

    /// Remaining lives of a sturdy brick.
    pub fn lives_left(&self) -> Option<i64> {
        match self.kind {
            BrickKind::Sturdy { lives_left } => Some(lives_left),
            _ => None,
        }
    }

    /// Key ball bound to a locked brick.
    pub fn key_ball(&self) -> Option<BallId> {
        match self.kind {
            BrickKind::Locked { key_ball } => key_ball,
            _ => None,
        }
    }

    /// Fill color.
    pub fn color(&self) -> Color {
        match self.kind {
            BrickKind::Standard => Color::GRAY,
            BrickKind::Sturdy { lives_left } => {
                let index = (lives_left - 1).clamp(0, STURDY_COLORS.len() as i64 - 1);
                STURDY_COLORS[index as usize]
            }
            BrickKind::GrowPaddle | BrickKind::Master => Color::GREEN,
            BrickKind::ShrinkPaddle
            | BrickKind::SpeedUp
            | BrickKind::Weakening
            | BrickKind::Locked { .. } => Color::RED,
            BrickKind::SlowDown | BrickKind::Strengthening => Color::BLUE,
        }
    }

    /// Text drawn on the brick, if any.
    pub fn label(&self) -> Option<String> {
        let label = match self.kind {
            BrickKind::Standard => return None,
            BrickKind::Sturdy { lives_left } => return Some(lives_left.to_string()),
            BrickKind::GrowPaddle => "<>",
            BrickKind::ShrinkPaddle => "><",
            BrickKind::SpeedUp => ">>>",
            BrickKind::SlowDown => "<<<",
            BrickKind::Weakening => "W",
            BrickKind::Strengthening => "F",
            BrickKind::Master => "🔑",
            BrickKind::Locked { .. } => "🔒",
        };
        Some(label.to_string())
    }

    /// Color of the label text. Sturdy labels are white; other labels use
    /// the brick color.
    pub fn label_color(&self) -> Option<Color> {
        match self.kind {
            BrickKind::Standard => None,
            BrickKind::Sturdy { .. } => Some(Color::WHITE),
            _ => Some(self.color()),
        }
    }
}

// =============================================================================
// HIT PROTOCOL
// =============================================================================

/// Apply a normal hit from `ball` to `brick`.
pub(crate) fn hit(state: &mut GameState, brick: BrickId, ball: BallId) {
    let Some(kind) = state.brick_grid().brick(brick).map(|b| b.kind().clone()) else {
        return;
    };

    match kind {
        BrickKind::Standard => state.destroy_brick(brick),
        BrickKind::Sturdy { lives_left } => {
            let lives_left = lives_left - 1;
            if lives_left <= 0 {
                state.destroy_brick(brick);
            } else if let Some(b) = state.grid_mut().brick_mut(brick) {
                *b.kind_mut() = BrickKind::Sturdy { lives_left };
            }
        }
        BrickKind::GrowPaddle => {
            state.destroy_brick(brick);
            state.resize_paddle(true);
        }
        BrickKind::ShrinkPaddle => {
            state.destroy_brick(brick);
            state.resize_paddle(false);
        }
        BrickKind::SpeedUp => {
            state.destroy_brick(brick);
            state.change_ball_speed(ball, true);
        }
        BrickKind::SlowDown => {
            state.destroy_brick(brick);
            state.change_ball_speed(ball, false);
        }
        BrickKind::Weakening => {
            state.destroy_brick(brick);
            state.set_ball_behavior(ball, BallBehavior::weak());
        }
        BrickKind::Strengthening => {
            state.destroy_brick(brick);
            state.set_ball_behavior(ball, BallBehavior::strong());
        }
        BrickKind::Master => hit_master(state, brick, ball),
        BrickKind::Locked { key_ball } => hit_locked(state, brick, key_ball, ball),
    }
}

/// Apply a strong hit. Returns true if the brick survived.
pub(crate) fn strong_hit(state: &mut GameState, brick: BrickId, ball: BallId) -> bool {
    let Some(kind) = state.brick_grid().brick(brick).map(|b| b.kind().clone()) else {
        return false;
    };

    match kind {
        BrickKind::Sturdy { .. } => {
            state.destroy_brick(brick);
            false
        }
        BrickKind::Locked { .. } => true,
        BrickKind::Master => {
            hit_master(state, brick, ball);
            !state.brick_grid().locks().locked_bricks_of(brick).is_empty()
        }
        _ => {
            hit(state, brick, ball);
            false
        }
    }
}

/// A master with no locked bricks left is destroyed. Otherwise every
/// locked brick without an active key ball gets one, spawned at the
/// hitting ball's position.
fn hit_master(state: &mut GameState, master: BrickId, ball: BallId) {
    let locked = state.brick_grid().locks().locked_bricks_of(master);
    if locked.is_empty() {
        state.destroy_brick(master);
        return;
    }

    let Some(origin) = state.ball(ball).map(|b| b.geometry()) else {
        return;
    };

    let mut spawned = 0;
    for lock in locked {
        if state.brick_grid().key_ball_of(lock).is_some() {
            continue;
        }
        let velocity = KEY_BALL_VELOCITIES[spawned % KEY_BALL_VELOCITIES.len()];
        match state.add_ball(origin, velocity, BallBehavior::key_ball(lock)) {
            Ok(id) => {
                debug!(%master, %lock, ball = %id, "key ball spawned");
                state.push_event(GameEventData::KeyBallSpawned { ball: id, locked: lock });
                spawned += 1;
            }
            Err(e) => warn!(%lock, error = %e, "could not spawn key ball"),
        }
    }
}

/// Only the key ball bound to this locked brick can destroy it. The ball
/// reverts to standard behavior and every edge to a master is severed.
fn hit_locked(state: &mut GameState, locked: BrickId, key_ball: Option<BallId>, ball: BallId) {
    let carries_key = matches!(
        state.ball(ball).map(|b| b.behavior()),
        Some(BallBehavior::KeyBall { locked: l, .. }) if *l == locked
    );
    if key_ball != Some(ball) || !carries_key {
        return;
    }

    state.set_ball_behavior(ball, BallBehavior::Standard);
    state.destroy_brick(locked);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shapes::Circle;
    use crate::game::grid::BrickGrid;

    fn brick(kind: BrickKind) -> Brick {
        Brick::new(BrickId(0), Rectangle::new(0, 0, 10, 10).unwrap(), Point::new(0, 0), kind)
    }

    #[test]
    fn test_colors_and_labels() {
        let standard = brick(BrickKind::Standard);
        assert_eq!(standard.color(), Color::new(128, 128, 128));
        assert_eq!(standard.label(), None);
        assert_eq!(standard.label_color(), None);

        let grow = brick(BrickKind::GrowPaddle);
        assert_eq!(grow.color(), Color::new(0, 255, 0));
        assert_eq!(grow.label().as_deref(), Some("<>"));
        assert_eq!(grow.label_color(), Some(Color::new(0, 255, 0)));

        assert_eq!(brick(BrickKind::ShrinkPaddle).label().as_deref(), Some("><"));
        assert_eq!(brick(BrickKind::SpeedUp).label().as_deref(), Some(">>>"));
        assert_eq!(brick(BrickKind::SlowDown).label().as_deref(), Some("<<<"));
        assert_eq!(brick(BrickKind::Weakening).label().as_deref(), Some("W"));
        assert_eq!(brick(BrickKind::Strengthening).color(), Color::new(0, 0, 255));
        assert_eq!(brick(BrickKind::Master).label().as_deref(), Some("🔑"));
        assert_eq!(brick(BrickKind::Locked { key_ball: None }).label().as_deref(), Some("🔒"));
    }

    #[test]
    fn test_sturdy_color_tracks_lives() {
        for lives in 1..=3 {
            let b = brick(BrickKind::Sturdy { lives_left: lives });
            assert_eq!(b.color(), STURDY_COLORS[(lives - 1) as usize]);
            assert_eq!(b.label(), Some(lives.to_string()));
            assert_eq!(b.label_color(), Some(Color::WHITE));
        }
        // Out-of-range lives clamp to the nearest color
        assert_eq!(brick(BrickKind::Sturdy { lives_left: 7 }).color(), STURDY_COLORS[2]);
        assert_eq!(brick(BrickKind::Sturdy { lives_left: 0 }).color(), STURDY_COLORS[0]);
    }

    fn state_with(add: impl FnOnce(&mut BrickGrid) -> BrickId) -> (GameState, BrickId, BallId) {
        let mut grid = BrickGrid::new(10, 10, 10000, 2000).unwrap();
        let id = add(&mut grid);
        let mut state = GameState::new(grid, 5000, 10).unwrap();
        let geometry = Circle::new(Point::new(50000, 15000), 500).unwrap();
        let ball = state.add_ball(geometry, Vector::new(20, -40), BallBehavior::Standard).unwrap();
        (state, id, ball)
    }

    #[test]
    fn test_sturdy_brick_three_hits() {
        let (mut state, id, ball) = state_with(|g| g.add_sturdy_brick(Point::new(1, 1), 3).unwrap());
        for lives in (1..=3).rev() {
            let b = state.brick_grid().brick(id).unwrap();
            assert_eq!(b.lives_left(), Some(lives));
            assert_eq!(b.color(), STURDY_COLORS[(lives - 1) as usize]);
            hit(&mut state, id, ball);
        }
        assert!(state.brick_grid().brick(id).is_none());
        assert!(state.brick_grid().is_empty());
    }

    #[test]
    fn test_sturdy_strong_hit_destroys() {
        let (mut state, id, ball) = state_with(|g| g.add_sturdy_brick(Point::new(1, 1), 3).unwrap());
        assert!(!strong_hit(&mut state, id, ball));
        assert!(state.brick_grid().brick(id).is_none());
    }

    #[test]
    fn test_paddle_modifier_bricks() {
        let (mut state, id, ball) = state_with(|g| g.add_grow_paddle_brick(Point::new(0, 0)).unwrap());
        hit(&mut state, id, ball);
        assert!(state.brick_grid().is_empty());
        assert_eq!(state.paddle().half_width(), 5500);

        let (mut state, id, ball) = state_with(|g| g.add_shrink_paddle_brick(Point::new(0, 0)).unwrap());
        hit(&mut state, id, ball);
        assert_eq!(state.paddle().half_width(), 4500);
    }

    #[test]
    fn test_ball_modifier_bricks() {
        let (mut state, id, ball) = state_with(|g| g.add_speed_up_brick(Point::new(0, 0)).unwrap());
        hit(&mut state, id, ball);
        assert_eq!(state.ball(ball).unwrap().velocity(), Vector::new(21, -42));

        let (mut state, id, ball) = state_with(|g| g.add_slow_down_brick(Point::new(0, 0)).unwrap());
        hit(&mut state, id, ball);
        assert_eq!(state.ball(ball).unwrap().velocity(), Vector::new(19, -38));

        let (mut state, id, ball) = state_with(|g| g.add_weakening_brick(Point::new(0, 0)).unwrap());
        hit(&mut state, id, ball);
        assert_eq!(state.ball(ball).unwrap().behavior(), &BallBehavior::weak());

        let (mut state, id, ball) = state_with(|g| g.add_strengthening_brick(Point::new(0, 0)).unwrap());
        assert!(!strong_hit(&mut state, id, ball));
        assert_eq!(state.ball(ball).unwrap().behavior(), &BallBehavior::strong());
        assert!(state.brick_grid().is_empty());
    }

    #[test]
    fn test_locked_brick_ignores_other_balls() {
        let mut grid = BrickGrid::new(10, 10, 10000, 2000).unwrap();
        let lock = grid.add_locked_brick(Point::new(0, 0)).unwrap();
        grid.add_master_brick(Point::new(1, 0), &[lock]).unwrap();
        let mut state = GameState::new(grid, 5000, 10).unwrap();
        let geometry = Circle::new(Point::new(50000, 15000), 500).unwrap();
        let ball = state.add_ball(geometry, Vector::new(20, -40), BallBehavior::Standard).unwrap();

        hit(&mut state, lock, ball);
        assert!(strong_hit(&mut state, lock, ball));
        assert!(state.brick_grid().brick(lock).is_some());
    }

    #[test]
    fn test_key_ball_opens_its_lock() {
        let mut grid = BrickGrid::new(10, 10, 10000, 2000).unwrap();
        let lock = grid.add_locked_brick(Point::new(0, 0)).unwrap();
        let master = grid.add_master_brick(Point::new(1, 0), &[lock]).unwrap();
        let mut state = GameState::new(grid, 5000, 10).unwrap();
        let geometry = Circle::new(Point::new(50000, 15000), 500).unwrap();
        let ball = state.add_ball(geometry, Vector::new(20, -40), BallBehavior::Standard).unwrap();

        hit(&mut state, master, ball);
        let key = state.brick_grid().key_ball_of(lock).unwrap();
        assert_eq!(state.ball_count(), 2);
        assert_eq!(state.ball(key).unwrap().velocity(), KEY_BALL_VELOCITIES[0]);

        hit(&mut state, lock, key);
        assert!(state.brick_grid().brick(lock).is_none());
        assert_eq!(state.ball(key).unwrap().behavior(), &BallBehavior::Standard);
        assert!(state.brick_grid().locks().edges().is_empty());

        // The master is now unlinked and breaks on the next hit
        hit(&mut state, master, ball);
        assert!(state.brick_grid().is_empty());
    }
}
