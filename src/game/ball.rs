//! Balls
//!
//! A ball is a moving circle with a behavior. Its allowed area is fixed at
//! creation and equals the game's bounding rectangle.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::color::Color;
use crate::core::kilo::kilo_mul;
use crate::core::shapes::{Circle, Rectangle};
use crate::core::vec2::{Point, Vector};
use crate::game::behavior::BallBehavior;

/// Kilo-factor applied by a speed-up.
pub const SPEED_UP_FACTOR: i64 = 1050;

/// Kilo-factor applied by a slow-down.
pub const SLOW_DOWN_FACTOR: i64 = 950;

/// Slowest allowed squared speed after a slow-down.
pub const MINIMUM_SLOWDOWN_SQUARED_SPEED: i64 = 5 * 5;

/// Fastest allowed squared speed after a speed-up.
pub const MAXIMUM_SPEEDUP_SQUARED_SPEED: i64 = 80 * 80;

/// Stable handle of a ball within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ball#{}", self.0)
    }
}

/// A ball in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    id: BallId,
    geometry: Circle,
    /// Distance per millisecond
    velocity: Vector,
    behavior: BallBehavior,
    allowed_area: Rectangle,
}

impl Ball {
    /// Create a ball.
    pub fn new(
        id: BallId,
        allowed_area: Rectangle,
        geometry: Circle,
        velocity: Vector,
        behavior: BallBehavior,
    ) -> Self {
        Self { id, geometry, velocity, behavior, allowed_area }
    }

    /// This ball's handle.
    #[inline]
    pub fn id(&self) -> BallId {
        self.id
    }

    /// Current shape and position.
    #[inline]
    pub fn geometry(&self) -> Circle {
        self.geometry
    }

    /// Centre of the ball.
    #[inline]
    pub fn center(&self) -> Point {
        self.geometry.center()
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Current behavior.
    #[inline]
    pub fn behavior(&self) -> &BallBehavior {
        &self.behavior
    }

    /// Rectangle the ball is allowed to occupy.
    #[inline]
    pub fn allowed_area(&self) -> Rectangle {
        self.allowed_area
    }

    /// Color a renderer should use, decided by the behavior.
    pub fn color(&self) -> Color {
        self.behavior.color()
    }

    /// Where the ball would be after `elapsed_millis` at its current velocity.
    pub fn compute_destination(&self, elapsed_millis: i64) -> Circle {
        self.geometry.translate(self.velocity * elapsed_millis)
    }

    /// Move the ball along its velocity for `elapsed_millis`.
    pub fn advance(&mut self, elapsed_millis: i64) {
        self.geometry = self.compute_destination(elapsed_millis);
    }

    pub(crate) fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub(crate) fn set_behavior(&mut self, behavior: BallBehavior) {
        self.behavior = behavior;
    }

    /// True if `velocity` lies within the speed-up/slow-down limits.
    pub fn is_valid_scaled_velocity(velocity: Vector) -> bool {
        let sq = velocity.squared_length();
        (MINIMUM_SLOWDOWN_SQUARED_SPEED..=MAXIMUM_SPEEDUP_SQUARED_SPEED).contains(&sq)
    }

    /// Scale the velocity by a kilo-factor unless that leaves the limits.
    /// Returns whether the velocity changed.
    fn scale_velocity(&mut self, kilo_factor: i64) -> bool {
        let scaled = Vector::new(
            kilo_mul(self.velocity.x, kilo_factor),
            kilo_mul(self.velocity.y, kilo_factor),
        );
        if Self::is_valid_scaled_velocity(scaled) {
            self.velocity = scaled;
            true
        } else {
            false
        }
    }

    /// Speed up by 5%, if the result stays under the speed cap.
    pub fn speed_up(&mut self) -> bool {
        self.scale_velocity(SPEED_UP_FACTOR)
    }

    /// Slow down by 5%, if the result stays above the speed floor.
    pub fn slow_down(&mut self) -> bool {
        self.scale_velocity(SLOW_DOWN_FACTOR)
    }
}

// =============================================================================
// TESTS
// =============================================================================
