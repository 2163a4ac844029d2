//! Paddle
//!
//! A horizontal bar confined to an interval along the bottom edge of the
//! brick field. It moves at a fixed speed in the direction set by input
//! and can be resized by paddle-modifier bricks.

use serde::{Serialize, Deserialize};

use crate::core::kilo::kilo_mul;
use crate::core::shapes::{Interval, Rectangle};
use crate::core::vec2::{Point, Vector};
use crate::error::{BreakoutError, Result};
use crate::game::ball::Ball;
use crate::game::collision::Collision;

/// Thickness of the paddle.
pub const HEIGHT: i64 = 500;

/// Kilo-factor applied by a grow-paddle brick.
pub const GROW_FACTOR: i64 = 1100;

/// Kilo-factor applied by a shrink-paddle brick.
pub const SHRINK_FACTOR: i64 = 900;

/// Direction the paddle is being driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaddleMotionDirection {
    /// Not moving
    #[default]
    Stationary,
    /// Moving toward lower x
    Left,
    /// Moving toward higher x
    Right,
}

impl PaddleMotionDirection {
    /// -1, 0 or 1.
    pub fn sign(self) -> i64 {
        match self {
            PaddleMotionDirection::Stationary => 0,
            PaddleMotionDirection::Left => -1,
            PaddleMotionDirection::Right => 1,
        }
    }
}

/// The player's paddle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    allowed_interval: Interval,
    top_center: Point,
    half_width: i64,
    speed: i64,
    motion_direction: PaddleMotionDirection,
}

impl Paddle {
    /// Create a paddle.
    ///
    /// Fails if the half-width or speed is not positive, or if a paddle of
    /// that size centred at `top_center` does not fit in `allowed_interval`.
    pub fn new(allowed_interval: Interval, top_center: Point, half_width: i64, speed: i64) -> Result<Self> {
        if half_width <= 0 {
            return Err(BreakoutError::NonPositivePaddleWidth(half_width));
        }
        if speed <= 0 {
            return Err(BreakoutError::NonPositivePaddleSpeed(speed));
        }
        if top_center.x - half_width < allowed_interval.lower_bound()
            || top_center.x + half_width > allowed_interval.upper_bound()
        {
            return Err(BreakoutError::PaddleOutOfBounds {
                center_x: top_center.x,
                half_width,
                lower: allowed_interval.lower_bound(),
                upper: allowed_interval.upper_bound(),
            });
        }

        Ok(Self {
            allowed_interval,
            top_center,
            half_width,
            speed,
            motion_direction: PaddleMotionDirection::Stationary,
        })
    }

    /// Interval the paddle must stay within.
    pub fn allowed_interval(&self) -> Interval {
        self.allowed_interval
    }

    /// Midpoint of the paddle's top edge.
    pub fn top_center(&self) -> Point {
        self.top_center
    }

    /// Half the paddle's width.
    pub fn half_width(&self) -> i64 {
        self.half_width
    }

    /// Full width.
    pub fn width(&self) -> i64 {
        2 * self.half_width
    }

    /// Thickness.
    pub fn height(&self) -> i64 {
        HEIGHT
    }

    /// Distance travelled per millisecond.
    pub fn speed(&self) -> i64 {
        self.speed
    }

    /// Current motion direction.
    pub fn motion_direction(&self) -> PaddleMotionDirection {
        self.motion_direction
    }

    /// Set the motion direction.
    pub fn set_motion_direction(&mut self, direction: PaddleMotionDirection) {
        self.motion_direction = direction;
    }

    /// Rectangle occupied by the paddle.
    pub fn geometry(&self) -> Rectangle {
        Rectangle::from_parts(
            self.top_center.x - self.half_width,
            self.top_center.y,
            self.width(),
            HEIGHT,
        )
    }

    /// Clamp a top-centre point so the paddle stays inside its interval.
    pub fn clamp(&self, p: Point) -> Point {
        let lower = self.allowed_interval.lower_bound() + self.half_width;
        let upper = self.allowed_interval.upper_bound() - self.half_width;
        Point::new(p.x.clamp(lower, upper.max(lower)), p.y)
    }

    /// Move the paddle's centre to `x`, clamped.
    pub fn set_top_center_x(&mut self, x: i64) {
        self.top_center = self.clamp(Point::new(x, self.top_center.y));
    }

    /// Shift the paddle horizontally by `dx`, clamped.
    pub fn move_by(&mut self, dx: i64) {
        self.set_top_center_x(self.top_center.x + dx);
    }

    /// Signed distance covered in `elapsed_millis` given the current direction.
    pub fn compute_movement_distance(&self, elapsed_millis: i64) -> i64 {
        self.speed * elapsed_millis * self.motion_direction.sign()
    }

    /// Advance the paddle by `elapsed_millis`.
    pub fn tick(&mut self, elapsed_millis: i64) {
        let dx = self.compute_movement_distance(elapsed_millis);
        self.move_by(dx);
    }

    /// Scale the half-width by a kilo-factor.
    ///
    /// The result is capped at half the allowed interval and the paddle is
    /// re-clamped afterwards. The half-width never drops below 1.
    pub fn scale(&mut self, kilo_factor: i64) {
        let max_half_width = self.allowed_interval.width() / 2;
        self.half_width = kilo_mul(self.half_width, kilo_factor).clamp(1, max_half_width.max(1));
        self.set_top_center_x(self.top_center.x);
    }

    /// Widen the paddle (grow-paddle brick).
    pub fn grow(&mut self) {
        self.scale(GROW_FACTOR);
    }

    /// Narrow the paddle (shrink-paddle brick).
    pub fn shrink(&mut self) {
        self.scale(SHRINK_FACTOR);
    }

    /// Predict when a ball lands on the paddle's top edge.
    ///
    /// Only a ball moving down whose bottom is still above the paddle can
    /// hit it, and only if its centre is over the paddle at impact.
    pub fn find_collision(&self, ball: &Ball) -> Option<Collision> {
        let geometry = ball.geometry();
        let v = ball.velocity();
        let bottom = geometry.bottom();

        if v.y <= 0 || bottom > self.top_center.y {
            return None;
        }

        let t = (self.top_center.y - bottom) / v.y;
        let x = geometry.center().x + v.x * t;
        let rect = self.geometry();
        if x < rect.left() || x > rect.right() {
            return None;
        }

        Some(Collision::from_parts(t, Vector::KILO_UP))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shapes::Circle;
    use crate::game::ball::BallId;
    use crate::game::behavior::BallBehavior;

    fn paddle() -> Paddle {
        Paddle::new(Interval::new(0, 10000).unwrap(), Point::new(5000, 0), 1000, 200).unwrap()
    }

    #[test]
    fn test_constructor() {
        let p = paddle();
        assert_eq!(p.top_center(), Point::new(5000, 0));
        assert_eq!(p.half_width(), 1000);
        assert_eq!(p.width(), 2000);
        assert_eq!(p.speed(), 200);
        assert_eq!(p.motion_direction(), PaddleMotionDirection::Stationary);
        assert_eq!(p.geometry(), Rectangle::new(4000, 0, 2000, HEIGHT).unwrap());
    }

    #[test]
    fn test_constructor_rejects_bad_arguments() {
        let i = Interval::new(0, 10000).unwrap();
        let c = Point::new(5000, 0);
        assert_eq!(Paddle::new(i, c, 0, 200), Err(BreakoutError::NonPositivePaddleWidth(0)));
        assert_eq!(Paddle::new(i, c, -1, 200), Err(BreakoutError::NonPositivePaddleWidth(-1)));
        assert_eq!(Paddle::new(i, c, 1000, 0), Err(BreakoutError::NonPositivePaddleSpeed(0)));

        let small = Interval::new(0, 100).unwrap();
        assert!(Paddle::new(small, Point::new(150, 0), 50, 200).is_err());
        assert!(Paddle::new(small, Point::new(70, 0), 50, 200).is_err());
        assert!(Paddle::new(small, Point::new(20, 0), 50, 200).is_err());
        assert!(Paddle::new(small, Point::new(50, 0), 50, 200).is_ok());
    }

    #[test]
    fn test_set_top_center_x_clamps() {
        let mut p = paddle();
        p.set_top_center_x(3000);
        assert_eq!(p.top_center().x, 3000);

        p.set_top_center_x(-1000);
        assert_eq!(p.top_center().x, 1000);
        assert_eq!(p.clamp(Point::new(-1000, 0)), Point::new(1000, 0));

        p.set_top_center_x(11000);
        assert_eq!(p.top_center().x, 9000);
        assert_eq!(p.clamp(Point::new(11000, 0)), Point::new(9000, 0));
    }

    #[test]
    fn test_move_and_tick() {
        let mut p = paddle();
        p.move_by(500);
        assert_eq!(p.top_center().x, 5500);
        p.move_by(10000);
        assert_eq!(p.top_center().x, 9000);

        p.set_motion_direction(PaddleMotionDirection::Left);
        p.tick(10);
        assert_eq!(p.top_center().x, 7000);
    }

    #[test]
    fn test_compute_movement_distance() {
        let mut p = paddle();
        assert_eq!(p.compute_movement_distance(1000), 0);
        p.set_motion_direction(PaddleMotionDirection::Left);
        assert_eq!(p.compute_movement_distance(1000), -200000);
        p.set_motion_direction(PaddleMotionDirection::Right);
        assert_eq!(p.compute_movement_distance(1000), 200000);
    }

    #[test]
    fn test_scale() {
        let mut p = paddle();
        p.scale(1100);
        assert_eq!(p.half_width(), 1100);
        p.scale(900);
        assert_eq!(p.half_width(), 990);
        p.scale(50000);
        assert_eq!(p.half_width(), 5000);
        assert_eq!(p.top_center().x, 5000);
    }

    #[test]
    fn test_scale_reclamps_position() {
        let mut p = paddle();
        p.set_top_center_x(9000);
        p.grow();
        assert_eq!(p.half_width(), 1100);
        assert_eq!(p.top_center().x, 8900);
        p.shrink();
        assert_eq!(p.half_width(), 990);
    }

    fn ball_at(x: i64, y: i64, v: Vector) -> Ball {
        let area = Rectangle::new(0, -20000, 10000, 20500).unwrap();
        let geometry = Circle::new(Point::new(x, y), 500).unwrap();
        Ball::new(BallId(0), area, geometry, v, BallBehavior::Standard)
    }

    #[test]
    fn test_paddle_collision() {
        let p = paddle();
        let c = p.find_collision(&ball_at(5000, -1500, Vector::new(5, 10))).unwrap();
        assert_eq!(c.millis_until_collision(), 100);
        assert_eq!(c.kilo_normal(), Vector::KILO_UP);

        // Moving up, or landing beside the paddle
        assert!(p.find_collision(&ball_at(5000, -1500, Vector::new(5, -10))).is_none());
        assert!(p.find_collision(&ball_at(500, -1500, Vector::new(-5, 10))).is_none());
        // Already below the paddle top
        assert!(p.find_collision(&ball_at(5000, 0, Vector::new(0, 10))).is_none());
    }
}
