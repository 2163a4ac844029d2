//! Axis-Aligned Shapes
//!
//! Immutable value types. Constructors validate their dimensions; every
//! "mutating" method returns a new shape.

use serde::{Serialize, Deserialize};

use super::vec2::{Point, Vector};
use crate::error::{BreakoutError, Result};

// =============================================================================
// INTERVAL
// =============================================================================

/// Closed 1-D interval `[lower, upper]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    lower: i64,
    upper: i64,
}

impl Interval {
    /// Create an interval. Fails if `lower > upper`.
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(BreakoutError::InvertedInterval { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound.
    #[inline]
    pub fn lower_bound(&self) -> i64 {
        self.lower
    }

    /// Upper bound.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper
    }

    /// `upper - lower`.
    #[inline]
    pub fn width(&self) -> i64 {
        self.upper - self.lower
    }

    /// True if `value` lies in the closed interval.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Clamp a value into the interval.
    #[inline]
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.lower, self.upper)
    }
}

// =============================================================================
// RECTANGLE
// =============================================================================

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

impl Rectangle {
    /// Create a rectangle. Width and height must be non-negative.
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(BreakoutError::NegativeDimensions { width, height });
        }
        Ok(Self { left, top, width, height })
    }

    /// Internal constructor for sizes already known to be non-negative.
    #[inline]
    pub(crate) const fn from_parts(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self { left, top, width, height }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> i64 {
        self.left
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> i64 {
        self.top
    }

    /// Right edge (`left + width`).
    #[inline]
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i64 {
        self.height
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    /// Midpoint of the bottom edge.
    pub fn bottom_center(&self) -> Point {
        Point::new(self.left + self.width / 2, self.bottom())
    }

    /// Centre point.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2, self.top + self.height / 2)
    }

    /// Same rectangle, taller by `extra` at the bottom.
    pub fn grow_height(&self, extra: i64) -> Result<Self> {
        Self::new(self.left, self.top, self.width, self.height + extra)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        self.left <= p.x && p.x <= self.right() && self.top <= p.y && p.y <= self.bottom()
    }

    /// True if the whole circle lies inside this rectangle.
    pub fn contains_circle(&self, c: &Circle) -> bool {
        self.left <= c.left() && c.right() <= self.right()
            && self.top <= c.top() && c.bottom() <= self.bottom()
    }

    /// True if `other` lies inside this rectangle.
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        self.left <= other.left && other.right() <= self.right()
            && self.top <= other.top && other.bottom() <= self.bottom()
    }
}

// =============================================================================
// CIRCLE
// =============================================================================

/// Circle with integer centre and radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    center: Point,
    radius: i64,
}

impl Circle {
    /// Create a circle. The radius must be non-negative.
    pub fn new(center: Point, radius: i64) -> Result<Self> {
        if radius < 0 {
            return Err(BreakoutError::NegativeRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Centre.
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radius.
    #[inline]
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Diameter.
    #[inline]
    pub fn diameter(&self) -> i64 {
        2 * self.radius
    }

    /// Leftmost x.
    #[inline]
    pub fn left(&self) -> i64 {
        self.center.x - self.radius
    }

    /// Rightmost x.
    #[inline]
    pub fn right(&self) -> i64 {
        self.center.x + self.radius
    }

    /// Topmost y.
    #[inline]
    pub fn top(&self) -> i64 {
        self.center.y - self.radius
    }

    /// Bottommost y.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.center.y + self.radius
    }

    /// Leftmost point on the circle.
    pub fn leftmost_point(&self) -> Point {
        Point::new(self.left(), self.center.y)
    }

    /// Rightmost point on the circle.
    pub fn rightmost_point(&self) -> Point {
        Point::new(self.right(), self.center.y)
    }

    /// Topmost point on the circle.
    pub fn topmost_point(&self) -> Point {
        Point::new(self.center.x, self.top())
    }

    /// Bottommost point on the circle.
    pub fn bottommost_point(&self) -> Point {
        Point::new(self.center.x, self.bottom())
    }

    /// Point on the circle's edge in the direction of `direction`.
    /// A zero direction yields the centre.
    pub fn point_in_direction(&self, direction: Vector) -> Point {
        self.center + direction.scaled_to(self.radius)
    }

    /// Smallest rectangle enclosing the circle.
    pub fn bounding_rectangle(&self) -> Rectangle {
        Rectangle::from_parts(self.left(), self.top(), self.diameter(), self.diameter())
    }

    /// Same circle displaced by `v`.
    pub fn translate(&self, v: Vector) -> Self {
        self.move_to(self.center + v)
    }

    /// Same circle centred at `center`.
    pub fn move_to(&self, center: Point) -> Self {
        Self { center, radius: self.radius }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        let i = Interval::new(0, 10000).unwrap();
        assert_eq!(i.width(), 10000);
        assert!(i.contains(0) && i.contains(10000));
        assert!(!i.contains(-1));
        assert_eq!(i.clamp(12000), 10000);
        assert_eq!(
            Interval::new(5, 4),
            Err(BreakoutError::InvertedInterval { lower: 5, upper: 4 })
        );
    }

    #[test]
    fn test_rectangle_validation() {
        assert!(Rectangle::new(0, 0, 0, 0).is_ok());
        assert_eq!(
            Rectangle::new(0, 0, -1, 5),
            Err(BreakoutError::NegativeDimensions { width: -1, height: 5 })
        );
    }

    #[test]
    fn test_rectangle_points() {
        let r = Rectangle::new(0, 0, 100000, 20000).unwrap();
        assert_eq!(r.bottom_center(), Point::new(50000, 20000));
        assert_eq!(r.center(), Point::new(50000, 10000));
        assert_eq!(r.bottom_right(), Point::new(100000, 20000));
        assert_eq!(r.grow_height(500).unwrap().bottom(), 20500);
    }

    #[test]
    fn test_rectangle_contains_is_inclusive() {
        let r = Rectangle::new(10, 10, 10, 10).unwrap();
        assert!(r.contains_point(Point::new(10, 10)));
        assert!(r.contains_point(Point::new(20, 20)));
        assert!(!r.contains_point(Point::new(21, 20)));

        let inner = Rectangle::new(12, 12, 8, 8).unwrap();
        assert!(r.contains_rectangle(&inner));
        assert!(!inner.contains_rectangle(&r));

        let c = Circle::new(Point::new(15, 15), 5).unwrap();
        assert!(r.contains_circle(&c));
        assert!(!r.contains_circle(&c.translate(Vector::new(1, 0))));
    }

    #[test]
    fn test_circle_extremes() {
        let c = Circle::new(Point::new(1000, 2000), 500).unwrap();
        assert_eq!(c.leftmost_point(), Point::new(500, 2000));
        assert_eq!(c.rightmost_point(), Point::new(1500, 2000));
        assert_eq!(c.topmost_point(), Point::new(1000, 1500));
        assert_eq!(c.bottommost_point(), Point::new(1000, 2500));
        assert_eq!(c.bounding_rectangle(), Rectangle::new(500, 1500, 1000, 1000).unwrap());
    }

    #[test]
    fn test_circle_point_in_direction() {
        let c = Circle::new(Point::new(0, 0), 500).unwrap();
        assert_eq!(c.point_in_direction(Vector::new(0, -25)), Point::new(0, -500));
        assert_eq!(c.point_in_direction(Vector::new(3, 4)), Point::new(300, 400));
        assert_eq!(c.point_in_direction(Vector::ZERO), Point::new(0, 0));
    }

    #[test]
    fn test_circle_validation() {
        assert_eq!(Circle::new(Point::ORIGIN, -1), Err(BreakoutError::NegativeRadius(-1)));
        let c = Circle::new(Point::ORIGIN, 0).unwrap();
        assert_eq!(c.translate(Vector::new(2, 3)).center(), Point::new(2, 3));
        assert_eq!(c.move_to(Point::new(7, 7)).radius(), 0);
    }
}
