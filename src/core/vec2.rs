//! Integer Points and Vectors
//!
//! `Point` is a location, `Vector` a displacement. Both are exact `i64`
//! pairs; the y axis points down (row 0 of the brick grid is at the top).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

use super::kilo::{isqrt, KILO, KILO_SQUARED, KILO_UNIT_TOLERANCE};

// =============================================================================
// POINT
// =============================================================================

/// A location in game coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (grows to the right)
    pub x: i64,
    /// Y coordinate (grows downward)
    pub y: i64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a point.
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Displace this point by a vector.
    #[inline]
    pub fn plus(self, v: Vector) -> Self {
        Self::new(self.x + v.x, self.y + v.y)
    }

    /// Displace this point by the opposite of a vector.
    #[inline]
    pub fn minus(self, v: Vector) -> Self {
        Self::new(self.x - v.x, self.y - v.y)
    }

    /// Vector from `other` to `self`.
    #[inline]
    pub fn vector_from(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Vector) -> Point {
        self.plus(rhs)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Vector) -> Point {
        self.minus(rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// VECTOR
// =============================================================================

/// A displacement, velocity or (kilo-scaled) direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector {
    /// X component
    pub x: i64,
    /// Y component
    pub y: i64,
}

impl Vector {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Unit vector pointing up (-Y)
    pub const UP: Self = Self { x: 0, y: -1 };

    /// Unit vector pointing down (+Y)
    pub const DOWN: Self = Self { x: 0, y: 1 };

    /// Unit vector pointing left (-X)
    pub const LEFT: Self = Self { x: -1, y: 0 };

    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self { x: 1, y: 0 };

    /// Kilo-unit vector pointing up
    pub const KILO_UP: Self = Self { x: 0, y: -KILO };

    /// Kilo-unit vector pointing down
    pub const KILO_DOWN: Self = Self { x: 0, y: KILO };

    /// Kilo-unit vector pointing left
    pub const KILO_LEFT: Self = Self { x: -KILO, y: 0 };

    /// Kilo-unit vector pointing right
    pub const KILO_RIGHT: Self = Self { x: KILO, y: 0 };

    /// Create a vector.
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Multiply both components by an integer.
    #[inline]
    pub fn scale(self, factor: i64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Divide both components by an integer, truncating toward zero.
    /// Dividing by zero yields the zero vector.
    #[inline]
    pub fn divide(self, divisor: i64) -> Self {
        if divisor == 0 {
            return Self::ZERO;
        }
        Self::new(self.x / divisor, self.y / divisor)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> i64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length (exact).
    #[inline]
    pub fn squared_length(self) -> i64 {
        self.dot(self)
    }

    /// Length, rounded down.
    #[inline]
    pub fn length(self) -> i64 {
        isqrt(self.squared_length())
    }

    /// Rescale to the given length, keeping direction.
    /// The zero vector stays zero.
    pub fn scaled_to(self, length: i64) -> Self {
        self.scale(length).divide(self.length())
    }

    /// True if this vector is a unit normal scaled by 1000 (within one unit).
    pub fn is_kilo_unit_vector(self) -> bool {
        let low = KILO - KILO_UNIT_TOLERANCE;
        let high = KILO + KILO_UNIT_TOLERANCE;
        let sq = self.squared_length();
        low * low <= sq && sq <= high * high
    }

    /// Reflect this velocity about a surface with the given kilo-unit normal.
    ///
    /// `v' = v - 2 (v . n) n / 1000^2`. Exact for axis-aligned normals.
    pub fn kilo_bounce(self, kilo_normal: Vector) -> Self {
        let twice_dot = 2 * self.dot(kilo_normal);
        Self::new(
            self.x - twice_dot * kilo_normal.x / KILO_SQUARED,
            self.y - twice_dot * kilo_normal.y / KILO_SQUARED,
        )
    }

    /// Negate both components.
    #[inline]
    pub fn negate(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Add for Vector {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i64> for Vector {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================
