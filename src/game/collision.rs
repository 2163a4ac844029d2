//! Collision Records
//!
//! A collision is a prediction: "if nothing changes, the ball touches a
//! surface in `t` milliseconds, and that surface faces `n`". Walls and the
//! paddle produce [`Collision`]s, the brick grid produces
//! [`BrickCollision`]s that also name the brick.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vector;
use crate::error::{BreakoutError, Result};
use crate::game::brick::BrickId;

// =============================================================================
// COLLISION
// =============================================================================

/// Time until impact plus the kilo-unit normal of the struck surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    millis_until_collision: i64,
    kilo_normal: Vector,
}

impl Collision {
    /// Create a collision.
    ///
    /// The time must be non-negative and the normal a kilo-unit vector.
    pub fn new(millis_until_collision: i64, kilo_normal: Vector) -> Result<Self> {
        if millis_until_collision < 0 {
            return Err(BreakoutError::NegativeCollisionTime(millis_until_collision));
        }
        if !kilo_normal.is_kilo_unit_vector() {
            return Err(BreakoutError::NotAKiloUnitVector(kilo_normal));
        }
        Ok(Self::from_parts(millis_until_collision, kilo_normal))
    }

    /// Internal constructor for callers that already guarantee the invariants.
    #[inline]
    pub(crate) const fn from_parts(millis_until_collision: i64, kilo_normal: Vector) -> Self {
        Self { millis_until_collision, kilo_normal }
    }

    /// Milliseconds until the ball touches the surface.
    #[inline]
    pub fn millis_until_collision(&self) -> i64 {
        self.millis_until_collision
    }

    /// Kilo-unit normal of the struck surface.
    #[inline]
    pub fn kilo_normal(&self) -> Vector {
        self.kilo_normal
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collision(t={}, n={})", self.millis_until_collision, self.kilo_normal)
    }
}

// =============================================================================
// BRICK COLLISION
// =============================================================================

/// A collision with a specific brick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickCollision {
    collision: Collision,
    brick: BrickId,
}

impl BrickCollision {
    /// Create a brick collision, validating like [`Collision::new`].
    pub fn new(millis_until_collision: i64, kilo_normal: Vector, brick: BrickId) -> Result<Self> {
        Ok(Self {
            collision: Collision::new(millis_until_collision, kilo_normal)?,
            brick,
        })
    }

    #[inline]
    pub(crate) const fn from_parts(millis_until_collision: i64, kilo_normal: Vector, brick: BrickId) -> Self {
        Self {
            collision: Collision::from_parts(millis_until_collision, kilo_normal),
            brick,
        }
    }

    /// The struck brick.
    #[inline]
    pub fn brick(&self) -> BrickId {
        self.brick
    }

    /// The underlying time/normal pair.
    #[inline]
    pub fn collision(&self) -> Collision {
        self.collision
    }

    /// Milliseconds until impact.
    #[inline]
    pub fn millis_until_collision(&self) -> i64 {
        self.collision.millis_until_collision
    }

    /// Kilo-unit normal of the struck brick side.
    #[inline]
    pub fn kilo_normal(&self) -> Vector {
        self.collision.kilo_normal
    }
}

impl fmt::Display for BrickCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BrickCollision(t={}, n={}, brick={})",
            self.millis_until_collision(),
            self.kilo_normal(),
            self.brick
        )
    }
}

// =============================================================================
// EARLIEST COLLISION
// =============================================================================

/// Anything with an impact time.
pub trait Timed {
    /// Milliseconds until impact.
    fn time(&self) -> i64;
}

impl Timed for Collision {
    fn time(&self) -> i64 {
        self.millis_until_collision
    }
}

impl Timed for BrickCollision {
    fn time(&self) -> i64 {
        self.millis_until_collision()
    }
}

/// Pick the earlier of two optional collisions.
///
/// `None` loses against anything. On equal times the first argument wins.
pub fn earliest_collision<T: Timed>(c1: Option<T>, c2: Option<T>) -> Option<T> {
    match (c1, c2) {
        (None, c2) => c2,
        (c1, None) => c1,
        (Some(a), Some(b)) => {
            if a.time() <= b.time() {
                Some(a)
            } else {
                Some(b)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
