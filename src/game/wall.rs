//! Walls
//!
//! Three infinite half-plane barriers bounding the playfield on the top,
//! right and left. The bottom is open: a ball leaving through it is lost.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vector;
use crate::game::ball::Ball;
use crate::game::collision::Collision;

/// An infinite wall at a fixed coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    /// Horizontal wall; the field lies below `y`
    North {
        /// Y coordinate of the wall
        y: i64,
    },
    /// Vertical wall; the field lies left of `x`
    East {
        /// X coordinate of the wall
        x: i64,
    },
    /// Vertical wall; the field lies right of `x`
    West {
        /// X coordinate of the wall
        x: i64,
    },
}

impl Wall {
    /// Unit normal pointing into the field.
    pub fn normal(&self) -> Vector {
        match self {
            Wall::North { .. } => Vector::DOWN,
            Wall::East { .. } => Vector::LEFT,
            Wall::West { .. } => Vector::RIGHT,
        }
    }

    /// Kilo-unit normal pointing into the field.
    pub fn kilo_normal(&self) -> Vector {
        match self {
            Wall::North { .. } => Vector::KILO_DOWN,
            Wall::East { .. } => Vector::KILO_LEFT,
            Wall::West { .. } => Vector::KILO_RIGHT,
        }
    }

    /// The fixed coordinate (y for north, x for east/west).
    pub fn coordinate(&self) -> i64 {
        match *self {
            Wall::North { y } => y,
            Wall::East { x } | Wall::West { x } => x,
        }
    }

    /// Predict when `ball` hits this wall.
    ///
    /// Only a ball moving toward the wall from the field side can hit it.
    /// The time is rounded down so the ball never ends up past the wall.
    pub fn find_collision(&self, ball: &Ball) -> Option<Collision> {
        let geometry = ball.geometry();
        let v = ball.velocity();

        let t = match *self {
            Wall::North { y } => {
                let top = geometry.top();
                if v.y < 0 && top >= y {
                    (top - y) / -v.y
                } else {
                    return None;
                }
            }
            Wall::East { x } => {
                let right = geometry.right();
                if v.x > 0 && right <= x {
                    (x - right) / v.x
                } else {
                    return None;
                }
            }
            Wall::West { x } => {
                let left = geometry.left();
                if v.x < 0 && left >= x {
                    (left - x) / -v.x
                } else {
                    return None;
                }
            }
        };

        Some(Collision::from_parts(t, self.kilo_normal()))
    }
}
