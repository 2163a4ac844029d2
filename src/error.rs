//! Engine Errors
//!
//! Every error is a rejected precondition. Operations validate their
//! arguments before touching state, so an `Err` never leaves a partial
//! mutation behind.

use thiserror::Error;

use crate::core::vec2::{Point, Vector};
use crate::game::ball::BallId;
use crate::game::brick::BrickId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BreakoutError>;

/// Precondition violations reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakoutError {
    /// A circle was given a negative radius
    #[error("radius must be non-negative, got {0}")]
    NegativeRadius(i64),

    /// A rectangle was given a negative width or height
    #[error("rectangle dimensions must be non-negative, got {width}x{height}")]
    NegativeDimensions {
        /// Requested width
        width: i64,
        /// Requested height
        height: i64,
    },

    /// An interval whose lower bound exceeds its upper bound
    #[error("interval lower bound {lower} exceeds upper bound {upper}")]
    InvertedInterval {
        /// Lower bound
        lower: i64,
        /// Upper bound
        upper: i64,
    },

    /// Brick grid sizes must all be strictly positive
    #[error("brick grid needs positive sizes, got {columns}x{rows} cells of {brick_width}x{brick_height}")]
    InvalidGridSize {
        /// Column count
        columns: i64,
        /// Row count
        rows: i64,
        /// Brick width
        brick_width: i64,
        /// Brick height
        brick_height: i64,
    },

    /// A grid position outside the brick grid
    #[error("grid position {0} is outside the brick grid")]
    InvalidGridPosition(Point),

    /// A brick already occupies the requested cell
    #[error("grid position {0} is already occupied")]
    CellOccupied(Point),

    /// Sturdy bricks cannot start with negative lives
    #[error("lives must be non-negative, got {0}")]
    NegativeLives(i64),

    /// Temporary behaviors need a non-negative duration
    #[error("duration must be non-negative, got {0}")]
    NegativeDuration(i64),

    /// Collisions cannot happen in the past
    #[error("time until collision must be non-negative, got {0}")]
    NegativeCollisionTime(i64),

    /// Collision normals must be kilo-unit vectors
    #[error("{0} is not a kilo-unit vector")]
    NotAKiloUnitVector(Vector),

    /// Paddle half-width must be strictly positive
    #[error("paddle half-width must be positive, got {0}")]
    NonPositivePaddleWidth(i64),

    /// Paddle speed must be strictly positive
    #[error("paddle speed must be positive, got {0}")]
    NonPositivePaddleSpeed(i64),

    /// The paddle does not fit inside its allowed interval
    #[error("paddle centred at x={center_x} with half-width {half_width} does not fit in [{lower}, {upper}]")]
    PaddleOutOfBounds {
        /// Requested centre x
        center_x: i64,
        /// Requested half-width
        half_width: i64,
        /// Interval lower bound
        lower: i64,
        /// Interval upper bound
        upper: i64,
    },

    /// A new ball must start inside the playfield, extended one brick row down
    #[error("ball centred at {center} with radius {radius} is outside the playfield")]
    BallOutOfBounds {
        /// Requested centre
        center: Point,
        /// Requested radius
        radius: i64,
    },

    /// Handle does not name a brick currently in the grid
    #[error("no brick with id {0}")]
    UnknownBrick(BrickId),

    /// Handle does not name a ball currently in play
    #[error("no ball with id {0}")]
    UnknownBall(BallId),

    /// Operation requires a master brick
    #[error("brick {0} is not a master brick")]
    NotAMasterBrick(BrickId),

    /// Operation requires a locked brick
    #[error("brick {0} is not a locked brick")]
    NotALockedBrick(BrickId),

    /// A locked brick can be bound to at most one key ball
    #[error("locked brick {0} already has an active key ball")]
    KeyBallAlreadyBound(BrickId),

    /// Ticks only move forward in time
    #[error("elapsed time must be non-negative, got {0}")]
    NegativeElapsedTime(i64),

    /// A map needs at least one row and one column
    #[error("map description is empty")]
    EmptyMap,

    /// All map rows must have equal length
    #[error("map row {row} has length {found}, expected {expected}")]
    RaggedMap {
        /// Offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// A character with no brick meaning
    #[error("unknown map character {character:?} at column {column}, row {row}")]
    UnknownMapCharacter {
        /// The character
        character: char,
        /// Column of the character
        column: usize,
        /// Row of the character
        row: usize,
    },

    /// Locked bricks were placed without a master brick of the same group
    #[error("locked bricks of group {0} have no master brick")]
    LockedWithoutMaster(u8),

    /// No bundled map with that name
    #[error("no bundled map named {0:?}")]
    UnknownMap(String),
}
