//! Core deterministic primitives.
//!
//! Integer-only geometry shared by every simulation module. Nothing here
//! knows about balls or bricks.

pub mod kilo;
pub mod vec2;
pub mod shapes;
pub mod color;
pub mod hash;

// Re-export core types
pub use kilo::{KILO, KILO_SQUARED};
pub use vec2::{Point, Vector};
pub use shapes::{Circle, Interval, Rectangle};
pub use color::Color;
pub use hash::{StateHash, StateHasher};
