//! Game Logic Module
//!
//! All game simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `collision`: Collision records and the earliest-collision rule
//! - `wall`: North, east and west walls
//! - `paddle`: Player paddle and its collision test
//! - `ball`: Balls and speed changes
//! - `behavior`: Ball behaviors and the motion-resolution loop
//! - `brick`: Brick kinds and the hit protocol
//! - `lock`: Master/locked link graph
//! - `grid`: Brick grid and directional collision scanners
//! - `state`: Game state, commands and queries
//! - `tick`: Sub-stepped simulation driver
//! - `events`: Game events for front-ends and logs
//! - `map`: Character-map parser and bundled maps

pub mod collision;
pub mod wall;
pub mod paddle;
pub mod ball;
pub mod behavior;
pub mod brick;
pub mod lock;
pub mod grid;
pub mod state;
pub mod tick;
pub mod events;
pub mod map;

// Re-export key types
pub use ball::{Ball, BallId};
pub use behavior::BallBehavior;
pub use brick::{Brick, BrickId, BrickKind};
pub use grid::BrickGrid;
pub use lock::LockGraph;
pub use paddle::{Paddle, PaddleMotionDirection};
pub use state::GameState;
pub use tick::{Frame, TickResult, MAXIMUM_TIME_DELTA};
pub use events::{GameEvent, GameEventData};
pub use map::MapConfig;
