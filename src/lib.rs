//! # Breakout Engine
//!
//! Deterministic integer collision engine for a Breakout-style game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     BREAKOUT ENGINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── kilo.rs     - Kilo scale, integer sqrt, floor division  │
//! │  ├── vec2.rs     - Integer points and vectors, kilo bounce   │
//! │  ├── shapes.rs   - Interval, rectangle, circle               │
//! │  ├── color.rs    - RGB colors                                │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── ball.rs     - Balls and speed changes                   │
//! │  ├── behavior.rs - Ball behaviors, motion resolution         │
//! │  ├── brick.rs    - Brick kinds and hit protocol              │
//! │  ├── lock.rs     - Master/locked link graph                  │
//! │  ├── grid.rs     - Brick grid and collision scanners         │
//! │  ├── paddle.rs   - Paddle                                    │
//! │  ├── wall.rs     - Walls                                     │
//! │  ├── state.rs    - Game state                                │
//! │  ├── tick.rs     - Sub-stepped simulation loop               │
//! │  └── map.rs      - Character-map parser                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Nothing under `core/` or `game/` reads a clock, draws a random number or
//! touches floating point. Directions are kilo-scaled integers, balls live
//! in a `BTreeMap` keyed by monotonic ids, and bricks are visited in
//! row-major order. The same map driven by the same paddle commands reaches
//! the same [`GameState::compute_hash`] on every platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod error;

// Types most callers need
pub use crate::core::{Circle, Color, Interval, Point, Rectangle, Vector, KILO};
pub use error::{BreakoutError, Result};
pub use game::{GameState, BrickGrid, BallBehavior, PaddleMotionDirection, MapConfig};
pub use game::tick::{tick, MAXIMUM_TIME_DELTA};

/// Version of this crate, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
