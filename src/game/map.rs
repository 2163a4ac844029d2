//! Character Maps
//!
//! Builds a game from a rectangular block of text, one character per brick
//! cell:
//!
//! ```text
//!   ' '  empty              '>'  speed-up
//!   '#'  standard           '<'  slow-down
//!   'S'  sturdy             'W'  weakening
//!   '+'  grow paddle        'F'  strengthening
//!   '-'  shrink paddle      'M' / 'm'  master, group 1 / 2
//!                           'L' / 'l'  locked, group 1 / 2
//! ```
//!
//! Masters are placed after the scan and linked to every locked brick of
//! their group, in scan order. Locked bricks need at least one master in
//! their group.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::shapes::Circle;
use crate::core::vec2::{Point, Vector};
use crate::error::{BreakoutError, Result};
use crate::game::behavior::BallBehavior;
use crate::game::brick::BrickId;
use crate::game::grid::BrickGrid;
use crate::game::state::GameState;

/// Parameters for turning a character map into a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Width of one brick
    pub brick_width: i64,
    /// Height of one brick
    pub brick_height: i64,
    /// Radius of the starting ball
    pub ball_radius: i64,
    /// Velocity of the starting ball
    pub ball_velocity: Vector,
    /// Lives of every sturdy brick
    pub sturdy_lives: i64,
    /// Paddle half-width; the brick width when unset
    pub paddle_half_width: Option<i64>,
    /// Paddle speed; a hundredth of the brick width when unset
    pub paddle_speed: Option<i64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            brick_width: 5000,
            brick_height: 3000,
            ball_radius: 500,
            ball_velocity: Vector::new(25, -25),
            sturdy_lives: 3,
            paddle_half_width: None,
            paddle_speed: None,
        }
    }
}

impl MapConfig {
    /// Default configuration with the given brick size.
    pub fn with_brick_size(brick_width: i64, brick_height: i64) -> Self {
        Self { brick_width, brick_height, ..Self::default() }
    }

    /// Paddle half-width to use.
    pub fn paddle_half_width(&self) -> i64 {
        self.paddle_half_width.unwrap_or(self.brick_width)
    }

    /// Paddle speed to use.
    pub fn paddle_speed(&self) -> i64 {
        self.paddle_speed.unwrap_or(self.brick_width / 100)
    }
}

/// Build a game from `lines` with default settings and the given brick size.
pub fn parse<S: AsRef<str>>(lines: &[S], brick_width: i64, brick_height: i64) -> Result<GameState> {
    parse_map(lines, &MapConfig::with_brick_size(brick_width, brick_height))
}

/// Build a game from `lines`: the brick grid, a paddle, and one standard
/// ball just above the bottom centre of the grid.
pub fn parse_map<S: AsRef<str>>(lines: &[S], config: &MapConfig) -> Result<GameState> {
    let grid = parse_brick_grid(lines, config)?;
    let spawn = grid
        .bounding_rectangle()
        .bottom_center()
        .plus(Vector::new(0, -2 * config.ball_radius));
    let ball = Circle::new(spawn, config.ball_radius)?;

    let mut state = GameState::new(grid, config.paddle_half_width(), config.paddle_speed())?;
    state.add_ball(ball, config.ball_velocity, BallBehavior::Standard)?;

    debug!(
        columns = state.brick_grid().column_count(),
        rows = state.brick_grid().row_count(),
        bricks = state.brick_grid().brick_count(),
        "map parsed"
    );
    Ok(state)
}

/// Bricks waiting for their group's masters.
#[derive(Default)]
struct LockGroup {
    masters: Vec<Point>,
    locked: Vec<BrickId>,
}

fn parse_brick_grid<S: AsRef<str>>(lines: &[S], config: &MapConfig) -> Result<BrickGrid> {
    let rows: Vec<Vec<char>> = lines.iter().map(|l| l.as_ref().chars().collect()).collect();
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(BreakoutError::EmptyMap);
    }
    for (row, chars) in rows.iter().enumerate() {
        if chars.len() != width {
            return Err(BreakoutError::RaggedMap { row, expected: width, found: chars.len() });
        }
    }

    let mut grid = BrickGrid::new(width as i64, rows.len() as i64, config.brick_width, config.brick_height)?;
    let mut groups: [LockGroup; 2] = Default::default();

    for (y, chars) in rows.iter().enumerate() {
        for (x, &character) in chars.iter().enumerate() {
            let p = Point::new(x as i64, y as i64);
            match character {
                ' ' => {}
                '#' => {
                    grid.add_standard_brick(p)?;
                }
                'S' => {
                    grid.add_sturdy_brick(p, config.sturdy_lives)?;
                }
                '+' => {
                    grid.add_grow_paddle_brick(p)?;
                }
                '-' => {
                    grid.add_shrink_paddle_brick(p)?;
                }
                'W' => {
                    grid.add_weakening_brick(p)?;
                }
                'F' => {
                    grid.add_strengthening_brick(p)?;
                }
                '>' => {
                    grid.add_speed_up_brick(p)?;
                }
                '<' => {
                    grid.add_slow_down_brick(p)?;
                }
                'M' => groups[0].masters.push(p),
                'm' => groups[1].masters.push(p),
                'L' => groups[0].locked.push(grid.add_locked_brick(p)?),
                'l' => groups[1].locked.push(grid.add_locked_brick(p)?),
                _ => {
                    return Err(BreakoutError::UnknownMapCharacter { character, column: x, row: y });
                }
            }
        }
    }

    for (index, group) in groups.iter().enumerate() {
        if group.masters.is_empty() && !group.locked.is_empty() {
            return Err(BreakoutError::LockedWithoutMaster(index as u8 + 1));
        }
    }
    for group in &groups {
        for &p in &group.masters {
            grid.add_master_brick(p, &group.locked)?;
        }
    }

    Ok(grid)
}

/// Sample maps.
pub mod maps {
    use super::*;

    /// Two master/locked pairs in opposite corners.
    pub const DESCR1: &[&str] = &[
        "L       l",
        "M       m",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
    ];

    /// One row of each brick kind.
    pub const DESCR2: &[&str] = &[
        "#####",
        "SSSSS",
        "++#--",
        "W###F",
        ">###<",
        "##M#L",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
        "     ",
    ];

    /// Strengthening and weakening bricks under a standard row.
    pub const DESCR3: &[&str] = &[
        "#########",
        "FFFFWWWW ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
    ];

    /// A single row of sturdy bricks.
    pub const DESCR4: &[&str] = &[
        "SSSSS",
        "     ",
        "     ",
        "     ",
        "     ",
    ];

    /// Sturdy wall hiding a master/locked pair.
    pub const DESCR5: &[&str] = &[
        "S#S#SS#S#SS",
        "S#S#S#M#L#S",
        "           ",
        "           ",
        "           ",
        "           ",
        "           ",
        "           ",
    ];

    /// Speed-up and slow-down bricks among standard ones.
    pub const DESCR6: &[&str] = &[
        ">###>##>#",
        "#########",
        "<##<#<###",
        "###<#####",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
    ];

    /// Several masters sharing two lock groups.
    pub const DESCR7: &[&str] = &[
        "FFMMLM##L#FF",
        "FFMmlm#m#MFF",
        "FFM      MFF",
        "            ",
        "            ",
        "            ",
        "            ",
        "            ",
        "            ",
        "            ",
        "            ",
    ];

    /// Symmetric arena with one master/locked pair.
    pub const OGP: &[&str] = &[
        "M          L",
        "  #      #  ",
        "  #      #  ",
        ">>#      #<<",
        "++#  SS  #++",
        "            ",
        "FFFFFFFFFFFF",
        "            ",
        "            ",
        "            ",
        "            ",
    ];

    /// The symmetric arena without locks.
    pub const OOP: &[&str] = &[
        "            ",
        "  #      #  ",
        "  #      #  ",
        ">>#      #<<",
        "++#  SS  #++",
        "            ",
        "FFFFFFFFFFFF",
        "            ",
        "            ",
        "            ",
        "            ",
    ];

    /// Every bundled map with its lookup name.
    pub const ALL: &[(&str, &[&str])] = &[
        ("descr1", DESCR1),
        ("descr2", DESCR2),
        ("descr3", DESCR3),
        ("descr4", DESCR4),
        ("descr5", DESCR5),
        ("descr6", DESCR6),
        ("descr7", DESCR7),
        ("ogp", OGP),
        ("oop", OOP),
    ];

    /// Bundled map by name, ignoring case.
    pub fn bundled_map(name: &str) -> Result<&'static [&'static str]> {
        ALL.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, lines)| lines)
            .ok_or_else(|| BreakoutError::UnknownMap(name.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
