//! Brick Grid
//!
//! A fixed-size grid of cells, each empty or holding one brick. Bricks are
//! addressed two ways: by grid position `(column, row)` and by a stable
//! [`BrickId`] handed out when the brick is added. The grid also owns the
//! [`LockGraph`] linking master bricks to locked bricks.
//!
//! ```text
//!        column 0    column 1    column 2
//!      +-----------+-----------+-----------+  y = 0
//! row 0|  (0, 0)   |  (1, 0)   |  (2, 0)   |
//!      +-----------+-----------+-----------+  y = brick_height
//! row 1|  (0, 1)   |  (1, 1)   |  (2, 1)   |
//!      +-----------+-----------+-----------+  y = 2 * brick_height
//!      x = 0       x = brick_width
//! ```
//!
//! ## Collision search
//!
//! A ball can only enter a cell through a grid line. For each axis the
//! ball moves along, the search walks the grid lines in front of the
//! ball's leading point, in order, and stops at the first line whose
//! crossing cell holds a brick. The earlier of the horizontal and
//! vertical results wins.

use serde::{Serialize, Deserialize};

use crate::core::kilo::{ceil_div, floor_div, KILO};
use crate::core::shapes::Rectangle;
use crate::core::vec2::{Point, Vector};
use crate::error::{BreakoutError, Result};
use crate::game::ball::{Ball, BallId};
use crate::game::brick::{Brick, BrickId, BrickKind};
use crate::game::collision::{earliest_collision, BrickCollision};
use crate::game::lock::LockGraph;

/// Grid of bricks plus the master/locked links between them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: i64,
    rows: i64,
    brick_width: i64,
    brick_height: i64,
    /// Row-major cells
    cells: Vec<Option<Brick>>,
    locks: LockGraph,
    next_id: u32,
}

impl BrickGrid {
    /// Create an empty grid.
    ///
    /// All four sizes must be strictly positive. Zero is rejected with
    /// [`BreakoutError::InvalidGridSize`]: a grid with no area leaves no
    /// playfield for the paddle or the balls.
    pub fn new(columns: i64, rows: i64, brick_width: i64, brick_height: i64) -> Result<Self> {
        if columns <= 0 || rows <= 0 || brick_width <= 0 || brick_height <= 0 {
            return Err(BreakoutError::InvalidGridSize { columns, rows, brick_width, brick_height });
        }

        Ok(Self {
            columns,
            rows,
            brick_width,
            brick_height,
            cells: vec![None; (columns * rows) as usize],
            locks: LockGraph::new(),
            next_id: 0,
        })
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    /// Number of columns.
    pub fn column_count(&self) -> i64 {
        self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> i64 {
        self.rows
    }

    /// Width of one brick.
    pub fn brick_width(&self) -> i64 {
        self.brick_width
    }

    /// Height of one brick.
    pub fn brick_height(&self) -> i64 {
        self.brick_height
    }

    /// Total width.
    pub fn width(&self) -> i64 {
        self.columns * self.brick_width
    }

    /// Total height.
    pub fn height(&self) -> i64 {
        self.rows * self.brick_height
    }

    /// Rectangle covered by the grid, anchored at the origin.
    pub fn bounding_rectangle(&self) -> Rectangle {
        Rectangle::from_parts(0, 0, self.width(), self.height())
    }

    /// Rectangle of the cell at `grid_position`.
    pub fn brick_rectangle(&self, grid_position: Point) -> Rectangle {
        Rectangle::from_parts(
            grid_position.x * self.brick_width,
            grid_position.y * self.brick_height,
            self.brick_width,
            self.brick_height,
        )
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// True if `p` names a cell of this grid.
    pub fn is_valid_grid_position(&self, p: Point) -> bool {
        (0..self.columns).contains(&p.x) && (0..self.rows).contains(&p.y)
    }

    fn index(&self, p: Point) -> usize {
        (p.y * self.columns + p.x) as usize
    }

    /// Brick at a valid grid position.
    pub fn brick_at(&self, grid_position: Point) -> Result<Option<&Brick>> {
        if !self.is_valid_grid_position(grid_position) {
            return Err(BreakoutError::InvalidGridPosition(grid_position));
        }
        Ok(self.cells[self.index(grid_position)].as_ref())
    }

    /// Brick at `grid_position`, or `None` when the cell is empty or outside
    /// the grid.
    pub fn brick_at_grid_position_or_none(&self, grid_position: Point) -> Option<&Brick> {
        self.brick_at(grid_position).ok().flatten()
    }

    /// True if a brick occupies `grid_position`.
    pub fn contains_brick_at(&self, grid_position: Point) -> bool {
        self.brick_at_grid_position_or_none(grid_position).is_some()
    }

    /// Grid position of the brick with this handle.
    pub fn position_of(&self, id: BrickId) -> Option<Point> {
        self.brick(id).map(Brick::grid_position)
    }

    /// Brick with this handle.
    pub fn brick(&self, id: BrickId) -> Option<&Brick> {
        self.cells.iter().flatten().find(|b| b.id() == id)
    }

    pub(crate) fn brick_mut(&mut self, id: BrickId) -> Option<&mut Brick> {
        self.cells.iter_mut().flatten().find(|b| b.id() == id)
    }

    /// All bricks in row-major order.
    pub fn bricks(&self) -> Vec<Brick> {
        self.cells.iter().flatten().cloned().collect()
    }

    /// Number of bricks left.
    pub fn brick_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// True if no brick is left.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    // =========================================================================
    // Factories
    // =========================================================================

    fn add_brick(&mut self, grid_position: Point, kind: BrickKind) -> Result<BrickId> {
        if self.brick_at(grid_position)?.is_some() {
            return Err(BreakoutError::CellOccupied(grid_position));
        }

        let id = BrickId(self.next_id);
        self.next_id += 1;
        let geometry = self.brick_rectangle(grid_position);
        let index = self.index(grid_position);
        self.cells[index] = Some(Brick::new(id, geometry, grid_position, kind));
        Ok(id)
    }

    /// Add a standard brick.
    pub fn add_standard_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::Standard)
    }

    /// Add a sturdy brick with `lives` hits to go.
    pub fn add_sturdy_brick(&mut self, grid_position: Point, lives: i64) -> Result<BrickId> {
        if lives < 0 {
            return Err(BreakoutError::NegativeLives(lives));
        }
        self.add_brick(grid_position, BrickKind::Sturdy { lives_left: lives })
    }

    /// Add a grow-paddle brick.
    pub fn add_grow_paddle_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::GrowPaddle)
    }

    /// Add a shrink-paddle brick.
    pub fn add_shrink_paddle_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::ShrinkPaddle)
    }

    /// Add a speed-up brick.
    pub fn add_speed_up_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::SpeedUp)
    }

    /// Add a slow-down brick.
    pub fn add_slow_down_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::SlowDown)
    }

    /// Add a weakening brick.
    pub fn add_weakening_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::Weakening)
    }

    /// Add a strengthening brick.
    pub fn add_strengthening_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::Strengthening)
    }

    /// Add a locked brick with no master yet.
    pub fn add_locked_brick(&mut self, grid_position: Point) -> Result<BrickId> {
        self.add_brick(grid_position, BrickKind::Locked { key_ball: None })
    }

    /// Add a master brick controlling `locked`.
    ///
    /// Every handle in `locked` must name a locked brick of this grid.
    /// Nothing is added if any of them does not.
    pub fn add_master_brick(&mut self, grid_position: Point, locked: &[BrickId]) -> Result<BrickId> {
        for &lock in locked {
            self.require_locked(lock)?;
        }

        let master = self.add_brick(grid_position, BrickKind::Master)?;
        for &lock in locked {
            self.locks.link(master, lock);
        }
        Ok(master)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a brick and every lock edge touching it.
    pub fn remove_brick(&mut self, id: BrickId) -> Result<Brick> {
        let position = self.position_of(id).ok_or(BreakoutError::UnknownBrick(id))?;
        let index = self.index(position);
        self.locks.unlink_all(id);
        self.cells[index].take().ok_or(BreakoutError::UnknownBrick(id))
    }

    /// Remove whatever brick occupies `grid_position`.
    pub fn remove_brick_at(&mut self, grid_position: Point) -> Result<Option<Brick>> {
        match self.brick_at(grid_position)?.map(Brick::id) {
            Some(id) => self.remove_brick(id).map(Some),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Locks
    // =========================================================================

    /// The master/locked relation.
    pub fn locks(&self) -> &LockGraph {
        &self.locks
    }

    /// Key ball currently bound to a locked brick.
    pub fn key_ball_of(&self, locked: BrickId) -> Option<BallId> {
        self.brick(locked).and_then(Brick::key_ball)
    }

    fn require_kind(&self, id: BrickId, locked: bool) -> Result<()> {
        let brick = self.brick(id).ok_or(BreakoutError::UnknownBrick(id))?;
        match (brick.kind(), locked) {
            (BrickKind::Locked { .. }, true) | (BrickKind::Master, false) => Ok(()),
            (_, true) => Err(BreakoutError::NotALockedBrick(id)),
            (_, false) => Err(BreakoutError::NotAMasterBrick(id)),
        }
    }

    pub(crate) fn require_locked(&self, id: BrickId) -> Result<()> {
        self.require_kind(id, true)
    }

    pub(crate) fn require_master(&self, id: BrickId) -> Result<()> {
        self.require_kind(id, false)
    }

    pub(crate) fn set_key_ball(&mut self, locked: BrickId, ball: Option<BallId>) -> Result<()> {
        self.require_locked(locked)?;
        if let Some(brick) = self.brick_mut(locked) {
            *brick.kind_mut() = BrickKind::Locked { key_ball: ball };
        }
        Ok(())
    }

    pub(crate) fn link_lock(&mut self, master: BrickId, locked: BrickId) -> Result<bool> {
        self.require_master(master)?;
        self.require_locked(locked)?;
        Ok(self.locks.link(master, locked))
    }

    pub(crate) fn unlink_lock(&mut self, master: BrickId, locked: BrickId) -> Result<bool> {
        self.require_master(master)?;
        self.require_locked(locked)?;
        Ok(self.locks.unlink(master, locked))
    }

    // =========================================================================
    // Collision search
    // =========================================================================

    /// Earliest collision between `ball` and any brick, if the ball is on
    /// course to hit one.
    pub fn find_earliest_collision(&self, ball: &Ball) -> Option<BrickCollision> {
        let v = ball.velocity();
        let p = ball.geometry().point_in_direction(v);

        let horizontal = match v.x {
            x if x < 0 => self.scan_left(p, v),
            x if x > 0 => self.scan_right(p, v),
            _ => None,
        };
        let vertical = match v.y {
            y if y < 0 => self.scan_up(p, v),
            y if y > 0 => self.scan_down(p, v),
            _ => None,
        };

        earliest_collision(horizontal, vertical)
    }

    fn hit_at(&self, cell: Point, precise_t: i64, kilo_normal: Vector) -> Option<BrickCollision> {
        self.brick_at_grid_position_or_none(cell)
            .map(|b| BrickCollision::from_parts(precise_t / KILO, kilo_normal, b.id()))
    }

    fn scan_up(&self, p: Point, v: Vector) -> Option<BrickCollision> {
        let h = self.brick_height;
        let mut y = floor_div(p.y, h) * h;
        while y > 0 {
            let precise_t = (y - p.y) * KILO / v.y;
            let x = p.x + v.x * precise_t / KILO;
            let cell = Point::new(floor_div(x, self.brick_width), floor_div(y, h) - 1);
            if let Some(c) = self.hit_at(cell, precise_t, Vector::KILO_DOWN) {
                return Some(c);
            }
            y -= h;
        }
        None
    }

    fn scan_down(&self, p: Point, v: Vector) -> Option<BrickCollision> {
        let h = self.brick_height;
        let mut y = ceil_div(p.y, h) * h;
        while y < self.height() {
            let precise_t = (y - p.y) * KILO / v.y;
            let x = p.x + v.x * precise_t / KILO;
            let cell = Point::new(floor_div(x, self.brick_width), floor_div(y, h));
            if let Some(c) = self.hit_at(cell, precise_t, Vector::KILO_UP) {
                return Some(c);
            }
            y += h;
        }
        None
    }

    fn scan_left(&self, p: Point, v: Vector) -> Option<BrickCollision> {
        let w = self.brick_width;
        let mut x = floor_div(p.x, w) * w;
        while x > 0 {
            let precise_t = (x - p.x) * KILO / v.x;
            let y = p.y + v.y * precise_t / KILO;
            let cell = Point::new(floor_div(x, w) - 1, floor_div(y, self.brick_height));
            if let Some(c) = self.hit_at(cell, precise_t, Vector::KILO_RIGHT) {
                return Some(c);
            }
            x -= w;
        }
        None
    }

    fn scan_right(&self, p: Point, v: Vector) -> Option<BrickCollision> {
        let w = self.brick_width;
        let mut x = ceil_div(p.x, w) * w;
        while x < self.width() {
            let precise_t = (x - p.x) * KILO / v.x;
            let y = p.y + v.y * precise_t / KILO;
            let cell = Point::new(floor_div(x, w), floor_div(y, self.brick_height));
            if let Some(c) = self.hit_at(cell, precise_t, Vector::KILO_LEFT) {
                return Some(c);
            }
            x += w;
        }
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shapes::Circle;
    use crate::game::behavior::BallBehavior;

    fn grid() -> BrickGrid {
        BrickGrid::new(10, 10, 10000, 2000).unwrap()
    }

    fn ball_at(x: i64, y: i64, v: Vector) -> Ball {
        let area = Rectangle::new(0, 0, 100000, 20500).unwrap();
        let geometry = Circle::new(Point::new(x, y), 500).unwrap();
        Ball::new(BallId(0), area, geometry, v, BallBehavior::Standard)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let g = grid();
        assert_eq!(g.column_count(), 10);
        assert_eq!(g.row_count(), 10);
        assert_eq!(g.width(), 100000);
        assert_eq!(g.height(), 20000);
        assert_eq!(g.bounding_rectangle(), Rectangle::new(0, 0, 100000, 20000).unwrap());
        assert!(g.is_empty());
        assert!(g.bricks().is_empty());
        assert!(!g.contains_brick_at(Point::new(3, 3)));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(BrickGrid::new(0, 10, 1, 1), Err(BreakoutError::InvalidGridSize { .. })));
        assert!(BrickGrid::new(10, 10, 10, -1).is_err());
        assert!(BrickGrid::new(10, 0, 10, 10).is_err());
        assert!(BrickGrid::new(10, 10, 0, 10).is_err());
    }

    #[test]
    fn test_add_and_remove() {
        let mut g = grid();
        let a = g.add_standard_brick(Point::new(2, 3)).unwrap();
        let b = g.add_sturdy_brick(Point::new(0, 0), 3).unwrap();
        assert_ne!(a, b);
        assert_eq!(g.brick_count(), 2);

        let brick = g.brick_at(Point::new(2, 3)).unwrap().unwrap();
        assert_eq!(brick.id(), a);
        assert_eq!(brick.geometry(), Rectangle::new(20000, 6000, 10000, 2000).unwrap());

        // Row-major order
        let ids: Vec<_> = g.bricks().iter().map(Brick::id).collect();
        assert_eq!(ids, vec![b, a]);

        g.remove_brick(a).unwrap();
        assert!(g.brick(a).is_none());
        assert_eq!(g.remove_brick(a), Err(BreakoutError::UnknownBrick(a)));
        assert_eq!(g.remove_brick_at(Point::new(0, 0)).unwrap().map(|b| b.id()), Some(b));
        assert!(g.is_empty());
    }

    #[test]
    fn test_add_rejects_bad_positions() {
        let mut g = grid();
        g.add_standard_brick(Point::new(1, 1)).unwrap();
        let snapshot = g.clone();

        assert_eq!(g.add_standard_brick(Point::new(1, 1)), Err(BreakoutError::CellOccupied(Point::new(1, 1))));
        assert_eq!(g.add_slow_down_brick(Point::new(10, 0)), Err(BreakoutError::InvalidGridPosition(Point::new(10, 0))));
        assert_eq!(g.add_sturdy_brick(Point::new(2, 2), -1), Err(BreakoutError::NegativeLives(-1)));
        assert_eq!(g, snapshot);
        assert!(g.brick_at(Point::new(-1, 0)).is_err());
        assert!(g.brick_at_grid_position_or_none(Point::new(-1, 0)).is_none());
    }

    #[test]
    fn test_master_brick_requires_locked_bricks() {
        let mut g = grid();
        let lock = g.add_locked_brick(Point::new(0, 0)).unwrap();
        let plain = g.add_standard_brick(Point::new(1, 0)).unwrap();

        assert_eq!(g.add_master_brick(Point::new(2, 0), &[lock, plain]), Err(BreakoutError::NotALockedBrick(plain)));
        assert!(!g.contains_brick_at(Point::new(2, 0)));

        let master = g.add_master_brick(Point::new(2, 0), &[lock]).unwrap();
        assert_eq!(g.locks().locked_bricks_of(master), vec![lock]);

        assert_eq!(g.link_lock(master, plain), Err(BreakoutError::NotALockedBrick(plain)));
        assert_eq!(g.link_lock(lock, lock), Err(BreakoutError::NotAMasterBrick(lock)));
        assert_eq!(g.link_lock(master, lock), Ok(false));

        g.remove_brick(lock).unwrap();
        assert!(g.locks().edges().is_empty());
    }

    #[test]
    fn test_scan_up() {
        let mut g = grid();
        let brick = g.add_standard_brick(Point::new(5, 2)).unwrap();
        // Top point at y = 12500; brick bottom at y = 6000
        let c = g.find_earliest_collision(&ball_at(55000, 13000, Vector::new(0, -50))).unwrap();
        assert_eq!(c.brick(), brick);
        assert_eq!(c.millis_until_collision(), 130);
        assert_eq!(c.kilo_normal(), Vector::KILO_DOWN);
    }

    #[test]
    fn test_scan_down() {
        let mut g = grid();
        let brick = g.add_standard_brick(Point::new(5, 8)).unwrap();
        // Bottom point at y = 10500; brick top at y = 16000
        let c = g.find_earliest_collision(&ball_at(55000, 10000, Vector::new(0, 50))).unwrap();
        assert_eq!(c.brick(), brick);
        assert_eq!(c.millis_until_collision(), 110);
        assert_eq!(c.kilo_normal(), Vector::KILO_UP);
    }

    #[test]
    fn test_scan_left_and_right() {
        let mut g = grid();
        let left = g.add_standard_brick(Point::new(1, 5)).unwrap();
        let right = g.add_standard_brick(Point::new(8, 5)).unwrap();

        // Leftmost point at x = 44500; brick (1, 5) right edge at 20000
        let c = g.find_earliest_collision(&ball_at(45000, 11000, Vector::new(-50, 0))).unwrap();
        assert_eq!(c.brick(), left);
        assert_eq!(c.millis_until_collision(), 490);
        assert_eq!(c.kilo_normal(), Vector::KILO_RIGHT);

        // Rightmost point at x = 45500; brick (8, 5) left edge at 80000
        let c = g.find_earliest_collision(&ball_at(45000, 11000, Vector::new(50, 0))).unwrap();
        assert_eq!(c.brick(), right);
        assert_eq!(c.millis_until_collision(), 690);
        assert_eq!(c.kilo_normal(), Vector::KILO_LEFT);
    }

    #[test]
    fn test_earliest_axis_wins() {
        let mut g = grid();
        let above = g.add_standard_brick(Point::new(5, 4)).unwrap();
        g.add_standard_brick(Point::new(9, 5)).unwrap();
        // Moving up and right: the brick above is much closer
        let c = g.find_earliest_collision(&ball_at(55000, 11000, Vector::new(10, -10))).unwrap();
        assert_eq!(c.brick(), above);
        assert_eq!(c.kilo_normal(), Vector::KILO_DOWN);
    }

    #[test]
    fn test_no_collision_in_empty_grid() {
        let g = grid();
        assert!(g.find_earliest_collision(&ball_at(55000, 11000, Vector::new(10, -10))).is_none());
        assert!(g.find_earliest_collision(&ball_at(55000, 11000, Vector::ZERO)).is_none());
    }
}
