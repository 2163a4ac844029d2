//! Master/Locked Link Graph
//!
//! Master bricks control locked bricks. Instead of the two kinds holding
//! references to each other, the brick grid owns one edge list: a master
//! "controls" a locked brick iff the edge `(master, locked)` is present.
//! Both directions of the relation are read from the same list, so they
//! cannot disagree.
//!
//! ```text
//!   M1 ──┬──► L1        locked_bricks_of(M1) = [L1, L2]
//!        └──► L2        master_bricks_of(L2) = [M1, M2]
//!   M2 ─────► L2
//! ```
//!
//! Edges keep insertion order; a master's locked bricks are listed in the
//! order they were linked.

use serde::{Serialize, Deserialize};

use crate::game::brick::BrickId;

/// Lowest speed modifier a key ball can carry.
pub const MIN_SPEED_MODIFIER: i64 = -3;

/// Highest speed modifier a key ball can carry.
pub const MAX_SPEED_MODIFIER: i64 = 2;

/// One master -> locked edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockEdge {
    /// Controlling master brick
    pub master: BrickId,
    /// Controlled locked brick
    pub locked: BrickId,
}

/// The set of master/locked edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockGraph {
    edges: Vec<LockEdge>,
}

impl LockGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[LockEdge] {
        &self.edges
    }

    /// True if `master` controls `locked`.
    pub fn is_linked(&self, master: BrickId, locked: BrickId) -> bool {
        self.edges.contains(&LockEdge { master, locked })
    }

    /// Locked bricks controlled by `master`, in link order.
    pub fn locked_bricks_of(&self, master: BrickId) -> Vec<BrickId> {
        self.edges
            .iter()
            .filter(|e| e.master == master)
            .map(|e| e.locked)
            .collect()
    }

    /// Master bricks controlling `locked`, in link order.
    pub fn master_bricks_of(&self, locked: BrickId) -> Vec<BrickId> {
        self.edges
            .iter()
            .filter(|e| e.locked == locked)
            .map(|e| e.master)
            .collect()
    }

    /// Add an edge. Returns false if it already existed.
    pub(crate) fn link(&mut self, master: BrickId, locked: BrickId) -> bool {
        if self.is_linked(master, locked) {
            return false;
        }
        self.edges.push(LockEdge { master, locked });
        true
    }

    /// Remove an edge. Returns false if it did not exist.
    pub(crate) fn unlink(&mut self, master: BrickId, locked: BrickId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| !(e.master == master && e.locked == locked));
        self.edges.len() != before
    }

    /// Remove every edge touching `brick`, on either side.
    pub(crate) fn unlink_all(&mut self, brick: BrickId) {
        self.edges.retain(|e| e.master != brick && e.locked != brick);
    }

    /// Speed modifier for the key ball bound to `locked`.
    ///
    /// The sign is +1 when the locked brick has an odd number of masters
    /// and -1 when even; the magnitude is the largest number of locked
    /// bricks any of those masters controls. The result is clamped to
    /// `[MIN_SPEED_MODIFIER, MAX_SPEED_MODIFIER]`.
    pub fn speed_modifier(&self, locked: BrickId) -> i64 {
        let masters = self.master_bricks_of(locked);
        let sign = if masters.len() % 2 == 0 { -1 } else { 1 };
        let magnitude = masters
            .iter()
            .map(|&m| self.locked_bricks_of(m).len() as i64)
            .max()
            .unwrap_or(0);

        (sign * magnitude).clamp(MIN_SPEED_MODIFIER, MAX_SPEED_MODIFIER)
    }
}

// =============================================================================
// TESTS
// =============================================================================
