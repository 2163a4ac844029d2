//! State Hashing
//!
//! Deterministic SHA-256 digests of game state, used to check that two
//! runs fed the same commands end in the same state.

use sha2::{Digest, Sha256};

use super::vec2::{Point, Vector};
use super::shapes::{Circle, Rectangle};

/// SHA-256 digest of a game state.
pub type StateHash = [u8; 32];

/// Feeds engine values into SHA-256 in a fixed byte encoding.
///
/// Integers are written little-endian, composite values field by field.
/// Two states hash equal only if they were fed in the same order.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Start a digest prefixed with `domain`.
    pub fn new(domain: &[u8]) -> Self {
        Self { hasher: Sha256::new_with_prefix(domain) }
    }

    /// Digest prefixed with the game-state domain.
    pub fn for_game_state() -> Self {
        Self::new(b"BREAKOUT_STATE_V1")
    }

    /// Append raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Append one byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Append a `u32`.
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Append an `i64`.
    #[inline]
    pub fn update_i64(&mut self, value: i64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Append a flag as one byte.
    #[inline]
    pub fn update_bool(&mut self, flag: bool) {
        self.update_u8(u8::from(flag));
    }

    /// Append both coordinates.
    #[inline]
    pub fn update_point(&mut self, p: Point) {
        self.update_i64(p.x);
        self.update_i64(p.y);
    }

    /// Append both components.
    #[inline]
    pub fn update_vector(&mut self, v: Vector) {
        self.update_i64(v.x);
        self.update_i64(v.y);
    }

    /// Append centre, then radius.
    pub fn update_circle(&mut self, c: &Circle) {
        self.update_point(c.center());
        self.update_i64(c.radius());
    }

    /// Append top-left corner, then width and height.
    pub fn update_rectangle(&mut self, r: &Rectangle) {
        self.update_point(r.top_left());
        self.update_i64(r.width());
        self.update_i64(r.height());
    }

    /// Consume the hasher and return the digest.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(domain: &[u8], values: &[i64]) -> StateHash {
        let mut h = StateHasher::new(domain);
        for &v in values {
            h.update_i64(v);
        }
        h.finalize()
    }

    #[test]
    fn test_same_input_same_digest() {
        let ball = |h: &mut StateHasher| {
            h.update_u32(7);
            h.update_point(Point::new(12500, 14000));
            h.update_vector(Vector::new(25, -25));
            h.update_bool(false);
        };
        let mut a = StateHasher::for_game_state();
        let mut b = StateHasher::for_game_state();
        ball(&mut a);
        ball(&mut b);
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_update_order_changes_digest() {
        assert_ne!(digest_of(b"order", &[3, 4]), digest_of(b"order", &[4, 3]));
    }

    #[test]
    fn test_domain_prefix_changes_digest() {
        assert_ne!(digest_of(b"BREAKOUT_STATE_V1", &[1]), digest_of(b"BREAKOUT_STATE_V2", &[1]));
        assert_eq!(
            StateHasher::for_game_state().finalize(),
            StateHasher::new(b"BREAKOUT_STATE_V1").finalize()
        );
    }

    #[test]
    fn test_point_and_vector_encode_alike() {
        // Both are plain coordinate pairs on the wire
        let mut a = StateHasher::new(b"pair");
        a.update_point(Point::new(-2, 9));
        let mut b = StateHasher::new(b"pair");
        b.update_vector(Vector::new(-2, 9));
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_circle_and_its_bounding_box_differ() {
        let circle = Circle::new(Point::new(10, 10), 5).unwrap();

        let mut a = StateHasher::new(b"shapes");
        a.update_circle(&circle);
        let mut b = StateHasher::new(b"shapes");
        b.update_rectangle(&circle.bounding_rectangle());

        assert_ne!(a.finalize(), b.finalize());
    }
}
