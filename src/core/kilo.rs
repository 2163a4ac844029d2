//! Kilo-Scaled Integer Arithmetic
//!
//! The engine never touches floating point. Directions, normals and
//! scaling factors are integers multiplied by [`KILO`]: a kilo-unit vector
//! has length 1000, a kilo-factor of 1050 means "times 1.05".
//!
//! All helpers are pure and platform independent.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Scale of a kilo value (1.0 == 1000).
pub const KILO: i64 = 1000;

/// `KILO * KILO`, the squared length of a kilo-unit vector.
pub const KILO_SQUARED: i64 = KILO * KILO;

/// Largest deviation of a kilo-unit vector's length from [`KILO`].
pub const KILO_UNIT_TOLERANCE: i64 = 1;

// =============================================================================
// HELPERS
// =============================================================================

/// Multiply by a kilo-factor: `value * factor / 1000`, truncating toward zero.
#[inline]
pub fn kilo_mul(value: i64, factor: i64) -> i64 {
    value * factor / KILO
}

/// Floor division (rounds toward negative infinity).
///
/// Used for every grid-cell lookup so that cell boundaries behave the same
/// on both sides of the origin.
#[inline]
pub fn floor_div(value: i64, divisor: i64) -> i64 {
    value.div_euclid(divisor) - if divisor < 0 && value.rem_euclid(divisor) != 0 { 1 } else { 0 }
}

/// Ceiling division (rounds toward positive infinity).
#[inline]
pub fn ceil_div(value: i64, divisor: i64) -> i64 {
    -floor_div(-value, divisor)
}

/// Integer square root, rounded down. Returns 0 for non-positive input.
pub fn isqrt(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }

    // Newton-Raphson from an over-estimate converges monotonically downward
    let mut guess = value;
    let mut next = (guess + 1) / 2;
    while next < guess {
        guess = next;
        next = (guess + value / guess) / 2;
    }

    guess
}

// =============================================================================
// TESTS
// =============================================================================
