//! Purpose: the compile-time constants and closed-form error bounds
//! that every L3 adaptive predicate gates its stages against.
//!
//! Why const instead of lazy-init: the historical implementation
//! derives `epsilon`/`splitter` at process start with a doubling loop
//! because its host float representation was not fixed at compile
//! time. This crate targets `f64`/IEEE-754 exclusively, so the same
//! values are `const`. The doubling loop is kept (see `tests`) purely
//! as a cross-check that the constants below are the ones IEEE-754
//! binary64 actually implies.

/// Half the gap between 1.0 and the next representable `f64`, i.e.
/// Shewchuk's `epsilon` (not `f64::EPSILON`, which is the full gap).
pub const EPSILON: f64 = f64::EPSILON * 0.5;

/// `2^ceil(p/2) + 1` for `f64`'s 53-bit significand: splits a float
/// into high/low halves with `p/2` bits each in [`crate::expansion::split`].
pub const SPLITTER: f64 = 134_217_729.0; // 2^27 + 1

const fn bound(c1: f64, c2: f64) -> f64 {
    (c1 + c2 * EPSILON) * EPSILON
}

const fn bound_sq(c1: f64, c2: f64) -> f64 {
    (c1 + c2 * EPSILON) * EPSILON * EPSILON
}

/// Stage-1 filter bound for the orientation/parallelogram-area predicate.
#[inline]
pub fn determinant_error(magnitude_sum: f64) -> f64 {
    const CCW_A: f64 = bound(3.0, 16.0);
    CCW_A * magnitude_sum
}

#[inline]
pub fn signed_measure_first_error(magnitude_sum: f64) -> f64 {
    determinant_error(magnitude_sum)
}

#[inline]
pub fn signed_measure_second_error(magnitude_sum: f64) -> f64 {
    const CCW_B: f64 = bound(2.0, 12.0);
    CCW_B * magnitude_sum
}

#[inline]
pub fn signed_measure_third_error(magnitude_sum: f64) -> f64 {
    const CCW_C: f64 = bound_sq(9.0, 64.0);
    CCW_C * magnitude_sum
}

/// Stage-1 filter bound for in-circle, keyed off the matrix "permanent"
/// (sum of absolute values of the terms that make up the determinant).
#[inline]
pub fn cocircular_first_error(permanent: f64) -> f64 {
    const ICC_A: f64 = bound(10.0, 96.0);
    ICC_A * permanent
}

#[inline]
pub fn cocircular_second_error(permanent: f64) -> f64 {
    const ICC_B: f64 = bound(4.0, 48.0);
    ICC_B * permanent
}

#[inline]
pub fn cocircular_third_error(permanent: f64) -> f64 {
    const ICC_C: f64 = bound_sq(44.0, 576.0);
    ICC_C * permanent
}

/// Circumcircle-determinant bounds: algebraically the same 4x4
/// determinant as in-circle, kept as named entry points because
/// historical callers carried distinct tables for the two uses.
#[inline]
pub fn circumcircle_error_a(permanent: f64) -> f64 {
    cocircular_first_error(permanent)
}

#[inline]
pub fn circumcircle_error_b(permanent: f64) -> f64 {
    cocircular_second_error(permanent)
}

#[inline]
pub fn circumcircle_error_c(permanent: f64) -> f64 {
    cocircular_third_error(permanent)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cross-check: the classical doubling loop (used by the historical
    /// runtime lazy-init) must agree with the `f64`/IEEE-754 constants
    /// above. Kept so a future change of target float representation
    /// cannot silently drift from its derivation.
    #[test]
    fn doubling_loop_matches_constants() {
        let mut epsilon = 1.0_f64;
        let mut splitter = 1.0_f64;
        let mut every_other = true;
        let mut check = 1.0_f64;
        loop {
            let last_check = check;
            epsilon *= 0.5;
            if every_other {
                splitter *= 2.0;
            }
            every_other = !every_other;
            check = 1.0 + epsilon;
            if check == 1.0 || check == last_check {
                break;
            }
        }
        splitter += 1.0;
        assert_eq!(epsilon, EPSILON);
        assert_eq!(splitter, SPLITTER);
    }

    #[test]
    fn bounds_scale_with_magnitude() {
        assert!(determinant_error(2.0) > determinant_error(1.0));
        assert_eq!(determinant_error(0.0), 0.0);
    }
}
