//! Purpose: non-overlapping floating-point expansions (Shewchuk-style)
//! and the primitive operations that build and combine them. Every
//! adaptive predicate in [`crate::predicates`] is built out of these.
//!
//! Why this design: an expansion represents a real value exactly as a
//! sum of non-overlapping `f64` components. Combining two expansions
//! (`sum_expansions`) or an expansion and a scalar (`scale_expansion`)
//! again produces a non-overlapping expansion representing the exact
//! sum/product in real arithmetic, with no rounding loss anywhere in
//! the pipeline. The three-stage adaptive predicates only fall back to
//! building a full expansion when the cheap floating-point filters
//! cannot prove the sign; everything here is allocation-free up to the
//! inline capacity of [`Expansion`].

use smallvec::SmallVec;

use crate::error_bounds::SPLITTER;

/// A non-overlapping expansion, ordered from least to most significant
/// component. Stack-sized for the handful of components the stage-1/2
/// predicate paths ever need; spills to the heap for larger sums
/// produced by `sum_expansions` chains in stage 3.
pub type Expansion = SmallVec<[f64; 4]>;

/// `a + b = s + e` exactly, with `s` the correctly-rounded sum.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bvirt = s - a;
    let avirt = s - bvirt;
    let bround = b - bvirt;
    let around = a - avirt;
    (s, around + bround)
}

/// Like [`two_sum`] but only valid when `|a| >= |b|`; one subtraction
/// cheaper.
#[inline]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bvirt = s - a;
    (s, b - bvirt)
}

/// `a - b = s + e` exactly.
#[inline]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let s = a - b;
    let bvirt = a - s;
    let avirt = s + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    (s, around + bround)
}

/// Recovers the rounding error of an already-computed difference
/// `d = a - b`, i.e. the second component `two_diff(a, b)` would have
/// produced, without redoing the subtraction.
#[inline]
pub fn two_diff_tail(a: f64, b: f64, d: f64) -> f64 {
    let bvirt = a - d;
    let avirt = d + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    around + bround
}

/// Splits `a` into a high and low half of `p/2` significand bits each,
/// `a = a_hi + a_lo` exactly.
#[inline]
pub fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let a_big = c - a;
    let a_hi = c - a_big;
    let a_lo = a - a_hi;
    (a_hi, a_lo)
}

/// `a * b = p + e` exactly.
#[inline]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let (a_hi, a_lo) = split(a);
    let (b_hi, b_lo) = split(b);
    let err1 = p - a_hi * b_hi;
    let err2 = err1 - a_lo * b_hi;
    let err3 = err2 - a_hi * b_lo;
    let e = a_lo * b_lo - err3;
    (p, e)
}

/// `a * a = p + e` exactly; cheaper than `two_product(a, a)` since the
/// split is shared between the two operands.
#[inline]
pub fn square(a: f64) -> (f64, f64) {
    let p = a * a;
    let (a_hi, a_lo) = split(a);
    let err1 = p - a_hi * a_hi;
    let err3 = err1 - (a_hi + a_hi) * a_lo;
    let e = a_lo * a_lo - err3;
    (p, e)
}

/// Builds the 3-component expansion of `(a1 + a0) + b`, where `(a1,
/// a0)` is an existing 2-component expansion (`a1` dominant) and `b` a
/// plain scalar.
#[inline]
pub fn two_one_sum(a1: f64, a0: f64, b: f64) -> (f64, f64, f64) {
    let (i, x0) = two_sum(a0, b);
    let (x2, x1) = two_sum(a1, i);
    (x2, x1, x0)
}

/// Builds the 3-component expansion of `(a1 + a0) - b`.
#[inline]
pub fn two_one_diff(a1: f64, a0: f64, b: f64) -> (f64, f64, f64) {
    let (i, x0) = two_diff(a0, b);
    let (x2, x1) = two_sum(a1, i);
    (x2, x1, x0)
}

/// Builds the 4-component expansion of `(a1+a0) + (b1+b0)`.
#[inline]
pub fn two_two_sum(a1: f64, a0: f64, b1: f64, b0: f64) -> (f64, f64, f64, f64) {
    let (j, mid, x0) = two_one_sum(a1, a0, b0);
    let (x3, x2, x1) = two_one_sum(j, mid, b1);
    (x3, x2, x1, x0)
}

/// Builds the 4-component expansion of `(a1+a0) - (b1+b0)`.
#[inline]
pub fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> (f64, f64, f64, f64) {
    let (j, mid, x0) = two_one_diff(a1, a0, b0);
    let (x3, x2, x1) = two_one_diff(j, mid, b1);
    (x3, x2, x1, x0)
}

/// Merges two non-overlapping expansions into a single non-overlapping
/// expansion representing their exact sum, dropping exact-zero
/// components (a singleton zero is preserved when the total is zero).
///
/// This is Shewchuk's linear-time merge: treat `e` and `f` as streams
/// ordered by increasing magnitude, repeatedly pull the
/// smaller-magnitude head and fold it in with `fast_two_sum`/`two_sum`.
pub fn sum_expansions(e: &[f64], f: &[f64]) -> Expansion {
    if e.is_empty() {
        return singleton_or_zero(f);
    }
    if f.is_empty() {
        return singleton_or_zero(e);
    }

    let mut ei = 0usize;
    let mut fi = 0usize;
    let mut out: Expansion = Expansion::new();

    let mut q;
    let mut g;
    if f[fi].abs() > e[ei].abs() {
        q = e[ei];
        ei += 1;
    } else {
        q = f[fi];
        fi += 1;
    }

    if ei < e.len() && fi < f.len() {
        if f[fi].abs() > e[ei].abs() {
            let (qnew, h) = fast_two_sum(e[ei], q);
            ei += 1;
            q = qnew;
            push_nonzero(&mut out, h);
        } else {
            let (qnew, h) = fast_two_sum(f[fi], q);
            fi += 1;
            q = qnew;
            push_nonzero(&mut out, h);
        }
    }

    while ei < e.len() && fi < f.len() {
        if f[fi].abs() > e[ei].abs() {
            let (qnew, h) = two_sum(q, e[ei]);
            ei += 1;
            q = qnew;
            push_nonzero(&mut out, h);
        } else {
            let (qnew, h) = two_sum(q, f[fi]);
            fi += 1;
            q = qnew;
            push_nonzero(&mut out, h);
        }
    }
    while ei < e.len() {
        let (qnew, h) = two_sum(q, e[ei]);
        ei += 1;
        q = qnew;
        push_nonzero(&mut out, h);
    }
    while fi < f.len() {
        g = f[fi];
        let (qnew, h) = two_sum(q, g);
        fi += 1;
        q = qnew;
        push_nonzero(&mut out, h);
    }

    push_nonzero(&mut out, q);
    if out.is_empty() {
        out.push(0.0);
    }
    out
}

/// Multiplies an expansion by a scalar, producing a non-overlapping
/// expansion for the exact product.
pub fn scale_expansion(e: &[f64], b: f64) -> Expansion {
    if e.is_empty() || (e.len() == 1 && e[0] == 0.0) {
        let mut out = Expansion::new();
        out.push(0.0);
        return out;
    }
    let mut out: Expansion = Expansion::new();
    let (mut q, h0) = two_product(e[0], b);
    push_nonzero(&mut out, h0);
    for &ei in &e[1..] {
        let (t, ti) = two_product(ei, b);
        let (sum, err1) = two_sum(q, ti);
        push_nonzero(&mut out, err1);
        let (qnew, err2) = fast_two_sum(t, sum);
        q = qnew;
        push_nonzero(&mut out, err2);
    }
    push_nonzero(&mut out, q);
    if out.is_empty() {
        out.push(0.0);
    }
    out
}

/// Negates every component of an expansion; still non-overlapping.
pub fn negate_expansion(e: &[f64]) -> Expansion {
    e.iter().map(|x| -x).collect()
}

/// A cheap, not necessarily exact, estimate of an expansion's value:
/// the plain floating-point sum of its components. Good enough to
/// compare against an error bound; the sign of the *exact* value is
/// only guaranteed once the caller has checked the estimate against
/// the appropriate bound (or consumed the full expansion directly).
#[inline]
pub fn estimate(e: &[f64]) -> f64 {
    e.iter().sum()
}

#[inline]
fn push_nonzero(out: &mut Expansion, value: f64) {
    if value != 0.0 {
        out.push(value);
    }
}

fn singleton_or_zero(e: &[f64]) -> Expansion {
    let mut out: Expansion = e.iter().copied().filter(|&x| x != 0.0).collect();
    if out.is_empty() {
        out.push(0.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sum_is_exact() {
        let a = 1.0;
        let b = f64::EPSILON / 4.0;
        let (s, e) = two_sum(a, b);
        assert_eq!(s, a + b);
        // Exact real sum recovered by summing s + e.
        assert!((s + e - a - b).abs() <= f64::EPSILON);
    }

    #[test]
    fn two_product_recovers_exact_value() {
        let a = 1.0 + f64::EPSILON;
        let b = 3.0 + f64::EPSILON;
        let (p, e) = two_product(a, b);
        // p + e should match a high precision reference more closely
        // than p alone for inputs chosen to stress rounding.
        let ref_val = (a as f64) * (b as f64);
        assert_eq!(p, ref_val);
        assert!(e.abs() < 1e-10);
    }

    #[test]
    fn split_reconstructs_input() {
        let a = 12345.6789_f64;
        let (hi, lo) = split(a);
        assert_eq!(hi + lo, a);
    }

    #[test]
    fn sum_expansions_matches_naive_sum() {
        let e: Expansion = [1.0, 1e-20].into_iter().collect();
        let f: Expansion = [2.0, 1e-21].into_iter().collect();
        let sum = sum_expansions(&e, &f);
        let total: f64 = estimate(&sum);
        assert!((total - 3.0).abs() < 1e-10);
    }

    #[test]
    fn scale_expansion_matches_naive_product() {
        let e: Expansion = [1.0, 1e-16].into_iter().collect();
        let scaled = scale_expansion(&e, 2.0);
        let total = estimate(&scaled);
        assert!((total - 2.0).abs() < 1e-10);
    }

    #[test]
    fn zero_expansion_is_singleton() {
        let e: Expansion = [0.0].into_iter().collect();
        let f: Expansion = [0.0].into_iter().collect();
        let sum = sum_expansions(&e, &f);
        assert_eq!(&sum[..], &[0.0]);
    }
}
