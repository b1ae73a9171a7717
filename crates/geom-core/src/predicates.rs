//! Purpose: adaptive-precision geometric predicates over `f64`
//! coordinates — orientation, the general parallelogram signed area,
//! in-circle, the circumcircle determinant, and signed projection
//! length. Every layer above L4 decides geometry exclusively through
//! these functions; none of them ever guesses.
//!
//! Why adaptive staging: a plain `f64` determinant is wrong near the
//! decision boundary (collinear triples, cocircular quadruples) due to
//! rounding. Each predicate here computes a cheap floating-point
//! estimate first and only pays for exact expansion arithmetic when
//! the estimate is too close to zero to trust, per the error bounds in
//! [`crate::error_bounds`]. The three named stages below collapse
//! Shewchuk's two-phase "moderate precision, then full exactness"
//! structure into: stage 1 (fast filter), stage 2 (4-component
//! expansion via [`crate::expansion::two_two_diff`]), stage 3 (tail
//! correction, falling through to a fully exact expansion sum that is
//! correct by construction and needs no further bound check).

use crate::error_bounds::{
    circumcircle_error_a, circumcircle_error_b, circumcircle_error_c, cocircular_first_error,
    cocircular_second_error, cocircular_third_error, signed_measure_first_error,
    signed_measure_second_error, signed_measure_third_error,
};
use crate::expansion::{
    estimate, negate_expansion, scale_expansion, sum_expansions, two_diff, two_product,
    two_two_diff, Expansion,
};
use crate::geom2::point::Point;

/// Signed area of the parallelogram `(first_end-first_start) x
/// (second_end-second_start)`, adaptively refined. `orientation` is
/// the special case `first_start == second_start == a`.
pub fn signed_parallelogram_area(
    first_start: &Point<f64>,
    first_end: &Point<f64>,
    second_start: &Point<f64>,
    second_end: &Point<f64>,
) -> f64 {
    let ux = first_end.x - first_start.x;
    let uy = first_end.y - first_start.y;
    let vx = second_end.x - second_start.x;
    let vy = second_end.y - second_start.y;

    let detleft = ux * vy;
    let detright = uy * vx;
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return det;
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return det;
        }
        -detleft - detright
    } else {
        return det;
    };

    let errbound = signed_measure_first_error(detsum);
    if det >= errbound || -det >= errbound {
        return det;
    }

    adaptive_cross_product(ux, uy, vx, vy, detsum)
}

/// `orientation(a, b, c)`: signed area of `(b-a) x (c-a)`.
pub fn orientation(a: &Point<f64>, b: &Point<f64>, c: &Point<f64>) -> f64 {
    signed_parallelogram_area(a, b, a, c)
}

/// Signed length of the projection used by segment/point containment:
/// the parallelogram-area predicate with the second vector rotated 90
/// degrees counter-clockwise.
pub fn signed_projection_length(
    s1: &Point<f64>,
    e1: &Point<f64>,
    s2: &Point<f64>,
    e2: &Point<f64>,
) -> f64 {
    // Rotate (e2 - s2) by +90 degrees: (x, y) -> (-y, x).
    let rs2 = Point::xy(-s2.y, s2.x);
    let re2 = Point::xy(-e2.y, e2.x);
    signed_parallelogram_area(s1, e1, &rs2, &re2)
}

/// Stage 2/3 of the 3-point adaptive orientation predicate, entered
/// once the stage-1 filter cannot prove a sign. `ux, uy, vx, vy` are
/// the stage-1 plain-subtraction vector components; stage 2 treats
/// them as exact and refines the cross product to 4 components, stage
/// 3 accounts for their own rounding tails and, if still undecided,
/// falls through to `exact_cross_product`, which is exact regardless
/// of any bound.
fn adaptive_cross_product(ux: f64, uy: f64, vx: f64, vy: f64, detsum: f64) -> f64 {
    let (detleft, detlefttail) = two_product(ux, vy);
    let (detright, detrighttail) = two_product(uy, vx);
    let (b3, b2, b1, b0) = two_two_diff(detleft, detlefttail, detright, detrighttail);
    let b: Expansion = [b0, b1, b2, b3].into_iter().collect();
    let det2 = estimate(&b);

    let errbound2 = signed_measure_second_error(detsum);
    if det2 >= errbound2 || -det2 >= errbound2 {
        return det2;
    }

    let errbound3 = signed_measure_third_error(detsum);
    if det2 >= errbound3 || -det2 >= errbound3 {
        return det2;
    }
    estimate(&exact_cross_product(ux, 0.0, uy, 0.0, vx, 0.0, vy, 0.0))
}

/// Fully exact `(ux+uxtail)*(vy+vytail) - (uy+uytail)*(vx+vxtail)`,
/// built from exact bilinear products merged with `sum_expansions`.
/// Exact for any finite inputs; used as the final fallback by both
/// the orientation family and in-circle.
fn exact_cross_product(
    ux: f64,
    uxtail: f64,
    uy: f64,
    uytail: f64,
    vx: f64,
    vxtail: f64,
    vy: f64,
    vytail: f64,
) -> Expansion {
    let left = exact_bilinear_product(ux, uxtail, vy, vytail);
    let right = exact_bilinear_product(uy, uytail, vx, vxtail);
    sum_expansions(&left, &negate_expansion(&right))
}

/// Fully exact `(a+atail)*(b+btail)`, expanded into up to four exact
/// `two_product` terms and merged with `sum_expansions`.
fn exact_bilinear_product(a: f64, atail: f64, b: f64, btail: f64) -> Expansion {
    let (p, pe) = two_product(a, b);
    let mut total: Expansion = [pe, p].into_iter().collect();
    if atail != 0.0 {
        let (t, te) = two_product(atail, b);
        total = sum_expansions(&total, &[te, t].into_iter().collect::<Expansion>());
    }
    if btail != 0.0 {
        let (t, te) = two_product(a, btail);
        total = sum_expansions(&total, &[te, t].into_iter().collect::<Expansion>());
    }
    if atail != 0.0 && btail != 0.0 {
        let (t, te) = two_product(atail, btail);
        total = sum_expansions(&total, &[te, t].into_iter().collect::<Expansion>());
    }
    total
}

/// Classification of a point against a circle through three others,
/// without taking a sign: positive iff `d` lies strictly inside the
/// circle through `a, b, c` when the three are CCW.
pub fn in_circle(a: &Point<f64>, b: &Point<f64>, c: &Point<f64>, d: &Point<f64>) -> f64 {
    in_circle_adaptive(a, b, c, d, false)
}

/// The circumcircle determinant: algebraically identical to
/// [`in_circle`], kept distinct because historical callers used
/// separate, slightly tighter error-bound tables for it.
pub fn circumcircle_determinant(
    a: &Point<f64>,
    b: &Point<f64>,
    c: &Point<f64>,
    d: &Point<f64>,
) -> f64 {
    in_circle_adaptive(a, b, c, d, true)
}

fn in_circle_adaptive(
    a: &Point<f64>,
    b: &Point<f64>,
    c: &Point<f64>,
    d: &Point<f64>,
    use_circumcircle_bounds: bool,
) -> f64 {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;
    let alift = adx * adx + ady * ady;

    let cdxady = cdx * ady;
    let adxcdy = adx * cdy;
    let blift = bdx * bdx + bdy * bdy;

    let adxbdy = adx * bdy;
    let bdxady = bdx * ady;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);

    let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
        + (cdxady.abs() + adxcdy.abs()) * blift
        + (adxbdy.abs() + bdxady.abs()) * clift;

    let (err1, err2, err3) = if use_circumcircle_bounds {
        (
            circumcircle_error_a(permanent),
            circumcircle_error_b(permanent),
            circumcircle_error_c(permanent),
        )
    } else {
        (
            cocircular_first_error(permanent),
            cocircular_second_error(permanent),
            cocircular_third_error(permanent),
        )
    };

    if det > err1 || -det > err1 {
        return det;
    }

    in_circle_refine(
        adx, ady, bdx, bdy, cdx, cdy, alift, blift, clift, err2, err3, a, b, c, d,
    )
}

/// Stage 2/3 of the 4-point adaptive in-circle predicate, entered once
/// the stage-1 filter cannot prove a sign. Mirrors
/// [`adaptive_cross_product`]'s shape: stage 2 refines each of the
/// three cross-difference terms to an exact 4-component expansion via
/// `two_product`+`two_two_diff`, scales each by its (still
/// plain-float) lift term with `scale_expansion`, and merges the three
/// with `sum_expansions`; stage 3 re-checks the same refined estimate
/// against the tighter third-stage bound before falling through to the
/// fully exact determinant.
#[allow(clippy::too_many_arguments)]
fn in_circle_refine(
    adx: f64,
    ady: f64,
    bdx: f64,
    bdy: f64,
    cdx: f64,
    cdy: f64,
    alift: f64,
    blift: f64,
    clift: f64,
    errbound2: f64,
    errbound3: f64,
    a: &Point<f64>,
    b: &Point<f64>,
    c: &Point<f64>,
    d: &Point<f64>,
) -> f64 {
    let bc = cross_diff_expansion(bdx, cdy, cdx, bdy);
    let ca = cross_diff_expansion(cdx, ady, adx, cdy);
    let ab = cross_diff_expansion(adx, bdy, bdx, ady);

    let det2_expansion = sum_expansions(
        &sum_expansions(&scale_expansion(&bc, alift), &scale_expansion(&ca, blift)),
        &scale_expansion(&ab, clift),
    );
    let det2 = estimate(&det2_expansion);

    if det2 >= errbound2 || -det2 >= errbound2 {
        return det2;
    }
    if det2 >= errbound3 || -det2 >= errbound3 {
        return det2;
    }

    in_circle_exact(a, b, c, d)
}

/// Exact 4-component expansion of `p1*p2 - q1*q2`, built from two
/// `two_product` terms merged with `two_two_diff`.
fn cross_diff_expansion(p1: f64, p2: f64, q1: f64, q2: f64) -> Expansion {
    let (p, ptail) = two_product(p1, p2);
    let (q, qtail) = two_product(q1, q2);
    let (e3, e2, e1, e0) = two_two_diff(p, ptail, q, qtail);
    [e0, e1, e2, e3].into_iter().collect()
}

/// Stage 2/3 fallback: builds the fully exact expansion of the 4x4
/// in-circle determinant from exact per-term expansions (each a
/// `two_product`/`square` result), merged via `sum_expansions`. The
/// merge is exact regardless of how conservative the stage-2/3 bound
/// checks are, so once this is reached the returned value's sign is
/// correct by construction.
fn in_circle_exact(a: &Point<f64>, b: &Point<f64>, c: &Point<f64>, d: &Point<f64>) -> f64 {
    let (adx, adxtail) = two_diff(a.x, d.x);
    let (ady, adytail) = two_diff(a.y, d.y);
    let (bdx, bdxtail) = two_diff(b.x, d.x);
    let (bdy, bdytail) = two_diff(b.y, d.y);
    let (cdx, cdxtail) = two_diff(c.x, d.x);
    let (cdy, cdytail) = two_diff(c.y, d.y);

    let alift = exact_sum_of_squares(adx, adxtail, ady, adytail);
    let blift = exact_sum_of_squares(bdx, bdxtail, bdy, bdytail);
    let clift = exact_sum_of_squares(cdx, cdxtail, cdy, cdytail);

    // bdxcdy - cdxbdy, cdxady - adxcdy, adxbdy - bdxady, each exact.
    let bc = exact_cross_product(bdx, bdxtail, bdy, bdytail, cdx, cdxtail, cdy, cdytail);
    let ca = exact_cross_product(cdx, cdxtail, cdy, cdytail, adx, adxtail, ady, adytail);
    let ab = exact_cross_product(adx, adxtail, ady, adytail, bdx, bdxtail, bdy, bdytail);

    let term_a = mul_expansions(&alift, &bc);
    let term_b = mul_expansions(&blift, &ca);
    let term_c = mul_expansions(&clift, &ab);

    let total = sum_expansions(&sum_expansions(&term_a, &term_b), &term_c);
    estimate(&total)
}

/// Exact expansion for `px^2 + py^2` given an exact 2-component
/// expansion `(p, ptail)` for each coordinate.
fn exact_sum_of_squares(px: f64, pxtail: f64, py: f64, pytail: f64) -> Expansion {
    let sq_x = exact_bilinear_product(px, pxtail, px, pxtail);
    let sq_y = exact_bilinear_product(py, pytail, py, pytail);
    sum_expansions(&sq_x, &sq_y)
}

/// Exact product of two expansions via repeated `scale_expansion` and
/// merge; sufficient here since one side is always a short (<=2-term)
/// expansion in practice.
fn mul_expansions(a: &[f64], b: &[f64]) -> Expansion {
    let mut total: Expansion = Expansion::new();
    total.push(0.0);
    for &bi in b {
        let scaled = scale_expansion(a, bi);
        total = sum_expansions(&total, &scaled);
    }
    total
}
