//! Purpose: generalize the predicate and validation layers over the
//! coordinate kind (native float vs. exact rational) without runtime
//! dispatch.
//!
//! Why this design: predicates are called in the innermost loop of
//! triangulation; a `dyn` vtable call per comparison would defeat the
//! whole point of an adaptive-precision fast path. Every caller above
//! this module is generic over `S: Scalar + ExactPredicates` and gets
//! monomorphized per instantiation instead.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::geom2::point::Point;

/// A coordinate kind admitted into the geometry core.
///
/// Only `PartialOrd` is required for ordering (points are sorted
/// lexicographically for the convex hull and the Bentley-Ottmann
/// sweep); equality and ordering are never assumed total, since `f64`
/// is not (NaN is simply rejected at construction instead).
pub trait Scalar: Clone + fmt::Debug + PartialEq + PartialOrd {
    /// Rejects NaN/infinity. Always `true` for exact rationals.
    fn is_finite_coordinate(&self) -> bool;

    fn from_i64(value: i64) -> Self;
}

impl Scalar for f64 {
    fn is_finite_coordinate(&self) -> bool {
        f64::is_finite(*self)
    }

    fn from_i64(value: i64) -> Self {
        value as f64
    }
}

/// Exact rational coordinate kind, backed by arbitrary-precision
/// integers. Every `ExactPredicates` operation on this type is a
/// single exact evaluation: there is no adaptive staging because
/// there is no rounding error to stage against.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rational(pub BigRational);

impl Rational {
    pub fn from_i64(value: i64) -> Self {
        Rational(BigRational::from_integer(BigInt::from(value)))
    }
}

impl Scalar for Rational {
    fn is_finite_coordinate(&self) -> bool {
        true
    }

    fn from_i64(value: i64) -> Self {
        Rational::from_i64(value)
    }
}

impl Add for Rational {
    type Output = Rational;
    fn add(self, rhs: Rational) -> Rational {
        Rational(self.0 + rhs.0)
    }
}

impl Sub for Rational {
    type Output = Rational;
    fn sub(self, rhs: Rational) -> Rational {
        Rational(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Rational;
    fn mul(self, rhs: Rational) -> Rational {
        Rational(self.0 * rhs.0)
    }
}

impl Div for Rational {
    type Output = Rational;
    fn div(self, rhs: Rational) -> Rational {
        Rational(self.0 / rhs.0)
    }
}

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

/// Sign of an orientation (parallelogram-area) test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl Orientation {
    pub fn from_signum(signum: i32) -> Self {
        match signum {
            n if n > 0 => Orientation::CounterClockwise,
            n if n < 0 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }

    pub fn is_ccw(self) -> bool {
        matches!(self, Orientation::CounterClockwise)
    }

    pub fn is_cw(self) -> bool {
        matches!(self, Orientation::Clockwise)
    }

    pub fn negate(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::CounterClockwise => Orientation::Clockwise,
            Orientation::Collinear => Orientation::Collinear,
        }
    }
}

/// Classification of a point against a circle, derived from the sign
/// of the in-circle determinant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InCircleResult {
    Inside,
    On,
    Outside,
}

impl InCircleResult {
    pub fn from_signum(signum: i32) -> Self {
        match signum {
            n if n > 0 => InCircleResult::Inside,
            n if n < 0 => InCircleResult::Outside,
            _ => InCircleResult::On,
        }
    }
}

/// The four exact geometric predicates every layer above L1 is built
/// on, generalized over the coordinate kind. The `f64` instantiation
/// runs the full adaptive pipeline (see `crate::predicates`); the
/// `Rational` instantiation below is a direct, always-exact
/// evaluation, since there is no floating error to stage against.
pub trait ExactPredicates: Scalar + Sized {
    /// Signed area of the parallelogram `(b-a) x (c-a)`. Positive
    /// means `a, b, c` turn counterclockwise.
    fn orientation(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>) -> Orientation;

    /// Sign of the 4x4 in-circle determinant: positive iff `d` lies
    /// strictly inside the circle through `a, b, c` (assumed CCW).
    fn in_circle(a: &Point<Self>, b: &Point<Self>, c: &Point<Self>, d: &Point<Self>)
        -> InCircleResult;

    /// Signed area of the parallelogram built from two arbitrary
    /// vectors `first_end - first_start` and `second_end -
    /// second_start`, not necessarily sharing a vertex.
    fn signed_parallelogram_area(
        first_start: &Point<Self>,
        first_end: &Point<Self>,
        second_start: &Point<Self>,
        second_end: &Point<Self>,
    ) -> Orientation;
}

fn f64_signum(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

impl ExactPredicates for f64 {
    fn orientation(a: &Point<f64>, b: &Point<f64>, c: &Point<f64>) -> Orientation {
        Orientation::from_signum(f64_signum(crate::predicates::orientation(a, b, c)))
    }

    fn in_circle(a: &Point<f64>, b: &Point<f64>, c: &Point<f64>, d: &Point<f64>) -> InCircleResult {
        InCircleResult::from_signum(f64_signum(crate::predicates::in_circle(a, b, c, d)))
    }

    fn signed_parallelogram_area(
        first_start: &Point<f64>,
        first_end: &Point<f64>,
        second_start: &Point<f64>,
        second_end: &Point<f64>,
    ) -> Orientation {
        let area =
            crate::predicates::signed_parallelogram_area(first_start, first_end, second_start, second_end);
        Orientation::from_signum(f64_signum(area))
    }
}

impl ExactPredicates for Rational {
    fn orientation(a: &Point<Rational>, b: &Point<Rational>, c: &Point<Rational>) -> Orientation {
        let det = rational_orientation_det(a, b, c);
        Orientation::from_signum(signum_of(&det))
    }

    fn in_circle(
        a: &Point<Rational>,
        b: &Point<Rational>,
        c: &Point<Rational>,
        d: &Point<Rational>,
    ) -> InCircleResult {
        let det = rational_in_circle_det(a, b, c, d);
        InCircleResult::from_signum(signum_of(&det))
    }

    fn signed_parallelogram_area(
        first_start: &Point<Rational>,
        first_end: &Point<Rational>,
        second_start: &Point<Rational>,
        second_end: &Point<Rational>,
    ) -> Orientation {
        let minuend = (first_end.x.0.clone() - first_start.x.0.clone())
            * (second_end.y.0.clone() - second_start.y.0.clone());
        let subtrahend = (first_end.y.0.clone() - first_start.y.0.clone())
            * (second_end.x.0.clone() - second_start.x.0.clone());
        Orientation::from_signum(signum_of(&(minuend - subtrahend)))
    }
}

fn signum_of(value: &BigRational) -> i32 {
    match value.cmp(&BigRational::zero()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

fn rational_orientation_det(
    a: &Point<Rational>,
    b: &Point<Rational>,
    c: &Point<Rational>,
) -> BigRational {
    let abx = b.x.0.clone() - a.x.0.clone();
    let aby = b.y.0.clone() - a.y.0.clone();
    let acx = c.x.0.clone() - a.x.0.clone();
    let acy = c.y.0.clone() - a.y.0.clone();
    abx * acy - aby * acx
}

fn rational_in_circle_det(
    a: &Point<Rational>,
    b: &Point<Rational>,
    c: &Point<Rational>,
    d: &Point<Rational>,
) -> BigRational {
    let ax = a.x.0.clone() - d.x.0.clone();
    let ay = a.y.0.clone() - d.y.0.clone();
    let bx = b.x.0.clone() - d.x.0.clone();
    let by = b.y.0.clone() - d.y.0.clone();
    let cx = c.x.0.clone() - d.x.0.clone();
    let cy = c.y.0.clone() - d.y.0.clone();

    let a_lift = ax.clone() * ax.clone() + ay.clone() * ay.clone();
    let b_lift = bx.clone() * bx.clone() + by.clone() * by.clone();
    let c_lift = cx.clone() * cx.clone() + cy.clone() * cy.clone();

    // Cofactor expansion of the 3x3 matrix [[ax,ay,a_lift],[bx,by,b_lift],[cx,cy,c_lift]].
    ax * (by.clone() * c_lift.clone() - cy.clone() * b_lift.clone())
        - ay * (bx.clone() * c_lift - cx.clone() * b_lift)
        + a_lift * (bx * cy - cx * by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::point::Point;

    fn rp(x: i64, y: i64) -> Point<Rational> {
        Point::new(Rational::from_i64(x), Rational::from_i64(y))
    }

    #[test]
    fn rational_orientation_matches_float() {
        let a = rp(0, 0);
        let b = rp(1, 0);
        let c = rp(0, 1);
        assert_eq!(Rational::orientation(&a, &b, &c), Orientation::CounterClockwise);

        let fa = Point::new(0.0f64, 0.0);
        let fb = Point::new(1.0f64, 0.0);
        let fc = Point::new(0.0f64, 1.0);
        assert_eq!(f64::orientation(&fa, &fb, &fc), Orientation::CounterClockwise);
    }

    #[test]
    fn rational_in_circle_matches_float() {
        let a = rp(0, 0);
        let b = rp(4, 0);
        let c = rp(0, 4);
        let inside = rp(1, 1);
        let on = rp(4, 4);
        let outside = rp(5, 5);
        assert_eq!(Rational::in_circle(&a, &b, &c, &inside), InCircleResult::Inside);
        assert_eq!(Rational::in_circle(&a, &b, &c, &on), InCircleResult::On);
        assert_eq!(Rational::in_circle(&a, &b, &c, &outside), InCircleResult::Outside);
    }
}
