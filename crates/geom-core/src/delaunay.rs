//! Purpose: incremental Bowyer-Watson Delaunay triangulation (L6).
//!
//! Why this design: Bowyer-Watson is the simpler of the two classical
//! Delaunay algorithms (the other being divide-and-conquer) and is the
//! only one this crate ships; see `DESIGN.md` for why divide-and-conquer
//! was left out. Triangles are tracked as plain vertex-index triples
//! plus an edge-multiplicity count per insertion step, not through the
//! quad-edge arena (`crate::quadedge`): rebuilding the star around an
//! inserted point is a local set operation on the triangle list, and
//! keeping it there avoids threading arena handles through a routine
//! that never needs to navigate a ring.

use std::collections::HashMap;
use std::ops::{Add, Div, Mul, Sub};

use tracing::debug_span;

use crate::error::GeomError;
use crate::geom2::point::Point;
use crate::scalar::{ExactPredicates, InCircleResult, Orientation};

/// The generic arithmetic the super-triangle construction needs beyond
/// what `Scalar` requires of every coordinate kind. Both shipped
/// instantiations (`f64`, `Rational`) satisfy it already.
pub trait FieldOps:
    Sized + Clone + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
}
impl<T> FieldOps for T where
    T: Sized + Clone + Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>
{
}

type Triangle = [usize; 3];

/// Builds the Delaunay triangulation of `points`. Infallible given
/// validated (finite, not-all-collinear) input; the `Result` wrapper
/// exists for interface uniformity with the fallible L7/L8 entry
/// points. Fewer than 3 points, or all points collinear, yields an
/// empty triangle list.
pub fn delaunay<S>(points: &[Point<S>]) -> Result<Vec<Triangle>, GeomError>
where
    S: ExactPredicates + FieldOps,
{
    let span = debug_span!("delaunay", input_len = points.len());
    let _enter = span.enter();

    if points.len() < 3 {
        tracing::debug!(output_len = 0, "fewer than 3 points");
        return Ok(Vec::new());
    }

    let n = points.len();
    let (sa, sb, sc) = super_triangle(points);
    let mut all_points: Vec<Point<S>> = points.to_vec();
    all_points.push(sa);
    all_points.push(sb);
    all_points.push(sc);
    let super_a = n;
    let super_b = n + 1;
    let super_c = n + 2;

    let mut triangles: Vec<Triangle> = vec![normalize_ccw(&all_points, [super_a, super_b, super_c])];

    for p in 0..n {
        triangles = insert_point(&all_points, triangles, p);
    }

    triangles.retain(|t| t.iter().all(|&v| v < n));

    tracing::debug!(output_len = triangles.len(), "done");
    Ok(triangles)
}

/// One Bowyer-Watson step: find every triangle whose circumcircle
/// strictly contains `p`, remove them, and re-triangulate the star
/// polygon their union leaves behind by connecting `p` to every edge
/// that bordered exactly one removed triangle.
fn insert_point<S: ExactPredicates>(all_points: &[Point<S>], triangles: Vec<Triangle>, p: usize) -> Vec<Triangle> {
    let mut kept = Vec::with_capacity(triangles.len());
    let mut bad = Vec::new();
    for t in triangles {
        if in_circumcircle(all_points, t, p) {
            bad.push(t);
        } else {
            kept.push(t);
        }
    }

    let mut edge_count: HashMap<(usize, usize), u32> = HashMap::new();
    for t in &bad {
        for &(a, b) in &tri_edges(*t) {
            *edge_count.entry(canonical(a, b)).or_insert(0) += 1;
        }
    }

    for t in &bad {
        for &(a, b) in &tri_edges(*t) {
            if edge_count[&canonical(a, b)] == 1 {
                kept.push(normalize_ccw(all_points, [a, b, p]));
            }
        }
    }

    kept
}

fn tri_edges(t: Triangle) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn in_circumcircle<S: ExactPredicates>(all_points: &[Point<S>], t: Triangle, p: usize) -> bool {
    let [a, b, c] = t;
    matches!(
        S::in_circle(&all_points[a], &all_points[b], &all_points[c], &all_points[p]),
        InCircleResult::Inside
    )
}

fn normalize_ccw<S: ExactPredicates>(all_points: &[Point<S>], t: Triangle) -> Triangle {
    let [a, b, c] = t;
    if S::orientation(&all_points[a], &all_points[b], &all_points[c]) == Orientation::Clockwise {
        [a, c, b]
    } else {
        t
    }
}

/// A triangle built from the input bounding box, inflated by a
/// constant safety factor of the box's own span, large enough that
/// every Delaunay circumcircle of the input — which is bounded by the
/// box's diagonal — is strictly enclosed by this triangle's
/// circumcircle. The factor (20x the larger span dimension) matches
/// the margin used by the common Bowyer-Watson presentations this
/// routine is grounded on and is exercised by
/// `super_triangle_encloses_all_points` below.
fn super_triangle<S: ExactPredicates + FieldOps>(points: &[Point<S>]) -> (Point<S>, Point<S>, Point<S>) {
    let mut min_x = points[0].x.clone();
    let mut max_x = points[0].x.clone();
    let mut min_y = points[0].y.clone();
    let mut max_y = points[0].y.clone();
    for p in &points[1..] {
        if p.x < min_x {
            min_x = p.x.clone();
        }
        if p.x > max_x {
            max_x = p.x.clone();
        }
        if p.y < min_y {
            min_y = p.y.clone();
        }
        if p.y > max_y {
            max_y = p.y.clone();
        }
    }

    let two = S::from_i64(2);
    let twenty = S::from_i64(20);
    let dx = max_x.clone() - min_x.clone();
    let dy = max_y.clone() - min_y.clone();
    let dmax = if dx < dy { dy } else { dx };
    let mid_x = (min_x + max_x) / two.clone();
    let mid_y = (min_y + max_y) / two;

    let margin = dmax.clone() * twenty.clone();
    let a = Point::new(mid_x.clone() - margin.clone(), mid_y.clone() - dmax.clone());
    let b = Point::new(mid_x.clone() + margin.clone(), mid_y.clone() - dmax);
    let c = Point::new(mid_x, mid_y + margin);
    (a, b, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::InCircleResult;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point<f64> {
        Point::xy(x, y)
    }

    #[test]
    fn fewer_than_three_points_yields_empty_triangulation() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0)];
        assert!(delaunay(&pts).unwrap().is_empty());
    }

    #[test]
    fn triangulates_square_into_two_triangles() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let tris = delaunay(&pts).unwrap();
        assert_eq!(tris.len(), 2);
        for t in &tris {
            assert_eq!(
                f64::orientation(&pts[t[0]], &pts[t[1]], &pts[t[2]]),
                Orientation::CounterClockwise
            );
        }
    }

    #[test]
    fn square_with_center_point_produces_four_triangles_sharing_it() {
        let pts = vec![p(0.0, 0.0), p(6.0, 0.0), p(6.0, 6.0), p(0.0, 6.0), p(3.0, 3.0)];
        let tris = delaunay(&pts).unwrap();
        assert_eq!(tris.len(), 4);
        let center = pts.iter().position(|q| *q == p(3.0, 3.0)).unwrap();
        assert!(tris.iter().all(|t| t.contains(&center)));
    }

    #[test]
    fn every_triangle_is_locally_delaunay() {
        let pts = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
            p(2.0, 2.0),
            p(1.0, 3.0),
            p(3.0, 1.0),
        ];
        let tris = delaunay(&pts).unwrap();
        for t in &tris {
            for other in &pts {
                if t.contains(&pts.iter().position(|q| q == other).unwrap()) {
                    continue;
                }
                assert_ne!(
                    f64::in_circle(&pts[t[0]], &pts[t[1]], &pts[t[2]], other),
                    InCircleResult::Inside
                );
            }
        }
    }

    #[test]
    fn super_triangle_encloses_all_points() {
        let pts = vec![p(-3.0, 5.0), p(10.0, -2.0), p(7.0, 8.0), p(0.0, 0.0)];
        let (a, b, c) = super_triangle(&pts);
        for q in &pts {
            assert_eq!(f64::orientation(&a, &b, q), Orientation::CounterClockwise);
            assert_eq!(f64::orientation(&b, &c, q), Orientation::CounterClockwise);
            assert_eq!(f64::orientation(&c, &a, q), Orientation::CounterClockwise);
        }
    }

    fn small_point_sets() -> impl Strategy<Value = Vec<Point<f64>>> {
        prop::collection::vec((-20i32..=20, -20i32..=20), 4..12).prop_filter_map("distinct points", |pts| {
            let mut seen = std::collections::BTreeSet::new();
            let mut out = Vec::new();
            for (x, y) in pts {
                if seen.insert((x, y)) {
                    out.push(p(x as f64, y as f64));
                }
            }
            if out.len() >= 4 {
                Some(out)
            } else {
                None
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn every_output_triangle_is_ccw_and_locally_delaunay(pts in small_point_sets()) {
            let tris = delaunay(&pts).unwrap();
            for t in &tris {
                prop_assert_eq!(
                    f64::orientation(&pts[t[0]], &pts[t[1]], &pts[t[2]]),
                    Orientation::CounterClockwise
                );
                for (idx, q) in pts.iter().enumerate() {
                    if t.contains(&idx) {
                        continue;
                    }
                    prop_assert_ne!(
                        f64::in_circle(&pts[t[0]], &pts[t[1]], &pts[t[2]], q),
                        InCircleResult::Inside
                    );
                }
            }
        }
    }
}
