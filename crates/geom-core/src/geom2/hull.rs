//! Purpose: Andrew's monotone-chain convex hull, generalized over the
//! scalar kind and driven entirely by `orientation` so its tie-break
//! behavior (drop exactly-collinear points) is exact for both the
//! `f64` and `BigRational` instantiations.

use tracing::debug_span;

use crate::geom2::point::Point;
use crate::scalar::{ExactPredicates, Orientation};

/// Builds the convex hull of `points` in CCW order, starting at the
/// lexicographically minimal vertex. Collinear points along an edge of
/// the hull are dropped, matching `forms_convex_polygon`'s requirement
/// that every hull edge triple be strictly CCW. Returns an empty `Vec`
/// for fewer than 3 distinct, non-collinear points.
pub fn convex_hull<S: ExactPredicates>(points: &[Point<S>]) -> Vec<Point<S>> {
    let span = debug_span!("convex_hull", input_len = points.len());
    let _enter = span.enter();

    let mut pts: Vec<&Point<S>> = points.iter().collect();
    pts.sort_by(|a, b| a.partial_cmp(b).expect("finite coordinates are totally ordered"));
    pts.dedup_by(|a, b| *a == *b);

    if pts.len() < 3 {
        tracing::debug!(output_len = 0, "fewer than 3 distinct points");
        return Vec::new();
    }

    let mut lower = chain(&pts);
    let mut upper = chain(&pts.iter().rev().copied().collect::<Vec<_>>());

    if lower.len() < 3 {
        tracing::debug!(output_len = 0, "all points collinear");
        return Vec::new();
    }

    // `lower`'s last point and `upper`'s last point each duplicate the
    // other chain's first point; drop them before concatenating.
    lower.pop();
    upper.pop();
    let mut hull: Vec<Point<S>> = lower.into_iter().cloned().collect();
    hull.extend(upper.into_iter().cloned());

    tracing::debug!(output_len = hull.len(), "done");
    hull
}

/// One monotone chain (lower when called on the ascending order,
/// upper on the descending order), dropping non-strictly-CCW turns.
fn chain<'a, S: ExactPredicates>(pts: &[&'a Point<S>]) -> Vec<&'a Point<S>> {
    let mut chain: Vec<&Point<S>> = Vec::with_capacity(pts.len());
    for &p in pts {
        while chain.len() >= 2 {
            let a = chain[chain.len() - 2];
            let b = chain[chain.len() - 1];
            if S::orientation(a, b, p) != Orientation::CounterClockwise {
                chain.pop();
            } else {
                break;
            }
        }
        chain.push(p);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point<f64> {
        Point::xy(x, y)
    }

    #[test]
    fn hull_of_square_with_interior_point() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0), p(2.0, 2.0)];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&p(2.0, 2.0)));
    }

    #[test]
    fn hull_drops_collinear_edge_points() {
        let pts = vec![p(0.0, 0.0), p(2.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let hull = convex_hull(&pts);
        assert!(!hull.contains(&p(2.0, 0.0)));
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn every_hull_edge_is_strictly_ccw() {
        let pts = vec![p(0.0, 0.0), p(5.0, 1.0), p(6.0, 6.0), p(1.0, 5.0), p(3.0, 3.0)];
        let hull = convex_hull(&pts);
        for i in 0..hull.len() {
            let a = &hull[i];
            let b = &hull[(i + 1) % hull.len()];
            let c = &hull[(i + 2) % hull.len()];
            assert_eq!(f64::orientation(a, b, c), Orientation::CounterClockwise);
        }
    }

    #[test]
    fn fewer_than_three_points_yields_empty_hull() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0)];
        assert!(convex_hull(&pts).is_empty());
    }
}
