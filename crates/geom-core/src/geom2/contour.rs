//! Purpose: `Contour<S>` — a simple closed polyline — and its
//! validator, the first of the two L8 entry points. A contour is the
//! unit both `Polygon` borders/holes and CDT boundary classification
//! are built from.

use tracing::debug_span;

use crate::error::GeomError;
use crate::geom2::point::Point;
use crate::geom2::segment::Segment;
use crate::geom2::sweep::edges_intersect;
use crate::scalar::{ExactPredicates, Orientation};

/// A finite cyclic sequence of >= 3 points with no collinear
/// consecutive triple and a simple (non-self-intersecting) closed
/// polyline. Equality is cyclic-rotation and reversal invariant.
#[derive(Clone, Debug)]
pub struct Contour<S: ExactPredicates> {
    vertices: Vec<Point<S>>,
}

impl<S: ExactPredicates> Contour<S> {
    /// Validates and wraps `vertices` into a `Contour`. Fails fast
    /// with the most specific applicable error kind.
    pub fn validate(vertices: Vec<Point<S>>) -> Result<Self, GeomError> {
        let span = debug_span!("contour_validate", vertex_count = vertices.len());
        let _enter = span.enter();

        let n = vertices.len();
        if n < 3 {
            return Err(GeomError::ContourTooSmall { found: n });
        }

        for v in &vertices {
            if !v.x.is_finite_coordinate() || !v.y.is_finite_coordinate() {
                return Err(GeomError::InvalidCoordinate);
            }
        }

        for i in 0..n {
            let prev = &vertices[(i + n - 1) % n];
            let at = &vertices[i];
            let next = &vertices[(i + 1) % n];
            if S::orientation(prev, at, next) == Orientation::Collinear {
                return Err(GeomError::CollinearConsecutive {
                    prev: (i + n - 1) % n,
                    at: i,
                    next: (i + 1) % n,
                });
            }
        }

        let edges = Self::edges_of(&vertices);
        if edges_intersect(&edges) {
            return Err(GeomError::SelfIntersectingContour);
        }

        Ok(Contour { vertices })
    }

    pub fn vertices(&self) -> &[Point<S>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        false // a validated contour always has >= 3 vertices.
    }

    /// `(v[i], v[i+1 mod n])` for every `i`.
    pub fn edges(&self) -> Vec<Segment<S>> {
        Self::edges_of(&self.vertices)
    }

    fn edges_of(vertices: &[Point<S>]) -> Vec<Segment<S>> {
        let n = vertices.len();
        (0..n)
            .map(|i| Segment::new(vertices[i].clone(), vertices[(i + 1) % n].clone()).expect("validated contour has no degenerate edge"))
            .collect()
    }

    /// `true` iff every consecutive-triple orientation agrees: since a
    /// validated contour already rejects collinear triples, this is
    /// "all CCW or all CW".
    pub fn forms_convex_polygon(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let first = S::orientation(&self.vertices[n - 1], &self.vertices[0], &self.vertices[1]);
        (0..n).all(|i| {
            let prev = &self.vertices[(i + n - 1) % n];
            let at = &self.vertices[i];
            let next = &self.vertices[(i + 1) % n];
            S::orientation(prev, at, next) == first
        })
    }

    /// Net signed area via the shoelace formula; positive iff CCW.
    fn signed_area_sign(&self) -> Orientation {
        let n = self.vertices.len();
        // Re-use the orientation predicate around the lexicographically
        // minimal vertex, which is always a convex hull vertex and
        // therefore gives the contour's true winding regardless of
        // concavity elsewhere.
        let min_idx = (0..n)
            .min_by(|&a, &b| self.vertices[a].partial_cmp(&self.vertices[b]).unwrap())
            .unwrap();
        let prev = &self.vertices[(min_idx + n - 1) % n];
        let at = &self.vertices[min_idx];
        let next = &self.vertices[(min_idx + 1) % n];
        S::orientation(prev, at, next)
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area_sign().is_ccw()
    }

    /// Returns a contour with the same vertex set traversed in CCW
    /// order, starting at the lexicographically minimal vertex.
    pub fn normalized(&self) -> Contour<S> {
        let n = self.vertices.len();
        let min_idx = (0..n)
            .min_by(|&a, &b| self.vertices[a].partial_cmp(&self.vertices[b]).unwrap())
            .unwrap();
        let mut rotated: Vec<Point<S>> = (0..n).map(|i| self.vertices[(min_idx + i) % n].clone()).collect();
        if !self.is_ccw() {
            rotated[1..].reverse();
        }
        Contour { vertices: rotated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point<f64> {
        Point::xy(x, y)
    }

    #[test]
    fn rejects_too_few_vertices() {
        let err = Contour::validate(vec![p(0.0, 0.0), p(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeomError::ContourTooSmall { found: 2 }));
    }

    #[test]
    fn rejects_nan_vertex() {
        let err = Contour::validate(vec![p(0.0, 0.0), p(f64::NAN, 0.0), p(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, GeomError::InvalidCoordinate));
    }

    #[test]
    fn rejects_infinite_vertex() {
        let err = Contour::validate(vec![p(0.0, 0.0), p(1.0, 0.0), p(f64::INFINITY, 1.0)]).unwrap_err();
        assert!(matches!(err, GeomError::InvalidCoordinate));
    }

    #[test]
    fn rejects_collinear_triple() {
        let err = Contour::validate(vec![p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeomError::CollinearConsecutive { .. }));
    }

    #[test]
    fn rejects_figure_eight() {
        let err = Contour::validate(vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 2.0),
            p(0.0, 2.0),
            p(1.0, 1.0),
            p(1.0, 3.0),
        ])
        .unwrap_err();
        assert!(matches!(err, GeomError::SelfIntersectingContour));
    }

    #[test]
    fn accepts_simple_square() {
        let c = Contour::validate(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]).unwrap();
        assert!(c.is_ccw());
        assert!(c.forms_convex_polygon());
        assert_eq!(c.edges().len(), 4);
    }

    #[test]
    fn normalized_square_is_ccw_from_min_vertex() {
        let c = Contour::validate(vec![p(4.0, 4.0), p(0.0, 4.0), p(0.0, 0.0), p(4.0, 0.0)]).unwrap();
        let n = c.normalized();
        assert_eq!(n.vertices()[0], p(0.0, 0.0));
        assert!(n.is_ccw());
    }
}
