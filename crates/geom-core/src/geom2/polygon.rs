//! Purpose: `Polygon<S>` — a border contour plus zero or more hole
//! contours — and its validator, the second L8 entry point. Built
//! entirely on `Contour` and `edges_intersect`/`segment_contains`;
//! there is no new predicate machinery here, only composition.

use tracing::debug_span;

use crate::error::GeomError;
use crate::geom2::contour::Contour;
use crate::geom2::point::Point;
use crate::geom2::segment::{segment_contains, segment_contains_eps, Segment};
use crate::geom2::sweep::edges_intersect;
use crate::scalar::{ExactPredicates, Scalar};
use crate::GeomConfig;

/// A border contour together with its holes. A validated `Polygon`
/// has its border oriented CCW, every hole oriented CW, each hole
/// strictly inside the border, and holes pairwise disjoint.
#[derive(Clone, Debug)]
pub struct Polygon<S: ExactPredicates> {
    border: Contour<S>,
    holes: Vec<Contour<S>>,
}

impl<S: ExactPredicates> Polygon<S> {
    pub fn validate(border: Contour<S>, holes: Vec<Contour<S>>) -> Result<Self, GeomError> {
        let span = debug_span!("polygon_validate", hole_count = holes.len());
        let _enter = span.enter();

        let border = border.normalized();
        let holes: Vec<Contour<S>> = holes.into_iter().map(|h| h.normalized()).collect();

        for hole in &holes {
            if !contour_in_contour(hole, &border) {
                return Err(GeomError::HoleOutsideBorder);
            }
        }

        for i in 0..holes.len() {
            for j in (i + 1)..holes.len() {
                if contours_cross_or_overlap(&holes[i], &holes[j])
                    || contour_in_contour(&holes[i], &holes[j])
                    || contour_in_contour(&holes[j], &holes[i])
                {
                    return Err(GeomError::HoleOutsideBorder);
                }
            }
        }

        Ok(Polygon { border, holes })
    }

    pub fn border(&self) -> &Contour<S> {
        &self.border
    }

    pub fn holes(&self) -> &[Contour<S>] {
        &self.holes
    }
}

impl Polygon<f64> {
    /// Same checks as [`Polygon::validate`], but the hole-in-border
    /// containment test widens its on-boundary short-circuit by
    /// `cfg.eps_hole_touch` (via [`segment_contains_eps`]), so a hole
    /// vertex that sits a hair outside the border edge — the usual
    /// symptom of upstream `f64` rounding — still counts as touching
    /// rather than failing containment outright. Exact-rational
    /// polygons have no such rounding to absorb, so this entry point
    /// is not offered for them; use [`Polygon::validate`].
    pub fn validate_with_config(
        border: Contour<f64>,
        holes: Vec<Contour<f64>>,
        cfg: GeomConfig,
    ) -> Result<Self, GeomError> {
        let span = debug_span!("polygon_validate_with_config", hole_count = holes.len());
        let _enter = span.enter();

        let border = border.normalized();
        let holes: Vec<Contour<f64>> = holes.into_iter().map(|h| h.normalized()).collect();

        for hole in &holes {
            if !contour_in_contour_eps(hole, &border, cfg) {
                return Err(GeomError::HoleOutsideBorder);
            }
        }

        for i in 0..holes.len() {
            for j in (i + 1)..holes.len() {
                if contours_cross_or_overlap(&holes[i], &holes[j])
                    || contour_in_contour_eps(&holes[i], &holes[j], cfg)
                    || contour_in_contour_eps(&holes[j], &holes[i], cfg)
                {
                    return Err(GeomError::HoleOutsideBorder);
                }
            }
        }

        Ok(Polygon { border, holes })
    }
}

fn contour_in_contour_eps(inner: &Contour<f64>, outer: &Contour<f64>, cfg: GeomConfig) -> bool {
    if contours_cross_or_overlap(inner, outer) {
        return false;
    }
    point_in_contour_eps(&inner.vertices()[0], outer, cfg)
}

fn point_in_contour_eps(p: &Point<f64>, contour: &Contour<f64>, cfg: GeomConfig) -> bool {
    let edges = contour.edges();
    for e in &edges {
        if segment_contains_eps(e, p, cfg) {
            return true;
        }
    }

    let mut crossings = 0usize;
    for e in &edges {
        let (lo, hi) = if e.start.y <= e.end.y { (&e.start, &e.end) } else { (&e.end, &e.start) };
        if p.y < lo.y || p.y >= hi.y {
            continue;
        }
        let probe_end = Point::new(f64::from_i64(i64::MAX), p.y);
        let ray = Segment { start: p.clone(), end: probe_end };
        let edge_seg = Segment { start: lo.clone(), end: hi.clone() };
        if matches!(
            crate::geom2::segment::segments_relationship(&ray, &edge_seg),
            crate::geom2::segment::SegmentsRelationship::Cross
                | crate::geom2::segment::SegmentsRelationship::Touch
        ) {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}

/// `true` iff `inner` lies fully inside `outer`: no edge of `inner`
/// crosses an edge of `outer`, and one representative vertex of
/// `inner` is contained by `outer`'s winding test (sufficient once
/// crossing is ruled out, since the two boundaries otherwise cannot
/// trade sides).
fn contour_in_contour<S: ExactPredicates>(inner: &Contour<S>, outer: &Contour<S>) -> bool {
    if contours_cross_or_overlap(inner, outer) {
        return false;
    }
    point_in_contour(&inner.vertices()[0], outer)
}

fn contours_cross_or_overlap<S: ExactPredicates>(a: &Contour<S>, b: &Contour<S>) -> bool {
    let mut edges: Vec<Segment<S>> = a.edges();
    edges.extend(b.edges());
    edges_intersect(&edges)
}

/// Even-odd / crossing-number point-in-polygon test via ray casting
/// along +x from `p`, with an exact on-boundary short-circuit through
/// `segment_contains`.
fn point_in_contour<S: ExactPredicates>(p: &Point<S>, contour: &Contour<S>) -> bool {
    let edges = contour.edges();
    for e in &edges {
        if segment_contains(e, p) {
            return true;
        }
    }

    let mut crossings = 0usize;
    for e in &edges {
        let (lo, hi) = if e.start.y <= e.end.y {
            (&e.start, &e.end)
        } else {
            (&e.end, &e.start)
        };
        if p.y < lo.y || p.y >= hi.y {
            continue;
        }
        // p.y is strictly between lo.y and hi.y: the edge properly
        // straddles the ray's y-coordinate. Count it iff the edge
        // crosses the ray to the right of p, decided exactly via
        // orientation rather than a division for the x-intercept.
        let probe_end = Point::new(S::from_i64(i64::MAX), p.y.clone());
        let ray = Segment { start: p.clone(), end: probe_end };
        let edge_seg = Segment { start: lo.clone(), end: hi.clone() };
        if matches!(
            crate::geom2::segment::segments_relationship(&ray, &edge_seg),
            crate::geom2::segment::SegmentsRelationship::Cross
                | crate::geom2::segment::SegmentsRelationship::Touch
        ) {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}
