//! Purpose: `Segment<S>`, its containment test, and the four-way
//! relationship classification between two segments — the building
//! blocks the sweep (`sweep.rs`) and validators consume.

use crate::error::GeomError;
use crate::geom2::point::Point;
use crate::scalar::{ExactPredicates, Orientation, Scalar};
use crate::GeomConfig;

/// An unordered pair of distinct points. Two segments are equal iff
/// they share the same endpoint set.
#[derive(Clone, Debug)]
pub struct Segment<S: Scalar> {
    pub start: Point<S>,
    pub end: Point<S>,
}

impl<S: Scalar> Segment<S> {
    /// Fails with `DegenerateSegment` if the two points coincide.
    pub fn new(start: Point<S>, end: Point<S>) -> Result<Self, GeomError> {
        if start == end {
            return Err(GeomError::DegenerateSegment);
        }
        Ok(Segment { start, end })
    }
}

impl<S: Scalar> PartialEq for Segment<S> {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

/// The four mutually exclusive ways two segments can relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentsRelationship {
    /// No shared point.
    Disjoint,
    /// Share exactly one endpoint, otherwise disjoint.
    Touch,
    /// Cross properly at a single interior point of both.
    Cross,
    /// Collinear and overlapping along a sub-segment.
    Overlap,
}

/// Bounding-box test plus `Orientation::Collinear`: is `p` on `seg`?
pub fn segment_contains<S: ExactPredicates>(seg: &Segment<S>, p: &Point<S>) -> bool {
    if S::orientation(&seg.start, &seg.end, p) != Orientation::Collinear {
        return false;
    }
    in_bounding_box(&seg.start, &seg.end, p)
}

/// Same as [`segment_contains`] but widens the bounding box by
/// `cfg.eps_touch` for the `f64` instantiation, so a point the
/// adaptive predicate calls exactly collinear but that sits a hair
/// outside the float box (from an upstream rounding step) still
/// counts as contained. Exact-rational coordinates never need this
/// slack; the predicate there is already exact.
pub fn segment_contains_eps(seg: &Segment<f64>, p: &Point<f64>, cfg: GeomConfig) -> bool {
    if f64::orientation(&seg.start, &seg.end, p) != Orientation::Collinear {
        return false;
    }
    let eps = cfg.eps_touch;
    let (lo_x, hi_x) = min_max(seg.start.x, seg.end.x);
    let (lo_y, hi_y) = min_max(seg.start.y, seg.end.y);
    p.x >= lo_x - eps && p.x <= hi_x + eps && p.y >= lo_y - eps && p.y <= hi_y + eps
}

fn in_bounding_box<S: Scalar>(a: &Point<S>, b: &Point<S>, p: &Point<S>) -> bool {
    let (lo_x, hi_x) = if a.x <= b.x { (&a.x, &b.x) } else { (&b.x, &a.x) };
    let (lo_y, hi_y) = if a.y <= b.y { (&a.y, &b.y) } else { (&b.y, &a.y) };
    &p.x >= lo_x && &p.x <= hi_x && &p.y >= lo_y && &p.y <= hi_y
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Standard four-orientation test, with the collinear sub-case
/// resolved by interval overlap along the shared line.
pub fn segments_relationship<S: ExactPredicates>(
    s1: &Segment<S>,
    s2: &Segment<S>,
) -> SegmentsRelationship {
    let d1 = S::orientation(&s2.start, &s2.end, &s1.start);
    let d2 = S::orientation(&s2.start, &s2.end, &s1.end);
    let d3 = S::orientation(&s1.start, &s1.end, &s2.start);
    let d4 = S::orientation(&s1.start, &s1.end, &s2.end);

    let properly_straddle =
        ((d1.is_ccw() && d2.is_cw()) || (d1.is_cw() && d2.is_ccw()))
            && ((d3.is_ccw() && d4.is_cw()) || (d3.is_cw() && d4.is_ccw()));
    if properly_straddle {
        return SegmentsRelationship::Cross;
    }

    let all_collinear = d1 == Orientation::Collinear
        && d2 == Orientation::Collinear
        && d3 == Orientation::Collinear
        && d4 == Orientation::Collinear;
    if all_collinear {
        return classify_collinear(s1, s2);
    }

    // One or more orientation tests are exactly zero (endpoint on the
    // other segment's line) without full collinearity: touching at a
    // shared point, or disjoint.
    if (d1 == Orientation::Collinear && in_bounding_box(&s2.start, &s2.end, &s1.start))
        || (d2 == Orientation::Collinear && in_bounding_box(&s2.start, &s2.end, &s1.end))
        || (d3 == Orientation::Collinear && in_bounding_box(&s1.start, &s1.end, &s2.start))
        || (d4 == Orientation::Collinear && in_bounding_box(&s1.start, &s1.end, &s2.end))
    {
        return SegmentsRelationship::Touch;
    }

    SegmentsRelationship::Disjoint
}

fn classify_collinear<S: Scalar>(s1: &Segment<S>, s2: &Segment<S>) -> SegmentsRelationship {
    // Project onto whichever axis has greater spread to avoid dividing
    // by a degenerate projection; compare via the coordinate directly
    // since S only guarantees an ordered field, not a metric.
    let (lo1, hi1) = if s1.start <= s1.end {
        (&s1.start, &s1.end)
    } else {
        (&s1.end, &s1.start)
    };
    let (lo2, hi2) = if s2.start <= s2.end {
        (&s2.start, &s2.end)
    } else {
        (&s2.end, &s2.start)
    };

    if hi1 < lo2 || hi2 < lo1 {
        return SegmentsRelationship::Disjoint;
    }
    if hi1 == lo2 || hi2 == lo1 {
        return SegmentsRelationship::Touch;
    }
    SegmentsRelationship::Overlap
}
