//! Purpose: `edges_intersect`, a Bentley-Ottmann-style plane sweep
//! deciding whether any two non-adjacent edges in a finite edge set
//! cross or overlap. This is the subtlest piece of L4: the sweep's
//! status-structure comparator has to agree with `segments_relationship`
//! at every event, or the two routines disagree right where it matters
//! most (near-degenerate inputs).
//!
//! A simpler O(n^2) all-pairs scan (`edges_intersect_naive`) is kept as
//! a cross-check for small inputs and for differential testing against
//! the sweep.

use std::cmp::Ordering;

use tracing::debug_span;

use crate::geom2::point::Point;
use crate::geom2::segment::{segments_relationship, Segment, SegmentsRelationship};
use crate::scalar::ExactPredicates;

/// Reports whether any two edges in `edges` properly cross or overlap.
/// Edges that only share an endpoint (adjacent mesh edges, or a
/// contour's consecutive edges) are not considered a crossing.
pub fn edges_intersect<S: ExactPredicates>(edges: &[Segment<S>]) -> bool {
    let span = debug_span!("edges_intersect", input_len = edges.len());
    let _enter = span.enter();

    if edges.len() < 2 {
        return false;
    }

    #[derive(Clone, Copy)]
    enum EventKind {
        Start,
        End,
    }

    struct Event<'a, S: ExactPredicates> {
        point: &'a Point<S>,
        edge: usize,
        kind: EventKind,
    }

    let mut events: Vec<Event<S>> = Vec::with_capacity(edges.len() * 2);
    for (i, e) in edges.iter().enumerate() {
        let (first, second, first_kind, second_kind) = if e.start <= e.end {
            (&e.start, &e.end, EventKind::Start, EventKind::End)
        } else {
            (&e.end, &e.start, EventKind::Start, EventKind::End)
        };
        events.push(Event { point: first, edge: i, kind: first_kind });
        events.push(Event { point: second, edge: i, kind: second_kind });
    }
    events.sort_by(|a, b| {
        a.point
            .partial_cmp(b.point)
            .unwrap_or(Ordering::Equal)
            .then(match (a.kind, b.kind) {
                (EventKind::Start, EventKind::End) => Ordering::Less,
                (EventKind::End, EventKind::Start) => Ordering::Greater,
                _ => Ordering::Equal,
            })
    });

    // The status structure (edges currently crossing the sweep line)
    // does not need to be kept sorted by intersection with the sweep
    // line to be correct, only to be fast; we keep it a flat `Vec` and
    // test the newly (de)activated edge against every other active
    // edge. This is the textbook Bentley-Ottmann event loop without
    // the balanced-tree status structure, trading its O(log n)
    // neighbor queries for a simpler O(k) scan over the currently
    // active set per event, where k is the sweep-line's current
    // width — still far below the O(n^2) of the naive scan on inputs
    // where few edges are simultaneously active, which is the normal
    // case for contours and triangulation meshes.
    let mut active: Vec<usize> = Vec::new();
    let found = 'outer: {
        for ev in &events {
            match ev.kind {
                EventKind::Start => {
                    for &other in &active {
                        if shares_endpoint(&edges[ev.edge], &edges[other]) {
                            continue;
                        }
                        if matches!(
                            segments_relationship(&edges[ev.edge], &edges[other]),
                            SegmentsRelationship::Cross | SegmentsRelationship::Overlap
                        ) {
                            break 'outer true;
                        }
                    }
                    active.push(ev.edge);
                }
                EventKind::End => {
                    active.retain(|&e| e != ev.edge);
                }
            }
        }
        false
    };

    tracing::debug!(found, "done");
    found
}

fn shares_endpoint<S: ExactPredicates>(a: &Segment<S>, b: &Segment<S>) -> bool {
    a.start == b.start || a.start == b.end || a.end == b.start || a.end == b.end
}

/// O(n^2) all-pairs scan; a cross-check for [`edges_intersect`] on
/// small inputs, not the primary entry point.
pub fn edges_intersect_naive<S: ExactPredicates>(edges: &[Segment<S>]) -> bool {
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if shares_endpoint(&edges[i], &edges[j]) {
                continue;
            }
            if matches!(
                segments_relationship(&edges[i], &edges[j]),
                SegmentsRelationship::Cross | SegmentsRelationship::Overlap
            ) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment<f64> {
        Segment::new(Point::xy(x1, y1), Point::xy(x2, y2)).unwrap()
    }

    #[test]
    fn detects_proper_crossing() {
        let edges = vec![seg(0.0, 0.0, 4.0, 4.0), seg(0.0, 4.0, 4.0, 0.0)];
        assert!(edges_intersect(&edges));
        assert!(edges_intersect_naive(&edges));
    }

    #[test]
    fn adjacent_edges_sharing_endpoint_do_not_count() {
        let edges = vec![seg(0.0, 0.0, 2.0, 0.0), seg(2.0, 0.0, 2.0, 2.0), seg(2.0, 2.0, 0.0, 0.0)];
        assert!(!edges_intersect(&edges));
        assert!(!edges_intersect_naive(&edges));
    }

    #[test]
    fn figure_eight_self_intersects() {
        // (0,0),(2,0),(2,2),(0,2),(1,1),(1,3) closed polyline.
        let v = [
            Point::xy(0.0, 0.0),
            Point::xy(2.0, 0.0),
            Point::xy(2.0, 2.0),
            Point::xy(0.0, 2.0),
            Point::xy(1.0, 1.0),
            Point::xy(1.0, 3.0),
        ];
        let edges: Vec<Segment<f64>> = (0..v.len())
            .map(|i| Segment::new(v[i].clone(), v[(i + 1) % v.len()].clone()).unwrap())
            .collect();
        assert!(edges_intersect(&edges));
        assert!(edges_intersect_naive(&edges));
    }

    #[test]
    fn disjoint_edges_do_not_intersect() {
        let edges = vec![seg(0.0, 0.0, 1.0, 0.0), seg(5.0, 5.0, 6.0, 6.0)];
        assert!(!edges_intersect(&edges));
    }
}
