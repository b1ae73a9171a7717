//! Purpose: a single typed error surface for every fallible entry
//! point (validators, CDT constraint insertion). Predicates and plain
//! Delaunay never fail; they are not represented here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    #[error("coordinate is NaN or infinite")]
    InvalidCoordinate,

    #[error("segment start and end coincide")]
    DegenerateSegment,

    #[error("contour has {found} vertices, at least 3 are required")]
    ContourTooSmall { found: usize },

    #[error("vertices {prev}, {at}, {next} are collinear")]
    CollinearConsecutive {
        prev: usize,
        at: usize,
        next: usize,
    },

    #[error("contour edges cross or improperly touch")]
    SelfIntersectingContour,

    #[error("hole is not fully contained in the border")]
    HoleOutsideBorder,

    #[error("constraint endpoints are not both in the triangulated point set")]
    InvalidConstraint,

    #[error("constraint set does not form a simple boundary")]
    InvalidBoundary,

    #[error("triangulation invariant violated: {reason}")]
    DegenerateMesh { reason: &'static str },
}
