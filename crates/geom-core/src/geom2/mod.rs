//! 2D value types and the geometric utilities (L4) and validators (L8)
//! built on top of the L3 predicates.
//!
//! Purpose
//! - Provide `Point`, `Segment`, `Contour`, `Polygon`: the value objects
//!   every layer above L3 is expressed in terms of.
//! - Provide the utilities that consume `ExactPredicates` directly:
//!   convex hull, segment containment/relationship, the Bentley-Ottmann
//!   self-intersection sweep.
//!
//! References
//! - `crate::scalar::ExactPredicates` for the predicate surface these
//!   modules are generic over.

pub mod contour;
pub mod hull;
pub mod point;
pub mod polygon;
pub mod segment;
pub mod sweep;

pub use contour::Contour;
pub use hull::convex_hull;
pub use point::Point;
pub use polygon::Polygon;
pub use segment::{segment_contains, segment_contains_eps, segments_relationship, Segment, SegmentsRelationship};
pub use sweep::{edges_intersect, edges_intersect_naive};
