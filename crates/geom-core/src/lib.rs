//! Exact-decision 2D computational geometry core: adaptive predicates,
//! constrained Delaunay triangulation, and contour/polygon validation.
//!
//! Purpose
//! - Provide the numeric and combinatorial engine a higher-level
//!   geometry library builds set-algebra, spatial indexing, and affine
//!   transforms on top of: this crate stops at predicates, CDT, and
//!   validators.
//! - Every layer above the expansion-arithmetic base (`expansion`,
//!   `error_bounds`) is generic over the `Scalar` abstraction so the
//!   same code path serves both the adaptive `f64` fast path and an
//!   always-exact `BigRational` instantiation.
//!
//! Why this design
//! - Predicates are the innermost loop of triangulation; monomorphized
//!   generics over `Scalar` keep that path free of `dyn` dispatch.
//! - Structured errors (`thiserror`), `tracing` spans on superlinear
//!   operations, and a `Copy` tolerance struct are carried throughout
//!   even though no external wire format or CLI surface exposes them
//!   directly — this crate is a library dependency, not a binary.

pub mod cdt;
pub mod config;
pub mod delaunay;
pub mod error;
pub mod error_bounds;
pub mod expansion;
pub mod geom2;
pub mod predicates;
pub mod quadedge;
pub mod scalar;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::GeomConfig;
pub use error::GeomError;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cdt::constrained_delaunay;
    pub use crate::config::GeomConfig;
    pub use crate::delaunay::delaunay;
    pub use crate::error::GeomError;
    pub use crate::geom2::{
        convex_hull, edges_intersect, segment_contains, segment_contains_eps, segments_relationship,
        Contour, Point, Polygon, Segment, SegmentsRelationship,
    };
    pub use crate::predicates::signed_projection_length;
    pub use crate::scalar::{ExactPredicates, InCircleResult, Orientation, Rational, Scalar};
}
