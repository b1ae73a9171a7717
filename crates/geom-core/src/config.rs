//! Purpose: the one `Copy` tolerance bag threaded into L4/L8 entry
//! points that need an application-level epsilon. Adaptive-predicate
//! error bounds (`error_bounds.rs`) are derived from machine epsilon
//! and are never part of this struct — only the coarser "near enough"
//! checks that sit a layer above exact sign decisions are.

/// Tolerances for `f64`-instantiated geometry. The `BigRational`
/// instantiation has no use for either field: its predicates are
/// exact, so there is no floating slack to configure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomConfig {
    /// Slack applied to the bounding-box half of `segment_contains`,
    /// to absorb float rounding carried in from upstream computation
    /// even when the orientation predicate itself reports collinear.
    pub eps_touch: f64,
    /// Slack applied to the winding probe in `Polygon::validate`'s
    /// hole-containment check, so a hole vertex that sits on the
    /// border within this distance counts as "touching" rather than
    /// failing containment outright.
    pub eps_hole_touch: f64,
}

impl Default for GeomConfig {
    fn default() -> Self {
        Self {
            eps_touch: 1e4 * f64::EPSILON,
            eps_hole_touch: 1e4 * f64::EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerances_are_small_and_positive() {
        let cfg = GeomConfig::default();
        assert!(cfg.eps_touch > 0.0 && cfg.eps_touch < 1e-8);
        assert!(cfg.eps_hole_touch > 0.0 && cfg.eps_hole_touch < 1e-8);
    }
}
