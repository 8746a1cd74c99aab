//! Soundness margins used by the relaxation and tightening steps.
//!
//! The defaults are hand-tuned; every one of them can be overridden through
//! [`PruneConfig`].

/// Outward padding applied to a point-valued terminal when it is turned into
/// a bounding box for the device LP.
pub const TERMINAL_PAD: f64 = 1e-5;

/// Outward padding applied to the interval enclosure of a device current.
pub const CURRENT_PAD: f64 = 1e-3;

/// Half-width of the current-balance band `|Σ I| ≤ ε` used instead of an
/// exact Kirchhoff equality.
pub const KCL_TOLERANCE: f64 = 1e-3;

/// Outward padding applied to an LP optimum before it replaces a node bound.
pub const TIGHTEN_PAD: f64 = 1e-6;

/// Smallest denominator used when intersecting a line with a polygon edge.
pub const DEGENERATE_EPS: f64 = 1e-12;

/// Tunable epsilons for relaxation, assembly and tightening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PruneConfig {
    /// Padding for point terminals in the device bounding box
    pub terminal_pad: f64,
    /// Padding for the device current enclosure
    pub current_pad: f64,
    /// Current-balance tolerance per node
    pub kcl_tolerance: f64,
    /// Padding applied to tightened bounds
    pub tighten_pad: f64,
    /// Replacement for vanishing denominators in line intersection
    pub degenerate_eps: f64,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            terminal_pad: TERMINAL_PAD,
            current_pad: CURRENT_PAD,
            kcl_tolerance: KCL_TOLERANCE,
            tighten_pad: TIGHTEN_PAD,
            degenerate_eps: DEGENERATE_EPS,
        }
    }
}
