//! Circuit-level relaxation and bound tightening.
//!
//! ## Circuit LP
//!
//! The LP has one voltage variable per node and one current variable per
//! device:
//! ```text
//! x = [ V_0 .. V_{N-1} | I_0 .. I_{D-1} ]
//! ```
//!
//! Each device contributes its relaxation over `(Vs, Vg, Vd, I_d)`, embedded
//! at the matching columns. Each node `n` that is not held at a fixed
//! voltage contributes the band
//! ```text
//! | Σ_{source(d) = n} I_d - Σ_{drain(d) = n} I_d | ≤ ε
//! ```
//! in place of an exact Kirchhoff equality.
//!
//! [`BoundTightener`] then minimizes and maximizes each interval-valued node
//! voltage over this LP.

mod assemble;
mod tighten;

pub use assemble::CircuitAssembler;
pub use tighten::{BoundTightener, LpCounters, TightenOutcome};
