//! Circuit representation and validation.
//!
//! A [`Circuit`] is a list of transistors over numbered nodes. Node voltages
//! and device currents share one LP variable space laid out by [`VarIndex`].

mod graph;
mod types;
mod validate;

pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
