//! Linear programs and the solver seam.
//!
//! [`LinearProgram`] is a value type describing a polytope over positional
//! variables, with the set operations the relaxation engine needs
//! (concatenation, negation, remapping, union). Solving goes through the
//! [`LpBackend`] trait; [`MinilpBackend`] is the default implementation.

mod backend;
mod program;

pub use backend::{LpBackend, LpSolution, LpStatus, MinilpBackend};
pub use program::{Constraint, LinearProgram};
