//! # Mosprune Core
//!
//! Sound linear relaxations of MOSFET circuits for pruning DC operating
//! point searches.
//!
//! This library provides:
//! - Point/interval values with outward-rounded arithmetic
//! - A linear program container with concatenation, remapping and union
//! - Piecewise-linear relaxations of the square-law transistor current over
//!   interval terminal voltages, across cutoff, saturation and linear regions
//! - Whole-circuit LP assembly with current-balance bands
//! - LP-based tightening of node voltage bounds
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`interval`] - [`Interval`] and the point-or-interval [`Value`]
//! - [`lp`] - [`LinearProgram`] and the [`LpBackend`](lp::LpBackend) solver seam
//! - [`components`] - Device models and the [`DeviceRelaxer`](components::DeviceRelaxer)
//! - [`circuit`] - Circuit representation and validation
//! - [`solver`] - [`CircuitAssembler`](solver::CircuitAssembler) and [`BoundTightener`]
//!
//! ## Usage
//!
//! ```no_run
//! use mosprune_core::{BoundTightener, Circuit, MosfetModel, NodeId, Value};
//!
//! let circuit = Circuit::inverter_ring(
//!     3,
//!     MosfetModel::nfet(0.4, 1.0),
//!     MosfetModel::pfet(-0.4, -1.0),
//!     3.0,
//! )?;
//! let mut bounds = vec![Value::Scalar(0.0), Value::Scalar(1.8)];
//! bounds.extend(std::iter::repeat(Value::interval(0.0, 1.8)).take(3));
//!
//! let outcome = BoundTightener::new().tighten(
//!     &circuit,
//!     &bounds,
//!     &[NodeId::GROUND, NodeId::SUPPLY],
//! )?;
//! println!("feasible: {}", outcome.feasible);
//! # Ok::<(), mosprune_core::PruneError>(())
//! ```
//!
//! ## Relaxation Method
//!
//! For each device the `(Vgse, Vds)` box spanned by its terminal bounds is
//! split into pieces lying in a single operating region:
//!
//! 1. Bound the region's quadratic current on each piece with tangent planes
//! 2. Add the bounding box of every terminal and of the current
//! 3. Merge the pieces with an LP union that contains every piece
//!
//! P-type devices and devices whose source lies above their drain are
//! relaxed through the mirrored n-type device.

pub mod circuit;
pub mod components;
pub mod config;
pub mod error;
pub mod interval;
pub mod lp;
pub mod solver;

// Re-export main types for convenience
pub use circuit::{Circuit, NodeId};
pub use components::{Mosfet, MosfetModel};
pub use config::PruneConfig;
pub use error::{PruneError, Result};
pub use interval::{Interval, Value};
pub use lp::LinearProgram;
pub use solver::{BoundTightener, TightenOutcome};
