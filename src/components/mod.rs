//! Device models and their linear relaxations.
//!
//! This module provides:
//! - [`MosfetModel`] and [`Mosfet`]: the square-law transistor with exact
//!   point and interval evaluation of its current and gradient
//! - [`partition`]: the split of a `(Vgse, Vds)` box into operating regions
//! - [`DeviceRelaxer`]: sound linear programs bounding a device's current

mod mosfet;
mod region;
mod relax;

pub use mosfet::{
    drain_current, drain_current_at, drain_current_gradient, drain_current_gradient_at, Channel,
    DeviceParams, Mosfet, MosfetModel,
};
pub use region::{intersection, partition, rectangle, Point, Region, RegionPiece};
pub use relax::{bound_quadratic, region_form, DeviceRelaxer};
