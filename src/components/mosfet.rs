//! MOSFET model.
//!
//! Uses the long-channel square-law model with a linear leakage term.
//! With `Vgse = Vg - Vs - Vt` and `Vds = Vd - Vs` (for `Vd >= Vs`):
//!
//! ```text
//! cutoff      Vgse < 0          Ids = gds·Vds
//! saturation  0 <= Vgse < Vds   Ids = (ks/2)·Vgse² + gds·Vds
//! linear      0 <= Vds <= Vgse  Ids = ks·(Vgse - Vds/2)·Vds + gds·Vds
//! ```
//!
//! where `ks = k·shape`. The device is symmetric: for `Vd < Vs` source and
//! drain swap roles and the current changes sign. P-type devices use the
//! signed convention `Vt < 0`, `k < 0` and are evaluated as n-type devices on
//! negated voltages.

use crate::circuit::NodeId;
use crate::interval::{next_down, next_up, Interval, Value};

/// Channel polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    N,
    P,
}

/// Parameters shared by all devices of one type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MosfetModel {
    /// Channel polarity
    pub channel: Channel,
    /// Threshold voltage (negative for p-type)
    pub vt: f64,
    /// Transconductance coefficient (negative for p-type)
    pub k: f64,
    /// Leakage conductance
    pub gds: f64,
}

impl MosfetModel {
    /// Small leakage that keeps Jacobians non-singular.
    pub const DEFAULT_LEAKAGE: f64 = 1.0e-8;

    /// N-type model without leakage.
    pub fn nfet(vt: f64, k: f64) -> Self {
        Self {
            channel: Channel::N,
            vt,
            k,
            gds: 0.0,
        }
    }

    /// P-type model without leakage; `vt` and `k` are expected negative.
    pub fn pfet(vt: f64, k: f64) -> Self {
        Self {
            channel: Channel::P,
            vt,
            k,
            gds: 0.0,
        }
    }

    /// Set the leakage conductance.
    pub fn with_leakage(mut self, gds: f64) -> Self {
        self.gds = gds;
        self
    }
}

/// Flattened per-device parameters used by the current equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceParams {
    pub channel: Channel,
    pub vt: f64,
    /// `k · shape`
    pub ks: f64,
    pub gds: f64,
}

impl DeviceParams {
    /// The n-type device that a p-type device is evaluated as, on negated
    /// terminal voltages. Leakage is unchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            channel: Channel::N,
            vt: -self.vt,
            ks: -self.ks,
            gds: self.gds,
        }
    }
}

/// A three-terminal transistor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Mosfet {
    /// Terminal nodes, `[source, gate, drain]`
    pub nodes: [NodeId; 3],
    pub model: MosfetModel,
    /// Width/length scale factor applied to `k`
    pub shape: f64,
}

impl Mosfet {
    /// Shape factor used when none is given.
    pub const DEFAULT_SHAPE: f64 = 3.0;

    /// Create a transistor with the default shape.
    pub fn new(source: NodeId, gate: NodeId, drain: NodeId, model: MosfetModel) -> Self {
        Self {
            nodes: [source, gate, drain],
            model,
            shape: Self::DEFAULT_SHAPE,
        }
    }

    /// Set the shape factor.
    pub fn with_shape(mut self, shape: f64) -> Self {
        self.shape = shape;
        self
    }

    /// Get the source node.
    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    /// Get the gate node.
    pub fn gate(&self) -> NodeId {
        self.nodes[1]
    }

    /// Get the drain node.
    pub fn drain(&self) -> NodeId {
        self.nodes[2]
    }

    /// Parameters with the shape folded into `ks`.
    pub fn params(&self) -> DeviceParams {
        DeviceParams {
            channel: self.model.channel,
            vt: self.model.vt,
            ks: self.model.k * self.shape,
            gds: self.model.gds,
        }
    }

    /// Terminal values `[Vs, Vg, Vd]` picked out of a node vector.
    ///
    /// Callers must ensure every terminal index is in range.
    pub fn terminals(&self, v: &[Value]) -> [Value; 3] {
        self.nodes.map(|n| v[n.0])
    }

    /// Drain current for the node voltages `v`.
    pub fn ids(&self, v: &[Value]) -> Value {
        drain_current(self.terminals(v), &self.params())
    }

    /// Partial derivatives of the drain current with respect to
    /// `[Vs, Vg, Vd]`.
    pub fn grad_ids(&self, v: &[Value]) -> [Value; 3] {
        drain_current_gradient(self.terminals(v), &self.params())
    }
}

/// Drain current for point terminal voltages.
pub fn drain_current_at(vs: f64, vg: f64, vd: f64, p: &DeviceParams) -> f64 {
    match p.channel {
        Channel::P => -nfet_current(-vs, -vg, -vd, &p.mirrored()),
        Channel::N => nfet_current(vs, vg, vd, p),
    }
}

fn nfet_current(vs: f64, vg: f64, vd: f64, p: &DeviceParams) -> f64 {
    if vd < vs {
        return -nfet_current(vd, vg, vs, p);
    }
    let vgse = (vg - vs) - p.vt;
    let vds = vd - vs;
    let i_leak = vds * p.gds;
    let i0 = if vgse < 0.0 {
        0.0
    } else if vgse < vds {
        (p.ks / 2.0) * vgse * vgse
    } else {
        p.ks * (vgse - vds / 2.0) * vds
    };
    i0 + i_leak
}

/// Drain current for point or interval terminals.
///
/// The current is decreasing in `Vs`, increasing in `Vd` and, for fixed
/// source and drain voltages, monotone in `Vg` (direction set by the sign of
/// `Vd - Vs`). The interval result is therefore bounded by evaluations at
/// the extreme source/drain corners and both gate endpoints, widened by one
/// ulp on each side to cover the rounding of those evaluations.
pub fn drain_current(terminals: [Value; 3], p: &DeviceParams) -> Value {
    if let [Value::Scalar(vs), Value::Scalar(vg), Value::Scalar(vd)] = terminals {
        return Value::Scalar(drain_current_at(vs, vg, vd, p));
    }
    let [vs, vg, vd] = terminals.map(|t| t.to_interval());
    let lo = drain_current_at(vs.hi(), vg.lo(), vd.lo(), p)
        .min(drain_current_at(vs.hi(), vg.hi(), vd.lo(), p));
    let hi = drain_current_at(vs.lo(), vg.lo(), vd.hi(), p)
        .max(drain_current_at(vs.lo(), vg.hi(), vd.hi(), p));
    Value::interval(next_down(lo.min(hi)), next_up(lo.max(hi)))
}

/// Gradient `[∂Ids/∂Vs, ∂Ids/∂Vg, ∂Ids/∂Vd]` for point voltages.
pub fn drain_current_gradient_at(vs: f64, vg: f64, vd: f64, p: &DeviceParams) -> [f64; 3] {
    match p.channel {
        // d(-I(-V))/dV = I'(-V): the two negations cancel.
        Channel::P => nfet_gradient(-vs, -vg, -vd, &p.mirrored()),
        Channel::N => nfet_gradient(vs, vg, vd, p),
    }
}

fn nfet_gradient(vs: f64, vg: f64, vd: f64, p: &DeviceParams) -> [f64; 3] {
    if vd < vs {
        let g = nfet_gradient(vd, vg, vs, p);
        return [-g[2], -g[1], -g[0]];
    }
    let vgse = (vg - vs) - p.vt;
    let vds = vd - vs;
    if vgse < 0.0 {
        [-p.gds, 0.0, p.gds]
    } else if vgse < vds {
        [-p.ks * vgse - p.gds, p.ks * vgse, p.gds]
    } else {
        let dg = p.ks * vds;
        let dd = p.ks * (vgse - vds) + p.gds;
        [-(dg + dd), dg, dd]
    }
}

/// Gradient for point or interval terminals.
pub fn drain_current_gradient(terminals: [Value; 3], p: &DeviceParams) -> [Value; 3] {
    if let [Value::Scalar(vs), Value::Scalar(vg), Value::Scalar(vd)] = terminals {
        return drain_current_gradient_at(vs, vg, vd, p).map(Value::Scalar);
    }
    let [vs, vg, vd] = terminals.map(|t| t.to_interval());
    let g = match p.channel {
        Channel::P => nfet_gradient_enclosure(-vs, -vg, -vd, &p.mirrored()),
        Channel::N => nfet_gradient_enclosure(vs, vg, vd, p),
    };
    g.map(Value::Interval)
}

/// Enclosure of the n-type gradient over a box, split into the part of the
/// box with `Vs <= Vd` and the mirrored part with `Vd <= Vs`.
fn nfet_gradient_enclosure(
    vs: Interval,
    vg: Interval,
    vd: Interval,
    p: &DeviceParams,
) -> [Interval; 3] {
    let forward = forward_gradient(vs, vg, vd, p);
    let reverse = forward_gradient(vd, vg, vs, p).map(|g| [-g[2], -g[1], -g[0]]);
    match (forward, reverse) {
        (Some(f), Some(r)) => [f[0].hull(&r[0]), f[1].hull(&r[1]), f[2].hull(&r[2])],
        (Some(f), None) => f,
        (None, Some(r)) => r,
        // One of the halves is always non-empty.
        (None, None) => unreachable!("interval box has neither Vs <= Vd nor Vd <= Vs points"),
    }
}

/// Gradient enclosure over the points of the box with `Vs <= Vd`, or `None`
/// if there are none.
fn forward_gradient(
    vs: Interval,
    vg: Interval,
    vd: Interval,
    p: &DeviceParams,
) -> Option<[Interval; 3]> {
    if vs.lo() > vd.hi() {
        return None;
    }
    let vt = Interval::point(p.vt);
    // Only source voltages not above the drain matter here.
    let vs_fwd = Interval::new(vs.lo(), vs.hi().min(vd.hi()));
    let vgse = (vg - vs_fwd - vt).max_with(0.0);
    let vds = (vd - vs).max_with(0.0);
    // Vgse - Vds = Vg - Vt - Vd, with Vd >= max(Vs, Vd.lo)
    let vd_fwd = Interval::new(vs.lo().max(vd.lo()), vd.hi());
    let vx = (vg - vt - vd_fwd).max_with(0.0);

    let dg = Interval::new(vgse.lo().min(vds.lo()), vgse.hi().min(vds.hi())).scale(p.ks);
    let dd = vx.scale(p.ks) + Interval::point(p.gds);
    Some([-(dg + dd), dg, dd])
}
