//! Linear relaxations of the MOSFET current.
//!
//! [`DeviceRelaxer`] turns interval terminal voltages into a
//! [`LinearProgram`] over `(Vs, Vg, Vd, Ids)` whose feasible set contains
//! every point on the device's current surface within the box. The box is
//! cut into single-region pieces ([`partition`]); each piece is bounded by
//! tangent planes of its quadratic form ([`bound_quadratic`]) and the pieces
//! are merged with [`LinearProgram::union_with`].

use nalgebra::{DMatrix, DVector};

use super::mosfet::{drain_current, Channel, DeviceParams, Mosfet};
use super::region::{intersection, partition, Point, Region, RegionPiece};
use crate::config::PruneConfig;
use crate::error::{PruneError, Result};
use crate::interval::{Interval, Value};
use crate::lp::{Constraint, LinearProgram, LpBackend, MinilpBackend};

/// Column of each quantity in a device program.
const VS: usize = 0;
const VG: usize = 1;
const VD: usize = 2;
const IDS: usize = 3;

/// Builds device relaxations, solving the union LPs with `B`.
#[derive(Debug, Clone)]
pub struct DeviceRelaxer<B = MinilpBackend> {
    config: PruneConfig,
    backend: B,
}

impl DeviceRelaxer<MinilpBackend> {
    /// Relaxer with default margins and the `minilp` backend.
    pub fn new() -> Self {
        Self::with_config(PruneConfig::default())
    }

    /// Relaxer with custom margins and the `minilp` backend.
    pub fn with_config(config: PruneConfig) -> Self {
        Self::with_backend(config, MinilpBackend)
    }
}

impl Default for DeviceRelaxer<MinilpBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: LpBackend> DeviceRelaxer<B> {
    /// Relaxer with custom margins, solving unions with `backend`.
    pub fn with_backend(config: PruneConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// Margins used by this relaxer.
    pub fn config(&self) -> &PruneConfig {
        &self.config
    }

    /// LP backend used for unions.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Relaxation of `device` under node voltages `v`, including bounds on
    /// every column.
    ///
    /// Interval terminals are bounded by two inequalities and point
    /// terminals are pinned by an equality. The current column is bounded by
    /// the padded current enclosure (or pinned, when every terminal is a
    /// point). The result is bounded even when [`relax_terminals`] gives up
    /// on an undecidable source/drain ordering.
    ///
    /// [`relax_terminals`]: Self::relax_terminals
    pub fn relax_device(&self, device: &Mosfet, v: &[Value]) -> Result<LinearProgram> {
        if let Some(node) = device.nodes.iter().find(|n| n.0 >= v.len()) {
            return Err(PruneError::NodeOutOfRange {
                node: node.0,
                num_nodes: v.len(),
            });
        }
        let terminals = device.terminals(v);
        let params = device.params();

        let mut lp = LinearProgram::new();
        for (col, t) in terminals.iter().enumerate() {
            match t {
                Value::Scalar(x) => lp.push_equality(unit(col), *x),
                Value::Interval(i) => push_bounds(&mut lp, col, *i),
            }
        }
        match drain_current(terminals, &params) {
            Value::Scalar(i) => lp.push_equality(unit(IDS), i),
            Value::Interval(i) => push_bounds(&mut lp, IDS, i.pad(self.config.current_pad)),
        }
        Ok(lp.concat(&self.relax_terminals(terminals, &params)))
    }

    /// Relaxation of the current of a device with terminal values
    /// `[Vs, Vg, Vd]`.
    ///
    /// Returns a single equality when every terminal is a point, and an
    /// empty program when the source and drain intervals overlap.
    pub fn relax_terminals(&self, terminals: [Value; 3], params: &DeviceParams) -> LinearProgram {
        if let [Value::Scalar(_), Value::Scalar(_), Value::Scalar(_)] = terminals {
            let mut lp = LinearProgram::new();
            // drain_current is exact on point terminals
            let ids = drain_current(terminals, params);
            lp.push_equality(unit(IDS), ids.lo());
            return lp;
        }

        if params.channel == Channel::P {
            return self
                .relax_terminals(terminals.map(|t| -t), &params.mirrored())
                .negate_coefficients();
        }

        let [vs, vg, vd] = terminals;
        let (s, d) = (vs.to_interval(), vd.to_interval());
        if s.lo() < d.hi() && d.lo() < s.hi() {
            tracing::debug!(%s, %d, "source and drain overlap; no relaxation");
            return LinearProgram::new();
        }
        if s.hi() > d.lo() {
            tracing::trace!("source above drain; relaxing with terminals swapped");
            return swap_source_drain(&self.relax_terminals([vd, vg, vs], params));
        }

        let mut hyper = LinearProgram::new();
        for (col, t) in terminals.iter().enumerate() {
            let bounds = match t {
                Value::Scalar(x) => Interval::point(*x).pad(self.config.terminal_pad),
                Value::Interval(i) => *i,
            };
            push_bounds(&mut hyper, col, bounds);
        }
        let ids = drain_current(terminals, params).to_interval();
        push_bounds(&mut hyper, IDS, ids.pad(self.config.current_pad));

        let vgse = vg.to_interval() - s - Interval::point(params.vt);
        let vds = (d - s).max_with(0.0);
        self.split_region(vgse, vds, params, &hyper)
    }

    /// Relax an n-type device over the box `vgse × vds` (`vds >= 0`).
    ///
    /// Every piece of the region partition is relaxed with its own
    /// quadratic form, concatenated with `hyper`, and the pieces are merged
    /// by LP union.
    pub fn split_region(
        &self,
        vgse: Interval,
        vds: Interval,
        params: &DeviceParams,
        hyper: &LinearProgram,
    ) -> LinearProgram {
        let pieces = partition(vgse, vds, self.config.degenerate_eps);
        tracing::trace!(
            %vgse,
            %vds,
            regions = ?pieces.iter().map(|p| p.region).collect::<Vec<_>>(),
            "region split"
        );
        let mut relaxed = pieces
            .iter()
            .map(|piece| self.relax_piece(piece, params).concat(hyper));
        let Some(first) = relaxed.next() else {
            return hyper.clone();
        };
        relaxed.fold(first, |acc, lp| acc.union_with(&lp, &self.backend))
    }

    fn relax_piece(&self, piece: &RegionPiece, params: &DeviceParams) -> LinearProgram {
        let form = region_form(piece.region, params.ks);
        let vertices: Vec<DVector<f64>> = match piece.region {
            Region::Cutoff | Region::Saturation => {
                let (lo, hi) = piece.vgse_extent();
                if lo < hi {
                    vec![DVector::from_element(1, lo), DVector::from_element(1, hi)]
                } else {
                    vec![DVector::from_element(1, lo)]
                }
            }
            Region::Linear => piece
                .polygon
                .iter()
                .map(|p| DVector::from_row_slice(p))
                .collect(),
        };
        let lp = bound_quadratic(&form, &vertices, params.vt, self.config.degenerate_eps);
        fold_leakage(&lp, params.gds)
    }
}

/// Quadratic part of the drain current in each region, over `(Vgse)` for
/// cutoff and saturation and over `(Vgse, Vds)` in the linear region.
pub fn region_form(region: Region, ks: f64) -> DMatrix<f64> {
    let h = ks / 2.0;
    match region {
        Region::Cutoff => DMatrix::zeros(1, 1),
        Region::Saturation => DMatrix::from_element(1, 1, h),
        Region::Linear => DMatrix::from_row_slice(2, 2, &[0.0, h, h, -h]),
    }
}

/// Linear bounds on `I = xᵀ A x` over the convex hull of `vertices`,
/// expressed over `(Vs, Vg, Vd, Ids)`.
///
/// `x` is `(Vgse)` or `(Vgse, Vds)`, with `Vgse = Vg - Vs - vt` and
/// `Vds = Vd - Vs`. Two-dimensional vertices must be listed in polygon
/// order.
///
/// For a semidefinite form the tangent plane at every vertex bounds the
/// surface from one side, and a plane with the averaged slope shifted to
/// the extreme vertex closes the other side. For an indefinite form each
/// tangent direction and its negation are shifted to the minimum of
/// `c·(x, I(x))` over the polygon, found among the vertices, the stationary
/// points along the edges and the crossings of the principal eigenvector
/// line with the boundary.
///
/// # Panics
///
/// Panics if the form is not square over one or two variables, or if
/// `vertices` is empty.
pub fn bound_quadratic(
    form: &DMatrix<f64>,
    vertices: &[DVector<f64>],
    vt: f64,
    eps: f64,
) -> LinearProgram {
    let dim = form.nrows();
    assert!(
        (1..=2).contains(&dim) && form.ncols() == dim,
        "quadratic forms over more than two variables are not supported (got {}x{})",
        form.nrows(),
        form.ncols()
    );
    assert!(!vertices.is_empty(), "bound_quadratic needs at least one vertex");

    // cost·(x, I) ≤ d is the tangent plane I ≤ I(v) + ∇I(v)·(x - v)
    let tangents: Vec<(DVector<f64>, f64)> = vertices
        .iter()
        .map(|v| {
            let grad = (form * v) * 2.0;
            let mut cost = DVector::<f64>::zeros(dim + 1);
            for k in 0..dim {
                cost[k] = -grad[k];
            }
            cost[dim] = 1.0;
            (cost, quad(form, v) - grad.dot(v))
        })
        .collect();

    let eigenvalues = form.clone().symmetric_eigen().eigenvalues;
    let convex = eigenvalues.iter().all(|&l| l >= 0.0);
    let concave = eigenvalues.iter().all(|&l| l <= 0.0);

    let mut lp = LinearProgram::new();
    if convex || concave {
        for (cost, d) in &tangents {
            if convex {
                push_row(&mut lp, &-cost, -d, vt);
            } else {
                push_row(&mut lp, cost, *d, vt);
            }
        }
        let avg = tangents
            .iter()
            .fold(DVector::<f64>::zeros(dim + 1), |acc, (c, _)| acc + c)
            / tangents.len() as f64;
        let offsets: Vec<f64> = vertices
            .iter()
            .map(|v| avg.rows(0, dim).dot(v) + avg[dim] * quad(form, v))
            .collect();
        if convex {
            let top = offsets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            push_row(&mut lp, &avg, top, vt);
        } else {
            let bottom = offsets.iter().copied().fold(f64::INFINITY, f64::min);
            push_row(&mut lp, &-avg, -bottom, vt);
        }
    } else {
        let polygon: Vec<Point> = vertices.iter().map(|v| [v[0], v[1]]).collect();
        for (cost, _) in &tangents {
            for c in [cost.clone(), -cost] {
                // c·(x, I) ≥ m
                let m = min_on_polygon(form, &c, &polygon, eps);
                push_row(&mut lp, &-c, -m, vt);
            }
        }
    }
    lp
}

fn quad(form: &DMatrix<f64>, x: &DVector<f64>) -> f64 {
    x.dot(&(form * x))
}

/// Append `c·(x, I) ≤ rhs` rewritten over `(Vs, Vg, Vd, Ids)`. The threshold
/// term of `Vgse` moves to the right-hand side.
fn push_row(lp: &mut LinearProgram, c: &DVector<f64>, rhs: f64, vt: f64) {
    let dim = c.len() - 1;
    let (cg, cd) = if dim == 2 { (c[0], c[1]) } else { (c[0], 0.0) };
    lp.push_inequality(vec![-cg - cd, cg, cd, c[dim]], rhs + cg * vt);
}

/// Minimum of `c·(x, xᵀAx)` over a convex polygon of an indefinite form.
fn min_on_polygon(form: &DMatrix<f64>, c: &DVector<f64>, polygon: &[Point], eps: f64) -> f64 {
    let ci = c[2];
    let eval = |p: Point| {
        let x = DVector::from_row_slice(&p);
        c[0] * p[0] + c[1] * p[1] + ci * quad(form, &x)
    };

    let mut candidates: Vec<Point> = polygon.to_vec();

    let n = polygon.len();
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let e = DVector::from_row_slice(&[q[0] - p[0], q[1] - p[1]]);
        let pv = DVector::from_row_slice(&p);
        // g(p + t e) = alpha t² + beta t + const
        let alpha = ci * quad(form, &e);
        let beta = c[0] * e[0] + c[1] * e[1] + 2.0 * ci * pv.dot(&(form * &e));
        if alpha > 0.0 {
            let t = -beta / (2.0 * alpha);
            if 0.0 < t && t < 1.0 {
                candidates.push([p[0] + t * e[0], p[1] + t * e[1]]);
            }
        }
    }

    let eigen = form.scale(ci).symmetric_eigen();
    let principal = eigen.eigenvectors.column(eigen.eigenvalues.imax());
    let line = [-principal[1], principal[0], 0.0];
    candidates.extend(intersection(line, polygon, eps));

    candidates
        .into_iter()
        .map(eval)
        .fold(f64::INFINITY, f64::min)
}

/// Rewrite rows over `i0 = Ids - gds·(Vd - Vs)` as rows over `Ids`.
fn fold_leakage(lp: &LinearProgram, gds: f64) -> LinearProgram {
    if gds == 0.0 {
        return lp.clone();
    }
    let fold = |row: &Constraint| {
        let mut coeffs = row.coeffs.clone();
        let ci = coeffs[IDS];
        coeffs[VS] += ci * gds;
        coeffs[VD] -= ci * gds;
        Constraint::new(coeffs, row.rhs)
    };
    LinearProgram::from_rows(
        lp.inequalities().iter().map(fold).collect(),
        lp.equalities().iter().map(fold).collect(),
    )
}

/// Map a program solved with source and drain exchanged back to the
/// original columns. The swapped device carries the opposite current.
fn swap_source_drain(lp: &LinearProgram) -> LinearProgram {
    let swap = |row: &Constraint| {
        let c = &row.coeffs;
        Constraint::new(vec![c[VD], c[VG], c[VS], -c[IDS]], row.rhs)
    };
    LinearProgram::from_rows(
        lp.inequalities().iter().map(swap).collect(),
        lp.equalities().iter().map(swap).collect(),
    )
}

fn unit(col: usize) -> Vec<f64> {
    let mut e = vec![0.0; 4];
    e[col] = 1.0;
    e
}

fn push_bounds(lp: &mut LinearProgram, col: usize, bounds: Interval) {
    let mut lower = vec![0.0; 4];
    lower[col] = -1.0;
    lp.push_inequality(lower, -bounds.lo());
    lp.push_inequality(unit(col), bounds.hi());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::NodeId;
    use crate::components::mosfet::{drain_current_at, MosfetModel};
    use crate::lp::LpStatus;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-6;

    fn nfet(vt: f64, ks: f64, gds: f64) -> DeviceParams {
        DeviceParams {
            channel: Channel::N,
            vt,
            ks,
            gds,
        }
    }

    fn pfet(vt: f64, ks: f64, gds: f64) -> DeviceParams {
        DeviceParams {
            channel: Channel::P,
            vt,
            ks,
            gds,
        }
    }

    fn samples(v: Value, n: usize) -> Vec<f64> {
        match v {
            Value::Scalar(x) => vec![x],
            Value::Interval(i) => (0..=n)
                .map(|k| i.lo() + i.width() * k as f64 / n as f64)
                .collect(),
        }
    }

    /// Every point of the current surface inside the box satisfies `lp`.
    fn assert_sound(lp: &LinearProgram, terminals: [Value; 3], params: &DeviceParams) {
        for vs in samples(terminals[0], 6) {
            for vg in samples(terminals[1], 6) {
                for vd in samples(terminals[2], 6) {
                    let ids = drain_current_at(vs, vg, vd, params);
                    assert!(
                        lp.is_satisfied_by(&[vs, vg, vd, ids], TOL),
                        "({vs}, {vg}, {vd}, {ids}) violates the relaxation"
                    );
                }
            }
        }
    }

    fn current_range(lp: &LinearProgram, vs: f64, vg: f64, vd: f64) -> (f64, f64) {
        let mut pinned = lp.clone();
        pinned.push_equality(unit(VS), vs);
        pinned.push_equality(unit(VG), vg);
        pinned.push_equality(unit(VD), vd);
        let lo = match pinned.clone().with_cost(unit(IDS)).solve() {
            LpStatus::Optimal(sol) => sol.objective,
            status => panic!("min Ids at ({vs}, {vg}, {vd}): {status:?}"),
        };
        let hi = match pinned.with_cost(vec![0.0, 0.0, 0.0, -1.0]).solve() {
            LpStatus::Optimal(sol) => -sol.objective,
            status => panic!("max Ids at ({vs}, {vg}, {vd}): {status:?}"),
        };
        (lo, hi)
    }

    #[test]
    fn test_convex_tangents_and_cap() {
        // I = Vgse²/2 over Vgse in [0, 1], Vt = 0
        let form = region_form(Region::Saturation, 1.0);
        let vertices = [DVector::from_element(1, 0.0), DVector::from_element(1, 1.0)];
        let lp = bound_quadratic(&form, &vertices, 0.0, 1e-12);
        assert_eq!(lp.inequalities().len(), 3);
        for k in 0..=10 {
            let x = k as f64 / 10.0;
            assert!(lp.is_satisfied_by(&[0.0, x, 0.5, x * x / 2.0], 1e-12));
        }
        // above the chord from (0, 0) to (1, 0.5)
        assert!(!lp.is_satisfied_by(&[0.0, 0.5, 0.5, 0.3], 1e-12));
        // below the tangent at 1
        assert!(!lp.is_satisfied_by(&[0.0, 1.0, 0.5, 0.4], 1e-12));
    }

    #[test]
    fn test_threshold_shift() {
        // same surface with Vt = 0.4: I = (Vg - Vs - 0.4)²/2
        let form = region_form(Region::Saturation, 1.0);
        let vertices = [DVector::from_element(1, 0.0), DVector::from_element(1, 1.0)];
        let lp = bound_quadratic(&form, &vertices, 0.4, 1e-12);
        for k in 0..=10 {
            let vgse = k as f64 / 10.0;
            let (vs, vg) = (0.3, 0.3 + 0.4 + vgse);
            assert!(lp.is_satisfied_by(&[vs, vg, 1.0, vgse * vgse / 2.0], 1e-12));
        }
    }

    #[test]
    #[should_panic(expected = "more than two variables")]
    fn test_three_variable_form_panics() {
        let form = DMatrix::identity(3, 3);
        bound_quadratic(&form, &[DVector::zeros(3)], 0.0, 1e-12);
    }

    #[test]
    fn test_indefinite_sandwich() {
        let form = region_form(Region::Linear, 2.0);
        let triangle = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        let vertices: Vec<_> = triangle
            .iter()
            .map(|p| DVector::from_row_slice(p))
            .collect();
        let lp = bound_quadratic(&form, &vertices, 0.0, 1e-12);
        assert_eq!(lp.inequalities().len(), 6);
        for i in 0..=10 {
            for j in 0..=i {
                let (g, d) = (i as f64 / 10.0, j as f64 / 10.0);
                let ids = 2.0 * (g - d / 2.0) * d;
                assert!(lp.is_satisfied_by(&[0.0, g, d, ids], 1e-9));
            }
        }
        assert!(!lp.is_satisfied_by(&[0.0, 1.0, 0.5, 3.0], 1e-9));
        assert!(!lp.is_satisfied_by(&[0.0, 1.0, 0.5, -1.0], 1e-9));
    }

    #[test]
    fn test_point_terminals_pin_the_current() {
        let relaxer = DeviceRelaxer::new();
        let params = nfet(0.4, 3.0, 0.0);
        let terminals = [Value::Scalar(0.0), Value::Scalar(1.0), Value::Scalar(1.0)];
        let lp = relaxer.relax_terminals(terminals, &params);
        assert!(lp.inequalities().is_empty());
        assert_eq!(lp.equalities().len(), 1);
        assert_abs_diff_eq!(lp.equalities()[0].rhs, 1.5 * 0.36, epsilon = 1e-12);
    }

    #[test]
    fn test_overlapping_source_and_drain_give_empty_program() {
        let relaxer = DeviceRelaxer::new();
        let terminals = [
            Value::interval(0.0, 1.0),
            Value::Scalar(1.0),
            Value::interval(0.5, 1.5),
        ];
        assert!(relaxer
            .relax_terminals(terminals, &nfet(0.4, 3.0, 0.0))
            .is_empty());
    }

    #[test]
    fn test_scenario_single_nfet_unit_box() {
        let params = nfet(0.0, 1.0, 0.0);
        let vgse = Interval::new(0.0, 1.0);
        let vds = Interval::new(0.0, 1.0);
        assert!(partition(vgse, vds, 1e-12).len() >= 2);

        let relaxer = DeviceRelaxer::new();
        let terminals = [
            Value::Scalar(0.0),
            Value::interval(0.0, 1.0),
            Value::interval(0.0, 1.0),
        ];
        let lp = relaxer.relax_terminals(terminals, &params);
        assert_sound(&lp, terminals, &params);
        for vg in [0.0, 1.0] {
            for vd in [0.0, 1.0] {
                let exact = drain_current_at(0.0, vg, vd, &params);
                let (lo, hi) = current_range(&lp, 0.0, vg, vd);
                assert!(
                    lo - TOL <= exact && exact <= hi + TOL,
                    "corner ({vg}, {vd}): {exact} not in [{lo}, {hi}]"
                );
            }
        }
    }

    #[test]
    fn test_point_source_and_drain_with_interval_gate() {
        // Vds is the single value 0.5; every region piece collapses to a segment
        let relaxer = DeviceRelaxer::new();
        let params = nfet(0.4, 3.0, 0.0);
        let terminals = [
            Value::Scalar(0.0),
            Value::interval(0.0, 1.8),
            Value::Scalar(0.5),
        ];
        let pieces = partition(Interval::new(-0.4, 1.4), Interval::point(0.5), 1e-12);
        assert_eq!(pieces.len(), 3);

        let lp = relaxer.relax_terminals(terminals, &params);
        assert!(!lp.is_empty());
        assert_sound(&lp, terminals, &params);
        for vg in [0.2, 0.6, 1.0, 1.8] {
            let exact = drain_current_at(0.0, vg, 0.5, &params);
            let (lo, hi) = current_range(&lp, 0.0, vg, 0.5);
            assert!(lo - TOL <= exact && exact <= hi + TOL);
        }
    }

    #[test]
    fn test_relaxation_is_sound() {
        let relaxer = DeviceRelaxer::new();
        let cases = [
            (
                nfet(0.4, 3.0, 0.0),
                [
                    Value::Scalar(0.0),
                    Value::interval(0.0, 1.8),
                    Value::interval(0.2, 1.8),
                ],
            ),
            (
                nfet(0.4, 3.0, 0.05),
                [
                    Value::interval(0.0, 0.2),
                    Value::interval(0.5, 1.5),
                    Value::interval(0.3, 1.0),
                ],
            ),
            // source above drain
            (
                nfet(0.4, 3.0, 0.0),
                [
                    Value::interval(1.0, 1.8),
                    Value::interval(0.0, 1.8),
                    Value::Scalar(0.0),
                ],
            ),
            (
                pfet(-0.4, -3.0, 0.0),
                [
                    Value::Scalar(1.8),
                    Value::interval(0.0, 1.8),
                    Value::interval(0.0, 1.6),
                ],
            ),
            (
                pfet(-0.4, -3.0, 0.01),
                [
                    Value::interval(1.7, 1.8),
                    Value::interval(0.2, 0.6),
                    Value::interval(0.9, 1.2),
                ],
            ),
        ];
        for (params, terminals) in cases {
            let lp = relaxer.relax_terminals(terminals, &params);
            assert!(!lp.is_empty());
            assert_sound(&lp, terminals, &params);
        }
    }

    #[test]
    fn test_relaxation_excludes_far_currents() {
        let relaxer = DeviceRelaxer::new();
        let params = nfet(0.4, 3.0, 0.0);
        let terminals = [
            Value::Scalar(0.0),
            Value::interval(0.0, 1.8),
            Value::interval(0.2, 1.8),
        ];
        let lp = relaxer.relax_terminals(terminals, &params);
        let exact = drain_current_at(0.0, 1.8, 1.8, &params);
        assert!(!lp.is_satisfied_by(&[0.0, 1.8, 1.8, exact + 1.0], TOL));
        assert!(!lp.is_satisfied_by(&[0.0, 1.8, 1.8, -1.0], TOL));
    }

    #[test]
    fn test_relax_device_bounds_every_column() {
        let relaxer = DeviceRelaxer::new();
        let device = Mosfet::new(NodeId(0), NodeId(1), NodeId(2), MosfetModel::nfet(0.4, 1.0));
        let v = [
            Value::Scalar(0.0),
            Value::interval(0.0, 1.8),
            Value::interval(0.0, 1.8),
        ];
        let lp = relaxer.relax_device(&device, &v).unwrap();
        assert_eq!(lp.num_vars(), Some(4));
        assert_eq!(lp.equalities()[0].coeffs, unit(VS));
        for col in [VG, VD, IDS] {
            for sign in [1.0, -1.0] {
                let mut cost = vec![0.0; 4];
                cost[col] = sign;
                let status = lp.clone().with_cost(cost).solve();
                assert!(status.is_optimal(), "column {col} unbounded: {status:?}");
            }
        }
        assert!(matches!(
            relaxer.relax_device(&device, &v[..2]),
            Err(PruneError::NodeOutOfRange { node: 2, .. })
        ));
    }

    #[test]
    fn test_relax_device_bounds_saddle_devices() {
        let relaxer = DeviceRelaxer::new();
        let device = Mosfet::new(NodeId(0), NodeId(1), NodeId(2), MosfetModel::nfet(0.4, 1.0));
        let v = [
            Value::interval(0.0, 1.0),
            Value::Scalar(1.8),
            Value::interval(0.5, 1.5),
        ];
        let lp = relaxer.relax_device(&device, &v).unwrap();
        let status = lp.with_cost(unit(IDS)).solve();
        assert!(status.is_optimal());
    }
}
