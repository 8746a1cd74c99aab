//! Linear programs as algebraic values.
//!
//! A [`LinearProgram`] stores its constraints row by row: `A x ≤ b` and
//! `Aeq x = beq`, plus an optional cost vector. Variables are positional and
//! unnamed; the variable count is the length of any row. All structural
//! operations (`concat`, `negate_coefficients`, `remap`, `constraint_as_cost`,
//! `union`) return a new program and leave their operands untouched, so a
//! sub-program can be reused across several union branches.

use std::fmt;

use super::backend::{LpBackend, LpStatus, MinilpBackend};
use crate::error::{PruneError, Result};

/// One linear constraint row: `coeffs · x (≤ | =) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficient per variable
    pub coeffs: Vec<f64>,
    /// Right-hand side
    pub rhs: f64,
}

impl Constraint {
    /// Create a row `coeffs · x ≤ rhs` (or `= rhs` when stored as an equality).
    pub fn new(coeffs: Vec<f64>, rhs: f64) -> Self {
        Self { coeffs, rhs }
    }

    /// Evaluate `coeffs · x`.
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coeffs.iter().zip(x).map(|(a, v)| a * v).sum()
    }
}

/// A polytope `{x | A x ≤ b, Aeq x = beq}` with an optional objective.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    cost: Option<Vec<f64>>,
    inequalities: Vec<Constraint>,
    equalities: Vec<Constraint>,
}

impl LinearProgram {
    /// Create an empty program (no rows, no cost).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a program from explicit rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    pub fn from_rows(inequalities: Vec<Constraint>, equalities: Vec<Constraint>) -> Self {
        let mut lp = Self::new();
        for row in inequalities {
            lp.push_inequality(row.coeffs, row.rhs);
        }
        for row in equalities {
            lp.push_equality(row.coeffs, row.rhs);
        }
        lp
    }

    /// Number of variables, or `None` while the program has no rows.
    pub fn num_vars(&self) -> Option<usize> {
        self.inequalities
            .first()
            .or_else(|| self.equalities.first())
            .map(|row| row.coeffs.len())
    }

    /// Total number of inequality and equality rows.
    pub fn num_constraints(&self) -> usize {
        self.inequalities.len() + self.equalities.len()
    }

    /// True if the program has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_constraints() == 0
    }

    /// Inequality rows, `coeffs · x ≤ rhs`.
    pub fn inequalities(&self) -> &[Constraint] {
        &self.inequalities
    }

    /// Equality rows, `coeffs · x = rhs`.
    pub fn equalities(&self) -> &[Constraint] {
        &self.equalities
    }

    /// Current objective vector.
    pub fn cost(&self) -> Option<&[f64]> {
        self.cost.as_deref()
    }

    /// Append `coeffs · x ≤ rhs`.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` does not match the program's variable count.
    pub fn push_inequality(&mut self, coeffs: Vec<f64>, rhs: f64) {
        self.check_width(coeffs.len());
        self.inequalities.push(Constraint::new(coeffs, rhs));
    }

    /// Append `coeffs · x = rhs`.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` does not match the program's variable count.
    pub fn push_equality(&mut self, coeffs: Vec<f64>, rhs: f64) {
        self.check_width(coeffs.len());
        self.equalities.push(Constraint::new(coeffs, rhs));
    }

    /// Replace the objective vector.
    pub fn set_cost(&mut self, cost: Vec<f64>) {
        self.cost = Some(cost);
    }

    /// Builder form of [`set_cost`](Self::set_cost).
    pub fn with_cost(mut self, cost: Vec<f64>) -> Self {
        self.set_cost(cost);
        self
    }

    fn check_width(&self, width: usize) {
        if let Some(n) = self.num_vars() {
            assert_eq!(
                n, width,
                "constraint row has {width} coefficients but the program has {n} variables"
            );
        }
    }

    /// Rows of both programs; the receiver's cost is kept.
    ///
    /// # Panics
    ///
    /// Panics if both programs have rows and their variable counts differ.
    pub fn concat(&self, other: &LinearProgram) -> LinearProgram {
        if let (Some(n), Some(m)) = (self.num_vars(), other.num_vars()) {
            assert_eq!(n, m, "cannot concatenate programs over {n} and {m} variables");
        }
        let mut lp = self.clone();
        lp.inequalities.extend(other.inequalities.iter().cloned());
        lp.equalities.extend(other.equalities.iter().cloned());
        lp
    }

    /// Negate every coefficient; right-hand sides are unchanged.
    ///
    /// A program over `x` becomes the same polytope over `-x`.
    pub fn negate_coefficients(&self) -> LinearProgram {
        let negate = |row: &Constraint| {
            Constraint::new(row.coeffs.iter().map(|a| -a).collect(), row.rhs)
        };
        LinearProgram {
            cost: self.cost.clone(),
            inequalities: self.inequalities.iter().map(negate).collect(),
            equalities: self.equalities.iter().map(negate).collect(),
        }
    }

    /// Embed into a space of `num_vars` variables: column `k` moves to
    /// column `index_map[k]`, other columns are zero. Columns mapped to the
    /// same target are summed. The cost vector is dropped since it lives in
    /// the old space.
    ///
    /// # Panics
    ///
    /// Panics if `index_map` is shorter than the program's rows or points
    /// outside `0..num_vars`.
    pub fn remap(&self, num_vars: usize, index_map: &[usize]) -> LinearProgram {
        let scatter = |row: &Constraint| {
            let mut coeffs = vec![0.0; num_vars];
            for (k, &a) in row.coeffs.iter().enumerate() {
                coeffs[index_map[k]] += a;
            }
            Constraint::new(coeffs, row.rhs)
        };
        LinearProgram {
            cost: None,
            inequalities: self.inequalities.iter().map(scatter).collect(),
            equalities: self.equalities.iter().map(scatter).collect(),
        }
    }

    /// Solve with the default backend.
    pub fn solve(&self) -> LpStatus {
        self.solve_with(&MinilpBackend)
    }

    /// Minimize the cost over the program using `backend`.
    ///
    /// Equalities are passed to the backend as pairs of opposite
    /// inequalities. A program without rows yields `SolverFailure`; a missing
    /// cost is treated as the zero objective.
    pub fn solve_with<B: LpBackend + ?Sized>(&self, backend: &B) -> LpStatus {
        let Some(n) = self.num_vars() else {
            return LpStatus::SolverFailure;
        };
        let cost = match &self.cost {
            Some(c) if c.len() == n => c.clone(),
            Some(c) => {
                tracing::warn!(expected = n, found = c.len(), "cost vector has the wrong length");
                return LpStatus::SolverFailure;
            }
            None => vec![0.0; n],
        };

        let mut a_ub = Vec::with_capacity(self.inequalities.len() + 2 * self.equalities.len());
        let mut b_ub = Vec::with_capacity(a_ub.capacity());
        for row in &self.inequalities {
            a_ub.push(row.coeffs.clone());
            b_ub.push(row.rhs);
        }
        for row in &self.equalities {
            a_ub.push(row.coeffs.clone());
            b_ub.push(row.rhs);
            a_ub.push(row.coeffs.iter().map(|a| -a).collect());
            b_ub.push(-row.rhs);
        }

        backend.minimize(&cost, &a_ub, &b_ub)
    }

    /// [`constraint_as_cost_with`](Self::constraint_as_cost_with) on the default backend.
    pub fn constraint_as_cost(&self, other: &LinearProgram) -> LinearProgram {
        self.constraint_as_cost_with(other, &MinilpBackend)
    }

    /// Translate each inequality of `self` so it also holds on `other`.
    ///
    /// For a row `a·x ≤ b`, `a·x` is maximized over `other` and the row is
    /// kept with its normal and the larger of `b` and that maximum as
    /// right-hand side, which is valid for both polytopes. An infeasible
    /// `other` leaves the row unchanged; a row that is unbounded on `other`
    /// or for which the solver fails is dropped. The result has no equalities
    /// and no cost.
    pub fn constraint_as_cost_with<B: LpBackend + ?Sized>(
        &self,
        other: &LinearProgram,
        backend: &B,
    ) -> LinearProgram {
        let mut lp = LinearProgram::new();
        for row in &self.inequalities {
            let max_cost: Vec<f64> = row.coeffs.iter().map(|a| -a).collect();
            match other.clone().with_cost(max_cost).solve_with(backend) {
                LpStatus::Optimal(sol) => {
                    let max_other = -sol.objective;
                    lp.push_inequality(row.coeffs.clone(), row.rhs.max(max_other));
                }
                LpStatus::Infeasible => {
                    lp.push_inequality(row.coeffs.clone(), row.rhs);
                }
                status => {
                    tracing::trace!(?status, "no bound for row on the other polytope; dropped");
                }
            }
        }
        lp
    }

    /// [`union_with`](Self::union_with) on the default backend.
    pub fn union(&self, other: &LinearProgram) -> LinearProgram {
        self.union_with(other, &MinilpBackend)
    }

    /// Outer linear relaxation of the union of two polytopes.
    ///
    /// Each operand's inequalities are translated to cover the other
    /// operand; equalities of both operands are kept verbatim, so they must
    /// be shared by both (for example pinned terminal voltages). The result
    /// contains both feasible regions but is generally looser than their
    /// convex hull.
    pub fn union_with<B: LpBackend + ?Sized>(
        &self,
        other: &LinearProgram,
        backend: &B,
    ) -> LinearProgram {
        let mut lp = self
            .constraint_as_cost_with(other, backend)
            .concat(&other.constraint_as_cost_with(self, backend));
        for row in self.equalities.iter().chain(&other.equalities) {
            lp.push_equality(row.coeffs.clone(), row.rhs);
        }
        lp
    }

    /// Slack `b - A x*` of every inequality at the optimum found with the
    /// default backend.
    pub fn slack(&self) -> Result<Vec<f64>> {
        self.slack_with(&MinilpBackend)
    }

    /// Slack `b - A x*` of every inequality at the optimum found by `backend`.
    pub fn slack_with<B: LpBackend + ?Sized>(&self, backend: &B) -> Result<Vec<f64>> {
        match self.solve_with(backend) {
            LpStatus::Optimal(sol) => Ok(self
                .inequalities
                .iter()
                .map(|row| row.rhs - row.lhs(&sol.x))
                .collect()),
            LpStatus::Infeasible => Err(PruneError::Infeasible {
                context: "slack".to_string(),
            }),
            status => Err(PruneError::SolverFailure {
                message: format!("slack: no optimum ({status:?})"),
            }),
        }
    }

    /// Check that `x` satisfies every row up to `tolerance`.
    pub fn is_satisfied_by(&self, x: &[f64], tolerance: f64) -> bool {
        self.inequalities
            .iter()
            .all(|row| row.lhs(x) <= row.rhs + tolerance)
            && self
                .equalities
                .iter()
                .all(|row| (row.lhs(x) - row.rhs).abs() <= tolerance)
    }
}

impl fmt::Display for LinearProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |f: &mut fmt::Formatter<'_>, c: &Constraint, op: &str| {
            let coeffs: Vec<String> = c.coeffs.iter().map(|a| format!("{a:>10.4e}")).collect();
            writeln!(f, "  [{}] {op} {:.6e}", coeffs.join(" "), c.rhs)
        };
        writeln!(f, "inequalities ({}):", self.inequalities.len())?;
        for c in &self.inequalities {
            row(f, c, "<=")?;
        }
        writeln!(f, "equalities ({}):", self.equalities.len())?;
        for c in &self.equalities {
            row(f, c, "==")?;
        }
        match &self.cost {
            Some(c) => writeln!(f, "cost: {c:?}"),
            None => writeln!(f, "cost: none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Axis-aligned box `lo <= x <= hi` in `lo.len()` dimensions.
    fn boxed(lo: &[f64], hi: &[f64]) -> LinearProgram {
        let n = lo.len();
        let mut lp = LinearProgram::new();
        for i in 0..n {
            let mut row = vec![0.0; n];
            row[i] = -1.0;
            lp.push_inequality(row.clone(), -lo[i]);
            row[i] = 1.0;
            lp.push_inequality(row, hi[i]);
        }
        lp
    }

    #[test]
    fn test_concat_keeps_receiver_cost() {
        let a = boxed(&[0.0], &[1.0]).with_cost(vec![1.0]);
        let b = boxed(&[0.5], &[2.0]).with_cost(vec![-1.0]);
        let c = a.concat(&b);
        assert_eq!(c.num_constraints(), 4);
        assert_eq!(c.cost(), Some(&[1.0][..]));
        // operands are untouched
        assert_eq!(a.num_constraints(), 2);
        match c.solve() {
            LpStatus::Optimal(sol) => assert_abs_diff_eq!(sol.x[0], 0.5, epsilon = 1e-9),
            other => panic!("expected optimum, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "cannot concatenate")]
    fn test_concat_width_mismatch_panics() {
        let a = boxed(&[0.0], &[1.0]);
        let b = boxed(&[0.0, 0.0], &[1.0, 1.0]);
        let _ = a.concat(&b);
    }

    #[test]
    fn test_negate_and_remap() {
        let mut lp = LinearProgram::new();
        lp.push_inequality(vec![1.0, 2.0], 3.0);
        lp.push_equality(vec![0.0, 1.0], 1.0);

        let neg = lp.negate_coefficients();
        assert_eq!(neg.inequalities()[0].coeffs, vec![-1.0, -2.0]);
        assert_eq!(neg.inequalities()[0].rhs, 3.0);
        assert_eq!(neg.equalities()[0].coeffs, vec![0.0, -1.0]);

        let wide = lp.remap(4, &[3, 1]);
        assert_eq!(wide.num_vars(), Some(4));
        assert_eq!(wide.inequalities()[0].coeffs, vec![0.0, 2.0, 0.0, 1.0]);
        assert_eq!(wide.equalities()[0].coeffs, vec![0.0, 1.0, 0.0, 0.0]);

        // two columns landing on the same variable are summed
        let merged = lp.remap(2, &[0, 0]);
        assert_eq!(merged.inequalities()[0].coeffs, vec![3.0, 0.0]);
    }

    #[test]
    fn test_solve_empty_program_fails() {
        assert_eq!(LinearProgram::new().solve(), LpStatus::SolverFailure);
    }

    #[test]
    fn test_half_open_program_is_unbounded() {
        // x >= 0 only, maximize x
        let lp = LinearProgram::from_rows(vec![Constraint::new(vec![-1.0], 0.0)], Vec::new());
        assert_eq!(lp.clone().with_cost(vec![-1.0]).solve(), LpStatus::Unbounded);

        // x <= 1 cannot be carried over to a polytope without an upper bound on x
        let capped = LinearProgram::from_rows(vec![Constraint::new(vec![1.0], 1.0)], Vec::new());
        assert_eq!(capped.constraint_as_cost(&lp).num_constraints(), 0);
    }

    #[test]
    fn test_equalities_are_enforced() {
        let mut lp = boxed(&[-5.0, -5.0], &[5.0, 5.0]);
        lp.push_equality(vec![1.0, 1.0], 1.0);
        let lp = lp.with_cost(vec![1.0, 0.0]);
        let sol = match lp.solve() {
            LpStatus::Optimal(sol) => sol,
            other => panic!("expected optimum, got {other:?}"),
        };
        assert_abs_diff_eq!(sol.x[0], -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.x[1], 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constraint_as_cost_translates_rows() {
        let p = boxed(&[0.0, 0.0], &[1.0, 1.0]);
        let q = boxed(&[2.0, -1.0], &[3.0, 0.5]);
        let derived = p.constraint_as_cost(&q);
        assert_eq!(derived.num_constraints(), 4);
        assert!(derived.equalities().is_empty());
        // -x <= 0 stays, x <= 1 becomes x <= 3, -y <= 0 becomes -y <= 1, y <= 1 stays
        let rhs: Vec<f64> = derived.inequalities().iter().map(|r| r.rhs).collect();
        assert_abs_diff_eq!(rhs[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rhs[1], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rhs[2], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rhs[3], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_union_contains_both_operands() {
        // A triangle and a disjoint box
        let mut p = LinearProgram::new();
        p.push_inequality(vec![-1.0, 0.0], 0.0);
        p.push_inequality(vec![0.0, -1.0], 0.0);
        p.push_inequality(vec![1.0, 1.0], 1.0);
        let q = boxed(&[2.0, 2.0], &[3.0, 2.5]);
        let u = p.union(&q);

        let p_points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.25, 0.5], [0.5, 0.5]];
        let q_points = [[2.0, 2.0], [3.0, 2.5], [2.0, 2.5], [3.0, 2.0], [2.7, 2.1]];
        for x in p_points.iter().chain(&q_points) {
            assert!(p.is_satisfied_by(x, 1e-9) || q.is_satisfied_by(x, 1e-9));
            assert!(u.is_satisfied_by(x, 1e-7), "union misses {x:?}");
        }
        // still bounded: far-away point excluded
        assert!(!u.is_satisfied_by(&[10.0, 10.0], 1e-7));
    }

    #[test]
    fn test_union_with_infeasible_keeps_rows() {
        let p = boxed(&[0.0], &[1.0]);
        let q = boxed(&[2.0], &[1.0]); // empty
        let u = p.union(&q);
        assert!(u.is_satisfied_by(&[0.0], 1e-9));
        assert!(u.is_satisfied_by(&[1.0], 1e-9));
        assert!(!u.is_satisfied_by(&[1.5], 1e-9));
    }

    #[test]
    fn test_union_keeps_equalities() {
        let mut p = boxed(&[0.0, 0.0], &[1.0, 1.0]);
        p.push_equality(vec![0.0, 1.0], 0.5);
        let mut q = boxed(&[2.0, 0.0], &[3.0, 1.0]);
        q.push_equality(vec![0.0, 1.0], 0.5);
        let u = p.union(&q);
        assert_eq!(u.equalities().len(), 2);
        assert!(u.is_satisfied_by(&[2.5, 0.5], 1e-7));
        assert!(u.is_satisfied_by(&[0.5, 0.5], 1e-7));
    }

    #[test]
    fn test_slack() {
        let lp = boxed(&[0.0], &[2.0]).with_cost(vec![1.0]);
        let slack = lp.slack().unwrap();
        assert_abs_diff_eq!(slack[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(slack[1], 2.0, epsilon = 1e-9);

        let empty = boxed(&[3.0], &[2.0]).with_cost(vec![1.0]);
        assert!(matches!(empty.slack(), Err(PruneError::Infeasible { .. })));
    }
}
