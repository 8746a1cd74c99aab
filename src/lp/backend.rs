//! LP solver backends.
//!
//! The relaxation engine only ever needs one primitive: minimize `c·x`
//! subject to `A x ≤ b` over free variables. [`MinilpBackend`] provides it on
//! top of the `minilp` simplex implementation.

use std::panic::{self, AssertUnwindSafe};

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem};

/// Optimal point and objective value of a solved program.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal assignment, one entry per variable
    pub x: Vec<f64>,
    /// Objective value `c·x` at the optimum
    pub objective: f64,
}

/// Outcome of a single LP solve.
#[derive(Debug, Clone, PartialEq)]
pub enum LpStatus {
    /// An optimum was found
    Optimal(LpSolution),
    /// The constraints admit no point
    Infeasible,
    /// The objective is unbounded below
    Unbounded,
    /// The solver gave no usable answer (empty program, numerical trouble)
    SolverFailure,
}

impl LpStatus {
    /// The optimal solution, if any.
    pub fn optimal(&self) -> Option<&LpSolution> {
        match self {
            LpStatus::Optimal(sol) => Some(sol),
            _ => None,
        }
    }

    /// Check for the `Optimal` status.
    pub fn is_optimal(&self) -> bool {
        matches!(self, LpStatus::Optimal(_))
    }
}

/// A solver for `minimize c·x subject to A x ≤ b` with free variables.
pub trait LpBackend {
    /// Solve the program. Every row of `a_ub` has `cost.len()` entries.
    fn minimize(&self, cost: &[f64], a_ub: &[Vec<f64>], b_ub: &[f64]) -> LpStatus;
}

impl<B: LpBackend + ?Sized> LpBackend for &B {
    fn minimize(&self, cost: &[f64], a_ub: &[Vec<f64>], b_ub: &[f64]) -> LpStatus {
        (**self).minimize(cost, a_ub, b_ub)
    }
}

/// Dense simplex backend built on `minilp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpBackend;

impl MinilpBackend {
    /// Create a new backend.
    pub fn new() -> Self {
        Self
    }
}

impl LpBackend for MinilpBackend {
    fn minimize(&self, cost: &[f64], a_ub: &[Vec<f64>], b_ub: &[f64]) -> LpStatus {
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<_> = cost
            .iter()
            .map(|&c| problem.add_var(c, (f64::NEG_INFINITY, f64::INFINITY)))
            .collect();

        for (row, &rhs) in a_ub.iter().zip(b_ub) {
            if row.len() != vars.len() {
                tracing::warn!(
                    expected = vars.len(),
                    found = row.len(),
                    "constraint row length does not match variable count"
                );
                return LpStatus::SolverFailure;
            }
            if row.iter().all(|&a| a == 0.0) {
                // 0 ≤ rhs: either vacuous or contradictory.
                if rhs < 0.0 {
                    return LpStatus::Infeasible;
                }
                continue;
            }
            let mut expr = LinearExpr::empty();
            for (&var, &a) in vars.iter().zip(row) {
                if a != 0.0 {
                    expr.add(var, a);
                }
            }
            problem.add_constraint(expr, ComparisonOp::Le, rhs);
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| problem.solve()));
        match outcome {
            Ok(Ok(solution)) => {
                let x: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
                let objective = solution.objective();
                if objective.is_nan() || x.iter().any(|v| v.is_nan()) {
                    tracing::warn!("LP solver returned a NaN optimum");
                    LpStatus::SolverFailure
                } else if objective == f64::NEG_INFINITY || x.iter().any(|v| v.is_infinite()) {
                    // minilp reports free directions as an infinite optimum
                    LpStatus::Unbounded
                } else if objective.is_finite() {
                    LpStatus::Optimal(LpSolution { x, objective })
                } else {
                    tracing::warn!(objective, "LP solver returned a non-finite optimum");
                    LpStatus::SolverFailure
                }
            }
            Ok(Err(minilp::Error::Infeasible)) => LpStatus::Infeasible,
            Ok(Err(minilp::Error::Unbounded)) => LpStatus::Unbounded,
            Err(_) => {
                tracing::warn!("LP solver panicked; treating as solver failure");
                LpStatus::SolverFailure
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_minilp_box_optimum() {
        // minimize x - y over 0 <= x <= 1, 0 <= y <= 2
        let a = vec![
            vec![-1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, -1.0],
            vec![0.0, 1.0],
        ];
        let b = vec![0.0, 1.0, 0.0, 2.0];
        let status = MinilpBackend.minimize(&[1.0, -1.0], &a, &b);
        let sol = status.optimal().expect("box LP is feasible and bounded");
        assert_abs_diff_eq!(sol.objective, -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.x[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sol.x[1], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minilp_infeasible_and_unbounded() {
        let a = vec![vec![1.0], vec![-1.0]];
        assert_eq!(
            MinilpBackend.minimize(&[1.0], &a, &[-1.0, -1.0]),
            LpStatus::Infeasible
        );
        assert_eq!(
            MinilpBackend.minimize(&[1.0], &[vec![1.0]], &[3.0]),
            LpStatus::Unbounded
        );
    }

    #[test]
    fn test_unbounded_in_one_free_direction() {
        // minimize x - y with y <= 1 and x free below
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert_eq!(
            MinilpBackend.minimize(&[1.0, -1.0], &a, &[1.0, 0.0]),
            LpStatus::Unbounded
        );
        // the same rows with x bounded below have an optimum
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![-1.0, 0.0]];
        let status = MinilpBackend.minimize(&[1.0, -1.0], &a, &[1.0, 0.0, 2.0]);
        assert_abs_diff_eq!(status.optimal().unwrap().objective, -3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rows() {
        let a = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0], vec![0.0, -1.0]];
        let b = vec![1.0, 1.0, 1.0, 1.0, 1.0];
        assert!(MinilpBackend.minimize(&[1.0, 1.0], &a, &b).is_optimal());
        let b_bad = vec![-1.0, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(
            MinilpBackend.minimize(&[1.0, 1.0], &a, &b_bad),
            LpStatus::Infeasible
        );
    }
}
