//! LP-based node bound tightening.

use super::assemble::CircuitAssembler;
use crate::circuit::{Circuit, NodeId};
use crate::config::PruneConfig;
use crate::error::Result;
use crate::interval::Value;
use crate::lp::{LinearProgram, LpBackend, LpStatus, MinilpBackend};

/// LP solve counts of one tightening pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpCounters {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Result of [`BoundTightener::tighten`].
#[derive(Debug, Clone, PartialEq)]
pub struct TightenOutcome {
    /// False when the relaxation proves the box holds no operating point
    pub feasible: bool,
    /// Tightened node bounds, each contained in the input bound
    pub bounds: Vec<Value>,
    pub counters: LpCounters,
}

/// Shrinks node voltage bounds by minimizing and maximizing every
/// interval-valued node over the circuit LP.
#[derive(Debug, Clone)]
pub struct BoundTightener<B = MinilpBackend> {
    assembler: CircuitAssembler<B>,
}

impl BoundTightener<MinilpBackend> {
    /// Create a tightener with the default margins.
    pub fn new() -> Self {
        Self::with_config(PruneConfig::default())
    }

    /// Create a tightener with custom margins.
    pub fn with_config(config: PruneConfig) -> Self {
        Self {
            assembler: CircuitAssembler::with_config(config),
        }
    }
}

impl Default for BoundTightener<MinilpBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: LpBackend> BoundTightener<B> {
    /// Create a tightener solving every LP with `backend`.
    pub fn with_backend(config: PruneConfig, backend: B) -> Self {
        Self {
            assembler: CircuitAssembler::with_backend(config, backend),
        }
    }

    /// The assembler building the circuit programs.
    pub fn assembler(&self) -> &CircuitAssembler<B> {
        &self.assembler
    }

    /// Build the circuit LP for `bounds` and tighten against it.
    pub fn tighten(
        &self,
        circuit: &Circuit,
        bounds: &[Value],
        fixed: &[NodeId],
    ) -> Result<TightenOutcome> {
        let _span = tracing::info_span!(
            "tighten",
            nodes = circuit.num_nodes(),
            devices = circuit.num_devices()
        )
        .entered();
        let lp = self.assembler.build(circuit, bounds, fixed)?;
        Ok(self.tighten_against(&lp, bounds))
    }

    /// Tighten `bounds` using an already assembled program whose first
    /// columns are the node voltages.
    ///
    /// Each interval node is minimized and maximized. An optimum moves that
    /// side of the interval to the optimum padded outward by
    /// `tighten_pad`, never widening it. Any other outcome leaves the side
    /// unchanged, except that a node infeasible in both directions stops
    /// the pass with `feasible = false`. Without interval nodes a single
    /// feasibility solve decides the flag.
    pub fn tighten_against(&self, lp: &LinearProgram, bounds: &[Value]) -> TightenOutcome {
        let backend = self.assembler.relaxer().backend();
        let pad = self.assembler.relaxer().config().tighten_pad;
        let num_vars = lp.num_vars().unwrap_or(bounds.len());

        let mut counters = LpCounters::default();
        let mut tightened = bounds.to_vec();
        let mut any_interval = false;

        for (node, value) in bounds.iter().enumerate() {
            let Value::Interval(current) = value else {
                continue;
            };
            if node >= num_vars {
                break;
            }
            any_interval = true;

            let mut cost = vec![0.0; num_vars];
            cost[node] = 1.0;
            let lower = lp.clone().with_cost(cost.clone()).solve_with(backend);
            cost[node] = -1.0;
            let upper = lp.clone().with_cost(cost).solve_with(backend);
            counters.attempted += 2;

            if lower == LpStatus::Infeasible && upper == LpStatus::Infeasible {
                counters.succeeded += 2;
                tracing::info!(node, "relaxation is infeasible");
                return TightenOutcome {
                    feasible: false,
                    bounds: tightened,
                    counters,
                };
            }

            let mut lo = current.lo();
            let mut hi = current.hi();
            match lower {
                LpStatus::Optimal(sol) => {
                    counters.succeeded += 1;
                    lo = lo.max(sol.objective - pad);
                }
                status => {
                    counters.failed += 1;
                    tracing::debug!(node, ?status, "lower bound unchanged");
                }
            }
            match upper {
                LpStatus::Optimal(sol) => {
                    counters.succeeded += 1;
                    hi = hi.min(-sol.objective + pad);
                }
                status => {
                    counters.failed += 1;
                    tracing::debug!(node, ?status, "upper bound unchanged");
                }
            }

            if lo <= hi {
                tightened[node] = Value::interval(lo, hi);
            } else {
                tracing::warn!(node, lo, hi, "tightened bounds crossed; keeping {current}");
            }
        }

        let mut feasible = true;
        if !any_interval {
            counters.attempted += 1;
            match lp.clone().with_cost(vec![0.0; num_vars]).solve_with(backend) {
                LpStatus::Infeasible => {
                    counters.succeeded += 1;
                    feasible = false;
                }
                LpStatus::Optimal(_) => counters.succeeded += 1,
                _ => counters.failed += 1,
            }
        }

        tracing::debug!(?counters, feasible, "tightening pass done");
        TightenOutcome {
            feasible,
            bounds: tightened,
            counters,
        }
    }
}
