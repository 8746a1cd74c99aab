//! Whole-circuit LP assembly.

use crate::circuit::{Circuit, DeviceId, NodeId, VarIndex};
use crate::components::DeviceRelaxer;
use crate::config::PruneConfig;
use crate::error::{PruneError, Result};
use crate::interval::{Interval, Value};
use crate::lp::{LinearProgram, LpBackend, MinilpBackend};

/// Builds the circuit LP from device relaxations and current balance.
#[derive(Debug, Clone)]
pub struct CircuitAssembler<B = MinilpBackend> {
    relaxer: DeviceRelaxer<B>,
}

impl CircuitAssembler<MinilpBackend> {
    /// Create an assembler with the default margins.
    pub fn new() -> Self {
        Self::with_config(PruneConfig::default())
    }

    /// Create an assembler with custom margins.
    pub fn with_config(config: PruneConfig) -> Self {
        Self {
            relaxer: DeviceRelaxer::with_config(config),
        }
    }
}

impl Default for CircuitAssembler<MinilpBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: LpBackend> CircuitAssembler<B> {
    /// Create an assembler solving its unions with `backend`.
    pub fn with_backend(config: PruneConfig, backend: B) -> Self {
        Self {
            relaxer: DeviceRelaxer::with_backend(config, backend),
        }
    }

    /// The device relaxer (and through it, the LP backend and margins).
    pub fn relaxer(&self) -> &DeviceRelaxer<B> {
        &self.relaxer
    }

    /// Assemble the LP of `circuit` within the node bounds `bounds`.
    ///
    /// Variables are the node voltages followed by one current per device
    /// (see [`VarIndex`]). Every device relaxation is embedded at the
    /// columns of its terminals and its current. Each node not listed in
    /// `fixed` gets the band `|Σ currents| ≤ kcl_tolerance`, where a device
    /// counts `+Ids` at its source and `-Ids` at its drain.
    ///
    /// Fails on a bound list of the wrong length, an out-of-order or NaN
    /// interval bound, or a fixed node outside the circuit.
    pub fn build(
        &self,
        circuit: &Circuit,
        bounds: &[Value],
        fixed: &[NodeId],
    ) -> Result<LinearProgram> {
        let n = circuit.num_nodes();
        if bounds.len() != n {
            return Err(PruneError::dimension("node bounds", n, bounds.len()));
        }
        for bound in bounds {
            if let Value::Interval(i) = bound {
                Interval::try_new(i.lo(), i.hi())?;
            }
        }
        if let Some(node) = fixed.iter().find(|f| f.0 >= n) {
            return Err(PruneError::NodeOutOfRange {
                node: node.0,
                num_nodes: n,
            });
        }

        let num_vars = circuit.num_vars();
        let mut lp = LinearProgram::new();
        let mut balance = vec![vec![0.0; num_vars]; n];
        for (i, device) in circuit.devices().iter().enumerate() {
            let id = DeviceId(i);
            let current = circuit.var_index(VarIndex::Current(id));
            let relaxed = self.relaxer.relax_device(device, bounds)?;
            tracing::trace!(device = %id, rows = relaxed.num_constraints(), "device relaxed");

            let columns = [
                device.source().0,
                device.gate().0,
                device.drain().0,
                current,
            ];
            lp = lp.concat(&relaxed.remap(num_vars, &columns));
            balance[device.source().0][current] += 1.0;
            balance[device.drain().0][current] -= 1.0;
        }

        let tol = self.relaxer.config().kcl_tolerance;
        for (node, row) in balance.into_iter().enumerate() {
            if fixed.contains(&NodeId(node)) {
                continue;
            }
            lp.push_inequality(row.iter().map(|a| -a).collect(), tol);
            lp.push_inequality(row, tol);
        }
        tracing::debug!(vars = num_vars, rows = lp.num_constraints(), "circuit LP assembled");
        Ok(lp)
    }
}
