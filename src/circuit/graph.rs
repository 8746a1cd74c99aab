//! Circuit graph structure.

use super::types::{DeviceId, NodeId, VarIndex};
use super::validate::validate_circuit;
use crate::components::{Mosfet, MosfetModel};
use crate::error::{PruneError, Result};
use crate::interval::Value;

/// A transistor netlist over nodes `0..num_nodes`.
#[derive(Debug, Clone)]
pub struct Circuit {
    devices: Vec<Mosfet>,
    num_nodes: usize,
}

impl Circuit {
    /// Build a circuit from its devices.
    ///
    /// The node count is one more than the largest node index used. Every
    /// node in between must be attached to some device and every model must
    /// follow the sign convention of its channel.
    pub fn new(devices: Vec<Mosfet>) -> Result<Self> {
        let num_nodes = devices
            .iter()
            .flat_map(|d| d.nodes)
            .map(|n| n.0 + 1)
            .max()
            .unwrap_or(0);
        let circuit = Self { devices, num_nodes };
        validate_circuit(&circuit)?;
        Ok(circuit)
    }

    /// A ring of `stages` inverters.
    ///
    /// Node 0 is ground, node 1 the supply and nodes `2..2 + stages` the ring.
    /// Stage `i` drives node `2 + (i + 1) % stages` from node `2 + i` with an
    /// n-type device to ground and a p-type device to the supply.
    pub fn inverter_ring(
        stages: usize,
        nfet: MosfetModel,
        pfet: MosfetModel,
        shape: f64,
    ) -> Result<Self> {
        if stages == 0 {
            return Err(PruneError::EmptyCircuit);
        }
        let ring = |i: usize| NodeId(2 + i % stages);
        let devices = (0..stages)
            .flat_map(|i| {
                let (input, output) = (ring(i), ring(i + 1));
                [
                    Mosfet::new(NodeId::GROUND, input, output, nfet).with_shape(shape),
                    Mosfet::new(NodeId::SUPPLY, input, output, pfet).with_shape(shape),
                ]
            })
            .collect();
        Self::new(devices)
    }

    /// Get the devices.
    pub fn devices(&self) -> &[Mosfet] {
        &self.devices
    }

    /// Get a device by ID.
    pub fn device(&self, id: DeviceId) -> Option<&Mosfet> {
        self.devices.get(id.0)
    }

    /// Get the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Get the number of devices.
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Number of LP variables: one voltage per node, one current per device.
    pub fn num_vars(&self) -> usize {
        self.num_nodes + self.devices.len()
    }

    /// LP column of a voltage or current variable.
    pub fn var_index(&self, var: VarIndex) -> usize {
        var.to_index(self.num_nodes)
    }

    /// Net current into each node: every device adds its drain current at
    /// the source and removes it at the drain.
    pub fn node_currents(&self, v: &[Value]) -> Result<Vec<Value>> {
        self.check_len(v)?;
        let mut currents = vec![Value::Scalar(0.0); self.num_nodes];
        for device in &self.devices {
            let ids = device.ids(v);
            currents[device.source().0] = currents[device.source().0] + ids;
            currents[device.drain().0] = currents[device.drain().0] - ids;
        }
        Ok(currents)
    }

    /// Derivative of [`node_currents`](Self::node_currents) with respect to
    /// every node voltage, indexed `[node][voltage]`.
    pub fn jacobian(&self, v: &[Value]) -> Result<Vec<Vec<Value>>> {
        self.check_len(v)?;
        let n = self.num_nodes;
        let mut jac = vec![vec![Value::Scalar(0.0); n]; n];
        for device in &self.devices {
            let grad = device.grad_ids(v);
            let (s, d) = (device.source().0, device.drain().0);
            for (terminal, g) in device.nodes.iter().zip(grad) {
                jac[s][terminal.0] = jac[s][terminal.0] + g;
                jac[d][terminal.0] = jac[d][terminal.0] - g;
            }
        }
        Ok(jac)
    }

    fn check_len(&self, v: &[Value]) -> Result<()> {
        if v.len() != self.num_nodes {
            return Err(PruneError::dimension("node voltages", self.num_nodes, v.len()));
        }
        Ok(())
    }
}
