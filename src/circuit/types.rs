//! Core types for circuit representation.

use std::fmt;

/// A unique identifier for a node in the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Ground node of circuits built by [`Circuit::inverter_ring`](super::Circuit::inverter_ring).
    pub const GROUND: NodeId = NodeId(0);

    /// Supply node of circuits built by [`Circuit::inverter_ring`](super::Circuit::inverter_ring).
    pub const SUPPLY: NodeId = NodeId(1);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A unique identifier for a device in the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Variable index in the circuit LP.
/// Can be either a node voltage or a device current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarIndex {
    /// Node voltage variable
    Voltage(NodeId),
    /// Drain current of a device
    Current(DeviceId),
}

impl VarIndex {
    /// Get the raw column in the LP variable vector.
    /// Node voltages come first, then device currents.
    pub fn to_index(&self, num_nodes: usize) -> usize {
        match self {
            VarIndex::Voltage(NodeId(n)) => *n,
            VarIndex::Current(DeviceId(d)) => num_nodes + d,
        }
    }
}
