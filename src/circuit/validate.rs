//! Circuit validation.

use crate::components::Channel;
use crate::error::{PruneError, Result};

use super::Circuit;

/// Validate a circuit for relaxation.
///
/// Checks:
/// - The circuit has at least one device
/// - Every node index below the node count is used by a device
/// - Model parameters are finite, follow the sign convention of their
///   channel (`k > 0` for n-type, `k < 0` for p-type) and have non-negative
///   leakage
/// - Shape factors are positive
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.devices().is_empty() {
        return Err(PruneError::EmptyCircuit);
    }

    let mut used = vec![false; circuit.num_nodes()];
    for device in circuit.devices() {
        for node in device.nodes {
            used[node.0] = true;
        }
    }
    if let Some(node) = used.iter().position(|u| !u) {
        return Err(PruneError::UnusedNode { node });
    }

    for (i, device) in circuit.devices().iter().enumerate() {
        let m = &device.model;
        if !(m.vt.is_finite() && m.k.is_finite() && m.gds.is_finite()) {
            return Err(PruneError::invalid_model(i, "parameters must be finite"));
        }
        match m.channel {
            Channel::N if m.k <= 0.0 => {
                return Err(PruneError::invalid_model(i, "n-type devices need k > 0"));
            }
            Channel::P if m.k >= 0.0 => {
                return Err(PruneError::invalid_model(i, "p-type devices need k < 0"));
            }
            _ => {}
        }
        if m.gds < 0.0 {
            return Err(PruneError::invalid_model(i, "leakage must be non-negative"));
        }
        if !(device.shape.is_finite() && device.shape > 0.0) {
            return Err(PruneError::invalid_model(i, "shape must be positive"));
        }
    }

    Ok(())
}
