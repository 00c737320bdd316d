//! Serializable circuit descriptions.
//!
//! A description is the plain-data form in which circuit-generation tools
//! hand circuits over:
//!
//! ```json
//! {
//!   "name": "ghz",
//!   "num_qubits": 3,
//!   "gates": [
//!     { "gate": "h",  "qubits": [0] },
//!     { "gate": "cx", "qubits": [0, 1] },
//!     { "gate": "cx", "qubits": [1, 2] }
//!   ]
//! }
//! ```
//!
//! `position` may be given per gate; when present it must be dense.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::IrResult;
use crate::gate::{GateKind, GateOp};
use crate::qubit::QubitId;

/// One gate entry of a [`CircuitDescription`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateDescription {
    /// Gate type tag.
    pub gate: GateKind,
    /// Operand qubits.
    pub qubits: Vec<QubitId>,
    /// Explicit sequence position. Defaults to the list index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Plain-data description of a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitDescription {
    /// Optional circuit name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared number of qubits.
    pub num_qubits: u32,
    /// Gate list in sequence order.
    pub gates: Vec<GateDescription>,
}

impl CircuitDescription {
    /// Decode a JSON description.
    pub fn from_json(source: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Decode a YAML description.
    pub fn from_yaml(source: &str) -> IrResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into a [`Circuit`].
    ///
    /// Validation matches [`Circuit::from_ops`]: an empty gate list fails
    /// with [`InvalidCircuit::Empty`](crate::error::InvalidCircuit::Empty).
    pub fn into_circuit(self) -> IrResult<Circuit> {
        let ops = self
            .gates
            .into_iter()
            .enumerate()
            .map(|(index, g)| GateOp::new(g.gate, g.qubits, g.position.unwrap_or(index)))
            .collect();
        let circuit = Circuit::from_gate_ops(self.num_qubits, ops)?;

        Ok(match self.name {
            Some(name) => circuit.named(name),
            None => circuit,
        })
    }
}

impl Circuit {
    /// Convert back to the plain-data description form.
    pub fn to_description(&self) -> CircuitDescription {
        CircuitDescription {
            name: Some(self.name().to_string()),
            num_qubits: self.num_qubits() as u32,
            gates: self
                .iter()
                .map(|op| GateDescription {
                    gate: op.kind().clone(),
                    qubits: op.qubits().to_vec(),
                    position: Some(op.position()),
                })
                .collect(),
        }
    }
}
