//! Error types for the IR crate.

use thiserror::Error;

use crate::qubit::QubitId;

/// Reasons a circuit fails construction-time validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidCircuit {
    /// The instruction list is empty.
    #[error("instruction list is empty")]
    Empty,

    /// An operand qubit is not below the declared qubit count.
    #[error(
        "qubit {qubit} out of range for {num_qubits}-qubit circuit (gate '{gate_name}' at position {position})"
    )]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Declared qubit count of the circuit.
        num_qubits: u32,
        /// Gate tag for context.
        gate_name: String,
        /// Sequence position of the gate.
        position: usize,
    },

    /// Sequence positions are not exactly `0..n`.
    #[error("expected sequence position {expected}, found {found}")]
    NonDensePosition {
        /// The position required at this index.
        expected: usize,
        /// The position actually supplied.
        found: usize,
    },

    /// A gate was given no operand qubits.
    #[error("gate '{gate_name}' at position {position} has no operand qubits")]
    NoOperands {
        /// Gate tag for context.
        gate_name: String,
        /// Sequence position of the gate.
        position: usize,
    },

    /// The same qubit appears twice in one gate.
    #[error("duplicate qubit {qubit} in gate '{gate_name}' at position {position}")]
    DuplicateQubit {
        /// The duplicated qubit.
        qubit: QubitId,
        /// Gate tag for context.
        gate_name: String,
        /// Sequence position of the gate.
        position: usize,
    },

    /// A standard gate was applied to the wrong number of qubits.
    #[error("gate '{gate_name}' at position {position} requires {expected} qubits, got {got}")]
    ArityMismatch {
        /// Gate tag.
        gate_name: String,
        /// Sequence position of the gate.
        position: usize,
        /// Arity of the standard gate.
        expected: u32,
        /// Number of operands supplied.
        got: u32,
    },
}

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Malformed circuit construction input.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(#[from] InvalidCircuit),

    /// A circuit description could not be decoded.
    #[error("Invalid circuit description: {0}")]
    Description(String),

    /// The dependency graph is not a DAG.
    #[error("Invalid dependency graph: {0}")]
    InvalidGraph(String),
}

impl From<serde_json::Error> for IrError {
    fn from(e: serde_json::Error) -> Self {
        IrError::Description(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for IrError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        IrError::Description(e.to_string())
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
