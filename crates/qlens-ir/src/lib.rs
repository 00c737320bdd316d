//! qlens Circuit Model
//!
//! SDK-independent representation of quantum circuits and the gate
//! dependency graph derived from them. This crate is the leaf of the qlens
//! analysis stack: feature extraction, rule evaluation and backend
//! comparison (in `qlens-eval`) all read circuits through it.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`], an opaque register-line index
//! - **Gates**: [`GateKind`], an open tag set with [`StandardGate`] for
//!   well-known gates; [`GateOp`] pairs a tag with its operands
//! - **Circuit**: [`Circuit`], a validated, immutable instruction list,
//!   plus [`CircuitBuilder`] for fluent construction
//! - **Descriptions**: [`CircuitDescription`], the JSON/YAML hand-off form
//! - **Dependency graph**: [`DependencyGraph`], direct gate-to-gate data
//!   dependencies with critical-path queries
//!
//! # Example: GHZ dependency chain
//!
//! ```rust
//! use qlens_ir::{Circuit, DependencyGraph};
//!
//! let circuit = Circuit::from_ops(3, [
//!     ("h", vec![0u32]),
//!     ("cx", vec![0, 1]),
//!     ("cx", vec![1, 2]),
//! ]).unwrap();
//!
//! let dag = DependencyGraph::build(&circuit);
//! assert_eq!(dag.edge_list(), vec![(0, 1), (1, 2)]);
//! assert_eq!(dag.depth(), 3);
//! ```
//!
//! # Example: Rejecting malformed input
//!
//! ```rust
//! use qlens_ir::{Circuit, IrError};
//!
//! // Qubit index 2 is out of range for a 2-qubit circuit.
//! let err = Circuit::from_ops(2, [("cx", vec![0u32, 2])]).unwrap_err();
//! assert!(matches!(err, IrError::InvalidCircuit(_)));
//! ```

pub mod circuit;
pub mod dag;
pub mod description;
pub mod error;
pub mod gate;
pub mod qubit;

pub use circuit::{Circuit, CircuitBuilder};
pub use dag::{DependencyEdge, DependencyGraph, DependencyNode, EdgeExport, GraphExport};
pub use description::{CircuitDescription, GateDescription};
pub use error::{InvalidCircuit, IrError, IrResult};
pub use gate::{GateKind, GateOp, StandardGate};
pub use qubit::QubitId;
