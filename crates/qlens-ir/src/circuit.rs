//! Validated, immutable circuit model.

use rustc_hash::FxHashSet;

use crate::error::{InvalidCircuit, IrResult};
use crate::gate::{GateKind, GateOp, StandardGate};
use crate::qubit::QubitId;

/// A quantum circuit: a qubit count plus an ordered list of gate operations.
///
/// Circuits are value objects. Every constructor validates that operand
/// qubits are in range and that sequence positions are dense, and no
/// mutation is exposed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Declared number of qubits.
    num_qubits: u32,
    /// Instructions in sequence order; `ops[i].position() == i`.
    ops: Vec<GateOp>,
}

impl Circuit {
    /// Build a circuit from an ordered list of `(gate tag, operand qubits)` pairs.
    ///
    /// Sequence positions are assigned densely in list order. Fails with
    /// [`InvalidCircuit::Empty`] when the list is empty; use
    /// [`Circuit::empty`] for a deliberate zero-gate circuit.
    pub fn from_ops<K, Q>(num_qubits: u32, ops: impl IntoIterator<Item = (K, Q)>) -> IrResult<Self>
    where
        K: Into<GateKind>,
        Q: IntoIterator,
        Q::Item: Into<QubitId>,
    {
        let ops = ops
            .into_iter()
            .enumerate()
            .map(|(position, (kind, qubits))| {
                GateOp::new(kind, qubits.into_iter().map(Into::into), position)
            })
            .collect();
        Self::from_gate_ops(num_qubits, ops)
    }

    /// Build a circuit from gate operations that carry their own positions.
    pub fn from_gate_ops(num_qubits: u32, ops: Vec<GateOp>) -> IrResult<Self> {
        validate(num_qubits, &ops)?;
        Ok(Self {
            name: "circuit".into(),
            num_qubits,
            ops,
        })
    }

    /// A circuit with no instructions.
    pub fn empty(num_qubits: u32) -> Self {
        Self {
            name: "empty".into(),
            num_qubits,
            ops: vec![],
        }
    }

    /// Return the same circuit under a different name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of gate operations.
    pub fn num_gates(&self) -> usize {
        self.ops.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Gate operations in sequence order.
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    /// Iterate over gate operations in sequence order.
    ///
    /// Each call starts a fresh iteration over the same order.
    pub fn iter(&self) -> std::slice::Iter<'_, GateOp> {
        self.ops.iter()
    }

    /// Get the gate at a sequence position.
    pub fn get(&self, position: usize) -> Option<&GateOp> {
        self.ops.get(position)
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with terminal measurements.
    pub fn bell() -> IrResult<Self> {
        CircuitBuilder::new("bell", 2)
            .h(0)
            .cx(0, 1)
            .measure(0)
            .measure(1)
            .build()
    }

    /// Create an `n`-qubit GHZ preparation: H on qubit 0 followed by a CX chain.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::empty(0).named("ghz_0"));
        }

        let mut builder = CircuitBuilder::new("ghz", n);
        builder.h(0);
        for i in 0..n - 1 {
            builder.cx(i, i + 1);
        }
        builder.build()
    }

    /// Create a QFT circuit (without measurements).
    pub fn qft(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::empty(0).named("qft_0"));
        }

        let mut builder = CircuitBuilder::new("qft", n);
        for i in 0..n {
            builder.h(i);
            for j in (i + 1)..n {
                builder.gate(StandardGate::CP, [j, i]);
            }
        }
        for i in 0..n / 2 {
            builder.swap(i, n - 1 - i);
        }
        builder.build()
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a GateOp;
    type IntoIter = std::slice::Iter<'a, GateOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

fn validate(num_qubits: u32, ops: &[GateOp]) -> Result<(), InvalidCircuit> {
    if ops.is_empty() {
        return Err(InvalidCircuit::Empty);
    }

    let mut seen = FxHashSet::default();
    for (index, op) in ops.iter().enumerate() {
        if op.position() != index {
            return Err(InvalidCircuit::NonDensePosition {
                expected: index,
                found: op.position(),
            });
        }

        if op.qubits().is_empty() {
            return Err(InvalidCircuit::NoOperands {
                gate_name: op.name().to_string(),
                position: index,
            });
        }

        if let Some(expected) = op.kind().expected_arity() {
            let got = op.arity() as u32;
            if expected != got {
                return Err(InvalidCircuit::ArityMismatch {
                    gate_name: op.name().to_string(),
                    position: index,
                    expected,
                    got,
                });
            }
        }

        seen.clear();
        for &qubit in op.qubits() {
            if qubit.0 >= num_qubits {
                return Err(InvalidCircuit::QubitOutOfRange {
                    qubit,
                    num_qubits,
                    gate_name: op.name().to_string(),
                    position: index,
                });
            }
            if !seen.insert(qubit) {
                return Err(InvalidCircuit::DuplicateQubit {
                    qubit,
                    gate_name: op.name().to_string(),
                    position: index,
                });
            }
        }
    }

    Ok(())
}

/// Fluent builder for [`Circuit`].
///
/// Gates are recorded without checks; all validation happens in
/// [`CircuitBuilder::build`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    ops: Vec<GateOp>,
}

impl CircuitBuilder {
    /// Start a circuit with the given name and qubit count.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            ops: vec![],
        }
    }

    /// Append a gate with any tag.
    pub fn gate(
        &mut self,
        kind: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = u32>,
    ) -> &mut Self {
        let position = self.ops.len();
        self.ops
            .push(GateOp::new(kind, qubits.into_iter().map(QubitId), position));
        self
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: u32) -> &mut Self {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: u32) -> &mut Self {
        self.gate(StandardGate::X, [qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: u32) -> &mut Self {
        self.gate(StandardGate::T, [qubit])
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: u32, target: u32) -> &mut Self {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: u32, target: u32) -> &mut Self {
        self.gate(StandardGate::CZ, [control, target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: u32, q2: u32) -> &mut Self {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: u32, c2: u32, target: u32) -> &mut Self {
        self.gate(StandardGate::CCX, [c1, c2, target])
    }

    /// Measure a qubit.
    pub fn measure(&mut self, qubit: u32) -> &mut Self {
        self.gate(StandardGate::Measure, [qubit])
    }

    /// Validate and produce the circuit.
    pub fn build(&self) -> IrResult<Circuit> {
        Ok(Circuit::from_gate_ops(self.num_qubits, self.ops.clone())?.named(self.name.clone()))
    }
}
