//! Gate type tags and circuit instructions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::qubit::QubitId;

/// Well-known gate tags with a canonical name and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardGate {
    // Single-qubit gates
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Universal single-qubit gate.
    U,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled phase gate.
    CP,
    /// Controlled rotation around X.
    CRx,
    /// Controlled rotation around Y.
    CRy,
    /// Controlled rotation around Z.
    CRz,
    /// XX rotation gate.
    RXX,
    /// YY rotation gate.
    RYY,
    /// ZZ rotation gate.
    RZZ,

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,

    // Non-unitary operations
    /// Measurement in the computational basis.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Scheduling barrier over any number of qubits.
    Barrier,
}

impl StandardGate {
    /// Every standard gate, in declaration order.
    pub const ALL: [StandardGate; 32] = [
        StandardGate::H,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::S,
        StandardGate::Sdg,
        StandardGate::T,
        StandardGate::Tdg,
        StandardGate::SX,
        StandardGate::Rx,
        StandardGate::Ry,
        StandardGate::Rz,
        StandardGate::P,
        StandardGate::U,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::CH,
        StandardGate::Swap,
        StandardGate::ISwap,
        StandardGate::CP,
        StandardGate::CRx,
        StandardGate::CRy,
        StandardGate::CRz,
        StandardGate::RXX,
        StandardGate::RYY,
        StandardGate::RZZ,
        StandardGate::CCX,
        StandardGate::CSwap,
        StandardGate::Measure,
        StandardGate::Reset,
        StandardGate::Barrier,
    ];

    /// Get the canonical name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx => "rx",
            StandardGate::Ry => "ry",
            StandardGate::Rz => "rz",
            StandardGate::P => "p",
            StandardGate::U => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CP => "cp",
            StandardGate::CRx => "crx",
            StandardGate::CRy => "cry",
            StandardGate::CRz => "crz",
            StandardGate::RXX => "rxx",
            StandardGate::RYY => "ryy",
            StandardGate::RZZ => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
            StandardGate::Measure => "measure",
            StandardGate::Reset => "reset",
            StandardGate::Barrier => "barrier",
        }
    }

    /// Get the fixed number of qubits this gate operates on.
    ///
    /// Returns `None` for variadic operations (barrier).
    #[inline]
    pub fn num_qubits(self) -> Option<u32> {
        match self {
            StandardGate::H
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::Rx
            | StandardGate::Ry
            | StandardGate::Rz
            | StandardGate::P
            | StandardGate::U
            | StandardGate::Measure
            | StandardGate::Reset => Some(1),

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CP
            | StandardGate::CRx
            | StandardGate::CRy
            | StandardGate::CRz
            | StandardGate::RXX
            | StandardGate::RYY
            | StandardGate::RZZ => Some(2),

            StandardGate::CCX | StandardGate::CSwap => Some(3),

            StandardGate::Barrier => None,
        }
    }

    /// Look up a standard gate by tag, accepting common aliases.
    ///
    /// The lookup is case-insensitive.
    pub fn from_name(tag: &str) -> Option<Self> {
        let lower = tag.to_ascii_lowercase();
        let canonical = match lower.as_str() {
            "cnot" => "cx",
            "toffoli" => "ccx",
            "fredkin" => "cswap",
            "u3" => "u",
            "phase" => "p",
            "cphase" => "cp",
            "measurement" => "measure",
            other => other,
        };
        Self::ALL.into_iter().find(|g| g.name() == canonical)
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Open-set gate type tag.
///
/// Known tags resolve to [`StandardGate`]; anything else is kept verbatim
/// (lowercased) as a custom tag so that new gate kinds from any circuit
/// source can be represented.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GateKind {
    /// A standard gate with known arity.
    Standard(StandardGate),
    /// Any other tag.
    Custom(String),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(name) => name,
        }
    }

    /// Fixed arity, if the tag is a standard gate with one.
    #[inline]
    pub fn expected_arity(&self) -> Option<u32> {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(_) => None,
        }
    }

    /// Whether this tag is a [`StandardGate`].
    #[inline]
    pub fn is_standard(&self) -> bool {
        matches!(self, GateKind::Standard(_))
    }
}

impl FromStr for GateKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(GateKind::from(s))
    }
}

impl From<&str> for GateKind {
    fn from(tag: &str) -> Self {
        let tag = tag.trim();
        match StandardGate::from_name(tag) {
            Some(g) => GateKind::Standard(g),
            None => GateKind::Custom(tag.to_ascii_lowercase()),
        }
    }
}

impl From<String> for GateKind {
    fn from(tag: String) -> Self {
        GateKind::from(tag.as_str())
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for GateKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for GateKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(GateKind::from(tag))
    }
}

/// One circuit instruction: a gate tag applied to ordered operand qubits.
///
/// A `GateOp` records its own sequence position inside the owning circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateOp {
    kind: GateKind,
    qubits: Vec<QubitId>,
    position: usize,
}

impl GateOp {
    /// Create a gate operation at the given sequence position.
    pub fn new(
        kind: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
        position: usize,
    ) -> Self {
        Self {
            kind: kind.into(),
            qubits: qubits.into_iter().collect(),
            position,
        }
    }

    /// The gate type tag.
    #[inline]
    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    /// The gate name.
    #[inline]
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Operand qubits, in order.
    #[inline]
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Index within the circuit's instruction list.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of operand qubits.
    #[inline]
    pub fn arity(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the gate acts on exactly two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.arity() == 2
    }

    /// Whether the gate acts on two or more qubits.
    #[inline]
    pub fn is_multi_qubit(&self) -> bool {
        self.arity() >= 2
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        for (i, q) in self.qubits.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{q}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), Some(1));
        assert_eq!(StandardGate::CX.num_qubits(), Some(2));
        assert_eq!(StandardGate::CCX.num_qubits(), Some(3));
        assert_eq!(StandardGate::Barrier.num_qubits(), None);
    }

    #[test]
    fn test_names_round_trip() {
        for gate in StandardGate::ALL {
            assert_eq!(StandardGate::from_name(gate.name()), Some(gate));
        }
    }

    #[test]
    fn test_tag_aliases_and_case() {
        assert_eq!(GateKind::from("CX"), GateKind::Standard(StandardGate::CX));
        assert_eq!(GateKind::from("cnot"), GateKind::Standard(StandardGate::CX));
        assert_eq!(GateKind::from("Toffoli"), GateKind::Standard(StandardGate::CCX));
        assert_eq!(GateKind::from(" H "), GateKind::Standard(StandardGate::H));
    }

    #[test]
    fn test_unknown_tag_is_custom() {
        let kind = GateKind::from("MyEntangler");
        assert_eq!(kind, GateKind::Custom("myentangler".into()));
        assert_eq!(kind.expected_arity(), None);
        assert!(!kind.is_standard());
    }

    #[test]
    fn test_gate_op_display() {
        let op = GateOp::new("cx", [QubitId(0), QubitId(1)], 1);
        assert_eq!(op.to_string(), "cx q0, q1");
        assert!(op.is_two_qubit());
        assert!(op.is_multi_qubit());
        assert_eq!(op.position(), 1);
    }

    #[test]
    fn test_gate_kind_serde_as_string() {
        let json = serde_json::to_string(&GateKind::Standard(StandardGate::CX)).unwrap();
        assert_eq!(json, "\"cx\"");
        let kind: GateKind = serde_json::from_str("\"CNOT\"").unwrap();
        assert_eq!(kind, GateKind::Standard(StandardGate::CX));
    }
}
