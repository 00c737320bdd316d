//! Feature extraction: scalar and structural circuit metrics.
//!
//! A [`FeatureVector`] maps metric names to numeric values. Every standard
//! gate tag always has a `<tag>_count` entry (0 when absent) so that rules
//! over gate counts are total; custom tags are added as they are seen.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

use qlens_ir::{Circuit, DependencyGraph, StandardGate};

use crate::error::{EvalError, EvalResult};

/// Number of gate operations.
pub const TOTAL_GATES: &str = "total_gates";
/// Declared qubit count.
pub const NUM_QUBITS: &str = "num_qubits";
/// Critical-path length of the dependency graph.
pub const DEPTH: &str = "depth";
/// Gates with exactly two operands.
pub const TWO_QUBIT_COUNT: &str = "two_qubit_count";
/// `two_qubit_count / total_gates`, 0 for an empty circuit.
pub const TWO_QUBIT_RATIO: &str = "two_qubit_ratio";
/// Gates with exactly one operand.
pub const SINGLE_QUBIT_COUNT: &str = "single_qubit_count";
/// Gates with three or more operands.
pub const MULTI_QUBIT_COUNT: &str = "multi_qubit_count";
/// Gates with two or more operands, divided by `total_gates`.
pub const MULTI_QUBIT_RATIO: &str = "multi_qubit_ratio";
/// Number of direct dependency edges.
pub const DEPENDENCY_EDGES: &str = "dependency_edges";
/// `total_gates / depth`, 0 for an empty circuit.
pub const PARALLELISM: &str = "parallelism";

/// Key of the per-type count for a gate tag.
pub fn gate_count_key(tag: &str) -> String {
    format!("{tag}_count")
}

/// Mapping from metric name to numeric value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    /// Build a vector from `(name, value)` pairs. Later pairs win.
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Value of a feature, if defined.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Whether the feature is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value of a feature required by `rule`.
    ///
    /// Fails with [`EvalError::MissingFeature`] naming both the key and the
    /// rule when the feature is not defined.
    pub fn require(&self, name: &str, rule: &str) -> EvalResult<f64> {
        self.get(name).ok_or_else(|| EvalError::MissingFeature {
            feature: name.to_string(),
            rule: rule.to_string(),
        })
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Feature names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector has no features.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

impl<'a> IntoIterator for &'a FeatureVector {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Extract the feature vector of a circuit.
///
/// Pure and deterministic: the same circuit always yields an identical vector.
pub fn extract(circuit: &Circuit) -> FeatureVector {
    let dag = DependencyGraph::build(circuit);
    extract_with_graph(circuit, &dag)
}

/// Extract features reusing an already-built dependency graph of `circuit`.
#[allow(clippy::cast_precision_loss)]
pub fn extract_with_graph(circuit: &Circuit, dag: &DependencyGraph) -> FeatureVector {
    let mut tag_counts: FxHashMap<&str, usize> = FxHashMap::default();
    let mut single = 0usize;
    let mut two = 0usize;
    let mut multi = 0usize;

    for op in circuit {
        *tag_counts.entry(op.name()).or_insert(0) += 1;
        match op.arity() {
            1 => single += 1,
            2 => two += 1,
            n if n >= 3 => multi += 1,
            _ => {}
        }
    }

    let total = circuit.num_gates();
    let depth = dag.depth();
    let ratio = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };

    let mut values = BTreeMap::new();

    for gate in StandardGate::ALL {
        values.insert(gate_count_key(gate.name()), 0.0);
    }
    for (tag, count) in tag_counts {
        values.insert(gate_count_key(tag), count as f64);
    }

    // Structural metrics are inserted last and shadow any custom tag that
    // happens to share their key.
    values.insert(TOTAL_GATES.into(), total as f64);
    values.insert(NUM_QUBITS.into(), circuit.num_qubits() as f64);
    values.insert(DEPTH.into(), depth as f64);
    values.insert(SINGLE_QUBIT_COUNT.into(), single as f64);
    values.insert(TWO_QUBIT_COUNT.into(), two as f64);
    values.insert(MULTI_QUBIT_COUNT.into(), multi as f64);
    values.insert(TWO_QUBIT_RATIO.into(), ratio(two));
    values.insert(MULTI_QUBIT_RATIO.into(), ratio(two + multi));
    values.insert(DEPENDENCY_EDGES.into(), dag.num_edges() as f64);
    values.insert(
        PARALLELISM.into(),
        if depth == 0 {
            0.0
        } else {
            total as f64 / depth as f64
        },
    );

    FeatureVector { values }
}
