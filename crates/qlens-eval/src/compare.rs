//! Comparison of one logical circuit compiled by several backends.
//!
//! The circuits are assumed to implement the same computation; that is the
//! caller's guarantee and is not checked here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use qlens_ir::Circuit;

use crate::error::{EvalError, EvalResult};
use crate::features::{self, DEPTH, FeatureVector, NUM_QUBITS, TWO_QUBIT_COUNT};

const SCORE_CONTEXT: &str = "efficiency_score";

/// Efficiency score `depth * two_qubit_count / num_qubits`; lower is better.
///
/// Defined as 0.0 when `num_qubits` is 0.
pub fn efficiency_score(features: &FeatureVector) -> EvalResult<f64> {
    let depth = features.require(DEPTH, SCORE_CONTEXT)?;
    let two_qubit = features.require(TWO_QUBIT_COUNT, SCORE_CONTEXT)?;
    let num_qubits = features.require(NUM_QUBITS, SCORE_CONTEXT)?;
    if num_qubits == 0.0 {
        Ok(0.0)
    } else {
        Ok(depth * two_qubit / num_qubits)
    }
}

/// Feature vector and score of one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEntry {
    /// Extracted features.
    pub features: FeatureVector,
    /// Efficiency score.
    pub score: f64,
}

/// Features and efficiency scores per backend for one logical circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    backends: BTreeMap<String, BackendEntry>,
}

impl ComparisonRecord {
    /// Build a record from already-extracted feature vectors.
    ///
    /// Fails with `EmptyComparison` for no input and `DuplicateBackend` when
    /// an identifier repeats.
    pub fn from_features<S: Into<String>>(
        named: impl IntoIterator<Item = (S, FeatureVector)>,
    ) -> EvalResult<Self> {
        let mut backends = BTreeMap::new();
        for (id, features) in named {
            let id: String = id.into();
            let score = efficiency_score(&features)?;
            debug!(backend = %id, score, "Scored backend");
            if backends
                .insert(id.clone(), BackendEntry { features, score })
                .is_some()
            {
                return Err(EvalError::DuplicateBackend(id));
            }
        }
        if backends.is_empty() {
            return Err(EvalError::EmptyComparison);
        }
        Ok(Self { backends })
    }

    /// Entry for a backend.
    pub fn get(&self, backend: &str) -> Option<&BackendEntry> {
        self.backends.get(backend)
    }

    /// Efficiency score of a backend.
    pub fn score(&self, backend: &str) -> Option<f64> {
        self.get(backend).map(|e| e.score)
    }

    /// Feature vector of a backend.
    pub fn features(&self, backend: &str) -> Option<&FeatureVector> {
        self.get(backend).map(|e| &e.features)
    }

    /// Backend identifiers in order.
    pub fn backends(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    /// Iterate over `(backend, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BackendEntry)> {
        self.backends.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Always false for a constructed record.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Backends ordered best first: ascending score, ties by identifier.
    pub fn ranking(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().map(|(id, e)| (id, e.score)).collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// The backend with the lowest score.
    pub fn best(&self) -> Option<(&str, f64)> {
        self.ranking().into_iter().next()
    }
}

/// Compare circuits keyed by backend identifier.
pub fn compare<'a, S: Into<String>>(
    named_circuits: impl IntoIterator<Item = (S, &'a Circuit)>,
) -> EvalResult<ComparisonRecord> {
    ComparisonRecord::from_features(
        named_circuits
            .into_iter()
            .map(|(id, circuit)| (id, features::extract(circuit))),
    )
}
