//! Analysis report structures.
//!
//! The top-level records handed to dashboards, plugins and plotting tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use qlens_ir::{Circuit, GraphExport};

use crate::compare::ComparisonRecord;
use crate::features::FeatureVector;
use crate::rules::{Alert, Severity};

/// Schema version for forward compatibility.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Identity of the analysed circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitSummary {
    /// Circuit name.
    pub name: String,
    /// Declared qubit count.
    pub num_qubits: usize,
    /// Number of gate operations.
    pub num_gates: usize,
}

impl From<&Circuit> for CircuitSummary {
    fn from(circuit: &Circuit) -> Self {
        Self {
            name: circuit.name().to_string(),
            num_qubits: circuit.num_qubits(),
            num_gates: circuit.num_gates(),
        }
    }
}

/// Complete analysis of one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Timestamp of the analysis.
    pub timestamp: DateTime<Utc>,
    /// Circuit identity.
    pub circuit: CircuitSummary,
    /// Extracted features.
    pub features: FeatureVector,
    /// Gate positions along one longest dependency chain.
    pub critical_path: Vec<usize>,
    /// Alerts in rule order.
    pub alerts: Vec<Alert>,
    /// Dependency graph, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphExport>,
}

impl AnalysisReport {
    /// Highest severity among the alerts.
    pub fn max_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|a| a.severity).max()
    }

    /// Whether any rule fired.
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}

/// Comparison of one logical circuit across backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Timestamp of the comparison.
    pub timestamp: DateTime<Utc>,
    /// Features and scores per backend.
    pub comparison: ComparisonRecord,
    /// Backend identifiers, best first.
    pub ranking: Vec<String>,
    /// Alerts per backend, in rule order.
    pub alerts: BTreeMap<String, Vec<Alert>>,
}

impl ComparisonReport {
    /// Identifier of the best-scoring backend.
    pub fn best(&self) -> Option<&str> {
        self.ranking.first().map(String::as_str)
    }
}
