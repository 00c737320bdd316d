//! Analysis orchestration: graph, features, rules and report assembly.

use qlens_ir::{Circuit, DependencyGraph};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::compare;
use crate::config::AnalysisConfig;
use crate::error::EvalResult;
use crate::features::extract_with_graph;
use crate::input;
use crate::report::{AnalysisReport, CircuitSummary, ComparisonReport, SCHEMA_VERSION};
use crate::rules::RuleSet;

/// The main analyzer: holds the configuration and the resolved rule set.
///
/// Rules are read-only during analysis, so one analyzer can serve many
/// circuits concurrently.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
    rules: RuleSet,
}

impl Analyzer {
    /// Create an analyzer, resolving the rule set from the configuration.
    pub fn new(config: AnalysisConfig) -> EvalResult<Self> {
        let rules = config.rule_set()?;
        Ok(Self { config, rules })
    }

    /// Create an analyzer with an explicit rule set.
    pub fn with_rules(config: AnalysisConfig, rules: RuleSet) -> Self {
        Self { config, rules }
    }

    /// Active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Active rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Analyze one circuit.
    pub fn analyze(&self, circuit: &Circuit) -> EvalResult<AnalysisReport> {
        self.analyze_with_graph(circuit, &DependencyGraph::build(circuit))
    }

    /// Analyze a circuit whose dependency graph the caller already built.
    pub fn analyze_with_graph(
        &self,
        circuit: &Circuit,
        dag: &DependencyGraph,
    ) -> EvalResult<AnalysisReport> {
        info!("Analyzing circuit '{}'", circuit.name());

        let features = extract_with_graph(circuit, dag);

        info!(
            "Features: {} qubits, {} gates, depth {}",
            circuit.num_qubits(),
            circuit.num_gates(),
            dag.depth(),
        );

        let alerts = self.rules.evaluate(&features)?;

        info!("Rules: {} of {} fired", alerts.len(), self.rules.len());

        Ok(AnalysisReport {
            schema_version: SCHEMA_VERSION.into(),
            timestamp: chrono::Utc::now(),
            circuit: CircuitSummary::from(circuit),
            features,
            critical_path: dag.critical_path(),
            alerts,
            graph: self.config.include_graph.then(|| dag.export()),
        })
    }

    /// Analyze a circuit description file (JSON or YAML) by path.
    pub fn analyze_file(&self, path: &Path) -> EvalResult<AnalysisReport> {
        let circuit = input::load_circuit(path)?;
        self.analyze(&circuit)
    }

    /// Analyze independent circuits in parallel.
    ///
    /// Reports keep input order. Fails with the first error in input order.
    pub fn analyze_batch(&self, circuits: &[Circuit]) -> EvalResult<Vec<AnalysisReport>> {
        info!("Analyzing batch of {} circuits", circuits.len());
        circuits.par_iter().map(|c| self.analyze(c)).collect()
    }

    /// Compare compilations of one logical circuit, keyed by backend.
    ///
    /// Each backend also gets its own alert list.
    pub fn compare<'a, S: Into<String>>(
        &self,
        named_circuits: impl IntoIterator<Item = (S, &'a Circuit)>,
    ) -> EvalResult<ComparisonReport> {
        let comparison = compare::compare(named_circuits)?;

        let mut alerts = BTreeMap::new();
        for (backend, entry) in comparison.iter() {
            alerts.insert(backend.to_string(), self.rules.evaluate(&entry.features)?);
        }

        let ranking: Vec<String> = comparison
            .ranking()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();

        info!(
            "Compared {} backends, best: {}",
            comparison.len(),
            ranking.first().map_or("-", String::as_str),
        );

        Ok(ComparisonReport {
            schema_version: SCHEMA_VERSION.into(),
            timestamp: chrono::Utc::now(),
            comparison,
            ranking,
            alerts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::export::{self, ExportConfig};
    use crate::rules::{AlertRule, Severity};
    use qlens_ir::CircuitBuilder;

    fn ghz3() -> Circuit {
        Circuit::from_ops(3, [("h", vec![0u32]), ("cx", vec![0, 1]), ("cx", vec![1, 2])])
            .unwrap()
            .named("ghz3")
    }

    #[test]
    fn test_analyze_ghz() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze(&ghz3()).unwrap();

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.circuit.name, "ghz3");
        assert_eq!(report.features.get("total_gates"), Some(3.0));
        assert_eq!(report.features.get("cx_count"), Some(2.0));
        assert_eq!(report.critical_path, vec![0, 1, 2]);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.max_severity(), Some(Severity::Info));
        assert!(report.graph.is_none());
    }

    #[test]
    fn test_include_graph() {
        let config = AnalysisConfig {
            include_graph: true,
            ..Default::default()
        };
        let report = Analyzer::new(config).unwrap().analyze(&ghz3()).unwrap();
        let graph = report.graph.unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_prebuilt_graph_matches_analyze() {
        let config = AnalysisConfig {
            include_graph: true,
            ..Default::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let circuit = ghz3();
        let dag = DependencyGraph::build(&circuit);

        let report = analyzer.analyze_with_graph(&circuit, &dag).unwrap();
        let direct = analyzer.analyze(&circuit).unwrap();
        assert_eq!(report.features, direct.features);
        assert_eq!(report.critical_path, direct.critical_path);
        assert_eq!(report.graph, Some(dag.export()));
    }

    #[test]
    fn test_custom_rules_propagate_missing_feature() {
        let rules = RuleSet::new(vec![
            AlertRule::new("typo", "cx_cnt > 1", Severity::Warning, "").unwrap(),
        ])
        .unwrap();
        let analyzer = Analyzer::with_rules(AnalysisConfig::default(), rules);
        assert!(matches!(
            analyzer.analyze(&ghz3()),
            Err(EvalError::MissingFeature { .. })
        ));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let circuits: Vec<Circuit> = (1..=6).map(|n| Circuit::ghz(n).unwrap()).collect();

        let batch = analyzer.analyze_batch(&circuits).unwrap();
        assert_eq!(batch.len(), circuits.len());
        for (report, circuit) in batch.iter().zip(&circuits) {
            let single = analyzer.analyze(circuit).unwrap();
            assert_eq!(report.features, single.features);
            assert_eq!(report.alerts, single.alerts);
        }
    }

    #[test]
    fn test_compare_report() {
        let serial = CircuitBuilder::new("serial", 3)
            .cx(0, 1)
            .cx(1, 2)
            .cx(0, 1)
            .h(0)
            .build()
            .unwrap();
        let ghz = ghz3();
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer
            .compare([("ibm", &serial), ("iqm", &ghz)])
            .unwrap();

        assert_eq!(report.comparison.score("ibm"), Some(4.0));
        assert_eq!(report.comparison.score("iqm"), Some(2.0));
        assert_eq!(report.best(), Some("iqm"));
        assert_eq!(report.ranking, vec!["iqm", "ibm"]);
        assert_eq!(report.alerts.len(), 2);
    }

    #[test]
    fn test_compare_empty() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let none: Vec<(String, &Circuit)> = vec![];
        assert!(matches!(
            analyzer.compare(none),
            Err(EvalError::EmptyComparison)
        ));
    }

    #[test]
    fn test_report_json_export() {
        let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
        let report = analyzer.analyze(&ghz3()).unwrap();

        let json = export::to_json(&report, &ExportConfig::default()).unwrap();
        assert!(json.contains("schema_version"));
        assert!(json.contains("two_qubit_dominance"));
        assert!(!json.contains("\"graph\""));

        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
