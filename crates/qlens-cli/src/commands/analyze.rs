//! Analyze command implementation.
//!
//! `qlens analyze --input <circuit.json> [--rules <rules.yaml>] [--graph] [--dot <graph.dot>]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use qlens_eval::features::{DEPTH, PARALLELISM, TWO_QUBIT_RATIO};
use qlens_eval::{AnalysisConfig, Analyzer, Severity, input};
use qlens_ir::DependencyGraph;

use super::common;

/// Arguments of the analyze command.
pub struct Options {
    pub input: PathBuf,
    pub rules: Option<PathBuf>,
    pub graph: bool,
    pub output: Option<PathBuf>,
    pub dot: Option<PathBuf>,
    pub compact: bool,
    pub fail_on: Option<Severity>,
}

/// Execute the analyze command.
pub fn execute(config: AnalysisConfig, opts: &Options) -> Result<()> {
    let mut config = common::apply_overrides(config, opts.rules.as_deref(), opts.compact);
    config.include_graph |= opts.graph;

    let analyzer = Analyzer::new(config)?;
    let circuit = input::load_circuit(&opts.input)?;
    let dag = DependencyGraph::build(&circuit);
    let report = analyzer.analyze_with_graph(&circuit, &dag)?;

    if let Some(path) = &opts.dot {
        std::fs::write(path, dag.to_dot())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    common::emit(&report, opts.output.as_deref(), &analyzer.config().export)?;

    let feature = |name: &str| report.features.get(name).unwrap_or_default();
    eprintln!();
    eprintln!("{}", style("Analysis Summary").bold().underlined());
    eprintln!(
        "  Circuit:     {} ({} qubits, {} gates)",
        report.circuit.name, report.circuit.num_qubits, report.circuit.num_gates
    );
    eprintln!(
        "  Structure:   depth {}, two-qubit ratio {:.3}, parallelism {:.2}",
        feature(DEPTH),
        feature(TWO_QUBIT_RATIO),
        feature(PARALLELISM),
    );
    eprintln!(
        "  Rules:       {} of {} fired",
        report.alerts.len(),
        analyzer.rules().len()
    );
    common::print_alerts(&report.alerts, "    ");

    if let (Some(threshold), Some(max)) = (opts.fail_on, report.max_severity()) {
        if max >= threshold {
            anyhow::bail!("alert at severity {max} (threshold: {threshold})");
        }
    }

    Ok(())
}
