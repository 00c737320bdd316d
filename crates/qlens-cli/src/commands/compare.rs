//! Compare command implementation.
//!
//! `qlens compare --backend ibm=ghz_ibm.json --backend iqm=ghz_iqm.yaml`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qlens_eval::features::{DEPTH, TWO_QUBIT_COUNT};
use qlens_eval::{AnalysisConfig, Analyzer, input};
use qlens_ir::Circuit;

use super::common;

/// Execute the compare command.
pub fn execute(
    config: AnalysisConfig,
    backends: &[(String, PathBuf)],
    rules: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let config = common::apply_overrides(config, rules, compact);
    let analyzer = Analyzer::new(config)?;

    let circuits = backends
        .iter()
        .map(|(name, path)| {
            input::load_circuit(path)
                .with_context(|| format!("Failed to load circuit for backend '{name}'"))
        })
        .collect::<Result<Vec<Circuit>>>()?;
    debug!(backends = circuits.len(), "Loaded backend circuits");

    let report = analyzer.compare(
        backends
            .iter()
            .zip(&circuits)
            .map(|((name, _), circuit)| (name.as_str(), circuit)),
    )?;

    common::emit(&report, output, &analyzer.config().export)?;

    eprintln!();
    eprintln!("{}", style("Backend Comparison").bold().underlined());
    eprintln!(
        "  {:<4} {:<16} {:>10} {:>7} {:>10}",
        "#", "Backend", "Score", "Depth", "2Q gates"
    );
    for (rank, backend) in report.ranking.iter().enumerate() {
        let Some(entry) = report.comparison.get(backend) else {
            continue;
        };
        let line = format!(
            "  {:<4} {:<16} {:>10.3} {:>7} {:>10}",
            rank + 1,
            backend,
            entry.score,
            entry.features.get(DEPTH).unwrap_or_default(),
            entry.features.get(TWO_QUBIT_COUNT).unwrap_or_default(),
        );
        if rank == 0 {
            eprintln!("{}", style(line).green());
        } else {
            eprintln!("{line}");
        }
    }

    for (backend, alerts) in &report.alerts {
        eprintln!();
        eprintln!("  {}", style(backend).bold());
        common::print_alerts(alerts, "    ");
    }

    Ok(())
}
