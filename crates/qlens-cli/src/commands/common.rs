//! Shared helpers for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qlens_eval::{Alert, AnalysisConfig, ExportConfig, Severity, export};

/// Load configuration from an optional file, `.env` and `QLENS_*` variables.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load(Some(p))
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => AnalysisConfig::load(None).context("Invalid configuration"),
    }
}

/// Apply command-line overrides: a rule file replaces configured rules.
pub fn apply_overrides(
    mut config: AnalysisConfig,
    rules: Option<&Path>,
    compact: bool,
) -> AnalysisConfig {
    if let Some(path) = rules {
        config.rules_file = Some(path.to_path_buf());
        config.rules = None;
    }
    if compact {
        config.export = ExportConfig { pretty: false };
    }
    config
}

/// Parse a `NAME=PATH` backend argument.
pub fn parse_backend(arg: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{arg}'"));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

/// Write a report to `output`, or print it to stdout.
pub fn emit<T: Serialize>(report: &T, output: Option<&Path>, config: &ExportConfig) -> Result<()> {
    if let Some(path) = output {
        export::to_file(report, path, config)?;
        eprintln!(
            "{} Report written to {}",
            style("OK").green().bold(),
            path.display()
        );
    } else {
        println!("{}", export::to_json(report, config)?);
    }
    Ok(())
}

/// Styled severity label.
pub fn severity_label(severity: Severity) -> String {
    let label = format!("{:<8}", severity.as_str().to_uppercase());
    match severity {
        Severity::Info => style(label).cyan().to_string(),
        Severity::Warning => style(label).yellow().to_string(),
        Severity::Critical => style(label).red().bold().to_string(),
    }
}

/// Print alerts to stderr, one per line.
pub fn print_alerts(alerts: &[Alert], indent: &str) {
    if alerts.is_empty() {
        eprintln!("{indent}{}", style("no alerts").dim());
    }
    for alert in alerts {
        eprintln!(
            "{indent}{} {}: {}",
            severity_label(alert.severity),
            style(&alert.rule).bold(),
            alert.message
        );
    }
}
