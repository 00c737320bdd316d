//! Rules command implementation.
//!
//! `qlens rules [--rules <rules.yaml>] [--yaml]`

use std::path::Path;

use anyhow::Result;
use console::style;

use qlens_eval::AnalysisConfig;

use super::common;

/// Execute the rules command.
pub fn execute(config: AnalysisConfig, rules: Option<&Path>, yaml: bool) -> Result<()> {
    let config = common::apply_overrides(config, rules, false);
    let rule_set = config.rule_set()?;

    if yaml {
        print!("{}", rule_set.to_yaml()?);
        return Ok(());
    }

    let source = match (&config.rules_file, &config.rules) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(_)) => "configuration".to_string(),
        (None, None) => "built-in defaults".to_string(),
    };
    println!(
        "{} ({} rules from {})",
        style("Alert Rules").bold().underlined(),
        rule_set.len(),
        source
    );
    for rule in rule_set.rules() {
        println!();
        println!(
            "  {} {}",
            common::severity_label(rule.severity()),
            style(rule.name()).bold()
        );
        println!("    when:    {}", rule.predicate().source());
        println!("    message: {}", rule.message().source());
    }

    Ok(())
}
