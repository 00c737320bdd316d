//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - circuit efficiency metrics and threshold alerts",
        style("qlens").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qlens-ir    Circuit model and gate dependency graph");
    println!("  qlens-eval  Feature extraction, alert rules and backend comparison");
    println!("  qlens-cli   Command-line interface");
    println!();
    println!("Report schema: {}", qlens_eval::SCHEMA_VERSION);
    println!("License:       {}", style("Apache-2.0").dim());
}
