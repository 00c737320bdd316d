//! qlens Command-Line Interface
//!
//! The main entry point for the qlens CLI tool.
//!
//! ```text
//! qlens analyze --input ghz.json --graph --output report.json
//! qlens compare --backend ibm=ghz_ibm.yaml --backend iqm=ghz_iqm.yaml
//! qlens rules --rules team-rules.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use qlens_eval::{AnalysisConfig, Severity};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{analyze, common, compare, rules, version};

/// qlens - circuit efficiency metrics and threshold alerts
#[derive(Parser)]
#[command(name = "qlens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(short, long, global = true, env = "QLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract features from a circuit and evaluate alert rules
    Analyze {
        /// Circuit description (JSON or YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Rule file, replacing configured rules
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Include the dependency graph in the report
        #[arg(long)]
        graph: bool,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the dependency graph as Graphviz DOT
        #[arg(long)]
        dot: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,

        /// Exit with an error when an alert of this severity or higher fires
        #[arg(long)]
        fail_on: Option<Severity>,
    },

    /// Compare compilations of one circuit across backends
    Compare {
        /// Backend circuit as NAME=PATH (repeatable)
        #[arg(short, long = "backend", value_name = "NAME=PATH", required = true,
              value_parser = common::parse_backend)]
        backends: Vec<(String, PathBuf)>,

        /// Rule file, replacing configured rules
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the active alert rules
    Rules {
        /// Rule file, replacing configured rules
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Print the rule set as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config: AnalysisConfig = common::load_config(cli.config.as_deref())?;
    init_logging(cli.verbose, &config.log_level);

    match cli.command {
        Commands::Analyze {
            input,
            rules,
            graph,
            output,
            dot,
            compact,
            fail_on,
        } => analyze::execute(
            config,
            &analyze::Options {
                input,
                rules,
                graph,
                output,
                dot,
                compact,
                fail_on,
            },
        ),

        Commands::Compare {
            backends,
            rules,
            output,
            compact,
        } => compare::execute(
            config,
            &backends,
            rules.as_deref(),
            output.as_deref(),
            compact,
        ),

        Commands::Rules { rules, yaml } => rules::execute(config, rules.as_deref(), yaml),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "qlens", "-vv", "analyze", "-i", "ghz.json", "--graph", "--fail-on", "critical",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Analyze {
                input,
                graph,
                fail_on,
                compact,
                ..
            } => {
                assert_eq!(input, PathBuf::from("ghz.json"));
                assert!(graph);
                assert!(!compact);
                assert_eq!(fail_on, Some(Severity::Critical));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_compare_backends() {
        let cli = Cli::try_parse_from([
            "qlens", "compare", "-b", "ibm=a.json", "--backend", "iqm=b.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Compare { backends, .. } => {
                assert_eq!(
                    backends,
                    vec![
                        ("ibm".to_string(), PathBuf::from("a.json")),
                        ("iqm".to_string(), PathBuf::from("b.yaml")),
                    ]
                );
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["qlens", "compare"]).is_err());
        assert!(Cli::try_parse_from(["qlens", "compare", "-b", "no-separator"]).is_err());
        assert!(Cli::try_parse_from(["qlens", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["qlens", "analyze", "-i", "a.json", "--fail-on", "loud"]).is_err());
    }
}
