//! qlens Evaluator: circuit efficiency analysis
//!
//! This crate turns a validated [`Circuit`] into structured metrics and
//! rule-based alerts, and compares compilations of the same logical circuit
//! across backends.
//!
//! # Overview
//!
//! - **Feature Extraction**: depth, gate counts per type, two-qubit ratio
//!   and other structural metrics ([`features`])
//! - **Rule Engine**: threshold predicates over features, written in a small
//!   expression language and evaluated without short-circuiting ([`rules`])
//! - **Comparison**: per-backend features and an efficiency score
//!   ([`compare`])
//! - **Export**: JSON reports for dashboards and plotting tools ([`export`])
//!
//! # Architecture
//!
//! ```text
//! [Circuit] -> Dependency Graph -> Feature Extractor -> Rule Engine
//!                                         |                 |
//!                                         v                 v
//!                                 Comparison Aggregator   Alerts
//!                                         |                 |
//!                                         +--------+--------+
//!                                                  v
//!                                             JSON Report
//! ```
//!
//! # Example
//!
//! ```rust
//! use qlens_eval::{AnalysisConfig, Analyzer};
//! use qlens_ir::Circuit;
//!
//! let circuit = Circuit::from_ops(3, [
//!     ("h", vec![0u32]),
//!     ("cx", vec![0, 1]),
//!     ("cx", vec![1, 2]),
//! ]).unwrap();
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let report = analyzer.analyze(&circuit).unwrap();
//!
//! assert_eq!(report.features.get("depth"), Some(3.0));
//! assert_eq!(report.alerts.len(), 1);
//! ```

pub mod analyzer;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod input;
pub mod report;
pub mod rules;

pub use analyzer::Analyzer;
pub use compare::{BackendEntry, ComparisonRecord, efficiency_score};
pub use config::{AnalysisConfig, ConfigError};
pub use error::{EvalError, EvalResult, PredicateError, TemplateError};
pub use export::ExportConfig;
pub use features::{FeatureVector, extract, extract_with_graph};
pub use report::{AnalysisReport, CircuitSummary, ComparisonReport, SCHEMA_VERSION};
pub use rules::{Alert, AlertRule, RuleSet, RuleSpec, Severity};
