//! Rule engine: threshold predicates over feature vectors.
//!
//! Rules are written in a small expression language:
//!
//! ```text
//! cx_count > 2 * num_qubits
//! depth > 5 * num_qubits and not (two_qubit_ratio < 0.1)
//! ```
//!
//! Identifiers name features, numbers are `f64`, and the usual arithmetic,
//! comparison and logical operators apply. Predicates are parsed and
//! type-checked when a rule is created, so a malformed rule never reaches
//! evaluation.

pub mod ast;
pub mod engine;
pub mod lexer;
pub mod parser;
pub mod template;

pub use engine::{Alert, AlertRule, RuleSet, RuleSpec, Severity, evaluate};
pub use parser::Predicate;
pub use template::MessageTemplate;
