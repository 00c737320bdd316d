//! Evaluator error types.

use qlens_ir::IrError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvalError {
    /// A rule (or score) references a feature the vector does not define.
    #[error("Rule '{rule}' references missing feature '{feature}'")]
    MissingFeature { feature: String, rule: String },

    /// Comparison requested over zero circuits.
    #[error("Comparison requested over zero circuits")]
    EmptyComparison,

    /// The same backend identifier was supplied twice.
    #[error("Duplicate backend identifier: {0}")]
    DuplicateBackend(String),

    /// The same rule name appears twice in one rule set.
    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),

    /// Rule name is empty or blank.
    #[error("Invalid rule name: {0:?}")]
    InvalidRuleName(String),

    /// Rule predicate failed to parse or type-check.
    #[error("Invalid rule '{rule}': {source}")]
    InvalidRule {
        rule: String,
        source: PredicateError,
    },

    /// Rule message template is malformed.
    #[error("Invalid message template for rule '{rule}': {source}")]
    InvalidTemplate { rule: String, source: TemplateError },

    /// Circuit construction or description error.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule file parsing failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("Export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for EvalError {
    fn from(e: serde_json::Error) -> Self {
        EvalError::Export(e.to_string())
    }
}

impl From<serde_yaml_ng::Error> for EvalError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        EvalError::Parse(e.to_string())
    }
}

/// Errors raised while parsing or type-checking a rule predicate.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PredicateError {
    /// Lexer error (invalid token).
    #[error("Lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at position {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {0}")]
    UnexpectedEof(String),

    /// Operand types do not fit the operator, or the predicate is not boolean.
    #[error("Type error: {0}")]
    TypeMismatch(String),
}

/// Errors raised while parsing a message template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// `{` without a matching `}`.
    #[error("Unclosed placeholder starting at position {0}")]
    UnclosedPlaceholder(usize),

    /// `}` outside a placeholder and not escaped as `}}`.
    #[error("Unmatched '}}' at position {0}")]
    UnmatchedBrace(usize),

    /// `{}` or a placeholder with no key.
    #[error("Empty placeholder at position {0}")]
    EmptyPlaceholder(usize),

    /// Format spec other than `.N`.
    #[error("Invalid format spec '{spec}' for '{key}'")]
    InvalidFormat { key: String, spec: String },
}
