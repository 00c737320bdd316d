//! Alert rules and their evaluation.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::parser::Predicate;
use super::template::MessageTemplate;
use crate::error::{EvalError, EvalResult};
use crate::features::FeatureVector;

/// How serious a fired rule is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Critical,
}

impl Severity {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(EvalError::Parse(format!("Unknown severity: {other}"))),
        }
    }
}

/// Plain-data form of an [`AlertRule`], as written in rule files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Unique rule name.
    pub name: String,
    /// Predicate source.
    pub when: String,
    /// Severity of the alert.
    #[serde(default)]
    pub severity: Severity,
    /// Message template.
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_message() -> String {
    "{rule} triggered".into()
}

/// A named predicate over a feature vector with a severity and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct AlertRule {
    name: String,
    predicate: Predicate,
    severity: Severity,
    message: MessageTemplate,
}

impl AlertRule {
    /// Create a rule, parsing the predicate and message template.
    pub fn new(
        name: impl Into<String>,
        when: &str,
        severity: Severity,
        message: &str,
    ) -> EvalResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EvalError::InvalidRuleName(name));
        }
        let predicate = Predicate::parse(when).map_err(|source| EvalError::InvalidRule {
            rule: name.clone(),
            source,
        })?;
        let message =
            MessageTemplate::parse(message).map_err(|source| EvalError::InvalidTemplate {
                rule: name.clone(),
                source,
            })?;
        Ok(Self {
            name,
            predicate,
            severity,
            message,
        })
    }

    /// The representative default rules.
    pub fn defaults() -> EvalResult<Vec<Self>> {
        DEFAULT_RULES
            .iter()
            .map(|&(name, when, severity, message)| Self::new(name, when, severity, message))
            .collect()
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed predicate.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Severity of alerts this rule emits.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Message template.
    pub fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Check that every feature the rule reads is defined.
    pub fn check_features(&self, features: &FeatureVector) -> EvalResult<()> {
        for name in self
            .predicate
            .features()
            .iter()
            .map(String::as_str)
            .chain(self.message.features())
        {
            features.require(name, &self.name)?;
        }
        Ok(())
    }

    /// Evaluate the rule, returning an alert if its predicate holds.
    pub fn evaluate(&self, features: &FeatureVector) -> EvalResult<Option<Alert>> {
        self.check_features(features)?;
        if !self.predicate.evaluate(features, &self.name)? {
            return Ok(None);
        }
        Ok(Some(Alert {
            rule: self.name.clone(),
            severity: self.severity,
            message: self.message.render(&self.name, features)?,
            features: features.clone(),
        }))
    }
}

impl TryFrom<RuleSpec> for AlertRule {
    type Error = EvalError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        Self::new(spec.name, &spec.when, spec.severity, &spec.message)
    }
}

impl From<AlertRule> for RuleSpec {
    fn from(rule: AlertRule) -> Self {
        Self {
            when: rule.predicate.source().to_string(),
            message: rule.message.source().to_string(),
            name: rule.name,
            severity: rule.severity,
        }
    }
}

const DEFAULT_RULES: [(&str, &str, Severity, &str); 3] = [
    (
        "excess_two_qubit_density",
        "cx_count > 2 * num_qubits",
        Severity::Warning,
        "{cx_count} CX gates on {num_qubits} qubits exceeds 2 per qubit",
    ),
    (
        "excess_depth",
        "depth > 5 * num_qubits",
        Severity::Warning,
        "depth {depth} exceeds 5x the qubit count ({num_qubits})",
    ),
    (
        "two_qubit_dominance",
        "two_qubit_ratio > 0.5",
        Severity::Info,
        "two-qubit gates make up {two_qubit_ratio:.2} of all gates",
    ),
];

/// A fired rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Name of the rule that fired.
    pub rule: String,
    /// Rule severity.
    pub severity: Severity,
    /// Rendered message.
    pub message: String,
    /// Feature values at the time the rule fired.
    pub features: FeatureVector,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)
    }
}

/// Evaluate every rule in order and collect the alerts of those that fire.
///
/// Rules are independent: a firing rule never stops later ones from being
/// evaluated, and the output keeps rule order. Fails on the first rule that
/// references an undefined feature.
pub fn evaluate(features: &FeatureVector, rules: &[AlertRule]) -> EvalResult<Vec<Alert>> {
    let mut alerts = Vec::new();
    for rule in rules {
        if let Some(alert) = rule.evaluate(features)? {
            debug!(rule = %alert.rule, severity = %alert.severity, "Rule fired");
            alerts.push(alert);
        }
    }
    Ok(alerts)
}

/// An ordered set of uniquely named rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleFile")]
pub struct RuleSet {
    rules: Vec<AlertRule>,
}

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<AlertRule>,
}

impl TryFrom<RuleFile> for RuleSet {
    type Error = EvalError;

    fn try_from(file: RuleFile) -> Result<Self, Self::Error> {
        Self::new(file.rules)
    }
}

impl RuleSet {
    /// The built-in default rules.
    pub fn defaults() -> EvalResult<Self> {
        Self::new(AlertRule::defaults()?)
    }

    /// Create a rule set, rejecting duplicate names.
    pub fn new(rules: Vec<AlertRule>) -> EvalResult<Self> {
        let mut seen = FxHashSet::default();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(EvalError::DuplicateRule(rule.name().to_string()));
            }
        }
        Ok(Self { rules })
    }

    /// Build from plain-data specs.
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> EvalResult<Self> {
        let rules = specs
            .into_iter()
            .map(AlertRule::try_from)
            .collect::<EvalResult<Vec<_>>>()?;
        Self::new(rules)
    }

    /// Parse a YAML rule file (`rules:` list).
    pub fn from_yaml(source: &str) -> EvalResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load a YAML rule file from disk.
    pub fn from_file(path: &Path) -> EvalResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&source)
    }

    /// Encode as a YAML rule file.
    pub fn to_yaml(&self) -> EvalResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&AlertRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate all rules against a feature vector.
    pub fn evaluate(&self, features: &FeatureVector) -> EvalResult<Vec<Alert>> {
        evaluate(features, &self.rules)
    }
}
