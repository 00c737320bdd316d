//! Alert message templates.
//!
//! `{feature}` substitutes a feature value, `{feature:.N}` with `N` decimals,
//! `{rule}` the rule name. `{{` and `}}` are literal braces.

use std::fmt;

use crate::error::{EvalResult, TemplateError};
use crate::features::FeatureVector;

/// Placeholder key that renders the rule name.
pub const RULE_KEY: &str = "rule";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    RuleName,
    Feature {
        name: String,
        precision: Option<usize>,
    },
}

/// A parsed message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedBrace(i)),
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedPlaceholder(i));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body, i)?);
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Original template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Feature names the template substitutes, in order of appearance.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Feature { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Render the template for `rule`.
    ///
    /// Fails with `MissingFeature` if a placeholder names an undefined feature.
    pub fn render(&self, rule: &str, features: &FeatureVector) -> EvalResult<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::RuleName => out.push_str(rule),
                Segment::Feature { name, precision } => {
                    let value = features.require(name, rule)?;
                    let text = match *precision {
                        Some(p) => format!("{value:.p$}"),
                        None => FeatureValue(value).to_string(),
                    };
                    out.push_str(&text);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Default rendering of a feature value: integers without decimals,
/// everything else with three.
struct FeatureValue(f64);

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 {
            write!(f, "{v:.0}")
        } else {
            write!(f, "{v:.3}")
        }
    }
}

/// Largest `{key:.N}` precision; an f64 carries at most 17 significant digits.
pub const MAX_PRECISION: usize = 17;

fn parse_placeholder(body: &str, position: usize) -> Result<Segment, TemplateError> {
    let (key, spec) = match body.split_once(':') {
        Some((key, spec)) => (key.trim(), Some(spec.trim())),
        None => (body.trim(), None),
    };
    if key.is_empty() {
        return Err(TemplateError::EmptyPlaceholder(position));
    }

    let precision = match spec {
        None => None,
        Some(spec) => Some(
            spec.strip_prefix('.')
                .and_then(|digits| digits.parse::<usize>().ok())
                .filter(|&p| p <= MAX_PRECISION)
                .ok_or_else(|| TemplateError::InvalidFormat {
                    key: key.to_string(),
                    spec: spec.to_string(),
                })?,
        ),
    };

    if key == RULE_KEY && precision.is_none() {
        Ok(Segment::RuleName)
    } else {
        Ok(Segment::Feature {
            name: key.to_string(),
            precision,
        })
    }
}
