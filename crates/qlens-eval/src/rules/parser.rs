//! Precedence-climbing parser for rule predicates.

use std::fmt;

use super::ast::{BinOp, Expr, ValueType};
use super::lexer::{SpannedToken, Token, tokenize};
use crate::error::{EvalResult, PredicateError};
use crate::features::FeatureVector;

/// A parsed, type-checked boolean predicate over feature names.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    source: String,
    expr: Expr,
    features: Vec<String>,
}

impl Predicate {
    /// Parse and type-check a predicate.
    ///
    /// The whole expression must be boolean.
    pub fn parse(source: &str) -> Result<Self, PredicateError> {
        let expr = parse_expr(source)?;
        let ty = expr.type_of()?;
        if ty != ValueType::Bool {
            return Err(PredicateError::TypeMismatch(format!(
                "predicate must be boolean, found {ty}"
            )));
        }
        let features = expr.features();
        Ok(Self {
            source: source.trim().to_string(),
            expr,
            features,
        })
    }

    /// Original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed expression tree.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Referenced feature names, in first-appearance order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Evaluate against a feature vector on behalf of `rule`.
    ///
    /// Every referenced feature is checked before evaluation, so a missing
    /// key is reported even on a branch `&&`/`||` would skip.
    pub fn evaluate(&self, features: &FeatureVector, rule: &str) -> EvalResult<bool> {
        for name in &self.features {
            features.require(name, rule)?;
        }
        self.expr.eval_bool(features, rule)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse an expression of any type.
pub fn parse_expr(source: &str) -> Result<Expr, PredicateError> {
    let mut parser = Parser::new(source)?;
    let expr = parser.parse_expression()?;
    if let Some(t) = parser.tokens.get(parser.pos) {
        return Err(PredicateError::UnexpectedToken {
            position: t.span.start,
            expected: "end of predicate".into(),
            found: t.token.to_string(),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self, PredicateError> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    return Err(PredicateError::LexerError {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), PredicateError> {
        match self.advance() {
            Some(t) if &t.token == expected => Ok(()),
            Some(t) => Err(PredicateError::UnexpectedToken {
                position: t.span.start,
                expected: format!("'{expected}'"),
                found: t.token.to_string(),
            }),
            None => Err(PredicateError::UnexpectedEof(format!("'{expected}'"))),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, PredicateError> {
        self.parse_binary_expr(0)
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<Expr, PredicateError> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.pos += 1;

            let right = self.parse_binary_expr(prec + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, PredicateError> {
        if self.consume(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.parse_unary_expr()?)));
        }
        if self.consume(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.parse_unary_expr()?)));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> Result<Expr, PredicateError> {
        let t = self
            .advance()
            .ok_or_else(|| PredicateError::UnexpectedEof("expression".into()))?;

        match t.token {
            Token::Number(v) => Ok(Expr::Number(v)),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::Identifier(name) => Ok(Expr::Feature(name)),
            Token::LParen => {
                let expr = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            other => Err(PredicateError::UnexpectedToken {
                position: t.span.start,
                expected: "expression".into(),
                found: other.to_string(),
            }),
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::EqEq => Some(BinOp::Eq),
            Token::NotEq => Some(BinOp::NotEq),
            Token::Lt => Some(BinOp::Lt),
            Token::LtEq => Some(BinOp::LtEq),
            Token::Gt => Some(BinOp::Gt),
            Token::GtEq => Some(BinOp::GtEq),
            Token::And => Some(BinOp::And),
            Token::Or => Some(BinOp::Or),
            _ => None,
        }
    }
}
