//! Predicate expression tree, type checking and evaluation.

use std::fmt;

use crate::error::{EvalError, EvalResult, PredicateError};
use crate::features::FeatureVector;

/// A predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// Feature lookup by name.
    Feature(String),
    /// Arithmetic negation.
    Neg(Box<Expr>),
    /// Logical negation.
    Not(Box<Expr>),
    /// Binary operation.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinOp {
    /// Binding strength for precedence climbing; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::NotEq => 3,
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div => 6,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Static type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Bool,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Number => f.write_str("number"),
            ValueType::Bool => f.write_str("bool"),
        }
    }
}

/// Runtime value of an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Expr {
    /// Feature names referenced by the expression, in first-appearance order.
    pub fn features(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_features(&mut out);
        out
    }

    fn collect_features(&self, out: &mut Vec<String>) {
        match self {
            Expr::Feature(name) => {
                if !out.iter().any(|f| f == name) {
                    out.push(name.clone());
                }
            }
            Expr::Neg(inner) | Expr::Not(inner) => inner.collect_features(out),
            Expr::Binary { left, right, .. } => {
                left.collect_features(out);
                right.collect_features(out);
            }
            Expr::Number(_) | Expr::Bool(_) => {}
        }
    }

    /// Infer the static type of the expression.
    ///
    /// Features are always numbers. Arithmetic and ordering need numbers on
    /// both sides, `==`/`!=` need matching types, logic needs booleans.
    pub fn type_of(&self) -> Result<ValueType, PredicateError> {
        match self {
            Expr::Number(_) | Expr::Feature(_) => Ok(ValueType::Number),
            Expr::Bool(_) => Ok(ValueType::Bool),
            Expr::Neg(inner) => expect_type(inner, ValueType::Number, "-").map(|()| ValueType::Number),
            Expr::Not(inner) => expect_type(inner, ValueType::Bool, "!").map(|()| ValueType::Bool),
            Expr::Binary { left, op, right } => {
                let symbol = op.symbol();
                match op {
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        expect_type(left, ValueType::Number, symbol)?;
                        expect_type(right, ValueType::Number, symbol)?;
                        Ok(ValueType::Number)
                    }
                    BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => {
                        expect_type(left, ValueType::Number, symbol)?;
                        expect_type(right, ValueType::Number, symbol)?;
                        Ok(ValueType::Bool)
                    }
                    BinOp::Eq | BinOp::NotEq => {
                        let lt = left.type_of()?;
                        let rt = right.type_of()?;
                        if lt == rt {
                            Ok(ValueType::Bool)
                        } else {
                            Err(PredicateError::TypeMismatch(format!(
                                "cannot compare {lt} with {rt} using '{symbol}'"
                            )))
                        }
                    }
                    BinOp::And | BinOp::Or => {
                        expect_type(left, ValueType::Bool, symbol)?;
                        expect_type(right, ValueType::Bool, symbol)?;
                        Ok(ValueType::Bool)
                    }
                }
            }
        }
    }

    /// Evaluate against a feature vector.
    ///
    /// Division follows IEEE semantics (`x / 0` is infinite or NaN) and any
    /// ordering comparison involving NaN is false.
    pub fn eval(&self, features: &FeatureVector, rule: &str) -> EvalResult<Value> {
        match self {
            Expr::Number(v) => Ok(Value::Number(*v)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Feature(name) => features.require(name, rule).map(Value::Number),
            Expr::Neg(inner) => Ok(Value::Number(-inner.eval_number(features, rule)?)),
            Expr::Not(inner) => Ok(Value::Bool(!inner.eval_bool(features, rule)?)),
            Expr::Binary { left, op, right } => match op {
                BinOp::And => Ok(Value::Bool(
                    left.eval_bool(features, rule)? && right.eval_bool(features, rule)?,
                )),
                BinOp::Or => Ok(Value::Bool(
                    left.eval_bool(features, rule)? || right.eval_bool(features, rule)?,
                )),
                BinOp::Eq | BinOp::NotEq => {
                    let equal = match (left.eval(features, rule)?, right.eval(features, rule)?) {
                        (Value::Number(a), Value::Number(b)) => a == b,
                        (Value::Bool(a), Value::Bool(b)) => a == b,
                        _ => return Err(type_error(rule, "operands of '==' differ in type")),
                    };
                    Ok(Value::Bool(if *op == BinOp::Eq { equal } else { !equal }))
                }
                _ => {
                    let a = left.eval_number(features, rule)?;
                    let b = right.eval_number(features, rule)?;
                    Ok(match op {
                        BinOp::Add => Value::Number(a + b),
                        BinOp::Sub => Value::Number(a - b),
                        BinOp::Mul => Value::Number(a * b),
                        BinOp::Div => Value::Number(a / b),
                        BinOp::Lt => Value::Bool(a < b),
                        BinOp::LtEq => Value::Bool(a <= b),
                        BinOp::Gt => Value::Bool(a > b),
                        _ => Value::Bool(a >= b),
                    })
                }
            },
        }
    }

    fn eval_number(&self, features: &FeatureVector, rule: &str) -> EvalResult<f64> {
        match self.eval(features, rule)? {
            Value::Number(v) => Ok(v),
            Value::Bool(_) => Err(type_error(rule, "expected a number")),
        }
    }

    pub(crate) fn eval_bool(&self, features: &FeatureVector, rule: &str) -> EvalResult<bool> {
        match self.eval(features, rule)? {
            Value::Bool(b) => Ok(b),
            Value::Number(_) => Err(type_error(rule, "expected a boolean")),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{v}"),
            Expr::Bool(b) => write!(f, "{b}"),
            Expr::Feature(name) => write!(f, "{name}"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
            Expr::Not(inner) => write!(f, "!{inner}"),
            Expr::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

fn expect_type(expr: &Expr, expected: ValueType, op: &str) -> Result<(), PredicateError> {
    let found = expr.type_of()?;
    if found == expected {
        Ok(())
    } else {
        Err(PredicateError::TypeMismatch(format!(
            "'{op}' expects {expected} operand, found {found} in '{expr}'"
        )))
    }
}

// Unreachable for type-checked predicates; reported rather than panicking.
fn type_error(rule: &str, message: &str) -> EvalError {
    EvalError::InvalidRule {
        rule: rule.to_string(),
        source: PredicateError::TypeMismatch(message.to_string()),
    }
}
