//! Expression evaluator
//!
//! Evaluates expression ASTs against a variable scope. Every value is an
//! `f64`; comparisons yield `1.0`/`0.0` and a ternary condition is truthy
//! iff nonzero. Arithmetic follows IEEE-754, so division by zero produces an
//! infinity rather than an error.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::ExprResult;
use crate::parser::parse;
use carbon_calc_core::VariableScope;

/// Evaluate a parsed expression against the given scope
pub fn evaluate(expr: &Expr, scope: &VariableScope) -> ExprResult<f64> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Ident(name) => Ok(scope.get(name)?),
        Expr::UnaryOp { op, operand } => {
            let value = evaluate(operand, scope)?;
            Ok(match op {
                UnaryOperator::Negate => -value,
            })
        }
        Expr::BinaryOp { op, left, right } => {
            let left = evaluate(left, scope)?;
            let right = evaluate(right, scope)?;
            Ok(apply_binary(*op, left, right))
        }
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            // Only the taken branch is evaluated
            if evaluate(cond, scope)? != 0.0 {
                evaluate(then, scope)
            } else {
                evaluate(otherwise, scope)
            }
        }
    }
}

/// Parse and evaluate an expression string in one step
pub fn evaluate_str(input: &str, scope: &VariableScope) -> ExprResult<f64> {
    let expr = parse(input)?;
    evaluate(&expr, scope)
}

fn apply_binary(op: BinaryOperator, left: f64, right: f64) -> f64 {
    match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide => left / right,
        BinaryOperator::Power => left.powf(right),
        BinaryOperator::Equal => bool_to_num(left == right),
        BinaryOperator::NotEqual => bool_to_num(left != right),
        BinaryOperator::LessThan => bool_to_num(left < right),
        BinaryOperator::LessEqual => bool_to_num(left <= right),
        BinaryOperator::GreaterThan => bool_to_num(left > right),
        BinaryOperator::GreaterEqual => bool_to_num(left >= right),
    }
}

fn bool_to_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
