//! # carbon-calc-expr
//!
//! The arithmetic expression mini-language consumed by the carbon-calc
//! formula engine.
//!
//! The language supports infix arithmetic (`+ - * /`), exponentiation (`^`,
//! right-associative), comparisons (`== != < <= > >=`) producing `1.0`/`0.0`,
//! the ternary conditional `cond ? a : b`, parenthetical grouping, numeric
//! literals including scientific notation, and bare identifiers resolved
//! against a [`VariableScope`](carbon_calc_core::VariableScope).
//!
//! ## Example
//!
//! ```rust
//! use carbon_calc_core::VariableScope;
//! use carbon_calc_expr::evaluate_str;
//!
//! let mut scope = VariableScope::new();
//! scope.set("capacity", 50.0).unwrap();
//! scope.set("capacity_factor", 0.35).unwrap();
//!
//! let mwh = evaluate_str("capacity * 8760 * capacity_factor", &scope).unwrap();
//! assert_eq!(mwh, 153300.0);
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{ExprError, ExprResult};
pub use evaluator::{evaluate, evaluate_str};
pub use parser::parse;
