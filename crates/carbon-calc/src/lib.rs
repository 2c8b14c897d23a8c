//! # carbon-calc
//!
//! A formula dependency evaluator for energy-project impact calculations.
//!
//! The engine takes a set of named, interdependent arithmetic formulas plus
//! a set of numeric input variables, determines a valid evaluation order
//! (topological sort with cycle detection), evaluates each formula against a
//! shared write-once variable scope, and returns every computed value keyed
//! by formula identity. The formula catalogue itself is data, supplied by
//! the caller; the engine embeds no formulas.
//!
//! ## Example
//!
//! ```rust
//! use carbon_calc::prelude::*;
//!
//! // Inputs, e.g. user-submitted project parameters and reference data
//! let mut registry = FormulaRegistry::new([
//!     ("capacity_mw", 50.0),
//!     ("capacity_factor", 0.35),
//!     ("grid_emission_rate", 0.7),
//! ]).unwrap();
//!
//! // Formulas may be registered in any order; forward references resolve
//! // at evaluation time
//! registry.add_formula(Formula::new(
//!     "displaced_tco2e",
//!     "annual_mwh * grid_emission_rate",
//!     ["annual_mwh", "grid_emission_rate"],
//! )).unwrap();
//! registry.add_formula(Formula::new(
//!     "annual_mwh",
//!     "capacity_mw * 8760 * capacity_factor",
//!     ["capacity_mw", "capacity_factor"],
//! )).unwrap();
//!
//! registry.evaluate().unwrap();
//! assert_eq!(registry.get_variable("annual_mwh").unwrap(), 153300.0);
//! assert_eq!(registry.get_variable("displaced_tco2e").unwrap(), 107310.0);
//! ```

pub mod dependency;
pub mod engine;
pub mod prelude;

// Re-export engine types
pub use dependency::DependencyGraph;
pub use engine::FormulaRegistry;

// Re-export core types
pub use carbon_calc_core::{
    Error, Formula, FormulaMetadata, Result, ScopeSetup, ScopeValue, VariableScope,
};

// Re-export expression types
pub use carbon_calc_expr::{
    evaluate, evaluate_str, parse, BinaryOperator, Expr, ExprError, ExprResult, UnaryOperator,
};
