//! Prelude module - common imports for carbon-calc users
//!
//! ```rust
//! use carbon_calc::prelude::*;
//! ```

pub use crate::{
    // Error types
    Error,
    // Formula types
    Formula,
    FormulaMetadata,
    // Main types
    FormulaRegistry,
    Result,
    ScopeValue,
    VariableScope,
};
