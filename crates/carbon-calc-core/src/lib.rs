//! # carbon-calc-core
//!
//! Core data structures for the carbon-calc formula engine:
//!
//! - [`VariableScope`] — the single shared, write-once namespace holding
//!   input variables and formula results
//! - [`Formula`] — a named arithmetic expression plus its declared
//!   dependency names and documentation metadata
//! - [`Error`] — the error taxonomy shared by the whole workspace

pub mod error;
pub mod formula;
pub mod scope;

pub use error::{Error, Result};
pub use formula::{Formula, FormulaMetadata, ScopeSetup};
pub use scope::{ScopeValue, VariableScope};
