//! Error types for carbon-calc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or evaluating a formula set
///
/// All variants indicate an invalid formula set or misuse of the API, not
/// transient environmental failure; none should be retried.
#[derive(Debug, Error)]
pub enum Error {
    /// A formula id was registered twice
    #[error("Formula already registered: {0}")]
    DuplicateFormula(String),

    /// A variable name was written twice
    #[error("Variable already defined: {0}")]
    DuplicateVariable(String),

    /// A variable name was read but never written
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A formula declares a dependency that names neither a registered
    /// formula nor an existing input variable
    #[error("Formula '{formula}' depends on '{dependency}', which is neither a registered formula nor an input variable")]
    InvalidDependency { formula: String, dependency: String },

    /// The formula-to-formula dependency graph contains a cycle
    #[error("Cyclic dependency among formulas: {}", unresolved.join(", "))]
    CyclicDependency { unresolved: Vec<String> },

    /// Evaluation was requested with no formulas registered
    #[error("No formulas registered")]
    EmptyFormulaSet,

    /// The registry has already been evaluated; evaluation is single-shot
    #[error("Registry has already been evaluated")]
    AlreadyEvaluated,

    /// A formula's expression failed to parse or evaluate
    #[error("Expression error in formula '{formula}': {message}")]
    Expression { formula: String, message: String },
}
