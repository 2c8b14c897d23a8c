//! Expression error types

use thiserror::Error;

/// Result type for expression operations
pub type ExprResult<T> = std::result::Result<T, ExprError>;

/// Errors that can occur during expression parsing or evaluation
#[derive(Debug, Error)]
pub enum ExprError {
    /// Expression parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier lookup against the variable scope failed
    #[error(transparent)]
    Scope(#[from] carbon_calc_core::Error),
}
