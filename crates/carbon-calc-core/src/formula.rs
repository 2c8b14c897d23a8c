//! Formula records and their documentation metadata

use crate::error::Result;
use crate::scope::VariableScope;
use std::fmt;

/// Callback run immediately before a formula is evaluated
///
/// May register additional ad-hoc variables (derived constants and the like)
/// into the scope; the write-once rule applies to those too.
pub type ScopeSetup = Box<dyn Fn(&mut VariableScope) -> Result<()> + Send>;

/// Documentation describing a formula
///
/// Carried for the benefit of whoever maintains the formula catalogue;
/// never consulted during evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaMetadata {
    /// Human-readable name
    pub name: String,
    /// What the formula computes
    pub explanation: String,
    /// Unit of the result (e.g. "tCO2e/yr")
    pub unit: String,
    /// Modeling assumptions baked into the expression
    pub assumptions: Vec<String>,
    /// Citations for constants and methodology
    pub sources: Vec<String>,
}

/// A named arithmetic expression plus its declared dependency names
///
/// Immutable once registered. Each dependency must name either another
/// registered formula or an input variable; the registry checks this before
/// evaluation.
pub struct Formula {
    /// Identifier, unique within a registry instance. The computed result is
    /// written into the scope under this name.
    pub id: String,
    /// Expression text in the arithmetic mini-language
    pub expression: String,
    /// Names this expression reads from the scope
    pub dependencies: Vec<String>,
    /// Optional scope-setup callback, run just before evaluation
    pub setup: Option<ScopeSetup>,
    /// Documentation-only metadata
    pub metadata: FormulaMetadata,
}

impl Formula {
    /// Create a formula with no setup callback and empty metadata
    pub fn new<I, D>(id: impl Into<String>, expression: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        Self {
            id: id.into(),
            expression: expression.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            setup: None,
            metadata: FormulaMetadata::default(),
        }
    }

    /// Attach a scope-setup callback
    pub fn with_setup(
        mut self,
        setup: impl Fn(&mut VariableScope) -> Result<()> + Send + 'static,
    ) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Attach documentation metadata
    pub fn with_metadata(mut self, metadata: FormulaMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("id", &self.id)
            .field("expression", &self.expression)
            .field("dependencies", &self.dependencies)
            .field("setup", &self.setup.is_some())
            .field("metadata", &self.metadata)
            .finish()
    }
}
