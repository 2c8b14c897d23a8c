//! Formula registry and evaluation engine
//!
//! Provides single-shot evaluation of a set of interdependent formulas:
//! dependency closure validation, topological scheduling, and in-order
//! evaluation against a shared write-once variable scope.
//!
//! # Example
//!
//! ```rust
//! use carbon_calc::prelude::*;
//!
//! let mut registry = FormulaRegistry::new([("a", 2.0), ("b", 5.0)]).unwrap();
//! registry.add_formula(Formula::new("f1", "a * b", ["a", "b"])).unwrap();
//! registry.add_formula(Formula::new("f2", "f1 + a", ["f1", "a"])).unwrap();
//!
//! registry.evaluate().unwrap();
//! assert_eq!(registry.get_variable("f1").unwrap(), 10.0);
//! assert_eq!(registry.get_variable("f2").unwrap(), 12.0);
//! ```

use crate::dependency::DependencyGraph;
use carbon_calc_core::{Error, Formula, Result, ScopeValue, VariableScope};
use indexmap::IndexMap;

/// Lifecycle state of a registry
///
/// Evaluation is an explicit one-way transition; a registry never returns to
/// the building state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistryState {
    Building,
    Evaluated,
}

/// The formula registry and evaluator
///
/// Owns the variable scope and the dependency graph. Constructed with a
/// frozen snapshot of input variables; formulas are then registered in any
/// order (forward references are fine) and evaluated exactly once. After
/// evaluation the registry is a read-only result set: inputs, formula
/// results, and ad-hoc scope-setup variables are all retrievable by name.
#[derive(Debug)]
pub struct FormulaRegistry {
    scope: VariableScope,
    formulas: IndexMap<String, Formula>,
    graph: DependencyGraph,
    order: Option<Vec<String>>,
    state: RegistryState,
}

impl FormulaRegistry {
    /// Create a registry over the given input variables
    ///
    /// Every entry is written into the scope immediately; a duplicate input
    /// name fails with [`Error::DuplicateVariable`].
    pub fn new<I, N, V>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<ScopeValue>,
    {
        let mut scope = VariableScope::new();
        for (name, value) in inputs {
            scope.set(name, value)?;
        }

        Ok(Self {
            scope,
            formulas: IndexMap::new(),
            graph: DependencyGraph::new(),
            order: None,
            state: RegistryState::Building,
        })
    }

    /// Register a formula
    ///
    /// Each dependency is classified now, against the scope's current
    /// contents: a name already present (an input variable) is satisfied
    /// externally and contributes no graph edge, anything else becomes an
    /// edge to this formula. Forward references to formulas registered later
    /// resolve at evaluation time.
    ///
    /// Fails with [`Error::DuplicateFormula`] on a repeated id and
    /// [`Error::AlreadyEvaluated`] once the registry has been evaluated.
    pub fn add_formula(&mut self, formula: Formula) -> Result<()> {
        if self.state == RegistryState::Evaluated {
            return Err(Error::AlreadyEvaluated);
        }
        if self.formulas.contains_key(&formula.id) {
            return Err(Error::DuplicateFormula(formula.id));
        }

        self.graph.add_node(&formula.id);
        for dependency in &formula.dependencies {
            if !self.scope.contains(dependency) {
                self.graph.add_edge(dependency, &formula.id);
            }
        }

        self.formulas.insert(formula.id.clone(), formula);
        Ok(())
    }

    /// Register every formula of an externally supplied catalogue
    pub fn add_formulas(&mut self, formulas: impl IntoIterator<Item = Formula>) -> Result<()> {
        for formula in formulas {
            self.add_formula(formula)?;
        }
        Ok(())
    }

    /// Evaluate every registered formula in dependency order
    ///
    /// Validates global dependency closure, computes the topological order,
    /// then evaluates each formula against the current scope, writing its
    /// result under its own id. Any failure aborts the whole call
    /// immediately; closure and cycle failures leave the scope untouched
    /// beyond the original inputs.
    ///
    /// Returns the value of the last formula in the computed order, as a
    /// convenience; [`get_all`](FormulaRegistry::get_all) is the generally
    /// useful result surface.
    pub fn evaluate(&mut self) -> Result<f64> {
        if self.state == RegistryState::Evaluated {
            return Err(Error::AlreadyEvaluated);
        }
        if self.formulas.is_empty() {
            return Err(Error::EmptyFormulaSet);
        }

        self.validate_closure()?;

        let order = self.graph.topo_order()?;
        log::debug!(
            "evaluating {} formulas in order: {:?}",
            self.graph.registered_count(),
            order
        );

        let mut last = 0.0;
        for id in &order {
            let Some(formula) = self.formulas.get(id) else {
                continue;
            };

            if let Some(setup) = &formula.setup {
                setup(&mut self.scope)?;
            }

            let value = carbon_calc_expr::evaluate_str(&formula.expression, &self.scope)
                .map_err(|e| Error::Expression {
                    formula: id.clone(),
                    message: e.to_string(),
                })?;

            self.scope.set(id.clone(), value)?;
            last = value;
        }

        self.order = Some(order);
        self.state = RegistryState::Evaluated;
        Ok(last)
    }

    /// Read a variable: an input, a formula result, or a setup variable
    pub fn get_variable(&self, name: &str) -> Result<f64> {
        self.scope.get(name)
    }

    /// The full name→number mapping, in insertion order
    pub fn get_all(&self) -> IndexMap<String, f64> {
        self.scope.get_all()
    }

    /// The evaluation order computed by a successful [`evaluate`](FormulaRegistry::evaluate)
    pub fn evaluation_order(&self) -> Option<&[String]> {
        self.order.as_deref()
    }

    /// Whether the registry has been evaluated
    pub fn is_evaluated(&self) -> bool {
        self.state == RegistryState::Evaluated
    }

    /// Number of registered formulas
    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }

    /// Every declared dependency must resolve to a registered formula or an
    /// existing scope variable. Fail-fast on the first violation.
    fn validate_closure(&self) -> Result<()> {
        for (id, formula) in &self.formulas {
            for dependency in &formula.dependencies {
                if !self.formulas.contains_key(dependency) && !self.scope.contains(dependency) {
                    log::error!(
                        "formula '{}' depends on '{}', which is neither a registered formula nor an input variable",
                        id,
                        dependency
                    );
                    return Err(Error::InvalidDependency {
                        formula: id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
