//! Tests for registry evaluation across the whole engine

use carbon_calc::prelude::*;

fn sum_and_double() -> Vec<Formula> {
    vec![
        Formula::new("sum", "a + b", ["a", "b"]),
        Formula::new("double", "sum * 2", ["sum"]),
    ]
}

/// For a fixed input mapping and formula set, fresh instances always yield
/// identical output values
#[test]
fn test_determinism() {
    let run = || {
        let mut registry = FormulaRegistry::new([("a", 3.0), ("b", 4.0)]).unwrap();
        registry.add_formulas(sum_and_double()).unwrap();
        registry.evaluate().unwrap();
        registry.get_all().into_iter().collect::<Vec<_>>()
    };

    let first = run();
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

/// Every dependency appears strictly before its dependents in the computed
/// evaluation order
#[test]
fn test_topological_validity() {
    let mut registry = FormulaRegistry::new([("base", 1.0)]).unwrap();
    // Registered in reverse dependency order on purpose
    registry
        .add_formula(Formula::new("d", "c + b", ["c", "b"]))
        .unwrap();
    registry
        .add_formula(Formula::new("c", "b * 2", ["b"]))
        .unwrap();
    registry
        .add_formula(Formula::new("b", "base + 1", ["base"]))
        .unwrap();

    registry.evaluate().unwrap();

    let order = registry.evaluation_order().unwrap();
    let position = |id: &str| order.iter().position(|o| o == id).unwrap();
    assert!(position("b") < position("c"));
    assert!(position("b") < position("d"));
    assert!(position("c") < position("d"));

    assert_eq!(registry.get_variable("d").unwrap(), 6.0);
}

/// A dependency cycle is rejected and no formula results are written
#[test]
fn test_cycle_rejection() {
    let mut registry = FormulaRegistry::new([("input", 1.0)]).unwrap();
    registry
        .add_formula(Formula::new("a", "b + 1", ["b"]))
        .unwrap();
    registry
        .add_formula(Formula::new("b", "a + 1", ["a"]))
        .unwrap();

    let err = registry.evaluate().unwrap_err();
    assert!(matches!(err, Error::CyclicDependency { .. }));

    // Only the original inputs remain retrievable
    let all = registry.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all["input"], 1.0);
    assert!(matches!(
        registry.get_variable("a"),
        Err(Error::UnknownVariable(_))
    ));
}

/// A dependency naming neither a formula nor an input is rejected before any
/// evaluation occurs
#[test]
fn test_unknown_dependency_rejection() {
    let mut registry = FormulaRegistry::new([("a", 1.0)]).unwrap();
    registry
        .add_formula(Formula::new("ok", "a * 2", ["a"]))
        .unwrap();
    registry
        .add_formula(Formula::new("bad", "nope + 1", ["nope"]))
        .unwrap();

    let err = registry.evaluate().unwrap_err();
    match err {
        Error::InvalidDependency {
            formula,
            dependency,
        } => {
            assert_eq!(formula, "bad");
            assert_eq!(dependency, "nope");
        }
        other => panic!("Expected InvalidDependency, got {:?}", other),
    }

    // Fail-fast: nothing was evaluated, not even the valid formula
    assert!(matches!(
        registry.get_variable("ok"),
        Err(Error::UnknownVariable(_))
    ));
}

/// A formula id colliding with an existing variable name trips the
/// write-once rule when its result is written
#[test]
fn test_write_once_enforcement() {
    let mut registry = FormulaRegistry::new([("rate", 0.5)]).unwrap();
    registry
        .add_formula(Formula::new("rate", "1 + 1", [] as [&str; 0]))
        .unwrap();

    let err = registry.evaluate().unwrap_err();
    assert!(matches!(err, Error::DuplicateVariable(name) if name == "rate"));
}

/// Registering a dependent before its dependency still evaluates correctly
#[test]
fn test_order_independence_of_registration() {
    let mut registry = FormulaRegistry::new([("a", 3.0), ("b", 4.0)]).unwrap();
    // "double" forward-references "sum"
    registry
        .add_formula(Formula::new("double", "sum * 2", ["sum"]))
        .unwrap();
    registry
        .add_formula(Formula::new("sum", "a + b", ["a", "b"]))
        .unwrap();

    registry.evaluate().unwrap();

    assert_eq!(registry.get_variable("sum").unwrap(), 7.0);
    assert_eq!(registry.get_variable("double").unwrap(), 14.0);
}

/// The worked end-to-end example: inputs {a:2, b:5}, f1 = a*b, f2 = f1+a
#[test]
fn test_end_to_end_example() {
    let mut registry = FormulaRegistry::new([("a", 2.0), ("b", 5.0)]).unwrap();
    registry
        .add_formula(Formula::new("f1", "a * b", ["a", "b"]))
        .unwrap();
    registry
        .add_formula(Formula::new("f2", "f1 + a", ["f1", "a"]))
        .unwrap();

    let last = registry.evaluate().unwrap();
    assert_eq!(last, 12.0);

    let all = registry.get_all();
    assert_eq!(all["f1"], 10.0);
    assert_eq!(all["f2"], 12.0);
}

/// A registry with inputs only rejects evaluation
#[test]
fn test_empty_set_rejection() {
    let mut registry = FormulaRegistry::new([("a", 1.0)]).unwrap();
    assert!(matches!(registry.evaluate(), Err(Error::EmptyFormulaSet)));
}

/// Evaluation is single-shot: the second call fails explicitly, as does any
/// further registration
#[test]
fn test_single_shot_lifecycle() {
    let mut registry = FormulaRegistry::new([("a", 1.0)]).unwrap();
    registry
        .add_formula(Formula::new("f", "a * 2", ["a"]))
        .unwrap();

    assert!(!registry.is_evaluated());
    registry.evaluate().unwrap();
    assert!(registry.is_evaluated());

    assert!(matches!(registry.evaluate(), Err(Error::AlreadyEvaluated)));
    assert!(matches!(
        registry.add_formula(Formula::new("g", "a * 3", ["a"])),
        Err(Error::AlreadyEvaluated)
    ));

    // Results stay readable after the failed reuse attempts
    assert_eq!(registry.get_variable("f").unwrap(), 2.0);
}

/// A dependency whose name matches an input variable is classified as a
/// root at registration time, even when a later-registered formula carries
/// the same name. The consumer reads the input; the shadowing formula then
/// trips the write-once rule when its own result is written.
#[test]
fn test_input_shadowing_resolved_at_registration_time() {
    let mut registry = FormulaRegistry::new([("x", 1.0)]).unwrap();
    registry
        .add_formula(Formula::new("f", "x * 10", ["x"]))
        .unwrap();
    registry
        .add_formula(Formula::new("x", "42", [] as [&str; 0]))
        .unwrap();

    let err = registry.evaluate().unwrap_err();
    assert!(matches!(err, Error::DuplicateVariable(name) if name == "x"));

    // "f" carried no edge to the formula "x", so it was scheduled first and
    // read the input value before the collision aborted the run
    assert_eq!(registry.get_variable("f").unwrap(), 10.0);
}

/// Scope-setup callbacks add ad-hoc variables to the shared namespace
#[test]
fn test_scope_setup_variables() {
    let mut registry = FormulaRegistry::new([("capacity_mw", 50.0)]).unwrap();
    registry
        .add_formula(
            Formula::new(
                "annual_mwh",
                "capacity_mw * hours_per_year",
                ["capacity_mw"],
            )
            .with_setup(|scope| scope.set("hours_per_year", 8760.0)),
        )
        .unwrap();

    registry.evaluate().unwrap();

    assert_eq!(registry.get_variable("annual_mwh").unwrap(), 438000.0);
    // The setup variable shares the namespace and stays retrievable
    assert_eq!(registry.get_variable("hours_per_year").unwrap(), 8760.0);
}

/// A setup callback may not overwrite an existing name
#[test]
fn test_scope_setup_cannot_overwrite() {
    let mut registry = FormulaRegistry::new([("k", 1.0)]).unwrap();
    registry
        .add_formula(
            Formula::new("f", "k * 2", ["k"]).with_setup(|scope| scope.set("k", 99.0)),
        )
        .unwrap();

    let err = registry.evaluate().unwrap_err();
    assert!(matches!(err, Error::DuplicateVariable(name) if name == "k"));
}

/// get_all returns inputs first, then formula results, in a deterministic
/// insertion order
#[test]
fn test_get_all_order() {
    let mut registry = FormulaRegistry::new([("a", 3.0), ("b", 4.0)]).unwrap();
    registry.add_formulas(sum_and_double()).unwrap();
    registry.evaluate().unwrap();

    let all = registry.get_all();
    let names: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a", "b", "sum", "double"]);
}

/// Expressions draw on the full mini-language: ternary guards, powers, and
/// scientific notation
#[test]
fn test_mini_language_in_formulas() {
    let mut registry = FormulaRegistry::new([("measured", -3.0), ("scale", 2.0)]).unwrap();
    registry
        .add_formula(Formula::new(
            "clamped",
            "measured > 0 ? measured : 0",
            ["measured"],
        ))
        .unwrap();
    registry
        .add_formula(Formula::new(
            "scaled",
            "(clamped + 1) * scale ^ 3 * 1e-1",
            ["clamped", "scale"],
        ))
        .unwrap();

    registry.evaluate().unwrap();

    assert_eq!(registry.get_variable("clamped").unwrap(), 0.0);
    assert_eq!(registry.get_variable("scaled").unwrap(), 0.8);
}
