//! Example: Evaluate an energy-project impact catalogue
//!
//! The formula catalogue here stands in for the externally maintained one in
//! a real deployment; the engine itself knows nothing about wind farms.

use carbon_calc::prelude::*;

fn catalogue() -> Vec<Formula> {
    vec![
        Formula::new(
            "annual_generation_mwh",
            "capacity_mw * hours_per_year * capacity_factor",
            ["capacity_mw", "capacity_factor"],
        )
        .with_setup(|scope| scope.set("hours_per_year", 8760.0))
        .with_metadata(FormulaMetadata {
            name: "Annual generation".into(),
            explanation: "Electricity generated per year at the stated capacity factor".into(),
            unit: "MWh/yr".into(),
            assumptions: vec!["No curtailment".into()],
            sources: vec![],
        }),
        Formula::new(
            "displaced_tco2e",
            "annual_generation_mwh * grid_emission_rate",
            ["annual_generation_mwh", "grid_emission_rate"],
        )
        .with_metadata(FormulaMetadata {
            name: "Displaced emissions".into(),
            explanation: "Grid emissions avoided by the project's generation".into(),
            unit: "tCO2e/yr".into(),
            assumptions: vec!["Marginal emission rate equals average rate".into()],
            sources: vec!["eGRID subregion annual output emission rates".into()],
        }),
        Formula::new(
            "lifetime_tco2e",
            "displaced_tco2e * project_lifetime_yr",
            ["displaced_tco2e", "project_lifetime_yr"],
        )
        .with_metadata(FormulaMetadata {
            name: "Lifetime displaced emissions".into(),
            unit: "tCO2e".into(),
            ..Default::default()
        }),
        Formula::new(
            "homes_equivalent",
            "homes_mwh_per_yr > 0 ? annual_generation_mwh / homes_mwh_per_yr : 0",
            ["annual_generation_mwh", "homes_mwh_per_yr"],
        )
        .with_metadata(FormulaMetadata {
            name: "Homes powered".into(),
            explanation: "Average homes whose annual consumption the generation covers".into(),
            unit: "homes".into(),
            ..Default::default()
        }),
    ]
}

fn main() -> Result<()> {
    // User-submitted project parameters plus reference-dataset constants
    let mut registry = FormulaRegistry::new([
        ("capacity_mw", 50.0),
        ("capacity_factor", 0.35),
        ("grid_emission_rate", 0.7),
        ("project_lifetime_yr", 25.0),
        ("homes_mwh_per_yr", 10.5),
    ])?;

    let catalogue = catalogue();
    let units: Vec<(String, String)> = catalogue
        .iter()
        .map(|f| (f.id.clone(), f.metadata.unit.clone()))
        .collect();

    registry.add_formulas(catalogue)?;
    registry.evaluate()?;

    println!("Evaluation order: {:?}\n", registry.evaluation_order());

    println!("Results:");
    for (id, unit) in &units {
        println!("  {:<24} {:>14.1} {}", id, registry.get_variable(id)?, unit);
    }

    Ok(())
}
