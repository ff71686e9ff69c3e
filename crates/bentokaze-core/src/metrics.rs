use std::collections::BTreeMap;

use bentokaze_lp::Solution;

use crate::catalog::IngredientCatalog;
use crate::error::DataIntegrityError;

/// Realized nutrient totals for a solved assignment, using the same
/// per-unit arithmetic the builder used for the matching constraints.
///
/// An assignment naming an ingredient unknown to the catalog, or a
/// requested nutrient outside the catalog's column set, is a
/// [`DataIntegrityError`]; totals are never silently zero-filled.
pub fn nutrition_totals<'n>(
    solution: &Solution,
    catalog: &IngredientCatalog,
    nutrients: impl IntoIterator<Item = &'n str>,
) -> Result<BTreeMap<String, f64>, DataIntegrityError> {
    let mut totals = BTreeMap::new();
    for nutrient in nutrients {
        if !catalog.nutrient_columns().contains(nutrient) {
            return Err(DataIntegrityError::UnknownNutrient(nutrient.to_string()));
        }
        let mut total = 0.0;
        for (name, &quantity) in &solution.assignment {
            total += catalog.nutrient_of(name, nutrient)? * quantity;
        }
        totals.insert(nutrient.to_string(), total);
    }
    Ok(totals)
}

/// Realized volume: quantity divided by category density, summed. Same
/// convention as the `TotalVolume` constraint.
pub fn total_volume(
    solution: &Solution,
    catalog: &IngredientCatalog,
) -> Result<f64, DataIntegrityError> {
    let mut volume = 0.0;
    for (name, &quantity) in &solution.assignment {
        volume += quantity / catalog.density_of(name)?;
    }
    Ok(volume)
}

/// Realized cost: unit price times quantity, summed. Equals the objective
/// value reported by the solver for an optimal assignment.
pub fn total_cost(
    solution: &Solution,
    catalog: &IngredientCatalog,
) -> Result<f64, DataIntegrityError> {
    let mut cost = 0.0;
    for (name, &quantity) in &solution.assignment {
        cost += catalog.unit_price_of(name)? * quantity;
    }
    Ok(cost)
}

/// Everything a reporting caller wants from an optimal solution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSummary {
    /// Totals for every nutrient column of the catalog
    pub nutrition: BTreeMap<String, f64>,
    pub total_volume: f64,
    pub total_cost: f64,
}

impl SolutionSummary {
    pub fn derive(
        solution: &Solution,
        catalog: &IngredientCatalog,
    ) -> Result<Self, DataIntegrityError> {
        Ok(Self {
            nutrition: nutrition_totals(
                solution,
                catalog,
                catalog.nutrient_columns().iter().map(String::as_str),
            )?,
            total_volume: total_volume(solution, catalog)?,
            total_cost: total_cost(solution, catalog)?,
        })
    }
}
