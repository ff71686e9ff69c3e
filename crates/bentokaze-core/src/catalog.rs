use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::DataIntegrityError;

/// One row of the joined item/nutrition/price tables, keyed by `name`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRecord {
    pub name: String,
    pub category: String,
    /// Nutrient amount per unit of mass, keyed by nutrient name
    pub nutrients: BTreeMap<String, f64>,
    pub unit_price: f64,
}

/// Immutable, validated view of the ingredient data.
///
/// Construction checks every invariant the model builder relies on:
/// unique ingredient names, a positive density for every category, one
/// consistent nutrient column set across all ingredients, non-negative
/// prices, and at least one ingredient. After that, lookups can only fail
/// for keys that were never in the catalog.
#[derive(Debug, Clone)]
pub struct IngredientCatalog {
    /// Records in input order; this order is the variable order of every
    /// problem built from the catalog.
    records: Vec<IngredientRecord>,
    index: HashMap<String, usize>,
    /// Density (mass per volume) per category
    densities: BTreeMap<String, f64>,
    /// Distinct categories, in first-appearance order
    categories: Vec<String>,
    /// Union of nutrient columns; every record carries all of them
    nutrient_columns: BTreeSet<String>,
}

impl IngredientCatalog {
    pub fn new(
        records: Vec<IngredientRecord>,
        densities: BTreeMap<String, f64>,
    ) -> Result<Self, DataIntegrityError> {
        // An empty catalog would build a vacuous problem with zero
        // variables; reject it before it can look "solved".
        if records.is_empty() {
            return Err(DataIntegrityError::EmptyCatalog);
        }

        for (category, &density) in &densities {
            if density <= 0.0 {
                return Err(DataIntegrityError::NonPositiveDensity {
                    category: category.clone(),
                    density,
                });
            }
        }

        let mut index = HashMap::with_capacity(records.len());
        let mut categories = Vec::new();
        let mut nutrient_columns = BTreeSet::new();

        for (i, record) in records.iter().enumerate() {
            if index.insert(record.name.clone(), i).is_some() {
                return Err(DataIntegrityError::DuplicateIngredient(record.name.clone()));
            }
            if !densities.contains_key(&record.category) {
                return Err(DataIntegrityError::UnknownCategory {
                    name: record.name.clone(),
                    category: record.category.clone(),
                });
            }
            if record.unit_price < 0.0 {
                return Err(DataIntegrityError::NegativePrice {
                    name: record.name.clone(),
                    price: record.unit_price,
                });
            }
            if !categories.contains(&record.category) {
                categories.push(record.category.clone());
            }
            nutrient_columns.extend(record.nutrients.keys().cloned());
        }

        // The column set is the union over all records; a record missing
        // one of those columns is a join error, not an implicit zero.
        for record in &records {
            for column in &nutrient_columns {
                if !record.nutrients.contains_key(column) {
                    return Err(DataIntegrityError::MissingNutrient {
                        name: record.name.clone(),
                        nutrient: column.clone(),
                    });
                }
            }
        }

        Ok(Self {
            records,
            index,
            densities,
            categories,
            nutrient_columns,
        })
    }

    fn record(&self, name: &str) -> Result<&IngredientRecord, DataIntegrityError> {
        self.index
            .get(name)
            .map(|&i| &self.records[i])
            .ok_or_else(|| DataIntegrityError::UnknownIngredient(name.to_string()))
    }

    /// Ingredient names, in input order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn nutrient_of(&self, name: &str, nutrient: &str) -> Result<f64, DataIntegrityError> {
        let record = self.record(name)?;
        record
            .nutrients
            .get(nutrient)
            .copied()
            .ok_or_else(|| DataIntegrityError::UnknownNutrient(nutrient.to_string()))
    }

    pub fn category_of(&self, name: &str) -> Result<&str, DataIntegrityError> {
        Ok(self.record(name)?.category.as_str())
    }

    /// Density of the ingredient's category. Positive by construction.
    pub fn density_of(&self, name: &str) -> Result<f64, DataIntegrityError> {
        let record = self.record(name)?;
        self.densities
            .get(&record.category)
            .copied()
            .ok_or_else(|| DataIntegrityError::UnknownCategory {
                name: record.name.clone(),
                category: record.category.clone(),
            })
    }

    pub fn unit_price_of(&self, name: &str) -> Result<f64, DataIntegrityError> {
        Ok(self.record(name)?.unit_price)
    }

    /// Distinct categories, in first-appearance order
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn nutrient_columns(&self) -> &BTreeSet<String> {
        &self.nutrient_columns
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        name: &str,
        category: &str,
        nutrients: &[(&str, f64)],
        unit_price: f64,
    ) -> IngredientRecord {
        IngredientRecord {
            name: name.to_string(),
            category: category.to_string(),
            nutrients: nutrients
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            unit_price,
        }
    }

    fn densities(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let result = IngredientCatalog::new(Vec::new(), densities(&[("x", 1.0)]));
        assert_eq!(result.unwrap_err(), DataIntegrityError::EmptyCatalog);
    }

    #[test]
    fn duplicate_ingredient_is_rejected() {
        let result = IngredientCatalog::new(
            vec![
                record("tofu", "x", &[("fat", 1.0)], 1.0),
                record("tofu", "x", &[("fat", 2.0)], 2.0),
            ],
            densities(&[("x", 1.0)]),
        );
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::DuplicateIngredient("tofu".to_string())
        );
    }

    #[test]
    fn category_without_density_is_rejected() {
        let result = IngredientCatalog::new(
            vec![record("tofu", "mystery", &[("fat", 1.0)], 1.0)],
            densities(&[("x", 1.0)]),
        );
        assert!(matches!(
            result.unwrap_err(),
            DataIntegrityError::UnknownCategory { category, .. } if category == "mystery"
        ));
    }

    #[test]
    fn non_positive_density_is_rejected() {
        let result = IngredientCatalog::new(
            vec![record("tofu", "x", &[("fat", 1.0)], 1.0)],
            densities(&[("x", 0.0)]),
        );
        assert!(matches!(
            result.unwrap_err(),
            DataIntegrityError::NonPositiveDensity { density, .. } if density == 0.0
        ));
    }

    #[test]
    fn inconsistent_nutrient_columns_are_rejected() {
        let result = IngredientCatalog::new(
            vec![
                record("tofu", "x", &[("fat", 1.0), ("protein", 8.0)], 1.0),
                record("rice", "x", &[("fat", 0.5)], 1.0),
            ],
            densities(&[("x", 1.0)]),
        );
        assert_eq!(
            result.unwrap_err(),
            DataIntegrityError::MissingNutrient {
                name: "rice".to_string(),
                nutrient: "protein".to_string(),
            }
        );
    }

    #[test]
    fn lookups_and_orders() {
        let catalog = IngredientCatalog::new(
            vec![
                record("tofu", "protein_src", &[("fat", 2.0)], 1.0),
                record("rice", "staple", &[("fat", 0.1)], 0.5),
                record("natto", "protein_src", &[("fat", 1.0)], 2.0),
            ],
            densities(&[("protein_src", 1.2), ("staple", 0.8)]),
        )
        .unwrap();

        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["tofu", "rice", "natto"]
        );
        assert_eq!(catalog.categories(), ["protein_src", "staple"]);
        assert_eq!(catalog.nutrient_of("rice", "fat").unwrap(), 0.1);
        assert_eq!(catalog.density_of("rice").unwrap(), 0.8);
        assert_eq!(catalog.unit_price_of("natto").unwrap(), 2.0);
        assert_eq!(catalog.category_of("tofu").unwrap(), "protein_src");

        assert_eq!(
            catalog.nutrient_of("miso", "fat").unwrap_err(),
            DataIntegrityError::UnknownIngredient("miso".to_string())
        );
        assert_eq!(
            catalog.nutrient_of("tofu", "fiber").unwrap_err(),
            DataIntegrityError::UnknownNutrient("fiber".to_string())
        );
    }
}
