use std::collections::HashSet;

use bentokaze_lp::{ConstraintOp, Problem};

use crate::catalog::IngredientCatalog;
use crate::error::{BuildError, DataIntegrityError, DuplicateVariableError};
use crate::events::{Event, EventSink};
use crate::target::{ComparisonOp, TargetSpec};

/// Assembles the bento optimization problem from a catalog and a target
/// specification.
///
/// Operations are idempotent and independently callable: constraints are
/// keyed by name inside the problem, so re-running any step against
/// unchanged input replaces rather than duplicates, and two builds from
/// the same input yield equal problems. The conventional pipeline is
/// variables, nutrient constraints, volume constraint, category mass
/// constraints, objective.
pub struct ModelBuilder<'a> {
    catalog: &'a IngredientCatalog,
    problem: Problem,
    sink: Option<&'a mut dyn EventSink>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(catalog: &'a IngredientCatalog) -> Self {
        Self {
            catalog,
            problem: Problem::new("bentokaze"),
            sink: None,
        }
    }

    /// Attaches a sink receiving structured build-progress events.
    pub fn with_sink(mut self, sink: &'a mut dyn EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    fn emit(&mut self, event: Event) {
        if let Some(sink) = self.sink.as_mut() {
            sink.emit(event);
        }
    }

    /// Creates one continuous decision variable per ingredient, lower
    /// bound zero, identified by the ingredient name. The catalog already
    /// guarantees unique names; a duplicate here means the catalog
    /// invariant was bypassed and the model must not be built.
    pub fn define_variables(&mut self) -> Result<(), DuplicateVariableError> {
        let mut seen = HashSet::new();
        let mut variables = Vec::with_capacity(self.catalog.len());
        for name in self.catalog.names() {
            if !seen.insert(name) {
                return Err(DuplicateVariableError(name.to_string()));
            }
            variables.push(name.to_string());
        }
        let count = variables.len();
        self.problem.set_variables(variables);
        self.emit(Event::VariablesDefined { count });
        Ok(())
    }

    fn ensure_variables(&mut self) -> Result<(), DuplicateVariableError> {
        if self.problem.variables.is_empty() {
            self.define_variables()?;
        }
        Ok(())
    }

    fn upsert(&mut self, name: String, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.problem
            .upsert_constraint(name.clone(), coefficients, op, rhs);
        self.emit(Event::ConstraintAdded { name });
    }

    /// Adds one `Total<Nutrient>` constraint per target nutrient:
    /// the nutrient-weighted sum of quantities compared to the target
    /// with the nutrient's declared operator.
    ///
    /// A target nutrient with no column in the catalog is a
    /// [`DataIntegrityError`]; treating it as zero contribution would
    /// mask a data error.
    pub fn add_nutrient_constraints(&mut self, spec: &TargetSpec) -> Result<(), BuildError> {
        spec.validate()?;
        self.ensure_variables()?;

        for (nutrient, &target) in &spec.targets {
            if !self.catalog.nutrient_columns().contains(nutrient) {
                return Err(DataIntegrityError::UnknownNutrient(nutrient.clone()).into());
            }
            let coefficients = self
                .catalog
                .names()
                .map(|name| self.catalog.nutrient_of(name, nutrient))
                .collect::<Result<Vec<_>, _>>()?;
            // validate() guarantees the operator exists
            let op = match spec.operators[nutrient] {
                ComparisonOp::Ge => ConstraintOp::Ge,
                ComparisonOp::Le => ConstraintOp::Le,
            };
            self.upsert(constraint_label(nutrient), coefficients, op, target);
        }
        Ok(())
    }

    /// Adds the `TotalVolume` constraint: the sum of each quantity divided
    /// by its category's density must not exceed `max_volume`.
    ///
    /// Quantities are masses and density is mass per volume, so volume is
    /// quantity / density. Multiplying here instead would silently change
    /// the constraint's physical meaning.
    pub fn add_volume_constraint(&mut self, max_volume: f64) -> Result<(), BuildError> {
        if max_volume < 0.0 {
            return Err(crate::error::ConfigurationError::NegativeVolume(max_volume).into());
        }
        self.ensure_variables()?;

        let coefficients = self
            .catalog
            .names()
            .map(|name| self.catalog.density_of(name).map(|d| 1.0 / d))
            .collect::<Result<Vec<_>, _>>()?;
        self.upsert(
            "TotalVolume".to_string(),
            coefficients,
            ConstraintOp::Le,
            max_volume,
        );
        Ok(())
    }

    /// Adds one `MinMass_<category>` constraint per distinct category:
    /// the summed mass of the category's ingredients must reach
    /// `min_mass`. Every category comes from the catalog itself, so no
    /// empty sums can occur.
    pub fn add_category_mass_constraints(&mut self, min_mass: f64) -> Result<(), BuildError> {
        if min_mass < 0.0 {
            return Err(crate::error::ConfigurationError::NegativeMass(min_mass).into());
        }
        self.ensure_variables()?;

        for category in self.catalog.categories().to_vec() {
            let coefficients = self
                .catalog
                .names()
                .map(|name| {
                    self.catalog
                        .category_of(name)
                        .map(|c| if c == category { 1.0 } else { 0.0 })
                })
                .collect::<Result<Vec<_>, _>>()?;
            self.upsert(
                format!("MinMass_{category}"),
                coefficients,
                ConstraintOp::Ge,
                min_mass,
            );
        }
        Ok(())
    }

    /// Sets the single objective: minimize the price-weighted sum of
    /// quantities. Calling this twice replaces the objective.
    pub fn set_objective(&mut self) -> Result<(), BuildError> {
        self.ensure_variables()?;
        let coefficients = self
            .catalog
            .names()
            .map(|name| self.catalog.unit_price_of(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.set_objective(coefficients, true);
        self.emit(Event::ObjectiveSet {
            variables: self.problem.num_variables(),
        });
        Ok(())
    }

    /// Finishes assembly and hands the problem to the caller.
    pub fn build(self) -> Problem {
        self.problem
    }

    /// Runs the conventional full pipeline in one call.
    pub fn build_full(catalog: &IngredientCatalog, spec: &TargetSpec) -> Result<Problem, BuildError> {
        let mut builder = ModelBuilder::new(catalog);
        builder.define_variables()?;
        builder.add_nutrient_constraints(spec)?;
        builder.add_volume_constraint(spec.max_volume)?;
        builder.add_category_mass_constraints(spec.min_mass_per_category)?;
        builder.set_objective()?;
        Ok(builder.build())
    }
}

/// `fat` -> `TotalFat`, `protein` -> `TotalProtein`
fn constraint_label(nutrient: &str) -> String {
    let mut chars = nutrient.chars();
    match chars.next() {
        Some(first) => format!("Total{}{}", first.to_uppercase(), chars.as_str()),
        None => "Total".to_string(),
    }
}
