use thiserror::Error;

/// Broken invariants in the input data: missing or duplicate keys, a
/// category without a density entry, a nutrient without a column, an empty
/// catalog. These abort catalog or model construction immediately; a
/// silently dropped ingredient would change the feasible region without
/// warning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataIntegrityError {
    #[error("duplicate ingredient '{0}'")]
    DuplicateIngredient(String),
    #[error("ingredient '{name}' has category '{category}' with no density entry")]
    UnknownCategory { name: String, category: String },
    #[error("density for category '{category}' must be positive, got {density}")]
    NonPositiveDensity { category: String, density: f64 },
    #[error("ingredient '{name}' is missing nutrient column '{nutrient}'")]
    MissingNutrient { name: String, nutrient: String },
    #[error("ingredient '{name}' has negative unit price {price}")]
    NegativePrice { name: String, price: f64 },
    #[error("catalog contains no ingredients")]
    EmptyCatalog,
    #[error("unknown ingredient '{0}'")]
    UnknownIngredient(String),
    #[error("nutrient '{0}' is not a column of the ingredient table")]
    UnknownNutrient(String),
}

/// Invalid target specification, as opposed to invalid ingredient data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unsupported comparison operator '{0}' (expected \">=\" or \"<=\")")]
    UnsupportedOperator(String),
    #[error("target nutrient '{0}' has no comparison operator")]
    MissingOperator(String),
    #[error("operator given for nutrient '{0}' but no target value")]
    MissingTarget(String),
    #[error("max_volume must be non-negative, got {0}")]
    NegativeVolume(f64),
    #[error("min_mass_per_category must be non-negative, got {0}")]
    NegativeMass(f64),
}

/// Two decision variables would share an identity. The catalog already
/// guarantees unique names; the builder defends against it anyway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("decision variable '{0}' already defined")]
pub struct DuplicateVariableError(pub String);

/// Umbrella error for model construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Data(#[from] DataIntegrityError),
    #[error(transparent)]
    Config(#[from] ConfigurationError),
    #[error(transparent)]
    DuplicateVariable(#[from] DuplicateVariableError),
}
