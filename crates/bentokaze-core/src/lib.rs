pub mod builder;
pub mod catalog;
pub mod error;
pub mod events;
pub mod metrics;
pub mod target;

pub use builder::ModelBuilder;
pub use catalog::{IngredientCatalog, IngredientRecord};
pub use error::{
    BuildError, ConfigurationError, DataIntegrityError, DuplicateVariableError,
};
pub use events::{Event, EventSink, NullSink};
pub use metrics::{SolutionSummary, nutrition_totals, total_cost, total_volume};
pub use target::{ComparisonOp, TargetSpec};
