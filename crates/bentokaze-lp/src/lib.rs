mod export;
mod problem;
mod solution;
mod solver;

pub use export::{ExportFormat, UnsupportedFormatError, export};
pub use problem::{Constraint, ConstraintOp, Objective, Problem};
pub use solution::{Solution, SolutionStatus};
pub use solver::{CannedSolver, GoodLpSolver, Solver};
