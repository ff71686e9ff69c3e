use std::collections::BTreeMap;

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel, constraint,
    microlp, variable,
};

use crate::problem::{ConstraintOp, Problem};
use crate::solution::Solution;

/// Abstraction over an external LP solving engine.
///
/// Solving is a single blocking call. A non-`Optimal` status is a valid,
/// reportable outcome, not an error: the adapter never retries, never
/// relaxes constraints, and never leaks engine-specific status codes.
pub trait Solver {
    fn solve(&self, problem: &Problem) -> Solution;
}

/// Adapter over the `good_lp` modeling layer with its pure-Rust `microlp`
/// backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for GoodLpSolver {
    fn solve(&self, problem: &Problem) -> Solution {
        let mut vars = ProblemVariables::new();
        let handles: Vec<good_lp::Variable> = problem
            .variables
            .iter()
            .map(|name| vars.add(variable().min(0.0).name(name.clone())))
            .collect();

        let row = |coefficients: &[f64]| -> Expression {
            let mut expr = Expression::default();
            for (handle, &coeff) in handles.iter().zip(coefficients) {
                expr += coeff * *handle;
            }
            expr
        };

        let objective = row(&problem.objective.coefficients);
        let mut model = if problem.objective.minimize {
            vars.minimise(objective).using(microlp)
        } else {
            vars.maximise(objective).using(microlp)
        };

        for c in &problem.constraints {
            let expr = row(&c.coefficients);
            let bound = match c.op {
                ConstraintOp::Le => constraint!(expr <= c.rhs),
                ConstraintOp::Ge => constraint!(expr >= c.rhs),
                ConstraintOp::Eq => constraint!(expr == c.rhs),
            };
            model = model.with(bound);
        }

        match model.solve() {
            Ok(solved) => {
                let assignment: BTreeMap<String, f64> = problem
                    .variables
                    .iter()
                    .zip(&handles)
                    .map(|(name, handle)| (name.clone(), solved.value(*handle)))
                    .collect();
                let objective_value = handles
                    .iter()
                    .zip(&problem.objective.coefficients)
                    .map(|(handle, &coeff)| coeff * solved.value(*handle))
                    .sum();
                Solution::optimal(assignment, objective_value)
            }
            Err(ResolutionError::Infeasible) => Solution::infeasible(),
            Err(ResolutionError::Unbounded) => Solution::unbounded(),
            // iteration limits, numerical failures, anything the backend
            // could not classify
            Err(_) => Solution::not_solved(),
        }
    }
}

/// Test double that returns a fixed solution for every problem, so layers
/// downstream of the solver can be exercised without real LP solving.
#[derive(Debug, Clone)]
pub struct CannedSolver {
    solution: Solution,
}

impl CannedSolver {
    pub fn new(solution: Solution) -> Self {
        Self { solution }
    }
}

impl Solver for CannedSolver {
    fn solve(&self, _problem: &Problem) -> Solution {
        self.solution.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::SolutionStatus;

    #[test]
    fn solves_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = Problem::new("test");
        problem.set_variables(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.upsert_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.upsert_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.upsert_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = GoodLpSolver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.assignment["x"] - 3.0).abs() < 1e-6);
        assert!((solution.assignment["y"] - 1.0).abs() < 1e-6);
        assert!((solution.objective_value.unwrap() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn assignment_covers_every_variable() {
        let mut problem = Problem::new("test");
        problem.set_variables(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![1.0, 1.0], true);
        problem.upsert_constraint("x_min", vec![1.0, 0.0], ConstraintOp::Ge, 2.0);

        let solution = GoodLpSolver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        // y is zero at optimum but still reported
        assert_eq!(solution.assignment.len(), 2);
        assert!(solution.assignment["y"].abs() < 1e-9);
    }

    #[test]
    fn reports_infeasible_with_empty_assignment() {
        let mut problem = Problem::new("test");
        problem.set_variables(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.upsert_constraint("floor", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.upsert_constraint("cap", vec![1.0], ConstraintOp::Le, 1.0);

        let solution = GoodLpSolver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.assignment.is_empty());
        assert!(solution.objective_value.is_none());
    }

    #[test]
    fn reports_unbounded() {
        // Maximize x with no upper bound
        let mut problem = Problem::new("test");
        problem.set_variables(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.upsert_constraint("floor", vec![1.0], ConstraintOp::Ge, 0.0);

        let solution = GoodLpSolver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert!(solution.assignment.is_empty());
    }

    #[test]
    fn canned_solver_returns_fixed_solution() {
        let canned = CannedSolver::new(Solution::infeasible());
        let problem = Problem::new("ignored");

        assert_eq!(canned.solve(&problem), Solution::infeasible());
    }
}
