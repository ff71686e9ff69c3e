use std::collections::BTreeMap;
use std::fmt;

/// The result of one solve invocation. Produced once, never mutated.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Quantity for each decision variable, keyed by variable name.
    ///
    /// Every variable of the solved problem is present, including exact
    /// zeros. A name absent from this map was not part of the problem at
    /// all; absence never means "zero".
    pub assignment: BTreeMap<String, f64>,
    /// Objective value, present only when an assignment exists
    pub objective_value: Option<f64>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The solver gave up before reaching a conclusion (iteration or time
    /// limit, numerical failure)
    NotSolved,
    /// The solver returned an assignment of unknown quality
    Undefined,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::NotSolved => "NotSolved",
            SolutionStatus::Undefined => "Undefined",
        };
        f.write_str(s)
    }
}

impl Solution {
    pub fn optimal(assignment: BTreeMap<String, f64>, objective_value: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            assignment,
            objective_value: Some(objective_value),
        }
    }

    pub fn infeasible() -> Self {
        Self::terminal(SolutionStatus::Infeasible)
    }

    pub fn unbounded() -> Self {
        Self::terminal(SolutionStatus::Unbounded)
    }

    pub fn not_solved() -> Self {
        Self::terminal(SolutionStatus::NotSolved)
    }

    fn terminal(status: SolutionStatus) -> Self {
        Self {
            status,
            assignment: BTreeMap::new(),
            objective_value: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_carry_no_assignment() {
        for solution in [
            Solution::infeasible(),
            Solution::unbounded(),
            Solution::not_solved(),
        ] {
            assert!(solution.assignment.is_empty());
            assert!(solution.objective_value.is_none());
            assert!(!solution.is_optimal());
        }
    }

    #[test]
    fn optimal_keeps_zero_valued_variables() {
        let assignment =
            BTreeMap::from([("a".to_string(), 0.0), ("b".to_string(), 2.5)]);
        let solution = Solution::optimal(assignment, 7.5);

        assert!(solution.is_optimal());
        assert_eq!(solution.assignment.get("a"), Some(&0.0));
        assert_eq!(solution.objective_value, Some(7.5));
    }
}
