/// Represents a linear programming problem over named continuous variables.
///
/// Every variable has an implicit lower bound of zero and no upper bound.
/// Constraint coefficient rows are dense and aligned with `variables`, so
/// the same input always renders and solves identically.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Model name, used by the exporters
    pub name: String,
    /// Variable names, in definition order
    pub variables: Vec<String>,
    /// Objective function (costs)
    pub objective: Objective,
    /// Constraints, in insertion order
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (unique within a problem)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }
}

impl Problem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            objective: Objective {
                coefficients: Vec::new(),
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    /// Replaces the variable set. Resets nothing else; callers are expected
    /// to keep coefficient rows aligned with the new set.
    pub fn set_variables(&mut self, variables: Vec<String>) {
        self.variables = variables;
    }

    /// Replaces the objective. There is exactly one objective per problem;
    /// setting it twice keeps only the last.
    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective {
            coefficients,
            minimize,
        };
    }

    /// Adds a constraint, replacing any existing constraint with the same
    /// name in place. Constraint names are the identity that makes
    /// re-running a build against unchanged input yield an equal problem.
    pub fn upsert_constraint(
        &mut self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        op: ConstraintOp,
        rhs: f64,
    ) {
        let constraint = Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        };
        match self.constraints.iter_mut().find(|c| c.name == constraint.name) {
            Some(existing) => *existing = constraint,
            None => self.constraints.push(constraint),
        }
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}
