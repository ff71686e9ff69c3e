use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;

use crate::problem::{Constraint, ConstraintOp, Problem};

/// Solver-interchange text formats supported by [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// CPLEX LP text format
    Lp,
    /// MPS text format (free form)
    Mps,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported export format '{0}' (expected \"lp\" or \"mps\")")]
pub struct UnsupportedFormatError(pub String);

impl FromStr for ExportFormat {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lp" => Ok(ExportFormat::Lp),
            "mps" => Ok(ExportFormat::Mps),
            other => Err(UnsupportedFormatError(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Lp => "lp",
            ExportFormat::Mps => "mps",
        }
    }
}

/// Renders a problem to solver-interchange text.
///
/// Pure transform: no I/O, and equal problems always render to identical
/// bytes. Every constraint appears under its assigned name and every
/// variable appears exactly once in the bounds/columns section, even when
/// all of its coefficients are zero.
pub fn export(problem: &Problem, format: ExportFormat) -> String {
    match format {
        ExportFormat::Lp => write_lp(problem),
        ExportFormat::Mps => write_mps(problem),
    }
}

/// Shortest round-trip rendering; `2.0` prints as `2`, `0.5` as `0.5`.
fn fmt_num(value: f64) -> String {
    format!("{value}")
}

fn write_terms(out: &mut String, variables: &[String], coefficients: &[f64]) {
    let mut first = true;
    for (name, &coeff) in variables.iter().zip(coefficients) {
        if coeff == 0.0 {
            continue;
        }
        if first {
            if coeff < 0.0 {
                let _ = write!(out, "- {} {}", fmt_num(-coeff), name);
            } else {
                let _ = write!(out, "{} {}", fmt_num(coeff), name);
            }
            first = false;
        } else if coeff < 0.0 {
            let _ = write!(out, " - {} {}", fmt_num(-coeff), name);
        } else {
            let _ = write!(out, " + {} {}", fmt_num(coeff), name);
        }
    }
    if first {
        out.push('0');
    }
}

fn write_lp(problem: &Problem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\* {} *\\", problem.name);
    out.push_str(if problem.objective.minimize {
        "Minimize\n"
    } else {
        "Maximize\n"
    });
    out.push_str("OBJ: ");
    write_terms(&mut out, &problem.variables, &problem.objective.coefficients);
    out.push('\n');

    out.push_str("Subject To\n");
    for Constraint {
        name,
        coefficients,
        op,
        rhs,
    } in &problem.constraints
    {
        let _ = write!(out, "{name}: ");
        write_terms(&mut out, &problem.variables, coefficients);
        let _ = writeln!(out, " {} {}", op.symbol(), fmt_num(*rhs));
    }

    out.push_str("Bounds\n");
    for name in &problem.variables {
        let _ = writeln!(out, "{name} >= 0");
    }
    out.push_str("End\n");
    out
}

fn write_mps(problem: &Problem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NAME          {}", problem.name);

    out.push_str("ROWS\n");
    out.push_str(" N  COST\n");
    for c in &problem.constraints {
        let tag = match c.op {
            ConstraintOp::Le => 'L',
            ConstraintOp::Ge => 'G',
            ConstraintOp::Eq => 'E',
        };
        let _ = writeln!(out, " {}  {}", tag, c.name);
    }

    // One entry per (variable, row) pair; the objective entry is always
    // written so that every variable has at least one column record.
    out.push_str("COLUMNS\n");
    for (i, name) in problem.variables.iter().enumerate() {
        let cost = problem
            .objective
            .coefficients
            .get(i)
            .copied()
            .unwrap_or(0.0);
        let _ = writeln!(out, "    {}  COST  {}", name, fmt_num(cost));
        for c in &problem.constraints {
            let coeff = c.coefficients.get(i).copied().unwrap_or(0.0);
            if coeff != 0.0 {
                let _ = writeln!(out, "    {}  {}  {}", name, c.name, fmt_num(coeff));
            }
        }
    }

    out.push_str("RHS\n");
    for c in &problem.constraints {
        let _ = writeln!(out, "    RHS  {}  {}", c.name, fmt_num(c.rhs));
    }

    // Default MPS bounds (0 <= x < +inf) match the problem's variable
    // domain, so no BOUNDS section is required.
    out.push_str("ENDATA\n");
    out
}
