//! Small pure integer programs.

use bnb_lp::{LinearConstraint, LpProblem};

use crate::error::{MipError, MipResult};
use crate::model::ObjectiveSense;
use crate::oracle::LpModel;

/// optimize c^T x  s.t.  linear rows,  x >= 0 integer
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerProgram {
    sense: ObjectiveSense,
    objective: Vec<f64>,
    rows: Vec<LinearConstraint>,
    names: Vec<String>,
}

impl IntegerProgram {
    /// Create a program of `coefs · x <= rhs` rows with variables named
    /// `x0, x1, ...`.
    pub fn new(
        sense: ObjectiveSense,
        objective: Vec<f64>,
        rows: Vec<(Vec<f64>, f64)>,
    ) -> MipResult<Self> {
        let names = (0..objective.len()).map(|j| format!("x{}", j)).collect();
        let rows = rows
            .into_iter()
            .map(|(coefs, rhs)| LinearConstraint::le(coefs, rhs))
            .collect();
        Self::with_names(sense, objective, rows, names)
    }

    /// Create a program with explicit variable names.
    pub fn with_names(
        sense: ObjectiveSense,
        objective: Vec<f64>,
        rows: Vec<LinearConstraint>,
        names: Vec<String>,
    ) -> MipResult<Self> {
        if objective.is_empty() {
            return Err(MipError::InvalidProblem("program has no variables".into()));
        }
        if names.len() != objective.len() {
            return Err(MipError::InvalidProblem(format!(
                "{} names for {} variables",
                names.len(),
                objective.len()
            )));
        }

        let prog = Self {
            sense,
            objective,
            rows,
            names,
        };
        // Row lengths and finiteness are the LP's own checks
        prog.relaxation().validate()?;
        Ok(prog)
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Variable names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Objective value at `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }

    /// True if `x` satisfies every row within `tol`.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        x.iter().all(|&v| v >= -tol) && self.rows.iter().all(|r| r.is_satisfied(x, tol))
    }
}

impl LpModel for IntegerProgram {
    fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    fn relaxation(&self) -> LpProblem {
        self.rows.iter().fold(
            LpProblem::new(self.sense.into(), self.objective.clone()),
            |lp, row| lp.with_constraint(row.clone()),
        )
    }

    fn branching_vars(&self) -> Vec<usize> {
        (0..self.num_vars()).collect()
    }

    fn var_name(&self, var: usize) -> String {
        self.names
            .get(var)
            .cloned()
            .unwrap_or_else(|| format!("x{}", var))
    }
}
