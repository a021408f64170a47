//! LP problem data, settings and results.

use thiserror::Error;

/// Errors raised for malformed LP data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    /// Problem validation failed
    #[error("Invalid LP: {0}")]
    InvalidProblem(String),
}

/// Result type for LP operations.
pub type LpResult<T> = Result<T, LpError>;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Minimize the objective.
    #[default]
    Minimize,

    /// Maximize the objective.
    Maximize,
}

/// Row relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// `a^T x <= b`
    Le,

    /// `a^T x >= b`
    Ge,

    /// `a^T x = b`
    Eq,
}

impl Relation {
    /// Relation obtained after multiplying the row by -1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }
}

/// A dense linear row `coefs^T x (rel) rhs`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearConstraint {
    /// Coefficient vector (dense, length n).
    pub coefs: Vec<f64>,

    /// Row relation.
    pub relation: Relation,

    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Create a new row.
    pub fn new(coefs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coefs,
            relation,
            rhs,
        }
    }

    /// `coefs^T x <= rhs`
    pub fn le(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Le, rhs)
    }

    /// `coefs^T x >= rhs`
    pub fn ge(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Ge, rhs)
    }

    /// `coefs^T x = rhs`
    pub fn eq(coefs: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefs, Relation::Eq, rhs)
    }

    /// Row activity `coefs^T x`.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.coefs.iter().zip(x).map(|(a, xi)| a * xi).sum()
    }

    /// Check whether `x` satisfies the row within `tol`.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.activity(x);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tol,
            Relation::Ge => lhs >= self.rhs - tol,
            Relation::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// A bounded LP with dense rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpProblem {
    /// Optimization direction.
    pub sense: Sense,

    /// Objective coefficients (length n).
    pub objective: Vec<f64>,

    /// Linear rows.
    pub constraints: Vec<LinearConstraint>,

    /// Variable lower bounds (finite).
    pub lower: Vec<f64>,

    /// Variable upper bounds (`f64::INFINITY` for none).
    pub upper: Vec<f64>,
}

impl LpProblem {
    /// Create an LP with `x >= 0` and no rows.
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            sense,
            objective,
            constraints: Vec::new(),
            lower: vec![0.0; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    /// Add a row.
    pub fn with_constraint(mut self, row: LinearConstraint) -> Self {
        self.constraints.push(row);
        self
    }

    /// Set both bounds of a variable.
    pub fn with_bounds(mut self, var: usize, lower: f64, upper: f64) -> Self {
        self.lower[var] = lower;
        self.upper[var] = upper;
        self
    }

    /// Number of variables.
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of rows.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective value at `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }

    /// Validate dimensions and numeric data.
    ///
    /// Crossed bounds (`lower > upper`) are not an error: they make the LP
    /// infeasible, which is reported through [`LpStatus::Infeasible`].
    pub fn validate(&self) -> LpResult<()> {
        let n = self.num_vars();

        if self.lower.len() != n || self.upper.len() != n {
            return Err(LpError::InvalidProblem(format!(
                "bounds have lengths {}/{}, expected {}",
                self.lower.len(),
                self.upper.len(),
                n
            )));
        }

        if let Some(j) = self.objective.iter().position(|c| !c.is_finite()) {
            return Err(LpError::InvalidProblem(format!(
                "objective coefficient {} is not finite",
                j
            )));
        }

        for (k, row) in self.constraints.iter().enumerate() {
            if row.coefs.len() != n {
                return Err(LpError::InvalidProblem(format!(
                    "row {} has {} coefficients, expected {}",
                    k,
                    row.coefs.len(),
                    n
                )));
            }
            if !row.rhs.is_finite() || row.coefs.iter().any(|a| !a.is_finite()) {
                return Err(LpError::InvalidProblem(format!(
                    "row {} has non-finite data",
                    k
                )));
            }
        }

        for j in 0..n {
            if !self.lower[j].is_finite() {
                return Err(LpError::InvalidProblem(format!(
                    "variable {} has no finite lower bound",
                    j
                )));
            }
            if self.upper[j].is_nan() {
                return Err(LpError::InvalidProblem(format!(
                    "variable {} has a NaN upper bound",
                    j
                )));
            }
        }

        Ok(())
    }
}

/// Simplex settings.
#[derive(Debug, Clone)]
pub struct LpSettings {
    /// Maximum number of pivots over both phases.
    pub max_iter: usize,

    /// Entries with magnitude below this are not used as pivots.
    pub tol_pivot: f64,

    /// Primal feasibility tolerance (phase-one objective, crossed bounds).
    pub tol_feas: f64,

    /// Log pivots at trace level.
    pub verbose: bool,
}

impl Default for LpSettings {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tol_pivot: 1e-9,
            tol_feas: 1e-7,
            verbose: false,
        }
    }
}

impl LpSettings {
    /// Set the pivot budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }
}

/// Status of an LP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LpStatus {
    /// Optimal basic solution found.
    Optimal,

    /// No point satisfies rows and bounds.
    Infeasible,

    /// Objective improves without limit.
    Unbounded,

    /// Pivot budget exhausted.
    IterationLimit,
}

/// Result of an LP solve.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Solve status.
    pub status: LpStatus,

    /// Primal solution (empty unless optimal).
    pub x: Vec<f64>,

    /// Objective value in the problem's own sense (NaN unless optimal).
    pub obj_val: f64,

    /// Pivots performed over both phases.
    pub iterations: usize,
}

impl LpSolution {
    /// A non-optimal result carrying only a status.
    pub fn with_status(status: LpStatus, iterations: usize) -> Self {
        Self {
            status,
            x: Vec::new(),
            obj_val: f64::NAN,
            iterations,
        }
    }

    /// Returns true if an optimal solution is available.
    pub fn is_optimal(&self) -> bool {
        self.status == LpStatus::Optimal
    }
}
