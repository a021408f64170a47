//! Relaxation oracles.
//!
//! An oracle answers one question for the search: given the branching
//! constraints accumulated on the path to a node, what is the optimal value
//! of the relaxed problem and at which (possibly fractional) point is it
//! attained?

mod budget;
mod greedy;
mod lp;

pub use budget::StepBudget;
pub use greedy::GreedyKnapsackOracle;
pub use lp::{LpModel, LpOracle};

use crate::error::MipResult;
use crate::model::{ConstraintSet, ObjectiveSense};

/// Answer of a relaxation oracle.
#[derive(Debug, Clone, PartialEq)]
pub enum Relaxation {
    /// The relaxation has an optimum.
    Feasible {
        /// Optimal relaxation value (a bound on every integer point below the node).
        value: f64,

        /// Point attaining `value`, one entry per variable.
        solution: Vec<f64>,
    },

    /// No point satisfies the relaxation.
    Infeasible,
}

impl Relaxation {
    /// Create a feasible answer.
    pub fn feasible(value: f64, solution: Vec<f64>) -> Self {
        Relaxation::Feasible { value, solution }
    }

    /// Bound value, with the sense's worst value standing in for infeasible.
    pub fn bound(&self, sense: ObjectiveSense) -> f64 {
        match self {
            Relaxation::Feasible { value, .. } => *value,
            Relaxation::Infeasible => sense.worst(),
        }
    }

    /// Relaxed point (if feasible).
    pub fn solution(&self) -> Option<&[f64]> {
        match self {
            Relaxation::Feasible { solution, .. } => Some(solution),
            Relaxation::Infeasible => None,
        }
    }
}

/// Bounds subproblems for the branch-and-bound search.
///
/// Implementations must be deterministic: the same constraint set always
/// yields the same answer. `Err` means the backend failed; the search treats
/// such a node as infeasible and keeps going.
pub trait RelaxationOracle {
    /// Objective direction of the instance.
    fn sense(&self) -> ObjectiveSense;

    /// Length of every relaxed solution.
    fn num_vars(&self) -> usize;

    /// Variables that must take integer values. Only these are branched on,
    /// scanned in the order returned.
    fn branching_vars(&self) -> &[usize];

    /// Display name of a variable.
    fn var_name(&self, var: usize) -> String {
        format!("x{}", var)
    }

    /// Solve the relaxation restricted by `constraints`.
    fn solve(&self, constraints: &ConstraintSet) -> MipResult<Relaxation>;
}

impl<O: RelaxationOracle + ?Sized> RelaxationOracle for &O {
    fn sense(&self) -> ObjectiveSense {
        (**self).sense()
    }

    fn num_vars(&self) -> usize {
        (**self).num_vars()
    }

    fn branching_vars(&self) -> &[usize] {
        (**self).branching_vars()
    }

    fn var_name(&self, var: usize) -> String {
        (**self).var_name(var)
    }

    fn solve(&self, constraints: &ConstraintSet) -> MipResult<Relaxation> {
        (**self).solve(constraints)
    }
}
