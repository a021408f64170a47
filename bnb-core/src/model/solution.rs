//! Incumbent tracking and run results.

use super::ObjectiveSense;
use crate::search::{NodeLog, SearchStats};

/// Status of a finished search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BnbStatus {
    /// Incumbent proven optimal.
    Optimal,

    /// No integer-feasible point exists.
    Infeasible,

    /// Incumbent found, but some subtrees were cut by oracle failures.
    Feasible,

    /// No incumbent, and some subtrees were cut by oracle failures.
    Unknown,
}

impl BnbStatus {
    /// Returns true if an incumbent was found.
    pub fn has_solution(&self) -> bool {
        matches!(self, BnbStatus::Optimal | BnbStatus::Feasible)
    }
}

/// Result of one branch-and-bound run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BnbSolution {
    /// Solve status.
    pub status: BnbStatus,

    /// Objective direction of the instance.
    pub sense: ObjectiveSense,

    /// Incumbent value (the sense's worst value if none was found).
    pub value: f64,

    /// Incumbent solution (empty if none was found).
    pub solution: Vec<f64>,

    /// Every visited node, in depth-first order.
    pub nodes: NodeLog,

    /// Search counters.
    pub stats: SearchStats,
}

/// Tracks the best known integer-feasible solution (incumbent).
#[derive(Debug, Clone, PartialEq)]
pub struct IncumbentTracker {
    /// Objective direction.
    sense: ObjectiveSense,

    /// Current best solution (if any).
    pub solution: Option<Vec<f64>>,

    /// Objective value of incumbent.
    /// Initialized to the sense's worst value (-inf / +inf).
    pub value: f64,

    /// Number of times incumbent was updated.
    pub update_count: u64,
}

impl IncumbentTracker {
    /// Create a new incumbent tracker.
    pub fn new(sense: ObjectiveSense) -> Self {
        Self {
            sense,
            solution: None,
            value: sense.worst(),
            update_count: 0,
        }
    }

    /// Forget the incumbent, back to the sentinel value.
    pub fn reset(&mut self) {
        *self = Self::new(self.sense);
    }

    /// Objective direction.
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Check if we have an incumbent.
    pub fn has_incumbent(&self) -> bool {
        self.solution.is_some()
    }

    /// Try to update incumbent with a new solution.
    ///
    /// Accepted only if `value` is strictly better than the current value by
    /// more than `tol`. Returns true if the incumbent was improved.
    pub fn update(&mut self, solution: &[f64], value: f64, tol: f64) -> bool {
        if self.sense.improves(value, self.value, tol) {
            self.solution = Some(solution.to_vec());
            self.value = value;
            self.update_count += 1;
            true
        } else {
            false
        }
    }
}
