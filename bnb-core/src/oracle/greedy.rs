//! Greedy fractional-knapsack bound.

use std::cmp::Ordering;

use super::{Relaxation, RelaxationOracle};
use crate::error::{MipError, MipResult};
use crate::model::{ConstraintSet, ObjectiveSense};
use crate::problems::KnapsackProblem;

/// Slack allowed on the capacity when adding whole items.
const CAPACITY_TOL: f64 = 1e-6;

/// A variable's range is treated as a single value below this width.
const FIXED_TOL: f64 = 1e-6;

/// Dantzig bound for the 0/1 knapsack: the LP relaxation solved greedily.
///
/// Free items are taken whole in value/cost ratio order until the next one
/// overflows; that item is taken fractionally and the rest are left out.
#[derive(Debug, Clone)]
pub struct GreedyKnapsackOracle {
    problem: KnapsackProblem,

    /// Item indices by ratio, best first (ties keep index order).
    order: Vec<usize>,

    branching: Vec<usize>,
}

impl GreedyKnapsackOracle {
    /// Create the oracle for a validated problem.
    pub fn new(problem: KnapsackProblem) -> Self {
        let ratio: Vec<f64> = problem
            .values()
            .iter()
            .zip(problem.costs())
            .map(|(v, c)| v / c)
            .collect();

        let mut order: Vec<usize> = (0..problem.num_items()).collect();
        order.sort_by(|&a, &b| ratio[b].partial_cmp(&ratio[a]).unwrap_or(Ordering::Equal));

        let branching = (0..problem.num_items()).collect();

        Self {
            problem,
            order,
            branching,
        }
    }

    /// The underlying problem.
    pub fn problem(&self) -> &KnapsackProblem {
        &self.problem
    }

    /// Turn branching constraints into a per-item assignment.
    ///
    /// Each item starts in `[0, 1]`; an item whose range collapses to a point
    /// is fixed at that point. Returns `None` if some range is empty.
    pub fn assignment(&self, constraints: &ConstraintSet) -> MipResult<Option<Vec<Option<f64>>>> {
        let n = self.problem.num_items();
        let mut lower = vec![0.0; n];
        let mut upper = vec![1.0; n];
        constraints.tighten_bounds(&mut lower, &mut upper)?;

        let mut fixed = Vec::with_capacity(n);
        for (&lo, &up) in lower.iter().zip(&upper) {
            if lo > up + FIXED_TOL {
                return Ok(None);
            }
            fixed.push(if up - lo <= FIXED_TOL { Some(lo) } else { None });
        }
        Ok(Some(fixed))
    }

    /// Evaluate the bound for a full-length assignment (`None` = free item).
    pub fn bound(&self, assignment: &[Option<f64>]) -> MipResult<Relaxation> {
        let n = self.problem.num_items();
        if assignment.len() != n {
            return Err(MipError::OracleError(format!(
                "assignment has {} entries, expected {}",
                assignment.len(),
                n
            )));
        }

        let values = self.problem.values();
        let costs = self.problem.costs();
        let capacity = self.problem.capacity();

        let mut cost = 0.0;
        let mut value = 0.0;
        let mut solution = vec![0.0; n];
        for (i, fixed) in assignment.iter().enumerate() {
            if let Some(x) = *fixed {
                cost += costs[i] * x;
                value += values[i] * x;
                solution[i] = x;
            }
        }

        if cost > capacity + CAPACITY_TOL {
            return Ok(Relaxation::Infeasible);
        }

        for &i in self.order.iter().filter(|&&i| assignment[i].is_none()) {
            if cost + costs[i] <= capacity + CAPACITY_TOL {
                solution[i] = 1.0;
                cost += costs[i];
                value += values[i];
            } else {
                let fraction = ((capacity - cost) / costs[i]).max(0.0);
                solution[i] = fraction;
                value += values[i] * fraction;
                break;
            }
        }

        Ok(Relaxation::feasible(value, solution))
    }
}

impl RelaxationOracle for GreedyKnapsackOracle {
    fn sense(&self) -> ObjectiveSense {
        ObjectiveSense::Maximize
    }

    fn num_vars(&self) -> usize {
        self.problem.num_items()
    }

    fn branching_vars(&self) -> &[usize] {
        &self.branching
    }

    fn solve(&self, constraints: &ConstraintSet) -> MipResult<Relaxation> {
        match self.assignment(constraints)? {
            Some(assignment) => self.bound(&assignment),
            None => Ok(Relaxation::Infeasible),
        }
    }
}
