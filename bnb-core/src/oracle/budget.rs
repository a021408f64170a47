//! Call-count budget for an oracle.

use std::cell::Cell;

use super::{Relaxation, RelaxationOracle};
use crate::error::{MipError, MipResult};
use crate::model::{ConstraintSet, ObjectiveSense};

/// Wraps an oracle and fails every call after the first `max_calls`.
///
/// The search sees the failures as infeasible nodes, so a run under an
/// exhausted budget finishes quickly with whatever incumbent it had; check
/// [`StepBudget::exhausted`] (or the run status) before trusting optimality.
#[derive(Debug)]
pub struct StepBudget<O> {
    inner: O,
    max_calls: u64,
    calls: Cell<u64>,
}

impl<O: RelaxationOracle> StepBudget<O> {
    /// Allow at most `max_calls` solves of `inner`.
    pub fn new(inner: O, max_calls: u64) -> Self {
        Self {
            inner,
            max_calls,
            calls: Cell::new(0),
        }
    }

    /// Number of solve requests seen (including refused ones).
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    /// True once a request has been refused.
    pub fn exhausted(&self) -> bool {
        self.calls.get() > self.max_calls
    }
}

impl<O: RelaxationOracle> RelaxationOracle for StepBudget<O> {
    fn sense(&self) -> ObjectiveSense {
        self.inner.sense()
    }

    fn num_vars(&self) -> usize {
        self.inner.num_vars()
    }

    fn branching_vars(&self) -> &[usize] {
        self.inner.branching_vars()
    }

    fn var_name(&self, var: usize) -> String {
        self.inner.var_name(var)
    }

    fn solve(&self, constraints: &ConstraintSet) -> MipResult<Relaxation> {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);

        if calls > self.max_calls {
            return Err(MipError::OracleError(format!(
                "step budget of {} oracle calls exhausted",
                self.max_calls
            )));
        }
        self.inner.solve(constraints)
    }
}
