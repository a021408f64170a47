//! Branching variable selection.

use crate::model::BranchConstraint;

/// A branching decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) value.
    pub value: f64,

    /// Distance from `value` to the nearest integer.
    pub fractionality: f64,
}

impl BranchDecision {
    /// Constraint for the "down" branch: x <= floor(value).
    pub fn down_branch(&self) -> BranchConstraint {
        BranchConstraint::le(self.var, self.value.floor())
    }

    /// Constraint for the "up" branch: x >= ceil(value).
    pub fn up_branch(&self) -> BranchConstraint {
        BranchConstraint::ge(self.var, self.value.ceil())
    }
}

/// Distance from `value` to the nearest integer.
pub fn fractionality(value: f64) -> f64 {
    (value - value.round()).abs()
}

/// Most-fractional branching.
#[derive(Debug, Clone, Copy)]
pub struct BranchingSelector {
    tol: f64,
}

impl BranchingSelector {
    /// Values within `tol` of an integer count as integral.
    pub fn new(tol: f64) -> Self {
        Self { tol }
    }

    /// Pick the branching variable among `vars`.
    ///
    /// Returns the variable farthest from an integer, the first one scanned
    /// on ties, or None if every variable in `vars` is integral.
    pub fn select(&self, x: &[f64], vars: &[usize]) -> Option<BranchDecision> {
        let mut best: Option<BranchDecision> = None;

        for &var in vars {
            let value = x[var];
            let frac = fractionality(value);
            if frac <= self.tol {
                continue;
            }
            if best.map_or(true, |b| frac > b.fractionality) {
                best = Some(BranchDecision {
                    var,
                    value,
                    fractionality: frac,
                });
            }
        }

        best
    }
}
