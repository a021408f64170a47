//! Branching constraints and the per-node constraint set.

use std::fmt;
use std::sync::Arc;

use crate::error::{MipError, MipResult};

/// Direction of a branching bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchRelation {
    /// `x <= bound`
    Le,

    /// `x >= bound`
    Ge,
}

/// A single bound added by branching: `x[var] (<= | >=) bound`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchConstraint {
    /// Variable index.
    pub var: usize,

    /// Bound direction.
    pub relation: BranchRelation,

    /// Integral bound value.
    pub bound: f64,
}

impl BranchConstraint {
    /// `x[var] <= bound`
    pub fn le(var: usize, bound: f64) -> Self {
        Self {
            var,
            relation: BranchRelation::Le,
            bound,
        }
    }

    /// `x[var] >= bound`
    pub fn ge(var: usize, bound: f64) -> Self {
        Self {
            var,
            relation: BranchRelation::Ge,
            bound,
        }
    }

    /// Check whether a value satisfies the constraint within `tol`.
    pub fn is_satisfied(&self, value: f64, tol: f64) -> bool {
        match self.relation {
            BranchRelation::Le => value <= self.bound + tol,
            BranchRelation::Ge => value >= self.bound - tol,
        }
    }
}

impl fmt::Display for BranchConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.relation {
            BranchRelation::Le => "<=",
            BranchRelation::Ge => ">=",
        };
        write!(f, "x{} {} {}", self.var, op, self.bound)
    }
}

#[derive(Debug)]
struct Link {
    constraint: BranchConstraint,
    prev: Option<Arc<Link>>,
}

/// Ordered, immutable set of branching constraints.
///
/// A child set is built with [`ConstraintSet::with`], which shares the
/// parent's constraints instead of copying them; the parent set is never
/// modified, so sibling nodes can both extend it.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    tail: Option<Arc<Link>>,
    len: usize,
}

impl ConstraintSet {
    /// The empty set (root node).
    pub fn new() -> Self {
        Self::default()
    }

    /// A new set holding `self` followed by `constraint`.
    pub fn with(&self, constraint: BranchConstraint) -> Self {
        Self {
            tail: Some(Arc::new(Link {
                constraint,
                prev: self.tail.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Number of constraints; also the depth of the node owning the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for the root set.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The most recently added constraint.
    pub fn last(&self) -> Option<&BranchConstraint> {
        self.tail.as_ref().map(|link| &link.constraint)
    }

    /// Constraints from newest to oldest.
    fn iter_rev(&self) -> impl Iterator<Item = &BranchConstraint> {
        let mut cursor = self.tail.as_deref();
        std::iter::from_fn(move || {
            let link = cursor?;
            cursor = link.prev.as_deref();
            Some(&link.constraint)
        })
    }

    /// Constraints in the order they were added.
    pub fn to_vec(&self) -> Vec<BranchConstraint> {
        let mut out: Vec<BranchConstraint> = self.iter_rev().copied().collect();
        out.reverse();
        out
    }

    /// First constraint (newest first) that `x` breaks by more than `tol`.
    ///
    /// A constraint on a variable outside `x` counts as broken.
    pub fn violated_by(&self, x: &[f64], tol: f64) -> Option<&BranchConstraint> {
        self.iter_rev().find(|c| match x.get(c.var) {
            Some(&v) => !c.is_satisfied(v, tol),
            None => true,
        })
    }

    /// Intersect `[lower, upper]` with every constraint in the set.
    ///
    /// Bounds may end up crossed (`lower > upper`); that is left for the
    /// relaxation to report as infeasible.
    pub fn tighten_bounds(&self, lower: &mut [f64], upper: &mut [f64]) -> MipResult<()> {
        for c in self.iter_rev() {
            if c.var >= lower.len() || c.var >= upper.len() {
                return Err(MipError::OracleError(format!(
                    "branching constraint on variable {} but only {} variables",
                    c.var,
                    lower.len().min(upper.len())
                )));
            }
            match c.relation {
                BranchRelation::Le => upper[c.var] = upper[c.var].min(c.bound),
                BranchRelation::Ge => lower[c.var] = lower[c.var].max(c.bound),
            }
        }
        Ok(())
    }
}

impl PartialEq for ConstraintSet {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter_rev().eq(other.iter_rev())
    }
}

impl FromIterator<BranchConstraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = BranchConstraint>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ConstraintSet::new(), |set, c| set.with(c))
    }
}
