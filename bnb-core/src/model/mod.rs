//! Constraint, objective and solution types shared by oracles and the search.

mod constraint;
mod sense;
mod solution;

pub use constraint::{BranchConstraint, BranchRelation, ConstraintSet};
pub use sense::ObjectiveSense;
pub use solution::{BnbSolution, BnbStatus, IncumbentTracker};
