//! Dense LP backend for small branch-and-bound relaxations.
//!
//! Solves linear programs of the form
//!
//! ```text
//! min / max  c^T x
//! s.t.       a_k^T x  (<= | >= | =)  b_k     for every row k
//!            l <= x <= u                     (l finite, u may be +inf)
//! ```
//!
//! with a two-phase tableau simplex using Bland's rule. The tableau is dense,
//! so this backend is only meant for the handful-of-variables models the
//! branch-and-bound layer works with (knapsack, facility location, small
//! integer programs).
//!
//! # Example
//!
//! ```
//! use bnb_lp::{solve, LinearConstraint, LpProblem, LpSettings, LpStatus, Sense};
//!
//! // max 5x + 2y  s.t.  3x + y <= 12,  x + y <= 5,  x, y >= 0
//! let prob = LpProblem::new(Sense::Maximize, vec![5.0, 2.0])
//!     .with_constraint(LinearConstraint::le(vec![3.0, 1.0], 12.0))
//!     .with_constraint(LinearConstraint::le(vec![1.0, 1.0], 5.0));
//!
//! let sol = solve(&prob, &LpSettings::default()).unwrap();
//! assert_eq!(sol.status, LpStatus::Optimal);
//! assert!((sol.obj_val - 20.5).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod problem;
mod simplex;

pub use problem::{
    LinearConstraint, LpError, LpProblem, LpResult, LpSettings, LpSolution, LpStatus, Relation,
    Sense,
};

/// Solve an LP.
///
/// Returns `Err` only when the problem data is malformed; infeasible and
/// unbounded programs come back as an [`LpSolution`] with the matching
/// [`LpStatus`].
pub fn solve(prob: &LpProblem, settings: &LpSettings) -> LpResult<LpSolution> {
    prob.validate()?;
    Ok(simplex::solve_tableau(prob, settings))
}
