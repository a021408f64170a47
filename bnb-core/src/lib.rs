//! Depth-first branch-and-bound for small integer programs.
//!
//! The search asks a [`RelaxationOracle`] for a bound and a relaxed point at
//! every node, prunes nodes that are infeasible or cannot beat the incumbent,
//! and otherwise branches on the most fractional integer variable. Two
//! oracles are provided: [`GreedyKnapsackOracle`] (fractional knapsack bound)
//! and [`LpOracle`] (any [`LpModel`], solved with `bnb_lp`).
//!
//! Every visited node is appended to a [`NodeLog`], so the full search tree
//! can be rebuilt from the result.
//!
//! # Example
//!
//! ```
//! use bnb_core::{solve, BnbStatus, GreedyKnapsackOracle, KnapsackProblem, MipSettings};
//!
//! let problem = KnapsackProblem::new(
//!     vec![10.0, 15.0, 36.0, 20.0, 15.0, 18.0, 20.0],
//!     vec![10.0, 17.0, 49.0, 30.0, 11.0, 21.0, 31.0],
//!     100.0,
//! )
//! .unwrap();
//! let oracle = GreedyKnapsackOracle::new(problem);
//!
//! let result = solve(&oracle, MipSettings::default()).unwrap();
//! assert_eq!(result.status, BnbStatus::Optimal);
//! assert!((result.value - 84.0).abs() < 1e-9);
//! assert_eq!(result.solution, vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod oracle;
pub mod problems;
pub mod search;
pub mod settings;

pub use error::{MipError, MipResult};
pub use model::{
    BnbSolution, BnbStatus, BranchConstraint, BranchRelation, ConstraintSet, IncumbentTracker,
    ObjectiveSense,
};
pub use oracle::{
    GreedyKnapsackOracle, LpModel, LpOracle, Relaxation, RelaxationOracle, StepBudget,
};
pub use problems::{FacilityLocation, IntegerProgram, KnapsackProblem};
pub use search::{BranchAndBound, NodeClass, NodeId, NodeLog, NodeRecord, SearchStats};
pub use settings::{MipSettings, Traversal};

/// Run branch-and-bound with `oracle` from the root.
pub fn solve<O: RelaxationOracle + ?Sized>(
    oracle: &O,
    settings: MipSettings,
) -> MipResult<BnbSolution> {
    Ok(BranchAndBound::new(oracle, settings)?.run())
}
