//! LP-backed relaxation oracle.
//!
//! The model supplies its continuous relaxation once; every node re-solves
//! that LP with the node's branching constraints applied as bound
//! tightenings.

use bnb_lp::{LpProblem, LpSettings, LpStatus};

use super::{Relaxation, RelaxationOracle};
use crate::error::{MipError, MipResult};
use crate::model::{ConstraintSet, ObjectiveSense};

/// A problem whose relaxation is a linear program.
pub trait LpModel {
    /// Objective direction.
    fn sense(&self) -> ObjectiveSense;

    /// The continuous relaxation with no branching constraints applied.
    fn relaxation(&self) -> LpProblem;

    /// Variables that must be integral, in scan order.
    fn branching_vars(&self) -> Vec<usize>;

    /// Display name of a variable.
    fn var_name(&self, var: usize) -> String {
        format!("x{}", var)
    }
}

/// Relaxation oracle solving the model's LP with `bnb_lp`.
#[derive(Debug, Clone)]
pub struct LpOracle<M> {
    model: M,
    base: LpProblem,
    branching: Vec<usize>,
    settings: LpSettings,
}

impl<M: LpModel> LpOracle<M> {
    /// Build the oracle, validating the model's relaxation up front.
    pub fn new(model: M, settings: LpSettings) -> MipResult<Self> {
        let mut base = model.relaxation();
        base.sense = model.sense().into();
        base.validate()?;

        let branching = model.branching_vars();
        if let Some(&var) = branching.iter().find(|&&v| v >= base.num_vars()) {
            return Err(MipError::InvalidProblem(format!(
                "branching variable {} out of range ({} variables)",
                var,
                base.num_vars()
            )));
        }

        Ok(Self {
            model,
            base,
            branching,
            settings,
        })
    }

    /// The wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: LpModel> RelaxationOracle for LpOracle<M> {
    fn sense(&self) -> ObjectiveSense {
        self.base.sense.into()
    }

    fn num_vars(&self) -> usize {
        self.base.num_vars()
    }

    fn branching_vars(&self) -> &[usize] {
        &self.branching
    }

    fn var_name(&self, var: usize) -> String {
        self.model.var_name(var)
    }

    fn solve(&self, constraints: &ConstraintSet) -> MipResult<Relaxation> {
        let mut lp = self.base.clone();
        constraints.tighten_bounds(&mut lp.lower, &mut lp.upper)?;

        let result = bnb_lp::solve(&lp, &self.settings)?;

        match result.status {
            LpStatus::Optimal => Ok(Relaxation::feasible(result.obj_val, result.x)),
            LpStatus::Infeasible => Ok(Relaxation::Infeasible),
            LpStatus::Unbounded => Err(MipError::OracleError(
                "LP relaxation unbounded".to_string(),
            )),
            LpStatus::IterationLimit => Err(MipError::OracleError(format!(
                "LP iteration limit reached after {} pivots",
                result.iterations
            ))),
        }
    }
}
