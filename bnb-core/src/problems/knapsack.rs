//! 0/1 knapsack.

use bnb_lp::{LinearConstraint, LpProblem, Sense};

use crate::error::{MipError, MipResult};
use crate::model::ObjectiveSense;
use crate::oracle::LpModel;

/// maximize Σ v_i x_i  s.t.  Σ c_i x_i <= capacity,  x_i ∈ {0, 1}
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackProblem {
    values: Vec<f64>,
    costs: Vec<f64>,
    capacity: f64,
}

impl KnapsackProblem {
    /// Create a knapsack instance.
    ///
    /// Values must be finite and non-negative, costs finite and positive, and
    /// the capacity finite and non-negative.
    pub fn new(values: Vec<f64>, costs: Vec<f64>, capacity: f64) -> MipResult<Self> {
        if values.len() != costs.len() {
            return Err(MipError::InvalidProblem(format!(
                "{} values but {} costs",
                values.len(),
                costs.len()
            )));
        }
        if values.is_empty() {
            return Err(MipError::InvalidProblem("knapsack has no items".into()));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(MipError::InvalidProblem(format!(
                "item {} has invalid value {}",
                i, values[i]
            )));
        }
        if let Some(i) = costs.iter().position(|c| !c.is_finite() || *c <= 0.0) {
            return Err(MipError::InvalidProblem(format!(
                "item {} has invalid cost {}",
                i, costs[i]
            )));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(MipError::InvalidProblem(format!(
                "invalid capacity {}",
                capacity
            )));
        }

        Ok(Self {
            values,
            costs,
            capacity,
        })
    }

    /// Number of items.
    pub fn num_items(&self) -> usize {
        self.values.len()
    }

    /// Item values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Item costs.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Knapsack capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Total value of a selection.
    pub fn total_value(&self, x: &[f64]) -> f64 {
        self.values.iter().zip(x).map(|(v, xi)| v * xi).sum()
    }

    /// Total cost of a selection.
    pub fn total_cost(&self, x: &[f64]) -> f64 {
        self.costs.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }
}

impl LpModel for KnapsackProblem {
    fn sense(&self) -> ObjectiveSense {
        ObjectiveSense::Maximize
    }

    fn relaxation(&self) -> LpProblem {
        let n = self.num_items();
        let mut lp = LpProblem::new(Sense::Maximize, self.values.clone())
            .with_constraint(LinearConstraint::le(self.costs.clone(), self.capacity));
        lp.upper = vec![1.0; n];
        lp
    }

    fn branching_vars(&self) -> Vec<usize> {
        (0..self.num_items()).collect()
    }
}
