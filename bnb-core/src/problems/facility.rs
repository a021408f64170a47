//! Capacitated facility location with binary open decisions.
//!
//! ```text
//! minimize   Σ_i f_i y_i + Σ_i Σ_j c_ij x_ij
//! s.t.       Σ_i x_ij = d_j                 for every customer j
//!            Σ_j x_ij <= cap_i y_i          for every warehouse i
//!            x_ij >= 0,  y_i ∈ {0, 1}
//! ```
//!
//! Variables are laid out as `y_0 .. y_{W-1}` followed by the transport
//! variables row by row: `x_ij` sits at `W + i*C + j`. Only `y` is branched on.

use bnb_lp::{LinearConstraint, LpProblem, Sense};

use crate::error::{MipError, MipResult};
use crate::model::ObjectiveSense;
use crate::oracle::LpModel;

/// Facility location instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityLocation {
    warehouses: Vec<String>,
    customers: Vec<String>,
    fixed_cost: Vec<f64>,
    capacity: Vec<f64>,
    demand: Vec<f64>,
    /// `unit_cost[i][j]`: cost of shipping one unit from warehouse i to customer j.
    unit_cost: Vec<Vec<f64>>,
}

fn check_finite_non_negative(what: &str, names: &[String], data: &[f64]) -> MipResult<()> {
    if data.len() != names.len() {
        return Err(MipError::InvalidProblem(format!(
            "{} has {} entries, expected {}",
            what,
            data.len(),
            names.len()
        )));
    }
    if let Some(k) = data.iter().position(|v| !v.is_finite() || *v < 0.0) {
        return Err(MipError::InvalidProblem(format!(
            "{} of {} is invalid: {}",
            what, names[k], data[k]
        )));
    }
    Ok(())
}

impl FacilityLocation {
    /// Create an instance; all data must be finite and non-negative.
    pub fn new(
        warehouses: Vec<String>,
        customers: Vec<String>,
        fixed_cost: Vec<f64>,
        capacity: Vec<f64>,
        demand: Vec<f64>,
        unit_cost: Vec<Vec<f64>>,
    ) -> MipResult<Self> {
        if warehouses.is_empty() || customers.is_empty() {
            return Err(MipError::InvalidProblem(
                "facility location needs at least one warehouse and one customer".into(),
            ));
        }

        check_finite_non_negative("fixed cost", &warehouses, &fixed_cost)?;
        check_finite_non_negative("capacity", &warehouses, &capacity)?;
        check_finite_non_negative("demand", &customers, &demand)?;

        if unit_cost.len() != warehouses.len() {
            return Err(MipError::InvalidProblem(format!(
                "unit cost has {} rows, expected {}",
                unit_cost.len(),
                warehouses.len()
            )));
        }
        for (i, row) in unit_cost.iter().enumerate() {
            check_finite_non_negative(
                &format!("unit cost from {}", warehouses[i]),
                &customers,
                row,
            )?;
        }

        Ok(Self {
            warehouses,
            customers,
            fixed_cost,
            capacity,
            demand,
            unit_cost,
        })
    }

    /// Warehouse names.
    pub fn warehouses(&self) -> &[String] {
        &self.warehouses
    }

    /// Customer names.
    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    /// Column of `y_i`.
    pub fn y_index(&self, warehouse: usize) -> usize {
        warehouse
    }

    /// Column of `x_ij`.
    pub fn x_index(&self, warehouse: usize, customer: usize) -> usize {
        self.warehouses.len() + warehouse * self.customers.len() + customer
    }

    /// Total number of columns.
    pub fn num_vars(&self) -> usize {
        self.warehouses.len() * (1 + self.customers.len())
    }

    /// Names of the warehouses with `y_i` rounded to one.
    pub fn open_warehouses(&self, solution: &[f64]) -> Vec<&str> {
        self.warehouses
            .iter()
            .enumerate()
            .filter(|(i, _)| solution.get(self.y_index(*i)).is_some_and(|y| y.round() >= 1.0))
            .map(|(_, name)| name.as_str())
            .collect()
    }
}

impl LpModel for FacilityLocation {
    fn sense(&self) -> ObjectiveSense {
        ObjectiveSense::Minimize
    }

    fn relaxation(&self) -> LpProblem {
        let nw = self.warehouses.len();
        let nc = self.customers.len();
        let n = self.num_vars();

        let mut objective = vec![0.0; n];
        for i in 0..nw {
            objective[self.y_index(i)] = self.fixed_cost[i];
            for j in 0..nc {
                objective[self.x_index(i, j)] = self.unit_cost[i][j];
            }
        }

        let mut lp = LpProblem::new(Sense::Minimize, objective);

        for j in 0..nc {
            let mut coefs = vec![0.0; n];
            for i in 0..nw {
                coefs[self.x_index(i, j)] = 1.0;
            }
            lp = lp.with_constraint(LinearConstraint::eq(coefs, self.demand[j]));
        }

        for i in 0..nw {
            let mut coefs = vec![0.0; n];
            for j in 0..nc {
                coefs[self.x_index(i, j)] = 1.0;
            }
            coefs[self.y_index(i)] = -self.capacity[i];
            lp = lp.with_constraint(LinearConstraint::le(coefs, 0.0));
        }

        for i in 0..nw {
            lp.upper[self.y_index(i)] = 1.0;
        }
        lp
    }

    fn branching_vars(&self) -> Vec<usize> {
        (0..self.warehouses.len()).map(|i| self.y_index(i)).collect()
    }

    fn var_name(&self, var: usize) -> String {
        let nw = self.warehouses.len();
        let nc = self.customers.len();
        if var < nw {
            format!("y_{}", self.warehouses[var])
        } else if var < self.num_vars() {
            let k = var - nw;
            format!("x_{}_{}", self.warehouses[k / nc], self.customers[k % nc])
        } else {
            format!("x{}", var)
        }
    }
}
