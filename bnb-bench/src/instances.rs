use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bnb_core::{
    BnbSolution, FacilityLocation, GreedyKnapsackOracle, IntegerProgram, KnapsackProblem,
    LpOracle, MipSettings, ObjectiveSense, RelaxationOracle,
};
use bnb_lp::{LinearConstraint, LpSettings};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::report::fmt_num;

/// Instances shipped with the runner.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    /// 7-item knapsack, capacity 100.
    Knapsack,
    /// Facility location with 4 warehouses and 5 customers.
    Q4,
    A,
    B,
    C,
    D,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleChoice {
    Greedy,
    Lp,
}

/// A problem instance as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instance {
    Knapsack {
        values: Vec<f64>,
        costs: Vec<f64>,
        capacity: f64,
    },
    FacilityLocation {
        warehouses: Vec<String>,
        customers: Vec<String>,
        fixed_cost: Vec<f64>,
        capacity: Vec<f64>,
        demand: Vec<f64>,
        unit_cost: Vec<Vec<f64>>,
    },
    IntegerProgram {
        sense: ObjectiveSense,
        objective: Vec<f64>,
        rows: Vec<LinearConstraint>,
        #[serde(default)]
        names: Vec<String>,
    },
}

/// Outcome of running one instance.
pub struct Run {
    pub result: BnbSolution,
    pub var_names: Vec<String>,
    /// Instance-specific lines for the summary.
    pub notes: Vec<String>,
}

fn names(s: &[&str]) -> Vec<String> {
    s.iter().map(|n| n.to_string()).collect()
}

fn two_var(objective: [f64; 2], rows: [[f64; 3]; 2]) -> Instance {
    Instance::IntegerProgram {
        sense: ObjectiveSense::Maximize,
        objective: objective.to_vec(),
        rows: rows
            .iter()
            .map(|r| LinearConstraint::le(vec![r[0], r[1]], r[2]))
            .collect(),
        names: names(&["x", "y"]),
    }
}

impl Builtin {
    pub fn instance(self) -> Instance {
        match self {
            Builtin::Knapsack => Instance::Knapsack {
                values: vec![10.0, 15.0, 36.0, 20.0, 15.0, 18.0, 20.0],
                costs: vec![10.0, 17.0, 49.0, 30.0, 11.0, 21.0, 31.0],
                capacity: 100.0,
            },
            Builtin::Q4 => Instance::FacilityLocation {
                warehouses: names(&["A", "B", "C", "D"]),
                customers: names(&["a", "b", "c", "d", "e"]),
                fixed_cost: vec![50.0, 32.0, 28.0, 36.0],
                capacity: vec![35.0, 28.0, 22.0, 28.0],
                demand: vec![14.0, 12.0, 10.0, 12.0, 8.0],
                unit_cost: vec![
                    vec![2.0, 5.0, 1.0, 2.0, 5.0],
                    vec![4.0, 4.0, 9.0, 1.0, 4.0],
                    vec![1.0, 8.0, 5.0, 6.0, 2.0],
                    vec![7.0, 1.0, 2.0, 1.0, 8.0],
                ],
            },
            Builtin::A => two_var([5.0, 2.0], [[3.0, 1.0, 12.0], [1.0, 1.0, 5.0]]),
            Builtin::B => two_var([2.0, 3.0], [[1.0, 2.0, 10.0], [3.0, 4.0, 25.0]]),
            Builtin::C => two_var([4.0, 3.0], [[4.0, 9.0, 26.0], [8.0, 5.0, 17.0]]),
            Builtin::D => two_var([1.0, 1.0], [[2.0, 2.0, 3.0], [7.0, 3.0, 22.0]]),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Knapsack => "knapsack",
            Builtin::Q4 => "q4",
            Builtin::A => "a",
            Builtin::B => "b",
            Builtin::C => "c",
            Builtin::D => "d",
        }
    }
}

pub fn load_instance(path: &Path) -> Result<Instance> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let instance = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse instance {}", path.display()))?;
    Ok(instance)
}

fn run_oracle<O: RelaxationOracle>(
    oracle: &O,
    settings: MipSettings,
) -> Result<(BnbSolution, Vec<String>)> {
    let result = bnb_core::solve(oracle, settings)?;
    let var_names = (0..oracle.num_vars()).map(|v| oracle.var_name(v)).collect();
    Ok((result, var_names))
}

impl Instance {
    pub fn kind(&self) -> &'static str {
        match self {
            Instance::Knapsack { .. } => "knapsack",
            Instance::FacilityLocation { .. } => "facility_location",
            Instance::IntegerProgram { .. } => "integer_program",
        }
    }

    /// Build the model and run branch-and-bound on it.
    ///
    /// The greedy oracle only applies to knapsack instances.
    pub fn solve(&self, oracle: OracleChoice, settings: MipSettings) -> Result<Run> {
        let lp_settings = LpSettings::default();

        match self {
            Instance::Knapsack {
                values,
                costs,
                capacity,
            } => {
                let problem = KnapsackProblem::new(values.clone(), costs.clone(), *capacity)
                    .context("build knapsack")?;
                let (result, var_names) = match oracle {
                    OracleChoice::Greedy => {
                        run_oracle(&GreedyKnapsackOracle::new(problem), settings)?
                    }
                    OracleChoice::Lp => {
                        run_oracle(&LpOracle::new(problem, lp_settings)?, settings)?
                    }
                };
                let cost: f64 = costs.iter().zip(&result.solution).map(|(c, x)| c * x).sum();
                let notes = if result.status.has_solution() {
                    vec![format!("cost {} of {}", fmt_num(cost), fmt_num(*capacity))]
                } else {
                    Vec::new()
                };
                Ok(Run {
                    result,
                    var_names,
                    notes,
                })
            }
            Instance::FacilityLocation {
                warehouses,
                customers,
                fixed_cost,
                capacity,
                demand,
                unit_cost,
            } => {
                if oracle == OracleChoice::Greedy {
                    bail!("the greedy oracle only bounds knapsack instances");
                }
                let model = FacilityLocation::new(
                    warehouses.clone(),
                    customers.clone(),
                    fixed_cost.clone(),
                    capacity.clone(),
                    demand.clone(),
                    unit_cost.clone(),
                )
                .context("build facility location")?;
                let lp = LpOracle::new(model, lp_settings)?;
                let (result, var_names) = run_oracle(&lp, settings)?;
                let notes = if result.status.has_solution() {
                    vec![format!(
                        "open: {}",
                        lp.model().open_warehouses(&result.solution).join(", ")
                    )]
                } else {
                    Vec::new()
                };
                Ok(Run {
                    result,
                    var_names,
                    notes,
                })
            }
            Instance::IntegerProgram {
                sense,
                objective,
                rows,
                names,
            } => {
                if oracle == OracleChoice::Greedy {
                    bail!("the greedy oracle only bounds knapsack instances");
                }
                let names = if names.is_empty() {
                    (0..objective.len()).map(|j| format!("x{}", j)).collect()
                } else {
                    names.clone()
                };
                let program =
                    IntegerProgram::with_names(*sense, objective.clone(), rows.clone(), names)
                        .context("build integer program")?;
                let (result, var_names) =
                    run_oracle(&LpOracle::new(program, lp_settings)?, settings)?;
                Ok(Run {
                    result,
                    var_names,
                    notes: Vec::new(),
                })
            }
        }
    }
}
