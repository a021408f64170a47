//! Two-phase dense tableau simplex with Bland's rule.
//!
//! Variables are shifted to `x = l + x'` so that `x' >= 0`; finite upper
//! bounds become `x'_j <= u_j - l_j` rows. Every row is then scaled to a
//! non-negative right-hand side and given a slack (`<=`), a surplus plus an
//! artificial (`>=`), or an artificial (`=`). Phase one drives the
//! artificials to zero, phase two optimizes the real objective with the
//! artificial columns barred from entering.

use crate::problem::{LpProblem, LpSettings, LpSolution, LpStatus, Relation, Sense};

/// A row in standard form before slacks are attached.
struct StandardRow {
    coefs: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

/// Outcome of one simplex phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseOutcome {
    Optimal,
    Unbounded,
    IterationLimit,
}

/// Dense tableau: `rows[i]` holds `ncols` coefficients followed by the rhs.
struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    ncols: usize,
    artificial: Vec<bool>,
    iterations: usize,
}

impl Tableau {
    fn build(rows: Vec<StandardRow>, n: usize) -> Self {
        let num_slack = rows
            .iter()
            .filter(|r| r.relation != Relation::Eq)
            .count();
        let num_artificial = rows
            .iter()
            .filter(|r| r.relation != Relation::Le)
            .count();
        let ncols = n + num_slack + num_artificial;

        let mut tableau = Self {
            rows: Vec::with_capacity(rows.len()),
            basis: Vec::with_capacity(rows.len()),
            ncols,
            artificial: vec![false; ncols],
            iterations: 0,
        };

        let mut next_slack = n;
        let mut next_artificial = n + num_slack;

        for row in rows {
            let mut dense = vec![0.0; ncols + 1];
            dense[..n].copy_from_slice(&row.coefs);
            dense[ncols] = row.rhs;

            let basic = match row.relation {
                Relation::Le => {
                    dense[next_slack] = 1.0;
                    next_slack += 1;
                    next_slack - 1
                }
                Relation::Ge => {
                    dense[next_slack] = -1.0;
                    next_slack += 1;
                    dense[next_artificial] = 1.0;
                    tableau.artificial[next_artificial] = true;
                    next_artificial += 1;
                    next_artificial - 1
                }
                Relation::Eq => {
                    dense[next_artificial] = 1.0;
                    tableau.artificial[next_artificial] = true;
                    next_artificial += 1;
                    next_artificial - 1
                }
            };

            tableau.rows.push(dense);
            tableau.basis.push(basic);
        }

        tableau
    }

    fn has_artificials(&self) -> bool {
        self.artificial.iter().any(|&a| a)
    }

    fn rhs(&self, row: usize) -> f64 {
        self.rows[row][self.ncols]
    }

    /// Reduced costs `d_j = c_j - c_B^T B^{-1} A_j` for a minimization cost.
    fn reduced_costs(&self, cost: &[f64]) -> Vec<f64> {
        (0..self.ncols)
            .map(|j| {
                let priced: f64 = self
                    .rows
                    .iter()
                    .zip(&self.basis)
                    .map(|(row, &b)| cost[b] * row[j])
                    .sum();
                cost[j] - priced
            })
            .collect()
    }

    fn pivot(&mut self, pivot_row: usize, entering: usize) {
        let p = self.rows[pivot_row][entering];
        for v in self.rows[pivot_row].iter_mut() {
            *v /= p;
        }

        let normalized = self.rows[pivot_row].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let factor = row[entering];
            if factor != 0.0 {
                for (v, w) in row.iter_mut().zip(&normalized) {
                    *v -= factor * w;
                }
            }
        }

        self.basis[pivot_row] = entering;
        self.iterations += 1;
    }

    /// Minimize `cost` from the current basis.
    fn run_phase(
        &mut self,
        cost: &[f64],
        allow_artificial: bool,
        settings: &LpSettings,
    ) -> PhaseOutcome {
        let tol = settings.tol_pivot;

        loop {
            let reduced = self.reduced_costs(cost);

            // Bland: lowest-index improving column
            let entering = (0..self.ncols)
                .filter(|&j| allow_artificial || !self.artificial[j])
                .find(|&j| reduced[j] < -tol);

            let Some(entering) = entering else {
                return PhaseOutcome::Optimal;
            };

            if self.iterations >= settings.max_iter {
                return PhaseOutcome::IterationLimit;
            }

            // Ratio test, ties broken by lowest basic index
            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[entering];
                if a <= tol {
                    continue;
                }
                let ratio = row[self.ncols] / a;
                leaving = match leaving {
                    None => Some((i, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - tol
                            || ((ratio - best_ratio).abs() <= tol
                                && self.basis[i] < self.basis[best])
                        {
                            Some((i, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }

            let Some((pivot_row, _)) = leaving else {
                return PhaseOutcome::Unbounded;
            };

            if settings.verbose {
                log::trace!(
                    "pivot {}: column {} enters, column {} leaves",
                    self.iterations,
                    entering,
                    self.basis[pivot_row]
                );
            }

            self.pivot(pivot_row, entering);
        }
    }

    /// Pivot zero-valued artificials out of the basis; drop redundant rows.
    fn expel_artificials(&mut self, tol: f64) {
        let mut i = 0;
        while i < self.rows.len() {
            if !self.artificial[self.basis[i]] {
                i += 1;
                continue;
            }

            let replacement =
                (0..self.ncols).find(|&j| !self.artificial[j] && self.rows[i][j].abs() > tol);

            match replacement {
                Some(j) => {
                    self.pivot(i, j);
                    i += 1;
                }
                None => {
                    self.rows.remove(i);
                    self.basis.remove(i);
                }
            }
        }
    }
}

/// Convert the bounded problem to non-negative-rhs rows over `x' = x - l`.
fn standard_rows(prob: &LpProblem) -> Vec<StandardRow> {
    let n = prob.num_vars();
    let mut rows: Vec<StandardRow> = prob
        .constraints
        .iter()
        .map(|c| StandardRow {
            coefs: c.coefs.clone(),
            relation: c.relation,
            rhs: c.rhs - c.activity(&prob.lower),
        })
        .collect();

    for j in 0..n {
        if prob.upper[j].is_finite() {
            let mut coefs = vec![0.0; n];
            coefs[j] = 1.0;
            rows.push(StandardRow {
                coefs,
                relation: Relation::Le,
                rhs: (prob.upper[j] - prob.lower[j]).max(0.0),
            });
        }
    }

    for row in rows.iter_mut() {
        if row.rhs < 0.0 {
            for a in row.coefs.iter_mut() {
                *a = -*a;
            }
            row.rhs = -row.rhs;
            row.relation = row.relation.flipped();
        }
    }

    rows
}

pub(crate) fn solve_tableau(prob: &LpProblem, settings: &LpSettings) -> LpSolution {
    let n = prob.num_vars();

    if (0..n).any(|j| prob.lower[j] > prob.upper[j] + settings.tol_feas) {
        return LpSolution::with_status(LpStatus::Infeasible, 0);
    }

    let mut tableau = Tableau::build(standard_rows(prob), n);

    if tableau.has_artificials() {
        let phase_one: Vec<f64> = tableau
            .artificial
            .iter()
            .map(|&a| if a { 1.0 } else { 0.0 })
            .collect();

        // Phase one is bounded below by zero, so only the budget can stop it early
        if tableau.run_phase(&phase_one, true, settings) == PhaseOutcome::IterationLimit {
            return LpSolution::with_status(LpStatus::IterationLimit, tableau.iterations);
        }

        let infeasibility: f64 = (0..tableau.rows.len())
            .filter(|&i| tableau.artificial[tableau.basis[i]])
            .map(|i| tableau.rhs(i))
            .sum();

        if infeasibility > settings.tol_feas {
            log::debug!("phase one ended with infeasibility {:.3e}", infeasibility);
            return LpSolution::with_status(LpStatus::Infeasible, tableau.iterations);
        }

        tableau.expel_artificials(settings.tol_pivot);
    }

    let sign = match prob.sense {
        Sense::Minimize => 1.0,
        Sense::Maximize => -1.0,
    };
    let mut phase_two = vec![0.0; tableau.ncols];
    for (j, &c) in prob.objective.iter().enumerate() {
        phase_two[j] = sign * c;
    }

    match tableau.run_phase(&phase_two, false, settings) {
        PhaseOutcome::Optimal => {}
        PhaseOutcome::Unbounded => {
            return LpSolution::with_status(LpStatus::Unbounded, tableau.iterations);
        }
        PhaseOutcome::IterationLimit => {
            return LpSolution::with_status(LpStatus::IterationLimit, tableau.iterations);
        }
    }

    let mut x = prob.lower.clone();
    for (i, &b) in tableau.basis.iter().enumerate() {
        if b < n {
            x[b] += tableau.rhs(i);
        }
    }

    let obj_val = prob.objective_value(&x);
    log::debug!(
        "LP optimal: obj={:.6} after {} pivots",
        obj_val,
        tableau.iterations
    );

    LpSolution {
        status: LpStatus::Optimal,
        x,
        obj_val,
        iterations: tableau.iterations,
    }
}
