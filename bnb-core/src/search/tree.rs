//! Branch-and-bound search driver.

use std::time::Instant;

use log::{debug, info, trace, warn};

use super::node::{NodeClass, NodeId, NodeRecord};
use super::queue::{NodeStack, PendingNode};
use super::{BranchingSelector, NodeLog};
use crate::error::{MipError, MipResult};
use crate::model::{BnbSolution, BnbStatus, ConstraintSet, IncumbentTracker};
use crate::oracle::{Relaxation, RelaxationOracle};
use crate::settings::{MipSettings, Traversal};

/// Counters collected during one run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchStats {
    /// Nodes visited (oracle calls made).
    pub nodes_explored: u64,

    /// Nodes pruned as infeasible or by bound.
    pub nodes_pruned: u64,

    /// Nodes with an integral relaxed solution.
    pub integer_nodes: u64,

    /// Nodes split into children.
    pub nodes_branched: u64,

    /// Oracle errors turned into infeasible nodes.
    pub oracle_failures: u64,

    /// Times the incumbent improved.
    pub incumbent_updates: u64,

    /// Deepest node visited (root is 0).
    pub max_depth: usize,

    /// Wall time of the run.
    pub solve_time_ms: u64,
}

/// Depth-first branch-and-bound over a relaxation oracle.
///
/// The engine owns the incumbent and the node log of the current run; both
/// are reset by [`BranchAndBound::run`]. Children of node `k` are `2k+1`
/// (`x <= floor(v)`, visited first) and `2k+2` (`x >= ceil(v)`); see
/// [`NodeId`]. Once built, a run cannot fail: oracle errors prune the node.
pub struct BranchAndBound<'a, O: RelaxationOracle + ?Sized> {
    /// Relaxation oracle.
    oracle: &'a O,

    /// Branching variable selector.
    branching: BranchingSelector,

    /// Incumbent solution tracker.
    pub incumbent: IncumbentTracker,

    /// Visited nodes.
    log: NodeLog,

    /// Run counters.
    stats: SearchStats,

    /// Start time.
    start_time: Option<Instant>,

    /// Settings.
    settings: MipSettings,
}

impl<'a, O: RelaxationOracle + ?Sized> BranchAndBound<'a, O> {
    /// Create an engine, checking the settings and the oracle's shape.
    pub fn new(oracle: &'a O, settings: MipSettings) -> MipResult<Self> {
        settings.validate()?;

        let n = oracle.num_vars();
        if let Some(&var) = oracle.branching_vars().iter().find(|&&v| v >= n) {
            return Err(MipError::InvalidProblem(format!(
                "branching variable {} out of range ({} variables)",
                var, n
            )));
        }

        Ok(Self {
            oracle,
            branching: BranchingSelector::new(settings.int_feas_tol),
            incumbent: IncumbentTracker::new(oracle.sense()),
            log: NodeLog::new(),
            stats: SearchStats::default(),
            start_time: None,
            settings,
        })
    }

    /// Run the search from the root and return the result.
    pub fn run(&mut self) -> BnbSolution {
        self.incumbent.reset();
        self.log.clear();
        self.stats = SearchStats::default();
        self.start_time = Some(Instant::now());

        if self.settings.verbose {
            info!(
                "Branch-and-bound: {} variables, {} branching, {:?} traversal",
                self.oracle.num_vars(),
                self.oracle.branching_vars().len(),
                self.settings.traversal
            );
        }

        match self.settings.traversal {
            Traversal::Recursive => self.explore(&ConstraintSet::new(), None, NodeId::root()),
            Traversal::ExplicitStack => self.explore_with_stack(),
        }

        self.finalize()
    }

    /// Visit `node_id` and, recursively, its whole subtree.
    ///
    /// Appends to the current log and incumbent without resetting them.
    pub fn explore(
        &mut self,
        constraints: &ConstraintSet,
        parent_id: Option<NodeId>,
        node_id: NodeId,
    ) {
        if let Some(children) = self.process_node(constraints, parent_id, node_id) {
            for child in children {
                self.explore(&child.constraints, child.parent_id, child.id);
            }
        }
    }

    /// Same visiting order as [`BranchAndBound::explore`] from the root,
    /// driven by a pending-node stack.
    fn explore_with_stack(&mut self) {
        let mut stack = NodeStack::new();
        stack.push(PendingNode {
            constraints: ConstraintSet::new(),
            parent_id: None,
            id: NodeId::root(),
        });

        while let Some(node) = stack.pop() {
            let PendingNode {
                constraints,
                parent_id,
                id,
            } = node;
            if let Some([down, up]) = self.process_node(&constraints, parent_id, id) {
                stack.push(up);
                stack.push(down);
            }
        }

        debug!(
            "stack search pushed {} nodes, peak {} pending",
            stack.total_added(),
            stack.peak()
        );
    }

    /// Bound, classify and log one node; return its children if it branched.
    fn process_node(
        &mut self,
        constraints: &ConstraintSet,
        parent_id: Option<NodeId>,
        node_id: NodeId,
    ) -> Option<[PendingNode; 2]> {
        let depth = constraints.len();
        self.stats.nodes_explored += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let (relaxation, failure) = match self
            .oracle
            .solve(constraints)
            .and_then(|r| self.check_relaxation(r, constraints))
        {
            Ok(r) => (r, None),
            Err(e) => {
                warn!("Node {}: oracle failed, treating as infeasible: {}", node_id, e);
                self.stats.oracle_failures += 1;
                (Relaxation::Infeasible, Some(e.to_string()))
            }
        };

        let mut record = NodeRecord::new(
            node_id,
            parent_id,
            depth,
            constraints.last().copied(),
            relaxation.bound(self.oracle.sense()),
            relaxation.solution().map(<[f64]>::to_vec),
        );
        record.failure = failure;

        let children = self.classify(&mut record, relaxation, constraints);

        trace!(
            "node {} (parent {:?}, depth {}): bound {:.6} -> {:?}",
            record.id,
            record.parent_id,
            record.depth,
            record.bound,
            record.class
        );

        self.log.push(record);
        self.log_progress();

        children
    }

    /// Apply the pruning, integrality and branching rules to a fresh record.
    fn classify(
        &mut self,
        record: &mut NodeRecord,
        relaxation: Relaxation,
        constraints: &ConstraintSet,
    ) -> Option<[PendingNode; 2]> {
        let oracle = self.oracle;
        let sense = oracle.sense();
        let tol = self.settings.int_feas_tol;

        let Relaxation::Feasible { value, solution } = relaxation else {
            record.class = NodeClass::Pruned;
            self.stats.nodes_pruned += 1;
            return None;
        };

        if sense.can_prune(value, self.incumbent.value, tol) {
            record.class = NodeClass::Pruned;
            self.stats.nodes_pruned += 1;
            return None;
        }

        let branching_vars = oracle.branching_vars();
        match self.branching.select(&solution, branching_vars) {
            None => {
                record.class = NodeClass::PrunedInteger;
                self.stats.integer_nodes += 1;

                let mut point = solution;
                for &var in branching_vars {
                    point[var] = point[var].round();
                }

                if self.incumbent.update(&point, value, tol) {
                    record.is_new_incumbent = true;
                    self.stats.incumbent_updates += 1;
                    if self.settings.verbose {
                        info!("New incumbent: obj={:.6} at node {}", value, record.id);
                    }
                }
                None
            }
            Some(decision) => {
                let (down_id, up_id) = record.id.children();
                record.class = NodeClass::Branched;
                self.stats.nodes_branched += 1;

                debug!(
                    "Node {}: branching on {} = {:.6}",
                    record.id,
                    oracle.var_name(decision.var),
                    decision.value
                );

                Some([
                    PendingNode {
                        constraints: constraints.with(decision.down_branch()),
                        parent_id: Some(record.id.clone()),
                        id: down_id,
                    },
                    PendingNode {
                        constraints: constraints.with(decision.up_branch()),
                        parent_id: Some(record.id.clone()),
                        id: up_id,
                    },
                ])
            }
        }
    }

    /// Reject oracle answers that break the oracle contract.
    ///
    /// The relaxed point must respect every branching bound of the node,
    /// otherwise the same variable could be split forever.
    fn check_relaxation(
        &self,
        relaxation: Relaxation,
        constraints: &ConstraintSet,
    ) -> MipResult<Relaxation> {
        if let Relaxation::Feasible { value, solution } = &relaxation {
            if solution.len() != self.oracle.num_vars() {
                return Err(MipError::OracleError(format!(
                    "relaxed solution has {} entries, expected {}",
                    solution.len(),
                    self.oracle.num_vars()
                )));
            }
            if !value.is_finite() || solution.iter().any(|v| !v.is_finite()) {
                return Err(MipError::OracleError(
                    "relaxation returned a non-finite value".to_string(),
                ));
            }
            if let Some(c) = constraints.violated_by(solution, self.settings.int_feas_tol) {
                return Err(MipError::OracleError(format!(
                    "relaxed solution breaks branching bound {}",
                    c
                )));
            }
        }
        Ok(relaxation)
    }

    /// Log progress (if verbose).
    fn log_progress(&self) {
        if !self.settings.verbose {
            return;
        }

        if self.stats.nodes_explored % self.settings.log_freq != 0 {
            return;
        }

        info!(
            "Nodes: {} | Pruned: {} | Depth: {} | Incumbent: {:.6} | Failures: {} | Time: {:.1}s",
            self.stats.nodes_explored,
            self.stats.nodes_pruned,
            self.stats.max_depth,
            self.incumbent.value,
            self.stats.oracle_failures,
            self.elapsed_ms() as f64 / 1000.0,
        );
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Nodes visited so far in the current run.
    pub fn log(&self) -> &NodeLog {
        &self.log
    }

    /// Counters of the current run.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Finalize the run and return the solution.
    fn finalize(&mut self) -> BnbSolution {
        self.stats.solve_time_ms = self.elapsed_ms();

        let proven = self.stats.oracle_failures == 0;
        let status = match (self.incumbent.has_incumbent(), proven) {
            (true, true) => BnbStatus::Optimal,
            (false, true) => BnbStatus::Infeasible,
            (true, false) => BnbStatus::Feasible,
            (false, false) => BnbStatus::Unknown,
        };

        if self.settings.verbose {
            info!(
                "Search finished: {:?}, obj={:.6}, {} nodes, {} incumbent updates, {:.1}s",
                status,
                self.incumbent.value,
                self.stats.nodes_explored,
                self.stats.incumbent_updates,
                self.stats.solve_time_ms as f64 / 1000.0,
            );
        }

        BnbSolution {
            status,
            sense: self.oracle.sense(),
            value: self.incumbent.value,
            solution: self.incumbent.solution.clone().unwrap_or_default(),
            nodes: self.log.clone(),
            stats: self.stats.clone(),
        }
    }
}
