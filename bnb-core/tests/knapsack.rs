//! End-to-end tests of the search on the 7-item knapsack.

use bnb_core::{
    solve, BnbStatus, BranchAndBound, BranchConstraint, ConstraintSet, GreedyKnapsackOracle,
    KnapsackProblem, LpOracle, MipSettings, NodeClass, NodeId, Relaxation, RelaxationOracle,
    StepBudget, Traversal,
};
use bnb_lp::LpSettings;

const EPS: f64 = 1e-6;

fn textbook() -> KnapsackProblem {
    KnapsackProblem::new(
        vec![10.0, 15.0, 36.0, 20.0, 15.0, 18.0, 20.0],
        vec![10.0, 17.0, 49.0, 30.0, 11.0, 21.0, 31.0],
        100.0,
    )
    .unwrap()
}

/// Best value over all 2^n selections.
fn brute_force(problem: &KnapsackProblem) -> (f64, Vec<f64>) {
    let n = problem.num_items();
    let mut best = (f64::NEG_INFINITY, Vec::new());

    for mask in 0u32..(1 << n) {
        let x: Vec<f64> = (0..n).map(|i| ((mask >> i) & 1) as f64).collect();
        if problem.total_cost(&x) > problem.capacity() + EPS {
            continue;
        }
        let value = problem.total_value(&x);
        if value > best.0 {
            best = (value, x);
        }
    }
    best
}

#[test]
fn test_greedy_search_finds_optimum() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Optimal);
    assert!((sol.value - 84.0).abs() < 1e-9);
    assert_eq!(sol.solution, vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);

    let (best, _) = brute_force(oracle.problem());
    assert!((sol.value - best).abs() < 1e-9);
}

#[test]
fn test_greedy_search_tree() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let sol = solve(&oracle, MipSettings::default()).unwrap();
    let nodes = sol.nodes.records();

    assert_eq!(nodes.len(), 27);
    assert_eq!(sol.stats.nodes_explored, 27);

    // Root
    assert_eq!(nodes[0].id, NodeId::root());
    assert_eq!(nodes[0].parent_id, None);
    assert_eq!(nodes[0].class, NodeClass::Branched);
    assert!((nodes[0].bound - 88.12244897959184).abs() < 1e-9);

    // First dive: x2 <= 0, then x6 <= 0 reaches an integral leaf
    let first: Vec<(u64, NodeClass)> = nodes[..4]
        .iter()
        .map(|n| (n.id.as_u64().unwrap(), n.class))
        .collect();
    assert_eq!(
        first,
        vec![
            (1, NodeClass::Branched),
            (3, NodeClass::Branched),
            (7, NodeClass::PrunedInteger),
            (8, NodeClass::Branched),
        ]
    );
    assert_eq!(nodes[1].branch, Some(BranchConstraint::le(2, 0.0)));

    let trace: Vec<u64> = sol
        .nodes
        .incumbent_trace()
        .iter()
        .map(|(id, _)| id.as_u64().unwrap())
        .collect();
    assert_eq!(trace, vec![7, 37, 20, 183]);

    let infeasible: Vec<u64> = nodes
        .iter()
        .filter(|n| n.is_infeasible())
        .map(|n| n.id.as_u64().unwrap())
        .collect();
    assert_eq!(infeasible, vec![88, 184, 92]);
    for node in nodes.iter().filter(|n| n.is_infeasible()) {
        assert_eq!(node.bound, f64::NEG_INFINITY);
        assert_eq!(node.class, NodeClass::Pruned);
        assert!(node.failure.is_none());
    }

    assert_eq!(sol.stats.incumbent_updates, 4);
    assert_eq!(sol.stats.oracle_failures, 0);
}

#[test]
fn test_children_follow_numbering() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    let mut seen = std::collections::HashSet::new();
    for node in &sol.nodes {
        assert!(seen.insert(node.id.clone()), "duplicate node id {}", node.id);

        let children: Vec<_> = sol.nodes.children_of(&node.id).collect();
        if node.class == NodeClass::Branched {
            let k = node.id.as_u64().unwrap();
            assert_eq!(children.len(), 2);
            assert_eq!(children[0].id.as_u64(), Some(2 * k + 1));
            assert_eq!(children[1].id.as_u64(), Some(2 * k + 2));
            assert_eq!(children[0].depth, node.depth + 1);

            let down = children[0].branch.unwrap();
            let up = children[1].branch.unwrap();
            assert_eq!(down.var, up.var);
            assert_eq!(down.bound + 1.0, up.bound);
        } else {
            assert!(children.is_empty());
        }
    }
}

#[test]
fn test_incumbent_is_monotone() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    let trace = sol.nodes.incumbent_trace();
    for pair in trace.windows(2) {
        assert!(pair[1].1 > pair[0].1 + EPS);
    }
    assert_eq!(trace.last().map(|&(_, v)| v), Some(sol.value));
}

#[test]
fn test_fully_fixed_set_is_integral() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let set: ConstraintSet = [0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]
        .iter()
        .enumerate()
        .map(|(var, &v)| {
            if v == 0.0 {
                BranchConstraint::le(var, 0.0)
            } else {
                BranchConstraint::ge(var, 1.0)
            }
        })
        .collect();

    let root = GreedyKnapsackOracle::new(textbook());
    let mut engine = BranchAndBound::new(&root, MipSettings::default()).unwrap();
    engine.explore(&set, None, NodeId::root());

    let node = &engine.log().records()[0];
    assert_eq!(node.class, NodeClass::PrunedInteger);
    assert!(node.is_new_incumbent);
    assert!((node.bound - 84.0).abs() < 1e-9);
    assert_eq!(engine.log().len(), 1);

    match oracle.solve(&set).unwrap() {
        Relaxation::Feasible { solution, .. } => {
            assert_eq!(solution, vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
        }
        Relaxation::Infeasible => panic!("fixed selection fits the knapsack"),
    }
}

#[test]
fn test_runs_are_deterministic() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let a = solve(&oracle, MipSettings::default()).unwrap();
    let b = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.solution, b.solution);
    assert_eq!(a.value, b.value);
}

#[test]
fn test_stack_traversal_gives_same_log() {
    let oracle = GreedyKnapsackOracle::new(textbook());
    let recursive = solve(&oracle, MipSettings::default()).unwrap();
    let stacked = solve(
        &oracle,
        MipSettings::default().with_traversal(Traversal::ExplicitStack),
    )
    .unwrap();

    assert_eq!(recursive.nodes, stacked.nodes);
    assert_eq!(recursive.solution, stacked.solution);
}

#[test]
fn test_lp_oracle_agrees_with_greedy() {
    let greedy = GreedyKnapsackOracle::new(textbook());
    let lp = LpOracle::new(textbook(), LpSettings::default()).unwrap();

    let a = solve(&greedy, MipSettings::default()).unwrap();
    let b = solve(&lp, MipSettings::default()).unwrap();

    assert_eq!(b.status, BnbStatus::Optimal);
    assert!((a.value - b.value).abs() < 1e-6);
    assert_eq!(b.solution, vec![0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);

    let shape = |sol: &bnb_core::BnbSolution| -> Vec<(NodeId, NodeClass)> {
        sol.nodes.iter().map(|n| (n.id.clone(), n.class)).collect()
    };
    assert_eq!(shape(&a), shape(&b));

    for (x, y) in a.nodes.iter().zip(b.nodes.iter()) {
        if x.is_infeasible() {
            assert!(y.is_infeasible());
        } else {
            assert!((x.bound - y.bound).abs() < 1e-6);
        }
    }
}

#[test]
fn test_step_budget_cuts_search_short() {
    let budget = StepBudget::new(GreedyKnapsackOracle::new(textbook()), 5);
    let sol = solve(&budget, MipSettings::default()).unwrap();

    assert!(budget.exhausted());
    assert_eq!(sol.status, BnbStatus::Feasible);
    assert!(sol.stats.oracle_failures > 0);
    assert!(sol.nodes.iter().filter(|n| n.failure.is_some()).all(|n| n.class == NodeClass::Pruned));

    // Node 7 (value 78) is the 3rd node visited, so an incumbent exists
    assert!((sol.value - 78.0).abs() < 1e-9);
}

#[test]
fn test_zero_budget_leaves_status_unknown() {
    let budget = StepBudget::new(GreedyKnapsackOracle::new(textbook()), 0);
    let sol = solve(&budget, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Unknown);
    assert_eq!(sol.nodes.len(), 1);
    assert!(sol.solution.is_empty());
    assert_eq!(sol.value, f64::NEG_INFINITY);
}

#[test]
fn test_nothing_fits() {
    let problem = KnapsackProblem::new(vec![5.0, 6.0], vec![3.0, 4.0], 2.0).unwrap();
    let oracle = GreedyKnapsackOracle::new(problem);
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    // The empty selection is always feasible
    assert_eq!(sol.status, BnbStatus::Optimal);
    assert_eq!(sol.value, 0.0);
    assert_eq!(sol.solution, vec![0.0, 0.0]);
}

/// One big item plus `n` low-value unit items; capacity leaves half a unit
/// spare, so the first dive excludes every unit item in turn.
fn long_dive(n: usize) -> KnapsackProblem {
    let mut values = vec![100.0];
    let mut costs = vec![100.0];
    values.extend(std::iter::repeat(0.01).take(n));
    costs.extend(std::iter::repeat(1.0).take(n));
    KnapsackProblem::new(values, costs, 100.5).unwrap()
}

#[test]
fn test_deep_search_keeps_numbering() {
    let oracle = GreedyKnapsackOracle::new(long_dive(70));
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Optimal);
    assert!((sol.value - 100.0).abs() < 1e-9);
    assert_eq!(sol.solution[0], 1.0);
    assert!(sol.solution[1..].iter().all(|&v| v == 0.0));

    // Root plus both children at each of the 70 levels
    assert_eq!(sol.nodes.len(), 141);
    assert_eq!(sol.stats.max_depth, 70);
    assert_eq!(sol.stats.oracle_failures, 0);

    // The all-down leaf is node 2^71 - 1
    let trace = sol.nodes.incumbent_trace();
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].0.as_u64(), None);
    assert_eq!(trace[0].0.to_string(), "2361183241434822606847");

    for node in &sol.nodes {
        if let Some(parent) = &node.parent_id {
            let (down, up) = parent.children();
            assert!(node.id == down || node.id == up);
        }
    }
}

#[test]
fn test_deep_search_traversals_agree() {
    let oracle = GreedyKnapsackOracle::new(long_dive(80));
    let recursive = solve(&oracle, MipSettings::default()).unwrap();
    let stacked = solve(
        &oracle,
        MipSettings::default().with_traversal(Traversal::ExplicitStack),
    )
    .unwrap();

    assert_eq!(recursive.nodes.len(), 161);
    assert_eq!(recursive.nodes, stacked.nodes);
}
