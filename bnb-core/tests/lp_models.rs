//! Searches driven by the LP oracle: facility location and small integer programs.

use bnb_core::{
    solve, BnbStatus, BranchConstraint, ConstraintSet, FacilityLocation, IntegerProgram,
    LpModel, LpOracle, MipError, MipSettings, NodeClass, ObjectiveSense, Relaxation,
    RelaxationOracle, Traversal,
};
use bnb_lp::LpSettings;

fn names(s: &[&str]) -> Vec<String> {
    s.iter().map(|n| n.to_string()).collect()
}

/// Four warehouses, five customers.
fn q4() -> FacilityLocation {
    FacilityLocation::new(
        names(&["A", "B", "C", "D"]),
        names(&["a", "b", "c", "d", "e"]),
        vec![50.0, 32.0, 28.0, 36.0],
        vec![35.0, 28.0, 22.0, 28.0],
        vec![14.0, 12.0, 10.0, 12.0, 8.0],
        vec![
            vec![2.0, 5.0, 1.0, 2.0, 5.0],
            vec![4.0, 4.0, 9.0, 1.0, 4.0],
            vec![1.0, 8.0, 5.0, 6.0, 2.0],
            vec![7.0, 1.0, 2.0, 1.0, 8.0],
        ],
    )
    .unwrap()
}

fn two_var(objective: [f64; 2], rows: [[f64; 3]; 2]) -> IntegerProgram {
    IntegerProgram::new(
        ObjectiveSense::Maximize,
        objective.to_vec(),
        rows.iter()
            .map(|r| (vec![r[0], r[1]], r[2]))
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_facility_location_q4() {
    let oracle = LpOracle::new(q4(), LpSettings::default()).unwrap();
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Optimal);
    assert_eq!(sol.sense, ObjectiveSense::Minimize);
    assert!((sol.value - 170.0).abs() < 1e-6, "got {}", sol.value);
    assert_eq!(oracle.model().open_warehouses(&sol.solution), vec!["B", "C", "D"]);

    // Only the open decisions are branched on
    assert!(sol.nodes.iter().all(|n| n.branch.map_or(true, |c| c.var < 4)));
}

#[test]
fn test_facility_location_matches_enumeration() {
    let oracle = LpOracle::new(q4(), LpSettings::default()).unwrap();

    // Fix every y and solve the remaining transportation LP
    let mut best = f64::INFINITY;
    for mask in 0u32..16 {
        let set: ConstraintSet = (0..4)
            .map(|i| {
                if mask & (1 << i) != 0 {
                    BranchConstraint::ge(i, 1.0)
                } else {
                    BranchConstraint::le(i, 0.0)
                }
            })
            .collect();
        if let Relaxation::Feasible { value, .. } = oracle.solve(&set).unwrap() {
            best = best.min(value);
        }
    }

    let sol = solve(&oracle, MipSettings::default()).unwrap();
    assert!((sol.value - best).abs() < 1e-6);
}

#[test]
fn test_facility_location_traversals_agree() {
    let oracle = LpOracle::new(q4(), LpSettings::default()).unwrap();
    let recursive = solve(&oracle, MipSettings::default()).unwrap();
    let stacked = solve(
        &oracle,
        MipSettings::default().with_traversal(Traversal::ExplicitStack),
    )
    .unwrap();

    assert_eq!(recursive.nodes, stacked.nodes);
}

#[test]
fn test_infeasible_branches_record_worst_bound() {
    let oracle = LpOracle::new(q4(), LpSettings::default()).unwrap();
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    for node in sol.nodes.iter().filter(|n| n.is_infeasible()) {
        assert_eq!(node.bound, f64::INFINITY);
        assert_eq!(node.class, NodeClass::Pruned);
    }
}

#[test]
fn test_two_variable_programs() {
    let cases = [
        ([5.0, 2.0], [[3.0, 1.0, 12.0], [1.0, 1.0, 5.0]], 20.0),
        ([2.0, 3.0], [[1.0, 2.0, 10.0], [3.0, 4.0, 25.0]], 17.0),
        ([4.0, 3.0], [[4.0, 9.0, 26.0], [8.0, 5.0, 17.0]], 8.0),
        ([1.0, 1.0], [[2.0, 2.0, 3.0], [7.0, 3.0, 22.0]], 1.0),
    ];

    for (objective, rows, expected) in cases {
        let ip = two_var(objective, rows);
        let oracle = LpOracle::new(ip.clone(), LpSettings::default()).unwrap();
        let sol = solve(&oracle, MipSettings::default()).unwrap();

        assert_eq!(sol.status, BnbStatus::Optimal);
        assert!(
            (sol.value - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            sol.value
        );
        assert!(ip.is_feasible(&sol.solution, 1e-6));
        assert!(sol.solution.iter().all(|v| v.fract() == 0.0));
        assert!((ip.objective_value(&sol.solution) - sol.value).abs() < 1e-6);
    }
}

#[test]
fn test_first_program_tree() {
    // max 5x + 2y: root (3.5, 1.5) branches on x
    let ip = two_var([5.0, 2.0], [[3.0, 1.0, 12.0], [1.0, 1.0, 5.0]]);
    let oracle = LpOracle::new(ip, LpSettings::default()).unwrap();
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    let summary: Vec<(u64, NodeClass)> = sol
        .nodes
        .iter()
        .map(|n| (n.id.as_u64().unwrap(), n.class))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, NodeClass::Branched),
            (3, NodeClass::PrunedInteger),
            (4, NodeClass::PrunedInteger),
        ]
    );
    assert!((sol.nodes.records()[0].bound - 20.5).abs() < 1e-9);
    assert_eq!(sol.solution, vec![4.0, 0.0]);
    assert_eq!(sol.nodes.incumbent_trace().len(), 2);
}

#[test]
fn test_infeasible_program() {
    // x + y >= 3 and x + y <= 2 written as <= rows
    let ip = IntegerProgram::new(
        ObjectiveSense::Maximize,
        vec![1.0, 1.0],
        vec![(vec![-1.0, -1.0], -3.0), (vec![1.0, 1.0], 2.0)],
    )
    .unwrap();
    let oracle = LpOracle::new(ip, LpSettings::default()).unwrap();
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Infeasible);
    assert_eq!(sol.nodes.len(), 1);
    assert!(sol.solution.is_empty());
}

#[test]
fn test_unbounded_relaxation_is_recorded_as_failure() {
    let ip = IntegerProgram::new(ObjectiveSense::Maximize, vec![1.0], vec![]).unwrap();
    let oracle = LpOracle::new(ip, LpSettings::default()).unwrap();
    let sol = solve(&oracle, MipSettings::default()).unwrap();

    assert_eq!(sol.status, BnbStatus::Unknown);
    assert_eq!(sol.stats.oracle_failures, 1);
    assert!(sol.nodes.records()[0].failure.is_some());
}

#[test]
fn test_invalid_model_is_rejected_before_search() {
    struct OutOfRange;

    impl LpModel for OutOfRange {
        fn sense(&self) -> ObjectiveSense {
            ObjectiveSense::Minimize
        }

        fn relaxation(&self) -> bnb_lp::LpProblem {
            bnb_lp::LpProblem::new(bnb_lp::Sense::Minimize, vec![1.0])
        }

        fn branching_vars(&self) -> Vec<usize> {
            vec![5]
        }
    }

    assert!(matches!(
        LpOracle::new(OutOfRange, LpSettings::default()),
        Err(MipError::InvalidProblem(_))
    ));

    let bad = FacilityLocation::new(
        names(&["A"]),
        names(&["a"]),
        vec![1.0],
        vec![f64::NAN],
        vec![1.0],
        vec![vec![1.0]],
    );
    assert!(matches!(bad, Err(MipError::InvalidProblem(_))));
}
