//! Property-based tests for feature extraction and dependency graphs.
//!
//! Random valid circuits are generated from a small gate set; every property
//! holds for any circuit the model accepts.

use proptest::prelude::*;
use qlens_eval::features::{self, DEPTH, TOTAL_GATES, TWO_QUBIT_COUNT, TWO_QUBIT_RATIO};
use qlens_eval::{AlertRule, FeatureVector, Severity};
use qlens_ir::{Circuit, DependencyGraph};

/// One generated instruction: a tag and distinct operand qubits.
fn arb_op(num_qubits: u32) -> BoxedStrategy<(&'static str, Vec<u32>)> {
    let single = (prop::sample::select(vec!["h", "x", "t", "rz", "measure"]), 0..num_qubits)
        .prop_map(|(tag, q)| (tag, vec![q]));
    if num_qubits < 2 {
        return single.boxed();
    }
    let pair = (prop::sample::select(vec!["cx", "cz", "swap"]), 0..num_qubits, 1..num_qubits)
        .prop_map(move |(tag, a, offset)| (tag, vec![a, (a + offset) % num_qubits]));
    prop_oneof![3 => single, 2 => pair].boxed()
}

/// Circuits with 1-6 qubits and 1-40 gates.
fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=6).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_op(num_qubits), 1..=40).prop_map(move |ops| {
            Circuit::from_ops(num_qubits, ops).expect("generated circuits are valid")
        })
    })
}

proptest! {
    #[test]
    fn extract_is_deterministic(circuit in arb_circuit()) {
        let first = features::extract(&circuit);
        let second = features::extract(&circuit);
        prop_assert_eq!(&first, &second);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn depth_never_exceeds_gate_count(circuit in arb_circuit()) {
        let fv = features::extract(&circuit);
        let depth = fv.get(DEPTH).unwrap();
        let total = fv.get(TOTAL_GATES).unwrap();
        prop_assert!(depth >= 1.0);
        prop_assert!(depth <= total);
    }

    #[test]
    fn dependency_graph_is_acyclic(circuit in arb_circuit()) {
        let dag = DependencyGraph::build(&circuit);
        prop_assert!(dag.is_acyclic());

        let order = dag.topological_order().unwrap();
        prop_assert_eq!(order.len(), circuit.num_gates());
        for (from, to) in dag.edge_list() {
            prop_assert!(from < to);
        }
        prop_assert!(dag.num_edges() <= 2 * circuit.num_gates());
    }

    #[test]
    fn critical_path_matches_depth(circuit in arb_circuit()) {
        let dag = DependencyGraph::build(&circuit);
        let path = dag.critical_path();
        prop_assert_eq!(path.len(), dag.depth());

        let edges = dag.edge_list();
        for pair in path.windows(2) {
            prop_assert!(edges.contains(&(pair[0], pair[1])));
        }
    }

    #[test]
    fn serial_chain_depth_equals_gate_count(len in 1_usize..=50) {
        let ops = (0..len).map(|i| if i % 2 == 0 { ("h", vec![0u32]) } else { ("cx", vec![0, 1]) });
        let circuit = Circuit::from_ops(2, ops).unwrap();
        let fv = features::extract(&circuit);
        prop_assert_eq!(fv.get(DEPTH), Some(len as f64));
        prop_assert_eq!(fv.get(TOTAL_GATES), Some(len as f64));
    }

    #[test]
    fn two_qubit_ratio_is_a_fraction(circuit in arb_circuit()) {
        let fv = features::extract(&circuit);
        let ratio = fv.get(TWO_QUBIT_RATIO).unwrap();
        let expected = fv.get(TWO_QUBIT_COUNT).unwrap() / fv.get(TOTAL_GATES).unwrap();
        prop_assert!((0.0..=1.0).contains(&ratio));
        prop_assert_eq!(ratio, expected);
    }
}

#[test]
fn empty_circuit_has_zero_depth_and_ratio() {
    let fv = features::extract(&Circuit::empty(4));
    assert_eq!(fv.get(TOTAL_GATES), Some(0.0));
    assert_eq!(fv.get(DEPTH), Some(0.0));
    assert_eq!(fv.get(TWO_QUBIT_RATIO), Some(0.0));
}

#[test]
fn rules_fire_independently_in_order() {
    let fv = FeatureVector::from_pairs([("depth", 10.0), ("cx_count", 1.0)]);
    let rules = vec![
        AlertRule::new("first", "depth > 5", Severity::Warning, "").unwrap(),
        AlertRule::new("second", "cx_count > 5", Severity::Warning, "").unwrap(),
        AlertRule::new("third", "depth >= 10", Severity::Critical, "").unwrap(),
    ];
    let alerts = qlens_eval::rules::evaluate(&fv, &rules).unwrap();
    let fired: Vec<&str> = alerts.iter().map(|a| a.rule.as_str()).collect();
    assert_eq!(fired, vec!["first", "third"]);
}
