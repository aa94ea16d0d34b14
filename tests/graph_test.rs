//! End-to-end scenario tests for the dependency graph
//!
//! These tests drive the whole public surface against one fixed topology:
//!
//! ```text
//! b ──▶ a ◀── c ◀── d        y ──▶ x        1 ──▶ 0
//! ```
//!
//! (an arrow reads "depends on"), and verify:
//! 1. Leaf and layer computation across disconnected components
//! 2. The safe-remove precondition
//! 3. Autoremove cascades and the exact surviving node sets
//! 4. Index consistency after every mutation

use std::collections::HashSet;

use desmos::{Graph, GraphError};

fn scenario_graph() -> Graph<&'static str> {
    let mut graph = Graph::new();
    graph.add_dependency("b", "a").unwrap();
    graph.add_dependency("c", "a").unwrap();
    graph.add_dependency("d", "c").unwrap();

    graph.add_dependency("y", "x").unwrap();

    graph.add_dependency("1", "0").unwrap();

    graph
}

fn node_set(graph: &Graph<&'static str>) -> HashSet<&'static str> {
    graph.nodes().copied().collect()
}

fn set<const L: usize>(nodes: [&'static str; L]) -> HashSet<&'static str> {
    nodes.into_iter().collect()
}

#[test]
fn leaves_across_components() {
    let graph = scenario_graph();
    assert_eq!(graph.leaves(), set(["a", "x", "0"]));
}

#[test]
fn layers_across_components() {
    let graph = scenario_graph();

    let layers = graph.layers();
    assert_eq!(
        layers,
        vec![set(["a", "x", "0"]), set(["b", "c", "y", "1"]), set(["d"])]
    );

    // Layering works on a private copy; the source graph is intact.
    assert_eq!(graph.len(), 8);
    graph.assert_relationships();
}

#[test]
fn reachability_through_the_chain() {
    let graph = scenario_graph();

    assert!(graph.depends_on_directly(&"d", &"c"));
    assert!(graph.depends_on(&"d", &"a"));
    assert!(!graph.depends_on_directly(&"d", &"a"));
    assert!(!graph.depends_on(&"a", &"d"));

    // Closures in the two directions mirror each other.
    assert_eq!(graph.dependencies(&"d"), Some(set(["c", "a"])));
    assert_eq!(graph.dependents(&"a"), Some(set(["b", "c", "d"])));
    assert_eq!(graph.dependencies(&"q"), None);
}

#[test]
fn safe_remove_requires_no_dependents() {
    let mut graph = scenario_graph();

    graph.remove(&"y").unwrap();
    graph.assert_relationships();
    graph.remove(&"x").unwrap();
    graph.assert_relationships();

    let err = graph.remove(&"a").unwrap_err();
    assert_eq!(err, GraphError::DependentExists { node: "a" });

    // "a" and its edges must be untouched by the failed attempt.
    assert_eq!(graph.dependents(&"a"), Some(set(["b", "c", "d"])));
    graph.assert_relationships();
}

#[test]
fn auto_remove_reclaims_exactly_the_orphaned_chain() {
    struct Case {
        removes: &'static [&'static str],
        remaining: &'static [&'static str],
    }

    let cases = [
        Case {
            removes: &["d"],
            remaining: &["a", "b", "x", "y", "0", "1"],
        },
        Case {
            removes: &["a", "x"],
            remaining: &["0", "1"],
        },
        Case {
            removes: &["a", "x", "1"],
            remaining: &[],
        },
    ];

    for case in cases {
        let mut graph = scenario_graph();
        for target in case.removes {
            graph.auto_remove(target);
            graph.assert_relationships();
        }

        assert_eq!(
            node_set(&graph),
            case.remaining.iter().copied().collect(),
            "after auto-removing {:?}",
            case.removes
        );
    }
}

#[test]
fn auto_removing_every_leaf_empties_the_graph() {
    let mut graph = scenario_graph();

    for leaf in graph.leaves() {
        graph.auto_remove(&leaf);
        graph.assert_relationships();
    }

    assert!(graph.is_empty());
    assert!(graph.layers().is_empty());
}

#[test]
fn force_remove_takes_the_dependent_subtree_only() {
    let mut graph = scenario_graph();

    graph.force_remove(&"a");

    // a and everything that (transitively) depended on it are gone; the
    // unrelated components are untouched.
    assert_eq!(node_set(&graph), set(["x", "y", "0", "1"]));
    graph.assert_relationships();
}

#[test]
fn undepend_then_readd_round_trip() {
    let mut graph = scenario_graph();

    graph.remove_dependency(&"d", &"c").unwrap();
    assert!(!graph.depends_on(&"d", &"c"));
    assert!(graph.contains(&"d"));
    assert_eq!(graph.leaves(), set(["a", "x", "0", "d"]));
    graph.assert_relationships();

    // The severed edge can be re-established as if it never existed.
    graph.add_dependency("d", "c").unwrap();
    assert!(graph.depends_on_directly(&"d", &"c"));
    assert_eq!(
        graph.layers(),
        vec![set(["a", "x", "0"]), set(["b", "c", "y", "1"]), set(["d"])]
    );
}

#[test]
fn undepend_rejects_transitive_relationships() {
    let mut graph = scenario_graph();

    let err = graph.remove_dependency(&"d", &"a").unwrap_err();
    assert!(matches!(err, GraphError::NoSuchDependency { .. }));
    graph.assert_relationships();
}

#[test]
fn rejected_cycle_leaves_no_trace() {
    let mut graph = scenario_graph();

    let err = graph.add_dependency("a", "d").unwrap_err();
    assert!(matches!(err, GraphError::CircularDependency { .. }));

    assert!(!graph.has_cycle());
    assert_eq!(graph.len(), 8);
    graph.assert_relationships();
}
