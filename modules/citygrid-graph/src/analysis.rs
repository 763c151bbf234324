use std::collections::{HashMap, HashSet};

use citygrid_common::GraphEdge;

use crate::working::{FailureSet, WorkingGraph};

/// Surviving nodes left with exactly one operational input after rerouting.
/// Nodes with no inputs at all have nothing to protect and are not flagged.
pub fn find_vulnerable(graph: &WorkingGraph, edges: &[GraphEdge], failed: &FailureSet) -> Vec<String> {
    let mut operational_inputs: HashMap<&str, usize> = HashMap::new();
    for edge in edges.iter().filter(|e| !failed.contains(&e.target)) {
        *operational_inputs.entry(edge.source.as_str()).or_default() += 1;
    }

    graph
        .distinct_nodes()
        .filter(|n| !failed.contains(&n.id))
        .filter(|n| operational_inputs.get(n.id.as_str()).copied() == Some(1))
        .map(|n| n.id.clone())
        .collect()
}

/// Surviving nodes whose every dependency points at a failed node and was not
/// rerouted. Nodes without dependencies are never stranded.
///
/// Note the check pairs "target failed" with "edge not in the reroute log"
/// rather than recounting operational inputs the way [`find_vulnerable`]
/// does. On post-reroute edges the two readings agree, since a rerouted edge
/// no longer targets a failed node.
pub fn find_unresolvable(
    graph: &WorkingGraph,
    edges: &[GraphEdge],
    failed: &FailureSet,
    rerouted_edge_ids: &HashSet<&str>,
) -> Vec<String> {
    let mut dependencies: HashMap<&str, Vec<&GraphEdge>> = HashMap::new();
    for edge in edges {
        dependencies.entry(edge.source.as_str()).or_default().push(edge);
    }

    graph
        .distinct_nodes()
        .filter(|n| !failed.contains(&n.id))
        .filter(|n| {
            dependencies.get(n.id.as_str()).is_some_and(|deps| {
                deps.iter().all(|e| {
                    failed.contains(&e.target) && !rerouted_edge_ids.contains(e.id.as_str())
                })
            })
        })
        .map(|n| n.id.clone())
        .collect()
}
