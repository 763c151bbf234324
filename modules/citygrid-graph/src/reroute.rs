use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use citygrid_common::{GraphEdge, InfrastructureNode};

use crate::working::{FailureSet, WorkingGraph};

/// One dependency edge moved off a failed provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RerouteEntry {
    pub edge_id: String,
    pub old_target: String,
    pub new_target: String,
}

/// Retarget every edge that points at a failed node to the least-loaded
/// operational node of the same type.
///
/// Works on a copy of the graph's edges and returns it alongside the log of
/// moves. Edges are handled in canonical order and each load estimate sees the
/// moves made before it, so earlier edges get first pick. Ties go to the
/// alternative listed first in the node collection. Edges whose failed target
/// is unknown, or that have no alternative, are left where they are.
pub fn reroute(graph: &WorkingGraph, failed: &FailureSet) -> (Vec<RerouteEntry>, Vec<GraphEdge>) {
    let mut edges = graph.edges().to_vec();
    let mut rerouted = Vec::new();

    for i in 0..edges.len() {
        if !failed.contains(&edges[i].target) {
            continue;
        }
        let Some(failed_node) = graph.node(&edges[i].target) else {
            continue;
        };
        let provider_type = failed_node.node_type;

        let mut alternatives: Vec<(&InfrastructureNode, f64)> = graph
            .distinct_nodes()
            .filter(|n| {
                n.node_type == provider_type && !failed.contains(&n.id) && n.id != edges[i].target
            })
            .map(|n| (n, provider_load(&edges, &n.id)))
            .collect();

        alternatives.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let Some(&(best, load)) = alternatives.first() else {
            debug!(edge_id = %edges[i].id, target = %edges[i].target, "No alternative provider");
            continue;
        };

        let edge = &mut edges[i];
        debug!(
            edge_id = %edge.id,
            from = %edge.target,
            to = %best.id,
            load,
            "Rerouted dependency"
        );
        rerouted.push(RerouteEntry {
            edge_id: edge.id.clone(),
            old_target: std::mem::replace(&mut edge.target, best.id.clone()),
            new_target: best.id.clone(),
        });
    }

    (rerouted, edges)
}

/// Aggregate load ratio over every edge currently pointing at `provider_id`.
/// A provider with no inbound capacity divides by 1.
fn provider_load(edges: &[GraphEdge], provider_id: &str) -> f64 {
    let (load, capacity) = edges
        .iter()
        .filter(|e| e.target == provider_id)
        .fold((0.0, 0.0), |(load, capacity), e| {
            (load + e.current_load, capacity + e.capacity)
        });
    let capacity = if capacity == 0.0 { 1.0 } else { capacity };
    load / capacity
}
