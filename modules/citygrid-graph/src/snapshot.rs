use std::collections::{HashMap, HashSet};

use citygrid_common::{GraphData, GraphEdge, InfrastructureNode};

use crate::working::WorkingGraph;

/// Read-only canonical graph. Built once at startup, shared behind an `Arc`,
/// and never written again. Simulations work on [`GraphSnapshot::working_copy`].
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    nodes: Vec<InfrastructureNode>,
    edges: Vec<GraphEdge>,
    node_by_id: HashMap<String, usize>,
}

/// Structural problems found in a snapshot. None of these stop the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotIssue {
    DuplicateNodeId(String),
    DuplicateEdgeId(String),
    DanglingSource { edge_id: String, node_id: String },
    DanglingTarget { edge_id: String, node_id: String },
}

impl std::fmt::Display for SnapshotIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotIssue::DuplicateNodeId(id) => write!(f, "duplicate node id {id}"),
            SnapshotIssue::DuplicateEdgeId(id) => write!(f, "duplicate edge id {id}"),
            SnapshotIssue::DanglingSource { edge_id, node_id } => {
                write!(f, "edge {edge_id} has unknown source {node_id}")
            }
            SnapshotIssue::DanglingTarget { edge_id, node_id } => {
                write!(f, "edge {edge_id} has unknown target {node_id}")
            }
        }
    }
}

impl GraphSnapshot {
    pub fn new(data: GraphData) -> Self {
        let node_by_id = index_nodes(&data.nodes);
        Self {
            nodes: data.nodes,
            edges: data.edges,
            node_by_id,
        }
    }

    /// Nodes in canonical order. Selection and tie-breaks depend on this order.
    pub fn nodes(&self) -> &[InfrastructureNode] {
        &self.nodes
    }

    /// Edges in canonical order. Rerouting processes edges in this order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&InfrastructureNode> {
        self.node_by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// The unfiltered `{ nodes, edges }` payload.
    pub fn graph_data(&self) -> GraphData {
        GraphData {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Independent deep copy for a single simulation run.
    pub fn working_copy(&self) -> WorkingGraph {
        WorkingGraph::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                issues.push(SnapshotIssue::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for edge in &self.edges {
            if !seen.insert(edge.id.as_str()) {
                issues.push(SnapshotIssue::DuplicateEdgeId(edge.id.clone()));
            }
            if !self.node_by_id.contains_key(&edge.source) {
                issues.push(SnapshotIssue::DanglingSource {
                    edge_id: edge.id.clone(),
                    node_id: edge.source.clone(),
                });
            }
            if !self.node_by_id.contains_key(&edge.target) {
                issues.push(SnapshotIssue::DanglingTarget {
                    edge_id: edge.id.clone(),
                    node_id: edge.target.clone(),
                });
            }
        }

        issues
    }

    /// Baseline redundancy scan: nodes with exactly one dependency edge,
    /// before any event has happened.
    pub fn single_supplier_nodes(&self) -> Vec<String> {
        let mut out_degree: HashMap<&str, usize> = HashMap::new();
        for edge in &self.edges {
            *out_degree.entry(edge.source.as_str()).or_default() += 1;
        }
        first_occurrences(&self.nodes, &self.node_by_id)
            .filter(|n| out_degree.get(n.id.as_str()).copied() == Some(1))
            .map(|n| n.id.clone())
            .collect()
    }
}

/// First occurrence wins for duplicate ids.
pub(crate) fn index_nodes(nodes: &[InfrastructureNode]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id.clone()).or_insert(i);
    }
    index
}

/// Nodes in canonical order, skipping later copies of a duplicated id.
pub(crate) fn first_occurrences<'a>(
    nodes: &'a [InfrastructureNode],
    index: &'a HashMap<String, usize>,
) -> impl Iterator<Item = &'a InfrastructureNode> + 'a {
    nodes
        .iter()
        .enumerate()
        .filter(move |(i, n)| index.get(n.id.as_str()) == Some(i))
        .map(|(_, n)| n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(value: serde_json::Value) -> GraphSnapshot {
        GraphSnapshot::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn validate_reports_dangling_and_duplicate_ids() {
        let snap = snapshot(serde_json::json!({
            "nodes": [
                { "id": "a", "type": "power_generation", "name": "A", "lat": 0.0, "lng": 0.0 },
                { "id": "a", "type": "fuel_supply", "name": "A2", "lat": 0.0, "lng": 0.0 }
            ],
            "edges": [
                { "id": "e1", "source": "a", "target": "ghost", "type": "fuel_dependency", "capacity": 1.0, "current_load": 0.0 },
                { "id": "e1", "source": "nobody", "target": "a", "type": "fuel_dependency", "capacity": 1.0, "current_load": 0.0 }
            ]
        }));

        let issues = snap.validate();
        assert_eq!(
            issues,
            vec![
                SnapshotIssue::DuplicateNodeId("a".into()),
                SnapshotIssue::DanglingTarget { edge_id: "e1".into(), node_id: "ghost".into() },
                SnapshotIssue::DuplicateEdgeId("e1".into()),
                SnapshotIssue::DanglingSource { edge_id: "e1".into(), node_id: "nobody".into() },
            ]
        );
        assert_eq!(snap.node("a").unwrap().name, "A");
    }

    #[test]
    fn graph_query_returns_nodes_as_loaded() {
        let raw = serde_json::json!({
            "nodes": [
                {
                    "id": "p1", "type": "power_generation", "name": "Plant", "lat": 1.5, "lng": 2.5,
                    "status": "operational", "notes": "keep me", "capacity_mw": 820
                },
                {
                    "id": "h", "type": "residential", "name": "Homes", "lat": 1.5, "lng": 2.5,
                    "status": "operational", "household_count": 12000
                }
            ],
            "edges": [
                {
                    "id": "e1", "source": "h", "target": "p1", "type": "power_dependency",
                    "capacity": 10.0, "current_load": 4.0, "critical": true
                }
            ]
        });

        let snap = snapshot(raw.clone());
        assert_eq!(serde_json::to_value(snap.graph_data()).unwrap(), raw);
    }

    #[test]
    fn duplicated_ids_are_visited_once() {
        let snap = snapshot(serde_json::json!({
            "nodes": [
                { "id": "w", "type": "water_infrastructure", "name": "W", "lat": 0.0, "lng": 0.0 },
                { "id": "p", "type": "power_generation", "name": "P", "lat": 0.0, "lng": 0.0 },
                { "id": "w", "type": "water_infrastructure", "name": "W2", "lat": 0.0, "lng": 0.0 }
            ],
            "edges": [
                { "id": "e1", "source": "w", "target": "p", "type": "power_dependency", "capacity": 1.0, "current_load": 0.0 }
            ]
        }));

        assert_eq!(snap.single_supplier_nodes(), vec!["w".to_string()]);
        let copy = snap.working_copy();
        let names: Vec<&str> = copy.distinct_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["W", "P"]);
    }

    #[test]
    fn working_copy_does_not_alias_canonical_graph() {
        let snap = snapshot(serde_json::json!({
            "nodes": [
                { "id": "p", "type": "power_generation", "name": "P", "lat": 0.0, "lng": 0.0 },
                { "id": "q", "type": "power_generation", "name": "Q", "lat": 0.0, "lng": 0.0 },
                { "id": "w", "type": "water_infrastructure", "name": "W", "lat": 0.0, "lng": 0.0 }
            ],
            "edges": [
                { "id": "e1", "source": "w", "target": "p", "type": "power_dependency", "capacity": 1.0, "current_load": 0.0 }
            ]
        }));
        let before = snap.graph_data();

        let mut copy = snap.working_copy();
        copy.mark_failed("p");
        copy.edges_mut()[0].target = "q".into();

        assert_eq!(snap.graph_data(), before);
        assert!(!snap.node("p").unwrap().is_failed());
    }

    #[test]
    fn single_supplier_nodes_counts_outgoing_edges() {
        let snap = snapshot(serde_json::json!({
            "nodes": [
                { "id": "p", "type": "power_generation", "name": "P", "lat": 0.0, "lng": 0.0 },
                { "id": "w", "type": "water_infrastructure", "name": "W", "lat": 0.0, "lng": 0.0 },
                { "id": "r", "type": "residential", "name": "R", "lat": 0.0, "lng": 0.0 }
            ],
            "edges": [
                { "id": "e1", "source": "w", "target": "p", "type": "power_dependency", "capacity": 1.0, "current_load": 0.0 },
                { "id": "e2", "source": "r", "target": "p", "type": "power_dependency", "capacity": 1.0, "current_load": 0.0 },
                { "id": "e3", "source": "r", "target": "w", "type": "water_dependency", "capacity": 1.0, "current_load": 0.0 }
            ]
        }));

        assert_eq!(snap.single_supplier_nodes(), vec!["w".to_string()]);
    }
}
