use std::collections::{HashMap, HashSet};

use citygrid_common::{GraphEdge, InfrastructureNode, NodeStatus};

use crate::snapshot::{first_occurrences, index_nodes};

/// Per-run copy of the graph. Owns its nodes and edges outright, so nothing
/// done here is visible to the canonical snapshot or to other runs.
#[derive(Debug, Clone)]
pub struct WorkingGraph {
    nodes: Vec<InfrastructureNode>,
    edges: Vec<GraphEdge>,
    node_by_id: HashMap<String, usize>,
}

impl WorkingGraph {
    pub(crate) fn new(nodes: Vec<InfrastructureNode>, edges: Vec<GraphEdge>) -> Self {
        let node_by_id = index_nodes(&nodes);
        Self {
            nodes,
            edges,
            node_by_id,
        }
    }

    pub fn nodes(&self) -> &[InfrastructureNode] {
        &self.nodes
    }

    /// One node per id, first occurrence wins.
    pub fn distinct_nodes(&self) -> impl Iterator<Item = &InfrastructureNode> + '_ {
        first_occurrences(&self.nodes, &self.node_by_id)
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [GraphEdge] {
        &mut self.edges
    }

    pub fn node(&self, id: &str) -> Option<&InfrastructureNode> {
        self.node_by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// Display name for a node id, falling back to the id itself.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        match self.node(id) {
            Some(node) if !node.name.is_empty() => &node.name,
            _ => id,
        }
    }

    /// Unknown ids are ignored.
    pub fn mark_failed(&mut self, id: &str) {
        if let Some(&i) = self.node_by_id.get(id) {
            self.nodes[i].status = NodeStatus::Failed;
        }
    }
}

/// Grow-only set of failed node ids. There is no removal: once a node has
/// failed in a run it stays failed.
#[derive(Debug, Clone, Default)]
pub struct FailureSet {
    ids: HashSet<String>,
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the id was not already failed.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FailureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
