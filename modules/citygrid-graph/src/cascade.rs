use std::collections::HashMap;

use tracing::debug;

use citygrid_common::NodeType;

use crate::working::{FailureSet, WorkingGraph};

/// Propagate failures to a fixpoint.
///
/// A non-residential node fails once it has at least one dependency and every
/// dependency targets a failed node. Passes sweep the nodes in canonical order
/// and repeat until one adds nothing. Newly failed ids are added to `failed`
/// and returned in the order they fell.
pub fn cascade(graph: &WorkingGraph, failed: &mut FailureSet) -> Vec<String> {
    let mut dependencies: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        dependencies
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut cascaded = Vec::new();
    let mut pass = 0u32;
    loop {
        pass += 1;
        let mut changed = false;

        for node in graph.distinct_nodes() {
            if failed.contains(&node.id) || node.node_type == NodeType::Residential {
                continue;
            }
            let Some(targets) = dependencies.get(node.id.as_str()) else {
                continue;
            };
            if targets.iter().all(|target| failed.contains(target)) {
                failed.insert(node.id.clone());
                cascaded.push(node.id.clone());
                changed = true;
            }
        }

        debug!(pass, cascaded = cascaded.len(), "Cascade pass complete");
        if !changed {
            break;
        }
    }

    cascaded
}
