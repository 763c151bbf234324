use citygrid_common::{EventType, Severity};

use crate::simulation::SimulationResult;
use crate::working::WorkingGraph;

/// Plain-text digest of a run, one finding per line, for a downstream
/// narrative writer. Ids render as node names where the graph knows them.
///
/// Reroutes render as `<edge_id>: <old_name> → <new_name>` rather than the
/// bare `<old_name> → <new_name>` pair, so several edges moving between the
/// same two providers stay distinguishable. Entries are joined by `; `.
pub fn build_summary(
    graph: &WorkingGraph,
    event_type: EventType,
    severity: Severity,
    result: &SimulationResult,
) -> String {
    let reroutes = or_none(
        result
            .rerouted_edges
            .iter()
            .map(|r| {
                format!(
                    "{}: {} → {}",
                    r.edge_id,
                    graph.name_of(&r.old_target),
                    graph.name_of(&r.new_target)
                )
            })
            .collect::<Vec<_>>()
            .join("; "),
    );

    [
        format!("Event: {event_type} at severity {severity}/10"),
        format!("Directly failed nodes: {}", names(graph, &result.failed_nodes)),
        format!("Cascade-failed nodes: {}", names(graph, &result.cascaded_nodes)),
        format!("Rerouted dependencies: {reroutes}"),
        format!("Vulnerable nodes (< 2 inputs): {}", names(graph, &result.vulnerable_nodes)),
        format!("Unresolvable nodes: {}", names(graph, &result.unresolvable_nodes)),
    ]
    .join("\n")
}

fn names(graph: &WorkingGraph, ids: &[String]) -> String {
    or_none(
        ids.iter()
            .map(|id| graph.name_of(id))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn or_none(joined: String) -> String {
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
