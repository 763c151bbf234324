use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use citygrid_common::{CityGridError, EventType, Severity};

use crate::analysis::{find_unresolvable, find_vulnerable};
use crate::cascade::cascade;
use crate::reroute::{reroute, RerouteEntry};
use crate::selector::select_primary_failures;
use crate::snapshot::GraphSnapshot;
use crate::summary::build_summary;
use crate::working::FailureSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationRequest {
    pub event_type: EventType,
    pub severity: i64,
    /// When non-empty, replaces the event-derived failure selection.
    #[serde(default)]
    pub affected_node_ids: Vec<String>,
}

impl SimulationRequest {
    pub fn new(event_type: EventType, severity: i64) -> Self {
        Self {
            event_type,
            severity,
            affected_node_ids: Vec::new(),
        }
    }

    pub fn with_affected_nodes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_node_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<Severity, CityGridError> {
        Severity::new(self.severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SimulationResult {
    pub failed_nodes: Vec<String>,
    pub cascaded_nodes: Vec<String>,
    pub rerouted_edges: Vec<RerouteEntry>,
    pub vulnerable_nodes: Vec<String>,
    pub unresolvable_nodes: Vec<String>,
    pub summary_prompt_context: String,
}

/// How a single node came out of a run, for map badges and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeImpact {
    Failed,
    Cascaded,
    Unresolvable,
    Vulnerable,
    /// Picked up at least one rerouted dependency.
    ReroutedTo,
}

impl SimulationResult {
    /// Strongest classification that applies, or `None` for an untouched node.
    pub fn impact_of(&self, node_id: &str) -> Option<NodeImpact> {
        let has = |ids: &[String]| ids.iter().any(|id| id == node_id);
        if has(&self.failed_nodes) {
            Some(NodeImpact::Failed)
        } else if has(&self.cascaded_nodes) {
            Some(NodeImpact::Cascaded)
        } else if has(&self.unresolvable_nodes) {
            Some(NodeImpact::Unresolvable)
        } else if has(&self.vulnerable_nodes) {
            Some(NodeImpact::Vulnerable)
        } else if self.rerouted_edges.iter().any(|r| r.new_target == node_id) {
            Some(NodeImpact::ReroutedTo)
        } else {
            None
        }
    }
}

/// Run one event against the canonical graph.
///
/// Validates the request, then works entirely on a private copy of the graph:
/// primary failures, cascade, rerouting, vulnerability and unresolvability
/// analysis, and the text summary. The snapshot is only read.
pub fn run_simulation(
    snapshot: &GraphSnapshot,
    request: &SimulationRequest,
) -> Result<SimulationResult, CityGridError> {
    let severity = request.validate()?;
    let mut graph = snapshot.working_copy();

    let failed_nodes = select_primary_failures(
        graph.distinct_nodes(),
        request.event_type,
        severity,
        &request.affected_node_ids,
    );
    let mut failed: FailureSet = failed_nodes.iter().cloned().collect();

    let cascaded_nodes = cascade(&graph, &mut failed);
    for id in failed_nodes.iter().chain(&cascaded_nodes) {
        graph.mark_failed(id);
    }

    let (rerouted_edges, updated_edges) = reroute(&graph, &failed);
    let rerouted_ids: HashSet<&str> = rerouted_edges.iter().map(|r| r.edge_id.as_str()).collect();

    let vulnerable_nodes = find_vulnerable(&graph, &updated_edges, &failed);
    let unresolvable_nodes = find_unresolvable(&graph, &updated_edges, &failed, &rerouted_ids);

    let mut result = SimulationResult {
        failed_nodes,
        cascaded_nodes,
        rerouted_edges,
        vulnerable_nodes,
        unresolvable_nodes,
        summary_prompt_context: String::new(),
    };
    result.summary_prompt_context = build_summary(&graph, request.event_type, severity, &result);

    info!(
        event_type = %request.event_type,
        severity = severity.get(),
        failed = result.failed_nodes.len(),
        cascaded = result.cascaded_nodes.len(),
        rerouted = result.rerouted_edges.len(),
        vulnerable = result.vulnerable_nodes.len(),
        unresolvable = result.unresolvable_nodes.len(),
        "Simulation complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_severity_is_rejected_before_running() {
        let snapshot = GraphSnapshot::new(Default::default());
        for severity in [0, 11, -1] {
            let err = run_simulation(&snapshot, &SimulationRequest::new(EventType::Flood, severity))
                .unwrap_err();
            assert!(matches!(err, CityGridError::InvalidRequest(_)));
        }
    }

    #[test]
    fn request_defaults_affected_ids_when_absent() {
        let request: SimulationRequest =
            serde_json::from_value(serde_json::json!({ "event_type": "earthquake", "severity": 5 }))
                .unwrap();
        assert_eq!(request, SimulationRequest::new(EventType::Earthquake, 5));
    }

    #[test]
    fn request_without_severity_does_not_parse() {
        let parsed = serde_json::from_value::<SimulationRequest>(serde_json::json!({ "event_type": "flood" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn impact_prefers_the_strongest_classification() {
        let result = SimulationResult {
            failed_nodes: vec!["a".into()],
            cascaded_nodes: vec!["b".into()],
            rerouted_edges: vec![RerouteEntry {
                edge_id: "e1".into(),
                old_target: "a".into(),
                new_target: "c".into(),
            }],
            vulnerable_nodes: vec!["c".into(), "d".into()],
            unresolvable_nodes: vec!["e".into()],
            summary_prompt_context: String::new(),
        };

        assert_eq!(result.impact_of("a"), Some(NodeImpact::Failed));
        assert_eq!(result.impact_of("b"), Some(NodeImpact::Cascaded));
        assert_eq!(result.impact_of("c"), Some(NodeImpact::Vulnerable));
        assert_eq!(result.impact_of("e"), Some(NodeImpact::Unresolvable));
        assert_eq!(result.impact_of("z"), None);

        let only_rerouted = SimulationResult {
            rerouted_edges: result.rerouted_edges.clone(),
            ..Default::default()
        };
        assert_eq!(only_rerouted.impact_of("c"), Some(NodeImpact::ReroutedTo));
    }
}
