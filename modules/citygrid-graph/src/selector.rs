use citygrid_common::{EventType, InfrastructureNode, Severity, SeverityBand};

/// Share of candidates taken down by a medium-severity event.
const MEDIUM_SEVERITY_SHARE: f64 = 0.66;

/// Pick the nodes an event fails directly.
///
/// An explicit id list wins outright and is returned as given, unknown ids
/// included. Otherwise candidates are the nodes whose type the event targets,
/// in canonical order, and the severity band decides how many of them fail.
pub fn select_primary_failures<'a>(
    nodes: impl IntoIterator<Item = &'a InfrastructureNode>,
    event_type: EventType,
    severity: Severity,
    explicit_ids: &[String],
) -> Vec<String> {
    if !explicit_ids.is_empty() {
        return explicit_ids.to_vec();
    }

    let targets = event_type.primary_targets();
    let candidates: Vec<&InfrastructureNode> = nodes
        .into_iter()
        .filter(|n| targets.contains(&n.node_type))
        .collect();

    let count = match severity.band() {
        SeverityBand::High => candidates.len(),
        SeverityBand::Medium => {
            let share = (candidates.len() as f64 * MEDIUM_SEVERITY_SHARE).ceil() as usize;
            share.min(candidates.len())
        }
        SeverityBand::Low => candidates.len().min(1),
    };

    candidates
        .into_iter()
        .take(count)
        .map(|n| n.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<InfrastructureNode> {
        serde_json::from_value(serde_json::json!([
            { "id": "pow_a", "type": "power_generation", "name": "A", "lat": 0.0, "lng": 0.0 },
            { "id": "fuel_a", "type": "fuel_supply", "name": "F1", "lat": 0.0, "lng": 0.0 },
            { "id": "pow_b", "type": "power_generation", "name": "B", "lat": 0.0, "lng": 0.0 },
            { "id": "pow_c", "type": "power_generation", "name": "C", "lat": 0.0, "lng": 0.0 },
            { "id": "fuel_b", "type": "fuel_supply", "name": "F2", "lat": 0.0, "lng": 0.0 },
            { "id": "res_a", "type": "residential", "name": "R", "lat": 0.0, "lng": 0.0 }
        ]))
        .unwrap()
    }

    fn sev(v: i64) -> Severity {
        Severity::new(v).unwrap()
    }

    #[test]
    fn high_severity_fails_every_candidate() {
        let failed = select_primary_failures(&nodes(), EventType::PowerSurge, sev(7), &[]);
        assert_eq!(failed, vec!["pow_a", "pow_b", "pow_c"]);
    }

    #[test]
    fn medium_severity_takes_ceiling_of_two_thirds() {
        // ceil(3 * 0.66) = 2
        let failed = select_primary_failures(&nodes(), EventType::PowerSurge, sev(5), &[]);
        assert_eq!(failed, vec!["pow_a", "pow_b"]);

        // ceil(2 * 0.66) = 2
        let failed = select_primary_failures(&nodes(), EventType::DeepFreeze, sev(4), &[]);
        assert_eq!(failed, vec!["fuel_a", "fuel_b"]);
    }

    #[test]
    fn low_severity_fails_first_candidate_only() {
        let failed = select_primary_failures(&nodes(), EventType::Custom, sev(3), &[]);
        assert_eq!(failed, vec!["pow_a"]);
    }

    #[test]
    fn earthquake_candidates_follow_canonical_node_order() {
        let failed = select_primary_failures(&nodes(), EventType::Earthquake, sev(2), &[]);
        assert_eq!(failed, vec!["pow_a"]);

        let failed = select_primary_failures(&nodes(), EventType::Earthquake, sev(6), &[]);
        // 5 candidates → ceil(3.3) = 4
        assert_eq!(failed, vec!["pow_a", "fuel_a", "pow_b", "pow_c"]);
    }

    #[test]
    fn event_without_candidates_selects_nothing() {
        let failed = select_primary_failures(&nodes(), EventType::Flood, sev(1), &[]);
        assert!(failed.is_empty());
        let failed = select_primary_failures(&nodes(), EventType::Flood, sev(5), &[]);
        assert!(failed.is_empty());
    }

    #[test]
    fn duplicated_candidate_is_counted_once_via_working_graph() {
        let data = serde_json::from_value(serde_json::json!({
            "nodes": [
                { "id": "pow_a", "type": "power_generation", "name": "A", "lat": 0.0, "lng": 0.0 },
                { "id": "pow_a", "type": "power_generation", "name": "A again", "lat": 0.0, "lng": 0.0 },
                { "id": "pow_b", "type": "power_generation", "name": "B", "lat": 0.0, "lng": 0.0 }
            ],
            "edges": []
        }))
        .unwrap();
        let graph = crate::snapshot::GraphSnapshot::new(data).working_copy();

        let failed = select_primary_failures(graph.distinct_nodes(), EventType::PowerSurge, sev(10), &[]);
        assert_eq!(failed, vec!["pow_a", "pow_b"]);
    }

    #[test]
    fn explicit_ids_override_event_selection_verbatim() {
        let explicit = vec!["res_a".to_string(), "missing".to_string()];
        let failed = select_primary_failures(&nodes(), EventType::PowerSurge, sev(10), &explicit);
        assert_eq!(failed, explicit);
    }
}
