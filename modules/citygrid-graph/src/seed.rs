use std::path::Path;

use tracing::info;

use citygrid_common::{CityGridError, GraphData};

const AUSTIN_SEED: &str = include_str!("../seed/austin.json");

/// The bundled Austin, TX reference graph.
pub fn austin() -> Result<GraphData, CityGridError> {
    serde_json::from_str(AUSTIN_SEED)
        .map_err(|e| CityGridError::Snapshot(format!("bundled seed is malformed: {e}")))
}

/// Read a `{ nodes, edges }` JSON file, or fall back to the bundled seed.
pub fn load(path: Option<&Path>) -> Result<GraphData, CityGridError> {
    let Some(path) = path else {
        let data = austin()?;
        info!(nodes = data.nodes.len(), edges = data.edges.len(), "Loaded bundled seed graph");
        return Ok(data);
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        CityGridError::Snapshot(format!("failed to read {}: {e}", path.display()))
    })?;
    let data: GraphData = serde_json::from_str(&content).map_err(|e| {
        CityGridError::Snapshot(format!("failed to parse {}: {e}", path.display()))
    })?;

    info!(
        path = %path.display(),
        nodes = data.nodes.len(),
        edges = data.edges.len(),
        "Loaded seed graph from file"
    );
    Ok(data)
}
