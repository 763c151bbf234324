use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CityGridError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    PowerGeneration,
    WaterInfrastructure,
    FuelSupply,
    FoodSource,
    EmergencyServices,
    Residential,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::PowerGeneration => write!(f, "power_generation"),
            NodeType::WaterInfrastructure => write!(f, "water_infrastructure"),
            NodeType::FuelSupply => write!(f, "fuel_supply"),
            NodeType::FoodSource => write!(f, "food_source"),
            NodeType::EmergencyServices => write!(f, "emergency_services"),
            NodeType::Residential => write!(f, "residential"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    DeepFreeze,
    Flood,
    PowerSurge,
    Earthquake,
    Custom,
}

impl EventType {
    /// Node types an event of this kind strikes directly.
    pub fn primary_targets(&self) -> &'static [NodeType] {
        match self {
            EventType::DeepFreeze => &[NodeType::FuelSupply],
            EventType::Flood => &[NodeType::WaterInfrastructure],
            EventType::PowerSurge => &[NodeType::PowerGeneration],
            EventType::Earthquake => &[NodeType::FuelSupply, NodeType::PowerGeneration],
            EventType::Custom => &[NodeType::PowerGeneration],
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::DeepFreeze => write!(f, "deep_freeze"),
            EventType::Flood => write!(f, "flood"),
            EventType::PowerSurge => write!(f, "power_surge"),
            EventType::Earthquake => write!(f, "earthquake"),
            EventType::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    PowerDependency,
    WaterDependency,
    FuelDependency,
    FoodDependency,
    EmergencyDependency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Operational,
    Failed,
}

// --- Severity ---

/// Event severity on the 1–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Severity(u8);

/// How much of the candidate set an event takes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityBand {
    /// 1–3: only the first candidate.
    Low,
    /// 4–6: roughly two thirds of the candidates.
    Medium,
    /// 7–10: every candidate.
    High,
}

impl Severity {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 10;

    pub fn new(value: i64) -> Result<Self, CityGridError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(CityGridError::InvalidRequest(format!(
                "severity must be between {} and {}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> SeverityBand {
        match self.0 {
            1..=3 => SeverityBand::Low,
            4..=6 => SeverityBand::Medium,
            _ => SeverityBand::High,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Node Types ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InfrastructureNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub status: NodeStatus,
    /// Type-specific fields (capacity, operator, household count, ...). The
    /// engine never reads them; they pass through the graph query as loaded.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl InfrastructureNode {
    pub fn is_failed(&self) -> bool {
        self.status == NodeStatus::Failed
    }
}

// --- Edge Types ---

/// A directed dependency: `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub capacity: f64,
    pub current_load: f64,
    #[serde(default)]
    pub critical: bool,
}

/// Full `{ nodes, edges }` payload returned by the graph query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphData {
    pub nodes: Vec<InfrastructureNode>,
    pub edges: Vec<GraphEdge>,
}
