//! Infrastructure dependency graph and the failure simulation engine.
//!
//! Stages run in a fixed order over a per-call working copy:
//! select → cascade → reroute → analyze → summarize.

pub mod analysis;
pub mod cascade;
pub mod reroute;
pub mod seed;
pub mod selector;
pub mod simulation;
pub mod snapshot;
pub mod summary;
pub mod working;

pub use reroute::RerouteEntry;
pub use simulation::{run_simulation, NodeImpact, SimulationRequest, SimulationResult};
pub use snapshot::{GraphSnapshot, SnapshotIssue};
pub use working::{FailureSet, WorkingGraph};
