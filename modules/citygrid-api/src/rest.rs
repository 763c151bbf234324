use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use citygrid_common::CityGridError;
use citygrid_graph::{run_simulation, SimulationRequest};

use crate::AppState;

fn error_response(status: StatusCode, message: &str, detail: Option<String>) -> Response {
    let body = match detail {
        Some(detail) => serde_json::json!({ "error": message, "detail": detail }),
        None => serde_json::json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}

// --- Handlers ---

pub async fn api_graph(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.snapshot.graph_data())
}

pub async fn api_single_supplier(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "node_ids": state.snapshot.single_supplier_nodes() }))
}

pub async fn api_simulate(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SimulationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected simulate request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "event_type and severity are required",
                Some(rejection.body_text()),
            );
        }
    };

    match run_simulation(&state.snapshot, &request) {
        Ok(result) => Json(result).into_response(),
        Err(CityGridError::InvalidRequest(message)) => {
            error_response(StatusCode::BAD_REQUEST, &message, None)
        }
        Err(e) => {
            warn!(error = %e, "Simulation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "simulation failed", None)
        }
    }
}
