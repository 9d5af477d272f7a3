//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::{app_state::InvokeError, AppState, Phase};
use super::responses::{
    CommandResponse, DurationRequest, DurationResponse, HealthResponse, QueryResponse,
    QueryResult, StatusResponse,
};

/// Query string of `GET /query`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Handle GET /query - Rank commands for a search string
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<QueryResponse> {
    let results = state
        .query(&params.q)
        .into_iter()
        .map(QueryResult::from)
        .collect();

    Json(QueryResponse {
        query: params.q,
        results,
    })
}

/// Handle POST /commands/:keyword - Invoke one command
pub async fn command_handler(
    State(state): State<Arc<AppState>>,
    Path(keyword): Path<String>,
) -> (StatusCode, Json<CommandResponse>) {
    match state.invoke(&keyword) {
        Ok(notification) => {
            info!("Command '{}' invoked", keyword);
            (StatusCode::OK, Json(CommandResponse::ok(&keyword, notification)))
        }
        Err(InvokeError::Unknown(keyword)) => {
            warn!("Unknown command '{}'", keyword);
            (
                StatusCode::NOT_FOUND,
                Json(CommandResponse::error(&keyword, format!("Unknown command: {}", keyword))),
            )
        }
        Err(InvokeError::NotAllowed(keyword)) => (
            StatusCode::CONFLICT,
            Json(CommandResponse::error(
                keyword,
                format!("Command '{}' is not available right now", keyword),
            )),
        ),
    }
}

/// Handle GET /status - Return current session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.engine.session();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        phase: session.phase,
        running: session.running,
        paused: session.paused,
        time_left_seconds: state.engine.time_left_in_phase().num_seconds(),
        work_minutes: session.durations.work.as_secs() / 60,
        break_minutes: session.durations.rest.as_secs() / 60,
        status: state.engine.status(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle PUT /durations/:phase - Change a phase length
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(phase): Path<String>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<DurationResponse>, StatusCode> {
    let phase = Phase::from_config_key(&phase).ok_or(StatusCode::NOT_FOUND)?;

    if !state.engine.set_phase_duration(phase, request.minutes) {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(DurationResponse {
        phase,
        minutes: request.minutes,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
