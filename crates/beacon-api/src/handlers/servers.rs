//! /servers handlers — list, register, remove.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use beacon_core::{ServerEntry, ServerSubmission};
use beacon_services::{ProbeError, RegistrationOutcome, RegistryError, RemovalOutcome};

use super::ApiState;

#[derive(Serialize)]
pub struct ResultBody {
    pub result: String,
}

fn result_body(msg: impl Into<String>) -> Json<ResultBody> {
    Json(ResultBody { result: msg.into() })
}

// ── GET /servers ──────────────────────────────────────────────────────────────

pub async fn handle_list(State(state): State<ApiState>) -> Json<Vec<ServerEntry>> {
    Json(state.store.list())
}

// ── POST /servers/{server_id} ─────────────────────────────────────────────────

pub async fn handle_register(
    State(state): State<ApiState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Path(server_id): Path<String>,
    Json(submission): Json<ServerSubmission>,
) -> (StatusCode, Json<ResultBody>) {
    match state
        .registry
        .register(&server_id, remote.ip(), submission)
        .await
    {
        Ok(RegistrationOutcome::Created) => (StatusCode::CREATED, result_body("registered")),
        Ok(RegistrationOutcome::Updated) => (StatusCode::OK, result_body("updated")),
        Err(e) => error_response(e),
    }
}

// ── DELETE /servers/{server_id} ───────────────────────────────────────────────

pub async fn handle_remove(
    State(state): State<ApiState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    Path(server_id): Path<String>,
) -> (StatusCode, Json<ResultBody>) {
    match state.registry.remove(&server_id, remote.ip()) {
        Ok(RemovalOutcome::Removed) => (StatusCode::OK, result_body("success")),
        Ok(RemovalOutcome::NotFound) => (StatusCode::NOT_FOUND, result_body("failure")),
        Err(e) => error_response(e),
    }
}

/// Map workflow errors onto transport statuses.
fn error_response(err: RegistryError) -> (StatusCode, Json<ResultBody>) {
    let status = match &err {
        RegistryError::MalformedAddress(_) | RegistryError::InvalidEntry(_) => {
            StatusCode::BAD_REQUEST
        }
        RegistryError::SourceMismatch => StatusCode::FORBIDDEN,
        RegistryError::Probe(ProbeError::Rejected) => StatusCode::NOT_ACCEPTABLE,
        RegistryError::Probe(_) => StatusCode::PRECONDITION_FAILED,
        RegistryError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, result_body(err.to_string()))
}
