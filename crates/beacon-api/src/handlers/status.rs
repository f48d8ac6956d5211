//! /status and /getip handlers.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use serde::Serialize;

use super::ApiState;

// ── /status ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    pub servers: usize,
    pub stale_threshold_secs: u64,
    pub uptime_secs: u64,
}

pub async fn handle_status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        servers: state.store.len(),
        stale_threshold_secs: state.stale_threshold_secs,
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

// ── /getip ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IpResponse {
    pub ip: String,
}

/// Reflect the caller's observed source IP, so a registrant can learn the
/// address it must claim. The ephemeral source port is withheld.
pub async fn handle_getip(ConnectInfo(remote): ConnectInfo<SocketAddr>) -> Json<IpResponse> {
    Json(IpResponse {
        ip: remote.ip().to_canonical().to_string(),
    })
}
