//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, build metadata, uptime, the bound port, and cumulative
//! resolution counters.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub build: BuildInfo,
    pub local_port: u16,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct BuildInfo {
    pub git: String,
    pub profile: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_resolved: u64,
    pub requests_unresolved: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        build: BuildInfo {
            git: env!("ACTUAL_URL_GIT_SHORT").to_string(),
            profile: env!("ACTUAL_URL_BUILD_PROFILE").to_string(),
        },
        local_port: state.local_port,
        stats: StatsResponse {
            requests_resolved: state.stats.resolved.load(Ordering::Relaxed),
            requests_unresolved: state.stats.unresolved.load(Ordering::Relaxed),
        },
    })
}
