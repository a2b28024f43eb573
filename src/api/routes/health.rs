use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    #[serde(rename = "uptimeSeconds")]
    uptime_seconds: u64,
    parties: usize,
    #[serde(rename = "connectedPlayers")]
    connected_players: usize,
    #[serde(rename = "persistenceEnabled")]
    persistence_enabled: bool,
}

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// GET /health - Liveness probe with directory and presence gauges
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    let uptime = start.elapsed().as_secs();

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        parties: state.directory.len(),
        connected_players: state.presence.count(),
        persistence_enabled: state.config.persistence_enabled,
    })
}
