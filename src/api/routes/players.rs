use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::api::AppState;
use crate::infrastructure::services::PlayerSession;

#[derive(Debug, Serialize)]
pub struct ConnectedPlayersResponse {
    pub success: bool,
    pub count: usize,
    pub players: Vec<PlayerSession>,
}

/// GET /api/players/connected - Currently connected players
pub async fn get_connected_players(
    State(state): State<Arc<AppState>>,
) -> Json<ConnectedPlayersResponse> {
    let players = state.presence.connected_players(100);
    Json(ConnectedPlayersResponse {
        success: true,
        count: state.presence.count(),
        players,
    })
}
