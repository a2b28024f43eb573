//! Stats routes - activity counter readouts

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::api::routes::party::ErrorResponse;
use crate::api::AppState;
use crate::infrastructure::services::{PartyStatsReport, PlayerCounters};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct PlayerStatsResponse {
    pub success: bool,
    #[serde(rename = "playerId")]
    pub player_id: String,
    pub stats: PlayerCounters,
}

#[derive(Debug, Serialize)]
pub struct PartyStatsResponse {
    pub success: bool,
    pub report: PartyStatsReport,
}

/// GET /api/stats/player/:playerId - Per-player activity counters
pub async fn get_player_stats(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Json<PlayerStatsResponse> {
    let stats = state.stats.player_counters(&player_id);
    Json(PlayerStatsResponse {
        success: true,
        player_id,
        stats,
    })
}

/// GET /api/stats/party/:partyId - Counters for every party occupant
pub async fn get_party_stats(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
) -> Result<Json<PartyStatsResponse>, ApiError> {
    let report = state.stats.party_report(&party_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Party not found", "PARTY_NOT_FOUND")),
        )
    })?;

    Ok(Json(PartyStatsResponse {
        success: true,
        report,
    }))
}
