use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::routes::party::ErrorResponse;
use crate::api::AppState;
use crate::application::ping::{
    CreatePingError, CreatePingInput, GetPingsError, RemovePingError, RemovePingInput,
};
use crate::domain::entities::Ping;
use crate::domain::value_objects::Position;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn err(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message, code)))
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePingRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub position: PositionDto,
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct RemovePingRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePingResponse {
    pub success: bool,
    pub ping: Ping,
}

#[derive(Debug, Serialize)]
pub struct PingListResponse {
    pub success: bool,
    pub pings: Vec<Ping>,
}

#[derive(Debug, Serialize)]
pub struct RemovePingResponse {
    pub success: bool,
    pub removed: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/ping - Share a location marker with the party
pub async fn create_ping(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePingRequest>,
) -> Result<(StatusCode, Json<CreatePingResponse>), ApiError> {
    let result = state
        .create_ping
        .execute(CreatePingInput {
            owner_id: body.player_id,
            owner_name: body.player_name,
            position: Position::new(body.position.x, body.position.y, body.position.z),
            context: body.context,
        })
        .map_err(|e| match e {
            CreatePingError::NotInParty => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NOT_IN_PARTY")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePingResponse {
            success: true,
            ping: result.ping,
        }),
    ))
}

/// DELETE /api/ping - Withdraw the caller's own marker
pub async fn remove_ping(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RemovePingRequest>,
) -> Result<Json<RemovePingResponse>, ApiError> {
    let result = state
        .remove_ping
        .execute(RemovePingInput {
            owner_id: body.player_id,
        })
        .map_err(|e| match e {
            RemovePingError::NotInParty => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NOT_IN_PARTY")
            }
        })?;

    Ok(Json(RemovePingResponse {
        success: true,
        removed: result.removed,
    }))
}

/// GET /api/ping/party/:partyId - Live markers of a party
pub async fn get_party_pings(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
) -> Result<Json<PingListResponse>, ApiError> {
    let pings = state.get_pings.for_party(&party_id).map_err(map_get_err)?;
    Ok(Json(PingListResponse {
        success: true,
        pings,
    }))
}

/// GET /api/ping/player/:playerId - Live markers visible to a player
pub async fn get_player_pings(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<PingListResponse>, ApiError> {
    let pings = state.get_pings.for_player(&player_id).map_err(map_get_err)?;
    Ok(Json(PingListResponse {
        success: true,
        pings,
    }))
}

fn map_get_err(e: GetPingsError) -> ApiError {
    match e {
        GetPingsError::PartyNotFound => {
            err(StatusCode::NOT_FOUND, e.to_string(), "PARTY_NOT_FOUND")
        }
        GetPingsError::NotInParty => err(StatusCode::NOT_FOUND, e.to_string(), "NOT_IN_PARTY"),
    }
}
