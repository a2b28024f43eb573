use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::application::party::{
    CreatePartyError, CreatePartyInput, DisbandPartyError, DisbandPartyInput, JoinPartyError,
    JoinPartyInput, KickMemberError, KickMemberInput, LeavePartyError, LeavePartyInput,
    UpdatePartyError, UpdatePartyInput,
};
use crate::domain::entities::PartyRecord;

/// Convert epoch-millis timestamp to ISO 8601 string
fn timestamp_to_rfc3339(ts_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ts_ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatePartyRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinPartyRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LeavePartyRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct KickMemberRequest {
    #[serde(rename = "leaderId")]
    pub leader_id: String,
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DisbandPartyRequest {
    #[serde(rename = "leaderId")]
    pub leader_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartyRequest {
    #[serde(rename = "leaderId")]
    pub leader_id: String,
    pub name: Option<String>,
    #[serde(rename = "pvpEnabled")]
    pub pvp_enabled: Option<bool>,
    #[serde(rename = "isPublic")]
    pub is_public: Option<bool>,
    /// Empty string clears the password.
    pub password: Option<String>,
    #[serde(rename = "maxSize")]
    pub max_size: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct PartyResponse {
    pub id: String,
    pub name: String,
    pub leader: String,
    pub members: Vec<String>,
    pub size: usize,
    #[serde(rename = "maxSize")]
    pub max_size: u8,
    #[serde(rename = "pvpEnabled")]
    pub pvp_enabled: bool,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "hasPassword")]
    pub has_password: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl PartyResponse {
    pub fn from_record(party: &PartyRecord, global_cap: u8) -> Self {
        Self {
            id: party.id.clone(),
            name: party.name.clone(),
            leader: party.leader.clone(),
            members: party.members.to_vec(),
            size: party.size(),
            max_size: party.effective_max_size(global_cap),
            pvp_enabled: party.pvp_enabled,
            is_public: party.is_public,
            has_password: party.password.is_some(),
            created_at: timestamp_to_rfc3339(party.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePartyResponse {
    pub success: bool,
    pub party: PartyResponse,
}

#[derive(Debug, Serialize)]
pub struct JoinPartyResponse {
    pub success: bool,
    pub party: PartyResponse,
    #[serde(rename = "slotIndex")]
    pub slot_index: usize,
}

#[derive(Debug, Serialize)]
pub struct LeavePartyResponse {
    pub success: bool,
    #[serde(rename = "partyId")]
    pub party_id: String,
    #[serde(rename = "newLeader", skip_serializing_if = "Option::is_none")]
    pub new_leader: Option<String>,
    pub disbanded: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn err(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message, code)))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/party - Create a new party
pub async fn create_party(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePartyRequest>,
) -> Result<(StatusCode, Json<CreatePartyResponse>), ApiError> {
    let result = state
        .create_party
        .execute(CreatePartyInput {
            owner_id: body.player_id,
            name: body.name,
        })
        .map_err(|e| match e {
            CreatePartyError::MissingName => {
                err(StatusCode::BAD_REQUEST, e.to_string(), "MISSING_PARTY_NAME")
            }
            CreatePartyError::AlreadyInParty => {
                err(StatusCode::CONFLICT, e.to_string(), "ALREADY_IN_PARTY")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePartyResponse {
            success: true,
            party: PartyResponse::from_record(&result.party, state.directory.global_cap()),
        }),
    ))
}

/// GET /api/party/:partyId - Party details
pub async fn get_party(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
) -> Result<Json<PartyResponse>, ApiError> {
    let party = state
        .directory
        .get_party(&party_id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "Party not found", "PARTY_NOT_FOUND"))?;
    Ok(Json(PartyResponse::from_record(&party, state.directory.global_cap())))
}

/// GET /api/party/player/:playerId - Party a player currently belongs to
pub async fn get_party_of_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<PartyResponse>, ApiError> {
    let party = state
        .directory
        .get_party_of(&player_id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "Not in a party", "NOT_IN_PARTY"))?;
    Ok(Json(PartyResponse::from_record(&party, state.directory.global_cap())))
}

/// POST /api/party/:partyId/join - Join a party directly
pub async fn join_party(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
    Json(body): Json<JoinPartyRequest>,
) -> Result<Json<JoinPartyResponse>, ApiError> {
    let result = state
        .join_party
        .execute(JoinPartyInput {
            player_id: body.player_id,
            party_id,
        })
        .map_err(|e| match e {
            JoinPartyError::PartyNotFound => {
                err(StatusCode::NOT_FOUND, e.to_string(), "PARTY_NOT_FOUND")
            }
            JoinPartyError::PartyFull => err(StatusCode::CONFLICT, e.to_string(), "PARTY_FULL"),
            JoinPartyError::AlreadyInParty => {
                err(StatusCode::CONFLICT, e.to_string(), "ALREADY_IN_PARTY")
            }
            JoinPartyError::AlreadyInOtherParty => {
                err(StatusCode::CONFLICT, e.to_string(), "ALREADY_IN_OTHER_PARTY")
            }
        })?;

    Ok(Json(JoinPartyResponse {
        success: true,
        slot_index: result.slot_index,
        party: PartyResponse::from_record(&result.party, state.directory.global_cap()),
    }))
}

/// POST /api/party/leave - Leave the current party
pub async fn leave_party(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LeavePartyRequest>,
) -> Result<Json<LeavePartyResponse>, ApiError> {
    let result = state
        .leave_party
        .execute(LeavePartyInput {
            player_id: body.player_id,
        })
        .map_err(|e| match e {
            LeavePartyError::NotInParty => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NOT_IN_PARTY")
            }
        })?;

    Ok(Json(LeavePartyResponse {
        success: true,
        party_id: result.party_id,
        new_leader: result.new_leader,
        disbanded: result.disbanded,
    }))
}

/// POST /api/party/kick - Leader removes a member
pub async fn kick_member(
    State(state): State<Arc<AppState>>,
    Json(body): Json<KickMemberRequest>,
) -> Result<Json<CreatePartyResponse>, ApiError> {
    let result = state
        .kick_member
        .execute(KickMemberInput {
            leader_id: body.leader_id,
            player_id: body.player_id,
        })
        .map_err(|e| match e {
            KickMemberError::PartyNotFound => {
                err(StatusCode::NOT_FOUND, e.to_string(), "PARTY_NOT_FOUND")
            }
            KickMemberError::NotLeader => err(StatusCode::FORBIDDEN, e.to_string(), "NOT_LEADER"),
            KickMemberError::NotAMember => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NOT_A_MEMBER")
            }
        })?;

    Ok(Json(CreatePartyResponse {
        success: true,
        party: PartyResponse::from_record(&result.party, state.directory.global_cap()),
    }))
}

/// DELETE /api/party/:partyId - Disband a party (leader only)
pub async fn disband_party(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
    Json(body): Json<DisbandPartyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .disband_party
        .execute(DisbandPartyInput {
            party_id,
            leader_id: body.leader_id,
        })
        .map_err(|e| match e {
            DisbandPartyError::PartyNotFound => {
                err(StatusCode::NOT_FOUND, e.to_string(), "PARTY_NOT_FOUND")
            }
            DisbandPartyError::NotLeader => {
                err(StatusCode::FORBIDDEN, e.to_string(), "NOT_LEADER")
            }
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "disbandedPartyName": result.party.name,
    })))
}

/// PATCH /api/party/:partyId - Update party settings (leader only)
pub async fn update_party(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
    Json(body): Json<UpdatePartyRequest>,
) -> Result<Json<CreatePartyResponse>, ApiError> {
    let result = state
        .update_party
        .execute(UpdatePartyInput {
            party_id,
            leader_id: body.leader_id,
            name: body.name,
            pvp_enabled: body.pvp_enabled,
            is_public: body.is_public,
            password: body.password,
            max_size: body.max_size,
        })
        .map_err(|e| match e {
            UpdatePartyError::PartyNotFound => {
                err(StatusCode::NOT_FOUND, e.to_string(), "PARTY_NOT_FOUND")
            }
            UpdatePartyError::NotLeader => err(StatusCode::FORBIDDEN, e.to_string(), "NOT_LEADER"),
            UpdatePartyError::MissingName => {
                err(StatusCode::BAD_REQUEST, e.to_string(), "MISSING_PARTY_NAME")
            }
        })?;

    Ok(Json(CreatePartyResponse {
        success: true,
        party: PartyResponse::from_record(&result.party, state.directory.global_cap()),
    }))
}
