use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::routes::party::{ErrorResponse, JoinPartyResponse, PartyResponse};
use crate::api::AppState;
use crate::application::invite::{
    AcceptInviteError, AcceptInviteInput, DeclineInviteInput, SendInviteError, SendInviteInput,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn err(status: StatusCode, message: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message, code)))
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendInviteRequest {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "recipientId")]
    pub recipient_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInviteRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeclineInviteRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub recipient: String,
    pub sender: String,
    #[serde(rename = "partyId")]
    pub party_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
pub struct SendInviteResponse {
    pub success: bool,
    pub invite: InviteResponse,
}

#[derive(Debug, Serialize)]
pub struct DeclineInviteResponse {
    pub success: bool,
    #[serde(rename = "wasPending")]
    pub was_pending: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/invite - Invite a player into the sender's party
pub async fn send_invite(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendInviteRequest>,
) -> Result<(StatusCode, Json<SendInviteResponse>), ApiError> {
    let result = state
        .send_invite
        .execute(SendInviteInput {
            sender_id: body.sender_id,
            recipient_id: body.recipient_id,
        })
        .map_err(|e| match e {
            SendInviteError::SelfInvite => {
                err(StatusCode::BAD_REQUEST, e.to_string(), "SELF_INVITE")
            }
            SendInviteError::SenderNotInParty => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NOT_IN_PARTY")
            }
            SendInviteError::AlreadyAMember => {
                err(StatusCode::CONFLICT, e.to_string(), "ALREADY_A_MEMBER")
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SendInviteResponse {
            success: true,
            invite: InviteResponse {
                recipient: result.invite.recipient,
                sender: result.invite.sender,
                party_id: result.invite.party_id,
                created_at: result.invite.created_at,
            },
        }),
    ))
}

/// POST /api/invite/accept - Accept the pending invite
pub async fn accept_invite(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AcceptInviteRequest>,
) -> Result<Json<JoinPartyResponse>, ApiError> {
    let result = state
        .accept_invite
        .execute(AcceptInviteInput {
            player_id: body.player_id,
        })
        .map_err(|e| match e {
            AcceptInviteError::NoPendingInvite => {
                err(StatusCode::NOT_FOUND, e.to_string(), "NO_PENDING_INVITE")
            }
            AcceptInviteError::PartyGone => err(StatusCode::GONE, e.to_string(), "PARTY_GONE"),
            AcceptInviteError::PartyFull => err(StatusCode::CONFLICT, e.to_string(), "PARTY_FULL"),
            AcceptInviteError::AlreadyInParty => {
                err(StatusCode::CONFLICT, e.to_string(), "ALREADY_IN_PARTY")
            }
        })?;

    Ok(Json(JoinPartyResponse {
        success: true,
        slot_index: result.slot_index,
        party: PartyResponse::from_record(&result.party, state.directory.global_cap()),
    }))
}

/// POST /api/invite/decline - Decline the pending invite (idempotent)
pub async fn decline_invite(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeclineInviteRequest>,
) -> Json<DeclineInviteResponse> {
    let result = state.decline_invite.execute(DeclineInviteInput {
        player_id: body.player_id,
    });

    Json(DeclineInviteResponse {
        success: true,
        was_pending: result.was_pending,
    })
}

/// GET /api/invite/:playerId - Pending invite for a player
pub async fn get_pending_invite(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<InviteResponse>, ApiError> {
    let invite = state.invites.pending(&player_id).ok_or_else(|| {
        err(
            StatusCode::NOT_FOUND,
            "No pending invite",
            "NO_PENDING_INVITE",
        )
    })?;

    Ok(Json(InviteResponse {
        recipient: invite.recipient,
        sender: invite.sender,
        party_id: invite.party_id,
        created_at: invite.created_at,
    }))
}
