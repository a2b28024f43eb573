pub mod health;
pub mod invite;
pub mod party;
pub mod ping;
pub mod players;
pub mod stats;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::api::AppState;

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/party", create_party_router(state.clone()))
        .nest("/invite", create_invite_router(state.clone()))
        .nest("/ping", create_ping_router(state.clone()))
        .nest("/stats", create_stats_router(state.clone()))
        .route("/players/connected", get(players::get_connected_players))
        .route("/health", get(health::health_handler))
        .with_state(state)
}

/// Create party router
fn create_party_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(party::create_party))
        .route("/:partyId", get(party::get_party))
        .route("/:partyId", patch(party::update_party))
        .route("/:partyId", delete(party::disband_party))
        .route("/:partyId/join", post(party::join_party))
        .route("/player/:playerId", get(party::get_party_of_player))
        .route("/leave", post(party::leave_party))
        .route("/kick", post(party::kick_member))
        .with_state(state)
}

/// Create invite router
fn create_invite_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(invite::send_invite))
        .route("/accept", post(invite::accept_invite))
        .route("/decline", post(invite::decline_invite))
        .route("/:playerId", get(invite::get_pending_invite))
        .with_state(state)
}

/// Create ping router
fn create_ping_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(ping::create_ping))
        .route("/", delete(ping::remove_ping))
        .route("/party/:partyId", get(ping::get_party_pings))
        .route("/player/:playerId", get(ping::get_player_pings))
        .with_state(state)
}

/// Create stats router
fn create_stats_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/player/:playerId", get(stats::get_player_stats))
        .route("/party/:partyId", get(stats::get_party_stats))
        .with_state(state)
}
