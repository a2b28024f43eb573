use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::services::SessionPresence;

#[derive(Deserialize)]
pub struct SseParams {
    #[serde(rename = "playerId")]
    player_id: String,
    name: Option<String>,
}

/// Presence registration tied to the stream's lifetime; the Drop impl
/// fires whether the client disconnects or the channel closes.
struct SessionGuard {
    presence: Arc<SessionPresence>,
    sender: async_broadcast::Sender<PartyEvent>,
    player_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.presence.disconnect(&self.player_id);
        let event = PartyEvent::new("playerDisconnected", None, Some(self.player_id.clone()));
        let _ = self.sender.try_broadcast(event);
    }
}

pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SseParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let player_id = params.player_id;
    let name = params.name.unwrap_or_else(|| player_id.clone());

    state.presence.connect(&player_id, &name);
    state.broadcast_event(
        PartyEvent::new("playerConnected", None, Some(player_id.clone()))
            .with_data(serde_json::json!({ "name": name })),
    );

    // new_receiver() yields an active receiver that only sees events
    // published after this point.
    let mut receiver = state.event_sender.new_receiver();
    let guard = SessionGuard {
        presence: state.presence.clone(),
        sender: state.event_sender.clone(),
        player_id: player_id.clone(),
    };

    let stream = async_stream::stream! {
        let _guard = guard;
        tracing::debug!(player_id = %player_id, "Event stream started");

        yield Ok(Event::default()
            .event("connected")
            .data(serde_json::json!({
                "playerId": player_id,
                "timestamp": chrono::Utc::now().timestamp_millis()
            }).to_string()));

        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(20));

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    yield Ok(Event::default().comment("heartbeat"));
                }
                result = receiver.recv() => {
                    match result {
                        Ok(event) => {
                            let json = serde_json::to_string(&event).unwrap_or_default();
                            yield Ok(Event::default()
                                .event("event")
                                .data(json));
                        }
                        Err(e) => {
                            tracing::warn!(player_id = %player_id, "Event stream receiver error: {:?}, closing", e);
                            break;
                        }
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
