use async_broadcast::Sender;

use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;

/// Notifier backed by the application event channel
///
/// Events fan out to every SSE subscriber; clients filter by the
/// addressed player id. Delivery is best-effort: a full or closed
/// channel drops the event with a log line.
pub struct BroadcastNotifier {
    sender: Sender<PartyEvent>,
}

impl BroadcastNotifier {
    pub fn new(sender: Sender<PartyEvent>) -> Self {
        Self { sender }
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, player_id: &str, mut event: PartyEvent) {
        event.player_id = Some(player_id.to_string());
        match self.sender.try_broadcast(event) {
            Ok(None) => {}
            Ok(Some(_)) => {
                tracing::debug!("Notification broadcast with overflow");
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast notification: {:?}", e);
            }
        }
    }
}
