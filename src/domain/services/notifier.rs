use crate::domain::value_objects::PartyEvent;

/// Notification sink
///
/// Delivery is best-effort; no acknowledgement, no retry.
pub trait Notifier: Send + Sync {
    /// Deliver an event addressed to one player.
    fn notify(&self, player_id: &str, event: PartyEvent);

    /// Deliver an event to every listed player.
    fn notify_all(&self, player_ids: &[String], event: PartyEvent) {
        for id in player_ids {
            self.notify(id, event.clone());
        }
    }
}

/// Sink that drops everything; used in tests and headless setups.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _player_id: &str, _event: PartyEvent) {}
}
