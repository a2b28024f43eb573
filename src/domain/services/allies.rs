use crate::domain::entities::PartyRecord;

/// Optional external allies-system integration
///
/// The integration may be entirely absent; implementations must swallow
/// their own failures so party operations never depend on it.
pub trait AlliesSync: Send + Sync {
    fn member_joined(&self, party: &PartyRecord, player_id: &str);
    fn member_left(&self, party: &PartyRecord, player_id: &str);
    fn party_disbanded(&self, party: &PartyRecord);
}

/// Default adapter used when no allies system is wired at startup.
pub struct NoopAlliesSync;

impl AlliesSync for NoopAlliesSync {
    fn member_joined(&self, _party: &PartyRecord, _player_id: &str) {}
    fn member_left(&self, _party: &PartyRecord, _player_id: &str) {}
    fn party_disbanded(&self, _party: &PartyRecord) {}
}
