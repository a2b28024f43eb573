use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::Ping;

/// Ephemeral location marker registry
///
/// Keyed by (party, owner): a new ping from the same owner replaces the
/// prior one in that party. Expiry is lazy on read plus a periodic sweep;
/// no timers are scheduled per ping.
pub struct PingRegistry {
    pings: RwLock<HashMap<(String, String), Ping>>,
}

impl PingRegistry {
    pub fn new() -> Self {
        Self {
            pings: RwLock::new(HashMap::new()),
        }
    }

    /// Store a ping, replacing the owner's previous one in the party.
    pub fn insert(&self, ping: Ping) {
        let mut pings = self.pings.write().unwrap();
        pings.insert((ping.party_id.clone(), ping.owner_id.clone()), ping);
    }

    pub fn remove(&self, party_id: &str, owner_id: &str) -> Option<Ping> {
        let mut pings = self.pings.write().unwrap();
        pings.remove(&(party_id.to_string(), owner_id.to_string()))
    }

    /// Drop every marker owned by a disbanded party.
    pub fn remove_party(&self, party_id: &str) -> usize {
        let mut pings = self.pings.write().unwrap();
        let before = pings.len();
        pings.retain(|(pid, _), _| pid != party_id);
        before - pings.len()
    }

    /// Live (non-expired) markers for one party.
    pub fn party_pings_at(&self, party_id: &str, now_ms: i64) -> Vec<Ping> {
        let pings = self.pings.read().unwrap();
        let mut result: Vec<Ping> = pings
            .values()
            .filter(|p| p.party_id == party_id && !p.is_expired_at(now_ms))
            .cloned()
            .collect();
        result.sort_by_key(|p| p.owner_slot_index);
        result
    }

    pub fn party_pings(&self, party_id: &str) -> Vec<Ping> {
        self.party_pings_at(party_id, chrono::Utc::now().timestamp_millis())
    }

    /// Every live marker, for the beacon broadcaster.
    pub fn active_at(&self, now_ms: i64) -> Vec<Ping> {
        let pings = self.pings.read().unwrap();
        pings
            .values()
            .filter(|p| !p.is_expired_at(now_ms))
            .cloned()
            .collect()
    }

    pub fn active(&self) -> Vec<Ping> {
        self.active_at(chrono::Utc::now().timestamp_millis())
    }

    /// Drop every expired marker; returns how many were removed.
    pub fn sweep_expired_at(&self, now_ms: i64) -> usize {
        let mut pings = self.pings.write().unwrap();
        let before = pings.len();
        pings.retain(|_, ping| !ping.is_expired_at(now_ms));
        before - pings.len()
    }

    pub fn len(&self) -> usize {
        self.pings.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Position;

    fn ping(owner: &str, party: &str, slot: usize) -> Ping {
        Ping::new(
            owner.into(),
            owner.to_uppercase(),
            party.into(),
            Position::new(0.0, 64.0, 0.0),
            "overworld".into(),
            slot,
        )
    }

    #[test]
    fn test_same_owner_replaces_prior_ping() {
        let registry = PingRegistry::new();
        let first = ping("m1", "p1", 1);
        let second = ping("m1", "p1", 1);
        registry.insert(first.clone());
        registry.insert(second.clone());

        let live = registry.party_pings_at("p1", second.created_at);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, second.id);
    }

    #[test]
    fn test_party_pings_sorted_by_slot_and_scoped() {
        let registry = PingRegistry::new();
        registry.insert(ping("m2", "p1", 2));
        registry.insert(ping("leader", "p1", 0));
        registry.insert(ping("other", "p2", 0));

        let now = chrono::Utc::now().timestamp_millis();
        let live = registry.party_pings_at("p1", now);
        assert_eq!(live.len(), 2);
        assert_eq!(live[0].owner_id, "leader");
        assert_eq!(live[1].owner_id, "m2");
    }

    #[test]
    fn test_expired_pings_filtered_and_swept() {
        let registry = PingRegistry::new();
        let marker = ping("m1", "p1", 1);
        let t = marker.created_at;
        registry.insert(marker);

        assert_eq!(registry.party_pings_at("p1", t + 29_000).len(), 1);
        assert!(registry.party_pings_at("p1", t + 31_000).is_empty());
        // Still stored until swept.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.sweep_expired_at(t + 31_000), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_party_clears_markers() {
        let registry = PingRegistry::new();
        registry.insert(ping("leader", "p1", 0));
        registry.insert(ping("m1", "p1", 1));
        registry.insert(ping("other", "p2", 0));
        assert_eq!(registry.remove_party("p1"), 2);
        assert_eq!(registry.len(), 1);
    }
}
