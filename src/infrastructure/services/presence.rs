use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::services::PresenceOracle;

/// Connected player session
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSession {
    pub player_id: String,
    pub name: String,
    pub connected_at: i64,
}

/// Session-backed presence tracker
///
/// Fed by the event-stream connect/disconnect lifecycle; answers the
/// online-presence queries the reconciler makes.
pub struct SessionPresence {
    sessions: RwLock<HashMap<String, PlayerSession>>,
}

impl SessionPresence {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Mark a player connected
    pub fn connect(&self, player_id: &str, name: &str) -> PlayerSession {
        let session = PlayerSession {
            player_id: player_id.to_string(),
            name: name.to_string(),
            connected_at: chrono::Utc::now().timestamp_millis(),
        };
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(player_id.to_string(), session.clone());
        session
    }

    /// Mark a player disconnected
    pub fn disconnect(&self, player_id: &str) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.remove(player_id);
    }

    pub fn session(&self, player_id: &str) -> Option<PlayerSession> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(player_id).cloned()
    }

    /// Connected players, most recent first
    pub fn connected_players(&self, limit: usize) -> Vec<PlayerSession> {
        let sessions = self.sessions.read().unwrap();
        let mut players: Vec<_> = sessions.values().cloned().collect();
        players.sort_by(|a, b| b.connected_at.cmp(&a.connected_at));
        players.truncate(limit);
        players
    }

    pub fn count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

impl Default for SessionPresence {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceOracle for SessionPresence {
    fn is_online(&self, player_id: &str) -> bool {
        let sessions = self.sessions.read().unwrap();
        sessions.contains_key(player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_disconnect_lifecycle() {
        let presence = SessionPresence::new();
        assert!(!presence.is_online("p1"));
        presence.connect("p1", "Player One");
        assert!(presence.is_online("p1"));
        assert_eq!(presence.count(), 1);
        presence.disconnect("p1");
        assert!(!presence.is_online("p1"));
        assert_eq!(presence.count(), 0);
    }
}
