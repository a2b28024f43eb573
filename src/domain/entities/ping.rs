use serde::Serialize;

use crate::domain::value_objects::Position;

/// Default lifetime of a shared location marker.
pub const DEFAULT_PING_DURATION_MS: i64 = 30_000;

/// Party-scoped ephemeral location marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ping {
    pub id: String,
    pub owner_id: String,
    pub owner_name: String,
    pub party_id: String,
    pub position: Position,
    /// World/area the marker was placed in.
    pub context: String,
    /// Rank of the owner within the party (0 = leader); drives icon
    /// and color selection on the HUD side.
    pub owner_slot_index: usize,
    /// Epoch millis.
    pub created_at: i64,
    pub duration_ms: i64,
}

impl Ping {
    pub fn new(
        owner_id: String,
        owner_name: String,
        party_id: String,
        position: Position,
        context: String,
        owner_slot_index: usize,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            owner_name,
            party_id,
            position,
            context,
            owner_slot_index,
            created_at: chrono::Utc::now().timestamp_millis(),
            duration_ms: DEFAULT_PING_DURATION_MS,
        }
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms - self.created_at > self.duration_ms
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_ttl_boundaries() {
        let ping = Ping::new(
            "owner".into(),
            "Owner".into(),
            "p1".into(),
            Position::new(1.0, 64.0, -3.5),
            "overworld".into(),
            0,
        );
        let t = ping.created_at;
        assert!(!ping.is_expired_at(t + 29_000));
        assert!(ping.is_expired_at(t + 31_000));
    }
}
