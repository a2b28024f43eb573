use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Hard bounds for the configurable party size cap.
pub const MIN_PARTY_SIZE: u8 = 2;
pub const MAX_PARTY_SIZE: u8 = 16;

/// Party record entity
///
/// A named group with exactly one leader and an ordered list of members.
/// The leader is never an element of `members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyRecord {
    pub id: String,
    pub leader: String,
    /// Ordered member list, excludes the leader.
    #[serde(default)]
    pub members: SmallVec<[String; 7]>,
    pub name: String,
    /// Epoch millis.
    pub created_at: i64,
    #[serde(default)]
    pub pvp_enabled: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Per-party size override. Not part of the persisted snapshot schema.
    #[serde(skip)]
    pub max_size: Option<u8>,
}

impl PartyRecord {
    /// Create a new party with a single leader and no members
    pub fn new(leader: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            leader,
            members: SmallVec::new(),
            name,
            created_at: chrono::Utc::now().timestamp_millis(),
            pvp_enabled: false,
            is_public: false,
            password: None,
            max_size: None,
        }
    }

    /// Total headcount including the leader
    pub fn size(&self) -> usize {
        1 + self.members.len()
    }

    /// The smaller of the per-party override and the global cap
    pub fn effective_max_size(&self, global_cap: u8) -> u8 {
        match self.max_size {
            Some(override_size) => override_size.min(global_cap),
            None => global_cap,
        }
    }

    /// Check if the party has no room left under the given global cap
    pub fn is_full(&self, global_cap: u8) -> bool {
        self.size() >= self.effective_max_size(global_cap) as usize
    }

    /// Check if the player is the leader or a member
    pub fn contains(&self, player_id: &str) -> bool {
        self.leader == player_id || self.members.iter().any(|m| m == player_id)
    }

    /// Stable rank of a player inside the party: 0 for the leader,
    /// k + 1 for the k-th member. Used for deterministic icon/color
    /// selection on shared markers.
    pub fn slot_index(&self, player_id: &str) -> Option<usize> {
        if self.leader == player_id {
            return Some(0);
        }
        self.members.iter().position(|m| m == player_id).map(|k| k + 1)
    }

    /// All player ids in rank order, leader first
    pub fn roster(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.size());
        ids.push(self.leader.clone());
        ids.extend(self.members.iter().cloned());
        ids
    }

    /// Remove a member (never the leader); returns true if present
    pub fn remove_member(&mut self, player_id: &str) -> bool {
        if let Some(pos) = self.members.iter().position(|m| m == player_id) {
            self.members.remove(pos);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> PartyRecord {
        let mut p = PartyRecord::new("leader".into(), "Raiders".into());
        p.members.push("m1".into());
        p.members.push("m2".into());
        p
    }

    #[test]
    fn test_slot_index_ranks() {
        let p = party();
        assert_eq!(p.slot_index("leader"), Some(0));
        assert_eq!(p.slot_index("m1"), Some(1));
        assert_eq!(p.slot_index("m2"), Some(2));
        assert_eq!(p.slot_index("stranger"), None);
    }

    #[test]
    fn test_effective_max_size_takes_minimum() {
        let mut p = party();
        assert_eq!(p.effective_max_size(8), 8);
        p.max_size = Some(4);
        assert_eq!(p.effective_max_size(8), 4);
        p.max_size = Some(12);
        assert_eq!(p.effective_max_size(8), 8);
    }

    #[test]
    fn test_is_full_counts_leader() {
        let mut p = party();
        p.max_size = Some(3);
        assert!(p.is_full(8));
        p.max_size = Some(4);
        assert!(!p.is_full(8));
    }

    #[test]
    fn test_max_size_not_serialized() {
        let mut p = party();
        p.max_size = Some(4);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("maxSize").is_none());
        let back: PartyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.max_size, None);
        assert_eq!(back.members, p.members);
    }
}
