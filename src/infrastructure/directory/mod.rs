pub mod snapshot;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::entities::{PartyRecord, MAX_PARTY_SIZE, MIN_PARTY_SIZE};

/// Result of a join attempt
#[derive(Debug, Clone, PartialEq)]
pub enum JoinResult {
    Success(PartyRecord),
    PartyNotFound,
    PartyFull,
    AlreadyInParty,
    AlreadyInOtherParty,
}

/// Result of a leave (or eviction, which reuses the same transition)
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveOutcome {
    NotInParty,
    /// Plain member removal; carries the updated record.
    Left { party: PartyRecord },
    /// Leader left and the first member was promoted.
    LeaderChanged { party: PartyRecord, new_leader: String },
    /// Leader left an otherwise empty party; carries the removed record.
    Disbanded { party: PartyRecord },
}

/// Result of a kick attempt
#[derive(Debug, Clone, PartialEq)]
pub enum KickResult {
    Kicked { party: PartyRecord },
    PartyNotFound,
    NotLeader,
    NotAMember,
}

/// Result of a leader-gated mutation (settings update or disband)
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderActionResult {
    Applied(PartyRecord),
    PartyNotFound,
    NotLeader,
}

/// Partial settings change; `None` fields are left untouched.
/// `password: Some(None)` clears the password.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub pvp_enabled: Option<bool>,
    pub is_public: Option<bool>,
    pub password: Option<Option<String>>,
    pub max_size: Option<u8>,
}

/// Authoritative in-memory party directory
///
/// Holds the party store and the derived player -> party index behind a
/// single lock, so a membership change and its index delta always commit
/// in one critical section. Readers get cloned records and never observe
/// a store/index mismatch.
pub struct PartyDirectory {
    inner: RwLock<DirectoryInner>,
    dirty: AtomicBool,
    global_cap: u8,
}

#[derive(Default)]
struct DirectoryInner {
    parties: HashMap<String, PartyRecord>,
    index: HashMap<String, String>,
}

impl PartyDirectory {
    pub fn new(global_cap: u8) -> Self {
        Self {
            inner: RwLock::new(DirectoryInner::default()),
            dirty: AtomicBool::new(false),
            global_cap: global_cap.clamp(MIN_PARTY_SIZE, MAX_PARTY_SIZE),
        }
    }

    pub fn global_cap(&self) -> u8 {
        self.global_cap
    }

    /// Create a new party led by `owner_id`. Returns `None` if the owner
    /// already belongs to a party; creating a second association would
    /// corrupt the player index.
    pub fn create_party(&self, owner_id: &str, name: &str) -> Option<PartyRecord> {
        let mut inner = self.inner.write().unwrap();
        if inner.index.contains_key(owner_id) {
            return None;
        }
        let record = PartyRecord::new(owner_id.to_string(), name.to_string());
        inner.index.insert(owner_id.to_string(), record.id.clone());
        inner.parties.insert(record.id.clone(), record.clone());
        self.dirty.store(true, Ordering::Release);
        Some(record)
    }

    /// Look up a party by id
    pub fn get_party(&self, party_id: &str) -> Option<PartyRecord> {
        let inner = self.inner.read().unwrap();
        inner.parties.get(party_id).cloned()
    }

    /// O(1) lookup through the player index; no fallback scan.
    pub fn get_party_of(&self, player_id: &str) -> Option<PartyRecord> {
        let inner = self.inner.read().unwrap();
        let party_id = inner.index.get(player_id)?;
        inner.parties.get(party_id).cloned()
    }

    pub fn join(&self, party_id: &str, player_id: &str) -> JoinResult {
        let mut inner = self.inner.write().unwrap();
        match inner.index.get(player_id) {
            Some(current) if current == party_id => return JoinResult::AlreadyInParty,
            Some(_) => return JoinResult::AlreadyInOtherParty,
            None => {}
        }
        let cap = self.global_cap;
        let Some(party) = inner.parties.get_mut(party_id) else {
            return JoinResult::PartyNotFound;
        };
        if party.is_full(cap) {
            return JoinResult::PartyFull;
        }
        party.members.push(player_id.to_string());
        let updated = party.clone();
        inner.index.insert(player_id.to_string(), party_id.to_string());
        self.dirty.store(true, Ordering::Release);
        JoinResult::Success(updated)
    }

    /// Remove a player from their party. A departing leader promotes the
    /// first member in list order; a leader with no members disbands the
    /// party.
    pub fn leave(&self, player_id: &str) -> LeaveOutcome {
        let mut inner = self.inner.write().unwrap();
        let Some(party_id) = inner.index.get(player_id).cloned() else {
            return LeaveOutcome::NotInParty;
        };
        let (is_leader, is_lone) = match inner.parties.get(&party_id) {
            Some(party) => (party.leader == player_id, party.members.is_empty()),
            None => {
                // Index entry without a record would be a broken invariant;
                // repair it rather than panic.
                inner.index.remove(player_id);
                return LeaveOutcome::NotInParty;
            }
        };

        let outcome = if is_leader && is_lone {
            let removed = inner.parties.remove(&party_id).unwrap();
            inner.index.remove(player_id);
            LeaveOutcome::Disbanded { party: removed }
        } else if is_leader {
            let party = inner.parties.get_mut(&party_id).unwrap();
            let new_leader = party.members.remove(0);
            party.leader = new_leader.clone();
            let updated = party.clone();
            inner.index.remove(player_id);
            LeaveOutcome::LeaderChanged { party: updated, new_leader }
        } else {
            let party = inner.parties.get_mut(&party_id).unwrap();
            party.remove_member(player_id);
            let updated = party.clone();
            inner.index.remove(player_id);
            LeaveOutcome::Left { party: updated }
        };
        self.dirty.store(true, Ordering::Release);
        outcome
    }

    /// Remove `player_id` from the party led by `by_leader_id`. Only the
    /// current leader may kick, and only plain members can be kicked.
    pub fn kick(&self, player_id: &str, by_leader_id: &str) -> KickResult {
        let mut inner = self.inner.write().unwrap();
        let Some(party_id) = inner.index.get(by_leader_id).cloned() else {
            return KickResult::PartyNotFound;
        };
        let Some(party) = inner.parties.get_mut(&party_id) else {
            return KickResult::PartyNotFound;
        };
        if party.leader != by_leader_id {
            return KickResult::NotLeader;
        }
        if !party.remove_member(player_id) {
            return KickResult::NotAMember;
        }
        let updated = party.clone();
        inner.index.remove(player_id);
        self.dirty.store(true, Ordering::Release);
        KickResult::Kicked { party: updated }
    }

    /// Remove the party and every index entry derived from it, if
    /// `by_leader_id` still leads it. The leader check and the removal
    /// share one critical section, so a concurrent promotion cannot let
    /// an ex-leader disband the party.
    pub fn disband_by(&self, party_id: &str, by_leader_id: &str) -> LeaderActionResult {
        let mut inner = self.inner.write().unwrap();
        match inner.parties.get(party_id) {
            Some(party) if party.leader != by_leader_id => return LeaderActionResult::NotLeader,
            Some(_) => {}
            None => return LeaderActionResult::PartyNotFound,
        }
        let removed = inner.parties.remove(party_id).unwrap();
        inner.index.remove(&removed.leader);
        for member in &removed.members {
            inner.index.remove(member);
        }
        self.dirty.store(true, Ordering::Release);
        LeaderActionResult::Applied(removed)
    }

    /// Apply a settings patch if `by_leader_id` still leads the party.
    /// Check and writes run under one write lock; `max_size` is clamped
    /// into [2, global cap].
    pub fn update_settings(
        &self,
        party_id: &str,
        by_leader_id: &str,
        patch: SettingsPatch,
    ) -> LeaderActionResult {
        let cap = self.global_cap;
        let mut inner = self.inner.write().unwrap();
        let Some(party) = inner.parties.get_mut(party_id) else {
            return LeaderActionResult::PartyNotFound;
        };
        if party.leader != by_leader_id {
            return LeaderActionResult::NotLeader;
        }
        if let Some(name) = patch.name {
            party.name = name;
        }
        if let Some(pvp) = patch.pvp_enabled {
            party.pvp_enabled = pvp;
        }
        if let Some(public) = patch.is_public {
            party.is_public = public;
        }
        if let Some(password) = patch.password {
            party.password = password;
        }
        if let Some(max_size) = patch.max_size {
            party.max_size = Some(max_size.clamp(MIN_PARTY_SIZE, cap));
        }
        let updated = party.clone();
        self.dirty.store(true, Ordering::Release);
        LeaderActionResult::Applied(updated)
    }

    /// Snapshot of every record, for persistence and reconciliation.
    pub fn parties(&self) -> Vec<PartyRecord> {
        let inner = self.inner.read().unwrap();
        inner.parties.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole directory with loaded records, rebuilding the
    /// index. A record whose roster collides with an already-restored
    /// player is dropped to keep the index single-valued.
    pub fn restore(&self, records: Vec<PartyRecord>) {
        let mut inner = self.inner.write().unwrap();
        inner.parties.clear();
        inner.index.clear();
        for record in records {
            if record.members.iter().any(|m| *m == record.leader) {
                tracing::warn!(party_id = %record.id, "Skipping record with leader listed as member");
                continue;
            }
            let mut seen = HashSet::new();
            if record.members.iter().any(|m| !seen.insert(m)) {
                tracing::warn!(party_id = %record.id, "Skipping record with duplicate member");
                continue;
            }
            let collision = record
                .roster()
                .iter()
                .any(|p| inner.index.contains_key(p));
            if collision {
                tracing::warn!(party_id = %record.id, "Skipping record with player already in another party");
                continue;
            }
            for player in record.roster() {
                inner.index.insert(player, record.id.clone());
            }
            inner.parties.insert(record.id.clone(), record);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Test hook: the player index must describe exactly the set obtained
    /// by iterating every record's leader + members.
    #[cfg(test)]
    pub(crate) fn assert_index_consistent(&self) {
        let inner = self.inner.read().unwrap();
        let mut derived: HashMap<String, String> = HashMap::new();
        for party in inner.parties.values() {
            assert!(
                !party.members.iter().any(|m| *m == party.leader),
                "leader {} listed as member of {}",
                party.leader,
                party.id
            );
            for player in party.roster() {
                let prev = derived.insert(player.clone(), party.id.clone());
                assert!(prev.is_none(), "player {player} in two parties");
            }
        }
        assert_eq!(inner.index, derived, "index diverged from store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> PartyDirectory {
        PartyDirectory::new(8)
    }

    #[test]
    fn test_create_party_indexes_leader() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        assert_eq!(party.leader, "leader");
        assert!(party.members.is_empty());
        assert_eq!(dir.get_party_of("leader").unwrap().id, party.id);
        assert!(dir.is_dirty());
        dir.assert_index_consistent();
    }

    #[test]
    fn test_create_party_rejected_while_grouped() {
        let dir = directory();
        dir.create_party("leader", "First").unwrap();
        assert!(dir.create_party("leader", "Second").is_none());
        assert_eq!(dir.len(), 1);
        dir.assert_index_consistent();
    }

    #[test]
    fn test_join_success_and_duplicate_checks() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        assert!(matches!(dir.join(&party.id, "m1"), JoinResult::Success(_)));
        assert_eq!(dir.join(&party.id, "m1"), JoinResult::AlreadyInParty);

        let other = dir.create_party("other", "Second").unwrap();
        assert_eq!(dir.join(&other.id, "m1"), JoinResult::AlreadyInOtherParty);
        assert_eq!(dir.join("missing", "m2"), JoinResult::PartyNotFound);
        dir.assert_index_consistent();
    }

    fn max_size_patch(max_size: u8) -> SettingsPatch {
        SettingsPatch {
            max_size: Some(max_size),
            ..SettingsPatch::default()
        }
    }

    #[test]
    fn test_join_respects_effective_max_size() {
        let dir = directory();
        let party = dir.create_party("leader", "Tiny").unwrap();
        assert!(matches!(
            dir.update_settings(&party.id, "leader", max_size_patch(2)),
            LeaderActionResult::Applied(_)
        ));
        assert!(matches!(dir.join(&party.id, "m1"), JoinResult::Success(_)));
        assert_eq!(dir.join(&party.id, "m2"), JoinResult::PartyFull);
        dir.assert_index_consistent();
    }

    #[test]
    fn test_max_size_clamped_into_bounds() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.update_settings(&party.id, "leader", max_size_patch(1));
        assert_eq!(dir.get_party(&party.id).unwrap().max_size, Some(2));
        dir.update_settings(&party.id, "leader", max_size_patch(200));
        assert_eq!(dir.get_party(&party.id).unwrap().max_size, Some(8));
    }

    #[test]
    fn test_member_leave_keeps_leader() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        match dir.leave("m1") {
            LeaveOutcome::Left { party } => {
                assert_eq!(party.leader, "leader");
                assert!(party.members.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.get_party_of("m1").is_none());
        dir.assert_index_consistent();
    }

    #[test]
    fn test_leader_leave_promotes_first_member() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        dir.join(&party.id, "m2");
        match dir.leave("leader") {
            LeaveOutcome::LeaderChanged { party, new_leader } => {
                assert_eq!(new_leader, "m1");
                assert_eq!(party.leader, "m1");
                assert_eq!(party.members.as_slice(), ["m2".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.get_party_of("leader").is_none());
        assert_eq!(dir.get_party_of("m2").unwrap().leader, "m1");
        dir.assert_index_consistent();
    }

    #[test]
    fn test_lone_leader_leave_disbands() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        match dir.leave("leader") {
            LeaveOutcome::Disbanded { party: removed } => assert_eq!(removed.id, party.id),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.get_party(&party.id).is_none());
        assert!(dir.get_party_of("leader").is_none());
        assert!(dir.is_empty());
        dir.assert_index_consistent();
    }

    #[test]
    fn test_kick_requires_current_leader() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        dir.join(&party.id, "m2");

        assert_eq!(dir.kick("m2", "m1"), KickResult::NotLeader);
        assert_eq!(dir.kick("leader", "leader"), KickResult::NotAMember);
        assert_eq!(dir.kick("m1", "nobody"), KickResult::PartyNotFound);
        match dir.kick("m1", "leader") {
            KickResult::Kicked { party } => {
                assert_eq!(party.members.as_slice(), ["m2".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.get_party_of("m1").is_none());
        dir.assert_index_consistent();
    }

    #[test]
    fn test_disband_clears_every_index_entry() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        dir.join(&party.id, "m2");
        match dir.disband_by(&party.id, "leader") {
            LeaderActionResult::Applied(removed) => assert_eq!(removed.id, party.id),
            other => panic!("unexpected outcome: {other:?}"),
        }
        for player in ["leader", "m1", "m2"] {
            assert!(dir.get_party_of(player).is_none());
        }
        dir.assert_index_consistent();
    }

    #[test]
    fn test_disband_requires_current_leader() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        assert_eq!(dir.disband_by(&party.id, "m1"), LeaderActionResult::NotLeader);
        assert_eq!(
            dir.disband_by("missing", "leader"),
            LeaderActionResult::PartyNotFound
        );
        assert!(dir.get_party(&party.id).is_some());
    }

    #[test]
    fn test_update_settings_applies_patch_and_marks_dirty() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.clear_dirty();
        let patch = SettingsPatch {
            name: Some("Renamed".into()),
            pvp_enabled: Some(true),
            is_public: Some(true),
            password: Some(Some("hunter2".into())),
            max_size: Some(4),
        };
        match dir.update_settings(&party.id, "leader", patch) {
            LeaderActionResult::Applied(updated) => {
                assert_eq!(updated.name, "Renamed");
                assert!(updated.pvp_enabled);
                assert!(updated.is_public);
                assert_eq!(updated.password.as_deref(), Some("hunter2"));
                assert_eq!(updated.max_size, Some(4));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(dir.is_dirty());

        // Some(None) clears the password, untouched fields persist.
        let clear = SettingsPatch {
            password: Some(None),
            ..SettingsPatch::default()
        };
        dir.update_settings(&party.id, "leader", clear);
        let after = dir.get_party(&party.id).unwrap();
        assert!(after.password.is_none());
        assert_eq!(after.name, "Renamed");
    }

    #[test]
    fn test_update_settings_rejects_stale_leader() {
        let dir = directory();
        let party = dir.create_party("leader", "Raiders").unwrap();
        dir.join(&party.id, "m1");
        // Promotion in between: the ex-leader's change must not land.
        dir.leave("leader");
        let patch = SettingsPatch {
            name: Some("Hijacked".into()),
            ..SettingsPatch::default()
        };
        assert_eq!(
            dir.update_settings(&party.id, "leader", patch),
            LeaderActionResult::NotLeader
        );
        assert_eq!(dir.get_party(&party.id).unwrap().name, "Raiders");
    }

    #[test]
    fn test_restore_rebuilds_index_and_drops_collisions() {
        let dir = directory();
        let mut a = PartyRecord::new("leader".into(), "A".into());
        a.members.push("m1".into());
        let mut b = PartyRecord::new("other".into(), "B".into());
        b.members.push("m1".into()); // m1 collides with party A

        dir.restore(vec![a.clone(), b]);
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get_party_of("m1").unwrap().id, a.id);
        assert!(dir.get_party_of("other").is_none());
        dir.assert_index_consistent();
    }

    #[test]
    fn test_restore_drops_record_with_duplicate_member() {
        let dir = directory();
        let mut bad = PartyRecord::new("leader".into(), "Dupes".into());
        bad.members.push("m1".into());
        bad.members.push("m1".into());
        let good = PartyRecord::new("other".into(), "Clean".into());

        dir.restore(vec![bad, good.clone()]);
        assert_eq!(dir.len(), 1);
        assert!(dir.get_party_of("leader").is_none());
        assert!(dir.get_party_of("m1").is_none());
        assert_eq!(dir.get_party_of("other").unwrap().id, good.id);
        dir.assert_index_consistent();
    }
}
