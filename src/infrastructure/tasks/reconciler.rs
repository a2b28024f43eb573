use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::application::party::{LeaveParty, LeavePartyInput};
use crate::domain::repositories::SnapshotStore;
use crate::domain::services::PresenceOracle;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::InviteRegistry;

/// Periodic party reconciler
///
/// One tick sweeps expired invites, evicts members who have been
/// continuously offline past the configured threshold, and flushes
/// the directory to the snapshot store when it is dirty. Ping expiry
/// runs on its own fixed-cadence sweeper.
///
/// Eviction goes through [`LeaveParty`], so it triggers the same leader
/// promotion, disband and notification rules as a voluntary leave.
pub struct PartyReconciler {
    directory: Arc<PartyDirectory>,
    invites: Arc<InviteRegistry>,
    presence: Arc<dyn PresenceOracle>,
    leave: Arc<LeaveParty>,
    snapshot: Option<Arc<dyn SnapshotStore>>,
    offline_removal: Duration,
    /// First-seen-offline instant per member, epoch millis.
    offline_since: Mutex<HashMap<String, i64>>,
}

impl PartyReconciler {
    pub fn new(
        directory: Arc<PartyDirectory>,
        invites: Arc<InviteRegistry>,
        presence: Arc<dyn PresenceOracle>,
        leave: Arc<LeaveParty>,
        snapshot: Option<Arc<dyn SnapshotStore>>,
        offline_removal: Duration,
    ) -> Self {
        Self {
            directory,
            invites,
            presence,
            leave,
            snapshot,
            offline_removal,
            offline_since: Mutex::new(HashMap::new()),
        }
    }

    pub async fn tick(&self) {
        self.tick_at(chrono::Utc::now().timestamp_millis()).await;
    }

    pub async fn tick_at(&self, now_ms: i64) {
        let swept = self.invites.sweep_expired_at(now_ms);
        if swept > 0 {
            tracing::debug!(count = swept, "Swept expired invites");
        }

        self.evict_offline_at(now_ms);
        self.flush().await;
    }

    fn evict_offline_at(&self, now_ms: i64) {
        if self.offline_removal.is_zero() {
            self.offline_since.lock().unwrap().clear();
            return;
        }
        let threshold_ms = self.offline_removal.as_millis() as i64;

        let members: Vec<String> = self
            .directory
            .parties()
            .into_iter()
            .flat_map(|p| p.roster())
            .collect();

        let evict: Vec<String> = {
            let mut since = self.offline_since.lock().unwrap();
            // Entries for players no longer in any party are stale.
            since.retain(|player, _| members.contains(player));

            let mut due = Vec::new();
            for member in &members {
                if self.presence.is_online(member) {
                    since.remove(member);
                    continue;
                }
                let first_seen = *since.entry(member.clone()).or_insert(now_ms);
                if now_ms - first_seen >= threshold_ms {
                    due.push(member.clone());
                }
            }
            for member in &due {
                since.remove(member);
            }
            due
        };

        for member in evict {
            match self.leave.execute(LeavePartyInput {
                player_id: member.clone(),
            }) {
                Ok(output) => {
                    tracing::info!(
                        player_id = %member,
                        party_id = %output.party_id,
                        disbanded = output.disbanded,
                        "Evicted offline member"
                    );
                }
                // Already gone by the time we got here.
                Err(e) => tracing::debug!(player_id = %member, error = %e, "Eviction skipped"),
            }
        }
    }

    /// Write the directory to the snapshot store if anything changed.
    /// The dirty flag is consumed up front; a failed save re-marks it so
    /// the next tick retries.
    async fn flush(&self) {
        let Some(store) = &self.snapshot else {
            return;
        };
        if !self.directory.is_dirty() {
            return;
        }
        self.directory.clear_dirty();
        let records = self.directory.parties();
        match store.save(&records).await {
            Ok(()) => tracing::debug!(parties = records.len(), "Snapshot flushed"),
            Err(e) => {
                self.directory.mark_dirty();
                tracing::warn!(error = %e, "Snapshot flush failed; will retry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::RwLock;

    use crate::domain::services::{NoopAlliesSync, NullNotifier};
    use crate::infrastructure::registries::PingRegistry;
    use crate::infrastructure::services::StatsAggregator;

    struct FixedPresence {
        online: RwLock<HashSet<String>>,
    }

    impl FixedPresence {
        fn new(online: &[&str]) -> Self {
            Self {
                online: RwLock::new(online.iter().map(|s| s.to_string()).collect()),
            }
        }

        fn set_online(&self, player: &str, online: bool) {
            let mut set = self.online.write().unwrap();
            if online {
                set.insert(player.to_string());
            } else {
                set.remove(player);
            }
        }
    }

    impl PresenceOracle for FixedPresence {
        fn is_online(&self, player_id: &str) -> bool {
            self.online.read().unwrap().contains(player_id)
        }
    }

    fn reconciler_with(
        presence: Arc<FixedPresence>,
        offline_removal: Duration,
    ) -> (Arc<PartyDirectory>, PartyReconciler) {
        let directory = Arc::new(PartyDirectory::new(8));
        let invites = Arc::new(InviteRegistry::new());
        let pings = Arc::new(PingRegistry::new());
        let stats = Arc::new(StatsAggregator::new(directory.clone()));
        let leave = Arc::new(LeaveParty::new(
            directory.clone(),
            pings.clone(),
            Arc::new(NullNotifier),
            Arc::new(NoopAlliesSync),
            stats,
        ));
        let reconciler = PartyReconciler::new(
            directory.clone(),
            invites,
            presence,
            leave,
            None,
            offline_removal,
        );
        (directory, reconciler)
    }

    #[tokio::test]
    async fn test_offline_member_evicted_after_threshold() {
        let presence = Arc::new(FixedPresence::new(&["leader"]));
        let (directory, reconciler) =
            reconciler_with(presence.clone(), Duration::from_secs(60));
        let party = directory.create_party("leader", "Raiders").unwrap();
        directory.join(&party.id, "m1");

        let t0 = 1_000_000;
        reconciler.tick_at(t0).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 2);

        // Below threshold: still a member.
        reconciler.tick_at(t0 + 59_000).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 2);

        reconciler.tick_at(t0 + 60_000).await;
        let after = directory.get_party(&party.id).unwrap();
        assert_eq!(after.size(), 1);
        assert!(!after.contains("m1"));
    }

    #[tokio::test]
    async fn test_reconnect_resets_offline_clock() {
        let presence = Arc::new(FixedPresence::new(&["leader"]));
        let (directory, reconciler) =
            reconciler_with(presence.clone(), Duration::from_secs(60));
        let party = directory.create_party("leader", "Raiders").unwrap();
        directory.join(&party.id, "m1");

        let t0 = 1_000_000;
        reconciler.tick_at(t0).await;

        // Brief reconnect wipes the accumulated offline time.
        presence.set_online("m1", true);
        reconciler.tick_at(t0 + 30_000).await;
        presence.set_online("m1", false);

        // First observed offline again at t0+80s, so the threshold
        // counts from there.
        reconciler.tick_at(t0 + 80_000).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 2);

        reconciler.tick_at(t0 + 139_000).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 2);

        reconciler.tick_at(t0 + 140_000).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 1);
    }

    #[tokio::test]
    async fn test_zero_threshold_disables_eviction() {
        let presence = Arc::new(FixedPresence::new(&[]));
        let (directory, reconciler) = reconciler_with(presence, Duration::ZERO);
        let party = directory.create_party("leader", "Raiders").unwrap();
        directory.join(&party.id, "m1");

        reconciler.tick_at(1_000_000).await;
        reconciler.tick_at(100_000_000).await;
        assert_eq!(directory.get_party(&party.id).unwrap().size(), 2);
    }

    #[tokio::test]
    async fn test_offline_leader_eviction_promotes_member() {
        let presence = Arc::new(FixedPresence::new(&["m1"]));
        let (directory, reconciler) =
            reconciler_with(presence, Duration::from_secs(60));
        let party = directory.create_party("leader", "Raiders").unwrap();
        directory.join(&party.id, "m1");

        let t0 = 1_000_000;
        reconciler.tick_at(t0).await;
        reconciler.tick_at(t0 + 60_000).await;

        let after = directory.get_party(&party.id).unwrap();
        assert_eq!(after.leader, "m1");
        assert!(!after.contains("leader"));
    }
}
