use std::sync::Arc;

use async_broadcast::{broadcast, Receiver, Sender};

use crate::application::invite::{AcceptInvite, DeclineInvite, SendInvite};
use crate::application::party::{
    CreateParty, DisbandParty, JoinParty, KickMember, LeaveParty, UpdateParty,
};
use crate::application::ping::{CreatePing, GetPings, RemovePing};
use crate::domain::repositories::SnapshotStore;
use crate::domain::services::{AlliesSync, NoopAlliesSync, NoopWorldEffects, WorldEffects};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::config::{Config, BEACON_INTERVAL, PING_SWEEP_INTERVAL};
use crate::infrastructure::directory::snapshot::JsonSnapshotStore;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::{InviteRegistry, PingRegistry};
use crate::infrastructure::services::{BroadcastNotifier, SessionPresence, StatsAggregator};
use crate::infrastructure::tasks::{
    spawn_periodic, BeaconBroadcaster, PartyReconciler, TaskHandle,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    /// Authoritative party store + player index
    pub directory: Arc<PartyDirectory>,
    pub invites: Arc<InviteRegistry>,
    pub pings: Arc<PingRegistry>,

    /// Session-backed presence, fed by the event stream lifecycle
    pub presence: Arc<SessionPresence>,
    pub stats: Arc<StatsAggregator>,
    pub snapshot: Option<Arc<dyn SnapshotStore>>,

    /// Event broadcaster for SSE
    pub event_sender: Sender<PartyEvent>,
    pub event_receiver: Receiver<PartyEvent>,

    // Use cases
    pub create_party: Arc<CreateParty>,
    pub join_party: Arc<JoinParty>,
    pub leave_party: Arc<LeaveParty>,
    pub kick_member: Arc<KickMember>,
    pub disband_party: Arc<DisbandParty>,
    pub update_party: Arc<UpdateParty>,
    pub send_invite: Arc<SendInvite>,
    pub accept_invite: Arc<AcceptInvite>,
    pub decline_invite: Arc<DeclineInvite>,
    pub create_ping: Arc<CreatePing>,
    pub remove_ping: Arc<RemovePing>,
    pub get_pings: Arc<GetPings>,

    reconciler: Arc<PartyReconciler>,
    beacon: Arc<BeaconBroadcaster>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(config, Arc::new(NoopAlliesSync), Arc::new(NoopWorldEffects))
    }

    /// Wire the full object graph. The allies and world-effects seams
    /// default to no-ops; a host embedding this service injects real
    /// adapters here.
    pub fn with_collaborators(
        config: Config,
        allies: Arc<dyn AlliesSync>,
        effects: Arc<dyn WorldEffects>,
    ) -> Self {
        let directory = Arc::new(PartyDirectory::new(config.max_party_size));
        let invites = Arc::new(InviteRegistry::new());
        let pings = Arc::new(PingRegistry::new());
        let presence = Arc::new(SessionPresence::new());
        let stats = Arc::new(StatsAggregator::new(directory.clone()));

        // Event broadcaster (capacity of 1000 events)
        let (event_sender, event_receiver) = broadcast(1000);
        let notifier = Arc::new(BroadcastNotifier::new(event_sender.clone()));

        let snapshot: Option<Arc<dyn SnapshotStore>> = if config.persistence_enabled {
            Some(Arc::new(JsonSnapshotStore::new(config.snapshot_path.clone())))
        } else {
            None
        };

        let create_party = Arc::new(CreateParty::new(
            directory.clone(),
            notifier.clone(),
            stats.clone(),
        ));
        let join_party = Arc::new(JoinParty::new(
            directory.clone(),
            notifier.clone(),
            allies.clone(),
            stats.clone(),
        ));
        let leave_party = Arc::new(LeaveParty::new(
            directory.clone(),
            pings.clone(),
            notifier.clone(),
            allies.clone(),
            stats.clone(),
        ));
        let kick_member = Arc::new(KickMember::new(
            directory.clone(),
            notifier.clone(),
            allies.clone(),
            stats.clone(),
        ));
        let disband_party = Arc::new(DisbandParty::new(
            directory.clone(),
            pings.clone(),
            notifier.clone(),
            allies.clone(),
        ));
        let update_party = Arc::new(UpdateParty::new(directory.clone(), notifier.clone()));
        let send_invite = Arc::new(SendInvite::new(
            directory.clone(),
            invites.clone(),
            notifier.clone(),
            stats.clone(),
        ));
        let accept_invite = Arc::new(AcceptInvite::new(
            directory.clone(),
            invites.clone(),
            notifier.clone(),
            allies.clone(),
            stats.clone(),
        ));
        let decline_invite = Arc::new(DeclineInvite::new(invites.clone(), notifier.clone()));
        let create_ping = Arc::new(CreatePing::new(
            directory.clone(),
            pings.clone(),
            notifier.clone(),
            stats.clone(),
        ));
        let remove_ping = Arc::new(RemovePing::new(
            directory.clone(),
            pings.clone(),
            notifier.clone(),
        ));
        let get_pings = Arc::new(GetPings::new(directory.clone(), pings.clone()));

        let reconciler = Arc::new(PartyReconciler::new(
            directory.clone(),
            invites.clone(),
            presence.clone(),
            leave_party.clone(),
            snapshot.clone(),
            config.offline_removal,
        ));
        let beacon = Arc::new(BeaconBroadcaster::new(
            directory.clone(),
            pings.clone(),
            effects,
        ));

        Self {
            config,
            directory,
            invites,
            pings,
            presence,
            stats,
            snapshot,
            event_sender,
            event_receiver,
            create_party,
            join_party,
            leave_party,
            kick_member,
            disband_party,
            update_party,
            send_invite,
            accept_invite,
            decline_invite,
            create_ping,
            remove_ping,
            get_pings,
            reconciler,
            beacon,
        }
    }

    /// Restore persisted parties into the directory. Called once at
    /// startup, before the HTTP surface is up.
    pub async fn load_snapshot(&self) -> anyhow::Result<()> {
        let Some(store) = &self.snapshot else {
            return Ok(());
        };
        let records = store.load().await?;
        let count = records.len();
        self.directory.restore(records);
        tracing::info!(parties = count, "Restored party snapshot");
        Ok(())
    }

    /// Spawn the periodic loops. Handles must be stopped and joined on
    /// shutdown.
    pub fn spawn_background_tasks(&self) -> Vec<TaskHandle> {
        let reconciler = self.reconciler.clone();
        let pings = self.pings.clone();
        let beacon = self.beacon.clone();
        let stats = self.stats.clone();

        vec![
            spawn_periodic("party-reconciler", self.config.reconcile_interval, move || {
                let reconciler = reconciler.clone();
                async move { reconciler.tick().await }
            }),
            spawn_periodic("ping-sweeper", PING_SWEEP_INTERVAL, move || {
                let pings = pings.clone();
                async move {
                    let now = chrono::Utc::now().timestamp_millis();
                    let swept = pings.sweep_expired_at(now);
                    if swept > 0 {
                        tracing::debug!(count = swept, "Swept expired pings");
                    }
                }
            }),
            spawn_periodic("beacon-broadcaster", BEACON_INTERVAL, move || {
                let beacon = beacon.clone();
                async move { beacon.tick() }
            }),
            spawn_periodic("stats-reset", self.config.stats_reset_interval, move || {
                let stats = stats.clone();
                async move {
                    let dropped = stats.reset();
                    tracing::info!(players = dropped, "Reset activity counters");
                }
            }),
        ]
    }

    /// Final snapshot write on shutdown, after the reconciler has been
    /// stopped.
    pub async fn flush_snapshot(&self) {
        let Some(store) = &self.snapshot else {
            return;
        };
        if !self.directory.is_dirty() {
            return;
        }
        match store.save(&self.directory.parties()).await {
            Ok(()) => self.directory.clear_dirty(),
            Err(e) => tracing::error!(error = %e, "Final snapshot flush failed"),
        }
    }

    /// Broadcast an event to all connected SSE clients
    pub fn broadcast_event(&self, event: PartyEvent) {
        match self.event_sender.try_broadcast(event) {
            Ok(None) => {}
            Ok(Some(_)) => {
                tracing::debug!("Event broadcast with overflow");
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast event: {:?}", e);
            }
        }
    }
}
