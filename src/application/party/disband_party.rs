use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::{AlliesSync, Notifier};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{LeaderActionResult, PartyDirectory};
use crate::infrastructure::registries::PingRegistry;

/// Disband party input
pub struct DisbandPartyInput {
    pub party_id: String,
    pub leader_id: String,
}

/// Disband party output
pub struct DisbandPartyOutput {
    pub party: PartyRecord,
}

/// Disband party use case (leader-only)
///
/// Pending invites into the dead party are left alone; accept re-validates
/// the party and clears them then.
pub struct DisbandParty {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
    notifier: Arc<dyn Notifier>,
    allies: Arc<dyn AlliesSync>,
}

impl DisbandParty {
    pub fn new(
        directory: Arc<PartyDirectory>,
        pings: Arc<PingRegistry>,
        notifier: Arc<dyn Notifier>,
        allies: Arc<dyn AlliesSync>,
    ) -> Self {
        Self {
            directory,
            pings,
            notifier,
            allies,
        }
    }

    pub fn execute(&self, input: DisbandPartyInput) -> Result<DisbandPartyOutput, DisbandPartyError> {
        // Leadership is verified inside the directory's critical section.
        let removed = match self.directory.disband_by(&input.party_id, &input.leader_id) {
            LeaderActionResult::Applied(party) => party,
            LeaderActionResult::PartyNotFound => return Err(DisbandPartyError::PartyNotFound),
            LeaderActionResult::NotLeader => return Err(DisbandPartyError::NotLeader),
        };

        self.pings.remove_party(&removed.id);
        self.allies.party_disbanded(&removed);
        self.notifier.notify_all(
            &removed.roster(),
            PartyEvent::new("partyUpdate", Some(removed.id.clone()), None)
                .with_action("partyDisbanded")
                .with_data(serde_json::json!({ "name": removed.name })),
        );

        Ok(DisbandPartyOutput { party: removed })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DisbandPartyError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Only the leader can disband the party")]
    NotLeader,
}
