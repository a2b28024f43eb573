use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::{AlliesSync, Notifier};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{JoinResult, PartyDirectory};
use crate::infrastructure::registries::InviteRegistry;
use crate::infrastructure::services::StatsAggregator;

/// Accept invite input
pub struct AcceptInviteInput {
    pub player_id: String,
}

/// Accept invite output
pub struct AcceptInviteOutput {
    pub party: PartyRecord,
    pub slot_index: usize,
}

/// Accept invite use case
///
/// The party is re-validated at accept time: an invite into a party that
/// has since vanished or filled up is consumed and reported as such. Only
/// a recipient stuck in another party keeps the invite, so it is still
/// usable after they leave.
pub struct AcceptInvite {
    directory: Arc<PartyDirectory>,
    invites: Arc<InviteRegistry>,
    notifier: Arc<dyn Notifier>,
    allies: Arc<dyn AlliesSync>,
    stats: Arc<StatsAggregator>,
}

impl AcceptInvite {
    pub fn new(
        directory: Arc<PartyDirectory>,
        invites: Arc<InviteRegistry>,
        notifier: Arc<dyn Notifier>,
        allies: Arc<dyn AlliesSync>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            invites,
            notifier,
            allies,
            stats,
        }
    }

    pub fn execute(&self, input: AcceptInviteInput) -> Result<AcceptInviteOutput, AcceptInviteError> {
        let player_id = input.player_id.as_str();
        let invite = self
            .invites
            .pending(player_id)
            .ok_or(AcceptInviteError::NoPendingInvite)?;

        let party = match self.directory.join(&invite.party_id, player_id) {
            JoinResult::Success(party) => party,
            JoinResult::PartyNotFound => {
                self.invites.remove(player_id);
                return Err(AcceptInviteError::PartyGone);
            }
            JoinResult::PartyFull => {
                self.invites.remove(player_id);
                return Err(AcceptInviteError::PartyFull);
            }
            JoinResult::AlreadyInParty | JoinResult::AlreadyInOtherParty => {
                return Err(AcceptInviteError::AlreadyInParty);
            }
        };

        self.invites.remove(player_id);
        self.allies.member_joined(&party, player_id);
        self.stats.record_invite_accepted(player_id);
        self.stats.record_join(player_id);
        self.notifier.notify_all(
            &party.roster(),
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("playerJoined")
                .with_data(serde_json::json!({ "playerId": player_id })),
        );

        let slot_index = party.slot_index(player_id).unwrap_or_default();
        Ok(AcceptInviteOutput { party, slot_index })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcceptInviteError {
    #[error("No pending invite")]
    NoPendingInvite,
    #[error("Party no longer exists")]
    PartyGone,
    #[error("Party is full")]
    PartyFull,
    #[error("Already in a party")]
    AlreadyInParty,
}
