use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::{AlliesSync, Notifier};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{JoinResult, PartyDirectory};
use crate::infrastructure::services::StatsAggregator;

/// Join party input
pub struct JoinPartyInput {
    pub player_id: String,
    pub party_id: String,
}

/// Join party output
pub struct JoinPartyOutput {
    pub party: PartyRecord,
    /// Rank of the new member (0 = leader).
    pub slot_index: usize,
}

/// Join party use case
pub struct JoinParty {
    directory: Arc<PartyDirectory>,
    notifier: Arc<dyn Notifier>,
    allies: Arc<dyn AlliesSync>,
    stats: Arc<StatsAggregator>,
}

impl JoinParty {
    pub fn new(
        directory: Arc<PartyDirectory>,
        notifier: Arc<dyn Notifier>,
        allies: Arc<dyn AlliesSync>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            notifier,
            allies,
            stats,
        }
    }

    pub fn execute(&self, input: JoinPartyInput) -> Result<JoinPartyOutput, JoinPartyError> {
        let party = match self.directory.join(&input.party_id, &input.player_id) {
            JoinResult::Success(party) => party,
            JoinResult::PartyNotFound => return Err(JoinPartyError::PartyNotFound),
            JoinResult::PartyFull => return Err(JoinPartyError::PartyFull),
            JoinResult::AlreadyInParty => return Err(JoinPartyError::AlreadyInParty),
            JoinResult::AlreadyInOtherParty => return Err(JoinPartyError::AlreadyInOtherParty),
        };

        self.allies.member_joined(&party, &input.player_id);
        self.stats.record_join(&input.player_id);
        self.notifier.notify_all(
            &party.roster(),
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("playerJoined")
                .with_data(serde_json::json!({ "playerId": input.player_id })),
        );

        let slot_index = party.slot_index(&input.player_id).unwrap_or_default();
        Ok(JoinPartyOutput { party, slot_index })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinPartyError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Party is full")]
    PartyFull,
    #[error("Already in this party")]
    AlreadyInParty,
    #[error("Already in another party")]
    AlreadyInOtherParty,
}
