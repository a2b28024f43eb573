use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::{AlliesSync, Notifier};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{KickResult, PartyDirectory};
use crate::infrastructure::services::StatsAggregator;

/// Kick member input
pub struct KickMemberInput {
    pub leader_id: String,
    pub player_id: String,
}

/// Kick member output
pub struct KickMemberOutput {
    pub party: PartyRecord,
}

/// Kick member use case: leader-only removal of a plain member
pub struct KickMember {
    directory: Arc<PartyDirectory>,
    notifier: Arc<dyn Notifier>,
    allies: Arc<dyn AlliesSync>,
    stats: Arc<StatsAggregator>,
}

impl KickMember {
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

    pub fn execute(&self, input: KickMemberInput) -> Result<KickMemberOutput, KickMemberError> {
        let party = match self.directory.kick(&input.player_id, &input.leader_id) {
            KickResult::Kicked { party } => party,
            KickResult::PartyNotFound => return Err(KickMemberError::PartyNotFound),
            KickResult::NotLeader => return Err(KickMemberError::NotLeader),
            KickResult::NotAMember => return Err(KickMemberError::NotAMember),
        };

        self.allies.member_left(&party, &input.player_id);
        self.stats.record_leave(&input.player_id);
        self.notifier.notify(
            &input.player_id,
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("kicked")
                .with_data(serde_json::json!({ "by": input.leader_id })),
        );
        self.notifier.notify_all(
            &party.roster(),
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("playerKicked")
                .with_data(serde_json::json!({ "playerId": input.player_id })),
        );

        Ok(KickMemberOutput { party })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KickMemberError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Only the leader can kick members")]
    NotLeader,
    #[error("Player is not a member of this party")]
    NotAMember,
}
