use std::sync::Arc;

use crate::domain::services::{AlliesSync, Notifier};
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{LeaveOutcome, PartyDirectory};
use crate::infrastructure::registries::PingRegistry;
use crate::infrastructure::services::StatsAggregator;

/// Leave party input
pub struct LeavePartyInput {
    pub player_id: String,
}

/// Leave party output
pub struct LeavePartyOutput {
    pub party_id: String,
    pub new_leader: Option<String>,
    pub disbanded: bool,
}

/// Leave party use case
///
/// Also the single eviction path: the reconciler removes offline members
/// through this exact transition, so promotion, disband and the attached
/// side effects can never diverge between the two.
pub struct LeaveParty {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
    notifier: Arc<dyn Notifier>,
    allies: Arc<dyn AlliesSync>,
    stats: Arc<StatsAggregator>,
}

impl LeaveParty {
    pub fn new(
        directory: Arc<PartyDirectory>,
        pings: Arc<PingRegistry>,
        notifier: Arc<dyn Notifier>,
        allies: Arc<dyn AlliesSync>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            pings,
            notifier,
            allies,
            stats,
        }
    }

    pub fn execute(&self, input: LeavePartyInput) -> Result<LeavePartyOutput, LeavePartyError> {
        let player_id = input.player_id.as_str();
        let output = match self.directory.leave(player_id) {
            LeaveOutcome::NotInParty => return Err(LeavePartyError::NotInParty),
            LeaveOutcome::Left { party } => {
                self.allies.member_left(&party, player_id);
                self.notifier.notify_all(
                    &party.roster(),
                    PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                        .with_action("playerLeft")
                        .with_data(serde_json::json!({ "playerId": player_id })),
                );
                LeavePartyOutput {
                    party_id: party.id,
                    new_leader: None,
                    disbanded: false,
                }
            }
            LeaveOutcome::LeaderChanged { party, new_leader } => {
                self.allies.member_left(&party, player_id);
                self.notifier.notify_all(
                    &party.roster(),
                    PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                        .with_action("leaderChanged")
                        .with_data(serde_json::json!({
                            "playerId": player_id,
                            "newLeader": new_leader,
                        })),
                );
                LeavePartyOutput {
                    party_id: party.id,
                    new_leader: Some(new_leader),
                    disbanded: false,
                }
            }
            LeaveOutcome::Disbanded { party } => {
                self.allies.party_disbanded(&party);
                self.pings.remove_party(&party.id);
                self.notifier.notify(
                    player_id,
                    PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                        .with_action("partyDisbanded")
                        .with_data(serde_json::json!({ "name": party.name })),
                );
                LeavePartyOutput {
                    party_id: party.id,
                    new_leader: None,
                    disbanded: true,
                }
            }
        };

        self.stats.record_leave(player_id);
        Ok(output)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeavePartyError {
    #[error("Not in a party")]
    NotInParty,
}
