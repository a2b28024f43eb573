use std::sync::Arc;

use crate::domain::entities::Ping;
use crate::domain::services::Notifier;
use crate::domain::value_objects::{PartyEvent, Position};
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::PingRegistry;
use crate::infrastructure::services::StatsAggregator;

/// Create ping input
pub struct CreatePingInput {
    pub owner_id: String,
    pub owner_name: String,
    pub position: Position,
    pub context: String,
}

/// Create ping output
pub struct CreatePingOutput {
    pub ping: Ping,
}

/// Create ping use case
///
/// A fresh ping from the same owner replaces their previous one, so a
/// player never holds more than one live marker in their party.
pub struct CreatePing {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
    notifier: Arc<dyn Notifier>,
    stats: Arc<StatsAggregator>,
}

impl CreatePing {
    pub fn new(
        directory: Arc<PartyDirectory>,
        pings: Arc<PingRegistry>,
        notifier: Arc<dyn Notifier>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            pings,
            notifier,
            stats,
        }
    }

    pub fn execute(&self, input: CreatePingInput) -> Result<CreatePingOutput, CreatePingError> {
        let party = self
            .directory
            .get_party_of(&input.owner_id)
            .ok_or(CreatePingError::NotInParty)?;
        let slot_index = party
            .slot_index(&input.owner_id)
            .ok_or(CreatePingError::NotInParty)?;

        let ping = Ping::new(
            input.owner_id.clone(),
            input.owner_name,
            party.id.clone(),
            input.position,
            input.context,
            slot_index,
        );
        self.pings.insert(ping.clone());
        self.stats.record_ping(&input.owner_id);
        self.notifier.notify_all(
            &party.roster(),
            PartyEvent::new("pingUpdate", Some(party.id.clone()), None)
                .with_action("pingCreated")
                .with_data(serde_json::json!({
                    "pingId": ping.id,
                    "ownerId": ping.owner_id,
                    "position": ping.position,
                })),
        );

        Ok(CreatePingOutput { ping })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePingError {
    #[error("Not in a party")]
    NotInParty,
}
