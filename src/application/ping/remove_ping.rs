use std::sync::Arc;

use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::PingRegistry;

/// Remove ping input
pub struct RemovePingInput {
    pub owner_id: String,
}

/// Remove ping output
pub struct RemovePingOutput {
    pub removed: bool,
}

/// Remove ping use case: a player withdraws their own marker early
pub struct RemovePing {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl RemovePing {
    pub fn new(
        directory: Arc<PartyDirectory>,
        pings: Arc<PingRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            directory,
            pings,
            notifier,
        }
    }

    pub fn execute(&self, input: RemovePingInput) -> Result<RemovePingOutput, RemovePingError> {
        let party = self
            .directory
            .get_party_of(&input.owner_id)
            .ok_or(RemovePingError::NotInParty)?;

        let removed = self.pings.remove(&party.id, &input.owner_id);
        if let Some(ping) = &removed {
            self.notifier.notify_all(
                &party.roster(),
                PartyEvent::new("pingUpdate", Some(party.id.clone()), None)
                    .with_action("pingRemoved")
                    .with_data(serde_json::json!({
                        "pingId": ping.id,
                        "ownerId": ping.owner_id,
                    })),
            );
        }

        Ok(RemovePingOutput {
            removed: removed.is_some(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RemovePingError {
    #[error("Not in a party")]
    NotInParty,
}
