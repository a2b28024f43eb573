use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::services::StatsAggregator;

/// Create party input
pub struct CreatePartyInput {
    pub owner_id: String,
    pub name: String,
}

/// Create party output
pub struct CreatePartyOutput {
    pub party: PartyRecord,
}

/// Create party use case
pub struct CreateParty {
    directory: Arc<PartyDirectory>,
    notifier: Arc<dyn Notifier>,
    stats: Arc<StatsAggregator>,
}

impl CreateParty {
    pub fn new(
        directory: Arc<PartyDirectory>,
        notifier: Arc<dyn Notifier>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            notifier,
            stats,
        }
    }

    pub fn execute(&self, input: CreatePartyInput) -> Result<CreatePartyOutput, CreatePartyError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CreatePartyError::MissingName);
        }

        let party = self
            .directory
            .create_party(&input.owner_id, name)
            .ok_or(CreatePartyError::AlreadyInParty)?;

        self.stats.record_party_created(&input.owner_id);
        self.notifier.notify(
            &input.owner_id,
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("partyCreated")
                .with_data(serde_json::json!({ "name": party.name })),
        );

        Ok(CreatePartyOutput { party })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePartyError {
    #[error("Party name is required")]
    MissingName,
    #[error("Already in a party")]
    AlreadyInParty,
}
