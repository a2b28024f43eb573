use std::sync::Arc;

use crate::domain::entities::PartyRecord;
use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::{LeaderActionResult, PartyDirectory, SettingsPatch};

/// Update party settings input; `None` fields are left untouched.
/// An empty `password` string clears the password.
pub struct UpdatePartyInput {
    pub party_id: String,
    pub leader_id: String,
    pub name: Option<String>,
    pub pvp_enabled: Option<bool>,
    pub is_public: Option<bool>,
    pub password: Option<String>,
    pub max_size: Option<u8>,
}

/// Update party settings output
pub struct UpdatePartyOutput {
    pub party: PartyRecord,
}

/// Update party settings use case (leader-only)
pub struct UpdateParty {
    directory: Arc<PartyDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl UpdateParty {
    pub fn new(directory: Arc<PartyDirectory>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            directory,
            notifier,
        }
    }

    pub fn execute(&self, input: UpdatePartyInput) -> Result<UpdatePartyOutput, UpdatePartyError> {
        let name = match input.name {
            Some(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(UpdatePartyError::MissingName);
                }
                Some(name.to_string())
            }
            None => None,
        };
        let patch = SettingsPatch {
            name,
            pvp_enabled: input.pvp_enabled,
            is_public: input.is_public,
            password: input
                .password
                .map(|p| if p.is_empty() { None } else { Some(p) }),
            max_size: input.max_size,
        };

        // The directory re-checks leadership under its write lock, so a
        // promotion racing this call cannot let the ex-leader through.
        let updated = match self
            .directory
            .update_settings(&input.party_id, &input.leader_id, patch)
        {
            LeaderActionResult::Applied(party) => party,
            LeaderActionResult::PartyNotFound => return Err(UpdatePartyError::PartyNotFound),
            LeaderActionResult::NotLeader => return Err(UpdatePartyError::NotLeader),
        };
        self.notifier.notify_all(
            &updated.roster(),
            PartyEvent::new("partyUpdate", Some(updated.id.clone()), None)
                .with_action("settingsChanged"),
        );

        Ok(UpdatePartyOutput { party: updated })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePartyError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Only the leader can change party settings")]
    NotLeader,
    #[error("Party name is required")]
    MissingName,
}
