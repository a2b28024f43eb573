use std::sync::Arc;

use crate::domain::entities::Invite;
use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::InviteRegistry;
use crate::infrastructure::services::StatsAggregator;

/// Send invite input
pub struct SendInviteInput {
    pub sender_id: String,
    pub recipient_id: String,
}

/// Send invite output
pub struct SendInviteOutput {
    pub invite: Invite,
}

/// Send invite use case
///
/// Any current member may invite, not just the leader. A newer invite
/// silently replaces whatever the recipient had pending.
pub struct SendInvite {
    directory: Arc<PartyDirectory>,
    invites: Arc<InviteRegistry>,
    notifier: Arc<dyn Notifier>,
    stats: Arc<StatsAggregator>,
}

impl SendInvite {
    pub fn new(
        directory: Arc<PartyDirectory>,
        invites: Arc<InviteRegistry>,
        notifier: Arc<dyn Notifier>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            directory,
            invites,
            notifier,
            stats,
        }
    }

    pub fn execute(&self, input: SendInviteInput) -> Result<SendInviteOutput, SendInviteError> {
        if input.sender_id == input.recipient_id {
            return Err(SendInviteError::SelfInvite);
        }

        let party = self
            .directory
            .get_party_of(&input.sender_id)
            .ok_or(SendInviteError::SenderNotInParty)?;
        if party.contains(&input.recipient_id) {
            return Err(SendInviteError::AlreadyAMember);
        }

        let invite = Invite::new(
            input.recipient_id.clone(),
            input.sender_id.clone(),
            party.id.clone(),
        );
        self.invites.send(invite.clone());
        self.stats.record_invite_sent(&input.sender_id);
        self.notifier.notify(
            &input.recipient_id,
            PartyEvent::new("partyUpdate", Some(party.id.clone()), None)
                .with_action("inviteReceived")
                .with_data(serde_json::json!({
                    "sender": input.sender_id,
                    "partyName": party.name,
                })),
        );

        Ok(SendInviteOutput { invite })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendInviteError {
    #[error("Cannot invite yourself")]
    SelfInvite,
    #[error("Sender is not in a party")]
    SenderNotInParty,
    #[error("Player is already in this party")]
    AlreadyAMember,
}
