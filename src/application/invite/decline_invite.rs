use std::sync::Arc;

use crate::domain::services::Notifier;
use crate::domain::value_objects::PartyEvent;
use crate::infrastructure::registries::InviteRegistry;

/// Decline invite input
pub struct DeclineInviteInput {
    pub player_id: String,
}

/// Decline invite output
pub struct DeclineInviteOutput {
    /// False when there was nothing to decline (already expired or never
    /// sent). Declining is idempotent either way.
    pub was_pending: bool,
}

/// Decline invite use case
pub struct DeclineInvite {
    invites: Arc<InviteRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl DeclineInvite {
    pub fn new(invites: Arc<InviteRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self { invites, notifier }
    }

    pub fn execute(&self, input: DeclineInviteInput) -> DeclineInviteOutput {
        let Some(invite) = self.invites.remove(&input.player_id) else {
            return DeclineInviteOutput { was_pending: false };
        };

        let now = chrono::Utc::now().timestamp_millis();
        let was_pending = !invite.is_expired_at(now);
        if was_pending {
            self.notifier.notify(
                &invite.sender,
                PartyEvent::new("partyUpdate", Some(invite.party_id.clone()), None)
                    .with_action("inviteDeclined")
                    .with_data(serde_json::json!({ "playerId": input.player_id })),
            );
        }

        DeclineInviteOutput { was_pending }
    }
}
