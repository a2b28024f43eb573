use serde::Serialize;

/// How long a pending invite stays acceptable.
pub const INVITE_TTL_MS: i64 = 60_000;

/// Pending party invite
///
/// One-shot, time-boxed offer for `recipient` to join `party_id`.
/// A recipient holds at most one live invite; a newer one replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub recipient: String,
    pub sender: String,
    pub party_id: String,
    /// Epoch millis.
    pub created_at: i64,
}

impl Invite {
    pub fn new(recipient: String, sender: String, party_id: String) -> Self {
        Self {
            recipient,
            sender,
            party_id,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms - self.created_at > INVITE_TTL_MS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_ttl_boundaries() {
        let invite = Invite::new("m1".into(), "leader".into(), "p1".into());
        let t = invite.created_at;
        assert!(!invite.is_expired_at(t + 59_000));
        assert!(!invite.is_expired_at(t + 60_000));
        assert!(invite.is_expired_at(t + 61_000));
    }
}
