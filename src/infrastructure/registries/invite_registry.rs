use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::Invite;

/// Pending invite registry
///
/// At most one live invite per recipient; a newer invite unconditionally
/// replaces the old one. Expiry is wall-clock, evaluated on read and by
/// the periodic sweep.
pub struct InviteRegistry {
    invites: RwLock<HashMap<String, Invite>>,
}

impl InviteRegistry {
    pub fn new() -> Self {
        Self {
            invites: RwLock::new(HashMap::new()),
        }
    }

    /// Record an invite, replacing any prior one for the recipient.
    pub fn send(&self, invite: Invite) {
        let mut invites = self.invites.write().unwrap();
        invites.insert(invite.recipient.clone(), invite);
    }

    /// Pending, non-expired invite for the recipient. An expired entry
    /// found here is purged immediately rather than waiting for the sweep.
    pub fn pending(&self, recipient: &str) -> Option<Invite> {
        let now = chrono::Utc::now().timestamp_millis();
        self.pending_at(recipient, now)
    }

    pub fn pending_at(&self, recipient: &str, now_ms: i64) -> Option<Invite> {
        {
            let invites = self.invites.read().unwrap();
            match invites.get(recipient) {
                Some(invite) if !invite.is_expired_at(now_ms) => return Some(invite.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Lazy deletion of the expired entry.
        let mut invites = self.invites.write().unwrap();
        if invites.get(recipient).is_some_and(|i| i.is_expired_at(now_ms)) {
            invites.remove(recipient);
        }
        None
    }

    /// Remove and return the recipient's invite, expired or not.
    pub fn remove(&self, recipient: &str) -> Option<Invite> {
        let mut invites = self.invites.write().unwrap();
        invites.remove(recipient)
    }

    /// Drop every expired invite; returns how many were removed.
    pub fn sweep_expired_at(&self, now_ms: i64) -> usize {
        let mut invites = self.invites.write().unwrap();
        let before = invites.len();
        invites.retain(|_, invite| !invite.is_expired_at(now_ms));
        before - invites.len()
    }

    pub fn len(&self) -> usize {
        self.invites.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InviteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
