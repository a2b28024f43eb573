use std::sync::Arc;

use crate::domain::entities::Ping;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::PingRegistry;

/// Read-side ping queries
pub struct GetPings {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
}

impl GetPings {
    pub fn new(directory: Arc<PartyDirectory>, pings: Arc<PingRegistry>) -> Self {
        Self { directory, pings }
    }

    /// Live markers for a party, ordered by owner slot.
    pub fn for_party(&self, party_id: &str) -> Result<Vec<Ping>, GetPingsError> {
        if self.directory.get_party(party_id).is_none() {
            return Err(GetPingsError::PartyNotFound);
        }
        Ok(self.pings.party_pings(party_id))
    }

    /// Live markers visible to a player, i.e. those of their party.
    pub fn for_player(&self, player_id: &str) -> Result<Vec<Ping>, GetPingsError> {
        let party = self
            .directory
            .get_party_of(player_id)
            .ok_or(GetPingsError::NotInParty)?;
        Ok(self.pings.party_pings(&party.id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetPingsError {
    #[error("Party not found")]
    PartyNotFound,
    #[error("Not in a party")]
    NotInParty,
}
