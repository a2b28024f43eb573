use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::infrastructure::directory::PartyDirectory;

/// Per-player activity counters, reset periodically
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCounters {
    pub parties_created: u64,
    pub parties_joined: u64,
    pub parties_left: u64,
    pub invites_sent: u64,
    pub invites_accepted: u64,
    pub pings_created: u64,
}

/// Party-level stats readout
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyStatsReport {
    pub party_id: String,
    pub party_name: String,
    pub players: HashMap<String, PlayerCounters>,
}

/// Stats aggregator
///
/// Counter bookkeeping only; party membership is always resolved through
/// the directory at read time.
pub struct StatsAggregator {
    directory: Arc<PartyDirectory>,
    counters: RwLock<HashMap<String, PlayerCounters>>,
}

impl StatsAggregator {
    pub fn new(directory: Arc<PartyDirectory>) -> Self {
        Self {
            directory,
            counters: RwLock::new(HashMap::new()),
        }
    }

    fn bump<F: FnOnce(&mut PlayerCounters)>(&self, player_id: &str, f: F) {
        let mut counters = self.counters.write().unwrap();
        f(counters.entry(player_id.to_string()).or_default());
    }

    pub fn record_party_created(&self, player_id: &str) {
        self.bump(player_id, |c| c.parties_created += 1);
    }

    pub fn record_join(&self, player_id: &str) {
        self.bump(player_id, |c| c.parties_joined += 1);
    }

    pub fn record_leave(&self, player_id: &str) {
        self.bump(player_id, |c| c.parties_left += 1);
    }

    pub fn record_invite_sent(&self, player_id: &str) {
        self.bump(player_id, |c| c.invites_sent += 1);
    }

    pub fn record_invite_accepted(&self, player_id: &str) {
        self.bump(player_id, |c| c.invites_accepted += 1);
    }

    pub fn record_ping(&self, player_id: &str) {
        self.bump(player_id, |c| c.pings_created += 1);
    }

    pub fn player_counters(&self, player_id: &str) -> PlayerCounters {
        let counters = self.counters.read().unwrap();
        counters.get(player_id).cloned().unwrap_or_default()
    }

    /// Counters for every current occupant of a party.
    pub fn party_report(&self, party_id: &str) -> Option<PartyStatsReport> {
        let party = self.directory.get_party(party_id)?;
        let counters = self.counters.read().unwrap();
        let players = party
            .roster()
            .into_iter()
            .map(|p| {
                let c = counters.get(&p).cloned().unwrap_or_default();
                (p, c)
            })
            .collect();
        Some(PartyStatsReport {
            party_id: party.id,
            party_name: party.name,
            players,
        })
    }

    /// Periodic reset; returns how many player entries were dropped.
    pub fn reset(&self) -> usize {
        let mut counters = self.counters.write().unwrap();
        let count = counters.len();
        counters.clear();
        count
    }
}
