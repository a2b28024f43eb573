use std::sync::Arc;

use crate::domain::services::WorldEffects;
use crate::infrastructure::config::BEACON_RADIUS;
use crate::infrastructure::directory::PartyDirectory;
use crate::infrastructure::registries::PingRegistry;

/// Beacon broadcaster
///
/// Every tick re-emits a beacon effect for each live ping to the party
/// members standing within [`BEACON_RADIUS`] of it. Outsiders near the
/// marker see nothing.
pub struct BeaconBroadcaster {
    directory: Arc<PartyDirectory>,
    pings: Arc<PingRegistry>,
    effects: Arc<dyn WorldEffects>,
}

impl BeaconBroadcaster {
    pub fn new(
        directory: Arc<PartyDirectory>,
        pings: Arc<PingRegistry>,
        effects: Arc<dyn WorldEffects>,
    ) -> Self {
        Self {
            directory,
            pings,
            effects,
        }
    }

    pub fn tick(&self) {
        self.tick_at(chrono::Utc::now().timestamp_millis());
    }

    pub fn tick_at(&self, now_ms: i64) {
        for ping in self.pings.active_at(now_ms) {
            let Some(party) = self.directory.get_party(&ping.party_id) else {
                continue;
            };
            let observers: Vec<String> = self
                .effects
                .players_near(&ping.position, BEACON_RADIUS)
                .into_iter()
                .filter(|p| party.contains(p))
                .collect();
            if !observers.is_empty() {
                self.effects.emit_beacon(&ping, &observers);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::entities::Ping;
    use crate::domain::value_objects::Position;

    struct RecordingEffects {
        nearby: Vec<String>,
        emitted: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl RecordingEffects {
        fn new(nearby: &[&str]) -> Self {
            Self {
                nearby: nearby.iter().map(|s| s.to_string()).collect(),
                emitted: Mutex::new(Vec::new()),
            }
        }
    }

    impl WorldEffects for RecordingEffects {
        fn players_near(&self, _position: &Position, _radius: f64) -> Vec<String> {
            self.nearby.clone()
        }

        fn emit_beacon(&self, ping: &Ping, observers: &[String]) {
            self.emitted
                .lock()
                .unwrap()
                .push((ping.id.clone(), observers.to_vec()));
        }
    }

    #[test]
    fn test_beacon_only_reaches_nearby_party_members() {
        let directory = Arc::new(PartyDirectory::new(8));
        let pings = Arc::new(PingRegistry::new());
        let party = directory.create_party("leader", "Raiders").unwrap();
        directory.join(&party.id, "m1");

        // "stranger" is close to the marker but not in the party.
        let effects = Arc::new(RecordingEffects::new(&["m1", "stranger"]));
        let broadcaster = BeaconBroadcaster::new(directory, pings.clone(), effects.clone());

        let ping = Ping::new(
            "leader".into(),
            "Leader".into(),
            party.id.clone(),
            Position::new(0.0, 64.0, 0.0),
            "overworld".into(),
            0,
        );
        let now = ping.created_at;
        pings.insert(ping.clone());

        broadcaster.tick_at(now);
        let emitted = effects.emitted.lock().unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, ping.id);
        assert_eq!(emitted[0].1, vec!["m1".to_string()]);
    }

    #[test]
    fn test_expired_ping_emits_nothing() {
        let directory = Arc::new(PartyDirectory::new(8));
        let pings = Arc::new(PingRegistry::new());
        let party = directory.create_party("leader", "Raiders").unwrap();

        let effects = Arc::new(RecordingEffects::new(&["leader"]));
        let broadcaster = BeaconBroadcaster::new(directory, pings.clone(), effects.clone());

        let ping = Ping::new(
            "leader".into(),
            "Leader".into(),
            party.id,
            Position::new(0.0, 64.0, 0.0),
            "overworld".into(),
            0,
        );
        let expired_at = ping.created_at + ping.duration_ms + 1;
        pings.insert(ping);

        broadcaster.tick_at(expired_at);
        assert!(effects.emitted.lock().unwrap().is_empty());
    }
}
