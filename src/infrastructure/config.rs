use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::{MAX_PARTY_SIZE, MIN_PARTY_SIZE};

/// How often expired pings are swept.
pub const PING_SWEEP_INTERVAL: Duration = Duration::from_secs(5);
/// Beacon broadcast cadence.
pub const BEACON_INTERVAL: Duration = Duration::from_secs(1);
/// Players within this range of a marker see its beacon.
pub const BEACON_RADIUS: f64 = 32.0;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Global party size cap, clamped into [2, 16].
    pub max_party_size: u8,
    /// Party reconciler cadence.
    pub reconcile_interval: Duration,
    /// Continuous-offline duration after which a member is evicted;
    /// zero disables eviction entirely.
    pub offline_removal: Duration,
    pub persistence_enabled: bool,
    pub snapshot_path: PathBuf,
    /// Stats aggregator reset cadence.
    pub stats_reset_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 9999,
            max_party_size: 8,
            reconcile_interval: Duration::from_secs(5),
            offline_removal: Duration::ZERO,
            persistence_enabled: true,
            snapshot_path: PathBuf::from("./data/parties.json"),
            stats_reset_interval: Duration::from_secs(3600),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT").unwrap_or(defaults.port),
            max_party_size: env_parse::<u8>("PARTY_MAX_SIZE")
                .unwrap_or(defaults.max_party_size)
                .clamp(MIN_PARTY_SIZE, MAX_PARTY_SIZE),
            reconcile_interval: env_parse::<u64>("PARTY_RECONCILE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.reconcile_interval),
            offline_removal: env_parse::<u64>("PARTY_OFFLINE_REMOVAL_MINUTES")
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(defaults.offline_removal),
            persistence_enabled: env_parse("PARTY_PERSISTENCE_ENABLED")
                .unwrap_or(defaults.persistence_enabled),
            snapshot_path: std::env::var("PARTY_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            stats_reset_interval: env_parse::<u64>("PARTY_STATS_RESET_MINUTES")
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(defaults.stats_reset_interval),
        }
    }

    pub fn offline_removal_enabled(&self) -> bool {
        !self.offline_removal.is_zero()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
