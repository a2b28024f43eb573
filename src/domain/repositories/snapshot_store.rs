use async_trait::async_trait;

use crate::domain::entities::PartyRecord;

/// Snapshot store trait
///
/// Persistence is a full-document rewrite: every save replaces the whole
/// snapshot, and load returns every record it could parse.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load all persisted party records. A missing document yields an
    /// empty list; individually malformed records are skipped.
    async fn load(&self) -> Result<Vec<PartyRecord>, SnapshotError>;

    /// Rewrite the snapshot with the given records.
    async fn save(&self, records: &[PartyRecord]) -> Result<(), SnapshotError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
