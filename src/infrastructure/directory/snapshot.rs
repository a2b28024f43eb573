use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::entities::PartyRecord;
use crate::domain::repositories::{SnapshotError, SnapshotStore};

/// JSON snapshot store
///
/// The whole directory is persisted as one flat JSON array of party
/// records. Every save rewrites the document through a temp file rename;
/// there is no append log and no versioning field.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Vec<PartyRecord>, SnapshotError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No party snapshot found, starting empty");
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // Parse records one by one so a single malformed entry cannot
        // take the rest of the snapshot down with it.
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;
        let mut records = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<PartyRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "Skipping malformed party record in snapshot"),
            }
        }
        debug!(count = records.len(), "Loaded party snapshot");
        Ok(records)
    }

    async fn save(&self, records: &[PartyRecord]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(records)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;
        debug!(count = records.len(), path = %self.path.display(), "Party snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> JsonSnapshotStore {
        let path = std::env::temp_dir().join(format!("parties-{}.json", uuid::Uuid::new_v4()));
        JsonSnapshotStore::new(path)
    }

    fn sample_records() -> Vec<PartyRecord> {
        let mut a = PartyRecord::new("leader".into(), "Raiders".into());
        a.members.push("m1".into());
        a.members.push("m2".into());
        a.pvp_enabled = true;
        a.password = Some("hunter2".into());
        let b = PartyRecord::new("solo".into(), "Wanderers".into());
        vec![a, b]
    }

    #[tokio::test]
    async fn test_round_trip_preserves_records() {
        let store = temp_store();
        let records = sample_records();
        store.save(&records).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        for original in &records {
            let restored = loaded.iter().find(|r| r.id == original.id).unwrap();
            assert_eq!(restored.leader, original.leader);
            assert_eq!(restored.members, original.members);
            assert_eq!(restored.name, original.name);
            assert_eq!(restored.pvp_enabled, original.pvp_enabled);
            assert_eq!(restored.is_public, original.is_public);
            assert_eq!(restored.password, original.password);
        }
        fs::remove_file(store.path()).await.ok();
    }

    #[tokio::test]
    async fn test_missing_file_initializes_empty_placeholder() {
        let store = temp_store();
        let loaded = store.load().await.unwrap();
        assert!(loaded.is_empty());
        // An empty placeholder document must now exist.
        let content = fs::read_to_string(store.path()).await.unwrap();
        let values: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        assert!(values.is_empty());
        fs::remove_file(store.path()).await.ok();
    }

    #[tokio::test]
    async fn test_malformed_record_is_skipped() {
        let store = temp_store();
        let good = serde_json::to_value(&sample_records()[1]).unwrap();
        let doc = serde_json::json!([good, {"id": 42, "bogus": true}]);
        fs::write(store.path(), doc.to_string()).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].leader, "solo");
        fs::remove_file(store.path()).await.ok();
    }
}
