//! Import metadata persistence
//!
//! This module provides the MetadataStore for loading and saving per-replica
//! import metadata through the settings backend.

use crate::adapters::database::traits::SettingsStore;
use crate::core::state::metadata::{ImportMetadata, PreviousRunState};
use crate::domain::entity::metadata_key;
use crate::domain::{EntityKind, ImportError, Result};
use std::sync::Arc;

/// Per-replica import metadata store
///
/// Each replica's metadata lives under the settings key
/// `<replica>_metadata` as a JSON document.
#[derive(Clone)]
pub struct MetadataStore {
    /// Settings backend
    settings: Arc<dyn SettingsStore + Send + Sync>,
}

impl MetadataStore {
    /// Create a new MetadataStore
    ///
    /// # Arguments
    ///
    /// * `settings` - Settings storage implementation
    pub fn new(settings: Arc<dyn SettingsStore + Send + Sync>) -> Self {
        Self { settings }
    }

    /// Load a replica's metadata
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the replica has never completed an import, or if
    /// its stored document cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` if `replica` is not one of the
    /// entity's slots, or an error if the settings read fails.
    pub async fn load(&self, kind: EntityKind, replica: &str) -> Result<Option<ImportMetadata>> {
        validate_replica(kind, replica)?;

        let Some(json) = self.settings.get_setting(&metadata_key(replica)).await? else {
            tracing::debug!(entity = %kind, replica = %replica, "No import metadata stored");
            return Ok(None);
        };

        match ImportMetadata::from_json(&json) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) => {
                tracing::warn!(
                    entity = %kind,
                    replica = %replica,
                    error = %e,
                    "Ignoring unreadable import metadata"
                );
                Ok(None)
            }
        }
    }

    /// Save a replica's metadata, replacing any previous document
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidReplica` for an unknown replica, or an
    /// error if serialization or the settings write fails.
    pub async fn save(
        &self,
        kind: EntityKind,
        replica: &str,
        metadata: &ImportMetadata,
    ) -> Result<()> {
        validate_replica(kind, replica)?;

        let json = metadata.to_json()?;
        self.settings
            .set_setting(&metadata_key(replica), &json)
            .await?;

        tracing::debug!(
            entity = %kind,
            replica = %replica,
            import_count = metadata.import_count,
            source_timestamp = metadata.source_timestamp,
            "Import metadata saved"
        );
        Ok(())
    }

    /// Previous-run state derived from a replica's metadata
    ///
    /// # Errors
    ///
    /// Same as [`MetadataStore::load`].
    pub async fn previous_run_state(
        &self,
        kind: EntityKind,
        replica: &str,
    ) -> Result<PreviousRunState> {
        Ok(PreviousRunState::from(self.load(kind, replica).await?.as_ref()))
    }
}

fn validate_replica(kind: EntityKind, replica: &str) -> std::result::Result<(), ImportError> {
    if kind.spec().is_replica(replica) {
        Ok(())
    } else {
        Err(ImportError::InvalidReplica(replica.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::core::state::metadata::ImportMetadataBuilder;
    use crate::domain::XmlSyncError;

    #[tokio::test]
    async fn test_save_and_load() {
        let backend = Arc::new(InMemoryStore::new());
        let store = MetadataStore::new(backend.clone());

        let metadata = ImportMetadataBuilder::new("per", 1_700_000_000)
            .importcount(12)
            .rowcount(Some(12))
            .importedtime(1_700_000_100)
            .build();
        store.save(EntityKind::User, "userimport_b", &metadata).await.unwrap();

        let raw = backend.get_setting("userimport_b_metadata").await.unwrap().unwrap();
        assert!(raw.contains(r#""importcount":12"#));

        let loaded = store.load(EntityKind::User, "userimport_b").await.unwrap();
        assert_eq!(loaded, Some(metadata));
        assert_eq!(store.load(EntityKind::User, "userimport_a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_replica_is_rejected() {
        let store = MetadataStore::new(Arc::new(InMemoryStore::new()));

        let err = store.load(EntityKind::Course, "userimport_a").await.unwrap_err();
        assert!(matches!(
            err,
            XmlSyncError::Import(ImportError::InvalidReplica(_))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_metadata_is_ignored() {
        let backend = Arc::new(InMemoryStore::new());
        backend.seed_setting("enrolimport_a_metadata", "not json").await;
        let store = MetadataStore::new(backend);

        let previous = store
            .previous_run_state(EntityKind::Enrolment, "enrolimport_a")
            .await
            .unwrap();
        assert_eq!(previous, PreviousRunState::none());
    }
}
