//! Import coordinator - scheduled task entry point
//!
//! Wires storage, alerting and replica management around the [`Importer`]
//! and implements the scheduled task: load the inactive replica, then make
//! it active if the import completed.

use crate::adapters::alert::{create_alert_sink, AlertSink};
use crate::adapters::database::{create_storage, StorageBackends};
use crate::config::schema::SyncConfig;
use crate::config::XmlSyncConfig;
use crate::core::import::importer::Importer;
use crate::core::import::outcome::ImportOutcome;
use crate::core::replica::ReplicaManager;
use crate::core::state::{ImportMetadata, MetadataStore};
use crate::core::visibility::ReplicaVisibilityLookup;
use crate::domain::entity::replica_table;
use crate::domain::{EntityKind, Result};
use std::sync::Arc;
use std::time::Instant;

/// Replica and metadata snapshot for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaStatus {
    pub kind: EntityKind,
    pub active: &'static str,
    pub inactive: &'static str,
    pub active_metadata: Option<ImportMetadata>,
    pub inactive_metadata: Option<ImportMetadata>,
    /// Rows currently in the active replica table
    pub active_rows: u64,
    /// Rows currently in the inactive replica table
    pub inactive_rows: u64,
}

/// Import coordinator
pub struct ImportCoordinator {
    sync: SyncConfig,
    storage: StorageBackends,
    alerts: Arc<dyn AlertSink + Send + Sync>,
    replicas: ReplicaManager,
    metadata: MetadataStore,
}

impl ImportCoordinator {
    /// Create a coordinator from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be reached or the alert sink
    /// cannot be built.
    pub async fn new(config: &XmlSyncConfig) -> Result<Self> {
        let storage = create_storage(config).await?;
        let alerts = create_alert_sink(&config.alert)?;
        Ok(Self::with_backends(config.sync.clone(), storage, alerts))
    }

    /// Create a coordinator over existing backends
    pub fn with_backends(
        sync: SyncConfig,
        storage: StorageBackends,
        alerts: Arc<dyn AlertSink + Send + Sync>,
    ) -> Self {
        let replicas = ReplicaManager::new(storage.settings.clone());
        let metadata = MetadataStore::new(storage.settings.clone());
        Self {
            sync,
            storage,
            alerts,
            replicas,
            metadata,
        }
    }

    /// Importer for one entity, sharing this coordinator's backends
    pub fn importer(&self, kind: EntityKind) -> Importer {
        Importer::new(
            kind,
            self.sync.clone(),
            self.storage.tables.clone(),
            self.storage.settings.clone(),
            self.alerts.clone(),
        )
    }

    pub fn replicas(&self) -> &ReplicaManager {
        &self.replicas
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Course visibility hook over the same storage
    pub fn visibility_lookup(&self) -> ReplicaVisibilityLookup {
        ReplicaVisibilityLookup::new(self.replicas.clone(), self.storage.reader.clone())
    }

    /// Run the scheduled import for `kind`
    ///
    /// Reads the previous-run state from the active replica's metadata,
    /// imports into the inactive replica and, only when a live import
    /// completed, makes that replica active.
    ///
    /// # Errors
    ///
    /// Any import error. The active replica is left unchanged.
    pub async fn run_task(&self, kind: EntityKind, flush: bool) -> Result<ImportOutcome> {
        let active = self.replicas.active_replica(kind).await?;
        let target = ReplicaManager::other_replica(kind, active)?;
        let previous = self.metadata.previous_run_state(kind, active).await?;

        let start_time = Instant::now();
        crate::log_import_start!(kind, target);
        tracing::debug!(
            entity = %kind,
            active = %active,
            last_import_count = ?previous.last_import_count,
            last_source_timestamp = ?previous.last_source_timestamp,
            "Previous run state loaded"
        );

        let outcome = self.importer(kind).import(Some(target), flush, &previous).await?;

        if let ImportOutcome::Completed { metadata, .. } = &outcome {
            tracing::info!(entity = %kind, "Setting replica as active: {target}");
            self.replicas.set_active(kind, target).await?;
            crate::log_import_complete!(kind, metadata.import_count, start_time.elapsed());
        } else {
            tracing::info!(entity = %kind, active = %active, "No new data, active replica unchanged");
        }

        Ok(outcome)
    }

    /// Read and validate `kind`'s extract without writing anything
    ///
    /// Uses the active replica's metadata as the previous run, so the result
    /// previews what the next scheduled run would do.
    ///
    /// # Errors
    ///
    /// Any import error.
    pub async fn dry_run(&self, kind: EntityKind) -> Result<ImportOutcome> {
        let active = self.replicas.active_replica(kind).await?;
        let previous = self.metadata.previous_run_state(kind, active).await?;
        self.importer(kind).import(None, false, &previous).await
    }

    /// Active replica, both replicas' metadata and their current row counts
    ///
    /// # Errors
    ///
    /// Returns an error if settings or table counts cannot be read.
    pub async fn status(&self, kind: EntityKind) -> Result<ReplicaStatus> {
        let active = self.replicas.active_replica(kind).await?;
        let inactive = ReplicaManager::other_replica(kind, active)?;
        Ok(ReplicaStatus {
            kind,
            active,
            inactive,
            active_metadata: self.metadata.load(kind, active).await?,
            inactive_metadata: self.metadata.load(kind, inactive).await?,
            active_rows: self.storage.reader.count_records(&replica_table(active)).await?,
            inactive_rows: self.storage.reader.count_records(&replica_table(inactive)).await?,
        })
    }
}
