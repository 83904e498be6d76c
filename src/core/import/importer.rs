//! Generic extract importer
//!
//! One [`Importer`] serves every entity kind; the differences between
//! course, enrolment and user imports come from the entity's
//! [`EntityImportSpec`](crate::domain::EntityImportSpec).

use crate::adapters::alert::AlertSink;
use crate::adapters::database::traits::{SettingsStore, TableWriter};
use crate::adapters::xml::{Element, XmlCursor};
use crate::config::schema::SyncConfig;
use crate::core::import::envelope::{read_envelope, ImportEnvelope, ROWCOUNT_ELEMENT, ROW_ELEMENT};
use crate::core::import::guardrails::{check_drift, is_duplicate, is_stale, verify_row_count};
use crate::core::import::outcome::ImportOutcome;
use crate::core::replica::ReplicaManager;
use crate::core::state::{ActionCounts, ImportMetadataBuilder, MetadataStore, PreviousRunState};
use crate::core::transform::{map_row, row_action};
use crate::domain::entity::{log_table, replica_table};
use crate::domain::{ColumnValue, EntityKind, ImportError, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// Row action that inserts or updates
pub const ACTION_UPDATE: &str = "U";

/// Row action that deletes
pub const ACTION_DELETE: &str = "D";

const LOG_ACTION_COLUMN: &str = "rowaction";
const LOG_PROCESSED_COLUMN: &str = "rowprocessed";

/// Tables a live run writes to
struct RunTables {
    replica: &'static str,
    import: String,
    log: Option<String>,
}

/// Loads one entity's extract file into a replica table
pub struct Importer {
    kind: EntityKind,
    sync: SyncConfig,
    tables: Arc<dyn TableWriter + Send + Sync>,
    metadata: MetadataStore,
    alerts: Arc<dyn AlertSink + Send + Sync>,
}

impl Importer {
    /// Create an importer for `kind`
    ///
    /// # Arguments
    ///
    /// * `kind` - Entity to import
    /// * `sync` - Sync directory and guardrail thresholds
    /// * `tables` - Destination for replica and log rows
    /// * `settings` - Backend for import metadata
    /// * `alerts` - Destination for stale-file alerts
    pub fn new(
        kind: EntityKind,
        sync: SyncConfig,
        tables: Arc<dyn TableWriter + Send + Sync>,
        settings: Arc<dyn SettingsStore + Send + Sync>,
        alerts: Arc<dyn AlertSink + Send + Sync>,
    ) -> Self {
        Self {
            kind,
            sync,
            tables,
            metadata: MetadataStore::new(settings),
            alerts,
        }
    }

    /// Entity this importer loads
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Full path of the entity's extract file
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Configuration` if the sync path is empty.
    pub fn source_path(&self) -> std::result::Result<PathBuf, ImportError> {
        join_sync_path(&self.sync.sync_path, self.kind.spec().filename).map(PathBuf::from)
    }

    /// Run one import
    ///
    /// With `target` set, rows are written to that replica's table and the
    /// run's metadata is saved under it. Without a target the file is read
    /// and validated but nothing is written (dry run).
    ///
    /// # Arguments
    ///
    /// * `target` - Replica to load, or `None` for a dry run
    /// * `flush` - Empty the target table before loading
    /// * `previous` - What the previous successful run recorded
    ///
    /// # Errors
    ///
    /// Returns `ImportError` for configuration, file, format, row and
    /// guardrail failures, or a storage error. No metadata is saved when an
    /// error is returned.
    pub async fn import(
        &self,
        target: Option<&str>,
        flush: bool,
        previous: &PreviousRunState,
    ) -> Result<ImportOutcome> {
        let spec = self.kind.spec();

        let run_tables = match target {
            Some(name) => {
                let replica = ReplicaManager::resolve(self.kind, name)?;
                let import = replica_table(replica);
                let log = spec.keeps_log_table.then(|| log_table(&import));
                Some(RunTables {
                    replica,
                    import,
                    log,
                })
            }
            None => {
                tracing::warn!(entity = %self.kind, "Dry run: no replica name specified");
                None
            }
        };

        let path = self.source_path()?;
        let mut cursor = XmlCursor::open(&path)?;
        let mut envelope = read_envelope(&mut cursor)?;

        let now = Utc::now().timestamp();

        tracing::info!(
            entity = %self.kind,
            file = %path.display(),
            source_file = %envelope.source_file,
            source_timestamp = envelope.source_timestamp,
            target = target.unwrap_or("none"),
            "Import started"
        );

        if is_stale(now, envelope.source_timestamp, self.sync.stale_threshold_secs) {
            self.raise_stale_alert(&envelope, now).await;
        }

        if is_duplicate(previous, envelope.source_timestamp) {
            tracing::warn!(
                entity = %self.kind,
                source_timestamp = envelope.source_timestamp,
                "Source timestamp matches the previous import, skipping"
            );
            return Ok(ImportOutcome::Skipped {
                source_timestamp: envelope.source_timestamp,
            });
        }

        if let Some(run_tables) = &run_tables {
            if flush {
                let removed = self.tables.delete_records(&run_tables.import).await?;
                tracing::info!(
                    entity = %self.kind,
                    table = %run_tables.import,
                    removed,
                    "Removed existing entries"
                );
            }
        }

        tracing::info!(entity = %self.kind, "Importing...");

        let mut import_count: u64 = 0;
        let mut action_counts = ActionCounts::default();

        while cursor.advance()? {
            if !cursor.current_node_is_element_start() {
                continue;
            }

            let at_row = cursor.current_element_name() == Some(ROW_ELEMENT);
            let at_rowcount = cursor.current_element_name() == Some(ROWCOUNT_ELEMENT);

            if at_row {
                let row = cursor.expand_current()?;
                self.process_row(
                    &row,
                    import_count + 1,
                    run_tables.as_ref(),
                    now,
                    &mut action_counts,
                )
                .await?;
                import_count += 1;
            } else if at_rowcount {
                let text = cursor.read_text()?;
                envelope.declare_row_count(&text);
            }
        }

        if spec.verifies_row_counts {
            verify_row_count(import_count, envelope.declared_row_count)?;
            check_drift(import_count, previous, self.sync.import_count_threshold)?;
        }

        let mut builder = ImportMetadataBuilder::new(envelope.source_file, envelope.source_timestamp)
            .importcount(import_count)
            .rowcount(envelope.declared_row_count)
            .importedtime(Utc::now().timestamp());
        if spec.dispatches_actions {
            builder = builder.action_counts(action_counts);
        }
        let metadata = builder.build();

        match &run_tables {
            Some(run_tables) => {
                let replica = run_tables.replica;
                self.metadata.save(self.kind, replica, &metadata).await?;
                tracing::info!(
                    entity = %self.kind,
                    replica = %replica,
                    import_count,
                    "{import_count} rows imported."
                );
                Ok(ImportOutcome::Completed { replica, metadata })
            }
            None => {
                let json = metadata.to_json()?;
                tracing::info!(entity = %self.kind, import_count, "Dry run complete.");
                tracing::info!(entity = %self.kind, "Metadata: {json}");
                Ok(ImportOutcome::DryRun { metadata })
            }
        }
    }

    async fn process_row(
        &self,
        row: &Element,
        row_number: u64,
        run_tables: Option<&RunTables>,
        processed_at: i64,
        action_counts: &mut ActionCounts,
    ) -> Result<()> {
        let spec = self.kind.spec();
        let record = map_row(spec.rowmapping, row, row_number)?;

        let action = if spec.dispatches_actions || spec.keeps_log_table {
            Some(row_action(row, row_number)?)
        } else {
            None
        };

        let apply_insert = match (&action, spec.dispatches_actions) {
            (Some(action), true) => {
                if !action_counts.record(action) {
                    return Err(ImportError::UnknownAction(action.clone()).into());
                }
                action == ACTION_UPDATE
            }
            _ => true,
        };

        let Some(run_tables) = run_tables else {
            return Ok(());
        };

        if apply_insert {
            self.tables.insert_record(&run_tables.import, &record).await?;
        } else {
            // Deletions are counted and logged but not applied yet
            tracing::info!(
                entity = %self.kind,
                row = row_number,
                table = %run_tables.import,
                "Pending deletion recorded"
            );
        }

        if let (Some(log), Some(action)) = (&run_tables.log, action) {
            let log_record = record
                .with(LOG_ACTION_COLUMN, ColumnValue::Text(action))
                .with(LOG_PROCESSED_COLUMN, ColumnValue::Integer(processed_at));
            self.tables.insert_record(log, &log_record).await?;
        }

        Ok(())
    }

    async fn raise_stale_alert(&self, envelope: &ImportEnvelope, now: i64) {
        let age = now - envelope.source_timestamp;
        let subject = format!("Stale {} import file", self.kind);
        let body = format!(
            "The {} extract is older than the configured threshold of {} seconds.\n\n\
             File timestamp: {} ({} seconds ago)\n",
            self.kind.spec().filename,
            self.sync.stale_threshold_secs,
            envelope.raw_timestamp,
            age
        );

        tracing::warn!(
            entity = %self.kind,
            source_timestamp = envelope.source_timestamp,
            age_secs = age,
            threshold_secs = self.sync.stale_threshold_secs,
            "Import file is stale"
        );

        if let Err(e) = self.alerts.send_alert(&subject, &body).await {
            tracing::error!(entity = %self.kind, error = %e, "Failed to deliver stale file alert");
        }
    }
}

/// Joins the sync directory and a file name, collapsing repeated `/`
///
/// # Errors
///
/// Returns `ImportError::Configuration` if `base` is empty.
pub fn join_sync_path(base: &str, filename: &str) -> std::result::Result<String, ImportError> {
    if base.trim().is_empty() {
        return Err(ImportError::Configuration(
            "Sync file directory path is not set".to_string(),
        ));
    }

    let joined = format!("{base}/{filename}");
    let mut path = String::with_capacity(joined.len());
    for c in joined.chars() {
        if c == '/' && path.ends_with('/') {
            continue;
        }
        path.push(c);
    }
    Ok(path)
}
