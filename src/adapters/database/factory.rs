//! Storage backend factory
//!
//! This module provides factory functions to create storage backends based on configuration.

use crate::adapters::database::traits::{SettingsStore, TableReader, TableWriter};
use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, XmlSyncConfig};
use crate::domain::{Result, XmlSyncError};
use std::sync::Arc;

/// Trait objects for every storage concern, sharing one underlying backend
#[derive(Clone)]
pub struct StorageBackends {
    pub tables: Arc<dyn TableWriter + Send + Sync>,
    pub reader: Arc<dyn TableReader + Send + Sync>,
    pub settings: Arc<dyn SettingsStore + Send + Sync>,
}

impl StorageBackends {
    /// Builds the handles from one value implementing every storage trait
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: TableWriter + TableReader + SettingsStore + Send + Sync + 'static,
    {
        Self {
            tables: store.clone() as Arc<dyn TableWriter + Send + Sync>,
            reader: store.clone() as Arc<dyn TableReader + Send + Sync>,
            settings: store as Arc<dyn SettingsStore + Send + Sync>,
        }
    }
}

/// Create storage backends based on the configuration
///
/// For PostgreSQL the connection is tested and the schema bootstrapped
/// before the handles are returned, so a bad DSN fails here rather than
/// halfway through an import.
///
/// # Arguments
///
/// * `config` - The xmlsync configuration
///
/// # Errors
///
/// Returns an error if the backend cannot be created or reached
pub async fn create_storage(config: &XmlSyncConfig) -> Result<StorageBackends> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                XmlSyncError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL storage");
            let client = PostgreSQLClient::new(pg_config.clone())?;
            client.test_connection().await?;
            client.ensure_schema().await?;

            Ok(StorageBackends::from_shared(Arc::new(PostgreSQLAdapter::new(
                client,
            ))))
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory storage: nothing written will outlive this process");
            Ok(StorageBackends::from_shared(Arc::new(InMemoryStore::new())))
        }
    }
}
