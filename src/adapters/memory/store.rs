//! In-memory storage backend

use crate::adapters::database::traits::{SettingsStore, TableReader, TableWriter};
use crate::domain::{Record, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Table-level or settings write observed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Delete { table: String },
    SetSetting { name: String },
}

/// Mutex-guarded tables and settings kept in process memory
///
/// Backs the `memory` database target and the test suite. Row inserts are
/// counted; deletes and setting writes are also kept in a journal, which
/// grows per run rather than per row.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    settings: RwLock<HashMap<String, String>>,
    inserts: AtomicU64,
    journal: RwLock<Vec<WriteOp>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently held in `table`, in insertion order
    pub async fn records(&self, table: &str) -> Vec<Record> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Deletes and setting writes performed so far, in order
    pub async fn writes(&self) -> Vec<WriteOp> {
        self.journal.read().await.clone()
    }

    /// Row inserts performed so far
    pub fn insert_count(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    /// Number of writes of any kind performed so far
    pub async fn write_count(&self) -> usize {
        self.insert_count() as usize + self.journal.read().await.len()
    }

    /// Seeds a setting without recording it in the journal
    pub async fn seed_setting(&self, name: &str, value: &str) {
        self.settings
            .write()
            .await
            .insert(name.to_string(), value.to_string());
    }

    /// Seeds a table row without recording it in the journal
    pub async fn seed_record(&self, table: &str, record: Record) {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(record);
    }

    async fn record_write(&self, op: WriteOp) {
        self.journal.write().await.push(op);
    }
}

#[async_trait]
impl TableWriter for InMemoryStore {
    async fn insert_record(&self, table: &str, record: &Record) -> Result<()> {
        self.tables
            .write()
            .await
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        self.inserts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn delete_records(&self, table: &str) -> Result<u64> {
        let removed = self
            .tables
            .write()
            .await
            .remove(table)
            .map(|rows| rows.len() as u64)
            .unwrap_or(0);
        self.record_write(WriteOp::Delete {
            table: table.to_string(),
        })
        .await;
        Ok(removed)
    }
}

#[async_trait]
impl TableReader for InMemoryStore {
    async fn count_records(&self, table: &str) -> Result<u64> {
        Ok(self
            .tables
            .read()
            .await
            .get(table)
            .map(|rows| rows.len() as u64)
            .unwrap_or(0))
    }

    async fn find_latest_value(
        &self,
        table: &str,
        match_column: &str,
        needle: &str,
        value_column: &str,
    ) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(None);
        };

        let needle = needle.to_lowercase();
        Ok(rows
            .iter()
            .rev()
            .find(|record| {
                record
                    .get(match_column)
                    .is_some_and(|value| value.to_string().to_lowercase() == needle)
            })
            .and_then(|record| record.get(value_column))
            .map(|value| value.to_string()))
    }
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn get_setting(&self, name: &str) -> Result<Option<String>> {
        Ok(self.settings.read().await.get(name).cloned())
    }

    async fn set_setting(&self, name: &str, value: &str) -> Result<()> {
        self.settings
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        self.record_write(WriteOp::SetSetting {
            name: name.to_string(),
        })
        .await;
        Ok(())
    }
}
