//! PostgreSQL storage adapter
//!
//! Implements the table and settings traits on top of [`PostgreSQLClient`].

use super::client::PostgreSQLClient;
use super::models::{checked_identifier, InsertStatement};
use crate::adapters::database::traits::{SettingsStore, TableReader, TableWriter};
use crate::domain::{Record, Result};
use async_trait::async_trait;

/// Settings table shared by every entity
pub const SETTINGS_TABLE: &str = "xmlsync_config";

/// PostgreSQL adapter that implements the storage traits
pub struct PostgreSQLAdapter {
    client: PostgreSQLClient,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TableWriter for PostgreSQLAdapter {
    async fn insert_record(&self, table: &str, record: &Record) -> Result<()> {
        let statement = InsertStatement::for_record(table, record)?;

        tracing::trace!(table = %table, columns = record.len(), "Inserting record");

        self.client
            .execute(&statement.sql, &statement.param_refs())
            .await?;
        Ok(())
    }

    async fn delete_records(&self, table: &str) -> Result<u64> {
        let table = checked_identifier(table)?;
        let deleted = self
            .client
            .execute(&format!("DELETE FROM {}", table), &[])
            .await?;

        tracing::debug!(table = %table, deleted = deleted, "Flushed table");
        Ok(deleted)
    }
}

#[async_trait]
impl TableReader for PostgreSQLAdapter {
    async fn count_records(&self, table: &str) -> Result<u64> {
        let table = checked_identifier(table)?;
        let rows = self
            .client
            .query(&format!("SELECT COUNT(*) AS n FROM {}", table), &[])
            .await?;

        let count: i64 = rows.first().map(|row| row.get("n")).unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find_latest_value(
        &self,
        table: &str,
        match_column: &str,
        needle: &str,
        value_column: &str,
    ) -> Result<Option<String>> {
        let table = checked_identifier(table)?;
        let match_column = checked_identifier(match_column)?;
        let value_column = checked_identifier(value_column)?;

        // Newest row first; `id` is the table's insertion-ordered serial key
        let query = format!(
            "SELECT {value_column}::text AS value FROM {table} \
             WHERE LOWER({match_column}) = LOWER($1) \
             ORDER BY id DESC LIMIT 1"
        );

        let rows = self.client.query(&query, &[&needle]).await?;
        Ok(rows.first().and_then(|row| row.get::<_, Option<String>>("value")))
    }
}

#[async_trait]
impl SettingsStore for PostgreSQLAdapter {
    async fn get_setting(&self, name: &str) -> Result<Option<String>> {
        let query = format!("SELECT value FROM {} WHERE name = $1", SETTINGS_TABLE);
        let rows = self.client.query(&query, &[&name]).await?;
        Ok(rows.first().map(|row| row.get("value")))
    }

    async fn set_setting(&self, name: &str, value: &str) -> Result<()> {
        let upsert = format!(
            "INSERT INTO {} (name, value) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET value = EXCLUDED.value",
            SETTINGS_TABLE
        );

        self.client.execute(&upsert, &[&name, &value]).await?;

        tracing::debug!(setting = %name, "Setting saved to PostgreSQL");
        Ok(())
    }
}
