//! Database abstraction traits
//!
//! This module defines the traits that storage adapters must implement
//! to back the import pipeline.

use crate::domain::{Record, Result};
use async_trait::async_trait;

/// Row-level writes against replica and log tables
///
/// Table and column names come from the static entity descriptions; adapters
/// still reject identifiers that are not plain SQL names.
#[async_trait]
pub trait TableWriter: Send + Sync {
    /// Insert one record into a table
    ///
    /// # Arguments
    ///
    /// * `table` - Target table name
    /// * `record` - Column values, in column order
    ///
    /// # Errors
    ///
    /// Returns an error if the table or a column is unknown or the write fails.
    async fn insert_record(&self, table: &str, record: &Record) -> Result<()>;

    /// Delete every row of a table
    ///
    /// # Returns
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn delete_records(&self, table: &str) -> Result<u64>;
}

/// Read access used by status reporting and the course visibility hook
#[async_trait]
pub trait TableReader: Send + Sync {
    /// Number of rows currently in a table
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn count_records(&self, table: &str) -> Result<u64>;

    /// Value of `value_column` from the most recently inserted row whose
    /// `match_column` equals `needle`, compared case-insensitively
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn find_latest_value(
        &self,
        table: &str,
        match_column: &str,
        needle: &str,
        value_column: &str,
    ) -> Result<Option<String>>;
}

/// Key/value settings persistence
///
/// Holds the active replica per entity and each replica's import metadata.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the setting has never been written.
    async fn get_setting(&self, name: &str) -> Result<Option<String>>;

    /// Write a setting, replacing any previous value
    ///
    /// This is a single write: readers observe either the old or the new value.
    async fn set_setting(&self, name: &str, value: &str) -> Result<()>;
}
