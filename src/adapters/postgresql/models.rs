//! SQL statement building for records
//!
//! Table and column names cannot be bound as parameters, so they are checked
//! against a plain-identifier pattern before being spliced into SQL. Values
//! are always bound.

use crate::domain::{ColumnValue, Record, Result, XmlSyncError};
use regex::Regex;
use std::sync::OnceLock;
use tokio_postgres::types::ToSql;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier pattern is valid")
    })
}

/// Returns `name` if it is a safe, unquoted SQL identifier
///
/// # Errors
///
/// Returns `XmlSyncError::Database` for anything else.
pub fn checked_identifier(name: &str) -> Result<&str> {
    if identifier_pattern().is_match(name) {
        Ok(name)
    } else {
        Err(XmlSyncError::Database(format!(
            "Refusing to use '{}' as a table or column name",
            name
        )))
    }
}

/// A parameterized `INSERT` for one record
pub struct InsertStatement {
    pub sql: String,
    pub params: Vec<Box<dyn ToSql + Sync + Send>>,
}

impl InsertStatement {
    /// Builds `INSERT INTO table (cols...) VALUES ($1, ...)`
    ///
    /// # Errors
    ///
    /// Returns an error if the record is empty or an identifier is unsafe.
    pub fn for_record(table: &str, record: &Record) -> Result<Self> {
        let table = checked_identifier(table)?;
        if record.is_empty() {
            return Err(XmlSyncError::Database(format!(
                "Cannot insert an empty record into {}",
                table
            )));
        }

        let mut columns = Vec::with_capacity(record.len());
        let mut placeholders = Vec::with_capacity(record.len());
        let mut params: Vec<Box<dyn ToSql + Sync + Send>> = Vec::with_capacity(record.len());

        for (index, (column, value)) in record.iter().enumerate() {
            columns.push(checked_identifier(column)?);
            placeholders.push(format!("${}", index + 1));
            let param: Box<dyn ToSql + Sync + Send> = match value {
                ColumnValue::Text(s) => Box::new(s.clone()),
                ColumnValue::Integer(i) => Box::new(*i),
            };
            params.push(param);
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        Ok(Self { sql, params })
    }

    /// Parameters borrowed in the form `tokio-postgres` expects
    pub fn param_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}
