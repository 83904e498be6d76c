//! Domain error types
//!
//! This module defines the error hierarchy for xmlsync.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main xmlsync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum XmlSyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Import pipeline errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Alert delivery errors
    #[error("Alert delivery error: {0}")]
    Alert(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl XmlSyncError {
    /// Returns true when the error rejected the import itself (bad file,
    /// data-quality guardrail, replica misconfiguration) rather than the
    /// surrounding infrastructure.
    pub fn is_import_rejection(&self) -> bool {
        matches!(self, XmlSyncError::Import(e) if !matches!(e, ImportError::Configuration(_)))
    }
}

/// Import pipeline errors
///
/// Every variant is fatal to the run: no metadata is persisted and the
/// active replica is left untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Required import configuration is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source file could not be opened
    #[error("Could not open file {path}: {reason}")]
    FileOpen { path: String, reason: String },

    /// Document structure or envelope is invalid
    #[error("Invalid document format: {0}")]
    Format(String),

    /// A mapped field is absent from a row
    #[error("Missing field {field} in row {row}")]
    MissingField { field: String, row: u64 },

    /// Row carries an action other than update or delete
    #[error("Unknown row action: {0}")]
    UnknownAction(String),

    /// Imported rows disagree with the declared row count
    #[error("Row count mismatch: imported {imported} rows, expected {}", describe_count(.expected))]
    RowCountMismatch { imported: u64, expected: Option<u64> },

    /// Row count moved too far from the previous import
    #[error("Import count changed by {delta}, exceeding the threshold of {max_delta}")]
    ImportDrift { delta: i64, max_delta: u64 },

    /// Replica name is not one of the entity's two slots
    #[error("Invalid replica table: {0}")]
    InvalidReplica(String),
}

fn describe_count(count: &Option<u64>) -> String {
    match count {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for XmlSyncError {
    fn from(err: std::io::Error) -> Self {
        XmlSyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for XmlSyncError {
    fn from(err: serde_json::Error) -> Self {
        XmlSyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for XmlSyncError {
    fn from(err: toml::de::Error) -> Self {
        XmlSyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
