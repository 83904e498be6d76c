//! Configuration management for xmlsync.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! xmlsync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `XMLSYNC_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xmlsync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xmlsync.toml")?;
//!
//! println!("Sync path: {}", config.sync.sync_path);
//! println!("Stale after: {}s", config.sync.stale_threshold_secs);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run default
//! - [`SyncConfig`] - Extract directory and import guardrails
//! - [`PostgreSQLConfig`] - PostgreSQL connection pool
//! - [`AlertConfig`] - Stale-file alert delivery
//! - [`LoggingConfig`] - Log file output
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [sync]
//! sync_path = "/data/sync"
//! stale_threshold_secs = 86400
//! import_count_threshold = 1000
//!
//! [postgresql]
//! connection_string = "${XMLSYNC_PG_CONNECTION}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    AlertConfig, ApplicationConfig, DatabaseTarget, LoggingConfig, PostgreSQLConfig, SyncConfig,
    XmlSyncConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
