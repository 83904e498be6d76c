//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use xmlsync::logging::init_logging;
//! use xmlsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(entity = "user", "Import started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a scheduled import
///
/// # Example
///
/// ```no_run
/// use xmlsync::log_import_start;
/// use xmlsync::domain::EntityKind;
///
/// log_import_start!(EntityKind::User, "userimport_b");
/// ```
#[macro_export]
macro_rules! log_import_start {
    ($entity:expr, $target:expr) => {
        tracing::info!(
            entity = %$entity,
            target = %$target,
            "Importing into: {}",
            $target
        );
    };
}

/// Log the completion of a scheduled import
///
/// # Example
///
/// ```no_run
/// use xmlsync::log_import_complete;
/// use xmlsync::domain::EntityKind;
/// use std::time::Duration;
///
/// log_import_complete!(EntityKind::Course, 42, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_import_complete {
    ($entity:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            entity = %$entity,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Import complete."
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use xmlsync::log_error_with_context;
/// use xmlsync::domain::XmlSyncError;
///
/// let error = XmlSyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
