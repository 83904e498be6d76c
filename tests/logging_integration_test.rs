//! Integration tests for logging functionality

use std::time::Duration;
use tempfile::TempDir;
use xmlsync::config::LoggingConfig;
use xmlsync::domain::{EntityKind, ImportError, XmlSyncError};
use xmlsync::logging::init_logging;
use xmlsync::{log_error_with_context, log_import_complete, log_import_start};

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "/var/log/xmlsync");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(matches!(result, Err(XmlSyncError::Configuration(_))));
}

// The only test in this binary that installs the global subscriber
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    assert!(log_path.is_dir());

    log_import_start!(EntityKind::User, "userimport_b");
    log_import_complete!(EntityKind::User, 42, Duration::from_millis(1500));
    let error: XmlSyncError = ImportError::RowCountMismatch {
        imported: 4,
        expected: Some(5),
    }
    .into();
    log_error_with_context!(&error, "User import rejected");

    // Dropping the guard flushes the non-blocking writer
    drop(guard);
    assert!(log_path.join("xmlsync.log").exists());
}
