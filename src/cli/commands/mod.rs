//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod activate;
pub mod import;
pub mod init;
pub mod status;
pub mod validate;
pub mod visibility;

use crate::domain::{ImportError, XmlSyncError};

/// Exit code for a successful or skipped run
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for imports rejected by format, data-quality or replica checks
pub const EXIT_IMPORT_REJECTED: i32 = 3;
/// Exit code for database connection failures
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for any other fatal error
pub const EXIT_FATAL: i32 = 5;

/// Maps an error onto the process exit code
pub fn exit_code_for(error: &XmlSyncError) -> i32 {
    match error {
        XmlSyncError::Configuration(_) | XmlSyncError::Import(ImportError::Configuration(_)) => {
            EXIT_CONFIG
        }
        e if e.is_import_rejection() => EXIT_IMPORT_REJECTED,
        XmlSyncError::Database(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
