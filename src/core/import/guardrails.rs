//! Data-quality checks applied around the row loop
//!
//! Staleness only raises an alert. The duplicate check skips the run. The
//! row-count and drift checks reject it before any metadata is saved.

use crate::core::state::PreviousRunState;
use crate::domain::ImportError;

/// Whether an extract stamped `source_timestamp` is older than `threshold_secs`
pub fn is_stale(now: i64, source_timestamp: i64, threshold_secs: u64) -> bool {
    let age = now.saturating_sub(source_timestamp);
    i128::from(age) > i128::from(threshold_secs)
}

/// Whether this extract was already imported by the previous run
pub fn is_duplicate(previous: &PreviousRunState, source_timestamp: i64) -> bool {
    previous.last_source_timestamp == Some(source_timestamp)
}

/// Checks the imported row count against the file's `ROWCOUNT`
///
/// # Errors
///
/// Returns `ImportError::RowCountMismatch` if they differ or the file
/// declared no count.
pub fn verify_row_count(imported: u64, declared: Option<u64>) -> Result<(), ImportError> {
    match declared {
        Some(expected) if expected == imported => Ok(()),
        expected => Err(ImportError::RowCountMismatch { imported, expected }),
    }
}

/// Checks how far the row count moved since the previous import
///
/// A `max_delta` of zero, or no remembered count, disables the check.
///
/// # Errors
///
/// Returns `ImportError::ImportDrift` when `|imported - previous|`
/// exceeds `max_delta`.
pub fn check_drift(
    imported: u64,
    previous: &PreviousRunState,
    max_delta: u64,
) -> Result<(), ImportError> {
    let Some(last) = previous.last_import_count else {
        return Ok(());
    };
    if max_delta == 0 {
        return Ok(());
    }

    let delta = i128::from(imported) - i128::from(last);
    if delta.unsigned_abs() > u128::from(max_delta) {
        return Err(ImportError::ImportDrift {
            delta: i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX }),
            max_delta,
        });
    }
    Ok(())
}
