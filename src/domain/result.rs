//! Result type alias for xmlsync
//!
//! This module provides a convenient Result type alias that uses XmlSyncError
//! as the error type.

use super::errors::XmlSyncError;

/// Result type alias for xmlsync operations
///
/// # Examples
///
/// ```
/// use xmlsync::domain::result::Result;
/// use xmlsync::domain::errors::XmlSyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(XmlSyncError::Other("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, XmlSyncError>;
