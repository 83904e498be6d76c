//! Domain models and types for xmlsync.
//!
//! This module contains the core domain types shared by every layer of the
//! import pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity descriptions** ([`EntityKind`], [`EntityImportSpec`])
//! - **Typed records** ([`Record`], [`ColumnValue`])
//! - **Error types** ([`XmlSyncError`], [`ImportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Entities
//!
//! Every imported entity has one static description naming its source file,
//! row mapping and replica slots:
//!
//! ```rust
//! use xmlsync::domain::EntityKind;
//!
//! let spec = EntityKind::User.spec();
//! assert_eq!(spec.filename, "moodle_per.xml");
//! assert_eq!(spec.replicas, ["userimport_a", "userimport_b"]);
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]. Import pipeline failures are
//! [`ImportError`]s and convert into [`XmlSyncError`] with the `?` operator:
//!
//! ```rust
//! use xmlsync::domain::{ImportError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(ImportError::Format("missing ROWSET".to_string()))?
//! }
//! assert!(example().is_err());
//! ```

pub mod entity;
pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use entity::{EntityImportSpec, EntityKind};
pub use errors::{ImportError, XmlSyncError};
pub use record::{ColumnValue, Record};
pub use result::Result;
