//! Core business logic for xmlsync.
//!
//! This module contains the import pipeline and the blue/green replica
//! lifecycle around it.
//!
//! # Modules
//!
//! - [`import`] - Importer, guardrails and the scheduled-task coordinator
//! - [`replica`] - Active/inactive replica selection
//! - [`state`] - Per-replica import metadata
//! - [`transform`] - Row mapping from XML rows to typed records
//! - [`visibility`] - Course visibility hook
//!
//! # Import Workflow
//!
//! The scheduled import for one entity:
//!
//! 1. **Load State**: Read the active replica's metadata
//! 2. **Open**: Stream the entity's extract file from the sync directory
//! 3. **Guard**: Alert on stale files, skip duplicate timestamps
//! 4. **Load**: Flush the inactive replica and insert every mapped row
//! 5. **Verify**: Check the row count and drift against the previous run
//! 6. **Checkpoint**: Save metadata under the loaded replica
//! 7. **Flip**: Make the loaded replica active
//!
//! # Example
//!
//! ```rust,no_run
//! use xmlsync::config::load_config;
//! use xmlsync::core::import::ImportCoordinator;
//! use xmlsync::domain::EntityKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("xmlsync.toml")?;
//! let coordinator = ImportCoordinator::new(&config).await?;
//!
//! let outcome = coordinator.run_task(EntityKind::User, true).await?;
//! println!("Live import: {}", outcome.is_live_import());
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod replica;
pub mod state;
pub mod transform;
pub mod visibility;
