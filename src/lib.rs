// XmlSync - XML extract loader
// Copyright (c) 2025 XmlSync Contributors
// Licensed under the MIT License

//! # xmlsync - XML extract loader
//!
//! xmlsync loads periodic XML extract files (courses, enrolments, users)
//! produced by a source-of-record system into relational tables behind a
//! blue/green replica scheme, so readers never see a partially loaded
//! dataset.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Streaming** extract files with a forward-only XML cursor
//! - **Mapping** rows onto typed records with per-entity field mappings
//! - **Guarding** imports with staleness, duplicate, row-count and drift checks
//! - **Flipping** the active replica only after a complete, verified import
//!
//! ## Architecture
//!
//! xmlsync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (import, replicas, metadata, row mapping)
//! - [`adapters`] - External integrations (XML, PostgreSQL, alerts)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xmlsync::config::load_config;
//! use xmlsync::core::import::ImportCoordinator;
//! use xmlsync::domain::EntityKind;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("xmlsync.toml")?;
//!     let coordinator = ImportCoordinator::new(&config).await?;
//!
//!     for kind in EntityKind::ALL {
//!         let outcome = coordinator.run_task(kind, true).await?;
//!         println!("{kind}: live import = {}", outcome.is_live_import());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Dry Runs
//!
//! An import without a target replica reads and validates the whole file
//! but writes nothing:
//!
//! ```rust,no_run
//! use xmlsync::core::import::{ImportCoordinator, ImportOutcome};
//! use xmlsync::domain::EntityKind;
//!
//! # async fn example(coordinator: &ImportCoordinator) -> Result<(), Box<dyn std::error::Error>> {
//! if let ImportOutcome::DryRun { metadata } = coordinator.dry_run(EntityKind::User).await? {
//!     println!("{}", metadata.to_json()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! xmlsync uses the [`domain::XmlSyncError`] type for all errors. Import
//! failures are [`domain::ImportError`]s; none of them save metadata or
//! change the active replica.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
