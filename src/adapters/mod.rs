//! External system integrations for xmlsync.
//!
//! This module provides adapters for everything outside the import logic:
//!
//! - [`xml`] - Streaming XML reader over `quick-xml`
//! - [`database`] - Storage abstraction layer (trait-based)
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-memory implementation
//! - [`alert`] - Stale-file alert delivery (log, webhook)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the import
//! pipeline can run against PostgreSQL in production and the in-memory
//! store in tests.
//!
//! ```rust
//! use std::sync::Arc;
//! use xmlsync::adapters::database::StorageBackends;
//! use xmlsync::adapters::memory::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let backends = StorageBackends::from_shared(store.clone());
//! # let _ = backends;
//! ```

pub mod alert;
pub mod database;
pub mod memory;
pub mod postgresql;
pub mod xml;
