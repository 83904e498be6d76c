//! Database abstraction layer
//!
//! This module provides a trait-based abstraction for storage operations,
//! allowing xmlsync to work with different backends (PostgreSQL, in-memory).

pub mod factory;
pub mod traits;

pub use factory::{create_storage, StorageBackends};
pub use traits::{SettingsStore, TableReader, TableWriter};
