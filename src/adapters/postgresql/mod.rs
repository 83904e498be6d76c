//! PostgreSQL database integration
//!
//! This module provides integration with PostgreSQL for storing replica
//! tables, log tables and settings.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PostgreSQLAdapter, SETTINGS_TABLE};
pub use client::PostgreSQLClient;
pub use models::{checked_identifier, InsertStatement};
