//! In-memory storage
//!
//! Implements every storage trait over process memory. Used by the `memory`
//! database target for throwaway validation runs and by the test suite.

pub mod store;

pub use store::{InMemoryStore, WriteOp};
