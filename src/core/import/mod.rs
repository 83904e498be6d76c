//! Extract import pipeline
//!
//! This module provides the import logic for xmlsync, including:
//! - Envelope parsing (`ROWSET` header, `ROWCOUNT` footer)
//! - Data-quality guardrails
//! - The generic importer and the scheduled-task coordinator

pub mod coordinator;
pub mod envelope;
pub mod guardrails;
pub mod importer;
pub mod outcome;

pub use coordinator::{ImportCoordinator, ReplicaStatus};
pub use envelope::{read_envelope, ImportEnvelope};
pub use importer::{join_sync_path, Importer};
pub use outcome::ImportOutcome;
