//! Result of one import run

use crate::core::state::ImportMetadata;

/// How an import run ended
///
/// Fatal conditions are returned as errors instead; an outcome always means
/// the run finished cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Rows were loaded into the target replica and metadata was saved
    Completed {
        replica: &'static str,
        metadata: ImportMetadata,
    },

    /// The file was read and validated without writing anything
    DryRun { metadata: ImportMetadata },

    /// The extract carries the same timestamp as the previous import
    Skipped { source_timestamp: i64 },
}

impl ImportOutcome {
    /// True only when a live import completed
    pub fn is_live_import(&self) -> bool {
        matches!(self, ImportOutcome::Completed { .. })
    }

    /// Metadata assembled by the run, if it got that far
    pub fn metadata(&self) -> Option<&ImportMetadata> {
        match self {
            ImportOutcome::Completed { metadata, .. } | ImportOutcome::DryRun { metadata } => {
                Some(metadata)
            }
            ImportOutcome::Skipped { .. } => None,
        }
    }
}
