// Import metadata tracking

pub mod manager;
pub mod metadata;

pub use manager::MetadataStore;
pub use metadata::{ActionCounts, ImportMetadata, ImportMetadataBuilder, PreviousRunState};
