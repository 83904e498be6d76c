//! Course visibility hook
//!
//! Course provisioning asks for a course's visibility by its idnumber. The
//! answer comes from the active course replica, so it always reflects the
//! last complete course import.

use crate::adapters::database::traits::TableReader;
use crate::core::replica::ReplicaManager;
use crate::domain::entity::replica_table;
use crate::domain::{EntityKind, Result};
use async_trait::async_trait;
use std::sync::Arc;

const IDNUMBER_COLUMN: &str = "course_idnumber";
const VISIBILITY_COLUMN: &str = "course_visibility";

/// Looks up a course's imported visibility flag
#[async_trait]
pub trait CourseVisibilityLookup: Send + Sync {
    /// Visibility of the course whose idnumber matches, ignoring case
    ///
    /// Returns `Ok(None)` when no imported course matches. When several rows
    /// match, the most recently inserted one wins.
    async fn lookup_visibility(&self, course_idnumber: &str) -> Result<Option<String>>;
}

/// Visibility lookup against the active course replica table
#[derive(Clone)]
pub struct ReplicaVisibilityLookup {
    replicas: ReplicaManager,
    reader: Arc<dyn TableReader + Send + Sync>,
}

impl ReplicaVisibilityLookup {
    pub fn new(replicas: ReplicaManager, reader: Arc<dyn TableReader + Send + Sync>) -> Self {
        Self { replicas, reader }
    }
}

#[async_trait]
impl CourseVisibilityLookup for ReplicaVisibilityLookup {
    async fn lookup_visibility(&self, course_idnumber: &str) -> Result<Option<String>> {
        let active = self.replicas.active_replica(EntityKind::Course).await?;
        let table = replica_table(active);

        let visibility = self
            .reader
            .find_latest_value(&table, IDNUMBER_COLUMN, course_idnumber, VISIBILITY_COLUMN)
            .await?;

        tracing::debug!(
            course_idnumber = %course_idnumber,
            table = %table,
            found = visibility.is_some(),
            "Course visibility lookup"
        );
        Ok(visibility)
    }
}
