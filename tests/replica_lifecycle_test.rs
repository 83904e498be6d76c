//! Integration tests for the blue/green replica lifecycle
//!
//! Scheduled imports load the inactive replica and flip it active only after
//! a complete, verified import. Readers always see the active replica.

mod common;

use common::*;
use std::sync::Arc;
use tempfile::TempDir;
use xmlsync::adapters::memory::InMemoryStore;
use xmlsync::config::SyncConfig;
use xmlsync::core::import::ImportOutcome;
use xmlsync::core::visibility::CourseVisibilityLookup;
use xmlsync::domain::{EntityKind, ImportError, XmlSyncError};

#[tokio::test]
async fn test_successful_imports_alternate_replicas() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let coordinator = coordinator(sync_config(&dir), store.clone());

    write_extract(&dir, EntityKind::Enrolment, &enrol_xml(TS_1, 2, Some(2)));
    let first = coordinator.run_task(EntityKind::Enrolment, true).await.unwrap();
    assert!(matches!(first, ImportOutcome::Completed { replica: "enrolimport_b", .. }));
    assert_eq!(
        coordinator.replicas().active_replica(EntityKind::Enrolment).await.unwrap(),
        "enrolimport_b"
    );

    write_extract(&dir, EntityKind::Enrolment, &enrol_xml(TS_2, 3, Some(3)));
    let second = coordinator.run_task(EntityKind::Enrolment, true).await.unwrap();
    assert!(matches!(second, ImportOutcome::Completed { replica: "enrolimport_a", .. }));

    let status = coordinator.status(EntityKind::Enrolment).await.unwrap();
    assert_eq!(status.active, "enrolimport_a");
    assert_eq!(status.inactive, "enrolimport_b");
    assert_eq!(status.active_metadata.unwrap().import_count, 3);
    assert_eq!(status.inactive_metadata.unwrap().import_count, 2);
    assert_eq!((status.active_rows, status.inactive_rows), (3, 2));
    assert_eq!(store.records("xmlsync_enrolimport_a").await.len(), 3);
    assert_eq!(store.records("xmlsync_enrolimport_b").await.len(), 2);
}

#[tokio::test]
async fn test_rejected_import_keeps_active_replica() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let sync = SyncConfig {
        import_count_threshold: 10,
        ..sync_config(&dir)
    };
    let coordinator = coordinator(sync, store.clone());

    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 100, Some(100)));
    coordinator.run_task(EntityKind::User, true).await.unwrap();

    // Far fewer rows than last time: rejected by the drift check
    write_extract(&dir, EntityKind::User, &user_xml(TS_2, 50, Some(50)));
    let err = coordinator.run_task(EntityKind::User, true).await.unwrap_err();
    assert!(matches!(
        err,
        XmlSyncError::Import(ImportError::ImportDrift { delta: -50, max_delta: 10 })
    ));
    assert!(err.is_import_rejection());

    let status = coordinator.status(EntityKind::User).await.unwrap();
    assert_eq!(status.active, "userimport_b");
    let active = status.active_metadata.unwrap();
    assert_eq!(active.import_count, 100);
    assert_eq!(active.source_timestamp, TS_1);
    assert!(status.inactive_metadata.is_none());
    assert_eq!(store.records("xmlsync_userimport_b").await.len(), 100);
}

#[tokio::test]
async fn test_unchanged_extract_is_skipped() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let coordinator = coordinator(sync_config(&dir), store.clone());

    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 2, Some(2)));
    coordinator.run_task(EntityKind::User, true).await.unwrap();
    let writes = store.write_count().await;

    let outcome = coordinator.run_task(EntityKind::User, true).await.unwrap();
    assert_eq!(outcome, ImportOutcome::Skipped { source_timestamp: TS_1 });
    assert_eq!(store.write_count().await, writes);
    assert_eq!(
        coordinator.replicas().active_replica(EntityKind::User).await.unwrap(),
        "userimport_b"
    );
}

#[tokio::test]
async fn test_manual_rollback_to_previous_replica() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let coordinator = coordinator(sync_config(&dir), store);

    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 2, Some(2)));
    coordinator.run_task(EntityKind::User, true).await.unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_2, 2, Some(2)));
    coordinator.run_task(EntityKind::User, true).await.unwrap();
    assert_eq!(
        coordinator.replicas().active_replica(EntityKind::User).await.unwrap(),
        "userimport_a"
    );

    coordinator
        .replicas()
        .set_active(EntityKind::User, "userimport_b")
        .await
        .unwrap();
    let status = coordinator.status(EntityKind::User).await.unwrap();
    assert_eq!(status.active, "userimport_b");
    assert_eq!(status.active_metadata.unwrap().source_timestamp, TS_1);

    let err = coordinator
        .replicas()
        .set_active(EntityKind::User, "courseimport_a")
        .await
        .unwrap_err();
    assert!(matches!(err, XmlSyncError::Import(ImportError::InvalidReplica(_))));
}

#[tokio::test]
async fn test_visibility_follows_active_course_replica() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let coordinator = coordinator(sync_config(&dir), store);
    let lookup = coordinator.visibility_lookup();

    assert_eq!(lookup.lookup_visibility("MATH101").await.unwrap(), None);

    write_extract(
        &dir,
        EntityKind::Course,
        &course_xml(TS_1, &[("U", "MATH101", "1"), ("U", "HIST200", "0")]),
    );
    coordinator.run_task(EntityKind::Course, true).await.unwrap();
    assert_eq!(lookup.lookup_visibility("math101").await.unwrap(), Some("1".to_string()));
    assert_eq!(lookup.lookup_visibility("HIST200").await.unwrap(), Some("0".to_string()));

    write_extract(&dir, EntityKind::Course, &course_xml(TS_2, &[("U", "MATH101", "0")]));
    coordinator.run_task(EntityKind::Course, true).await.unwrap();
    assert_eq!(lookup.lookup_visibility("MATH101").await.unwrap(), Some("0".to_string()));
    assert_eq!(lookup.lookup_visibility("HIST200").await.unwrap(), None);

    // Rolling back makes the first import's answers visible again
    coordinator
        .replicas()
        .set_active(EntityKind::Course, "courseimport_b")
        .await
        .unwrap();
    assert_eq!(lookup.lookup_visibility("MATH101").await.unwrap(), Some("1".to_string()));
}
