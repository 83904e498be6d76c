//! Integration tests for the import pipeline guardrails and row handling

mod common;

use common::*;
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;
use xmlsync::adapters::memory::{InMemoryStore, WriteOp};
use xmlsync::config::SyncConfig;
use xmlsync::core::import::ImportOutcome;
use xmlsync::core::state::PreviousRunState;
use xmlsync::domain::{ColumnValue, EntityKind, ImportError, XmlSyncError};

fn previous(count: u64, timestamp: i64) -> PreviousRunState {
    PreviousRunState {
        last_import_count: Some(count),
        last_source_timestamp: Some(timestamp),
    }
}

fn import_error(err: XmlSyncError) -> ImportError {
    match err {
        XmlSyncError::Import(e) => e,
        other => panic!("expected an import error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_user_import_with_matching_row_count() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 3, Some(3)));
    let store = Arc::new(InMemoryStore::new());

    let outcome = coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    let ImportOutcome::Completed { replica, metadata } = outcome else {
        panic!("expected a completed import");
    };
    assert_eq!(replica, "userimport_a");
    assert_eq!(metadata.import_count, 3);
    assert_eq!(metadata.row_count, Some(3));
    assert_eq!(metadata.source_file, "per_extract");
    assert!(metadata.action_counts.is_none());
    assert_eq!(store.records("xmlsync_userimport_a").await.len(), 3);
}

#[tokio::test]
async fn test_row_count_mismatch_rejects_import() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 4, Some(5)));
    let store = Arc::new(InMemoryStore::new());
    let coordinator = coordinator(sync_config(&dir), store.clone());

    let err = coordinator
        .importer(EntityKind::User)
        .import(Some("userimport_b"), true, &PreviousRunState::none())
        .await
        .unwrap_err();

    assert!(matches!(
        import_error(err),
        ImportError::RowCountMismatch {
            imported: 4,
            expected: Some(5)
        }
    ));
    assert!(coordinator
        .metadata()
        .load(EntityKind::User, "userimport_b")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_missing_rowcount_rejects_import() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::Enrolment, &enrol_xml(TS_1, 2, None));
    let store = Arc::new(InMemoryStore::new());

    let err = coordinator(sync_config(&dir), store)
        .importer(EntityKind::Enrolment)
        .import(Some("enrolimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap_err();

    assert!(matches!(
        import_error(err),
        ImportError::RowCountMismatch {
            imported: 2,
            expected: None
        }
    ));
}

#[tokio::test]
async fn test_course_import_ignores_missing_rowcount() {
    let dir = TempDir::new().unwrap();
    let xml = course_xml(TS_1, &[("U", "MATH101", "1")]).replace("<ROWCOUNT>1</ROWCOUNT>", "");
    write_extract(&dir, EntityKind::Course, &xml);
    let store = Arc::new(InMemoryStore::new());

    let outcome = coordinator(sync_config(&dir), store)
        .importer(EntityKind::Course)
        .import(Some("courseimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    assert_eq!(outcome.metadata().unwrap().row_count, None);
}

#[tokio::test]
async fn test_duplicate_timestamp_skips_without_writes() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::Enrolment, &enrol_xml(TS_1, 2, Some(2)));
    let store = Arc::new(InMemoryStore::new());

    let outcome = coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::Enrolment)
        .import(Some("enrolimport_b"), true, &previous(2, TS_1))
        .await
        .unwrap();

    assert_eq!(outcome, ImportOutcome::Skipped { source_timestamp: TS_1 });
    assert_eq!(store.write_count().await, 0);
}

#[test_case(89, false ; "shrank past threshold")]
#[test_case(90, true ; "shrank to threshold")]
#[test_case(91, true ; "shrank within threshold")]
#[test_case(110, true ; "grew to threshold")]
#[test_case(111, false ; "grew past threshold")]
#[tokio::test]
async fn test_import_count_drift(rows: usize, accepted: bool) {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_2, rows, Some(rows as u64)));
    let store = Arc::new(InMemoryStore::new());
    let sync = SyncConfig {
        import_count_threshold: 10,
        ..sync_config(&dir)
    };

    let result = coordinator(sync, store.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_b"), true, &previous(100, TS_1))
        .await;

    if accepted {
        assert_eq!(result.unwrap().metadata().unwrap().import_count, rows as u64);
    } else {
        match import_error(result.unwrap_err()) {
            ImportError::ImportDrift { delta, max_delta } => {
                assert_eq!(delta, rows as i64 - 100);
                assert_eq!(max_delta, 10);
            }
            other => panic!("expected drift rejection, got {other:?}"),
        }
        assert!(!store
            .writes()
            .await
            .iter()
            .any(|w| matches!(w, WriteOp::SetSetting { .. })));
    }
}

#[tokio::test]
async fn test_zero_threshold_disables_drift_check() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_2, 1, Some(1)));
    let store = Arc::new(InMemoryStore::new());

    let outcome = coordinator(sync_config(&dir), store)
        .importer(EntityKind::User)
        .import(Some("userimport_b"), true, &previous(1000, TS_1))
        .await
        .unwrap();

    assert!(outcome.is_live_import());
}

#[tokio::test]
async fn test_dt_columns_are_integers() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 1, Some(1)));
    let store = Arc::new(InMemoryStore::new());

    coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    let rows = store.records("xmlsync_userimport_a").await;
    let row = &rows[0];
    assert_eq!(row.get("activation_dt"), Some(&ColumnValue::Integer(1_700_000_000)));
    assert_eq!(row.get("deactivate_dt"), Some(&ColumnValue::Integer(0)));
    assert_eq!(row.get("archive_dt"), Some(&ColumnValue::Integer(0)));
    assert_eq!(row.get("purge_dt"), Some(&ColumnValue::Integer(42)));
    assert_eq!(row.get("username"), Some(&ColumnValue::from("user0")));
    assert_eq!(row.get("description"), Some(&ColumnValue::from("")));
}

#[tokio::test]
async fn test_course_delete_rows_are_logged_not_applied() {
    let dir = TempDir::new().unwrap();
    write_extract(
        &dir,
        EntityKind::Course,
        &course_xml(TS_1, &[("D", "HIST200", "0"), ("D", "ARTS100", "1")]),
    );
    let store = Arc::new(InMemoryStore::new());

    let outcome = coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::Course)
        .import(Some("courseimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    let counts = outcome.metadata().unwrap().action_counts.unwrap();
    assert_eq!((counts.deletes, counts.updates), (2, 0));
    assert!(store.records("xmlsync_courseimport_a").await.is_empty());

    let log = store.records("xmlsync_courseimport_a_log").await;
    assert_eq!(log.len(), 2);
    assert!(log
        .iter()
        .all(|row| row.get("rowaction") == Some(&ColumnValue::from("D"))));
}

#[tokio::test]
async fn test_enrolment_rows_are_inserted_and_logged() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::Enrolment, &enrol_xml(TS_1, 3, Some(3)));
    let store = Arc::new(InMemoryStore::new());

    coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::Enrolment)
        .import(Some("enrolimport_b"), true, &PreviousRunState::none())
        .await
        .unwrap();

    assert_eq!(store.records("xmlsync_enrolimport_b").await.len(), 3);
    let log = store.records("xmlsync_enrolimport_b_log").await;
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].get("rowaction"), Some(&ColumnValue::from("U")));
}

#[tokio::test]
async fn test_unknown_course_action_fails() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::Course, &course_xml(TS_1, &[("Z", "MATH101", "1")]));
    let store = Arc::new(InMemoryStore::new());

    let err = coordinator(sync_config(&dir), store)
        .importer(EntityKind::Course)
        .import(Some("courseimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap_err();

    assert!(matches!(import_error(err), ImportError::UnknownAction(a) if a == "Z"));
}

#[tokio::test]
async fn test_stale_file_raises_alert_and_continues() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 1, Some(1)));
    let store = Arc::new(InMemoryStore::new());
    let alerts = Arc::new(RecordingAlertSink::default());
    let sync = SyncConfig {
        stale_threshold_secs: 3600,
        ..sync_config(&dir)
    };

    let outcome = coordinator_with_alerts(sync, store, alerts.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    assert!(outcome.is_live_import());
    assert_eq!(alerts.subjects(), vec!["Stale user import file".to_string()]);
    let body = alerts.alerts.lock().unwrap()[0].1.clone();
    assert!(body.contains("moodle_per.xml"));
    assert!(body.contains("@1700000000"));
}

#[tokio::test]
async fn test_fresh_file_raises_no_alert() {
    let dir = TempDir::new().unwrap();
    let now = chrono::Utc::now().timestamp();
    write_extract(&dir, EntityKind::User, &user_xml(now, 1, Some(1)));
    let store = Arc::new(InMemoryStore::new());
    let alerts = Arc::new(RecordingAlertSink::default());
    let sync = SyncConfig {
        stale_threshold_secs: 3600,
        ..sync_config(&dir)
    };

    coordinator_with_alerts(sync, store, alerts.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    assert!(alerts.subjects().is_empty());
}

#[tokio::test]
async fn test_alert_failure_does_not_fail_import() {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, &user_xml(TS_1, 1, Some(1)));
    let store = Arc::new(InMemoryStore::new());
    let alerts = Arc::new(RecordingAlertSink::failing());
    let sync = SyncConfig {
        stale_threshold_secs: 60,
        ..sync_config(&dir)
    };

    let outcome = coordinator_with_alerts(sync, store, alerts.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap();

    assert!(outcome.is_live_import());
    assert_eq!(alerts.subjects().len(), 1);
}

#[test_case("<USERS timestamp=\"@1700000000\"></USERS>" ; "wrong root")]
#[test_case("<ROWSET sourcefile=\"per_extract\"></ROWSET>" ; "missing timestamp")]
#[test_case("<ROWSET timestamp=\"yesterday\"></ROWSET>" ; "bad timestamp")]
#[test_case("" ; "empty document")]
#[tokio::test]
async fn test_malformed_envelope_is_format_error(xml: &str) {
    let dir = TempDir::new().unwrap();
    write_extract(&dir, EntityKind::User, xml);
    let store = Arc::new(InMemoryStore::new());

    let err = coordinator(sync_config(&dir), store.clone())
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap_err();

    assert!(matches!(import_error(err), ImportError::Format(_)));
    assert_eq!(store.write_count().await, 0);
}

#[tokio::test]
async fn test_missing_field_names_field_and_row() {
    let dir = TempDir::new().unwrap();
    let xml = user_xml(TS_1, 2, Some(2)).replacen("<EMAIL>user1@example.com</EMAIL>", "", 1);
    write_extract(&dir, EntityKind::User, &xml);
    let store = Arc::new(InMemoryStore::new());

    let err = coordinator(sync_config(&dir), store)
        .importer(EntityKind::User)
        .import(Some("userimport_a"), true, &PreviousRunState::none())
        .await
        .unwrap_err();

    let ImportError::MissingField { field, row } = import_error(err) else {
        panic!("expected a missing field error");
    };
    assert_eq!(field, "EMAIL");
    assert_eq!(row, 2);
}
