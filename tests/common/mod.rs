//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use xmlsync::adapters::alert::{AlertSink, LogAlertSink};
use xmlsync::adapters::database::StorageBackends;
use xmlsync::adapters::memory::InMemoryStore;
use xmlsync::config::SyncConfig;
use xmlsync::core::import::ImportCoordinator;
use xmlsync::domain::{EntityKind, Result, XmlSyncError};

/// 2023-11-14T22:13:20Z
pub const TS_1: i64 = 1_700_000_000;
/// One day later
pub const TS_2: i64 = 1_700_086_400;

/// Sync settings that never flag a file as stale and disable drift
pub fn sync_config(dir: &TempDir) -> SyncConfig {
    SyncConfig {
        sync_path: dir.path().display().to_string(),
        stale_threshold_secs: u64::MAX,
        import_count_threshold: 0,
    }
}

pub fn coordinator(sync: SyncConfig, store: Arc<InMemoryStore>) -> ImportCoordinator {
    coordinator_with_alerts(sync, store, Arc::new(LogAlertSink))
}

pub fn coordinator_with_alerts(
    sync: SyncConfig,
    store: Arc<InMemoryStore>,
    alerts: Arc<dyn AlertSink + Send + Sync>,
) -> ImportCoordinator {
    ImportCoordinator::with_backends(sync, StorageBackends::from_shared(store), alerts)
}

/// Writes `contents` as `kind`'s extract file
pub fn write_extract(dir: &TempDir, kind: EntityKind, contents: &str) {
    fs::write(dir.path().join(kind.spec().filename), contents).unwrap();
}

fn rowset(timestamp: i64, sourcefile: &str, rows: &str, rowcount: Option<u64>) -> String {
    let rowcount = rowcount
        .map(|c| format!("  <ROWCOUNT>{c}</ROWCOUNT>\n"))
        .unwrap_or_default();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <ROWSET timestamp=\"@{timestamp}\" sourcefile=\"{sourcefile}\">\n{rows}{rowcount}</ROWSET>\n"
    )
}

/// Course extract with one row per `(action, idnumber, visibility)`
pub fn course_xml(timestamp: i64, rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(action, idnumber, visibility)| {
            format!(
                "  <ROW><ACTION>{action}</ACTION><COURSE_IDNUMBER>{idnumber}</COURSE_IDNUMBER>\
                 <COURSE_FULLNAME>Course {idnumber}</COURSE_FULLNAME>\
                 <COURSE_SHORTNAME>{idnumber}</COURSE_SHORTNAME><COURSE_TEMPLATE/>\
                 <COURSE_VISIBILITY>{visibility}</COURSE_VISIBILITY></ROW>\n"
            )
        })
        .collect();
    rowset(timestamp, "crs_extract", &body, Some(rows.len() as u64))
}

/// Enrolment extract with `count` rows and the given trailing `ROWCOUNT`
pub fn enrol_xml(timestamp: i64, count: usize, rowcount: Option<u64>) -> String {
    let body: String = (0..count)
        .map(|i| {
            format!(
                "  <ROW><ACTION>U</ACTION><COURSE_IDNUMBER>MATH101</COURSE_IDNUMBER>\
                 <USERNAME>student{i}</USERNAME><ROLE_SHORTNAME>student</ROLE_SHORTNAME>\
                 <USER_IDNUMBER>30{i:04}</USER_IDNUMBER><VISA_NSI/><ETHNIC_CODES>111</ETHNIC_CODES>\
                 <ETHNIC_DESCRIPTION>NZ European</ETHNIC_DESCRIPTION><RESIDENCY>NZ</RESIDENCY>\
                 <UNDER_25>Y</UNDER_25><MAORI>N</MAORI><PACIFIC>N</PACIFIC>\
                 <INTERNATIONAL>N</INTERNATIONAL></ROW>\n"
            )
        })
        .collect();
    rowset(timestamp, "enr_extract", &body, rowcount)
}

/// User extract with `count` rows and the given trailing `ROWCOUNT`
pub fn user_xml(timestamp: i64, count: usize, rowcount: Option<u64>) -> String {
    let body: String = (0..count)
        .map(|i| {
            format!(
                "  <ROW><USERNAME>user{i}</USERNAME><PASSWORD>x</PASSWORD>\
                 <EMAIL>user{i}@example.com</EMAIL><FIRSTNAME>First{i}</FIRSTNAME>\
                 <LASTNAME>Last{i}</LASTNAME><CITY>Wellington</CITY><COUNTRY>NZ</COUNTRY>\
                 <LANG>en</LANG><DESCRIPTION/><IDNUMBER>30{i:04}</IDNUMBER>\
                 <INSTITUTION>VUW</INSTITUTION><DEPARTMENT>Maths</DEPARTMENT><PHONE1/><PHONE2/>\
                 <MIDDLENAME/><ACTIVATION_DT>1700000000</ACTIVATION_DT><DEACTIVATE_DT>0</DEACTIVATE_DT>\
                 <ARCHIVE_DT/><PURGE_DT>  42days</PURGE_DT></ROW>\n"
            )
        })
        .collect();
    rowset(timestamp, "per_extract", &body, rowcount)
}

/// Alert sink that remembers every alert it is given
#[derive(Default)]
pub struct RecordingAlertSink {
    pub alerts: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingAlertSink {
    pub fn failing() -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn subjects(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .map(|(subject, _)| subject.clone())
            .collect()
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()> {
        self.alerts
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(XmlSyncError::Alert("webhook unreachable".to_string()));
        }
        Ok(())
    }
}
