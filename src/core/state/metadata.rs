//! Import metadata model
//!
//! One [`ImportMetadata`] document is stored per replica after every
//! successful live import. The next run reads the active replica's document
//! to decide whether the extract is a duplicate and how far the row count
//! has drifted.

use serde::{Deserialize, Serialize};

/// Per-action row tallies (course imports only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    /// Rows marked for deletion
    #[serde(rename = "D", default)]
    pub deletes: u64,

    /// Rows inserted or updated
    #[serde(rename = "U", default)]
    pub updates: u64,
}

impl ActionCounts {
    /// Tally one row action; returns false for codes other than `U`/`D`
    pub fn record(&mut self, action: &str) -> bool {
        match action {
            "U" => self.updates += 1,
            "D" => self.deletes += 1,
            _ => return false,
        }
        true
    }
}

/// Summary of one completed import
///
/// Fields serialize in alphabetical key order, which is the stored format.
///
/// # Examples
///
/// ```
/// use xmlsync::core::state::ImportMetadataBuilder;
///
/// let metadata = ImportMetadataBuilder::new("moodle_per.xml", 1_700_000_000)
///     .importcount(42)
///     .rowcount(Some(42))
///     .importedtime(1_700_000_100)
///     .build();
///
/// let json = serde_json::to_string(&metadata).unwrap();
/// assert!(json.starts_with(r#"{"importcount":42"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMetadata {
    /// Per-action tallies, present for course imports
    #[serde(rename = "actioncounts", default, skip_serializing_if = "Option::is_none")]
    pub action_counts: Option<ActionCounts>,

    /// Rows imported
    #[serde(rename = "importcount")]
    pub import_count: u64,

    /// Unix time the import finished
    #[serde(rename = "importedtime")]
    pub imported_time: i64,

    /// Row count declared by the file's trailing `ROWCOUNT`
    #[serde(rename = "rowcount", default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    /// `sourcefile` attribute of the root element
    #[serde(rename = "sourcefile", default)]
    pub source_file: String,

    /// `timestamp` attribute of the root element, as Unix seconds
    #[serde(rename = "sourcetimestamp")]
    pub source_timestamp: i64,
}

impl ImportMetadata {
    /// Serialize to the stored JSON form
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::domain::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the stored JSON form
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid metadata.
    pub fn from_json(json: &str) -> crate::domain::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for [`ImportMetadata`]
#[derive(Debug, Clone)]
pub struct ImportMetadataBuilder {
    metadata: ImportMetadata,
}

impl ImportMetadataBuilder {
    pub fn new(source_file: impl Into<String>, source_timestamp: i64) -> Self {
        Self {
            metadata: ImportMetadata {
                action_counts: None,
                import_count: 0,
                imported_time: 0,
                row_count: None,
                source_file: source_file.into(),
                source_timestamp,
            },
        }
    }

    pub fn action_counts(mut self, counts: ActionCounts) -> Self {
        self.metadata.action_counts = Some(counts);
        self
    }

    pub fn importcount(mut self, count: u64) -> Self {
        self.metadata.import_count = count;
        self
    }

    pub fn importedtime(mut self, time: i64) -> Self {
        self.metadata.imported_time = time;
        self
    }

    pub fn rowcount(mut self, count: Option<u64>) -> Self {
        self.metadata.row_count = count;
        self
    }

    pub fn build(self) -> ImportMetadata {
        self.metadata
    }
}

/// What the importer remembers about the previous successful run
///
/// Zero values are treated as "nothing remembered": a previous run that
/// imported no rows does not arm the drift check, and a zero timestamp never
/// matches as a duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviousRunState {
    pub last_import_count: Option<u64>,
    pub last_source_timestamp: Option<i64>,
}

impl PreviousRunState {
    /// No previous run
    pub fn none() -> Self {
        Self::default()
    }
}

impl From<&ImportMetadata> for PreviousRunState {
    fn from(metadata: &ImportMetadata) -> Self {
        Self {
            last_import_count: Some(metadata.import_count).filter(|&c| c != 0),
            last_source_timestamp: Some(metadata.source_timestamp).filter(|&t| t != 0),
        }
    }
}

impl From<Option<&ImportMetadata>> for PreviousRunState {
    fn from(metadata: Option<&ImportMetadata>) -> Self {
        metadata.map(PreviousRunState::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serializes_keys_alphabetically() {
        let mut counts = ActionCounts::default();
        counts.record("U");
        counts.record("U");
        counts.record("D");

        let metadata = ImportMetadataBuilder::new("crs_extract", 1_700_000_000)
            .action_counts(counts)
            .importcount(3)
            .importedtime(1_700_000_500)
            .rowcount(Some(3))
            .build();

        assert_eq!(
            metadata.to_json().unwrap(),
            r#"{"actioncounts":{"D":1,"U":2},"importcount":3,"importedtime":1700000500,"rowcount":3,"sourcefile":"crs_extract","sourcetimestamp":1700000000}"#
        );
    }

    #[test]
    fn test_metadata_without_action_counts() {
        let metadata = ImportMetadataBuilder::new("per_extract", 10)
            .importcount(5)
            .rowcount(Some(5))
            .build();
        let json = metadata.to_json().unwrap();
        assert!(!json.contains("actioncounts"));

        let parsed = ImportMetadata::from_json(&json).unwrap();
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_metadata_without_rowcount_omits_key() {
        let metadata = ImportMetadataBuilder::new("enr_extract", 1_700_000_000)
            .importcount(2)
            .importedtime(1_700_000_500)
            .rowcount(None)
            .build();
        let json = metadata.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"importcount":2,"importedtime":1700000500,"sourcefile":"enr_extract","sourcetimestamp":1700000000}"#
        );

        let parsed = ImportMetadata::from_json(&json).unwrap();
        assert_eq!(parsed.row_count, None);
        assert_eq!(parsed, metadata);
    }

    #[test]
    fn test_action_counts_rejects_unknown_codes() {
        let mut counts = ActionCounts::default();
        assert!(counts.record("U"));
        assert!(!counts.record("X"));
        assert!(!counts.record("u"));
        assert_eq!(counts, ActionCounts { deletes: 0, updates: 1 });
    }

    #[test]
    fn test_previous_run_state_treats_zero_as_absent() {
        let metadata = ImportMetadataBuilder::new("f", 0).importcount(0).build();
        assert_eq!(PreviousRunState::from(&metadata), PreviousRunState::none());

        let metadata = ImportMetadataBuilder::new("f", 1_700_000_000).importcount(100).build();
        let previous = PreviousRunState::from(&metadata);
        assert_eq!(previous.last_import_count, Some(100));
        assert_eq!(previous.last_source_timestamp, Some(1_700_000_000));

        assert_eq!(PreviousRunState::from(None), PreviousRunState::none());
    }
}
