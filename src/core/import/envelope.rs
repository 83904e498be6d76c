//! Extract envelope: the `ROWSET` header and the trailing `ROWCOUNT`

use crate::adapters::xml::XmlCursor;
use crate::core::transform::coerce_integer;
use crate::domain::ImportError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::BufRead;

/// Root element of every extract file
pub const ROWSET_ELEMENT: &str = "ROWSET";

/// One data row
pub const ROW_ELEMENT: &str = "ROW";

/// Trailing element holding the declared row total
pub const ROWCOUNT_ELEMENT: &str = "ROWCOUNT";

const TIMESTAMP_ATTRIBUTE: &str = "timestamp";
const SOURCEFILE_ATTRIBUTE: &str = "sourcefile";

/// Header and footer facts about one extract file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEnvelope {
    /// `sourcefile` attribute, empty when absent
    pub source_file: String,
    /// `timestamp` attribute as Unix seconds
    pub source_timestamp: i64,
    /// `timestamp` attribute as written in the file
    pub raw_timestamp: String,
    /// Value of `ROWCOUNT`, once the row loop has reached it
    pub declared_row_count: Option<u64>,
}

impl ImportEnvelope {
    /// Records the declared row count from a `ROWCOUNT` text value
    pub fn declare_row_count(&mut self, text: &str) {
        // Negative totals clamp to zero
        self.declared_row_count = Some(u64::try_from(coerce_integer(text)).unwrap_or(0));
    }
}

/// Reads the root element and its attributes
///
/// The cursor is left on the `ROWSET` start tag.
///
/// # Errors
///
/// Returns `ImportError::Format` if the document is empty, the root is not
/// `ROWSET`, or the `timestamp` attribute is missing or unparseable.
pub fn read_envelope<R: BufRead>(cursor: &mut XmlCursor<R>) -> Result<ImportEnvelope, ImportError> {
    if !cursor.advance()? {
        return Err(ImportError::Format("Document is empty".to_string()));
    }

    if !cursor.current_node_is_element_start()
        || cursor.current_element_name() != Some(ROWSET_ELEMENT)
    {
        return Err(ImportError::Format(format!(
            "Expected root element {ROWSET_ELEMENT}, found {}",
            cursor.current_element_name().unwrap_or("text")
        )));
    }

    let raw_timestamp = cursor
        .current_attribute(TIMESTAMP_ATTRIBUTE)
        .ok_or_else(|| {
            ImportError::Format(format!("{ROWSET_ELEMENT} has no {TIMESTAMP_ATTRIBUTE} attribute"))
        })?
        .to_string();
    let source_timestamp = parse_source_timestamp(&raw_timestamp)?;

    let source_file = cursor
        .current_attribute(SOURCEFILE_ATTRIBUTE)
        .unwrap_or_default()
        .to_string();

    Ok(ImportEnvelope {
        source_file,
        source_timestamp,
        raw_timestamp,
        declared_row_count: None,
    })
}

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f %z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses the `timestamp` attribute into Unix seconds
///
/// Accepts RFC 3339, RFC 2822, `@<seconds>`, and ISO-like date-times with
/// or without an offset. Values without an offset are read as UTC.
///
/// # Errors
///
/// Returns `ImportError::Format` if no format matches.
pub fn parse_source_timestamp(raw: &str) -> Result<i64, ImportError> {
    let value = raw.trim();

    if let Some(seconds) = value.strip_prefix('@') {
        if let Ok(seconds) = seconds.parse::<i64>() {
            return Ok(seconds);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Ok(dt.timestamp());
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt.timestamp());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc().timestamp());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp());
        }
    }

    Err(ImportError::Format(format!("Unparseable timestamp: '{raw}'")))
}
