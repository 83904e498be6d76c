//! Row mapping from expanded XML rows to typed records
//!
//! A mapping is an ordered list of `(xml_field, column)` pairs. Only the
//! listed fields are read; anything else in the row is ignored.

use crate::adapters::xml::Element;
use crate::domain::{ColumnValue, ImportError, Record};

/// Columns with this suffix hold Unix timestamps and are stored as integers
pub const INTEGER_COLUMN_SUFFIX: &str = "_dt";

/// Child element carrying a row's action code
pub const ACTION_FIELD: &str = "ACTION";

/// Maps one expanded row onto a record
///
/// For each `(xml_field, column)` pair, in order, the first descendant of
/// `row` named `xml_field` supplies the column value. Columns ending in
/// `_dt` are coerced with [`coerce_integer`].
///
/// # Arguments
///
/// * `mapping` - Ordered `(xml_field, column)` pairs
/// * `row` - The expanded `ROW` element
/// * `row_number` - 1-based position of the row, used in error reports
///
/// # Errors
///
/// Returns `ImportError::MissingField` if a mapped field is absent.
///
/// # Examples
///
/// ```
/// use xmlsync::adapters::xml::XmlCursor;
/// use xmlsync::core::transform::map_row;
/// use xmlsync::domain::ColumnValue;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let xml = "<ROW><USERNAME>jdoe</USERNAME><PURGE_DT>1700000000</PURGE_DT></ROW>";
/// let mut cursor = XmlCursor::from_reader(xml.as_bytes());
/// cursor.advance()?;
/// let row = cursor.expand_current()?;
///
/// let record = map_row(&[("USERNAME", "username"), ("PURGE_DT", "purge_dt")], &row, 1)?;
/// assert_eq!(record.get("purge_dt"), Some(&ColumnValue::Integer(1700000000)));
/// # Ok(())
/// # }
/// ```
pub fn map_row(
    mapping: &[(&str, &str)],
    row: &Element,
    row_number: u64,
) -> Result<Record, ImportError> {
    let mut record = Record::new();
    for (xml_field, column) in mapping {
        let text = field_text(row, xml_field, row_number)?;
        let value = if column.ends_with(INTEGER_COLUMN_SUFFIX) {
            ColumnValue::Integer(coerce_integer(&text))
        } else {
            ColumnValue::Text(text)
        };
        record.set(*column, value);
    }
    Ok(record)
}

/// Reads the row's `ACTION` code
///
/// # Errors
///
/// Returns `ImportError::MissingField` if the row has no `ACTION` element.
pub fn row_action(row: &Element, row_number: u64) -> Result<String, ImportError> {
    field_text(row, ACTION_FIELD, row_number)
}

fn field_text(row: &Element, field: &str, row_number: u64) -> Result<String, ImportError> {
    row.find_descendant(field)
        .map(Element::text_content)
        .ok_or_else(|| ImportError::MissingField {
            field: field.to_string(),
            row: row_number,
        })
}

/// Parses the leading integer of `text`
///
/// Leading whitespace is skipped, an optional sign is honoured and digits
/// are consumed up to the first non-digit. Text with no leading digits
/// yields `0`; values beyond the `i64` range saturate.
///
/// ```
/// use xmlsync::core::transform::coerce_integer;
///
/// assert_eq!(coerce_integer("1700000000"), 1_700_000_000);
/// assert_eq!(coerce_integer("  42abc"), 42);
/// assert_eq!(coerce_integer("-7"), -7);
/// assert_eq!(coerce_integer(""), 0);
/// assert_eq!(coerce_integer("n/a"), 0);
/// ```
pub fn coerce_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
