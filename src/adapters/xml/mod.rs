//! Streaming XML reader adapter
//!
//! Wraps `quick-xml` behind a small forward-only cursor so the import
//! pipeline never depends on the parser's event types directly.
//!
//! ```rust
//! use xmlsync::adapters::xml::XmlCursor;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = r#"<ROWSET timestamp="1700000000"><ROW><USERNAME>jdoe</USERNAME></ROW></ROWSET>"#;
//! let mut cursor = XmlCursor::from_reader(xml.as_bytes());
//!
//! while cursor.advance()? {
//!     if cursor.current_node_is_element_start() && cursor.current_element_name() == Some("ROW") {
//!         let row = cursor.expand_current()?;
//!         assert!(row.find_descendant("USERNAME").is_some());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod element;

pub use cursor::{CursorNode, XmlCursor};
pub use element::{Element, XmlNode};
