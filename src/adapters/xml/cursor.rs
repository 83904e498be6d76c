//! Forward-only cursor over an XML document
//!
//! The cursor walks start, text and end nodes one at a time. The importer
//! only ever materializes one `ROW` subtree at a time through
//! [`XmlCursor::expand_current`], so memory stays bounded regardless of
//! file size.

use super::element::{Element, XmlNode};
use crate::domain::ImportError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

type CursorResult<T> = std::result::Result<T, ImportError>;

/// The node the cursor is positioned on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorNode {
    /// Opening tag; `self_closing` is set for `<X/>`, which has no matching end
    ElementStart {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// Text or CDATA content, unmodified; whitespace-only runs are skipped
    Text(String),
    /// Closing tag
    ElementEnd { name: String },
}

/// Streaming cursor built on a `quick-xml` reader
pub struct XmlCursor<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    current: Option<CursorNode>,
    depth: usize,
}

impl XmlCursor<BufReader<File>> {
    /// Opens a file for streaming
    ///
    /// # Errors
    ///
    /// Returns `ImportError::FileOpen` if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> CursorResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ImportError::FileOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> XmlCursor<R> {
    /// Wraps any buffered reader
    pub fn from_reader(inner: R) -> Self {
        let reader = Reader::from_reader(inner);
        Self {
            reader,
            buf: Vec::new(),
            current: None,
            depth: 0,
        }
    }

    /// Moves to the next element start, text or element end
    ///
    /// Returns `Ok(false)` once the document is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Format` for malformed or truncated documents.
    pub fn advance(&mut self) -> CursorResult<bool> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(ImportError::Format(format!(
                        "Malformed XML at byte {}: {e}",
                        self.reader.buffer_position()
                    )))
                }
            };

            let node = match event {
                Event::Start(e) => {
                    self.depth += 1;
                    CursorNode::ElementStart {
                        name: element_name(&e)?,
                        attributes: element_attributes(&e)?,
                        self_closing: false,
                    }
                }
                Event::Empty(e) => CursorNode::ElementStart {
                    name: element_name(&e)?,
                    attributes: element_attributes(&e)?,
                    self_closing: true,
                },
                Event::End(e) => {
                    self.depth = self.depth.saturating_sub(1);
                    CursorNode::ElementEnd {
                        name: utf8(e.name().as_ref())?,
                    }
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ImportError::Format(format!("Invalid text content: {e}")))?;
                    // Indentation between elements; other text is kept verbatim
                    if text.trim().is_empty() {
                        continue;
                    }
                    CursorNode::Text(text.into_owned())
                }
                Event::CData(c) => CursorNode::Text(utf8(&c)?),
                Event::Eof => {
                    self.current = None;
                    if self.depth > 0 {
                        return Err(ImportError::Format(format!(
                            "Unexpected end of document with {} unclosed element(s)",
                            self.depth
                        )));
                    }
                    return Ok(false);
                }
                // Declarations, comments, processing instructions, doctypes
                _ => continue,
            };

            self.current = Some(node);
            return Ok(true);
        }
    }

    /// The node the cursor is positioned on, if any
    pub fn current(&self) -> Option<&CursorNode> {
        self.current.as_ref()
    }

    /// Name of the current element start or end
    pub fn current_element_name(&self) -> Option<&str> {
        match &self.current {
            Some(CursorNode::ElementStart { name, .. }) | Some(CursorNode::ElementEnd { name }) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Whether the cursor is on an opening tag
    pub fn current_node_is_element_start(&self) -> bool {
        matches!(self.current, Some(CursorNode::ElementStart { .. }))
    }

    /// Attribute value on the current opening tag
    pub fn current_attribute(&self, key: &str) -> Option<&str> {
        match &self.current {
            Some(CursorNode::ElementStart { attributes, .. }) => attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Materializes the current element and all of its descendants
    ///
    /// The cursor is left on the element's end tag (or on the element itself
    /// when it is self-closing), so the next [`advance`](Self::advance)
    /// continues with its following sibling.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Format` if the cursor is not on an element
    /// start or the document ends inside the element.
    pub fn expand_current(&mut self) -> CursorResult<Element> {
        let root = match &self.current {
            Some(CursorNode::ElementStart {
                name, self_closing, ..
            }) => {
                let element = Element::new(name.clone());
                if *self_closing {
                    return Ok(element);
                }
                element
            }
            _ => {
                return Err(ImportError::Format(
                    "Cannot expand: cursor is not on an element start".to_string(),
                ))
            }
        };

        let mut stack = vec![root];
        loop {
            if !self.advance()? {
                return Err(ImportError::Format(
                    "Unexpected end of document inside element".to_string(),
                ));
            }

            match &self.current {
                Some(CursorNode::ElementStart {
                    name, self_closing, ..
                }) => {
                    let element = Element::new(name.clone());
                    if *self_closing {
                        if let Some(parent) = stack.last_mut() {
                            parent.push_child(XmlNode::Element(element));
                        }
                    } else {
                        stack.push(element);
                    }
                }
                Some(CursorNode::Text(text)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_child(XmlNode::Text(text.clone()));
                    }
                }
                Some(CursorNode::ElementEnd { .. }) => {
                    let finished = stack.pop().ok_or_else(|| {
                        ImportError::Format("Unbalanced element end".to_string())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(XmlNode::Element(finished)),
                        None => return Ok(finished),
                    }
                }
                None => {
                    return Err(ImportError::Format(
                        "Cursor lost position while expanding element".to_string(),
                    ))
                }
            }
        }
    }

    /// Text content of the current element
    ///
    /// # Errors
    ///
    /// Same as [`expand_current`](Self::expand_current).
    pub fn read_text(&mut self) -> CursorResult<String> {
        Ok(self.expand_current()?.text_content())
    }
}

fn utf8(bytes: &[u8]) -> CursorResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ImportError::Format(format!("Invalid UTF-8 in document: {e}")))
}

fn element_name(e: &BytesStart<'_>) -> CursorResult<String> {
    utf8(e.name().as_ref())
}

fn element_attributes(e: &BytesStart<'_>) -> CursorResult<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| ImportError::Format(format!("Invalid attribute: {e}")))?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| ImportError::Format(format!("Invalid attribute value: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(attributes)
}
