//! Detached XML element trees
//!
//! An [`Element`] is what [`XmlCursor::expand_current`](super::XmlCursor::expand_current)
//! hands back: one element and its descendants, owned and independent of
//! the underlying reader.

/// A child node of an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

/// An owned XML element and its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    children: Vec<XmlNode>,
}

impl Element {
    /// Creates an element with no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a child node
    pub fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Returns the first descendant element named `name`, in document order
    ///
    /// The element itself is not a candidate, only its descendants.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if let XmlNode::Element(element) = child {
                if element.name == name {
                    return Some(element);
                }
                if let Some(found) = element.find_descendant(name) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(element) => element.collect_text(out),
            }
        }
    }
}
