//! Whole-document container.
//!
//! `XmlDocument` owns the root element of a parsed or freshly created
//! document, plus the bit of prolog state that matters when writing it back.
//!
//! # Example
//!
//! ```
//! use xmlbind::document::tree::XmlDocument;
//!
//! let mut doc = XmlDocument::new("settings");
//! doc.root_mut().set_attribute("version", "1");
//!
//! assert_eq!(doc.root().name(), "settings");
//! assert!(doc.has_declaration());
//! ```

use super::node::XmlElement;

/// A complete XML document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: XmlElement,
    /// Whether an `<?xml ...?>` declaration is written in front of the root
    declaration: bool,
}

impl XmlDocument {
    /// Creates an empty document with the given root tag and the default
    /// `1.0`/`UTF-8` declaration.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: XmlElement::new(root_name),
            declaration: true,
        }
    }

    /// Wraps an existing root element.
    pub fn with_root(root: XmlElement, declaration: bool) -> Self {
        Self { root, declaration }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Consumes the document, returning its root element.
    pub fn into_root(self) -> XmlElement {
        self.root
    }

    pub fn has_declaration(&self) -> bool {
        self.declaration
    }

    pub fn set_declaration(&mut self, declaration: bool) {
        self.declaration = declaration;
    }
}
