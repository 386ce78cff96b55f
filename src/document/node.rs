//! XML node representation.
//!
//! This module provides the in-memory tree used throughout xmlbind. An
//! `XmlElement` carries its tag name, its attributes in document order and an
//! ordered list of child nodes. Child nodes are elements, text runs or
//! comments, mirroring what the parser keeps from a source document.
//!
//! # Example
//!
//! ```
//! use xmlbind::document::node::{XmlElement, XmlNode};
//!
//! let mut settings = XmlElement::new("settings");
//! settings.set_attribute("version", "2");
//!
//! let mut window = XmlElement::new("window");
//! window.set_text("main");
//! settings.push_child(XmlNode::Element(window));
//!
//! assert_eq!(settings.attribute("version"), Some("2"));
//! assert_eq!(settings.first_child_element("window").and_then(|w| w.text()), Some("main"));
//! ```

use indexmap::IndexMap;

/// A single node in the XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// A tagged element with attributes and children
    Element(XmlElement),
    /// Character data (already unescaped)
    Text(String),
    /// A comment, without the `<!--` `-->` delimiters
    Comment(String),
}

impl XmlNode {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the element mutably if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if this node is an element with the given tag name.
    pub fn is_element_named(&self, name: &str) -> bool {
        matches!(self, XmlNode::Element(e) if e.name == name)
    }
}

/// A tagged XML element.
///
/// Attribute values are stored as strings; typed interpretation lives in
/// [`crate::access`]. Attribute order is preserved so that saving a loaded
/// document does not reshuffle it.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub(crate) name: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element with the given tag name.
    ///
    /// # Example
    ///
    /// ```
    /// use xmlbind::document::node::XmlElement;
    ///
    /// let element = XmlElement::new("object");
    /// assert_eq!(element.name(), "object");
    /// assert!(element.children().is_empty());
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the element.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Returns the raw value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing the value in place if it already exists.
    ///
    /// # Arguments
    ///
    /// * `name` - Attribute name
    /// * `value` - Raw attribute value, stored unescaped
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute, keeping the order of the remaining ones.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the attribute was not present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Iterates over attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Returns the element text.
    ///
    /// Only a text node in first child position counts as the element's
    /// text, so `<a><b/>tail</a>` has no text.
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(XmlNode::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Sets the element text.
    ///
    /// Replaces a leading text node, or inserts one at the front when the
    /// element starts with something else.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.children.first_mut() {
            Some(XmlNode::Text(existing)) => *existing = text,
            _ => self.children.insert(0, XmlNode::Text(text)),
        }
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// Returns all child nodes.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Returns all child nodes mutably.
    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Appends a child node.
    pub fn push_child(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    /// Inserts a child node at a raw position in the children list,
    /// appending when `position` is past the end.
    pub fn insert_child(&mut self, position: usize, node: XmlNode) {
        let position = position.min(self.children.len());
        self.children.insert(position, node);
    }

    /// Appends a comment node.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(XmlNode::Comment(comment.into()));
    }

    /// Iterates over child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Iterates over child elements with the given tag name.
    pub fn child_elements_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements().filter(move |e| e.name == name)
    }

    /// Returns the first child element with the given tag name.
    ///
    /// The returned reference borrows only from `self`, so `name` may be a
    /// temporary.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlbind::document::node::{XmlElement, XmlNode};
    ///
    /// let mut root = XmlElement::new("root");
    /// root.push_child(XmlNode::Element(XmlElement::new("item")));
    /// let item = root.first_child_element(&String::from("item"));
    /// assert_eq!(item.map(XmlElement::name), Some("item"));
    /// ```
    pub fn first_child_element(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Returns the `index`-th child element with the given tag name.
    ///
    /// # Arguments
    ///
    /// * `name` - Tag name to match; text and comment nodes are skipped
    /// * `index` - Zero-based position among the same-named siblings
    ///
    /// # Returns
    ///
    /// The matching element, or `None` when fewer than `index + 1` children
    /// carry that name.
    pub fn child_element(&self, name: &str, index: usize) -> Option<&XmlElement> {
        self.child_elements().filter(|e| e.name == name).nth(index)
    }

    /// Mutable counterpart of [`XmlElement::child_element`].
    pub fn child_element_mut(&mut self, name: &str, index: usize) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .filter(|e| e.name == name)
            .nth(index)
    }

    /// Counts child elements with the given tag name.
    ///
    /// # Arguments
    ///
    /// * `name` - Tag name to count; an empty name counts every child element
    pub fn count_child_elements(&self, name: &str) -> usize {
        if name.is_empty() {
            self.child_elements().count()
        } else {
            self.child_elements().filter(|e| e.name == name).count()
        }
    }

    /// Position in the raw children list of the `index`-th element named `name`.
    pub(crate) fn position_of(&self, name: &str, index: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_element_named(name))
            .map(|(pos, _)| pos)
            .nth(index)
    }

    /// Returns the element at a raw children position produced by `position_of`.
    pub(crate) fn element_at_mut(&mut self, position: usize) -> &mut XmlElement {
        match &mut self.children[position] {
            XmlNode::Element(e) => e,
            _ => unreachable!("position_of only yields element positions"),
        }
    }
}
