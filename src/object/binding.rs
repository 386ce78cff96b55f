//! Bound objects and their subscription tables.

use super::subscription::{AttributeSubscription, ElementSubscription};
use super::visitor::DocumentVisitor;
use super::ObjectId;
use crate::access::value::Slot;
use crate::document::node::XmlElement;
use crate::document::tree::XmlDocument;
use crate::xmlpath::{Parser, XmlPath, XmlPathError};
use std::fmt;

/// An object whose state is mirrored to and from one XML element.
///
/// Element paths in subscriptions are relative to the object's own element.
/// An empty path, or the object's own element name, designates that element
/// itself.
///
/// Objects live in an [`ObjectArena`](super::ObjectArena), which links them
/// into parent/child trees and runs load and save over them.
pub struct XmlObject {
    element_name: String,
    filename: String,
    pub(crate) document: Option<XmlDocument>,
    pub(crate) elements: Vec<ElementSubscription>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) visitor: Option<Box<dyn DocumentVisitor>>,
}

impl XmlObject {
    /// Creates an object bound to elements named `element_name`.
    ///
    /// An empty name makes the object accept any element and share its
    /// parent's element when added as a child.
    pub fn new(element_name: impl Into<String>) -> Self {
        Self {
            element_name: element_name.into(),
            filename: String::new(),
            document: None,
            elements: Vec::new(),
            children: Vec::new(),
            visitor: None,
        }
    }

    /// Creates an object with load and save hooks.
    pub fn with_visitor<V>(element_name: impl Into<String>, visitor: V) -> Self
    where
        V: DocumentVisitor + 'static,
    {
        let mut object = Self::new(element_name);
        object.set_visitor(visitor);
        object
    }

    pub fn set_visitor<V>(&mut self, visitor: V)
    where
        V: DocumentVisitor + 'static,
    {
        self.visitor = Some(Box::new(visitor));
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn set_element_name(&mut self, name: impl Into<String>) {
        self.element_name = name.into();
    }

    /// The file last loaded from or saved to, empty if none.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = filename.into();
    }

    /// Handles of the child objects, in traversal order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    // ------------------------------------------------------------------------
    // Owned document
    // ------------------------------------------------------------------------

    pub fn is_document_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&XmlDocument> {
        self.document.as_ref()
    }

    pub fn document_mut(&mut self) -> Option<&mut XmlDocument> {
        self.document.as_mut()
    }

    /// Root element of the owned document, if one is open.
    pub fn root_element(&self) -> Option<&XmlElement> {
        self.document.as_ref().map(XmlDocument::root)
    }

    /// Opens an empty document rooted at this object's element name.
    ///
    /// Does nothing if a document is already open. Returns false when the
    /// object has no element name to use as the root tag.
    pub fn init_document(&mut self, declaration: bool) -> bool {
        if self.document.is_some() {
            return true;
        }
        if self.element_name.is_empty() {
            tracing::warn!("xml: cannot create a document for an object without an element name");
            return false;
        }
        let mut document = XmlDocument::new(self.element_name.as_str());
        document.set_declaration(declaration);
        self.document = Some(document);
        true
    }

    /// Releases the owned document, if any. Subscriptions are kept.
    pub fn close(&mut self) {
        self.document = None;
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Binds the text of the element at `path` to a variable.
    ///
    /// An empty `path` binds the object's own element. Fails if the path is
    /// malformed or already has a text binding. An element previously
    /// subscribed only for its attributes gains the text binding.
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use xmlbind::object::XmlObject;
    ///
    /// let volume = Rc::new(Cell::new(0.5f32));
    /// let mut object = XmlObject::new("audio");
    ///
    /// assert!(object.subscribe_element("volume", &volume, false));
    /// assert!(!object.subscribe_element("volume", &volume, false));
    /// ```
    pub fn subscribe_element(&mut self, path: &str, slot: impl Into<Slot>, read_only: bool) -> bool {
        let Some(path) = self.subscription_path(path) else {
            return false;
        };

        match self.elements.iter().position(|e| e.path == path) {
            Some(position) if self.elements[position].slot.is_some() => {
                tracing::warn!(
                    "xml \"{}\": cannot add element \"{}\", element already exists",
                    self.element_name,
                    path
                );
                false
            }
            Some(position) => {
                let existing = &mut self.elements[position];
                existing.slot = Some(slot.into());
                existing.read_only = read_only;
                true
            }
            None => {
                self.elements
                    .push(ElementSubscription::new(path, Some(slot.into()), read_only));
                true
            }
        }
    }

    /// Removes the element subscription at `path` with all its attribute
    /// bindings.
    pub fn unsubscribe_element(&mut self, path: &str) -> bool {
        let Some(path) = self.subscription_path(path) else {
            return false;
        };
        match self.elements.iter().position(|e| e.path == path) {
            Some(position) => {
                self.elements.remove(position);
                true
            }
            None => {
                tracing::warn!(
                    "xml \"{}\": cannot remove element \"{}\", not found",
                    self.element_name,
                    path
                );
                false
            }
        }
    }

    /// Removes every element and attribute subscription.
    pub fn unsubscribe_all(&mut self) {
        self.elements.clear();
    }

    /// Binds attribute `name` of the element at `path` to a variable.
    ///
    /// An empty `path` means the object's own element. If the element is not
    /// subscribed yet it is subscribed without a text binding. Fails for an
    /// empty attribute name, a malformed path, or an attribute that is
    /// already bound on that element.
    pub fn subscribe_attribute(
        &mut self,
        path: &str,
        name: &str,
        slot: impl Into<Slot>,
        read_only: bool,
    ) -> bool {
        if name.is_empty() {
            tracing::warn!(
                "xml \"{}\": cannot add attribute to element \"{}\", attribute name is empty",
                self.element_name,
                path
            );
            return false;
        }
        let Some(path) = self.subscription_path(path) else {
            return false;
        };

        let position = match self.elements.iter().position(|e| e.path == path) {
            Some(position) => position,
            None => {
                self.elements
                    .push(ElementSubscription::new(path, None, read_only));
                self.elements.len() - 1
            }
        };

        let element = &mut self.elements[position];
        if element.attribute(name).is_some() {
            tracing::warn!(
                "xml \"{}\": cannot add attribute \"{}\" to element \"{}\", attribute already exists",
                self.element_name,
                name,
                element.path
            );
            return false;
        }
        element.attributes.push(AttributeSubscription {
            name: name.to_string(),
            slot: slot.into(),
            read_only,
        });
        true
    }

    /// Removes the binding of attribute `name` on the element at `path`.
    pub fn unsubscribe_attribute(&mut self, path: &str, name: &str) -> bool {
        let Some(path) = self.subscription_path(path) else {
            return false;
        };
        let element_name = self.element_name.clone();
        let Some(element) = self.elements.iter_mut().find(|e| e.path == path) else {
            return false;
        };
        match element.attributes.iter().position(|a| a.name == name) {
            Some(position) => {
                element.attributes.remove(position);
                true
            }
            None => {
                tracing::warn!(
                    "xml \"{}\": cannot remove attribute \"{}\", not found",
                    element_name,
                    name
                );
                false
            }
        }
    }

    /// True if the element at `path` is subscribed, with or without a text
    /// binding.
    pub fn is_element_subscribed(&self, path: &str) -> bool {
        self.subscription_path(path)
            .is_some_and(|path| self.elements.iter().any(|e| e.path == path))
    }

    /// True if attribute `name` of the element at `path` is bound.
    pub fn is_attribute_subscribed(&self, path: &str, name: &str) -> bool {
        self.subscription_path(path).is_some_and(|path| {
            self.elements
                .iter()
                .any(|e| e.path == path && e.attribute(name).is_some())
        })
    }

    /// Normalizes a subscription path; empty means the own element.
    fn subscription_path(&self, path: &str) -> Option<XmlPath> {
        let text = if path.is_empty() {
            self.element_name.as_str()
        } else {
            path
        };
        match Parser::parse(text) {
            Ok(path) => Some(path),
            Err(XmlPathError::NoElementName { .. }) => Some(XmlPath::default()),
            Err(err) => {
                tracing::warn!("xml \"{}\": cannot subscribe, {err}", self.element_name);
                None
            }
        }
    }
}

impl fmt::Debug for XmlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlObject")
            .field("element_name", &self.element_name)
            .field("filename", &self.filename)
            .field("document_loaded", &self.document.is_some())
            .field("elements", &self.elements)
            .field("children", &self.children)
            .field("has_visitor", &self.visitor.is_some())
            .finish()
    }
}
