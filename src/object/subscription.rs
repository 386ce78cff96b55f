//! Element and attribute subscriptions.
//!
//! A subscription ties an element path, relative to an object's own
//! element, to a caller variable. Loading copies document values into the
//! variables; saving copies variables back into the document, creating
//! elements as needed.

use crate::access::typed;
use crate::access::value::Slot;
use crate::document::node::XmlElement;
use crate::xmlpath::{self, XmlPath};

/// An attribute bound to a variable.
#[derive(Debug, Clone)]
pub(crate) struct AttributeSubscription {
    pub(crate) name: String,
    pub(crate) slot: Slot,
    pub(crate) read_only: bool,
}

/// An element bound to an optional text variable and any number of
/// attribute variables.
///
/// `slot` is `None` for elements subscribed only so their attributes can
/// be bound.
#[derive(Debug, Clone)]
pub(crate) struct ElementSubscription {
    pub(crate) path: XmlPath,
    pub(crate) slot: Option<Slot>,
    pub(crate) read_only: bool,
    pub(crate) attributes: Vec<AttributeSubscription>,
}

impl ElementSubscription {
    pub(crate) fn new(path: XmlPath, slot: Option<Slot>, read_only: bool) -> Self {
        Self {
            path,
            slot,
            read_only,
            attributes: Vec::new(),
        }
    }

    pub(crate) fn attribute(&self, name: &str) -> Option<&AttributeSubscription> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// True when the path designates `node` itself rather than a child.
    fn targets(&self, node: &XmlElement) -> bool {
        self.path.is_empty() || self.path.is_single(node.name())
    }

    /// Copies values from the element at this subscription's path into the
    /// bound variables. A missing element leaves every variable untouched.
    pub(crate) fn load(&self, node: &XmlElement) {
        let target = if self.targets(node) {
            Some(node)
        } else {
            xmlpath::resolve(node, &self.path, 0)
        };
        let Some(target) = target else {
            tracing::debug!(path = %self.path, "xml: subscribed element not found, skipping");
            return;
        };

        if let Some(slot) = &self.slot {
            typed::get_text(Some(target), slot);
        }
        for attribute in &self.attributes {
            typed::get_attr(Some(target), &attribute.name, &attribute.slot);
        }
    }

    /// Writes the bound variables into the element at this subscription's
    /// path, creating it if needed. Read-only bindings are skipped.
    pub(crate) fn save(&self, node: &mut XmlElement) {
        let target = if self.targets(node) {
            Some(node)
        } else {
            xmlpath::obtain(node, &self.path, 0)
        };
        let Some(target) = target else {
            tracing::warn!(path = %self.path, "xml: cannot create subscribed element, skipping");
            return;
        };

        if let Some(slot) = self.slot.as_ref().filter(|_| !self.read_only) {
            typed::set_text(Some(&mut *target), slot);
        }
        for attribute in self.attributes.iter().filter(|a| !a.read_only) {
            typed::set_attr(Some(&mut *target), &attribute.name, &attribute.slot);
        }
    }
}
