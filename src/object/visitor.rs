//! Load and save hooks for bound objects.

use crate::document::node::XmlElement;

/// Custom processing run after an object's subscriptions and children have
/// been handled.
///
/// Both hooks receive the object's own element. Their return value becomes
/// the result of the object's load or save. The defaults accept everything.
///
/// # Example
///
/// ```
/// use xmlbind::document::node::XmlElement;
/// use xmlbind::object::DocumentVisitor;
///
/// #[derive(Default)]
/// struct Version(Option<String>);
///
/// impl DocumentVisitor for Version {
///     fn on_load(&mut self, element: &XmlElement) -> bool {
///         self.0 = element.attribute("version").map(str::to_string);
///         self.0.is_some()
///     }
/// }
/// ```
pub trait DocumentVisitor {
    /// Called at the end of loading, with the element that was read.
    fn on_load(&mut self, _element: &XmlElement) -> bool {
        true
    }

    /// Called at the end of saving, with the element that was written.
    fn on_save(&mut self, _element: &mut XmlElement) -> bool {
        true
    }
}
