//! Typed reads and writes of element text and attributes.
//!
//! Getters never fail: a missing element, missing text or attribute, or a
//! value that does not parse as the requested type logs a warning and yields
//! the supplied default. Setters take an optional element and do nothing
//! but warn when it is `None`, so lookups can be chained straight into them.
//!
//! # Example
//!
//! ```
//! use xmlbind::access::typed::*;
//! use xmlbind::document::parser::parse_xml;
//!
//! let mut doc = parse_xml(r#"<object name="obj"><bar>1.5</bar></object>"#).unwrap();
//! let root = doc.root_mut();
//!
//! assert_eq!(get_attr_string(Some(&*root), "name", ""), "obj");
//! assert_eq!(get_text_float(child(root, "bar", 0), 0.0), 1.5);
//! assert_eq!(get_text_int(child(root, "missing", 0), -1), -1);
//!
//! set_text_bool(obtain_child(Some(&mut *root), "flags/enabled", 0), true);
//! assert_eq!(get_text_bool(child(root, "flags/enabled", 0), false), true);
//! ```

use super::value::{Slot, XmlScalar};
use crate::document::node::{XmlElement, XmlNode};
use crate::xmlpath::{self, Parser, XmlPath, XmlPathError};
use std::fmt::Write;

// ----------------------------------------------------------------------------
// Generic helpers
// ----------------------------------------------------------------------------

/// Reads element text as `T`, falling back to `default`.
pub fn get_text_as<T: XmlScalar>(element: Option<&XmlElement>, default: T) -> T {
    let Some(element) = element else {
        tracing::warn!("xml: cannot get text {}, element is none", T::TYPE);
        return default;
    };
    let Some(text) = element.text() else {
        tracing::warn!(
            "xml: cannot get text {}, element \"{}\" has no text",
            T::TYPE,
            element.name()
        );
        return default;
    };
    match T::parse(text) {
        Some(value) => value,
        None => {
            tracing::warn!(
                "xml: cannot get text {ty}, text value is not of type {ty} in element \"{}\"",
                element.name(),
                ty = T::TYPE
            );
            default
        }
    }
}

/// Reads an attribute as `T`, falling back to `default`.
pub fn get_attr_as<T: XmlScalar>(element: Option<&XmlElement>, name: &str, default: T) -> T {
    let Some(element) = element else {
        tracing::warn!("xml: cannot get attribute {}, element is none", T::TYPE);
        return default;
    };
    let Some(raw) = element.attribute(name) else {
        tracing::warn!(
            "xml: cannot get attribute {}, attribute \"{}\" not found in element \"{}\"",
            T::TYPE,
            name,
            element.name()
        );
        return default;
    };
    match T::parse(raw) {
        Some(value) => value,
        None => {
            tracing::warn!(
                "xml: cannot get attribute {ty}, attribute \"{}\" is not of type {ty} in element \"{}\"",
                name,
                element.name(),
                ty = T::TYPE
            );
            default
        }
    }
}

/// Writes `value` as the element text in canonical form.
pub fn set_text_as<T: XmlScalar>(element: Option<&mut XmlElement>, value: T) {
    match element {
        Some(element) => element.set_text(value.format()),
        None => tracing::warn!("xml: cannot set text {}, element is none", T::TYPE),
    }
}

/// Writes `value` as an attribute in canonical form.
pub fn set_attr_as<T: XmlScalar>(element: Option<&mut XmlElement>, name: &str, value: T) {
    match element {
        Some(element) => element.set_attribute(name, value.format()),
        None => tracing::warn!("xml: cannot set attribute {}, element is none", T::TYPE),
    }
}

// ----------------------------------------------------------------------------
// Read
// ----------------------------------------------------------------------------

/// Reads element text as a boolean.
///
/// Accepts `true`/`false` (any case) and `1`/`0`.
///
/// # Arguments
///
/// * `element` - Element to read, usually the result of [`child`]
/// * `default` - Value returned when the element, its text, or a valid
///   boolean is missing
///
/// # Returns
///
/// The parsed value or `default`; a warning is logged for the fallback.
pub fn get_text_bool(element: Option<&XmlElement>, default: bool) -> bool {
    get_text_as(element, default)
}

/// Reads element text as an 8-bit unsigned integer, or `default` when it does not parse.
pub fn get_text_byte(element: Option<&XmlElement>, default: u8) -> u8 {
    get_text_as(element, default)
}

/// Reads element text as a 32-bit signed integer, or `default` when it does not parse.
pub fn get_text_int(element: Option<&XmlElement>, default: i32) -> i32 {
    get_text_as(element, default)
}

/// Reads element text as a 32-bit unsigned integer, or `default` when it does not parse.
pub fn get_text_uint(element: Option<&XmlElement>, default: u32) -> u32 {
    get_text_as(element, default)
}

/// Reads element text as a 32-bit float, or `default` when it does not parse.
pub fn get_text_float(element: Option<&XmlElement>, default: f32) -> f32 {
    get_text_as(element, default)
}

/// Reads element text as a 64-bit float.
///
/// # Examples
///
/// ```
/// use xmlbind::access::typed::get_text_double;
/// use xmlbind::document::node::XmlElement;
///
/// let mut e = XmlElement::new("ratio");
/// e.set_text("0.25");
/// assert_eq!(get_text_double(Some(&e), 1.0), 0.25);
/// assert_eq!(get_text_double(None, 1.0), 1.0);
/// ```
pub fn get_text_double(element: Option<&XmlElement>, default: f64) -> f64 {
    get_text_as(element, default)
}

/// Reads element text verbatim, or `default` when there is none.
pub fn get_text_string(element: Option<&XmlElement>, default: &str) -> String {
    get_text_as(element, default.to_string())
}

/// Reads an attribute as a boolean.
pub fn get_attr_bool(element: Option<&XmlElement>, name: &str, default: bool) -> bool {
    get_attr_as(element, name, default)
}

/// Reads an attribute as a byte; values above 255 fall back to `default`.
pub fn get_attr_byte(element: Option<&XmlElement>, name: &str, default: u8) -> u8 {
    get_attr_as(element, name, default)
}

/// Reads an attribute as a 32-bit signed integer.
///
/// # Arguments
///
/// * `element` - Element carrying the attribute
/// * `name` - Attribute name
/// * `default` - Fallback for a missing element, missing attribute or
///   out-of-range value
///
/// # Returns
///
/// The parsed value, or `default` with a logged warning.
pub fn get_attr_int(element: Option<&XmlElement>, name: &str, default: i32) -> i32 {
    get_attr_as(element, name, default)
}

/// Reads an attribute as a 32-bit unsigned integer.
pub fn get_attr_uint(element: Option<&XmlElement>, name: &str, default: u32) -> u32 {
    get_attr_as(element, name, default)
}

/// Reads an attribute as a 32-bit float.
pub fn get_attr_float(element: Option<&XmlElement>, name: &str, default: f32) -> f32 {
    get_attr_as(element, name, default)
}

/// Reads an attribute as a 64-bit float.
pub fn get_attr_double(element: Option<&XmlElement>, name: &str, default: f64) -> f64 {
    get_attr_as(element, name, default)
}

/// Reads an attribute verbatim.
pub fn get_attr_string(element: Option<&XmlElement>, name: &str, default: &str) -> String {
    get_attr_as(element, name, default.to_string())
}

/// Reads element text into a slot, dispatching on the slot's type.
///
/// The variable's current value serves as the default, so it is left
/// untouched when the text is missing or does not parse. Returns false only
/// when there is no element.
pub fn get_text(element: Option<&XmlElement>, slot: &Slot) -> bool {
    if element.is_none() {
        tracing::warn!("xml: cannot get text, element is none");
        return false;
    }
    match slot {
        Slot::Bool(v) => v.set(get_text_bool(element, v.get())),
        Slot::Byte(v) => v.set(get_text_byte(element, v.get())),
        Slot::Int(v) => v.set(get_text_int(element, v.get())),
        Slot::UInt(v) => v.set(get_text_uint(element, v.get())),
        Slot::Float(v) => v.set(get_text_float(element, v.get())),
        Slot::Double(v) => v.set(get_text_double(element, v.get())),
        Slot::String(v) => {
            let current = v.borrow().clone();
            *v.borrow_mut() = get_text_string(element, &current);
        }
    }
    true
}

/// Reads an attribute into a slot, dispatching on the slot's type.
///
/// Same defaulting rules as [`get_text`].
pub fn get_attr(element: Option<&XmlElement>, name: &str, slot: &Slot) -> bool {
    if element.is_none() {
        tracing::warn!("xml: cannot get attribute \"{}\", element is none", name);
        return false;
    }
    match slot {
        Slot::Bool(v) => v.set(get_attr_bool(element, name, v.get())),
        Slot::Byte(v) => v.set(get_attr_byte(element, name, v.get())),
        Slot::Int(v) => v.set(get_attr_int(element, name, v.get())),
        Slot::UInt(v) => v.set(get_attr_uint(element, name, v.get())),
        Slot::Float(v) => v.set(get_attr_float(element, name, v.get())),
        Slot::Double(v) => v.set(get_attr_double(element, name, v.get())),
        Slot::String(v) => {
            let current = v.borrow().clone();
            *v.borrow_mut() = get_attr_string(element, name, &current);
        }
    }
    true
}

/// Renders an element and its attributes, without descending to children.
///
/// ```text
/// Elem: window
///   Attr: width 640
///   Attr: height 480
/// ```
pub fn element_to_string(element: Option<&XmlElement>, indent: &str) -> String {
    let Some(element) = element else {
        return String::new();
    };
    let mut out = format!("Elem: {}\n", element.name());
    for (name, value) in element.attributes() {
        let _ = writeln!(out, "{indent}Attr: {name} {value}");
    }
    out
}

// ----------------------------------------------------------------------------
// Write
// ----------------------------------------------------------------------------

/// Writes `true` or `false` as the element text.
pub fn set_text_bool(element: Option<&mut XmlElement>, value: bool) {
    set_text_as(element, value)
}

/// Writes an 8-bit unsigned integer as the element text.
pub fn set_text_byte(element: Option<&mut XmlElement>, value: u8) {
    set_text_as(element, value)
}

/// Writes a 32-bit signed integer as the element text.
pub fn set_text_int(element: Option<&mut XmlElement>, value: i32) {
    set_text_as(element, value)
}

/// Writes a 32-bit unsigned integer as the element text.
pub fn set_text_uint(element: Option<&mut XmlElement>, value: u32) {
    set_text_as(element, value)
}

/// Writes a 32-bit float as the element text.
///
/// The shortest text that parses back to the same value is written, so
/// `0.1f32` becomes `0.1`.
pub fn set_text_float(element: Option<&mut XmlElement>, value: f32) {
    set_text_as(element, value)
}

/// Writes a 64-bit float as the element text.
pub fn set_text_double(element: Option<&mut XmlElement>, value: f64) {
    set_text_as(element, value)
}

/// Writes a string as the element text.
///
/// # Arguments
///
/// * `element` - Target element; `None` only logs a warning
/// * `value` - Text to store, escaped when the document is saved
pub fn set_text_string(element: Option<&mut XmlElement>, value: &str) {
    set_text_as(element, value.to_string())
}

/// Writes `true` or `false` to an attribute.
///
/// # Arguments
///
/// * `element` - Target element; `None` only logs a warning
/// * `name` - Attribute name, created or replaced in place
/// * `value` - Value to write
pub fn set_attr_bool(element: Option<&mut XmlElement>, name: &str, value: bool) {
    set_attr_as(element, name, value)
}

/// Writes an 8-bit unsigned integer to an attribute.
pub fn set_attr_byte(element: Option<&mut XmlElement>, name: &str, value: u8) {
    set_attr_as(element, name, value)
}

/// Writes a 32-bit signed integer to an attribute.
pub fn set_attr_int(element: Option<&mut XmlElement>, name: &str, value: i32) {
    set_attr_as(element, name, value)
}

/// Writes a 32-bit unsigned integer to an attribute.
pub fn set_attr_uint(element: Option<&mut XmlElement>, name: &str, value: u32) {
    set_attr_as(element, name, value)
}

/// Writes a 32-bit float to an attribute.
pub fn set_attr_float(element: Option<&mut XmlElement>, name: &str, value: f32) {
    set_attr_as(element, name, value)
}

/// Writes a 64-bit float to an attribute.
pub fn set_attr_double(element: Option<&mut XmlElement>, name: &str, value: f64) {
    set_attr_as(element, name, value)
}

/// Writes a string to an attribute, replacing any previous value.
pub fn set_attr_string(element: Option<&mut XmlElement>, name: &str, value: &str) {
    set_attr_as(element, name, value.to_string())
}

/// Writes a slot's value as the element text, dispatching on its type.
pub fn set_text(element: Option<&mut XmlElement>, slot: &Slot) {
    if element.is_none() {
        tracing::warn!("xml: cannot set text, element is none");
        return;
    }
    match slot {
        Slot::Bool(v) => set_text_bool(element, v.get()),
        Slot::Byte(v) => set_text_byte(element, v.get()),
        Slot::Int(v) => set_text_int(element, v.get()),
        Slot::UInt(v) => set_text_uint(element, v.get()),
        Slot::Float(v) => set_text_float(element, v.get()),
        Slot::Double(v) => set_text_double(element, v.get()),
        Slot::String(v) => set_text_string(element, &v.borrow()),
    }
}

/// Writes a slot's value as an attribute, dispatching on its type.
pub fn set_attr(element: Option<&mut XmlElement>, name: &str, slot: &Slot) {
    if element.is_none() {
        tracing::warn!("xml: cannot set attribute \"{}\", element is none", name);
        return;
    }
    match slot {
        Slot::Bool(v) => set_attr_bool(element, name, v.get()),
        Slot::Byte(v) => set_attr_byte(element, name, v.get()),
        Slot::Int(v) => set_attr_int(element, name, v.get()),
        Slot::UInt(v) => set_attr_uint(element, name, v.get()),
        Slot::Float(v) => set_attr_float(element, name, v.get()),
        Slot::Double(v) => set_attr_double(element, name, v.get()),
        Slot::String(v) => set_attr_string(element, name, &v.borrow()),
    }
}

/// Appends a comment as the last child of the element.
pub fn add_comment(element: Option<&mut XmlElement>, comment: &str) {
    match element {
        Some(element) => element.push_child(XmlNode::Comment(comment.to_string())),
        None => tracing::warn!("xml: cannot add comment, element is none"),
    }
}

// ----------------------------------------------------------------------------
// Path lookups
// ----------------------------------------------------------------------------

/// Parses a path argument.
///
/// A path with no names (`""`, `"/"`) parses to the empty path, which the
/// helpers below take to mean the element itself. An index before any name
/// is rejected with a warning.
fn path_arg(path: &str) -> Option<XmlPath> {
    match Parser::parse(path) {
        Ok(path) => Some(path),
        Err(XmlPathError::NoElementName { .. }) => Some(XmlPath::default()),
        Err(err) => {
            tracing::warn!("xml: cannot parse path, {err}");
            None
        }
    }
}

/// Finds a child element by path and index without creating anything.
///
/// If the last step of `path` carries an index as well, the greater of the
/// two is used.
pub fn child<'a>(element: &'a XmlElement, path: &str, index: usize) -> Option<&'a XmlElement> {
    let path = path_arg(path)?;
    if path.is_empty() {
        return Some(element);
    }
    xmlpath::resolve(element, &path, index)
}

/// Mutable counterpart of [`child`]; never creates elements.
pub fn child_mut<'a>(
    element: &'a mut XmlElement,
    path: &str,
    index: usize,
) -> Option<&'a mut XmlElement> {
    let path = path_arg(path)?;
    if path.is_empty() {
        return Some(element);
    }
    xmlpath::resolve_mut(element, &path, index)
}

/// Finds a child element by path and index, creating whatever is missing.
///
/// # Returns
///
/// The element at `path`, or `element` itself for a path with no names.
/// `None` when `element` is `None`, the path is malformed, or the index asks
/// for more than [`xmlpath::MAX_NEW_SIBLINGS`] new siblings.
pub fn obtain_child<'a>(
    element: Option<&'a mut XmlElement>,
    path: &str,
    index: usize,
) -> Option<&'a mut XmlElement> {
    let Some(element) = element else {
        tracing::warn!("xml: cannot obtain child, element is none");
        return None;
    };
    let path = path_arg(path)?;
    if path.is_empty() {
        return Some(element);
    }
    xmlpath::obtain(element, &path, index)
}

/// Inserts a new child element at `index` among its same-named siblings.
///
/// The element goes right after the sibling at `index - 1`, or after all
/// children when there is no such sibling. A path with no names has nothing
/// to create and returns `None`.
pub fn add_child<'a>(
    element: Option<&'a mut XmlElement>,
    path: &str,
    index: usize,
) -> Option<&'a mut XmlElement> {
    let Some(element) = element else {
        tracing::warn!("xml: cannot add child, element is none");
        return None;
    };
    xmlpath::add_at_index(element, &path_arg(path)?, index)
}

/// Counts the child elements of the element at `path`.
///
/// An empty `name` counts every child element, otherwise only those with
/// that tag name. Returns 0 when the element or path cannot be found.
pub fn num_children(element: Option<&XmlElement>, path: &str, name: &str) -> usize {
    let Some(element) = element else {
        tracing::warn!("xml: cannot get num children, element is none");
        return 0;
    };
    child(element, path, 0).map_or(0, |target| target.count_child_elements(name))
}
