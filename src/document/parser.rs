//! XML parsing into an `XmlDocument`.
//!
//! Tokenizing is delegated to `quick-xml`; this module only assembles the
//! event stream into the owned tree of [`super::node`].
//!
//! # Example
//!
//! ```
//! use xmlbind::document::parser::parse_xml;
//!
//! let doc = parse_xml(r#"<config><window width="640">main</window></config>"#).unwrap();
//! let window = doc.root().first_child_element("window").unwrap();
//! assert_eq!(window.attribute("width"), Some("640"));
//! assert_eq!(window.text(), Some("main"));
//! ```

use super::node::{XmlElement, XmlNode};
use super::tree::XmlDocument;
use super::DocumentError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parses an XML string into a document.
///
/// Whitespace-only text runs are dropped, CDATA sections become text and
/// comments are kept. Processing instructions and doctype declarations are
/// skipped.
///
/// # Errors
///
/// Returns an error if the input is not well-formed, has no root element,
/// has more than one root element, or ends with unclosed elements.
pub fn parse_xml(text: &str) -> Result<XmlDocument, DocumentError> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut declaration = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|source| DocumentError::Malformed {
                position: reader.buffer_position() as u64,
                source,
            })?;

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(DocumentError::NoRoot)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.push_child(XmlNode::Text(text.into_owned())),
                    None => return Err(DocumentError::ContentOutsideRoot),
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.push_child(XmlNode::Text(text)),
                    None => return Err(DocumentError::ContentOutsideRoot),
                }
            }
            Event::Comment(comment) => {
                // Prolog and epilog comments have no element to live in
                if let Some(parent) = stack.last_mut() {
                    parent.push_comment(String::from_utf8_lossy(&comment).into_owned());
                }
            }
            Event::Decl(_) => declaration = true,
            Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DocumentError::Unclosed(open.name));
    }

    let root = root.ok_or(DocumentError::NoRoot)?;
    Ok(XmlDocument::with_root(root, declaration))
}

/// Builds an element, with attributes, from a start or empty tag.
fn element_from_start(start: &BytesStart) -> Result<XmlElement, DocumentError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);

    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.set_attribute(key, value);
    }

    Ok(element)
}

/// Attaches a completed element to its parent, or makes it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(XmlNode::Element(element)),
        None if root.is_some() => return Err(DocumentError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}
