//! In-memory XML document model.
//!
//! This module owns the tree that every other layer of xmlbind walks:
//! [`node`] defines elements, text and comments, [`tree`] wraps a root
//! element into a document, and [`parser`] builds documents from text.

pub mod node;
pub mod parser;
pub mod tree;

pub use node::{XmlElement, XmlNode};
pub use parser::parse_xml;
pub use tree::XmlDocument;

use thiserror::Error;

/// Errors raised while parsing or serializing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed XML at byte {position}: {source}")]
    Malformed {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("document has no root element")]
    NoRoot,
    #[error("document has more than one root element, found <{0}> after the root")]
    MultipleRoots(String),
    #[error("unclosed element <{0}> at end of input")]
    Unclosed(String),
    #[error("text content outside the root element")]
    ContentOutsideRoot,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
