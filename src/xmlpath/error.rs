//! Error types for element path parsing.

use thiserror::Error;

/// Errors that can occur while parsing an element path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlPathError {
    /// A numeric index appeared before any element name.
    #[error("found index {token} before element name in path: {path}")]
    IndexBeforeName { token: String, path: String },
    /// The path contains no element name at all.
    #[error("path contains no element name: {path:?}")]
    NoElementName { path: String },
}
