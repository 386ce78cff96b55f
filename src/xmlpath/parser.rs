//! Element path string parser.
//!
//! Paths are slash-separated tokens. A token that parses completely as a
//! non-negative integer sets the index of the most recent name step; any
//! other token starts a new step. Empty tokens are ignored, so leading,
//! trailing and doubled slashes are harmless.
//!
//! ```
//! use xmlbind::xmlpath::{parse_path, PathStep};
//!
//! let path = parse_path("foo/1/bar/2/baz/3");
//! assert_eq!(
//!     path.steps(),
//!     &[PathStep::new("foo", 1), PathStep::new("bar", 2), PathStep::new("baz", 3)]
//! );
//!
//! // an index before any name is an error, yielding an empty path
//! assert!(parse_path("1/foo/bar").is_empty());
//! ```

use super::ast::{PathStep, XmlPath};
use super::error::XmlPathError;
use std::str::FromStr;

/// Parser for element path strings.
pub struct Parser<'a> {
    input: &'a str,
    steps: Vec<PathStep>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given path string.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            steps: Vec::new(),
        }
    }

    /// Parses the path string, reporting malformed input as an error.
    pub fn parse(input: &'a str) -> Result<XmlPath, XmlPathError> {
        let mut parser = Parser::new(input);
        parser.parse_steps()?;
        if parser.steps.is_empty() {
            return Err(XmlPathError::NoElementName {
                path: input.to_string(),
            });
        }
        Ok(XmlPath::new(parser.steps))
    }

    fn parse_steps(&mut self) -> Result<(), XmlPathError> {
        for token in self.input.split('/').filter(|t| !t.is_empty()) {
            match token.parse::<usize>() {
                Ok(index) => self.set_index(token, index)?,
                Err(_) => self.steps.push(PathStep::new(token, 0)),
            }
        }
        Ok(())
    }

    /// Applies a numeric token to the most recent name step.
    fn set_index(&mut self, token: &str, index: usize) -> Result<(), XmlPathError> {
        match self.steps.last_mut() {
            Some(step) => {
                step.index = index;
                Ok(())
            }
            None => Err(XmlPathError::IndexBeforeName {
                token: token.to_string(),
                path: self.input.to_string(),
            }),
        }
    }
}

/// Parses a path string, returning an empty path on malformed input.
///
/// This never fails: an index before any element name logs a warning and
/// yields an empty path, which no resolving operation will accept.
pub fn parse_path(text: &str) -> XmlPath {
    match Parser::parse(text) {
        Ok(path) => path,
        Err(err @ XmlPathError::IndexBeforeName { .. }) => {
            tracing::warn!("xml: cannot parse path, {err}");
            XmlPath::default()
        }
        Err(XmlPathError::NoElementName { .. }) => XmlPath::default(),
    }
}

impl XmlPath {
    /// Parses a path string, reporting malformed input as an error.
    ///
    /// Unlike [`parse_path`], a string without any element name is an
    /// error too.
    pub fn parse_strict(text: &str) -> Result<XmlPath, XmlPathError> {
        Parser::parse(text)
    }
}

impl FromStr for XmlPath {
    type Err = XmlPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(text: &str) -> Vec<(String, usize)> {
        parse_path(text)
            .steps
            .into_iter()
            .map(|s| (s.name, s.index))
            .collect()
    }

    #[test]
    fn test_plain_names() {
        assert_eq!(
            steps("foo/bar/baz"),
            vec![
                ("foo".to_string(), 0),
                ("bar".to_string(), 0),
                ("baz".to_string(), 0)
            ]
        );
    }

    #[test]
    fn test_indexed_names() {
        assert_eq!(
            steps("foo/1/bar/2/baz/3"),
            vec![
                ("foo".to_string(), 1),
                ("bar".to_string(), 2),
                ("baz".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_index_before_name_is_error() {
        assert!(parse_path("1/foo/bar").is_empty());
        assert_eq!(
            "1/foo/bar".parse::<XmlPath>(),
            Err(XmlPathError::IndexBeforeName {
                token: "1".to_string(),
                path: "1/foo/bar".to_string()
            })
        );
    }

    #[test]
    fn test_consecutive_indices_last_wins() {
        assert_eq!(steps("foo/1/2"), vec![("foo".to_string(), 2)]);
    }

    #[test]
    fn test_empty_tokens_ignored() {
        assert_eq!(steps("/sub//element/"), steps("sub/element"));
        assert!(parse_path("").is_empty());
        assert!(parse_path("///").is_empty());
        assert!(matches!(
            Parser::parse(""),
            Err(XmlPathError::NoElementName { .. })
        ));
    }

    #[test]
    fn test_non_numeric_tokens_are_names() {
        assert_eq!(
            steps("a/-1/2b"),
            vec![("a".to_string(), 0), ("-1".to_string(), 0), ("2b".to_string(), 0)]
        );
    }
}
