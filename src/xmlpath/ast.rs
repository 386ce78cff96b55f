//! Path types for element addressing.

use std::fmt;

/// One step of an element path: a tag name and its position among
/// same-named siblings (0 for first).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub name: String,
    pub index: usize,
}

impl PathStep {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// An ordered sequence of steps locating an element relative to some node.
///
/// An empty path is what the lenient parser yields for malformed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct XmlPath {
    pub steps: Vec<PathStep>,
}

impl XmlPath {
    /// Creates a path from the given steps.
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns the final step, if any.
    pub fn last(&self) -> Option<&PathStep> {
        self.steps.last()
    }

    /// Returns true for a one-step, index-0 path naming `name`, i.e. a path
    /// that designates an element with that tag itself.
    pub fn is_single(&self, name: &str) -> bool {
        matches!(self.steps.as_slice(), [step] if step.index == 0 && step.name == name)
    }
}

/// Renders the canonical form, omitting zero indices: `foo/bar/2/baz`.
impl fmt::Display for XmlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, step) in self.steps.iter().enumerate() {
            if n > 0 {
                f.write_str("/")?;
            }
            f.write_str(&step.name)?;
            if step.index > 0 {
                write!(f, "/{}", step.index)?;
            }
        }
        Ok(())
    }
}
