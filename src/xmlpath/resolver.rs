//! Locating and creating elements by path.
//!
//! Three walks share the same step semantics: for each step, take the first
//! child element with the step's name and advance `index` same-named
//! siblings. They differ in what happens when something is missing:
//!
//! - [`resolve`] gives up and returns `None`; it never touches the tree.
//! - [`obtain`] appends whatever is missing and is idempotent for repeated
//!   calls.
//! - [`add_at_index`] obtains every step but the last, then always inserts a
//!   fresh element for the last step.
//!
//! For the final step the effective index is the greater of the step's own
//! index and the caller's `index` argument, which lets the path string carry
//! a baseline while the caller asks for "at least N".
//!
//! An empty path names no element. Malformed path strings parse to the empty
//! path, so every walk here returns `None` for it. Callers that want "the
//! element itself" check for that case before resolving.

use super::ast::{PathStep, XmlPath};
use crate::document::node::{XmlElement, XmlNode};
use tracing::warn;

/// Largest number of same-named siblings a single step may append.
pub const MAX_NEW_SIBLINGS: usize = 1024;

/// Effective sibling index for step `n` of a path with `len` steps.
fn step_index(step: &PathStep, n: usize, len: usize, index: usize) -> usize {
    if n + 1 == len {
        step.index.max(index)
    } else {
        step.index
    }
}

/// Finds the element at `path` below `root` without creating anything.
///
/// # Arguments
///
/// * `root` - Element the path is relative to
/// * `path` - Parsed path; the empty path never resolves
/// * `index` - Lower bound for the last step's sibling index
///
/// # Returns
///
/// The element, or `None` when the path is empty or any step is missing.
pub fn resolve<'a>(root: &'a XmlElement, path: &XmlPath, index: usize) -> Option<&'a XmlElement> {
    if path.is_empty() {
        return None;
    }
    let len = path.len();
    let mut current = root;
    for (n, step) in path.steps().iter().enumerate() {
        current = current.child_element(&step.name, step_index(step, n, len, index))?;
    }
    Some(current)
}

/// Mutable counterpart of [`resolve`]; still never creates nodes.
pub fn resolve_mut<'a>(
    root: &'a mut XmlElement,
    path: &XmlPath,
    index: usize,
) -> Option<&'a mut XmlElement> {
    if path.is_empty() {
        return None;
    }
    let len = path.len();
    let mut current = root;
    for (n, step) in path.steps().iter().enumerate() {
        current = current.child_element_mut(&step.name, step_index(step, n, len, index))?;
    }
    Some(current)
}

/// Finds the element at `path` below `root`, creating missing elements.
///
/// Missing same-named siblings are appended until the requested index
/// exists. A second call with the same arguments returns the same element
/// and leaves the tree unchanged.
///
/// # Returns
///
/// `None` for the empty path, or when a step asks for more than
/// [`MAX_NEW_SIBLINGS`] siblings past the ones that exist. Steps before
/// the refused one may already have been created.
pub fn obtain<'a>(
    root: &'a mut XmlElement,
    path: &XmlPath,
    index: usize,
) -> Option<&'a mut XmlElement> {
    if path.is_empty() {
        return None;
    }
    let len = path.len();
    let mut current = root;
    for (n, step) in path.steps().iter().enumerate() {
        current = obtain_child(current, &step.name, step_index(step, n, len, index))?;
    }
    Some(current)
}

/// Inserts a new element for the last step of `path`.
///
/// Intermediate steps use [`obtain`] semantics. The new element is placed
/// right after the same-named sibling at `slot - 1`, where `slot` is the
/// effective index of the last step. When that sibling does not exist,
/// including slot 0, the new element is appended after all children.
/// Existing elements are never reused.
///
/// # Returns
///
/// The new element, or `None` for the empty path or when an intermediate
/// step is refused by [`obtain`].
pub fn add_at_index<'a>(
    root: &'a mut XmlElement,
    path: &XmlPath,
    index: usize,
) -> Option<&'a mut XmlElement> {
    let (last, parents) = path.steps().split_last()?;

    let mut parent = root;
    for step in parents {
        parent = obtain_child(parent, &step.name, step.index)?;
    }

    let slot = last.index.max(index);
    let position = slot
        .checked_sub(1)
        .and_then(|previous| parent.position_of(&last.name, previous))
        .map(|pos| pos + 1)
        .unwrap_or(parent.children.len());

    parent.insert_child(position, XmlNode::Element(XmlElement::new(last.name.as_str())));
    Some(parent.element_at_mut(position))
}

/// Returns the `index`-th child element named `name`, appending new
/// same-named elements until it exists.
fn obtain_child<'a>(
    parent: &'a mut XmlElement,
    name: &str,
    index: usize,
) -> Option<&'a mut XmlElement> {
    let position = match parent.position_of(name, index) {
        Some(position) => position,
        None => {
            let existing = parent.count_child_elements(name);
            if index - existing >= MAX_NEW_SIBLINGS {
                warn!(
                    "Refusing to create {} <{}> elements (index {})",
                    index - existing + 1,
                    name,
                    index
                );
                return None;
            }
            for _ in existing..=index {
                parent.push_child(XmlNode::Element(XmlElement::new(name)));
            }
            parent.children.len() - 1
        }
    };
    Some(parent.element_at_mut(position))
}
