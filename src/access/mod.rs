//! Typed access to element text and attributes.
//!
//! [`value`] defines the supported scalar types and the [`Slot`] handles
//! that bind caller variables; [`typed`] reads and writes those types on
//! elements and wraps the path resolver for string paths.

pub mod typed;
pub mod value;

pub use value::{Slot, ValueType, XmlScalar};
