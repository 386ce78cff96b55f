//! Path-addressed XML element access and declarative object binding.
//!
//! - [`document`]: the in-memory XML tree and its parser
//! - [`xmlpath`]: `name/index/name` element paths and resolving them
//! - [`access`]: typed reads and writes of element text and attributes
//! - [`object`]: objects whose variables are loaded from and saved to XML
//! - [`file`]: loading and saving documents on disk
//! - [`config`]: user settings for writing files

pub mod access;
pub mod config;
pub mod document;
pub mod file;
pub mod object;
pub mod xmlpath;
