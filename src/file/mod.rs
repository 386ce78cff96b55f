//! File I/O for XML documents.
//!
//! This module loads XML files (plain or gzip-compressed) into documents and
//! saves documents back with atomic writes and optional backups.

pub mod loader;
pub mod saver;

pub use loader::{load_xml_file, load_xml_from_reader};
pub use saver::{save_xml_file, to_xml_string};
