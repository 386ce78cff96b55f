//! XML file loading.
//!
//! Files are read fully into memory and parsed into an [`XmlDocument`].
//! Gzip-compressed input is recognized by its magic bytes, so `.xml.gz`
//! files and compressed streams load the same way as plain text.

use crate::document::parser::parse_xml;
use crate::document::tree::XmlDocument;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads and parses an XML file from the filesystem.
///
/// # Examples
///
/// ```no_run
/// use xmlbind::file::loader::load_xml_file;
///
/// let doc = load_xml_file("settings.xml").unwrap();
/// println!("root element: {}", doc.root().name());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - The file is gzip-compressed but corrupted
/// - The contents are not UTF-8 or not well-formed XML
pub fn load_xml_file<P: AsRef<Path>>(path: P) -> Result<XmlDocument> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = decode_content(bytes)?;
    parse_xml(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Loads and parses an XML document from any reader, e.g. stdin.
pub fn load_xml_from_reader<R: Read>(mut reader: R) -> Result<XmlDocument> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read input")?;
    let content = decode_content(bytes)?;
    parse_xml(&content).context("Failed to parse XML input")
}

/// Turns raw file bytes into text, decompressing gzip data first.
fn decode_content(bytes: Vec<u8>) -> Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        return decompress_gzip_bytes(&bytes);
    }
    String::from_utf8(bytes).context("File is not valid UTF-8")
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not valid gzip format
/// - The decompressed content is not valid UTF-8
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}
