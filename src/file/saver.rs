//! XML serialization and file saving.
//!
//! Documents are rendered with `quick_xml::Writer`, which takes care of
//! escaping text and attribute values. Files are written atomically (temp
//! file, then rename), optionally backed up first and gzip-compressed when
//! the target name ends in `.gz`.

use crate::config::Config;
use crate::document::node::{XmlElement, XmlNode};
use crate::document::tree::XmlDocument;
use crate::document::DocumentError;
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Serializes a document to XML text.
///
/// `indent_size` spaces are used per nesting level; 0 writes the whole
/// document without line breaks. Elements whose only content is text stay
/// on one line, e.g. `<volume>0.5</volume>`.
///
/// # Examples
///
/// ```
/// use xmlbind::document::tree::XmlDocument;
/// use xmlbind::file::saver::to_xml_string;
///
/// let mut doc = XmlDocument::new("settings");
/// doc.set_declaration(false);
/// doc.root_mut().set_attribute("version", "1");
///
/// assert_eq!(to_xml_string(&doc, 2).unwrap(), "<settings version=\"1\"/>\n");
/// ```
pub fn to_xml_string(doc: &XmlDocument, indent_size: usize) -> Result<String, DocumentError> {
    let mut writer = if indent_size == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent_size)
    };

    if doc.has_declaration() {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, doc.root())?;

    let mut text = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    text.push('\n');
    Ok(text)
}

/// Serializes a single element and its subtree, without a declaration.
pub fn element_to_xml_string(
    element: &XmlElement,
    indent_size: usize,
) -> Result<String, DocumentError> {
    let mut writer = if indent_size == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent_size)
    };
    write_element(&mut writer, element)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(element.name());
    for (name, value) in element.attributes() {
        start.push_attribute((name, value));
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            XmlNode::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Saves a document to a file.
///
/// The document is serialized with `config.indent_size`, then written
/// atomically: the text goes to a temporary file next to the target, which
/// is renamed over the target once complete. With `config.create_backup`
/// an existing target is first copied to `<name>.bak`. Targets ending in
/// `.gz` are gzip-compressed unless `config.compress_gz` is off.
///
/// # Examples
///
/// ```no_run
/// use xmlbind::config::Config;
/// use xmlbind::document::tree::XmlDocument;
/// use xmlbind::file::saver::save_xml_file;
///
/// let doc = XmlDocument::new("settings");
/// save_xml_file("settings.xml", &doc, &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the backup, the temp file write or the rename fails.
pub fn save_xml_file<P: AsRef<Path>>(path: P, doc: &XmlDocument, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let should_compress = config.compress_gz && path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let xml = to_xml_string(doc, config.indent_size).context("Failed to serialize document")?;
    write_file_atomic(path, xml.as_bytes(), should_compress)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_xml;

    #[test]
    fn test_text_stays_inline() {
        let mut doc = XmlDocument::new("root");
        doc.set_declaration(false);
        let mut value = XmlElement::new("value");
        value.set_text("42");
        doc.root_mut().push_child(XmlNode::Element(value));

        assert_eq!(
            to_xml_string(&doc, 2).unwrap(),
            "<root>\n  <value>42</value>\n</root>\n"
        );
    }

    #[test]
    fn test_declaration_written() {
        let doc = XmlDocument::new("root");
        let xml = to_xml_string(&doc, 0).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn test_escaping_survives_reparse() {
        let mut doc = XmlDocument::new("root");
        doc.root_mut().set_attribute("quote", "a \"b\" <c> & d");
        doc.root_mut().set_text("x < y && y > z");
        doc.root_mut().push_comment(" note ");

        let reparsed = parse_xml(&to_xml_string(&doc, 4).unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_element_to_xml_string_compact() {
        let mut element = XmlElement::new("a");
        element.push_child(XmlNode::Element(XmlElement::new("b")));
        assert_eq!(element_to_xml_string(&element, 0).unwrap(), "<a><b/></a>");
    }
}
