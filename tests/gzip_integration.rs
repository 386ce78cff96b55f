use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use tempfile::TempDir;
use xmlbind::config::Config;
use xmlbind::document::tree::XmlDocument;
use xmlbind::file::loader::load_xml_file;
use xmlbind::file::saver::save_xml_file;

fn sample() -> XmlDocument {
    let mut doc = XmlDocument::new("archive");
    doc.root_mut().set_attribute("entries", "3");
    doc.root_mut().set_text("payload");
    doc
}

#[test]
fn test_gz_file_is_compressed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.xml.gz");

    save_xml_file(&path, &sample(), &Config::default()).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    let mut text = String::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.contains("<archive entries=\"3\">payload</archive>"));
}

#[test]
fn test_gz_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.xml.gz");
    let doc = sample();

    save_xml_file(&path, &doc, &Config::default()).unwrap();
    assert_eq!(load_xml_file(&path).unwrap(), doc);
}

#[test]
fn test_compression_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plain.xml.gz");
    let config = Config {
        compress_gz: false,
        ..Config::default()
    };

    save_xml_file(&path, &sample(), &config).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("<?xml"));
    assert_eq!(load_xml_file(&path).unwrap(), sample());
}

#[test]
fn test_corrupted_gz_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xml.gz");
    fs::write(&path, [0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad]).unwrap();
    assert!(load_xml_file(&path).is_err());
}
