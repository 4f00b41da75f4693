//! Shared helpers for tests: app construction and document fixtures.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use axum_test::TestServer;
use lopdf::{Document, Object, Stream, dictionary};

use crate::Application;
use crate::config::{Config, UploadConfig};

/// Test configuration with uploads written to `temp_dir`, so tests can check nothing is left
/// behind.
pub fn create_test_config(temp_dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        uploads: UploadConfig {
            max_file_size: 1024 * 1024,
            temp_dir: Some(temp_dir.to_path_buf()),
        },
        ..Default::default()
    }
}

pub fn create_test_app(config: Config) -> TestServer {
    Application::new(config)
        .expect("Failed to create application")
        .into_test_server()
}

/// Files currently in `dir`.
pub fn temp_dir_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("Failed to read temp dir")
        .map(|entry| entry.expect("Failed to read temp dir entry").path())
        .collect()
}

/// Build a PDF with one page per entry, each showing that text in Helvetica.
///
/// An empty string produces a page with an empty content stream, like a scan with no text
/// layer.
pub fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escape_pdf_string(text)).into_bytes()
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("Failed to serialize test PDF");
    buf
}

fn escape_pdf_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Build a DOCX whose body has one single-run paragraph per entry.
pub fn make_test_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, escape_xml(text)))
        .collect();
    make_test_docx_from_body(&body)
}

/// Build a DOCX with `body` as the raw contents of `<w:body>`.
pub fn make_test_docx_from_body(body: &str) -> Vec<u8> {
    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:v="urn:schemas-microsoft-com:vml"><w:body>{body}</w:body></w:document>"#
    );

    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = zip::write::SimpleFileOptions::default();
        for (name, contents) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", RELS),
            ("word/document.xml", document.as_str()),
        ] {
            writer.start_file(name, options).expect("Failed to start zip entry");
            writer.write_all(contents.as_bytes()).expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish test DOCX");
    }
    buf
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
