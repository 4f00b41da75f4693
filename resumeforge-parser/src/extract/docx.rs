//! DOCX text extraction.
//!
//! A `.docx` is a zip archive; the document body lives in `word/document.xml`. Only the
//! paragraphs that sit directly under `<w:body>` are read, so table cells, headers and text
//! boxes are left out. Paragraphs are joined with `\n`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraph text, one paragraph per line.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let paragraphs = body_paragraphs(&xml).map_err(ExtractionError::Docx)?;
    Ok(paragraphs.join("\n"))
}

/// Walk the WordprocessingML body and collect the text of each top-level paragraph.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    // Element names from the root down to the current position
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    // >0 while inside a text box nested in the current paragraph
    let mut textbox_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("malformed {DOCUMENT_PART} at byte {}: {e}", reader.buffer_position()))?;

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"w:p" if current.is_none() && parent_is_body(&path) => current = Some(String::new()),
                    b"w:txbxContent" if current.is_some() => textbox_depth += 1,
                    b"w:t" if current.is_some() && textbox_depth == 0 => in_text = true,
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(e) => {
                if let Some(paragraph) = current.as_mut().filter(|_| textbox_depth == 0) {
                    match e.name().as_ref() {
                        b"w:tab" | b"w:ptab" => paragraph.push('\t'),
                        b"w:br" | b"w:cr" => paragraph.push('\n'),
                        b"w:noBreakHyphen" => paragraph.push('-'),
                        _ => {}
                    }
                } else if e.name().as_ref() == b"w:p" && current.is_none() && parent_is_body(&path) {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(e) if in_text => {
                let text = e.unescape().map_err(|e| format!("bad text in {DOCUMENT_PART}: {e}"))?;
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&text);
                }
            }
            Event::CData(e) if in_text => {
                if let Some(paragraph) = current.as_mut() {
                    paragraph.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                path.pop();
                match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:txbxContent" if textbox_depth > 0 => textbox_depth -= 1,
                    b"w:p" if textbox_depth == 0 && parent_is_body(&path) => {
                        if let Some(paragraph) = current.take() {
                            paragraphs.push(paragraph);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is_body(path: &[Vec<u8>]) -> bool {
    path.last().is_some_and(|name| name.as_slice() == b"w:body")
}
