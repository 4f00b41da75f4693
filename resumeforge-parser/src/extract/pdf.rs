//! PDF text extraction.
//!
//! Opening the document is all-or-nothing: a file `lopdf` can't load is an
//! [`ExtractionError::Pdf`]. Individual pages are more forgiving. A page with no text
//! layer, or one whose content stream can't be decoded, contributes an empty string and the
//! remaining pages are still returned.

use std::path::Path;

use lopdf::Document;

use super::ExtractionError;

/// Concatenate the text of every page in document order.
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    let document = Document::load(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(extract_pages(&document).concat())
}

/// Text of each page, empty where nothing could be extracted.
fn extract_pages(document: &Document) -> Vec<String> {
    // get_pages is keyed by 1-based page number, so iteration is in document order
    document
        .get_pages()
        .into_keys()
        .map(|page_number| match document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(page_number, error = %e, "No text extracted from page");
                String::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::make_test_pdf;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_extracts_single_page() {
        let file = write_temp(&make_test_pdf(&["Hello World"]));
        let text = extract_text(file.path()).unwrap();
        assert!(text.contains("Hello World"), "unexpected text: {text:?}");
    }

    #[test]
    fn test_pages_are_concatenated_in_order() {
        let file = write_temp(&make_test_pdf(&["Page 1", "Page 2", "Page 3"]));
        let text = extract_text(file.path()).unwrap();

        let first = text.find("Page 1").expect("page 1 missing");
        let second = text.find("Page 2").expect("page 2 missing");
        let third = text.find("Page 3").expect("page 3 missing");
        assert!(first < second && second < third, "pages out of order: {text:?}");
    }

    #[test]
    fn test_page_without_text_contributes_nothing() {
        let file = write_temp(&make_test_pdf(&["Before", "", "After"]));
        let text = extract_text(file.path()).unwrap();
        assert_eq!(crate::normalize::clean_text(&text), "Before After");
    }

    /// Three "Good" pages, the middle one pointing its content stream at an object that doesn't
    /// exist.
    fn pdf_with_broken_middle_page() -> Vec<u8> {
        let mut document = Document::load_mem(&make_test_pdf(&["Good", "Good", "Good"])).unwrap();
        let middle = document.get_pages()[&2];
        document
            .get_object_mut(middle)
            .and_then(lopdf::Object::as_dict_mut)
            .unwrap()
            .set("Contents", lopdf::Object::Reference((999, 0)));

        let mut buf = Vec::new();
        document.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_unreadable_page_contributes_empty_text() {
        let document = Document::load_mem(&pdf_with_broken_middle_page()).unwrap();

        let pages = extract_pages(&document);
        assert_eq!(pages.len(), 3);
        assert!(pages[0].contains("Good"), "page 1: {:?}", pages[0]);
        assert_eq!(pages[1], "");
        assert!(pages[2].contains("Good"), "page 3: {:?}", pages[2]);
    }

    #[test]
    fn test_unreadable_page_does_not_fail_document() {
        let file = write_temp(&pdf_with_broken_middle_page());
        let text = extract_text(file.path()).unwrap();
        assert_eq!(crate::normalize::clean_text(&text), "Good Good");
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        let file = write_temp(b"this is not a pdf");
        let err = extract_text(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Error extracting PDF text: "), "got: {err}");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_text(&dir.path().join("gone.pdf")).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
