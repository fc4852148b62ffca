//! Text extraction against generated PDFs

mod common;

use career_copilot::error::AppError;
use career_copilot::models::UploadedDocument;
use career_copilot::services::TextExtractor;
use common::{build_pdf, build_pdf_with_title, RESUME_TEXT};

fn upload(bytes: Vec<u8>) -> UploadedDocument {
    UploadedDocument::new("resume.pdf".to_string(), bytes).with_mime_type("application/pdf".to_string())
}

#[test]
fn test_single_page_text_is_extracted() {
    let result = TextExtractor::new().extract(&upload(build_pdf(&[RESUME_TEXT]))).unwrap();

    assert_eq!(result.pages, 1);
    assert!(!result.is_empty());
    assert!(result.text.contains(RESUME_TEXT), "got {:?}", result.text);
}

#[test]
fn test_pages_are_concatenated_in_order() {
    let pages = ["Experience at Initech", "Education at State University", "Skills Python Rust"];
    let result = TextExtractor::new().extract(&upload(build_pdf(&pages))).unwrap();

    assert_eq!(result.pages, 3);
    let positions: Vec<usize> = pages
        .iter()
        .map(|p| result.text.find(p).unwrap_or_else(|| panic!("missing {:?} in {:?}", p, result.text)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {:?}", positions);
}

#[test]
fn test_textless_pdf_reports_no_text_found() {
    let result = TextExtractor::new().extract(&upload(build_pdf(&[""]))).unwrap();

    assert_eq!(result.pages, 1);
    assert!(result.is_empty());
    assert!(matches!(result.require_text(), Err(AppError::NoTextFound)));
}

#[test]
fn test_non_pdf_bytes_are_unreadable() {
    let inputs: Vec<Vec<u8>> = vec![
        b"Jane Doe\nSoftware Engineer".to_vec(),
        vec![0u8; 64],
        b"PK\x03\x04 this is a zip file".to_vec(),
        b"%PDF-1.7 but truncated right after the header".to_vec(),
    ];

    for bytes in inputs {
        match TextExtractor::new().extract(&upload(bytes.clone())) {
            Err(AppError::UnreadableDocument { .. }) => {}
            other => panic!("Expected UnreadableDocument for {:?}, got {:?}", bytes, other),
        }
    }
}

#[test]
fn test_title_metadata_is_read() {
    let bytes = build_pdf_with_title(&[RESUME_TEXT], Some("Jane Doe Resume"));
    let result = TextExtractor::new().extract(&upload(bytes)).unwrap();

    assert_eq!(result.metadata.title.as_deref(), Some("Jane Doe Resume"));
    assert!(result.metadata.author.is_none());
}
