use lopdf::{Document, Object};
use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::models::{PdfMetadata, UploadedDocument};

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("valid regex"));
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static INVISIBLE: Lazy<Regex> = Lazy::new(|| Regex::new("[\u{200b}\u{feff}]").expect("valid regex"));

/// Pulls the text layer out of an uploaded PDF. No OCR: scanned pages come back empty.
pub struct TextExtractor;

#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub text: String,
    pub pages: usize,
    pub metadata: PdfMetadata,
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Parsing succeeded but there was nothing to read.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn require_text(self) -> AppResult<Self> {
        if self.is_empty() {
            Err(AppError::NoTextFound)
        } else {
            Ok(self)
        }
    }
}

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, file: &UploadedDocument) -> AppResult<ExtractionResult> {
        let start = Instant::now();

        tracing::info!(
            "Starting PDF text extraction for file: {} ({} bytes)",
            file.name,
            file.size
        );

        if file.content.is_empty() {
            return Err(AppError::unreadable("file is empty"));
        }

        let doc = Document::load_mem(&file.content).map_err(|e| {
            tracing::warn!("PDF structure could not be parsed: {}", e);
            AppError::unreadable(e.to_string())
        })?;

        let pages = doc.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());
        for &page_number in pages.keys() {
            match doc.extract_text(&[page_number]) {
                Ok(text) => page_texts.push(text),
                Err(e) => {
                    tracing::warn!("Text extraction failed for page {}: {}", page_number, e);
                    page_texts.push(String::new());
                }
            }
        }

        let mut raw = page_texts.join("\n");

        // lopdf misses text drawn with some embedded font encodings.
        // pdf-extract panics on some malformed inputs, so it is isolated here.
        if raw.trim().is_empty() {
            let fallback = AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&file.content));
            match std::panic::catch_unwind(fallback) {
                Ok(Ok(text)) => {
                    tracing::debug!("Fallback extraction produced {} characters", text.len());
                    raw = text;
                }
                Ok(Err(e)) => tracing::debug!("Fallback extraction failed: {}", e),
                Err(_) => tracing::warn!("Fallback extraction panicked, treating document as textless"),
            }
        }

        let text = clean_text(&raw);
        let processing_time = start.elapsed().as_millis() as u64;

        if text.is_empty() {
            tracing::warn!("PDF parsed but contains no text layer ({} pages)", pages.len());
        } else {
            tracing::info!(
                "PDF processing completed in {}ms, extracted {} characters",
                processing_time,
                text.len()
            );
        }

        Ok(ExtractionResult {
            text,
            pages: pages.len(),
            metadata: PdfMetadata::new(file.size)
                .with_title(info_string(&doc, b"Title"))
                .with_author(info_string(&doc, b"Author")),
            processing_time_ms: processing_time,
        })
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses horizontal whitespace and blank-line runs, drops zero-width characters.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = HORIZONTAL_WS.replace_all(text, " ");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    let text = INVISIBLE.replace_all(&text, "");
    text.trim().to_string()
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        direct => direct,
    };
    let bytes = info.as_dict().ok()?.get(key).ok()?.as_str().ok()?;

    let decoded = if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        decode_utf16(rest, u16::from_be_bytes)
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        decode_utf16(rest, u16::from_le_bytes)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    };

    let trimmed = decoded.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
