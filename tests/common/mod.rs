//! Shared fixtures: generated PDFs and a scripted completion backend.

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use career_copilot::models::SECTIONS;
use career_copilot::services::{AnalysisPrompt, CompletionBackend, LlmError};

pub const RESUME_TEXT: &str = "5 years Python, led team of 3";
pub const JOB_DESCRIPTION: &str =
    "Senior Backend Engineer, 5+ years Python, leadership experience required";

/// Builds a PDF with one Helvetica text line per page.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf_with_title(pages, None)
}

pub fn build_pdf_with_title(pages: &[&str], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), 720.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        } else {
            operations.push(Operation::new("re", vec![72.into(), 72.into(), 100.into(), 100.into()]));
            operations.push(Operation::new("f", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// A completion that uses every section marker.
pub fn marked_completion() -> String {
    let bodies = [
        "- 5 years of production Python\n- Led a team of 3",
        "- Hands-on cloud infrastructure",
        "- Led a team of 3 engineers delivering [N] backend services",
        "Backend engineer with five years of Python and hands-on team leadership.",
        "Python, leadership, backend, APIs",
    ];
    SECTIONS
        .iter()
        .zip(bodies.iter())
        .map(|(kind, body)| format!("{}\n{}\n", kind.marker(), body))
        .collect::<Vec<_>>()
        .join("\n")
}

pub enum Reply {
    Text(String),
    AuthError,
    RateLimited,
}

/// Scripted backend that records how often it was called.
pub struct FakeBackend {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<AnalysisPrompt>>,
}

impl FakeBackend {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn answering(text: impl Into<String>) -> Self {
        Self::new(Reply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<AnalysisPrompt> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::AuthError => Err(LlmError::AuthenticationFailed),
            Reply::RateLimited => Err(LlmError::RateLimited),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}
