use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: AnalysisReport,
    pub processing_time_ms: u64,
}

/// Everything the page needs to show the result of one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sections: RenderedSections,
    pub resume_chars: usize,
    pub pages: usize,
    pub low_text_warning: bool,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub key: String,
    pub title: String,
    pub body: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSections {
    pub sections: Vec<RenderedSection>,
    /// True when no section marker was recognised and the raw text is shown as-is.
    pub degraded: bool,
}

impl RenderedSections {
    pub fn get(&self, key: &str) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    pub fn body(&self, key: &str) -> Option<&str> {
        self.get(key).map(|s| s.body.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParseResponse {
    pub success: bool,
    pub data: ParsedResume,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedResume {
    pub file_name: String,
    pub preview: String,
    pub characters: usize,
    pub pages: usize,
    pub metadata: PdfMetadata,
    pub no_text_found: bool,
    pub low_text_warning: bool,
    pub job_description_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub file_size_bytes: usize,
}

impl AnalyzeResponse {
    pub fn new(data: AnalysisReport, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            data,
            processing_time_ms,
        }
    }
}

impl ParseResponse {
    pub fn new(data: ParsedResume, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            data,
            processing_time_ms,
        }
    }
}

impl PdfMetadata {
    pub fn new(file_size_bytes: usize) -> Self {
        Self {
            title: None,
            author: None,
            file_size_bytes,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }
}
