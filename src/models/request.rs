use bytes::Bytes;
use std::time::Instant;

/// A resume file as received from the upload form. Consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedDocument {
    pub fn new(name: String, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Checks the declared format only; whether the bytes parse is the extractor's call.
    pub fn is_pdf(&self) -> bool {
        let declared = self
            .mime_type
            .as_deref()
            .map(|mt| mt == "application/pdf")
            .unwrap_or(false);

        declared
            || self.name.to_lowercase().ends_with(".pdf")
            || self.content.starts_with(b"%PDF")
    }
}

/// One form submission: the resume plus the pasted job description.
#[derive(Debug, Clone)]
pub struct Submission {
    pub document: UploadedDocument,
    pub job_description: String,
}

/// Request-scoped state threaded through the pipeline in place of a browser session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub request_id: String,
    pub started: Instant,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string()[..8].to_string(),
            started: Instant::now(),
        }
    }

    /// Context for a request that already carries an id, e.g. from `x-request-id`.
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
