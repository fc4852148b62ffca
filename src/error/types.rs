use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The uploaded file could not be read as a PDF: {message}")]
    UnreadableDocument { message: String },

    #[error("No extractable text was found in the PDF. If it is a scanned image, export a text-based PDF and try again")]
    NoTextFound,

    #[error("The job description is too short ({length} characters, at least {minimum} required)")]
    TooShort { length: usize, minimum: usize },

    #[error("This does not look like a job description: {reason}")]
    NotAJobDescription { reason: String },

    #[error("Please paste the job description")]
    MissingJobDescription,

    #[error("Please upload a PDF resume")]
    MissingFile,

    #[error("Invalid file: {message}")]
    InvalidFile { message: String },

    #[error("File too large: uploads are limited to {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("The AI service rejected the configured credentials")]
    AuthenticationFailed,

    #[error("The AI service is rate limiting requests, please try again shortly")]
    RateLimited,

    #[error("The AI service returned an error: {message}")]
    UpstreamError { message: String },

    #[error("The AI service did not respond in time")]
    Timeout,

    #[error("Server busy: maximum concurrent requests reached")]
    ServerBusy,

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Whether a failure is something the user can fix themselves or a fault on our side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    System,
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnreadableDocument { .. } => "UNREADABLE_DOCUMENT",
            AppError::NoTextFound => "NO_TEXT_FOUND",
            AppError::TooShort { .. } => "TOO_SHORT",
            AppError::NotAJobDescription { .. } => "NOT_A_JOB_DESCRIPTION",
            AppError::MissingJobDescription => "MISSING_JOB_DESCRIPTION",
            AppError::MissingFile => "MISSING_FILE",
            AppError::InvalidFile { .. } => "INVALID_FILE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::UpstreamError { .. } => "UPSTREAM_ERROR",
            AppError::Timeout => "TIMEOUT",
            AppError::ServerBusy => "SERVER_BUSY",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnreadableDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoTextFound => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TooShort { .. } => StatusCode::BAD_REQUEST,
            AppError::NotAJobDescription { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingJobDescription => StatusCode::BAD_REQUEST,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidFile { .. } => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::AuthenticationFailed => StatusCode::BAD_GATEWAY,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::ServerBusy => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::UnreadableDocument { .. }
            | AppError::NoTextFound
            | AppError::TooShort { .. }
            | AppError::NotAJobDescription { .. }
            | AppError::MissingJobDescription
            | AppError::MissingFile
            | AppError::InvalidFile { .. }
            | AppError::FileTooLarge { .. } => ErrorCategory::Validation,
            AppError::AuthenticationFailed
            | AppError::RateLimited
            | AppError::UpstreamError { .. }
            | AppError::Timeout
            | AppError::ServerBusy
            | AppError::Internal { .. } => ErrorCategory::System,
        }
    }
}

/// An [`AppError`] tied to the id the logging middleware gave its request, so the
/// envelope, the `x-request-id` header and the logs agree.
#[derive(Debug)]
pub struct RequestError {
    pub request_id: String,
    pub error: AppError,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        self.error.respond(self.request_id)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.respond(Uuid::new_v4().to_string())
    }
}

impl AppError {
    pub fn for_request(self, request_id: impl Into<String>) -> RequestError {
        RequestError {
            request_id: request_id.into(),
            error: self,
        }
    }

    fn respond(self, request_id: String) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let category = self.category();
        let message = self.to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        match category {
            ErrorCategory::Validation => tracing::warn!(
                error_code = error_code,
                status_code = %status,
                request_id = %request_id,
                error_message = %message,
                "Submission rejected"
            ),
            ErrorCategory::System => tracing::error!(
                error_code = error_code,
                status_code = %status,
                request_id = %request_id,
                error_message = %message,
                "API error occurred"
            ),
        }

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "category": category,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Background task failed: {}", err),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl AppError {
    pub fn unreadable(message: impl Into<String>) -> Self {
        AppError::UnreadableDocument {
            message: message.into(),
        }
    }

    pub fn invalid_file(message: impl Into<String>) -> Self {
        AppError::InvalidFile {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::UpstreamError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
