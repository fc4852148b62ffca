use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, RequestError};
use crate::middleware::REQUEST_ID_HEADER;
use crate::models::{AnalyzeResponse, ParseResponse, SessionContext, Submission, UploadedDocument};
use crate::state::AppState;

/// Fields pulled out of the upload form.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub document: Option<UploadedDocument>,
    pub job_description: Option<String>,
}

/// Reuses the id the logging middleware assigned, falling back to a fresh one.
fn session_context(headers: &HeaderMap) -> SessionContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(SessionContext::with_request_id)
        .unwrap_or_default()
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, RequestError> {
    let ctx = session_context(&headers);
    info!(request_id = %ctx.request_id, "Starting resume analysis request");

    run_analysis(&state, &ctx, multipart)
        .await
        .map_err(|e| e.for_request(&ctx.request_id))
}

async fn run_analysis(
    state: &AppState,
    ctx: &SessionContext,
    mut multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let form = read_form(&mut multipart, state.config.max_file_size_bytes()).await?;
    let document = form.document.ok_or(AppError::MissingFile)?;
    let job_description = form.job_description.unwrap_or_default();

    info!(
        request_id = %ctx.request_id,
        file_name = %document.name,
        file_size = document.size,
        job_description_chars = job_description.trim().chars().count(),
        "Submission received"
    );

    let report = state
        .controller
        .analyze(
            ctx,
            Submission {
                document,
                job_description,
            },
        )
        .await
        .map_err(|e| {
            error!(request_id = %ctx.request_id, error_code = e.error_code(), "Analysis failed");
            e
        })?;

    let total_time = ctx.elapsed_ms();
    info!(
        request_id = %ctx.request_id,
        total_time_ms = total_time,
        "Request completed successfully"
    );

    Ok(Json(AnalyzeResponse::new(report, total_time)))
}

pub async fn parse_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, RequestError> {
    let ctx = session_context(&headers);
    info!(request_id = %ctx.request_id, "Starting resume parse request");

    run_parse(&state, &ctx, multipart)
        .await
        .map_err(|e| e.for_request(&ctx.request_id))
}

async fn run_parse(
    state: &AppState,
    ctx: &SessionContext,
    mut multipart: Multipart,
) -> AppResult<Json<ParseResponse>> {
    let form = read_form(&mut multipart, state.config.max_file_size_bytes()).await?;
    let document = form.document.ok_or(AppError::MissingFile)?;

    let parsed = state
        .controller
        .parse(ctx, document, form.job_description.as_deref())
        .await?;

    if parsed.no_text_found {
        warn!(request_id = %ctx.request_id, "Parsed PDF has no text layer");
    }

    Ok(Json(ParseResponse::new(parsed, ctx.elapsed_ms())))
}

/// A body that trips the router's length limit is an oversized upload, not a broken form.
fn multipart_error(err: MultipartError, max_size_bytes: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(max_size = max_size_bytes, "Upload exceeds the request body limit");
        AppError::FileTooLarge {
            limit: max_size_bytes / (1024 * 1024),
        }
    } else {
        AppError::invalid_file(format!("{}: {}", context, err))
    }
}

pub async fn read_form(multipart: &mut Multipart, max_size_bytes: usize) -> AppResult<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size_bytes, "Failed to read multipart field"))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_size_bytes, "Failed to read file data"))?;

                if data.is_empty() {
                    return Err(AppError::invalid_file("File is empty"));
                }

                if data.len() > max_size_bytes {
                    warn!(
                        file_size = data.len(),
                        max_size = max_size_bytes,
                        "File size exceeds limit"
                    );
                    return Err(AppError::FileTooLarge {
                        limit: max_size_bytes / (1024 * 1024),
                    });
                }

                let mut file = UploadedDocument::new(file_name, data);
                if let Some(mime_type) = content_type {
                    file = file.with_mime_type(mime_type);
                }

                if !file.is_pdf() {
                    return Err(AppError::invalid_file("Only PDF resumes are supported"));
                }

                form.document = Some(file);
            }
            "job_description" => {
                let text = field.text().await.map_err(|e| {
                    multipart_error(e, max_size_bytes, "Failed to read job description")
                })?;
                form.job_description = Some(text);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}
