use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisReport, ParsedResume, SessionContext, Submission, UploadedDocument};
use crate::services::jd_validator::JobDescriptionValidator;
use crate::services::llm_client::{CompletionBackend, CompletionOracle};
use crate::services::prompt_builder::PromptBuilder;
use crate::services::renderer::ResponseRenderer;
use crate::services::text_extractor::{ExtractionResult, TextExtractor};

const PREVIEW_CHARS: usize = 2000;

/// Runs one submission through extract → validate → prompt → complete → render.
pub struct SessionController {
    extractor: Arc<TextExtractor>,
    validator: JobDescriptionValidator,
    backend: Arc<dyn CompletionBackend>,
    low_text_threshold: usize,
}

impl SessionController {
    pub fn new(config: &Config, backend: Arc<dyn CompletionBackend>) -> Self {
        let mut validator = JobDescriptionValidator::new(config.validator.clone());
        if config.validator.llm_check {
            validator = validator.with_oracle(Arc::new(CompletionOracle::new(backend.clone())));
        }

        Self {
            extractor: Arc::new(TextExtractor::new()),
            validator,
            backend,
            low_text_threshold: config.low_text_threshold,
        }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    async fn extract(&self, ctx: &SessionContext, document: UploadedDocument) -> AppResult<ExtractionResult> {
        let extractor = self.extractor.clone();
        let result = tokio::task::spawn_blocking(move || extractor.extract(&document)).await?;
        if let Err(e) = &result {
            warn!(request_id = %ctx.request_id, error = %e, "Resume extraction failed");
        }
        result
    }

    fn is_low_text(&self, text: &str) -> bool {
        text.chars().count() < self.low_text_threshold
    }

    /// Preview step: extraction only, an empty text layer is a warning here.
    pub async fn parse(
        &self,
        ctx: &SessionContext,
        document: UploadedDocument,
        job_description: Option<&str>,
    ) -> AppResult<ParsedResume> {
        let file_name = document.name.clone();
        let extraction = self.extract(ctx, document).await?;
        let characters = extraction.text.chars().count();

        info!(
            request_id = %ctx.request_id,
            characters = characters,
            pages = extraction.pages,
            "Resume parsed"
        );

        Ok(ParsedResume {
            file_name,
            preview: preview(&extraction.text),
            characters,
            pages: extraction.pages,
            no_text_found: extraction.is_empty(),
            low_text_warning: self.is_low_text(&extraction.text),
            metadata: extraction.metadata,
            job_description_chars: job_description.map(|jd| jd.trim().chars().count()),
        })
    }

    /// Full analysis. Any extraction or validation failure returns before the model is called.
    pub async fn analyze(&self, ctx: &SessionContext, submission: Submission) -> AppResult<AnalysisReport> {
        let job_description = submission.job_description.trim().to_string();
        if job_description.is_empty() {
            return Err(AppError::MissingJobDescription);
        }

        let extraction = self.extract(ctx, submission.document).await?.require_text()?;

        self.validator.validate(&job_description).await.into_result()?;

        let prompt = PromptBuilder::build(&extraction.text, &job_description);

        info!(
            request_id = %ctx.request_id,
            model = %self.backend.model(),
            prompt_chars = prompt.user.len(),
            "Requesting analysis"
        );

        let completion = self.backend.complete(&prompt).await.map_err(|e| {
            error!(request_id = %ctx.request_id, error = %e, "Analysis call failed");
            AppError::from(e)
        })?;

        let sections = ResponseRenderer::render(&completion);

        info!(
            request_id = %ctx.request_id,
            degraded = sections.degraded,
            elapsed_ms = ctx.elapsed_ms(),
            "Analysis rendered"
        );

        Ok(AnalysisReport {
            sections,
            resume_chars: extraction.text.chars().count(),
            pages: extraction.pages,
            low_text_warning: self.is_low_text(&extraction.text),
            model: self.backend.model().to_string(),
        })
    }
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
