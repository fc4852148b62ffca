//! Client for an OpenAI-compatible chat-completions endpoint.
//!
//! Every call to the model goes through [`CompletionBackend`], so the session
//! controller and the job-description check can run against a fake in tests.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use crate::services::jd_validator::{parse_yes_no, JobDescriptionOracle};
use crate::services::prompt_builder::{job_description_check_prompt, AnalysisPrompt};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("missing or rejected API key")]
    AuthenticationFailed,

    #[error("rate limited by the provider")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not reach provider: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("provider returned an empty completion")]
    EmptyContent,
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::AuthenticationFailed => AppError::AuthenticationFailed,
            LlmError::RateLimited => AppError::RateLimited,
            LlmError::Timeout => AppError::Timeout,
            other => AppError::upstream(other.to_string()),
        }
    }
}

/// Anything that can turn a prompt into completion text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn attempt(&self, api_key: &str, prompt: &AnalysisPrompt) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(content)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, prompt: &AnalysisPrompt) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::AuthenticationFailed)?;

        let mut attempt = 0;
        loop {
            match self.attempt(api_key, prompt).await {
                Err(LlmError::RateLimited) if attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(1000 * (1 << attempt.min(6)));
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited by provider, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Ok(content) => {
                    debug!(
                        model = %self.config.model,
                        characters = content.len(),
                        "Completion received"
                    );
                    return Ok(content);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn transport_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport(err.to_string())
    }
}

fn status_error(status: StatusCode, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LlmError::Timeout,
        _ => {
            let message = serde_json::from_str::<ProviderError>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            LlmError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Asks the completion backend whether a text is a job posting.
pub struct CompletionOracle {
    backend: Arc<dyn CompletionBackend>,
}

impl CompletionOracle {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl JobDescriptionOracle for CompletionOracle {
    async fn is_job_description(&self, text: &str) -> AppResult<bool> {
        let answer = self.backend.complete(&job_description_check_prompt(text)).await?;
        parse_yes_no(&answer)
            .ok_or_else(|| AppError::upstream(format!("unexpected classification answer: {}", answer)))
    }
}
