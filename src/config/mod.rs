use std::env;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub max_concurrent_requests: usize,
    pub low_text_threshold: usize,
    pub llm: LlmConfig,
    pub validator: ValidatorConfig,
}

/// Settings for the chat-completions client. Fixed at start, never per request.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub min_length: usize,
    pub min_keywords: usize,
    pub llm_check: bool,
}

/// Log output style, read before the subscriber (and so before `Config`) exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref().map(str::trim) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

// Keeps the key out of `Config`'s debug logging.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            max_retries: 0,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_length: 30,
            min_keywords: 2,
            llm_check: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let llm_defaults = LlmConfig::default();
        let llm = LlmConfig {
            api_key,
            base_url: Self::string_env_var("OPENAI_BASE_URL", &llm_defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            model: Self::string_env_var("OPENAI_MODEL", &llm_defaults.model),
            temperature: Self::parse_env_var("OPENAI_TEMPERATURE", llm_defaults.temperature)
                .context("Failed to parse OPENAI_TEMPERATURE")?,
            timeout: Duration::from_secs(
                Self::parse_env_var("LLM_TIMEOUT_SECONDS", 60u64)
                    .context("Failed to parse LLM_TIMEOUT_SECONDS")?,
            ),
            max_retries: Self::parse_env_var("LLM_MAX_RETRIES", llm_defaults.max_retries)
                .context("Failed to parse LLM_MAX_RETRIES")?,
        };

        let validator_defaults = ValidatorConfig::default();
        let validator = ValidatorConfig {
            min_length: Self::parse_env_var("JD_MIN_LENGTH", validator_defaults.min_length)
                .context("Failed to parse JD_MIN_LENGTH")?,
            min_keywords: Self::parse_env_var("JD_MIN_KEYWORDS", validator_defaults.min_keywords)
                .context("Failed to parse JD_MIN_KEYWORDS")?,
            llm_check: Self::parse_env_var("JD_LLM_CHECK", validator_defaults.llm_check)
                .context("Failed to parse JD_LLM_CHECK")?,
        };

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| {
                info!("SERVER_HOST not set, using default: 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            server_port: Self::parse_env_var("SERVER_PORT", 8080)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", 10)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_concurrent_requests: Self::parse_env_var("MAX_CONCURRENT_REQUESTS", 100)
                .context("Failed to parse MAX_CONCURRENT_REQUESTS")?,
            low_text_threshold: Self::parse_env_var("LOW_TEXT_THRESHOLD", 200)
                .context("Failed to parse LOW_TEXT_THRESHOLD")?,
            llm,
            validator,
        };

        config.validate()?;

        if config.llm.api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; analysis requests will fail with an authentication error");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        match env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default.to_string()
            }
        }
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }
        if self.llm.timeout.is_zero() {
            return Err(anyhow::anyhow!("LLM_TIMEOUT_SECONDS must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(anyhow::anyhow!("OPENAI_TEMPERATURE must be between 0.0 and 2.0"));
        }
        if self.llm.model.is_empty() {
            return Err(anyhow::anyhow!("OPENAI_MODEL must not be empty"));
        }
        if self.validator.min_length == 0 {
            return Err(anyhow::anyhow!("JD_MIN_LENGTH must be greater than 0"));
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            max_file_size_mb: 10,
            max_concurrent_requests: 100,
            low_text_threshold: 200,
            llm: LlmConfig::default(),
            validator: ValidatorConfig::default(),
        }
    }
}
