pub mod jd_validator;
pub mod llm_client;
pub mod prompt_builder;
pub mod renderer;
pub mod session;
pub mod text_extractor;

pub use jd_validator::{JobDescriptionOracle, JobDescriptionValidator, ValidationResult};
pub use llm_client::{CompletionBackend, CompletionOracle, LlmClient, LlmError};
pub use prompt_builder::{AnalysisPrompt, PromptBuilder};
pub use renderer::ResponseRenderer;
pub use session::SessionController;
pub use text_extractor::{ExtractionResult, TextExtractor};
