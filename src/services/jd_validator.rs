//! Heuristic gate for the pasted job description.
//!
//! Local checks run first (length, posting vocabulary). When enabled, text that
//! passes them is also put to the LLM as a YES/NO question. Misclassification is
//! acceptable; the gate only exists to catch obvious mistakes before spending an
//! analysis call.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::error::{AppError, AppResult};

static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z+#]*").expect("valid regex"));

const POSTING_TERMS: &[&str] = &[
    "experience", "years", "year", "required", "requirements", "require", "responsibilities",
    "responsible", "qualifications", "qualified", "skills", "skill", "role", "position",
    "team", "engineer", "engineering", "developer", "manager", "analyst", "designer",
    "scientist", "lead", "leadership", "senior", "junior", "intern", "degree", "bachelor",
    "salary", "benefits", "remote", "hybrid", "onsite", "full-time", "fulltime", "part-time",
    "preferred", "knowledge", "ability", "candidate", "hiring", "join", "company",
    "apply", "proficiency", "proficient", "familiarity", "must", "stakeholders",
];

/// Outcome of the check. Rejections carry the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    TooShort { length: usize, minimum: usize },
    NotAJobDescription { reason: String },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    pub fn into_result(self) -> AppResult<()> {
        match self {
            ValidationResult::Accepted => Ok(()),
            ValidationResult::TooShort { length, minimum } => Err(AppError::TooShort { length, minimum }),
            ValidationResult::NotAJobDescription { reason } => Err(AppError::NotAJobDescription { reason }),
        }
    }
}

/// Second opinion on whether a text is a real job posting.
#[async_trait]
pub trait JobDescriptionOracle: Send + Sync {
    async fn is_job_description(&self, text: &str) -> AppResult<bool>;
}

pub struct JobDescriptionValidator {
    config: ValidatorConfig,
    oracle: Option<Arc<dyn JobDescriptionOracle>>,
}

impl JobDescriptionValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config, oracle: None }
    }

    /// Attaches the oracle. Ignored unless `llm_check` is on.
    pub fn with_oracle(mut self, oracle: Arc<dyn JobDescriptionOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn check_heuristics(&self, text: &str) -> ValidationResult {
        let trimmed = text.trim();
        let length = trimmed.chars().count();

        if length < self.config.min_length {
            return ValidationResult::TooShort {
                length,
                minimum: self.config.min_length,
            };
        }

        let found = posting_terms(trimmed);
        debug!(terms = found.len(), "Job description vocabulary check");

        if found.len() < self.config.min_keywords {
            return ValidationResult::NotAJobDescription {
                reason: format!(
                    "expected wording such as role, responsibilities, requirements or experience (found {} of {} needed)",
                    found.len(),
                    self.config.min_keywords
                ),
            };
        }

        ValidationResult::Accepted
    }

    pub async fn validate(&self, text: &str) -> ValidationResult {
        let verdict = self.check_heuristics(text);
        if !verdict.is_accepted() || !self.config.llm_check {
            return verdict;
        }

        let Some(oracle) = &self.oracle else {
            return verdict;
        };

        match oracle.is_job_description(text.trim()).await {
            Ok(true) => {
                info!("LLM check confirmed job description");
                ValidationResult::Accepted
            }
            Ok(false) => ValidationResult::NotAJobDescription {
                reason: "it does not read like a job posting".to_string(),
            },
            Err(e) => {
                warn!(error = %e, "LLM job description check failed, keeping heuristic verdict");
                verdict
            }
        }
    }
}

fn posting_terms(text: &str) -> HashSet<&'static str> {
    let lowered = text.to_lowercase();
    let mut found = HashSet::new();
    for word in WORDS.find_iter(&lowered) {
        if let Some(term) = POSTING_TERMS.iter().find(|t| **t == word.as_str()) {
            found.insert(*term);
        }
    }
    for term in POSTING_TERMS.iter().filter(|t| t.contains('-')) {
        if lowered.contains(*term) {
            found.insert(*term);
        }
    }
    found
}

/// Interprets the oracle's free-text answer. Only a first word of exactly yes or no counts.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    let first_word = answer
        .split(|c: char| !c.is_alphanumeric())
        .find(|word| !word.is_empty())?
        .to_lowercase();
    match first_word.as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
