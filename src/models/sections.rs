//! Section schema shared by the prompt builder and the response renderer.
//!
//! The prompt asks the model to open each section with `### [LABEL]` on its own
//! line; the renderer splits the completion on the same markers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Strengths,
    Gaps,
    Rewrites,
    Summary,
    Keywords,
}

/// All sections, in the order they are requested and displayed.
pub const SECTIONS: [SectionKind; 5] = [
    SectionKind::Strengths,
    SectionKind::Gaps,
    SectionKind::Rewrites,
    SectionKind::Summary,
    SectionKind::Keywords,
];

/// Key used for the single fallback section when no marker is present.
pub const GENERIC_SECTION_KEY: &str = "analysis";
pub const GENERIC_SECTION_TITLE: &str = "Analysis";

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Strengths => "STRENGTHS",
            SectionKind::Gaps => "GAPS",
            SectionKind::Rewrites => "REWRITES",
            SectionKind::Summary => "SUMMARY",
            SectionKind::Keywords => "KEYWORDS",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Strengths => "strengths",
            SectionKind::Gaps => "gaps",
            SectionKind::Rewrites => "rewrites",
            SectionKind::Summary => "summary",
            SectionKind::Keywords => "keywords",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Strengths => "Strengths vs JD",
            SectionKind::Gaps => "Skill/Experience Gaps",
            SectionKind::Rewrites => "Resume Bullet Rewrites (ATS-ready)",
            SectionKind::Summary => "Tailored Professional Summary",
            SectionKind::Keywords => "Top Keywords to Add",
        }
    }

    /// What the model should write in the section.
    pub fn instruction(self) -> &'static str {
        match self {
            SectionKind::Strengths => "3-6 bullets on where the resume meets the job description",
            SectionKind::Gaps => {
                "3-6 bullets on missing skills or experience, verb-noun phrasing \
                 (e.g. \"Hands-on Databricks pipelines\")"
            }
            SectionKind::Rewrites => {
                "3-6 rewritten resume bullets, ATS-ready, strong verbs, \
                 quantification placeholders where numbers are missing"
            }
            SectionKind::Summary => "a 3-4 sentence professional summary aligned to the role, no fluff",
            SectionKind::Keywords => "a single comma-separated line of the top keywords to add",
        }
    }

    /// Bracketed token, e.g. `[STRENGTHS]`.
    pub fn token(self) -> String {
        format!("[{}]", self.label())
    }

    /// Full marker line as the model is asked to write it.
    pub fn marker(self) -> String {
        format!("### {}", self.token())
    }

    /// Recognises a marker line, tolerating the usual model drift: any number of
    /// leading `#`, bold asterisks, surrounding whitespace, a trailing colon and
    /// lowercase labels.
    pub fn parse_marker(line: &str) -> Option<SectionKind> {
        let trimmed = line
            .trim()
            .trim_start_matches('#')
            .trim()
            .trim_matches('*')
            .trim()
            .trim_end_matches(':')
            .trim();

        let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?.trim();
        SECTIONS
            .iter()
            .copied()
            .find(|kind| kind.label().eq_ignore_ascii_case(inner))
    }
}
