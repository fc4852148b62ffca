use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::collections::HashMap;

use crate::models::{
    RenderedSection, RenderedSections, SectionKind, GENERIC_SECTION_KEY, GENERIC_SECTION_TITLE,
    SECTIONS,
};

pub struct ResponseRenderer;

impl ResponseRenderer {
    /// Splits a completion on the section markers. Text before the first marker is
    /// dropped; a repeated marker appends to its section. With no marker at all the
    /// whole completion becomes one generic section.
    pub fn render(response: &str) -> RenderedSections {
        let mut bodies: HashMap<SectionKind, Vec<&str>> = HashMap::new();
        let mut current: Option<SectionKind> = None;
        let mut found_any = false;

        for line in response.lines() {
            if let Some(kind) = SectionKind::parse_marker(line) {
                found_any = true;
                current = Some(kind);
                bodies.entry(kind).or_default();
                continue;
            }
            if let Some(kind) = current {
                bodies.entry(kind).or_default().push(line);
            }
        }

        if !found_any {
            tracing::warn!("No section markers in completion, showing raw text");
            return RenderedSections {
                sections: vec![section(GENERIC_SECTION_KEY, GENERIC_SECTION_TITLE, response.to_string())],
                degraded: true,
            };
        }

        let sections = SECTIONS
            .iter()
            .map(|kind| {
                let body = bodies
                    .get(kind)
                    .map(|lines| body_text(lines))
                    .unwrap_or_default();
                section(kind.key(), kind.title(), body)
            })
            .collect();

        RenderedSections {
            sections,
            degraded: false,
        }
    }
}

/// Joins a section's lines, dropping the blank lines around it. Indentation on the
/// first line is part of the body.
fn body_text(lines: &[&str]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn section(key: &str, title: &str, body: String) -> RenderedSection {
    let html = markdown_to_html(&body);
    RenderedSection {
        key: key.to_string(),
        title: title.to_string(),
        body,
        html,
    }
}

const SAFE_URL_PREFIXES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Markdown to HTML with any raw HTML from the model shown as text. Link and image
/// targets outside http(s) and mailto become `#`.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let normalized = url.trim().to_ascii_lowercase();
    if SAFE_URL_PREFIXES.iter().any(|p| normalized.starts_with(p)) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}
