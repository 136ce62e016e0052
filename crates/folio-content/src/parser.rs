//! Documentation page parser.
//!
//! A page is Markdown with an optional YAML frontmatter block at the very top.
//! The frontmatter is read from pulldown-cmark's metadata block events, so the
//! document is walked once for frontmatter, headings and summary text.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::Deserialize;

/// Maximum length of the plain-text summary, in characters.
const SUMMARY_LIMIT: usize = 280;

/// Page settings from the frontmatter block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Page title (required)
    pub title: String,

    /// Page description for SEO and the page header
    #[serde(default)]
    pub description: Option<String>,

    /// Icon name, resolved against the icon registry
    #[serde(default)]
    pub icon: Option<String>,

    /// Order in navigation (lower = first)
    #[serde(default)]
    pub order: Option<i32>,

    /// Whether to show in navigation
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Custom slug override
    #[serde(default)]
    pub slug: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            icon: None,
            order: None,
            nav: true,
            slug: None,
        }
    }
}

/// A parsed documentation page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Leading plain text of the body, for search
    pub summary: String,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unclosed or malformed frontmatter block")]
    UnclosedFrontmatter,

    #[error("Invalid frontmatter: {0}")]
    InvalidFrontmatter(String),
}

/// Markdown extensions enabled for every page body.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse a documentation page.
///
/// Reads the frontmatter, generates a table of contents and a short text summary.
pub fn parse_document(source: &str) -> Result<ParsedDoc, ParseError> {
    let source = source.trim_start();
    let options = markdown_options() | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;

    let mut yaml: Option<String> = None;
    let mut in_metadata = false;
    let mut body_start = 0;

    let mut toc = Vec::new();
    let mut seen_ids: HashMap<String, usize> = HashMap::new();
    let mut summary = String::new();

    let mut current_heading: Option<(u8, String)> = None;
    let mut in_code_block = false;

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => {
                in_metadata = true;
                yaml = Some(String::new());
            }
            Event::End(TagEnd::MetadataBlock(_)) => {
                in_metadata = false;
                body_start = range.end;
            }
            Event::Text(text) if in_metadata => {
                if let Some(yaml) = yaml.as_mut() {
                    yaml.push_str(&text);
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = unique_id(slugify(&title), &mut seen_ids);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                } else if !in_code_block {
                    push_summary(&mut summary, &text);
                }
            }

            Event::SoftBreak | Event::HardBreak => {
                if current_heading.is_none() && !in_code_block {
                    push_summary(&mut summary, " ");
                }
            }

            _ => {}
        }
    }

    let frontmatter = match yaml {
        Some(yaml) => Some(
            serde_yaml::from_str::<Frontmatter>(&yaml)
                .map_err(|e| ParseError::InvalidFrontmatter(e.to_string()))?,
        ),
        // An opening fence that never became a metadata block
        None if source.starts_with("---\n") || source.starts_with("---\r\n") => {
            return Err(ParseError::UnclosedFrontmatter)
        }
        None => None,
    };

    Ok(ParsedDoc {
        frontmatter,
        content: source[body_start..].trim_start().to_string(),
        toc,
        summary: summary.split_whitespace().collect::<Vec<_>>().join(" "),
    })
}

fn push_summary(summary: &mut String, text: &str) {
    let remaining = SUMMARY_LIMIT.saturating_sub(summary.chars().count());
    if remaining == 0 {
        return;
    }
    if !summary.is_empty() && !summary.ends_with(' ') && !text.starts_with(' ') {
        summary.push(' ');
    }
    summary.extend(text.chars().take(remaining));
}

/// Suffix repeated heading ids with `-1`, `-2`, ... so anchors stay unique.
fn unique_id(id: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(id.clone()).or_insert(0);
    let unique = if *count == 0 {
        id
    } else {
        format!("{}-{}", id, count)
    };
    *count += 1;
    unique
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
