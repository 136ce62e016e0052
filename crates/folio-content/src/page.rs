//! A single documentation page.

use std::path::PathBuf;

use crate::parser::{ParsedDoc, TocEntry};

/// One documentation page, immutable once indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Slug segments; the root index page has an empty path
    pub path: Vec<String>,

    /// Display title
    pub title: String,

    /// Short description
    pub description: Option<String>,

    /// Icon name as written by the author
    pub icon: Option<String>,

    /// Order in navigation (lower = first)
    pub order: Option<i32>,

    /// Whether to show in navigation
    pub nav: bool,

    /// Markdown body without frontmatter
    pub body: String,

    /// Table of contents
    pub toc: Vec<TocEntry>,

    /// Plain-text summary for search
    pub summary: String,

    /// File the page was read from
    pub source_path: Option<PathBuf>,
}

impl Page {
    /// Create a page with only a path and a title.
    pub fn new<I, S>(path: I, title: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            path: normalize_path(path),
            title: title.into(),
            description: None,
            icon: None,
            order: None,
            nav: true,
            body: String::new(),
            toc: Vec::new(),
            summary: String::new(),
            source_path: None,
        }
    }

    /// Create a page from a parsed document.
    ///
    /// Falls back to `fallback_title` when the document has no frontmatter.
    pub fn from_document(path: Vec<String>, doc: ParsedDoc, fallback_title: &str) -> Self {
        let fm = doc.frontmatter.unwrap_or_default();
        let title = if fm.title.is_empty() {
            fallback_title.to_string()
        } else {
            fm.title
        };

        Self {
            path: normalize_path(path),
            title,
            description: fm.description,
            icon: fm.icon,
            order: fm.order,
            nav: fm.nav,
            body: doc.content,
            toc: doc.toc,
            summary: doc.summary,
            source_path: None,
        }
    }

    /// Set the icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the navigation order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the Markdown body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Last path segment, or an empty string for the root page.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }
}

/// Split segments containing `/` and drop empty, `.` and `..` segments.
///
/// A normalized path never refers outside the docs root, so joining it onto an
/// output directory stays inside that directory.
pub(crate) fn normalize_path<I, S>(path: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    path.into_iter()
        .flat_map(|segment| {
            segment
                .as_ref()
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty() && !is_dot_segment(s))
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// `.` or `..`, which have no meaning as a page path segment.
pub(crate) fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}
