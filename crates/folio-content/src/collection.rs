//! Loading a page collection from a docs directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::page::{is_dot_segment, normalize_path, Page};
use crate::parser::parse_document;

/// Folder metadata read from `meta.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FolderMeta {
    /// Folder title shown in navigation
    #[serde(default)]
    pub title: Option<String>,

    /// Folder icon name
    #[serde(default)]
    pub icon: Option<String>,

    /// Explicit ordering of entries (file or folder names, no extension)
    #[serde(default)]
    pub pages: Vec<String>,
}

/// Pages plus folder metadata, ready to be indexed.
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    /// All pages, in discovery order
    pub pages: Vec<Page>,

    /// Folder metadata by folder path
    pub folders: HashMap<Vec<String>, FolderMeta>,
}

impl PageCollection {
    /// Create a collection from pages alone.
    pub fn from_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            folders: HashMap::new(),
        }
    }

    /// Attach metadata to a folder.
    pub fn with_folder<I, S>(mut self, path: I, meta: FolderMeta) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.folders.insert(normalize_path(path), meta);
        self
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the collection has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Errors that can occur while loading a collection.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Docs directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid slug \"{slug}\" in {path}: `.` and `..` segments are not allowed")]
    InvalidSlug { path: String, slug: String },

    #[error("Invalid folder metadata in {path}: {message}")]
    InvalidMeta { path: String, message: String },
}

/// Load every `.md`/`.mdx` page and `meta.json` file under `docs_dir`.
pub fn load_collection(docs_dir: &Path) -> Result<PageCollection, CollectionError> {
    if !docs_dir.is_dir() {
        return Err(CollectionError::DirectoryNotFound(
            docs_dir.display().to_string(),
        ));
    }

    let mut collection = PageCollection::default();

    for entry in WalkDir::new(docs_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(docs_dir).unwrap_or(path);
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if filename == "meta.json" {
            let folder = relative_segments(relative.parent().unwrap_or(Path::new("")));
            let meta = read_meta(path)?;
            collection.folders.insert(folder, meta);
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "mdx" && ext != "md" {
            continue;
        }

        let source = fs::read_to_string(path).map_err(|e| CollectionError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let doc = parse_document(&source).map_err(|e| CollectionError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let slug_override = doc.frontmatter.as_ref().and_then(|f| f.slug.clone());
        let slugs = match slug_override {
            Some(slug) if slug.split('/').any(|s| is_dot_segment(s.trim())) => {
                return Err(CollectionError::InvalidSlug {
                    path: path.display().to_string(),
                    slug,
                });
            }
            Some(slug) => normalize_path([slug]),
            None => page_slugs(relative),
        };

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled");

        let mut page = Page::from_document(slugs, doc, stem);
        page.source_path = Some(path.to_path_buf());

        tracing::debug!("Loaded page {} from {}", page.path.join("/"), path.display());
        collection.pages.push(page);
    }

    tracing::info!(
        "Loaded {} pages and {} folder entries from {}",
        collection.pages.len(),
        collection.folders.len(),
        docs_dir.display()
    );

    Ok(collection)
}

fn read_meta(path: &Path) -> Result<FolderMeta, CollectionError> {
    let content = fs::read_to_string(path).map_err(|e| CollectionError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| CollectionError::InvalidMeta {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Slugs for a page file relative to the docs directory.
///
/// `guide/setup.mdx` becomes `["guide", "setup"]`, `guide/index.mdx` becomes
/// `["guide"]`.
pub fn page_slugs(relative: &Path) -> Vec<String> {
    let mut slugs = relative_segments(&relative.with_extension(""));
    if slugs.last().map(String::as_str) == Some("index") {
        slugs.pop();
    }
    slugs
}

fn relative_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str().map(str::to_string),
            _ => None,
        })
        .collect()
}
