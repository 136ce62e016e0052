//! Static site builder.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rayon::prelude::*;

use folio_content::{load_collection, CollectionError, ContentSource, Page};
use folio_icons::IconResolver;

use crate::assets::AssetPipeline;
use crate::render::{HomeConfig, RenderOptions, SiteRenderer};

/// Bytes kept as-is in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Source docs directory
    pub docs_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// URL prefix of documentation pages
    pub base_url: String,

    /// Public origin used for absolute sitemap URLs (e.g. `https://docs.example.com`)
    pub site_url: String,

    /// Site title
    pub title: String,

    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,

    /// Landing page content
    pub home: HomeConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/docs".to_string(),
            site_url: String::new(),
            title: "Documentation".to_string(),
            styles: vec![],
            home: HomeConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Rendering settings derived from this build configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            site_title: self.title.clone(),
            styles: self
                .styles
                .iter()
                .map(|s| stylesheet_url(s))
                .collect(),
            scripts: vec![],
            home: self.home.clone(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of documentation pages generated
    pub pages: usize,

    /// Whether the landing page was written
    pub home: bool,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load content: {0}")]
    ContentError(#[from] CollectionError),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    resolver: IconResolver,
    renderer: SiteRenderer,
}

impl StaticBuilder {
    /// Create a builder using the built-in icon library.
    pub fn new(config: BuildConfig) -> Self {
        Self::with_resolver(config, IconResolver::builtin())
    }

    /// Create a builder with a specific icon resolver.
    pub fn with_resolver(config: BuildConfig, resolver: IconResolver) -> Self {
        let renderer = SiteRenderer::new(config.render_options());
        Self {
            config,
            resolver,
            renderer,
        }
    }

    /// Load the docs directory and build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let collection = load_collection(&self.config.docs_dir)?;
        let source = ContentSource::new(&self.config.base_url, collection, self.resolver.clone());

        let mut result = self.write_site(&source)?;
        result.duration_ms = start.elapsed().as_millis() as u64;

        Ok(result)
    }

    /// Write every output file for an already indexed content source.
    pub fn write_site(&self, source: &ContentSource) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // With docs mounted at the root the docs index owns index.html.
        let home = source.base_url() != "/";
        if home {
            let html = self
                .renderer
                .render_home(source)
                .map_err(|e| BuildError::TemplateError(e.to_string()))?;
            write_file(&self.config.output_dir.join("index.html"), &html)?;
        } else {
            tracing::info!("Docs are served from /, skipping the landing page");
        }

        let pages: Vec<&Page> = source.pages().collect();
        let written = pages
            .par_iter()
            .map(|page| self.build_page(source, page))
            .collect::<Result<Vec<()>, BuildError>>()?
            .len();

        let not_found = self
            .renderer
            .render_not_found(source)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&self.config.output_dir.join("404.html"), &not_found)?;

        self.generate_assets()?;
        self.generate_search_index(source)?;
        self.generate_sitemap(source, home)?;

        Ok(BuildResult {
            pages: written,
            home,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render and write a single documentation page.
    fn build_page(&self, source: &ContentSource, page: &Page) -> Result<(), BuildError> {
        let html = self
            .renderer
            .render_page(source, page)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.title, e)))?;

        let output_path = self.output_path(&source.url_for(&page.path))?;
        tracing::debug!("Writing {}", output_path.display());

        write_file(&output_path, &html)
    }

    /// Output file for a page URL: `/docs/auth` -> `dist/docs/auth/index.html`.
    ///
    /// Fails for URLs that would resolve outside the output directory.
    fn output_path(&self, url: &str) -> Result<PathBuf, BuildError> {
        let relative = Path::new(url.trim_matches('/'));
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(BuildError::WriteError(format!(
                "{}: page URL leaves the output directory",
                url
            )));
        }
        Ok(self.config.output_dir.join(relative).join("index.html"))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&assets_dir.join("main.css"), &css)?;
        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())?;

        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if !source_path.exists() {
                tracing::warn!("Stylesheet not found: {}", style_path);
                continue;
            }

            let content = fs::read_to_string(&source_path).map_err(|e| BuildError::ReadError {
                path: style_path.clone(),
                message: e.to_string(),
            })?;
            let content = if self.config.minify {
                AssetPipeline::minify_css(&content).unwrap_or(content)
            } else {
                content
            };
            write_file(&assets_dir.join(stylesheet_name(style_path)), &content)?;
            tracing::info!("Copied stylesheet from {}", style_path);
        }

        Ok(())
    }

    /// Generate search index.
    fn generate_search_index(&self, source: &ContentSource) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = source
            .pages()
            .map(|page| {
                let icon = source
                    .resolve_icon(page.icon.as_deref())
                    .element()
                    .map(|element| element.kind().name());
                let headings: Vec<&str> = page.toc.iter().map(|e| e.title.as_str()).collect();

                serde_json::json!({
                    "title": page.title,
                    "description": page.description.clone().unwrap_or_default(),
                    "url": source.url_for(&page.path),
                    "icon": icon,
                    "headings": headings,
                    "content": page.summary,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("search-index.json"), &json)
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, source: &ContentSource, home: bool) -> Result<(), BuildError> {
        let origin = self.config.site_url.trim_end_matches('/');

        let mut urls = Vec::new();
        if home {
            urls.push("/".to_string());
        }
        urls.extend(source.pages().map(|page| source.url_for(&page.path)));

        let entries: Vec<String> = urls
            .iter()
            .map(|url| {
                let loc = format!("{}{}", origin, encode_url_path(url));
                format!("  <url>\n    <loc>{}</loc>\n  </url>", escape_xml(&loc))
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            entries.join("\n")
        );
        write_file(&self.config.output_dir.join("sitemap.xml"), &sitemap)?;

        let robots = format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n", origin);
        write_file(&self.config.output_dir.join("robots.txt"), &robots)
    }
}

/// Percent-encode each segment of a URL path.
fn encode_url_path(url: &str) -> String {
    url.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Public URL of a configured stylesheet once copied into the assets directory.
pub fn stylesheet_url(path: &str) -> String {
    format!("/assets/{}", stylesheet_name(path))
}

fn stylesheet_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("style.css")
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::PageCollection;
    use tempfile::tempdir;

    fn write_docs(docs: &Path) {
        fs::create_dir_all(docs.join("auth")).unwrap();
        fs::write(
            docs.join("index.mdx"),
            "---\ntitle: Introduction\nicon: BookOpenIcon\n---\n# Welcome\n\nStart here.",
        )
        .unwrap();
        fs::write(
            docs.join("auth/login.mdx"),
            "---\ntitle: Login\nicon: KeyIcon\n---\n## Request\n\nSend credentials.",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn builds_site() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        let builder = StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out.clone(),
            ..Default::default()
        });
        let result = builder.build().await.unwrap();

        assert_eq!(result.pages, 2);
        assert!(result.home);
        assert!(out.join("index.html").exists());
        assert!(out.join("docs/index.html").exists());
        assert!(out.join("docs/auth/login/index.html").exists());
        assert!(out.join("404.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("assets/main.js").exists());

        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("JWT Authentication"));

        let login = fs::read_to_string(out.join("docs/auth/login/index.html")).unwrap();
        assert!(login.contains("lucide-key"));
        assert!(login.contains(r#"id="request""#));
    }

    #[tokio::test]
    async fn generates_search_index() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out.clone(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&index).unwrap();

        assert_eq!(entries.len(), 2);
        let login = entries.iter().find(|e| e["title"] == "Login").unwrap();
        assert_eq!(login["url"], "/docs/auth/login");
        assert_eq!(login["icon"], "Key");
        assert_eq!(login["headings"][0], "Request");
        assert_eq!(login["content"], "Send credentials.");
    }

    #[tokio::test]
    async fn generates_sitemap_with_origin() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out.clone(),
            site_url: "https://auth.example.com/".to_string(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://auth.example.com/</loc>"));
        assert!(sitemap.contains("<loc>https://auth.example.com/docs/auth/login</loc>"));

        let robots = fs::read_to_string(out.join("robots.txt")).unwrap();
        assert!(robots.contains("Sitemap: https://auth.example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn docs_at_root_replace_home() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);

        let result = StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out.clone(),
            base_url: "/".to_string(),
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        assert!(!result.home);
        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("Welcome"));
        assert!(out.join("auth/login/index.html").exists());
    }

    #[tokio::test]
    async fn copies_configured_stylesheets() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");
        write_docs(&docs);
        let theme = temp.path().join("theme.css");
        fs::write(&theme, ".brand { color: red; }").unwrap();

        StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out.clone(),
            minify: false,
            styles: vec![theme.display().to_string()],
            ..Default::default()
        })
        .build()
        .await
        .unwrap();

        assert!(out.join("assets/theme.css").exists());
        let page = fs::read_to_string(out.join("docs/index.html")).unwrap();
        assert!(page.contains("theme.css"));
    }

    #[tokio::test]
    async fn rejects_slug_escaping_output_dir() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("site/docs");
        let out = temp.path().join("site/dist");
        fs::create_dir_all(&docs).unwrap();
        fs::write(
            docs.join("evil.mdx"),
            "---\ntitle: Evil\nslug: ../../../escaped\n---\nBody",
        )
        .unwrap();

        let result = StaticBuilder::new(BuildConfig {
            docs_dir: docs,
            output_dir: out,
            ..Default::default()
        })
        .build()
        .await;

        assert!(matches!(
            result,
            Err(BuildError::ContentError(CollectionError::InvalidSlug { .. }))
        ));
        assert!(!temp.path().join("escaped").exists());
    }

    #[test]
    fn hand_built_dot_segments_stay_inside_output_dir() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("site/dist");
        let source = ContentSource::new(
            "/docs",
            PageCollection::from_pages([Page::new(["..", "..", "escaped"], "Escaped")]),
            IconResolver::builtin(),
        );

        let result = StaticBuilder::new(BuildConfig {
            output_dir: out.clone(),
            ..Default::default()
        })
        .write_site(&source)
        .unwrap();

        assert_eq!(result.pages, 1);
        assert!(out.join("docs/escaped/index.html").exists());
        assert!(!temp.path().join("escaped").exists());
    }

    #[test]
    fn rejects_base_url_leaving_output_dir() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let source = ContentSource::new(
            "/../outside",
            PageCollection::from_pages([Page::new(["page"], "Page")]),
            IconResolver::builtin(),
        );

        let result = StaticBuilder::new(BuildConfig {
            output_dir: out,
            ..Default::default()
        })
        .write_site(&source);

        assert!(matches!(result, Err(BuildError::WriteError(_))));
        assert!(!temp.path().join("outside").exists());
    }

    #[test]
    fn sitemap_locations_are_encoded() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("dist");
        let source = ContentSource::new(
            "/docs",
            PageCollection::from_pages([Page::new(["Q&A", "getting started"], "Start")]),
            IconResolver::builtin(),
        );

        StaticBuilder::new(BuildConfig {
            output_dir: out.clone(),
            site_url: "https://auth.example.com".to_string(),
            ..Default::default()
        })
        .write_site(&source)
        .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://auth.example.com/docs/Q%26A/getting%20started</loc>"));
        assert!(!sitemap.contains("Q&A"));
        assert!(out.join("docs/Q&A/getting started/index.html").exists());
    }

    #[test]
    fn escapes_xml_special_characters() {
        assert_eq!(escape_xml("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
        assert_eq!(encode_url_path("/docs/über uns"), "/docs/%C3%BCber%20uns");
    }

    #[tokio::test]
    async fn fails_on_missing_docs_dir() {
        let temp = tempdir().unwrap();

        let result = StaticBuilder::new(BuildConfig {
            docs_dir: temp.path().join("missing"),
            output_dir: temp.path().join("dist"),
            ..Default::default()
        })
        .build()
        .await;

        assert!(matches!(result, Err(BuildError::ContentError(_))));
    }
}
