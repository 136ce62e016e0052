//! Rendering pages from a content source.
//!
//! Shared by the static builder and the dev server so both produce the same
//! markup.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag};
use serde::Deserialize;

use folio_content::{parser::markdown_options, ContentSource, NavNode, NavPage, Page};
use folio_icons::ResolvedIcon;

use crate::templates::{
    DocContext, FeatureView, HomeContext, Layout, NavItem, NotFoundContext, TemplateEngine,
    TocEntry,
};

/// Colour accent of a feature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

impl Accent {
    fn class_suffix(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

/// A feature card on the home page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureCard {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub accent: Accent,
}

impl FeatureCard {
    fn new(title: &str, description: &str, icon: &str, accent: Accent) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            icon: Some(icon.to_string()),
            accent,
        }
    }
}

/// Landing page content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Document title of the home page
    pub title: String,
    pub badge: String,
    pub badge_icon: Option<String>,
    pub headline: String,
    /// Highlighted text appended to the headline
    pub headline_accent: String,
    pub subtitle: String,
    pub cta_label: String,
    /// Call-to-action target; defaults to the docs base URL
    pub cta_href: Option<String>,
    pub cta_icon: Option<String>,
    pub features: Vec<FeatureCard>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            title: "Django Cookie Auth".to_string(),
            badge: "Secure Authentication Backend".to_string(),
            badge_icon: Some("ShieldCheckIcon".to_string()),
            headline: "Django Cookie".to_string(),
            headline_accent: " Auth".to_string(),
            subtitle: "Complete authentication backend with JWT tokens, phone-based registration, \
                       and secure OTP verification. Built with Django REST Framework."
                .to_string(),
            cta_label: "Get Started".to_string(),
            cta_href: None,
            cta_icon: Some("ArrowRightIcon".to_string()),
            features: vec![
                FeatureCard::new(
                    "JWT Authentication",
                    "Secure JWT tokens with HTTP-only cookies",
                    "KeyIcon",
                    Accent::Blue,
                ),
                FeatureCard::new(
                    "Phone Registration",
                    "OTP-based registration with SMS verification",
                    "PhoneIcon",
                    Accent::Green,
                ),
                FeatureCard::new(
                    "Security First",
                    "Rate limiting, validation, and secure flows",
                    "ShieldCheckIcon",
                    Accent::Purple,
                ),
                FeatureCard::new(
                    "User Management",
                    "Complete profile and authentication management",
                    "UserIcon",
                    Accent::Orange,
                ),
            ],
        }
    }
}

/// Site-wide rendering settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Site title shown in the sidebar and page titles
    pub site_title: String,
    /// Extra stylesheet URLs
    pub styles: Vec<String>,
    /// Extra script URLs (the dev server adds its reload client here)
    pub scripts: Vec<String>,
    /// Landing page content
    pub home: HomeConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            site_title: "Documentation".to_string(),
            styles: vec![],
            scripts: vec![],
            home: HomeConfig::default(),
        }
    }
}

/// Renders home, documentation and not-found pages.
pub struct SiteRenderer {
    options: RenderOptions,
    templates: TemplateEngine,
}

impl SiteRenderer {
    /// Create a renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            templates: TemplateEngine::new(),
        }
    }

    /// Rendering settings.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the landing page.
    pub fn render_home(&self, source: &ContentSource) -> Result<String, minijinja::Error> {
        let home = &self.options.home;
        let icon = |name: &Option<String>, class: &str| {
            icon_html(source.resolve_icon(name.as_deref()), class)
        };

        let context = HomeContext {
            layout: self.layout(home.title.clone(), None),
            badge: home.badge.clone(),
            badge_icon: icon(&home.badge_icon, "badge-icon"),
            headline: home.headline.clone(),
            headline_accent: home.headline_accent.clone(),
            subtitle: home.subtitle.clone(),
            cta_label: home.cta_label.clone(),
            cta_href: home
                .cta_href
                .clone()
                .unwrap_or_else(|| source.base_url().to_string()),
            cta_icon: icon(&home.cta_icon, "cta-icon"),
            features: home
                .features
                .iter()
                .map(|feature| FeatureView {
                    title: feature.title.clone(),
                    description: feature.description.clone(),
                    icon: icon(&feature.icon, ""),
                    accent: feature.accent.class_suffix().to_string(),
                })
                .collect(),
        };

        self.templates.render_home(&context)
    }

    /// Render a documentation page.
    pub fn render_page(&self, source: &ContentSource, page: &Page) -> Result<String, minijinja::Error> {
        let url = source.url_for(&page.path);

        let context = DocContext {
            layout: self.layout(
                format!("{} - {}", page.title, self.options.site_title),
                page.description.clone(),
            ),
            title: page.title.clone(),
            icon: icon_html(source.resolve_icon(page.icon.as_deref()), "doc-icon"),
            content: render_markdown(&page.body, &page.toc),
            nav: nav_items(source.navigation_tree(), &url),
            toc: page
                .toc
                .iter()
                .map(|e| TocEntry {
                    title: e.title.clone(),
                    id: e.id.clone(),
                    level: e.level,
                })
                .collect(),
            docs_url: source.base_url().to_string(),
        };

        self.templates.render_doc(&context)
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, source: &ContentSource) -> Result<String, minijinja::Error> {
        let context = NotFoundContext {
            layout: self.layout(
                format!("Not Found - {}", self.options.site_title),
                None,
            ),
            nav: nav_items(source.navigation_tree(), ""),
            docs_url: source.base_url().to_string(),
        };

        self.templates.render_not_found(&context)
    }

    fn layout(&self, document_title: String, description: Option<String>) -> Layout {
        Layout {
            document_title,
            site_title: self.options.site_title.clone(),
            description,
            styles: self.options.styles.clone(),
            scripts: self.options.scripts.clone(),
        }
    }
}

fn icon_html(icon: ResolvedIcon, class: &str) -> Option<String> {
    icon.element().map(|element| element.render_with_class(class))
}

/// Convert the navigation tree into template items, marking `current_url` active.
pub fn nav_items(nodes: &[NavNode], current_url: &str) -> Vec<NavItem> {
    nodes
        .iter()
        .map(|node| match node {
            NavNode::Page(page) => page_item(page, current_url),
            NavNode::Folder(folder) => NavItem {
                title: folder.title.clone(),
                url: folder.index.as_ref().map(|index| index.url.clone()),
                icon: icon_html(folder.icon, "nav-icon"),
                folder: true,
                active: folder
                    .index
                    .as_ref()
                    .is_some_and(|index| index.url == current_url),
                children: nav_items(&folder.children, current_url),
            },
        })
        .collect()
}

fn page_item(page: &NavPage, current_url: &str) -> NavItem {
    NavItem {
        title: page.title.clone(),
        url: Some(page.url.clone()),
        icon: icon_html(page.icon, "nav-icon"),
        folder: false,
        active: page.url == current_url,
        children: Vec::new(),
    }
}

/// Render Markdown to HTML, giving headings the ids listed in the TOC.
pub fn render_markdown(content: &str, toc: &[folio_content::TocEntry]) -> String {
    let mut ids = toc.iter().map(|entry| entry.id.clone());

    let events = Parser::new_ext(content, markdown_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) => {
            let next = ids.next();
            Event::Start(Tag::Heading {
                level,
                id: id.or_else(|| next.map(CowStr::from)),
                classes,
                attrs,
            })
        }
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, events);
    html_output
}
