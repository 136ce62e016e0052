//! Template engine for rendering site pages.

use minijinja::Environment;
use serde::Serialize;

/// A navigation item ready for the sidebar template.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// Link target; folders without an index page have none
    pub url: Option<String>,
    /// Inline SVG icon markup
    pub icon: Option<String>,
    /// Whether this item groups children
    pub folder: bool,
    /// Whether this is the page being rendered
    pub active: bool,
    /// Child items
    pub children: Vec<NavItem>,
}

/// A table of contents entry.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Values shared by every page layout.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Contents of the `<title>` element
    pub document_title: String,
    /// Site title shown in the sidebar
    pub site_title: String,
    /// Optional meta description
    pub description: Option<String>,
    /// Extra stylesheet URLs
    pub styles: Vec<String>,
    /// Extra script URLs
    pub scripts: Vec<String>,
}

/// Context for a documentation page.
#[derive(Debug, Clone, Serialize)]
pub struct DocContext {
    pub layout: Layout,
    /// Page title
    pub title: String,
    /// Page icon markup
    pub icon: Option<String>,
    /// Rendered content HTML
    pub content: String,
    /// Navigation items
    pub nav: Vec<NavItem>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Docs landing URL
    pub docs_url: String,
}

/// A feature card on the home page.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureView {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    /// CSS accent class suffix
    pub accent: String,
}

/// Context for the home page.
#[derive(Debug, Clone, Serialize)]
pub struct HomeContext {
    pub layout: Layout,
    pub badge: String,
    pub badge_icon: Option<String>,
    pub headline: String,
    pub headline_accent: String,
    pub subtitle: String,
    pub cta_label: String,
    pub cta_href: String,
    pub cta_icon: Option<String>,
    pub features: Vec<FeatureView>,
}

/// Context for the not-found page.
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundContext {
    pub layout: Layout,
    /// Navigation items
    pub nav: Vec<NavItem>,
    /// Docs landing URL
    pub docs_url: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("nav.html", NAV_TEMPLATE),
            ("doc.html", DOC_TEMPLATE),
            ("home.html", HOME_TEMPLATE),
            ("404.html", NOT_FOUND_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("built-in templates are valid");
        }

        Self { env }
    }

    /// Render a documentation page.
    pub fn render_doc(&self, context: &DocContext) -> Result<String, minijinja::Error> {
        self.render("doc.html", context)
    }

    /// Render the home page.
    pub fn render_home(&self, context: &HomeContext) -> Result<String, minijinja::Error> {
        self.render("home.html", context)
    }

    /// Render the not-found page.
    pub fn render_not_found(&self, context: &NotFoundContext) -> Result<String, minijinja::Error> {
        self.render("404.html", context)
    }

    fn render<S: Serialize>(&self, template: &str, context: &S) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ layout.document_title }}</title>
  {% if layout.description %}<meta name="description" content="{{ layout.description }}">
  {% endif %}<link rel="stylesheet" href="/assets/main.css">
  {% for style in layout.styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}
</head>
<body>
  {% block body %}{% endblock %}
  <script src="/assets/main.js"></script>
  {% for script in layout.scripts %}<script src="{{ script }}"></script>
  {% endfor %}
</body>
</html>"##;

const NAV_TEMPLATE: &str = r##"<a href="/" class="nav-logo">{{ layout.site_title }}</a>
<ul class="nav-list">
{% for item in nav recursive %}
  <li class="nav-item{% if item.folder %} nav-folder{% endif %}{% if item.active %} active{% endif %}">
    {% if item.url %}<a href="{{ item.url }}">{% else %}<span class="nav-folder-title">{% endif %}{% if item.icon %}{{ item.icon | safe }}{% endif %}<span>{{ item.title }}</span>{% if item.url %}</a>{% else %}</span>{% endif %}
    {% if item.children %}
    <ul class="nav-children">{{ loop(item.children) }}</ul>
    {% endif %}
  </li>
{% endfor %}
</ul>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="layout">
  <nav class="sidebar">
    {% include "nav.html" %}
  </nav>
  <main class="main">
    <article class="doc">
      <header class="doc-header">
        <h1 class="doc-title">{% if icon %}{{ icon | safe }}{% endif %}{{ title }}</h1>
        {% if layout.description %}<p class="doc-description">{{ layout.description }}</p>{% endif %}
      </header>
      <div class="content">
        {{ content | safe }}
      </div>
    </article>
    {% if toc %}
    <aside class="toc">
      <h2>On this page</h2>
      <ul>
      {% for entry in toc %}
        <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
      {% endfor %}
      </ul>
    </aside>
    {% endif %}
  </main>
</div>
{% endblock %}"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<main class="home">
  <section class="hero">
    <div class="badge">{% if badge_icon %}{{ badge_icon | safe }}{% endif %}{{ badge }}</div>
    <h1 class="headline">{{ headline }}<span class="headline-accent">{{ headline_accent }}</span></h1>
    <p class="subtitle">{{ subtitle }}</p>
    <a class="cta" href="{{ cta_href }}">{{ cta_label }}{% if cta_icon %}{{ cta_icon | safe }}{% endif %}</a>
    <div class="features">
    {% for feature in features %}
      <div class="feature">
        {% if feature.icon %}<div class="feature-icon accent-{{ feature.accent }}">{{ feature.icon | safe }}</div>{% endif %}
        <h3>{{ feature.title }}</h3>
        <p>{{ feature.description }}</p>
      </div>
    {% endfor %}
    </div>
  </section>
</main>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block body %}
<div class="layout">
  <nav class="sidebar">
    {% include "nav.html" %}
  </nav>
  <main class="not-found">
    <h1>Page not found</h1>
    <p>The page you are looking for does not exist. <a href="{{ docs_url }}">Back to the docs</a></p>
  </main>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(title: &str) -> Layout {
        Layout {
            document_title: title.to_string(),
            site_title: "Docs".to_string(),
            description: None,
            styles: vec![],
            scripts: vec![],
        }
    }

    // minijinja escapes `/` inside interpolated values.
    fn decoded(html: String) -> String {
        html.replace("&#x2f;", "/")
    }

    fn item(title: &str, url: &str, children: Vec<NavItem>) -> NavItem {
        NavItem {
            title: title.to_string(),
            url: Some(url.to_string()),
            icon: None,
            folder: !children.is_empty(),
            active: false,
            children,
        }
    }

    #[test]
    fn renders_doc_page() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_doc(&DocContext {
                layout: Layout {
                    description: Some("Sign in".to_string()),
                    ..layout("Login - Docs")
                },
                title: "Login".to_string(),
                icon: Some("<svg class=\"lucide\"></svg>".to_string()),
                content: "<p>Hello world</p>".to_string(),
                nav: vec![],
                toc: vec![TocEntry {
                    title: "Flow".to_string(),
                    id: "flow".to_string(),
                    level: 2,
                }],
                docs_url: "/docs".to_string(),
            })
            .unwrap();

        assert!(html.contains("<title>Login - Docs</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains("<svg class=\"lucide\"></svg>Login"));
        assert!(html.contains(r##"<a href="#flow">Flow</a>"##));
        assert!(html.contains(r#"<meta name="description" content="Sign in">"#));
    }

    #[test]
    fn renders_nested_navigation() {
        let engine = TemplateEngine::new();

        let mut login = item("Login", "/docs/auth/login", vec![]);
        login.active = true;
        let nav = vec![
            item("Introduction", "/docs", vec![]),
            NavItem {
                title: "SMS".to_string(),
                url: None,
                icon: None,
                folder: true,
                active: false,
                children: vec![item("OTP", "/docs/sms/otp", vec![])],
            },
            item("Authentication", "/docs/auth", vec![login]),
        ];

        let html = decoded(
            engine
                .render_not_found(&NotFoundContext {
                    layout: layout("Not found"),
                    nav,
                    docs_url: "/docs".to_string(),
                })
                .unwrap(),
        );

        assert!(html.contains(r#"<a href="/docs/sms/otp">"#));
        assert!(html.contains(r#"<span class="nav-folder-title"><span>SMS</span></span>"#));
        assert!(html.contains(r#"<li class="nav-item active">"#));
        assert!(html.contains("nav-children"));
    }

    #[test]
    fn escapes_text_but_not_markup_fields() {
        let engine = TemplateEngine::new();

        let html = engine
            .render_doc(&DocContext {
                layout: layout("A & B"),
                title: "<script>".to_string(),
                icon: None,
                content: "<em>ok</em>".to_string(),
                nav: vec![],
                toc: vec![],
                docs_url: "/docs".to_string(),
            })
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<em>ok</em>"));
        assert!(html.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn renders_home_features() {
        let engine = TemplateEngine::new();

        let html = decoded(engine
            .render_home(&HomeContext {
                layout: layout("Home"),
                badge: "Beta".to_string(),
                badge_icon: None,
                headline: "Hello".to_string(),
                headline_accent: " World".to_string(),
                subtitle: "Sub".to_string(),
                cta_label: "Start".to_string(),
                cta_href: "/docs".to_string(),
                cta_icon: None,
                features: vec![FeatureView {
                    title: "Fast".to_string(),
                    description: "Very".to_string(),
                    icon: Some("<svg></svg>".to_string()),
                    accent: "green".to_string(),
                }],
            })
            .unwrap());

        assert!(html.contains(r#"<a class="cta" href="/docs">Start</a>"#));
        assert!(html.contains(r#"<div class="feature-icon accent-green"><svg></svg></div>"#));
        assert!(html.contains("<h3>Fast</h3>"));
    }
}
