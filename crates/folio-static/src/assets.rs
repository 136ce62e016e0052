//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Folio default theme */

:root {
  --background: #ffffff;
  --foreground: #0a0a0a;
  --muted: #f4f4f5;
  --muted-foreground: #71717a;
  --card: #fafafa;
  --border: #e4e4e7;
  --primary: #2563eb;
  --primary-foreground: #ffffff;
  --radius: 0.5rem;
  --sidebar-width: 280px;
  --toc-width: 220px;
  --content-max-width: 780px;
  --accent-blue: #2563eb;
  --accent-green: #16a34a;
  --accent-purple: #9333ea;
  --accent-orange: #ea580c;
}

@media (prefers-color-scheme: dark) {
  :root {
    --background: #0a0a0a;
    --foreground: #fafafa;
    --muted: #18181b;
    --muted-foreground: #a1a1aa;
    --card: #111113;
    --border: #27272a;
    --accent-blue: #60a5fa;
    --accent-green: #4ade80;
    --accent-purple: #c084fc;
    --accent-orange: #fb923c;
  }
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.lucide {
  width: 1em;
  height: 1em;
  flex-shrink: 0;
  vertical-align: -0.125em;
}

/* Home */
.home {
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  min-height: 80vh;
  padding: 2.5rem 1.5rem;
  text-align: center;
}

.hero {
  max-width: 56rem;
  margin: 0 auto;
}

.badge {
  display: inline-flex;
  align-items: center;
  gap: 0.5rem;
  border: 1px solid var(--border);
  border-radius: 9999px;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  font-weight: 500;
  background: var(--muted);
  color: var(--muted-foreground);
  margin-bottom: 1.5rem;
}

.headline {
  font-size: clamp(1.875rem, 5vw, 3rem);
  font-weight: 700;
  letter-spacing: -0.025em;
  margin-bottom: 1.5rem;
}

.headline-accent {
  background: linear-gradient(to right, #2563eb, #9333ea);
  -webkit-background-clip: text;
  background-clip: text;
  color: transparent;
}

.subtitle {
  font-size: 1.125rem;
  color: var(--muted-foreground);
  max-width: 42rem;
  margin: 0 auto 2rem;
}

.cta {
  display: inline-flex;
  align-items: center;
  gap: 0.5rem;
  border-radius: var(--radius);
  background: var(--primary);
  color: var(--primary-foreground);
  padding: 0.75rem 1.5rem;
  font-size: 0.875rem;
  font-weight: 500;
  text-decoration: none;
  margin-bottom: 3rem;
}

.features {
  display: grid;
  grid-template-columns: repeat(2, minmax(0, 1fr));
  gap: 1.5rem;
  max-width: 56rem;
  margin: 0 auto 2rem;
}

.feature {
  display: flex;
  flex-direction: column;
  align-items: center;
  padding: 1.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--card);
}

.feature-icon {
  display: inline-flex;
  border-radius: 9999px;
  padding: 0.75rem;
  margin-bottom: 1rem;
  font-size: 1.5rem;
}

.feature-icon.accent-blue { color: var(--accent-blue); background: rgba(37, 99, 235, 0.12); }
.feature-icon.accent-green { color: var(--accent-green); background: rgba(22, 163, 74, 0.12); }
.feature-icon.accent-purple { color: var(--accent-purple); background: rgba(147, 51, 234, 0.12); }
.feature-icon.accent-orange { color: var(--accent-orange); background: rgba(234, 88, 12, 0.12); }

.feature h3 {
  font-weight: 600;
  margin-bottom: 0.5rem;
}

.feature p {
  font-size: 0.875rem;
  color: var(--muted-foreground);
}

/* Docs layout */
.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  border-right: 1px solid var(--border);
  background: var(--muted);
  padding: 1.5rem 1rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.nav-logo {
  display: block;
  font-weight: 700;
  font-size: 1.125rem;
  color: var(--foreground);
  text-decoration: none;
  margin-bottom: 1.5rem;
}

.nav-list,
.nav-children {
  list-style: none;
}

.nav-children {
  margin-left: 0.75rem;
  padding-left: 0.5rem;
  border-left: 1px solid var(--border);
}

.nav-item a,
.nav-folder-title {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  padding: 0.375rem 0.625rem;
  font-size: 0.875rem;
  color: var(--muted-foreground);
  text-decoration: none;
  border-radius: var(--radius);
}

.nav-folder-title {
  font-weight: 600;
  color: var(--foreground);
}

.nav-item a:hover {
  color: var(--foreground);
}

.nav-item.active > a {
  color: var(--primary);
  font-weight: 500;
}

.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2.5rem 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.doc {
  max-width: var(--content-max-width);
}

.doc-header {
  margin-bottom: 2rem;
}

.doc-title {
  display: flex;
  align-items: center;
  gap: 0.75rem;
  font-size: 2rem;
  font-weight: 700;
}

.doc-description {
  color: var(--muted-foreground);
  font-size: 1.125rem;
  margin-top: 0.5rem;
}

.content h1,
.content h2,
.content h3 {
  margin: 2rem 0 1rem;
  scroll-margin-top: 1rem;
}

.content p,
.content ul,
.content ol,
.content table {
  margin-bottom: 1rem;
}

.content ul,
.content ol {
  padding-left: 1.5rem;
}

.content a {
  color: var(--primary);
  text-underline-offset: 4px;
}

.content pre {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
  margin-bottom: 1rem;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
}

.content :not(pre) > code {
  background: var(--muted);
  padding: 0.125rem 0.375rem;
  border-radius: 0.25rem;
}

.toc {
  position: sticky;
  top: 2.5rem;
  align-self: start;
}

.toc h2 {
  font-size: 0.75rem;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  color: var(--muted-foreground);
  margin-bottom: 0.75rem;
}

.toc ul {
  list-style: none;
}

.toc a {
  font-size: 0.875rem;
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc-level-3 { padding-left: 0.75rem; }
.toc-level-4 { padding-left: 1.5rem; }

.not-found {
  text-align: center;
  padding: 6rem 1.5rem;
}

@media (max-width: 1024px) {
  .layout,
  .main,
  .features {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
  }

  .toc {
    display: none;
  }
}
"#;

const DEFAULT_JS: &str = r#"(function() {
  'use strict';

  // Keep the active sidebar entry in view
  const active = document.querySelector('.nav-item.active');
  if (active) {
    active.scrollIntoView({ block: 'nearest' });
  }

  // Highlight the heading currently in view
  const links = Array.from(document.querySelectorAll('.toc a'));
  if (links.length === 0 || !('IntersectionObserver' in window)) {
    return;
  }

  const observer = new IntersectionObserver(entries => {
    entries.forEach(entry => {
      if (!entry.isIntersecting) return;
      links.forEach(link => {
        const current = link.getAttribute('href') === '#' + entry.target.id;
        link.classList.toggle('current', current);
      });
    });
  }, { rootMargin: '0px 0px -70% 0px' });

  links.forEach(link => {
    const target = document.getElementById(link.getAttribute('href').slice(1));
    if (target) observer.observe(target);
  });
})();
"#;
