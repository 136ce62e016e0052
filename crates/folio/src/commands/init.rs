//! Initialize documentation in a project.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigFile;

/// Run the init command.
///
/// Sample pages go to the docs directory named by an existing config file,
/// or `docs` when there is none.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let docs_dir = ConfigFile::load(config_path)?.docs_dir();
    if docs_dir.exists() && !yes {
        tracing::warn!(
            "{} directory already exists. Use --yes to overwrite.",
            docs_dir.display()
        );
        return Ok(());
    }

    let created = scaffold(&docs_dir, config_path, yes)?;
    for path in &created {
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the config file and sample pages, keeping existing files unless `overwrite`.
fn scaffold(docs_dir: &Path, config_path: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let config = default_config(docs_dir);
    let files = [
        (config_path.to_path_buf(), config.as_str()),
        (docs_dir.join("index.mdx"), DEFAULT_INDEX),
        (docs_dir.join("getting-started.mdx"), DEFAULT_GETTING_STARTED),
        (docs_dir.join("auth/meta.json"), DEFAULT_AUTH_META),
        (docs_dir.join("auth/login.mdx"), DEFAULT_LOGIN),
        (docs_dir.join("auth/register.mdx"), DEFAULT_REGISTER),
    ];

    let mut created = Vec::new();
    for (path, contents) in files {
        if path.exists() && !overwrite {
            continue;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        created.push(path);
    }

    Ok(created)
}

/// Default config file pointing at `docs_dir`.
fn default_config(docs_dir: &Path) -> String {
    let dir = toml::Value::String(docs_dir.to_string_lossy().into_owned());
    DEFAULT_CONFIG.replace("dir = \"docs\"", &format!("dir = {}", dir))
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[docs]
# Source directory for documentation
dir = "docs"

# Output directory for built site
output = "dist"

# Site title
title = "Django Cookie Auth"

# URL prefix of the documentation pages; the landing page lives at /
base_url = "/docs"

# Public origin used for sitemap URLs
site_url = ""

[build]
# Enable minification
minify = true

# The landing page defaults to a headline, a call to action and four feature
# cards. Override any part of it here:
#
# [home]
# headline = "Django Cookie"
# headline_accent = " Auth"
# cta_label = "Get Started"
#
# [[home.features]]
# title = "JWT Authentication"
# description = "Secure JWT tokens with HTTP-only cookies"
# icon = "KeyIcon"
# accent = "blue"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Introduction
description: Cookie based authentication for Django REST Framework
icon: BookOpenIcon
---

# Introduction

Complete authentication backend with JWT tokens, phone-based registration,
and secure OTP verification.

## Next steps

Read [Getting Started](/docs/getting-started) to install the backend.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"---
title: Getting Started
icon: RocketIcon
order: 1
---

# Getting Started

## Installation

```bash
pip install django-cookie-auth
```

## Writing Documentation

Create `.md` or `.mdx` files in the `docs/` directory. Frontmatter sets the
title, the sidebar icon and the position:

```yaml
---
title: Page Title
icon: KeyIcon
order: 1
---
```

Icons use the names exported by the icon library, such as `KeyIcon`,
`PhoneIcon` or `ShieldCheckIcon`. Unknown names are shown without an icon.

Folders can carry a `meta.json` with a title, an icon and the page order.
"#;

const DEFAULT_AUTH_META: &str = r#"{
  "title": "Authentication",
  "icon": "ShieldCheckIcon",
  "pages": ["login", "register"]
}
"#;

const DEFAULT_LOGIN: &str = r#"---
title: Login
description: Exchange credentials for HTTP-only JWT cookies
icon: LogInIcon
---

# Login

## Request

```http
POST /api/auth/login/
```

## Response

On success the access and refresh tokens are set as HTTP-only cookies.
"#;

const DEFAULT_REGISTER: &str = r#"---
title: Register
description: Phone-based registration with OTP verification
icon: PhoneIcon
---

# Register

## Request an OTP

```http
POST /api/auth/register/
```

## Verify

Submit the code received by SMS to activate the account.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::{load_collection, ContentSource, NavNode};
    use folio_icons::IconResolver;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_loadable_docs() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let config = temp.path().join("docs.toml");

        let created = scaffold(&docs, &config, false).unwrap();

        assert_eq!(created.len(), 6);
        assert!(config.exists());

        let source = ContentSource::new(
            "/docs",
            load_collection(&docs).unwrap(),
            IconResolver::builtin(),
        );
        assert_eq!(source.len(), 5);

        let tree = source.navigation_tree();
        assert_eq!(tree[0].title(), "Introduction");
        match tree.last().unwrap() {
            NavNode::Folder(folder) => {
                assert_eq!(folder.title, "Authentication");
                assert!(!folder.icon.is_none());
                assert_eq!(folder.children[0].title(), "Login");
                assert_eq!(folder.children[1].title(), "Register");
            }
            other => panic!("expected auth folder, got {:?}", other),
        }
    }

    #[test]
    fn scaffolded_config_names_the_docs_dir() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("content").join("guides");
        let config = temp.path().join("docs.toml");

        scaffold(&docs, &config, false).unwrap();

        assert!(docs.join("index.mdx").exists());
        assert!(!temp.path().join("docs").exists());
        assert_eq!(ConfigFile::load(&config).unwrap().docs_dir(), docs);
    }

    #[test]
    fn overwriting_keeps_the_configured_dir() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("handbook");
        let config = temp.path().join("docs.toml");
        let existing = format!(
            "[docs]\ndir = {}\n",
            toml::Value::String(docs.to_string_lossy().into_owned())
        );
        fs::write(&config, existing).unwrap();

        let docs_dir = ConfigFile::load(&config).unwrap().docs_dir();
        scaffold(&docs_dir, &config, true).unwrap();

        assert!(docs.join("auth/login.mdx").exists());
        let reloaded = ConfigFile::load(&config).unwrap();
        assert_eq!(reloaded.docs_dir(), docs);
        assert_eq!(reloaded.docs.title, "Django Cookie Auth");
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let config = temp.path().join("docs.toml");
        fs::write(&config, "[docs]\ntitle = \"Mine\"\n").unwrap();

        let created = scaffold(&docs, &config, false).unwrap();

        assert!(!created.contains(&config));
        assert_eq!(fs::read_to_string(&config).unwrap(), "[docs]\ntitle = \"Mine\"\n");

        scaffold(&docs, &config, true).unwrap();
        assert!(fs::read_to_string(&config).unwrap().contains("Django Cookie Auth"));
    }
}
