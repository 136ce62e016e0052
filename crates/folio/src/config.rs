//! Configuration file (docs.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_server::DevServerConfig;
use folio_static::{BuildConfig, HomeConfig, RenderOptions};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub docs: DocsConfig,
    pub build: BuildSettings,
    /// Landing page content
    pub home: HomeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub dir: String,
    pub output: String,
    pub title: String,
    pub base_url: String,
    /// Public origin used in the sitemap
    pub site_url: String,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            dir: "docs".to_string(),
            output: "dist".to_string(),
            title: "Documentation".to_string(),
            base_url: "/docs".to_string(),
            site_url: String::new(),
            styles: vec![],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self { minify: true }
    }
}

impl ConfigFile {
    /// Load configuration if the file exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Docs directory.
    pub fn docs_dir(&self) -> PathBuf {
        PathBuf::from(&self.docs.dir)
    }

    /// Output directory of the built site, unless overridden on the command line.
    pub fn output_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| PathBuf::from(&self.docs.output))
    }

    /// Settings for a static build; command-line flags take precedence.
    pub fn build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        BuildConfig {
            docs_dir: self.docs_dir(),
            output_dir: self.output_dir(output),
            minify: minify.unwrap_or(self.build.minify),
            base_url: self.docs.base_url.clone(),
            site_url: self.docs.site_url.clone(),
            title: self.docs.title.clone(),
            styles: self.docs.styles.clone(),
            home: self.home.clone(),
        }
    }

    /// Settings for the development server.
    pub fn server_config(&self, port: u16, open: bool) -> DevServerConfig {
        DevServerConfig {
            docs_dir: self.docs_dir(),
            port,
            open,
            base_url: self.docs.base_url.clone(),
            styles: self.docs.styles.clone(),
            render: RenderOptions {
                site_title: self.docs.title.clone(),
                home: self.home.clone(),
                ..RenderOptions::default()
            },
            ..DevServerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_static::{Accent, FeatureCard};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = ConfigFile::load(&temp.path().join("docs.toml")).unwrap();

        assert_eq!(config.docs.dir, "docs");
        assert_eq!(config.docs.base_url, "/docs");
        assert!(config.build.minify);
        assert_eq!(config.home, HomeConfig::default());
    }

    #[test]
    fn parses_partial_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(
            &path,
            r#"
[docs]
title = "Cookie Auth"
base_url = "/guide"

[build]
minify = false

[home]
headline = "Cookie"
features = [
  { title = "Fast", description = "Very fast", icon = "ZapIcon", accent = "green" },
]
"#,
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config.docs.title, "Cookie Auth");
        assert_eq!(config.docs.output, "dist");
        assert!(!config.build.minify);
        assert_eq!(config.home.headline, "Cookie");
        assert_eq!(config.home.cta_label, "Get Started");
        assert_eq!(
            config.home.features,
            vec![FeatureCard {
                title: "Fast".to_string(),
                description: "Very fast".to_string(),
                icon: Some("ZapIcon".to_string()),
                accent: Accent::Green,
            }]
        );
    }

    #[test]
    fn rejects_malformed_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[docs\ntitle = ").unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn flags_override_file_settings() {
        let config = ConfigFile::default();

        let build = config.build_config(Some(PathBuf::from("public")), Some(false));

        assert_eq!(build.output_dir, PathBuf::from("public"));
        assert!(!build.minify);
        assert_eq!(build.base_url, "/docs");
    }

    #[test]
    fn output_dir_follows_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("docs.toml");
        fs::write(&path, "[docs]\noutput = \"public\"\n").unwrap();

        let config = ConfigFile::load(&path).unwrap();

        assert_eq!(config.output_dir(None), PathBuf::from("public"));
        assert_eq!(
            config.output_dir(Some(PathBuf::from("site"))),
            PathBuf::from("site")
        );
        assert_eq!(ConfigFile::default().output_dir(None), PathBuf::from("dist"));
    }

    #[test]
    fn server_config_carries_site_settings() {
        let mut config = ConfigFile::default();
        config.docs.title = "Cookie Auth".to_string();

        let server = config.server_config(8080, false);

        assert_eq!(server.port, 8080);
        assert!(!server.open);
        assert_eq!(server.render.site_title, "Cookie Auth");
        assert_eq!(server.docs_dir, PathBuf::from("docs"));
    }
}
