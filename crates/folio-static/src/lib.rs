//! Static site generator for folio documentation.
//!
//! Renders the landing page and every documentation page of a content source
//! to HTML files, together with assets, a search index and a sitemap.

pub mod assets;
pub mod builder;
pub mod render;
pub mod templates;

pub use assets::AssetPipeline;
pub use builder::{stylesheet_url, BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use render::{Accent, FeatureCard, HomeConfig, RenderOptions, SiteRenderer};
