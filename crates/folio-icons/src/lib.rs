//! Icon library and name resolution.
//!
//! Content authors reference icons by name (for example `icon: KeyIcon` in
//! page frontmatter). This crate maps those names onto a fixed set of known
//! icons and renders them as inline SVG.

pub mod library;
pub mod registry;
pub mod resolver;

pub use library::IconKind;
pub use registry::{IconQuery, IconRegistry};
pub use resolver::{IconElement, IconResolver, ResolvedIcon};
