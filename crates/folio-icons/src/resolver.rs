//! Resolving icon names into renderable elements.

use std::sync::Arc;

use crate::library::IconKind;
use crate::registry::{IconQuery, IconRegistry};

/// A renderable icon with no props applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconElement {
    kind: IconKind,
}

impl IconElement {
    /// Create an element for a known icon.
    pub fn new(kind: IconKind) -> Self {
        Self { kind }
    }

    /// The icon this element draws.
    pub fn kind(&self) -> IconKind {
        self.kind
    }

    /// Render as inline SVG with the library defaults.
    pub fn render(&self) -> String {
        self.render_with_class("")
    }

    /// Render as inline SVG, appending extra CSS classes.
    pub fn render_with_class(&self, class: &str) -> String {
        let slug = self.kind.slug();
        let mut classes = format!("lucide lucide-{}", slug);
        if !class.trim().is_empty() {
            classes.push(' ');
            classes.push_str(&escape_attr(class.trim()));
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{}" aria-hidden="true">{}</svg>"#,
            classes,
            self.kind.body()
        )
    }
}

/// Result of resolving an icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedIcon {
    /// Nothing to draw
    #[default]
    None,

    /// A concrete icon
    Element(IconElement),
}

impl ResolvedIcon {
    /// Check whether there is nothing to draw.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The element, if any.
    pub fn element(&self) -> Option<&IconElement> {
        match self {
            Self::Element(element) => Some(element),
            Self::None => None,
        }
    }

    /// Render to SVG markup, or `None` when there is no icon.
    pub fn to_html(&self) -> Option<String> {
        self.element().map(IconElement::render)
    }
}

/// Resolves icon names against an injected registry.
///
/// Resolution never fails: missing, empty and unknown names all produce
/// [`ResolvedIcon::None`].
#[derive(Debug, Clone)]
pub struct IconResolver {
    registry: Arc<IconRegistry>,
}

impl IconResolver {
    /// Create a resolver over the given registry.
    pub fn new(registry: Arc<IconRegistry>) -> Self {
        Self { registry }
    }

    /// Create a resolver over the built-in icon library.
    pub fn builtin() -> Self {
        Self::new(Arc::new(IconRegistry::builtin()))
    }

    /// The registry this resolver reads from.
    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    /// Resolve an optional icon name.
    pub fn resolve(&self, name: Option<&str>) -> ResolvedIcon {
        match self.registry.classify(name) {
            IconQuery::Known(kind) => ResolvedIcon::Element(IconElement::new(kind)),
            IconQuery::Unknown => {
                tracing::debug!("Unknown icon name: {}", name.unwrap_or_default());
                ResolvedIcon::None
            }
            IconQuery::Absent => ResolvedIcon::None,
        }
    }
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
