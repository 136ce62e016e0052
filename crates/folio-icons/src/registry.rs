//! Icon registry for looking up icons by name.
//!
//! The registry is built once at startup and is read-only afterwards. Share it
//! behind an `Arc` when several renderers need it.

use std::collections::HashMap;

use crate::library::IconKind;

/// Outcome of looking up an icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconQuery {
    /// No name was given (missing or empty).
    Absent,

    /// A name was given but the registry does not know it.
    Unknown,

    /// The name maps to a known icon.
    Known(IconKind),
}

/// A mapping from icon names to known icons.
#[derive(Debug, Clone, Default)]
pub struct IconRegistry {
    /// Icons by exported name (case-sensitive)
    icons: HashMap<String, IconKind>,
}

impl IconRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the whole built-in library under every
    /// exported name.
    pub fn builtin() -> Self {
        Self::from_entries(
            IconKind::ALL
                .iter()
                .flat_map(|kind| kind.export_names().map(move |name| (name, *kind))),
        )
    }

    /// Create a registry from explicit `(name, icon)` pairs.
    ///
    /// Later entries win when a name appears twice.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, IconKind)>,
        S: Into<String>,
    {
        let icons = entries
            .into_iter()
            .map(|(name, kind)| (name.into(), kind))
            .collect();

        Self { icons }
    }

    /// Look up an icon by exact name.
    pub fn get(&self, name: &str) -> Option<IconKind> {
        self.icons.get(name).copied()
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    /// Classify an optional icon name.
    pub fn classify(&self, name: Option<&str>) -> IconQuery {
        match name {
            None => IconQuery::Absent,
            Some(name) if name.is_empty() => IconQuery::Absent,
            Some(name) => match self.get(name) {
                Some(kind) => IconQuery::Known(kind),
                None => IconQuery::Unknown,
            },
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.icons.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether the registry has no names at all.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_every_export_name() {
        let registry = IconRegistry::builtin();

        assert_eq!(registry.len(), IconKind::ALL.len() * 3);
        assert_eq!(registry.get("Key"), Some(IconKind::Key));
        assert_eq!(registry.get("KeyIcon"), Some(IconKind::Key));
        assert_eq!(registry.get("LucideKey"), Some(IconKind::Key));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = IconRegistry::builtin();

        assert!(registry.contains("ShieldCheckIcon"));
        assert!(!registry.contains("shieldcheckicon"));
        assert!(!registry.contains("shield-check"));
    }

    #[test]
    fn classifies_names() {
        let registry =
            IconRegistry::from_entries([("KeyIcon", IconKind::Key), ("PhoneIcon", IconKind::Phone)]);

        assert_eq!(registry.classify(None), IconQuery::Absent);
        assert_eq!(registry.classify(Some("")), IconQuery::Absent);
        assert_eq!(registry.classify(Some("MissingIcon")), IconQuery::Unknown);
        assert_eq!(
            registry.classify(Some("KeyIcon")),
            IconQuery::Known(IconKind::Key)
        );
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = IconRegistry::new();

        assert!(registry.is_empty());
        assert_eq!(registry.classify(Some("Key")), IconQuery::Unknown);
    }

    #[test]
    fn names_are_sorted() {
        let registry =
            IconRegistry::from_entries([("Zap", IconKind::Zap), ("Book", IconKind::Book)]);

        assert_eq!(registry.names(), vec!["Book", "Zap"]);
    }
}
