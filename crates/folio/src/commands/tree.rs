//! Print the navigation tree of the docs directory.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use folio_content::{load_collection, ContentSource, NavNode};
use folio_icons::{IconResolver, ResolvedIcon};

use crate::config::ConfigFile;

/// Run the tree command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = ConfigFile::load(config_path)?;

    let collection = load_collection(&config.docs_dir())
        .with_context(|| format!("Failed to load {}", config.docs.dir))?;
    let source = ContentSource::new(&config.docs.base_url, collection, IconResolver::builtin());

    print!("{}", format_tree(source.navigation_tree()));
    Ok(())
}

/// Render navigation nodes as an indented outline.
fn format_tree(nodes: &[NavNode]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, 0);
    out
}

fn write_nodes(out: &mut String, nodes: &[NavNode], depth: usize) {
    let indent = "  ".repeat(depth);

    for node in nodes {
        match node {
            NavNode::Page(page) => {
                let _ = writeln!(
                    out,
                    "{}{}{} {}",
                    indent,
                    icon_label(page.icon),
                    page.title,
                    page.url
                );
            }
            NavNode::Folder(folder) => {
                let url = folder.index.as_ref().map(|i| i.url.as_str()).unwrap_or("-");
                let _ = writeln!(
                    out,
                    "{}{}{}/ {}",
                    indent,
                    icon_label(folder.icon),
                    folder.title,
                    url
                );
                write_nodes(out, &folder.children, depth + 1);
            }
        }
    }
}

fn icon_label(icon: ResolvedIcon) -> String {
    match icon.element() {
        Some(element) => format!("[{}] ", element.kind().name()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_content::{Page, PageCollection};
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_nested_tree_with_icons() {
        let source = ContentSource::new(
            "/docs",
            PageCollection::from_pages([
                Page::new(Vec::<String>::new(), "Introduction").with_icon("BookOpenIcon"),
                Page::new(["auth", "login"], "Login").with_icon("KeyIcon"),
                Page::new(["auth", "logout"], "Logout").with_icon("NoSuchIcon"),
            ]),
            IconResolver::builtin(),
        );

        let tree = format_tree(source.navigation_tree());

        assert_eq!(
            tree,
            "[BookOpen] Introduction /docs\n\
             Auth/ -\n  \
             [Key] Login /docs/auth/login\n  \
             Logout /docs/auth/logout\n"
        );
    }
}
