//! The content source: an indexed, read-only view over a page collection.
//!
//! Everything is computed once in [`ContentSource::new`]. Lookups afterwards
//! are plain map reads, so a source can be shared across threads freely.

use std::collections::{BTreeMap, HashMap};

use folio_icons::{IconResolver, ResolvedIcon};

use crate::collection::{FolderMeta, PageCollection};
use crate::page::{normalize_path, Page};

/// A page entry in the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavPage {
    /// Slug path of the page
    pub path: Vec<String>,
    /// Page URL
    pub url: String,
    /// Display title
    pub title: String,
    /// Resolved page icon
    pub icon: ResolvedIcon,
}

/// A folder entry in the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavFolder {
    /// Folder name (last path segment)
    pub name: String,
    /// Slug path of the folder
    pub path: Vec<String>,
    /// Display title
    pub title: String,
    /// Resolved folder icon
    pub icon: ResolvedIcon,
    /// The folder's own index page, if it has one in navigation
    pub index: Option<NavPage>,
    /// Ordered children
    pub children: Vec<NavNode>,
}

/// A node of the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NavNode {
    Page(NavPage),
    Folder(NavFolder),
}

impl NavNode {
    /// Display title of the node.
    pub fn title(&self) -> &str {
        match self {
            Self::Page(page) => &page.title,
            Self::Folder(folder) => &folder.title,
        }
    }
}

/// Indexed documentation pages rooted under a base URL.
#[derive(Debug, Clone)]
pub struct ContentSource {
    base_url: String,
    pages: BTreeMap<Vec<String>, Page>,
    urls: HashMap<String, Vec<String>>,
    tree: Vec<NavNode>,
    resolver: IconResolver,
}

impl ContentSource {
    /// Index a page collection.
    ///
    /// When two pages share a path the first one wins. An empty collection
    /// gives an empty source.
    pub fn new(base_url: &str, collection: PageCollection, resolver: IconResolver) -> Self {
        let base_url = normalize_base_url(base_url);
        let mut pages: BTreeMap<Vec<String>, Page> = BTreeMap::new();

        for mut page in collection.pages {
            // Pages built by hand may carry `a/b` style or dot segments.
            page.path = normalize_path(&page.path);
            if let Some(existing) = pages.get(&page.path) {
                tracing::warn!(
                    "Duplicate page path /{}: keeping \"{}\", dropping \"{}\"",
                    page.path.join("/"),
                    existing.title,
                    page.title
                );
                continue;
            }
            pages.insert(page.path.clone(), page);
        }

        let urls = pages
            .keys()
            .map(|path| (join_url(&base_url, path), path.clone()))
            .collect();

        let folders: HashMap<Vec<String>, FolderMeta> = collection
            .folders
            .into_iter()
            .map(|(path, meta)| (normalize_path(&path), meta))
            .collect();

        let tree = TreeBuilder {
            base_url: &base_url,
            pages: &pages,
            folders: &folders,
            resolver: &resolver,
        }
        .build();

        tracing::debug!("Indexed {} pages under {}", pages.len(), base_url);

        Self {
            base_url,
            pages,
            urls,
            tree,
            resolver,
        }
    }

    /// Base URL all page URLs start with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a page by slug path. The root page has an empty path.
    pub fn lookup_page<S: AsRef<str>>(&self, path: &[S]) -> Option<&Page> {
        let key = normalize_path(path);
        self.pages.get(&key)
    }

    /// Look up a page by URL. A trailing slash is ignored.
    pub fn page_by_url(&self, url: &str) -> Option<&Page> {
        let trimmed = url.trim_end_matches('/');
        let key = if trimmed.is_empty() { "/" } else { trimmed };
        self.urls.get(key).and_then(|path| self.pages.get(path))
    }

    /// URL of a page path.
    pub fn url_for(&self, path: &[String]) -> String {
        join_url(&self.base_url, path)
    }

    /// Ordered navigation tree.
    pub fn navigation_tree(&self) -> &[NavNode] {
        &self.tree
    }

    /// All pages, ordered by path.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Number of indexed pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no pages are indexed.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Resolve an icon name with the injected resolver.
    pub fn resolve_icon(&self, name: Option<&str>) -> ResolvedIcon {
        self.resolver.resolve(name)
    }

    /// The icon resolver this source was built with.
    pub fn resolver(&self) -> &IconResolver {
        &self.resolver
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn join_url(base_url: &str, path: &[String]) -> String {
    if path.is_empty() {
        return base_url.to_string();
    }
    let prefix = base_url.trim_end_matches('/');
    format!("{}/{}", prefix, path.join("/"))
}

/// Pages and subfolders of one folder, before ordering.
#[derive(Default)]
struct FolderEntries<'a> {
    pages: Vec<&'a Page>,
    folders: BTreeMap<String, FolderEntries<'a>>,
}

impl<'a> FolderEntries<'a> {
    fn folder_mut(&mut self, path: &[String]) -> &mut FolderEntries<'a> {
        let mut current = self;
        for segment in path {
            current = current.folders.entry(segment.clone()).or_default();
        }
        current
    }
}

/// Sort key: explicit meta position, then frontmatter order, then name.
type OrderKey = (usize, i64, String);

struct TreeBuilder<'a> {
    base_url: &'a str,
    pages: &'a BTreeMap<Vec<String>, Page>,
    folders: &'a HashMap<Vec<String>, FolderMeta>,
    resolver: &'a IconResolver,
}

impl<'a> TreeBuilder<'a> {
    fn build(&self) -> Vec<NavNode> {
        let mut root = FolderEntries::default();

        for page in self.pages.values().filter(|p| p.nav) {
            if let Some((_, parent)) = page.path.split_last() {
                root.folder_mut(parent).pages.push(page);
            }
        }

        let mut nodes = Vec::new();
        if let Some(index) = self.pages.get(&[] as &[String]).filter(|p| p.nav) {
            nodes.push(NavNode::Page(self.nav_page(index)));
        }
        nodes.extend(self.children(&[], root));
        nodes
    }

    fn children(&self, path: &[String], entries: FolderEntries<'a>) -> Vec<NavNode> {
        let meta = self.folders.get(path);
        let mut keyed: Vec<(OrderKey, NavNode)> = Vec::new();

        for page in entries.pages {
            // A page named like a sibling folder is that folder's index.
            if entries.folders.contains_key(page.name()) {
                continue;
            }
            let key = order_key(meta, page.name(), page.order);
            keyed.push((key, NavNode::Page(self.nav_page(page))));
        }

        for (name, folder_entries) in entries.folders {
            let mut folder_path = path.to_vec();
            folder_path.push(name);
            let index = self.pages.get(&folder_path);
            let folder = self.nav_folder(folder_path, index, folder_entries);
            let key = order_key(meta, &folder.name, index.and_then(|p| p.order));
            keyed.push((key, NavNode::Folder(folder)));
        }

        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, node)| node).collect()
    }

    fn nav_folder(
        &self,
        path: Vec<String>,
        index: Option<&'a Page>,
        entries: FolderEntries<'a>,
    ) -> NavFolder {
        let name = path.last().cloned().unwrap_or_default();
        let meta = self.folders.get(&path);

        let title = meta
            .and_then(|m| m.title.clone())
            .or_else(|| index.map(|p| p.title.clone()))
            .unwrap_or_else(|| capitalize(&name));
        let icon_name = meta
            .and_then(|m| m.icon.as_deref())
            .or_else(|| index.and_then(|p| p.icon.as_deref()));

        let children = self.children(&path, entries);

        NavFolder {
            title,
            icon: self.resolver.resolve(icon_name),
            index: index.filter(|p| p.nav).map(|p| self.nav_page(p)),
            children,
            name,
            path,
        }
    }

    fn nav_page(&self, page: &Page) -> NavPage {
        NavPage {
            path: page.path.clone(),
            url: join_url(self.base_url, &page.path),
            title: page.title.clone(),
            icon: self.resolver.resolve(page.icon.as_deref()),
        }
    }
}

fn order_key(meta: Option<&FolderMeta>, name: &str, order: Option<i32>) -> OrderKey {
    let position = meta
        .and_then(|m| m.pages.iter().position(|p| p == name))
        .unwrap_or(usize::MAX);
    let order = order.map(i64::from).unwrap_or(i64::MAX);
    (position, order, name.to_string())
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
