//! Documentation content: page parsing, collection loading and the content source.
//!
//! Pages are Markdown/MDX files with YAML frontmatter. A [`PageCollection`] is
//! loaded from a docs directory and indexed once by [`ContentSource`], which
//! answers page lookups and produces the sidebar navigation tree.

pub mod collection;
pub mod page;
pub mod parser;
pub mod source;

pub use collection::{load_collection, CollectionError, FolderMeta, PageCollection};
pub use page::Page;
pub use parser::{parse_document, slugify, Frontmatter, ParseError, ParsedDoc, TocEntry};
pub use source::{ContentSource, NavFolder, NavNode, NavPage};
