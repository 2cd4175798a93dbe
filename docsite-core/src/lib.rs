//! # docsite-core
//!
//! Core library for the docsite static documentation generator.
//!
//! This crate scans a tree of markdown sections, renders each page (with
//! admonitions, heading anchors and syntax highlighting), links pages into
//! a navigable site and builds the search index.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod linker;
pub mod markdown;
pub mod models;
pub mod scanner;
pub mod search;
pub mod slug;

pub use builder::{BuildError, BuiltSite, SiteBuilder};
pub use config::{Config, ConfigError, HeaderConfig};
pub use linker::{format_display_date, SiteGraph};
pub use markdown::{MarkdownProcessor, RenderedMarkdown};
pub use models::{
    HeadingNode, NavLink, Page, PageSource, Redirect, RedirectLocation, SidebarPage,
    SidebarSection, SourceDocument,
};
pub use scanner::{scan, ScanError, ScannedSite};
pub use search::{build_search_index, SearchEntry};
pub use slug::slugify;
