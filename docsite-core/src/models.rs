//! Content model structs for sources, sections, pages and navigation.

use crate::frontmatter::split_frontmatter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Frontmatter key/value pairs. Keys are lowercased.
pub type Metadata = HashMap<String, String>;

/// A markdown file as read from disk, split into metadata and body.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub raw: String,
    pub metadata: Metadata,
    pub body: String,
}

impl SourceDocument {
    /// Read and split a source file. The file handle is released before
    /// returning.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_raw(path, raw))
    }

    pub fn from_raw(path: impl Into<PathBuf>, raw: String) -> Self {
        let (metadata, body) = split_frontmatter(&raw);
        Self {
            path: path.into(),
            raw,
            metadata,
            body,
        }
    }

    /// Frontmatter `title`, if present and non-empty
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Frontmatter `date`, if present and non-empty
    pub fn date(&self) -> Option<&str> {
        self.metadata
            .get("date")
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}

/// A markdown file discovered by the scanner, before it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    pub source_path: PathBuf,
    /// Cleaned title of the (possibly merged) section
    pub section_title: String,
    pub section_slug: String,
    /// Title derived from the file name
    pub display_title: String,
    pub slug: String,
}

impl PageSource {
    /// Output URL: `/<section-slug>/<page-slug>/`
    pub fn url(&self) -> String {
        page_url(&self.section_slug, &self.slug)
    }
}

pub fn page_url(section_slug: &str, page_slug: &str) -> String {
    format!("/{}/{}/", section_slug, page_slug)
}

/// One group of source folders sharing a cleaned display title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Name of the first folder seen with this title; orders the section
    pub sort_key: String,
    pub slug: String,
    pub pages: Vec<PageSource>,
}

/// A section as shown in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarSection {
    pub title: String,
    pub slug: String,
    pub pages: Vec<SidebarPage>,
}

impl SidebarSection {
    /// URL of the first page, used as the section redirect target
    pub fn first_url(&self) -> Option<String> {
        self.pages.first().map(|p| page_url(&self.slug, &p.slug))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarPage {
    pub title: String,
    pub slug: String,
    pub url: String,
}

/// Title and URL of a neighboring page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub url: String,
}

/// A heading found while rendering a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingNode {
    pub level: u8,
    pub text: String,
    /// Page-unique anchor; `None` when the text slugifies to nothing
    pub slug: Option<String>,
}

/// A fully rendered page, ready for templating
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub source_path: PathBuf,
    pub section_title: String,
    pub section_slug: String,
    pub slug: String,
    pub title: String,
    pub url: String,
    pub breadcrumb: String,
    /// Frontmatter date, if the source had one
    pub date: Option<String>,
    /// Date shown on the page (frontmatter date or the build date)
    pub display_date: String,
    pub content_html: String,
    pub toc_html: String,
    pub headings: Vec<HeadingNode>,
    /// Visible body text for search
    pub searchable_text: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

impl Page {
    /// Output path relative to the site root
    pub fn output_rel_path(&self) -> PathBuf {
        PathBuf::from(&self.section_slug)
            .join(&self.slug)
            .join("index.html")
    }
}

/// Where a redirect document is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "slug", rename_all = "lowercase")]
pub enum RedirectLocation {
    Root,
    Section(String),
}

/// A page that forwards to the first page of the site or of a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: RedirectLocation,
    pub title: String,
    pub target_url: String,
}

impl Redirect {
    /// Output path relative to the site root
    pub fn output_rel_path(&self) -> PathBuf {
        match &self.location {
            RedirectLocation::Root => PathBuf::from("index.html"),
            RedirectLocation::Section(slug) => PathBuf::from(slug).join("index.html"),
        }
    }
}
