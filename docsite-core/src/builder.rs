//! Site building logic - orchestrates scanning, linking and rendering.

use crate::{
    config::Config,
    linker::{load_pages, LinkedPage, LoadedPage, SiteGraph},
    markdown::{extract_heading_links, extract_searchable_text, MarkdownProcessor},
    models::{Page, Redirect, SidebarSection},
    scanner::{scan, ScanError},
    search::{build_search_index, SearchEntry},
};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Duplicate page /{section}/{slug}/ from {first:?} and {second:?}")]
    DuplicatePage {
        section: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Everything the writer needs to emit a site
#[derive(Debug, Clone, Default)]
pub struct BuiltSite {
    pub pages: Vec<Page>,
    pub sidebar: Vec<SidebarSection>,
    pub search_index: Vec<SearchEntry>,
    pub redirects: Vec<Redirect>,
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    processor: MarkdownProcessor,
    today: Option<NaiveDate>,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            processor: MarkdownProcessor::new(),
            today: None,
        }
    }

    /// Pin the date used for pages without a `date` key
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Build the entire site in memory
    pub fn build(&self) -> Result<BuiltSite, BuildError> {
        let scanned = scan(&self.config.source_dir())?;
        tracing::info!("Found {} markdown files", scanned.pages.len());

        let loaded = load_pages(scanned.pages);
        check_duplicates(&loaded)?;

        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let graph = SiteGraph::link(loaded, &scanned.sidebar, today);
        if let Some(target) = graph.root_target() {
            tracing::debug!("Site root redirects to {}", target);
        }

        // par_iter keeps input order, so the index follows scan order
        let pages: Vec<Page> = graph
            .pages
            .par_iter()
            .map(|page| self.render_page(page))
            .collect();

        let search_index = build_search_index(&pages);
        tracing::info!(
            "Built site with {} pages and {} search entries",
            pages.len(),
            search_index.len()
        );

        Ok(BuiltSite {
            pages,
            sidebar: graph.sidebar,
            search_index,
            redirects: graph.redirects,
        })
    }

    fn render_page(&self, page: &LinkedPage) -> Page {
        tracing::debug!("Rendering {:?} -> {}", page.source.source_path, page.url);

        let rendered = self.processor.render(&page.document.body);
        let toc_html = extract_heading_links(&rendered.html);
        let searchable_text = extract_searchable_text(&rendered.html);

        Page {
            source_path: page.source.source_path.clone(),
            section_title: page.source.section_title.clone(),
            section_slug: page.source.section_slug.clone(),
            slug: page.source.slug.clone(),
            title: page.title.clone(),
            url: page.url.clone(),
            breadcrumb: page.breadcrumb.clone(),
            date: page.document.date().map(str::to_string),
            display_date: page.display_date.clone(),
            content_html: rendered.html,
            toc_html,
            headings: rendered.headings,
            searchable_text,
            prev: page.prev.clone(),
            next: page.next.clone(),
        }
    }
}

/// Fail when two pages would be written to the same output path
fn check_duplicates(pages: &[LoadedPage]) -> Result<(), BuildError> {
    let mut seen: HashMap<(&str, &str), &PathBuf> = HashMap::new();
    for page in pages {
        let key = (page.source.section_slug.as_str(), page.source.slug.as_str());
        if let Some(first) = seen.insert(key, &page.source.source_path) {
            return Err(BuildError::DuplicatePage {
                section: key.0.to_string(),
                slug: key.1.to_string(),
                first: first.clone(),
                second: page.source.source_path.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RedirectLocation;
    use crate::search::EntryType;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join("src").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn builder(root: &Path) -> SiteBuilder {
        let config = Config::default_at(root.join("docsite.yml"));
        SiteBuilder::new(config).with_today(NaiveDate::from_ymd_opt(2026, 10, 12).unwrap())
    }

    #[test]
    fn test_build_site() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "01-Intro/01-welcome.md",
            b"+++\ntitle: Welcome!\ndate: 2nd May 2025\n+++\n# Welcome\n\n## Overview\n\nHello there.\n",
        );
        write(dir.path(), "01-Intro/02-next.md", b"Just text.\n");
        write(dir.path(), "02-Guides/setup.md", b"## Install\n\n```sh\nmake\n```\n");

        let site = builder(dir.path()).build().unwrap();
        assert_eq!(site.pages.len(), 3);

        let welcome = &site.pages[0];
        assert_eq!(welcome.title, "Welcome!");
        assert_eq!(welcome.url, "/intro/welcome/");
        assert_eq!(welcome.breadcrumb, "Intro > Welcome!");
        assert_eq!(welcome.display_date, "2nd May 2025");
        assert_eq!(welcome.searchable_text, "Hello there.");
        assert!(welcome.toc_html.contains("href=\"#overview\""));
        assert_eq!(welcome.next.as_ref().unwrap().url, "/intro/next/");

        let next = &site.pages[1];
        assert_eq!(next.title, "next");
        assert_eq!(next.display_date, "12th October 2026");
        assert_eq!(next.prev.as_ref().unwrap().title, "Welcome!");

        let setup = &site.pages[2];
        assert!(setup.content_html.contains("codehilite"));
        assert_eq!(setup.searchable_text, "");

        assert_eq!(site.sidebar.len(), 2);
        assert_eq!(site.redirects[0].location, RedirectLocation::Root);
        assert_eq!(site.redirects[0].target_url, "/intro/welcome/");
        assert_eq!(site.redirects.len(), 3);

        let types: Vec<_> = site.search_index.iter().map(|e| e.entry_type).collect();
        assert_eq!(
            types,
            vec![
                EntryType::Page,
                EntryType::Heading,
                EntryType::Heading,
                EntryType::Page,
                EntryType::Page,
                EntryType::Heading,
            ]
        );
        assert_eq!(site.search_index[0].date.as_deref(), Some("2nd May 2025"));
    }

    #[test]
    fn test_unreadable_page_skipped_before_linking() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "01-A/1.md", b"one");
        write(dir.path(), "01-A/2.md", &[0xff, 0xfe, 0x00, 0xc3]);
        write(dir.path(), "01-A/3.md", b"three");

        let site = builder(dir.path()).build().unwrap();
        let urls: Vec<_> = site.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/a/1/", "/a/3/"]);
        assert_eq!(site.pages[0].next.as_ref().unwrap().url, "/a/3/");
        assert_eq!(site.sidebar[0].pages.len(), 2);
        assert!(site.search_index.iter().all(|e| e.url != "/a/2/"));
    }

    #[test]
    fn test_duplicate_pages_fail() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "01-Docs/01-setup.md", b"a");
        write(dir.path(), "01-Docs/02-setup.md", b"b");

        let err = builder(dir.path()).build().unwrap_err();
        match err {
            BuildError::DuplicatePage {
                section,
                slug,
                first,
                second,
            } => {
                assert_eq!(section, "docs");
                assert_eq!(slug, "setup");
                assert!(first.ends_with("01-setup.md"));
                assert!(second.ends_with("02-setup.md"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_source_builds_empty_site() {
        let dir = TempDir::new().unwrap();
        let site = builder(dir.path()).build().unwrap();
        assert!(site.pages.is_empty());
        assert!(site.search_index.is_empty());
        assert!(site.redirects.is_empty());
    }
}
