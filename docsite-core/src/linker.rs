//! Navigation graph over the loaded pages: prev/next, breadcrumbs,
//! display dates and redirect targets.

use crate::models::{
    NavLink, PageSource, Redirect, RedirectLocation, SidebarSection, SourceDocument,
};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// A scanned page whose source was read successfully
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub source: PageSource,
    pub document: SourceDocument,
}

impl LoadedPage {
    /// Frontmatter title, falling back to the file-derived title
    pub fn title(&self) -> &str {
        self.document
            .title()
            .unwrap_or(self.source.display_title.as_str())
    }
}

/// Read every scanned page. Unreadable files are logged and left out.
pub fn load_pages(sources: Vec<PageSource>) -> Vec<LoadedPage> {
    sources
        .into_iter()
        .filter_map(|source| match SourceDocument::read(&source.source_path) {
            Ok(document) => Some(LoadedPage { source, document }),
            Err(err) => {
                tracing::warn!("Skipping {:?}: {}", source.source_path, err);
                None
            }
        })
        .collect()
}

/// A loaded page with its place in the site resolved
#[derive(Debug, Clone)]
pub struct LinkedPage {
    pub source: PageSource,
    pub document: SourceDocument,
    pub title: String,
    pub url: String,
    pub breadcrumb: String,
    pub display_date: String,
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Linked pages in global order plus everything derived from that order
#[derive(Debug, Clone, Default)]
pub struct SiteGraph {
    pub pages: Vec<LinkedPage>,
    /// Sidebar restricted to the pages that survived loading
    pub sidebar: Vec<SidebarSection>,
    pub redirects: Vec<Redirect>,
}

impl SiteGraph {
    /// Link `pages`, which must already be in global order.
    ///
    /// `today` supplies the display date of pages without a `date` key.
    pub fn link(pages: Vec<LoadedPage>, sidebar: &[SidebarSection], today: NaiveDate) -> Self {
        let default_date = format_display_date(today);
        let nav: Vec<NavLink> = pages
            .iter()
            .map(|page| NavLink {
                title: page.title().to_string(),
                url: page.source.url(),
            })
            .collect();

        let sidebar = prune_sidebar(sidebar, &pages);
        let redirects = compute_redirects(&sidebar);

        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                let title = page.title().to_string();
                let breadcrumb = format!("{} > {}", page.source.section_title, title);
                let display_date = page
                    .document
                    .date()
                    .map(str::to_string)
                    .unwrap_or_else(|| default_date.clone());
                LinkedPage {
                    url: page.source.url(),
                    prev: i.checked_sub(1).map(|j| nav[j].clone()),
                    next: nav.get(i + 1).cloned(),
                    source: page.source,
                    document: page.document,
                    title,
                    breadcrumb,
                    display_date,
                }
            })
            .collect();

        Self {
            pages,
            sidebar,
            redirects,
        }
    }

    /// URL of the first page of the site
    pub fn root_target(&self) -> Option<&str> {
        self.redirects.iter().find_map(|r| match r.location {
            RedirectLocation::Root => Some(r.target_url.as_str()),
            RedirectLocation::Section(_) => None,
        })
    }
}

fn prune_sidebar(sidebar: &[SidebarSection], pages: &[LoadedPage]) -> Vec<SidebarSection> {
    let loaded: HashSet<String> = pages.iter().map(|p| p.source.url()).collect();
    sidebar
        .iter()
        .filter_map(|section| {
            let pages: Vec<_> = section
                .pages
                .iter()
                .filter(|page| loaded.contains(&page.url))
                .cloned()
                .collect();
            if pages.is_empty() {
                return None;
            }
            Some(SidebarSection {
                pages,
                ..section.clone()
            })
        })
        .collect()
}

fn compute_redirects(sidebar: &[SidebarSection]) -> Vec<Redirect> {
    let mut redirects = Vec::new();

    if let Some((section, target)) = sidebar
        .first()
        .and_then(|s| s.first_url().map(|url| (s, url)))
    {
        let title = section
            .pages
            .first()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| section.title.clone());
        redirects.push(Redirect {
            location: RedirectLocation::Root,
            title,
            target_url: target,
        });
    }

    for section in sidebar {
        if let Some(target) = section.first_url() {
            redirects.push(Redirect {
                location: RedirectLocation::Section(section.slug.clone()),
                title: section.title.clone(),
                target_url: target,
            });
        }
    }

    redirects
}

/// English ordinal suffix for a day of the month
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Format a date as `18th October 2026`
pub fn format_display_date(date: NaiveDate) -> String {
    format!(
        "{}{} {}",
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%B %Y")
    )
}
