//! Askama template definitions.

use askama::Template;
use docsite_core::config::{Config, HeaderConfig, HeaderLink};
use docsite_core::models::{Page, Redirect, SidebarSection};
use serde::Serialize;

/// Logo and favicon found among the static files, as site URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteAssets {
    pub logo: Option<String>,
    pub favicon: Option<String>,
}

/// A plain header link
#[derive(Debug, Clone)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

/// A header dropdown menu
#[derive(Debug, Clone)]
pub struct DropdownEntry {
    pub title: String,
    pub items: Vec<LinkEntry>,
}

/// Header contents shared by every page
#[derive(Debug, Clone, Default)]
pub struct HeaderView {
    pub github_link: String,
    pub has_github: bool,
    pub contribution_link: String,
    pub has_contribution: bool,
    pub internals: Vec<LinkEntry>,
    pub externals: Vec<LinkEntry>,
    pub dropdowns: Vec<DropdownEntry>,
    pub logo: String,
    pub has_logo: bool,
    pub favicon: String,
    pub has_favicon: bool,
}

impl HeaderView {
    pub fn new(header: &HeaderConfig, assets: &SiteAssets) -> Self {
        Self {
            github_link: header.github_link.clone().unwrap_or_default(),
            has_github: header.github_link.is_some(),
            contribution_link: header.github_contribution_link.clone().unwrap_or_default(),
            has_contribution: header.github_contribution_link.is_some(),
            internals: link_entries(&header.internals),
            externals: link_entries(&header.externals),
            dropdowns: header
                .dropdowns
                .iter()
                .map(|d| DropdownEntry {
                    title: d.title.clone(),
                    items: d
                        .items
                        .iter()
                        .map(|i| LinkEntry {
                            label: i.title.clone(),
                            url: i.link.clone(),
                        })
                        .collect(),
                })
                .collect(),
            logo: assets.logo.clone().unwrap_or_default(),
            has_logo: assets.logo.is_some(),
            favicon: assets.favicon.clone().unwrap_or_default(),
            has_favicon: assets.favicon.is_some(),
        }
    }
}

fn link_entries(links: &[HeaderLink]) -> Vec<LinkEntry> {
    links
        .iter()
        .map(|l| LinkEntry {
            label: l.header.clone(),
            url: l.link.clone(),
        })
        .collect()
}

/// A sidebar section with the current page marked
#[derive(Debug, Clone)]
pub struct SidebarGroup {
    pub title: String,
    pub url: String,
    pub active: bool,
    pub pages: Vec<SidebarItem>,
}

#[derive(Debug, Clone)]
pub struct SidebarItem {
    pub title: String,
    pub url: String,
    pub active: bool,
}

/// Build the sidebar as seen from the page at `current_url`
pub fn sidebar_groups(sidebar: &[SidebarSection], current_url: &str) -> Vec<SidebarGroup> {
    sidebar
        .iter()
        .map(|section| {
            let pages: Vec<SidebarItem> = section
                .pages
                .iter()
                .map(|p| SidebarItem {
                    title: p.title.clone(),
                    url: p.url.clone(),
                    active: p.url == current_url,
                })
                .collect();
            SidebarGroup {
                title: section.title.clone(),
                url: format!("/{}/", section.slug),
                active: pages.iter().any(|p| p.active),
                pages,
            }
        })
        .collect()
}

/// Bundled stylesheet, written into the output by the build
pub const STYLESHEET_URL: &str = "/assets/docsite.css";
/// Bundled client script driving search, sidebar toggles and the TOC
pub const SCRIPT_URL: &str = "/assets/docsite.js";

/// Page data handed to the client-side scripts
#[derive(Debug, Clone, Serialize)]
pub struct ClientMeta {
    pub url: String,
    pub title: String,
    pub search_index: String,
}

/// Documentation page template
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    // Page metadata
    pub title: String,
    pub breadcrumb: String,
    pub date: String,

    // Content
    pub content: String,
    pub toc_html: String,
    pub has_toc: bool,

    // Site metadata
    pub site_title: String,
    pub site_description: String,
    pub header: HeaderView,

    // Navigation
    pub sidebar: Vec<SidebarGroup>,
    pub prev_title: String,
    pub prev_url: String,
    pub has_prev: bool,
    pub next_title: String,
    pub next_url: String,
    pub has_next: bool,

    pub meta: ClientMeta,
    pub stylesheet_url: &'static str,
    pub script_url: &'static str,
}

impl PageTemplate {
    pub fn new(page: &Page, sidebar: &[SidebarSection], config: &Config, header: HeaderView) -> Self {
        let (prev_title, prev_url) = page
            .prev
            .as_ref()
            .map(|l| (l.title.clone(), l.url.clone()))
            .unwrap_or_default();
        let (next_title, next_url) = page
            .next
            .as_ref()
            .map(|l| (l.title.clone(), l.url.clone()))
            .unwrap_or_default();

        Self {
            title: page.title.clone(),
            breadcrumb: page.breadcrumb.clone(),
            date: page.display_date.clone(),
            content: page.content_html.clone(),
            toc_html: page.toc_html.clone(),
            has_toc: !page.toc_html.is_empty(),
            site_title: config.site.title.clone(),
            site_description: config.site.description.clone(),
            header,
            sidebar: sidebar_groups(sidebar, &page.url),
            prev_title,
            prev_url,
            has_prev: page.prev.is_some(),
            next_title,
            next_url,
            has_next: page.next.is_some(),
            meta: ClientMeta {
                url: page.url.clone(),
                title: page.title.clone(),
                search_index: String::from("/search_index.json"),
            },
            stylesheet_url: STYLESHEET_URL,
            script_url: SCRIPT_URL,
        }
    }
}

/// Redirect page written at the site root and at each section root
#[derive(Template)]
#[template(path = "redirect.html")]
pub struct RedirectTemplate {
    pub title: String,
    pub target_url: String,
}

impl From<&Redirect> for RedirectTemplate {
    fn from(redirect: &Redirect) -> Self {
        Self {
            title: redirect.title.clone(),
            target_url: redirect.target_url.clone(),
        }
    }
}
