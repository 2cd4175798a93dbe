//! # docsite-render
//!
//! Template rendering library for docsite.
//!
//! This crate turns built pages and redirects into HTML documents using
//! Askama.

pub mod templates;

use askama::Template;
use docsite_core::config::Config;
use docsite_core::models::{Page, Redirect, SidebarSection};
use thiserror::Error;

pub use templates::{
    HeaderView, PageTemplate, RedirectTemplate, SiteAssets, SCRIPT_URL, STYLESHEET_URL,
};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render template for {target}: {source}")]
    Template {
        target: String,
        #[source]
        source: askama::Error,
    },
}

/// Render a content page into a full HTML document
pub fn render_page(
    page: &Page,
    sidebar: &[SidebarSection],
    config: &Config,
    header: &HeaderView,
) -> Result<String, RenderError> {
    PageTemplate::new(page, sidebar, config, header.clone())
        .render()
        .map_err(|source| RenderError::Template {
            target: page.url.clone(),
            source,
        })
}

/// Render a redirect document
pub fn render_redirect(redirect: &Redirect) -> Result<String, RenderError> {
    RedirectTemplate::from(redirect)
        .render()
        .map_err(|source| RenderError::Template {
            target: redirect.output_rel_path().display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsite_core::config::{HeaderConfig, HeaderLink};
    use docsite_core::models::{NavLink, RedirectLocation, SidebarPage};
    use std::path::PathBuf;

    fn page() -> Page {
        Page {
            source_path: PathBuf::from("src/01-Intro/01-welcome.md"),
            section_title: "Intro".into(),
            section_slug: "intro".into(),
            slug: "welcome".into(),
            title: "Welcome <home>".into(),
            url: "/intro/welcome/".into(),
            breadcrumb: "Intro > Welcome <home>".into(),
            date: None,
            display_date: "18th October 2026".into(),
            content_html: "<h2 id=\"hi\">Hi</h2>\n<p>Body</p>\n".into(),
            toc_html: "<a class=\"toc-h2\" href=\"#hi\">Hi</a>".into(),
            headings: vec![],
            searchable_text: "Body".into(),
            prev: None,
            next: Some(NavLink {
                title: "Next page".into(),
                url: "/intro/next/".into(),
            }),
        }
    }

    fn sidebar() -> Vec<SidebarSection> {
        vec![SidebarSection {
            title: "Intro".into(),
            slug: "intro".into(),
            pages: vec![
                SidebarPage {
                    title: "welcome".into(),
                    slug: "welcome".into(),
                    url: "/intro/welcome/".into(),
                },
                SidebarPage {
                    title: "next".into(),
                    slug: "next".into(),
                    url: "/intro/next/".into(),
                },
            ],
        }]
    }

    #[test]
    fn test_render_page() {
        let config = Config::default();
        let header = HeaderView::new(
            &HeaderConfig {
                github_link: Some("https://github.com/org/repo".into()),
                internals: vec![HeaderLink {
                    header: "Guide".into(),
                    link: "/guide/".into(),
                }],
                ..HeaderConfig::default()
            },
            &SiteAssets {
                logo: Some("/img/logo.svg".into()),
                favicon: None,
            },
        );

        let html = render_page(&page(), &sidebar(), &config, &header).unwrap();
        assert!(html.contains("<title>Welcome &lt;home&gt; | Documentation</title>"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("class=\"toc-h2\""));
        assert!(html.contains("18th October 2026"));
        assert!(html.contains("href=\"/intro/next/\""));
        assert!(!html.contains("class=\"prev\""));
        assert!(html.contains("<li class=\"active\"><a href=\"/intro/welcome/\">"));
        assert!(html.contains("https://github.com/org/repo"));
        assert!(html.contains("/img/logo.svg"));
        assert!(html.contains(">Guide</a>"));
        assert!(!html.contains("rel=\"icon\""));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/assets/docsite.css\">"));
        assert!(html.contains("<script src=\"/assets/docsite.js\" defer></script>"));
        assert!(html.contains("class=\"search-results\""));
    }

    #[test]
    fn test_render_page_without_toc() {
        let mut p = page();
        p.toc_html.clear();
        let html = render_page(&p, &[], &Config::default(), &HeaderView::default()).unwrap();
        assert!(!html.contains("On this page"));
    }

    #[test]
    fn test_render_redirect() {
        let redirect = Redirect {
            location: RedirectLocation::Section("intro".into()),
            title: "Intro".into(),
            target_url: "/intro/welcome/".into(),
        };
        let html = render_redirect(&redirect).unwrap();
        assert!(html.contains("<meta http-equiv=\"refresh\" content=\"0; url=/intro/welcome/\">"));
        assert!(html.contains("<link rel=\"canonical\" href=\"/intro/welcome/\">"));
        assert!(html.contains("noindex"));
    }
}
