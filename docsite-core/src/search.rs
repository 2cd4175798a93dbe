//! Search index for the client-side search box.
//!
//! One `page` entry per page followed by one `heading` entry per anchored
//! heading, in page order.

use crate::models::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Page,
    Heading,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub id: String, // Same as url
    pub page_title: String,
    pub display_title: String,
    pub breadcrumbs: String,
    pub url: String,
    /// Lowercased text matched by the search box
    pub searchable_text: String,
    /// Frontmatter date, `null` when absent
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
    /// Visible body text (page entries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Entries for one page: the page itself, then its anchored headings
pub fn entries_for_page(page: &Page) -> Vec<SearchEntry> {
    let mut entries = Vec::with_capacity(page.headings.len() + 1);

    entries.push(SearchEntry {
        entry_type: EntryType::Page,
        id: page.url.clone(),
        page_title: page.title.clone(),
        display_title: page.title.clone(),
        breadcrumbs: page.breadcrumb.clone(),
        url: page.url.clone(),
        searchable_text: format!("{} {}", page.title, page.breadcrumb).to_lowercase(),
        date: page.date.clone(),
        heading_text: None,
        heading_level: None,
        content: Some(page.searchable_text.clone()),
    });

    for heading in &page.headings {
        let Some(slug) = &heading.slug else {
            continue;
        };
        let url = format!("{}#{}", page.url, slug);
        let breadcrumbs = format!("{} » {}", page.breadcrumb, heading.text);
        entries.push(SearchEntry {
            entry_type: EntryType::Heading,
            id: url.clone(),
            page_title: page.title.clone(),
            display_title: format!("{} » {}", page.title, heading.text),
            searchable_text: format!("{} {} {}", page.title, breadcrumbs, heading.text)
                .to_lowercase(),
            breadcrumbs,
            url,
            date: page.date.clone(),
            heading_text: Some(heading.text.clone()),
            heading_level: Some(heading.level),
            content: None,
        });
    }

    entries
}

/// Build the full index in page order
pub fn build_search_index(pages: &[Page]) -> Vec<SearchEntry> {
    pages.iter().flat_map(entries_for_page).collect()
}

/// Serialize the index as a compact JSON array
pub fn to_json(entries: &[SearchEntry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}
