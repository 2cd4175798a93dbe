//! Post-render extraction over the HTML fragment: table-of-contents links
//! and the visible text used for search.

use super::html_escape;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, Attribute, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashSet;

/// Elements whose text is collected for search
const COLLECTED_TAGS: &[&str] = &["p", "li", "td", "th", "caption", "dt", "dd"];

/// Elements whose subtree never contributes search text
const SKIPPED_TAGS: &[&str] = &["pre", "code", "script", "style"];

/// Classes whose subtree never contributes search text
const SKIPPED_CLASSES: &[&str] = &["codehilite", "admonition-title"];

fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

fn attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| &*a.value)
}

fn text_content(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                text_content(child, out);
            }
        }
    }
}

/// Build table-of-contents anchors for every `h2`/`h3` carrying an id.
///
/// One `<a>` per line in document order; the class is `toc-h2` or `toc-h3`.
pub fn extract_heading_links(html: &str) -> String {
    let dom = parse(html);
    let mut links = Vec::new();
    collect_heading_links(&dom.document, &mut links);
    links.join("\n")
}

fn collect_heading_links(handle: &Handle, links: &mut Vec<String>) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        let tag = &*name.local;
        if tag == "h2" || tag == "h3" {
            let id = attr(&attrs.borrow(), "id")
                .map(str::to_string)
                .filter(|id| !id.is_empty());
            if let Some(id) = id {
                let mut text = String::new();
                text_content(handle, &mut text);
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                links.push(format!(
                    "<a class=\"toc-{}\" href=\"#{}\">{}</a>",
                    tag,
                    html_escape(&id),
                    html_escape(&text)
                ));
            }
            return;
        }
    }

    for child in handle.children.borrow().iter() {
        collect_heading_links(child, links);
    }
}

/// Collect the visible prose of a rendered page.
///
/// Text comes from paragraphs, list items, table cells, captions and
/// definition lists. Code, scripts, styles, highlighted blocks and
/// admonition titles are excluded. Fragments are whitespace-normalized,
/// deduplicated in first-seen order and joined with single spaces.
pub fn extract_searchable_text(html: &str) -> String {
    let dom = parse(html);
    let mut collector = TextCollector::default();
    collector.visit(&dom.document);
    collector.finish()
}

#[derive(Default)]
struct TextCollector {
    fragments: Vec<String>,
    /// Indices into `fragments` of the collectable elements currently open
    open: Vec<usize>,
}

impl TextCollector {
    fn visit(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Text { contents } => {
                if let Some(&idx) = self.open.last() {
                    self.fragments[idx].push_str(&contents.borrow());
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let tag = &*name.local;
                if SKIPPED_TAGS.contains(&tag) || has_skipped_class(&attrs.borrow()) {
                    return;
                }
                let collectable = COLLECTED_TAGS.contains(&tag);
                if collectable {
                    self.open.push(self.fragments.len());
                    self.fragments.push(String::new());
                }
                self.visit_children(handle);
                if collectable {
                    self.open.pop();
                }
            }
            _ => self.visit_children(handle),
        }
    }

    fn visit_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.visit(child);
        }
    }

    fn finish(self) -> String {
        let mut seen = HashSet::new();
        let mut parts = Vec::new();
        for fragment in self.fragments {
            let normalized = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
            if normalized.is_empty() || !seen.insert(normalized.clone()) {
                continue;
            }
            parts.push(normalized);
        }
        parts.join(" ")
    }
}

fn has_skipped_class(attrs: &[Attribute]) -> bool {
    attr(attrs, "class").is_some_and(|classes| {
        classes
            .split_whitespace()
            .any(|class| SKIPPED_CLASSES.contains(&class))
    })
}
