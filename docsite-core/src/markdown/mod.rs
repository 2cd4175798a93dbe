//! Markdown processing pipeline with custom extensions.
//!
//! The body is split into blocks, admonitions are lifted out into a block
//! tree, and every remaining run of blocks is handed to pulldown-cmark. The
//! combined event stream then passes through heading-id assignment and
//! syntax highlighting before it is serialized.

pub mod admonition;
pub mod blocks;
pub mod extract;
pub mod headings;
pub mod highlight;

use crate::models::HeadingNode;
use admonition::{is_start_block, parse_admonition, split_content_blocks};
use blocks::BlockQueue;
use pulldown_cmark::{html, CowStr, Event, Options, Parser};

pub use extract::{extract_heading_links, extract_searchable_text};
pub use headings::HeadingIdAssigner;
pub use highlight::HighlightTransformer;

/// Result of rendering one document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMarkdown {
    /// HTML fragment, without any `<html>`/`<body>` wrapper
    pub html: String,
    pub headings: Vec<HeadingNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockNode {
    Markdown(String),
    Admonition {
        details: bool,
        kind: String,
        title: String,
        children: Vec<BlockNode>,
    },
}

/// Markdown processor with custom extensions
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Convert a document body to HTML.
    ///
    /// All state (such as the used heading slugs) is local to this call, so
    /// one processor can render many pages concurrently.
    pub fn render(&self, body: &str) -> RenderedMarkdown {
        let tree = build_tree(BlockQueue::from_text(body));

        let mut events = Vec::new();
        self.push_events(&tree, &mut events);

        let (events, headings) = HeadingIdAssigner::new().apply(events);
        let events = HighlightTransformer::new().transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            headings,
        }
    }

    fn push_events<'a>(&self, nodes: &'a [BlockNode], events: &mut Vec<Event<'a>>) {
        for node in nodes {
            match node {
                BlockNode::Markdown(text) => {
                    events.extend(Parser::new_ext(text, self.options));
                }
                BlockNode::Admonition {
                    details,
                    kind,
                    title,
                    children,
                } => {
                    let (open, close) = admonition_wrappers(*details, kind, title);
                    events.push(Event::Html(CowStr::from(open)));
                    self.push_events(children, events);
                    events.push(Event::Html(CowStr::from(close)));
                }
            }
        }
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain the queue into a block tree. Admonition content is parsed
/// recursively; consecutive plain blocks are coalesced.
fn build_tree(mut queue: BlockQueue) -> Vec<BlockNode> {
    let mut nodes = Vec::new();

    while !queue.is_empty() {
        if queue.peek().is_some_and(is_start_block) {
            if let Some(adm) = parse_admonition(&mut queue) {
                let children = build_tree(BlockQueue::new(split_content_blocks(&adm.content)));
                nodes.push(BlockNode::Admonition {
                    details: adm.is_details(),
                    kind: adm.kind,
                    title: adm.title,
                    children,
                });
                continue;
            }
        }

        let Some(block) = queue.pop() else {
            break;
        };
        match nodes.last_mut() {
            Some(BlockNode::Markdown(text)) => {
                text.push_str("\n\n");
                text.push_str(&block);
            }
            _ => nodes.push(BlockNode::Markdown(block)),
        }
    }

    nodes
}

fn admonition_wrappers(details: bool, kind: &str, title: &str) -> (String, String) {
    let title = html_escape(title);
    if details {
        (
            format!(
                "<details class=\"admonition details\">\n\
                 <summary class=\"admonition-title\">{}</summary>\n\
                 <div class=\"admonition-content\">\n",
                title
            ),
            "</div>\n</details>\n".to_string(),
        )
    } else {
        (
            format!(
                "<div class=\"admonition {}\">\n\
                 <p class=\"admonition-title\">{}</p>\n\
                 <div class=\"admonition-content\">\n",
                kind, title
            ),
            "</div>\n</div>\n".to_string(),
        )
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
