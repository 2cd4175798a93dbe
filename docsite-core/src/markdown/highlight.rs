//! Code syntax highlighting using syntect.

use super::html_escape;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Class on the wrapper around every rendered code block
pub const CODE_BLOCK_CLASS: &str = "codehilite";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Theme> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let mut theme_set = ThemeSet::load_defaults();
        theme_set
            .themes
            .remove("InspiredGitHub")
            .or_else(|| theme_set.themes.remove("base16-ocean.light"))
            .unwrap_or_default()
    })
}

/// Transformer for syntax highlighting code blocks
#[derive(Debug, Default)]
pub struct HighlightTransformer;

impl HighlightTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Replace code blocks with highlighted HTML.
    ///
    /// Fenced blocks with a language are highlighted; every other code block
    /// is escaped verbatim. Both are wrapped in a `codehilite` div.
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string)
                            .filter(|l| !l.is_empty()),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, buf)) = code.take() {
                        let html = self.render_block(&buf, lang.as_deref());
                        result.push(Event::Html(CowStr::from(html)));
                    }
                }
                other => result.push(other),
            }
        }

        result
    }

    fn render_block(&self, code: &str, lang: Option<&str>) -> String {
        let inner = match lang {
            Some(lang) => self.highlight_code(code, lang),
            None => plain_block(code),
        };
        format!("<div class=\"{}\">{}</div>\n", CODE_BLOCK_CLASS, inner)
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(lang)
            .or_else(|| ss.find_syntax_by_extension(lang))
            .unwrap_or_else(|| ss.find_syntax_plain_text());

        match highlighted_html_for_string(code, ss, syntax, theme()) {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!("Highlighting {} failed: {}", lang, err);
                plain_block(code)
            }
        }
    }
}

fn plain_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>", html_escape(code))
}
