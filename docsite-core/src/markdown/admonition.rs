//! `:::type [title]` ... `:::` admonition blocks.
//!
//! The parser pulls blocks from a [`BlockQueue`]. An admonition may open in
//! one block and close several blocks later; anything after the closing
//! marker is pushed back onto the queue for normal processing.
//!
//! ```text
//! :::warning Mind the gap
//! Content, parsed as *Markdown*.
//!
//! More content, still inside.
//! :::
//! ```

use super::blocks::{split_blocks, BlockQueue, FenceTracker};
use regex::Regex;
use std::sync::OnceLock;

static START_REGEX: OnceLock<Regex> = OnceLock::new();
static END_REGEX: OnceLock<Regex> = OnceLock::new();

fn start_regex() -> &'static Regex {
    START_REGEX.get_or_init(|| {
        Regex::new(r"^\s*:::\s*(?P<kind>[a-zA-Z0-9_-]+)(?:\s*(?P<title>.*))?\s*$")
            .expect("valid regex")
    })
}

fn end_regex() -> &'static Regex {
    END_REGEX.get_or_init(|| Regex::new(r"^\s*:::\s*$").expect("valid regex"))
}

/// A parsed admonition, before its content is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admonition {
    /// Lowercased type token (`note`, `warning`, `details`, ...)
    pub kind: String,
    pub title: String,
    /// Raw markdown between the markers
    pub content: String,
}

impl Admonition {
    /// `details` admonitions render as a collapsible disclosure
    pub fn is_details(&self) -> bool {
        self.kind == "details"
    }
}

/// Parse the opening line of an admonition into `(kind, custom title)`.
pub fn parse_start_line(line: &str) -> Option<(String, Option<String>)> {
    let caps = start_regex().captures(line)?;
    let kind = caps.name("kind")?.as_str().to_lowercase();
    let title = caps
        .name("title")
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());
    Some((kind, title))
}

pub fn is_end_line(line: &str) -> bool {
    end_regex().is_match(line)
}

/// Whether a block opens an admonition. Only the first line is inspected.
pub fn is_start_block(block: &str) -> bool {
    block
        .lines()
        .next()
        .is_some_and(|line| start_regex().is_match(line))
}

/// Title shown when the opening line has none.
///
/// `details` becomes `Details`; any other type is capitalized.
pub fn default_title(kind: &str) -> String {
    if kind == "details" {
        return "Details".to_string();
    }
    let mut chars = kind.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Scans lines for the marker closing the outermost admonition.
///
/// Nested openers increase the depth, fenced lines are never markers.
struct EndScanner {
    depth: usize,
    fence: FenceTracker,
}

impl EndScanner {
    fn new() -> Self {
        Self {
            depth: 0,
            fence: FenceTracker::new(),
        }
    }

    /// Returns true when `line` closes the outermost admonition.
    fn is_closing(&mut self, line: &str) -> bool {
        if self.fence.observe(line) {
            return false;
        }
        if is_end_line(line) {
            if self.depth == 0 {
                return true;
            }
            self.depth -= 1;
        } else if start_regex().is_match(line) {
            self.depth += 1;
        }
        false
    }
}

/// Split admonition content into blocks for recursive parsing.
///
/// Blocks split on blank lines as usual. In addition, a nested opener that
/// does not start its block begins a new one, and the line after its
/// matching end marker starts another, so the nested admonition is always
/// the first line of a block.
pub fn split_content_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut fence = FenceTracker::new();
    let mut depth = 0usize;

    for block in split_blocks(content) {
        let mut current: Vec<&str> = Vec::new();
        for line in block.lines() {
            if fence.observe(line) {
                current.push(line);
                continue;
            }
            if is_end_line(line) {
                current.push(line);
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        flush(&mut blocks, &mut current);
                    }
                }
            } else if start_regex().is_match(line) {
                if depth == 0 {
                    flush(&mut blocks, &mut current);
                }
                depth += 1;
                current.push(line);
            } else {
                current.push(line);
            }
        }
        flush(&mut blocks, &mut current);
    }

    blocks
}

fn flush(blocks: &mut Vec<String>, current: &mut Vec<&str>) {
    if !current.is_empty() {
        blocks.push(current.join("\n"));
        current.clear();
    }
}

/// Try to consume one admonition from the front of the queue.
///
/// Returns `None` without consuming anything when the front block does not
/// open an admonition. When no closing marker exists in any remaining block
/// the opening block is pushed back and `None` is returned; blocks pulled
/// during that failed search are dropped.
pub fn parse_admonition(queue: &mut BlockQueue) -> Option<Admonition> {
    let original = queue.pop()?;
    let mut lines = original.lines();

    let Some((kind, custom_title)) = lines.next().and_then(parse_start_line) else {
        queue.push_front(original);
        return None;
    };

    let mut scanner = EndScanner::new();
    let mut content: Vec<String> = Vec::new();
    let mut closed = false;

    for line in lines.by_ref() {
        if scanner.is_closing(line) {
            closed = true;
            break;
        }
        content.push(line.to_string());
    }

    if closed {
        let rest: Vec<&str> = lines.collect();
        if !rest.is_empty() {
            queue.push_front(rest.join("\n"));
        }
    } else {
        let mut pulled = 0usize;
        while let Some(next) = queue.pop() {
            pulled += 1;
            if !content.is_empty() {
                content.push(String::new());
            }
            let mut next_lines = next.lines();
            for line in next_lines.by_ref() {
                if scanner.is_closing(line) {
                    closed = true;
                    break;
                }
                content.push(line.to_string());
            }
            if closed {
                let rest: Vec<&str> = next_lines.collect();
                if !rest.is_empty() {
                    queue.push_front(rest.join("\n"));
                }
                break;
            }
        }

        if !closed {
            if pulled > 0 {
                tracing::warn!(
                    "Unterminated ':::{}' admonition; {} following block(s) dropped",
                    kind,
                    pulled
                );
            }
            queue.push_front(original);
            return None;
        }
    }

    // Trailing blank separator when the marker opened a pulled block
    while content.last().is_some_and(|l| l.trim().is_empty()) {
        content.pop();
    }

    let title = custom_title.unwrap_or_else(|| default_title(&kind));

    Some(Admonition {
        kind,
        title,
        content: content.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(text: &str) -> BlockQueue {
        BlockQueue::from_text(text)
    }

    #[test]
    fn test_start_line() {
        assert_eq!(parse_start_line(":::note"), Some(("note".into(), None)));
        assert_eq!(
            parse_start_line("::: Warning  Be careful  "),
            Some(("warning".into(), Some("Be careful".into())))
        );
        assert_eq!(parse_start_line(":::"), None);
        assert_eq!(parse_start_line(":::!bad"), None);
        assert_eq!(parse_start_line("text :::note"), None);
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(default_title("note"), "Note");
        assert_eq!(default_title("details"), "Details");
        assert_eq!(default_title("my-tip"), "My-tip");
        assert_eq!(default_title("9lives"), "9lives");
    }

    #[test]
    fn test_single_block() {
        let mut q = queue(":::note\ncontent line\n:::");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.kind, "note");
        assert_eq!(adm.title, "Note");
        assert_eq!(adm.content, "content line");
        assert!(q.is_empty());
    }

    #[test]
    fn test_custom_title_verbatim() {
        let mut q = queue(":::tip Use `cargo` wisely\nx\n:::");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.title, "Use `cargo` wisely");
    }

    #[test]
    fn test_remainder_pushed_back() {
        let mut q = queue(":::note\ninside\n:::\nafter one\nafter two\n\nnext block");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "inside");
        assert_eq!(q.pop().as_deref(), Some("after one\nafter two"));
        assert_eq!(q.pop().as_deref(), Some("next block"));
    }

    #[test]
    fn test_spans_multiple_blocks() {
        let mut q = queue(":::warning\nfirst\n\nsecond\n\nthird\n:::\n\nafter");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "first\n\nsecond\n\nthird");
        assert_eq!(q.pop().as_deref(), Some("after"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_marker_alone_in_later_block() {
        let mut q = queue(":::note\nbody\n\n:::\n\nafter");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "body");
        assert_eq!(q.pop().as_deref(), Some("after"));
    }

    #[test]
    fn test_remainder_in_pulled_block() {
        let mut q = queue(":::note\na\n\nb\n:::\ntail");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "a\n\nb");
        assert_eq!(q.pop().as_deref(), Some("tail"));
    }

    #[test]
    fn test_not_a_start_block_is_untouched() {
        let mut q = queue("plain paragraph\n:::note");
        assert!(parse_admonition(&mut q).is_none());
        assert_eq!(q.pop().as_deref(), Some("plain paragraph\n:::note"));
    }

    #[test]
    fn test_unterminated_restores_original() {
        let mut q = queue(":::warn\nhi");
        assert!(parse_admonition(&mut q).is_none());
        assert_eq!(q.pop().as_deref(), Some(":::warn\nhi"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_unterminated_drops_pulled_blocks() {
        let mut q = queue(":::warn\nhi\n\nlost one\n\nlost two");
        assert!(parse_admonition(&mut q).is_none());
        assert_eq!(q.pop().as_deref(), Some(":::warn\nhi"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_nested_admonitions() {
        let mut q = queue(":::note\nouter\n:::tip\ninner\n:::\nouter again\n:::");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "outer\n:::tip\ninner\n:::\nouter again");
        assert!(q.is_empty());
    }

    #[test]
    fn test_content_blocks_isolate_nested_admonition() {
        let blocks = split_content_blocks("outer\n:::tip\ninner\n:::\nouter again");
        assert_eq!(blocks, vec!["outer", ":::tip\ninner\n:::", "outer again"]);
    }

    #[test]
    fn test_content_blocks_nested_spanning_blank_lines() {
        let blocks = split_content_blocks("intro\n:::tip\none\n\ntwo\n:::\ntail");
        assert_eq!(blocks, vec!["intro", ":::tip\none", "two\n:::", "tail"]);
    }

    #[test]
    fn test_content_blocks_ignore_fenced_markers() {
        let blocks = split_content_blocks("text\n```\n:::tip\n```\nmore");
        assert_eq!(blocks, vec!["text\n```\n:::tip\n```\nmore"]);
    }

    #[test]
    fn test_fenced_marker_is_content() {
        let mut q = queue(":::note\n```text\n:::\n```\n:::");
        let adm = parse_admonition(&mut q).unwrap();
        assert_eq!(adm.content, "```text\n:::\n```");
        assert!(q.is_empty());
    }

    #[test]
    fn test_empty_admonition() {
        let mut q = queue(":::details\n:::");
        let adm = parse_admonition(&mut q).unwrap();
        assert!(adm.is_details());
        assert_eq!(adm.title, "Details");
        assert_eq!(adm.content, "");
    }
}
