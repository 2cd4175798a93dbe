//! `+++`-delimited frontmatter splitting.

use crate::models::Metadata;
use regex::Regex;
use std::sync::OnceLock;

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(
            r"(?s)\A[ \t]*\+\+\+[ \t]*\r?\n(?:(?P<meta>.*?)\r?\n)??[ \t]*\+\+\+[ \t]*(?:\r?\n|\z)(?P<body>.*)\z",
        )
        .expect("valid regex")
    })
}

/// Split a source document into its metadata and its body.
///
/// The metadata block must open on the very first line with `+++` and close
/// with the next `+++` line. Each `key: value` line inside is split on the
/// first colon; keys are lowercased. Lines without a colon are ignored.
///
/// Documents without a complete block come back untouched.
///
/// # Example
///
/// ```
/// use docsite_core::frontmatter::split_frontmatter;
///
/// let (meta, body) = split_frontmatter("+++\nTitle: Setup\n+++\n# Body\n");
/// assert_eq!(meta.get("title").map(String::as_str), Some("Setup"));
/// assert_eq!(body, "# Body\n");
/// ```
pub fn split_frontmatter(raw: &str) -> (Metadata, String) {
    let Some(captures) = frontmatter_regex().captures(raw) else {
        return (Metadata::new(), raw.to_string());
    };

    let mut metadata = Metadata::new();
    if let Some(block) = captures.name("meta") {
        for line in block.as_str().lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            metadata.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let body = captures
        .name("body")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    (metadata, body)
}
