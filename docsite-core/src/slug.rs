//! Slug generation and display-name cleanup.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static HYPHENS: OnceLock<Regex> = OnceLock::new();
static ORDER_PREFIX: OnceLock<Regex> = OnceLock::new();

fn disallowed() -> &'static Regex {
    DISALLOWED.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn hyphens() -> &'static Regex {
    HYPHENS.get_or_init(|| Regex::new(r"-+").expect("valid regex"))
}

fn order_prefix() -> &'static Regex {
    ORDER_PREFIX.get_or_init(|| Regex::new(r"^\d+-").expect("valid regex"))
}

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Remove everything that is not a word character, whitespace or hyphen
/// - Replace whitespace runs with a single hyphen
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// Underscores and non-ASCII letters survive. Input made only of
/// punctuation produces an empty slug.
///
/// # Examples
///
/// ```
/// use docsite_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("snake_case name"), "snake_case-name");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    let cleaned = disallowed().replace_all(&lowercased, "");
    let with_hyphens = whitespace().replace_all(&cleaned, "-");
    let collapsed = hyphens().replace_all(&with_hyphens, "-");
    collapsed.trim_matches('-').to_string()
}

/// Strip the numeric ordering prefix (`01-`) from a folder name.
pub fn clean_folder_name(name: &str) -> String {
    order_prefix().replace(name, "").trim().to_string()
}

/// Strip the extension and numeric ordering prefix from a file name.
///
/// `"02-Getting Started.md"` becomes `"Getting Started"`.
pub fn clean_display_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    clean_folder_name(stem)
}
