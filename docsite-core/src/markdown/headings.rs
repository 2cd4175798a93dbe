//! Page-unique heading ids.

use crate::models::HeadingNode;
use crate::slug::slugify;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use std::collections::HashSet;

/// Assigns collision-free ids to the headings of one document.
///
/// Create one per render call; the used-slug set must never be shared
/// between documents.
#[derive(Debug, Default)]
pub struct HeadingIdAssigner {
    used: HashSet<String>,
}

impl HeadingIdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique slug for `text`. Returns `None` for text that
    /// slugifies to nothing.
    pub fn assign(&mut self, text: &str) -> Option<String> {
        let base = slugify(text);
        if base.is_empty() {
            return None;
        }

        let mut candidate = base.clone();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
        self.used.insert(candidate.clone());
        Some(candidate)
    }

    /// Set the `id` of every heading in the event stream.
    ///
    /// Heading text is the concatenation of all text and inline code inside
    /// the heading. Ids already present are replaced.
    pub fn apply<'a>(&mut self, mut events: Vec<Event<'a>>) -> (Vec<Event<'a>>, Vec<HeadingNode>) {
        let mut headings = Vec::new();
        let mut open: Option<(usize, u8, String)> = None;
        let mut assignments: Vec<(usize, String)> = Vec::new();

        for (idx, event) in events.iter().enumerate() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    open = Some((idx, *level as u8, String::new()));
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, _, buf)) = open.as_mut() {
                        buf.push_str(text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, _, buf)) = open.as_mut() {
                        buf.push(' ');
                    }
                }
                Event::End(TagEnd::Heading(_)) => {
                    let Some((start, level, text)) = open.take() else {
                        continue;
                    };
                    let text = text.trim().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    let slug = self.assign(&text);
                    if let Some(slug) = &slug {
                        assignments.push((start, slug.clone()));
                    }
                    headings.push(HeadingNode { level, text, slug });
                }
                _ => {}
            }
        }

        for (idx, slug) in assignments {
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[idx] {
                *id = Some(CowStr::from(slug));
            }
        }

        (events, headings)
    }
}
