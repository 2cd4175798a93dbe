//! Block segmentation and the pending-block queue.
//!
//! A block is a maximal run of non-blank lines. Blank lines inside a fenced
//! code block do not end the block, so a fence always travels as one unit.

use std::collections::VecDeque;

/// Tracks whether a line sits inside a ``` or ~~~ code fence.
#[derive(Debug, Default, Clone)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns true when the line opens, closes or sits
    /// inside a fence.
    ///
    /// Fence markers may be indented by at most three spaces; deeper lines are
    /// indented code.
    pub fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return self.in_fence();
        }
        match self.open {
            Some((marker, len)) => {
                let run = trimmed.chars().take_while(|&c| c == marker).count();
                if run >= len && trimmed[run * marker.len_utf8()..].trim().is_empty() {
                    self.open = None;
                }
                true
            }
            None => {
                let Some(marker) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')
                else {
                    return false;
                };
                let run = trimmed.chars().take_while(|&c| c == marker).count();
                if run < 3 {
                    return false;
                }
                // Backtick fences may not carry backticks in their info string
                if marker == '`' && trimmed[run..].contains('`') {
                    return false;
                }
                self.open = Some((marker, run));
                true
            }
        }
    }
}

/// Split text into blocks separated by blank lines.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence = FenceTracker::new();

    for line in text.lines() {
        let was_fenced = fence.in_fence();
        fence.observe(line);
        if !was_fenced && !fence.in_fence() && line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

/// Pending blocks fed to the block parser in document order.
///
/// Processors may push unconsumed text back to the front so it is the next
/// block handed out.
#[derive(Debug, Default, Clone)]
pub struct BlockQueue {
    blocks: VecDeque<String>,
}

impl BlockQueue {
    pub fn new(blocks: Vec<String>) -> Self {
        Self {
            blocks: blocks.into(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(split_blocks(text))
    }

    pub fn peek(&self) -> Option<&str> {
        self.blocks.front().map(String::as_str)
    }

    pub fn pop(&mut self) -> Option<String> {
        self.blocks.pop_front()
    }

    pub fn push_front(&mut self, block: String) {
        self.blocks.push_front(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_blank_lines() {
        let blocks = split_blocks("one\ntwo\n\n\nthree\n   \nfour");
        assert_eq!(blocks, vec!["one\ntwo", "three", "four"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n\n  \n").is_empty());
    }

    #[test]
    fn test_fence_keeps_blank_lines() {
        let text = "intro\n\n```rust\nfn a() {}\n\nfn b() {}\n```\n\nafter";
        let blocks = split_blocks(text);
        assert_eq!(
            blocks,
            vec!["intro", "```rust\nfn a() {}\n\nfn b() {}\n```", "after"]
        );
    }

    #[test]
    fn test_tilde_fence_needs_matching_marker() {
        let text = "~~~~\nx\n\n```\n\ny\n~~~~\n\nz";
        let blocks = split_blocks(text);
        assert_eq!(blocks, vec!["~~~~\nx\n\n```\n\ny\n~~~~", "z"]);
    }

    #[test]
    fn test_fence_tracker() {
        let mut fence = FenceTracker::new();
        assert!(!fence.observe("plain"));
        assert!(!fence.observe("``inline``"));
        assert!(fence.observe("```python"));
        assert!(fence.in_fence());
        assert!(fence.observe(":::"));
        assert!(fence.observe("```"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_indented_backticks_are_not_a_fence() {
        let mut fence = FenceTracker::new();
        assert!(!fence.observe("    ```"));
        assert!(!fence.in_fence());
        assert!(fence.observe("   ```"));
        assert!(fence.observe("    ```"));
        assert!(fence.in_fence());
        assert!(fence.observe("```"));
        assert!(!fence.in_fence());
    }

    #[test]
    fn test_indented_backticks_keep_blocks_apart() {
        let text = "    ```\n    code\n\n:::note\nx\n:::\n\nafter";
        let blocks = split_blocks(text);
        assert_eq!(blocks, vec!["    ```\n    code", ":::note\nx\n:::", "after"]);
    }

    #[test]
    fn test_queue_pushback() {
        let mut queue = BlockQueue::from_text("a\n\nb");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(), Some("a"));

        let first = queue.pop().unwrap();
        queue.push_front("rest".to_string());
        assert_eq!(queue.pop().as_deref(), Some("rest"));
        assert_eq!(queue.pop().as_deref(), Some("b"));
        assert!(queue.is_empty());

        queue.push_front(first);
        assert_eq!(queue.peek(), Some("a"));
    }
}
