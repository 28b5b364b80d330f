//! Human-readable thread preview
//!
//! Renders a thread as a numbered listing with the weighted length of every
//! post, e.g.
//!
//! ```text
//! 1/2 (24 chars)
//! First paragraph here 1/2
//!
//! 2/2 (25 chars)
//! Second paragraph here 2/2
//! ```

use serde::{Deserialize, Serialize};

use crate::thread::MAX_THREAD_LENGTH;
use crate::weight::weighted_length;

/// One rendered post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewEntry {
    /// 1-based position in the thread
    pub position: usize,
    pub total: usize,
    /// Weighted length of `content` as given, suffix included
    pub cost: usize,
    pub content: String,
}

/// Rendered thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPreview {
    pub entries: Vec<PreviewEntry>,
    /// Entries rendered and separated by a blank line
    pub text: String,
    pub count: usize,
    /// Set when the thread is longer than [`MAX_THREAD_LENGTH`]
    pub warning: Option<String>,
}

/// Render `posts` for display.
pub fn preview<S: AsRef<str>>(posts: &[S]) -> ThreadPreview {
    let count = posts.len();

    let entries: Vec<PreviewEntry> = posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let content = post.as_ref();
            PreviewEntry {
                position: i + 1,
                total: count,
                cost: weighted_length(content),
                content: content.to_string(),
            }
        })
        .collect();

    let text = entries
        .iter()
        .map(|e| format!("{}/{} ({} chars)\n{}", e.position, e.total, e.cost, e.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let warning = (count > MAX_THREAD_LENGTH).then(|| {
        format!(
            "Thread has {} tweets (recommended max: {})",
            count, MAX_THREAD_LENGTH
        )
    });

    ThreadPreview {
        entries,
        text,
        count,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thread::split_thread;

    #[test]
    fn test_single_post_preview() {
        let result = preview(&["Hello world"]);

        assert_eq!(result.count, 1);
        assert_eq!(result.warning, None);
        assert!(result.text.contains("1/1"));
        assert!(result.text.contains(&weighted_length("Hello world").to_string()));
        assert_eq!(result.text, "1/1 (11 chars)\nHello world");
    }

    #[test]
    fn test_entries_are_separated_by_blank_line() {
        let result = preview(&["first 1/2".to_string(), "second 2/2".to_string()]);

        assert_eq!(
            result.text,
            "1/2 (9 chars)\nfirst 1/2\n\n2/2 (10 chars)\nsecond 2/2"
        );
        assert_eq!(result.entries[1].position, 2);
        assert_eq!(result.entries[1].total, 2);
    }

    #[test]
    fn test_cost_uses_weighted_length() {
        let result = preview(&["\u{65E5}\u{672C} https://example.com/path"]);
        assert_eq!(result.entries[0].cost, 4 + 1 + 23);
    }

    #[test]
    fn test_ten_posts_have_no_warning() {
        let posts = vec!["post"; 10];
        assert_eq!(preview(&posts).warning, None);
    }

    #[test]
    fn test_eleven_posts_warn() {
        let posts = vec!["same post"; 11];
        let result = preview(&posts);

        assert_eq!(result.count, 11);
        assert_eq!(
            result.warning.as_deref(),
            Some("Thread has 11 tweets (recommended max: 10)")
        );
    }

    #[test]
    fn test_empty_preview() {
        let result = preview::<&str>(&[]);
        assert_eq!(result.count, 0);
        assert_eq!(result.text, "");
        assert!(result.entries.is_empty());
    }

    #[test]
    fn test_preview_of_split_thread() {
        let posts = split_thread("One paragraph.\n\nAnother paragraph.", 280);
        let result = preview(&posts);

        assert_eq!(result.count, 2);
        assert!(result.text.starts_with("1/2 (18 chars)\nOne paragraph. 1/2"));
        assert!(result.entries.iter().all(|e| e.cost <= 280));
    }
}
