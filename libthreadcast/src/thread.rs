//! Thread splitting
//!
//! Turns free-form text into an ordered thread of posts, each of which fits
//! under a weighted-length budget (see [`crate::weight`]). Text is split on
//! paragraphs first, then sentences, then words. A word is never broken.
//!
//! Threads longer than one post get a `" i/N"` suffix on every post. The
//! suffix eats into the budget and its width depends on `N`, which in turn
//! depends on the budget, so the split runs against a worst-case reservation
//! and is then corrected a bounded number of times.
//!
//! # Example
//!
//! ```
//! use libthreadcast::thread::split_thread;
//!
//! let posts = split_thread("First paragraph.\n\nSecond paragraph.", 24);
//! assert_eq!(posts, vec!["First paragraph. 1/2", "Second paragraph. 2/2"]);
//!
//! let single = split_thread("Short enough to post as is.", 280);
//! assert_eq!(single, vec!["Short enough to post as is."]);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::weight::weighted_length;

/// Default per-post budget
pub const DEFAULT_MAX_LENGTH: usize = 280;

/// A thread never has more posts than this; extra posts are dropped
pub const MAX_THREAD_LENGTH: usize = 10;

/// Bound on how often the suffix reservation is re-derived from the actual
/// post count. The capped count is one or two digits wide, so the reservation
/// settles within two rounds.
pub const MAX_CORRECTION_ROUNDS: usize = 2;

/// Result of a split, with the count before the cap was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSplit {
    /// Posts ready to publish, suffixed when there is more than one
    pub posts: Vec<String>,
    /// Number of posts the text needed before truncation to
    /// [`MAX_THREAD_LENGTH`]
    pub uncapped_count: usize,
}

impl ThreadSplit {
    /// Whether trailing posts were dropped to honor the cap
    pub fn is_truncated(&self) -> bool {
        self.uncapped_count > self.posts.len()
    }
}

fn paragraph_break() -> &'static Regex {
    static PARAGRAPH: OnceLock<Regex> = OnceLock::new();
    PARAGRAPH.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph pattern is a valid regex"))
}

fn sentence_break() -> &'static Regex {
    static SENTENCE: OnceLock<Regex> = OnceLock::new();
    SENTENCE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence pattern is a valid regex"))
}

/// Split `text` into a thread where every post weighs at most `max_length`.
///
/// Returns an empty vector for empty or whitespace-only input. Never fails;
/// a single word heavier than the budget is emitted whole.
pub fn split_thread(text: &str, max_length: usize) -> Vec<String> {
    split_thread_detailed(text, max_length).posts
}

/// Like [`split_thread`] but also reports how many posts the text needed
/// before the cap was applied.
pub fn split_thread_detailed(text: &str, max_length: usize) -> ThreadSplit {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ThreadSplit {
            posts: Vec::new(),
            uncapped_count: 0,
        };
    }

    let paragraphs = split_paragraphs(trimmed);

    if paragraphs.len() == 1 && weighted_length(paragraphs[0]) <= max_length {
        return ThreadSplit {
            posts: vec![paragraphs[0].to_string()],
            uncapped_count: 1,
        };
    }

    let worst_case = suffix_length(MAX_THREAD_LENGTH);
    let worst_case_chunks = split_raw(&paragraphs, max_length.saturating_sub(worst_case));

    if worst_case_chunks.len() == 1 {
        return ThreadSplit {
            posts: worst_case_chunks,
            uncapped_count: 1,
        };
    }

    // Raw splitting never yields more chunks under a wider budget. Below ten
    // chunks the reservation narrows from " 10/10" to " N/N" once, the wider
    // budget can only lower the count, and the next round finds the
    // reservation settled. At ten or more the worst case is already exact.
    let mut reserved = worst_case;
    let mut chunks = worst_case_chunks;

    for round in 0..MAX_CORRECTION_ROUNDS {
        let needed = suffix_length(chunks.len().min(MAX_THREAD_LENGTH));
        if needed == reserved {
            break;
        }

        debug!(
            round,
            reserved,
            needed,
            chunks = chunks.len(),
            "Correcting suffix reservation"
        );
        reserved = needed;
        chunks = split_raw(&paragraphs, max_length.saturating_sub(reserved));
    }

    // The wider budget may have packed everything into one post
    if chunks.len() == 1 {
        return ThreadSplit {
            posts: chunks,
            uncapped_count: 1,
        };
    }

    let uncapped_count = chunks.len();
    if uncapped_count > MAX_THREAD_LENGTH {
        warn!(
            uncapped = uncapped_count,
            capped = MAX_THREAD_LENGTH,
            "Thread exceeds maximum length, dropping trailing posts"
        );
        chunks.truncate(MAX_THREAD_LENGTH);
    }

    let total = chunks.len();
    let posts = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("{}{}", chunk, suffix(i + 1, total)))
        .collect();

    ThreadSplit {
        posts,
        uncapped_count,
    }
}

/// Position suffix appended to every post of a multi-post thread
pub fn suffix(position: usize, total: usize) -> String {
    format!(" {}/{}", position, total)
}

/// Widest suffix a thread of `total` posts carries
fn suffix_length(total: usize) -> usize {
    weighted_length(&suffix(total, total))
}

fn split_paragraphs(text: &str) -> Vec<&str> {
    paragraph_break()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Sentences keep their terminal punctuation; the whitespace after it is
/// dropped.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in sentence_break().find_iter(paragraph) {
        // the terminator is a single ASCII byte
        sentences.push(&paragraph[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&paragraph[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split every paragraph against `budget`, without suffixes
fn split_raw(paragraphs: &[&str], budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for paragraph in paragraphs {
        if weighted_length(paragraph) <= budget {
            chunks.push(paragraph.to_string());
        } else {
            pack_sentences(paragraph, budget, &mut chunks);
        }
    }

    chunks
}

fn pack_sentences(paragraph: &str, budget: usize, chunks: &mut Vec<String>) {
    let mut packer = Packer::new(budget);

    for sentence in split_sentences(paragraph) {
        if weighted_length(sentence) > budget {
            packer.flush_into(chunks);
            pack_words(sentence, budget, chunks);
            continue;
        }
        packer.push(sentence, chunks);
    }

    packer.flush_into(chunks);
}

fn pack_words(text: &str, budget: usize, chunks: &mut Vec<String>) {
    let mut packer = Packer::new(budget);

    for word in text.split_whitespace() {
        if weighted_length(word) > budget {
            // Emitted whole: a word is never split, even past the budget.
            packer.flush_into(chunks);
            chunks.push(word.to_string());
            continue;
        }
        packer.push(word, chunks);
    }

    packer.flush_into(chunks);
}

/// Greedy accumulator joining pieces with a single space
struct Packer {
    budget: usize,
    current: String,
}

impl Packer {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            current: String::new(),
        }
    }

    /// Append `piece`, flushing first if it would not fit
    fn push(&mut self, piece: &str, chunks: &mut Vec<String>) {
        if self.current.is_empty() {
            self.current.push_str(piece);
            return;
        }

        let candidate = format!("{} {}", self.current, piece);
        if weighted_length(&candidate) <= self.budget {
            self.current = candidate;
        } else {
            self.flush_into(chunks);
            self.current.push_str(piece);
        }
    }

    fn flush_into(&mut self, chunks: &mut Vec<String>) {
        if !self.current.is_empty() {
            chunks.push(std::mem::take(&mut self.current));
        }
    }
}
