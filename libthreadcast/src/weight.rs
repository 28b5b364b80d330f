//! Weighted character counting
//!
//! Posts are measured the way the target platform measures them rather than
//! by `chars().count()`:
//!
//! - input is NFC-normalized first
//! - every URL costs a flat 23, however long it is
//! - everything else is counted per extended grapheme cluster, so a ZWJ emoji
//!   sequence or a flag is one unit of cost, not one per code point
//! - a cluster costs 1 if its first code point falls in one of the narrow
//!   ranges below and 2 otherwise
//!
//! Weights are kept on a ×100 scale and the total is ceiling-divided at the
//! end.
//!
//! # Example
//!
//! ```
//! use libthreadcast::weight::weighted_length;
//!
//! assert_eq!(weighted_length("Hello world"), 11);
//! assert_eq!(weighted_length("https://example.com/a/very/long/path"), 23);
//! assert_eq!(weighted_length("日本"), 4);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Internal fixed-point scale for weights
const SCALE: usize = 100;

/// Weight of any code point outside [`NARROW_RANGES`]
const DEFAULT_WEIGHT: usize = 200;

/// Cost of one URL, in whole units
pub const URL_LENGTH: usize = 23;

/// Punctuation that is never scored as part of a URL when it ends the match
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ')', ';', ':', '!', '?'];

/// Inclusive code point range with its scaled weight
struct WeightRange {
    start: u32,
    end: u32,
    weight: usize,
}

/// Checked in order; the first containing range wins.
const NARROW_RANGES: &[WeightRange] = &[
    // Latin-1 and its extensions through Georgian
    WeightRange {
        start: 0x0000,
        end: 0x10FF,
        weight: 100,
    },
    // General punctuation spaces through ZERO WIDTH JOINER
    WeightRange {
        start: 0x2000,
        end: 0x200D,
        weight: 100,
    },
    // Dashes and quotation marks
    WeightRange {
        start: 0x2010,
        end: 0x201F,
        weight: 100,
    },
    // Primes
    WeightRange {
        start: 0x2032,
        end: 0x2037,
        weight: 100,
    },
];

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| {
        Regex::new(
            r#"(?i)\b[a-z][a-z0-9+.\-]*://[^\s<>"']+|\b(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,}\b(?:/[^\s<>"']*)?"#,
        )
        .expect("URL pattern is a valid regex")
    })
}

/// Compute the platform-weighted length of `text`.
///
/// Total for every input; the empty string costs 0.
pub fn weighted_length(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let normalized: String = text.nfc().collect();
    let (url_count, remainder) = strip_urls(&normalized);

    let url_weight = url_count * URL_LENGTH * SCALE;
    let text_weight: usize = remainder.graphemes(true).map(grapheme_weight).sum();

    (url_weight + text_weight).div_ceil(SCALE)
}

/// Scaled weight of a single code point
pub fn code_point_weight(c: char) -> usize {
    let cp = c as u32;
    NARROW_RANGES
        .iter()
        .find(|range| cp >= range.start && cp <= range.end)
        .map(|range| range.weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// A grapheme cluster is weighted by its first code point only
fn grapheme_weight(grapheme: &str) -> usize {
    grapheme.chars().next().map(code_point_weight).unwrap_or(0)
}

/// Remove every URL from `text`, returning how many were removed and the text
/// that remains. Trailing sentence punctuation of a match stays in the
/// remainder.
fn strip_urls(text: &str) -> (usize, String) {
    let mut count = 0;
    let mut remainder = String::with_capacity(text.len());
    let mut cursor = 0;

    for m in url_pattern().find_iter(text) {
        let url = m.as_str().trim_end_matches(URL_TRAILING_PUNCTUATION);
        if url.is_empty() {
            continue;
        }

        remainder.push_str(&text[cursor..m.start()]);
        remainder.push_str(&m.as_str()[url.len()..]);
        cursor = m.end();
        count += 1;
    }
    remainder.push_str(&text[cursor..]);

    (count, remainder)
}
