//! Text canonicalization for override keys and strategy input.
//!
//! [`normalize`] is the only function used to produce correct-match keys,
//! both when the store is built and when it is queried.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Characters that only decorate a post (markdown emphasis, quoting).
const DECORATIVE: &[char] = &['*', '_', '~', '`', '"', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];

/// Parenthesised or bracketed usage-count notes such as "(3rd use)", "[use #2]", "(new)".
static USAGE_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\(\[]\s*(?:\d+\s*(?:st|nd|rd|th)?\s*(?:uses?|usages?|times?|lathers?|shaves?)|(?:uses?|usages?|shaves?)\s*#?\s*\d+|first\s+use|new|brand\s+new)\s*[\)\]]",
    )
    .expect("usage annotation regex is valid")
});

/// Canonicalize free-form text.
///
/// Lower-cases, drops decorative punctuation and usage-count annotations,
/// collapses whitespace (any Unicode whitespace, NBSP included) and trims.
/// Alphanumeric content and its order are preserved. Total and idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    // Annotation patterns only see ASCII spaces.
    let undecorated: String = lowered
        .chars()
        .filter(|c| !DECORATIVE.contains(c))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    // Removing one annotation can expose an enclosing one.
    let mut current = undecorated;
    loop {
        let next = USAGE_ANNOTATION.replace_all(&current, " ").into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    current.split_whitespace().collect::<Vec<_>>().join(" ")
}
