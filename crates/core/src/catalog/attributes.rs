//! Physical attribute detection from free text (fiber, knot size).

use once_cell::sync::Lazy;
use regex_lite::{Regex, RegexBuilder};

use super::types::Fiber;

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in attribute regex is valid")
}

/// Checked in order: blends before their components.
static FIBER_PATTERNS: Lazy<Vec<(Fiber, Regex)>> = Lazy::new(|| {
    vec![
        (
            Fiber::Mixed,
            ci(r"\bmixed\b|\bhybrid\b|badger\s*[/&+]\s*boar|boar\s*[/&+]\s*badger"),
        ),
        (
            Fiber::Synthetic,
            ci(r"\bsynth?(?:etic)?\b|\bsyn\b|plissoft|tuxedo|cashmere|timber\s*wolf|\bnylon\b|\bg5[abc]?\b"),
        ),
        (Fiber::Horse, ci(r"\bhorse(?:hair)?\b")),
        (Fiber::Boar, ci(r"\bboar\b|\bbristle\b")),
        (
            Fiber::Badger,
            ci(r"badger|silver\s*-?\s*tip|\bshd\b|\b(?:2|two|3|three)\s*-?\s*band\b|\bmanchurian\b|\bgelous\b"),
        ),
    ]
});

static KNOT_SIZE: Lazy<Regex> = Lazy::new(|| ci(r"\b(\d{2}(?:\.\d+)?)\s*mm\b"));

const MIN_KNOT_MM: f64 = 10.0;
const MAX_KNOT_MM: f64 = 50.0;

/// Fiber named in `text`, if any.
pub fn detect_fiber(text: &str) -> Option<Fiber> {
    FIBER_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(fiber, _)| *fiber)
}

/// Byte offset of the first fiber word in `text`.
pub fn fiber_token_offset(text: &str) -> Option<usize> {
    FIBER_PATTERNS
        .iter()
        .filter_map(|(_, re)| re.find(text).map(|m| m.start()))
        .min()
}

/// Knot diameter written as `NNmm` or `NN.N mm`.
pub fn parse_knot_size(text: &str) -> Option<f64> {
    KNOT_SIZE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|size| (MIN_KNOT_MM..=MAX_KNOT_MM).contains(size))
}

/// Byte offset of the first plausible knot size in `text`.
pub fn knot_size_offset(text: &str) -> Option<usize> {
    KNOT_SIZE
        .captures_iter(text)
        .filter(|caps| {
            caps.get(1)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .is_some_and(|size| (MIN_KNOT_MM..=MAX_KNOT_MM).contains(&size))
        })
        .filter_map(|caps| caps.get(0).map(|m| m.start()))
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_fiber() {
        assert_eq!(detect_fiber("Semogue 610 boar"), Some(Fiber::Boar));
        assert_eq!(detect_fiber("26mm Silvertip"), Some(Fiber::Badger));
        assert_eq!(detect_fiber("2-band"), Some(Fiber::Badger));
        assert_eq!(detect_fiber("Tuxedo 24mm"), Some(Fiber::Synthetic));
        assert_eq!(detect_fiber("syn knot"), Some(Fiber::Synthetic));
        assert_eq!(detect_fiber("horsehair"), Some(Fiber::Horse));
        assert_eq!(detect_fiber("badger/boar mix"), Some(Fiber::Mixed));
        assert_eq!(detect_fiber("Zenith B2"), None);
    }

    #[test]
    fn test_fiber_does_not_match_inside_words() {
        // "syntax" and "boards" are not fibers
        assert_eq!(detect_fiber("syntax boards"), None);
    }

    #[test]
    fn test_parse_knot_size() {
        assert_eq!(parse_knot_size("DG B15 26mm"), Some(26.0));
        assert_eq!(parse_knot_size("24.5 mm boar"), Some(24.5));
        assert_eq!(parse_knot_size("Semogue 610"), None);
        // out of range values are ignored
        assert_eq!(parse_knot_size("99mm"), None);
    }

    #[test]
    fn test_token_offsets() {
        assert_eq!(knot_size_offset("handle w/ 26mm badger"), Some(10));
        assert_eq!(fiber_token_offset("handle w/ 26mm badger"), Some(15));
        assert_eq!(fiber_token_offset("Zebra"), None);
    }
}
