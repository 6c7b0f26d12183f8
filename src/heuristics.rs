//! Word-likeness heuristics and default acceptability predicates
//!
//! These filters keep auto-generated noise (hashed class names, compiled
//! CSS-module identifiers) out of synthesized selectors. False negatives are
//! acceptable; accepting noise is the failure mode to avoid.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Attribute names that are generally good selector candidates.
static ACCEPTED_ATTR_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["role", "name", "aria-label", "rel", "href"].into_iter().collect());

/// Basic word-like shape: at least 3 chars, letters and hyphens only.
static WORDLIKE_BASE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z-]{3,}$").expect("wordlike base regex"));

/// Four or more consecutive non-vowel letters.
static CONSONANT_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[^aeiou]{4,}").expect("consonant run regex"));

/// Maximum length for an attribute value to be considered in a selector.
const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 100;

/// Minimum length for a word segment (split by hyphen or camelCase boundary).
const MIN_WORD_SEGMENT_LENGTH: usize = 2;

/// Check if a string looks like a human-written token rather than generated
/// noise.
///
/// The string must be at least 3 characters of letters and hyphens; when
/// split on hyphens and uppercase boundaries, every segment must be longer
/// than 2 characters and free of 4+ consecutive non-vowel runs.
pub fn word_like(name: &str) -> bool {
    if !WORDLIKE_BASE_REGEX.is_match(name) {
        return false;
    }
    for word in name.split(|c: char| c == '-' || c.is_ascii_uppercase()) {
        if word.len() <= MIN_WORD_SEGMENT_LENGTH {
            return false;
        }
        if CONSONANT_RUN_REGEX.is_match(word) {
            return false;
        }
    }
    true
}

/// Default attribute predicate: allow-listed or word-like `data-*` names,
/// paired with a short word-like value or an id-reference value.
pub fn attr(name: &str, value: &str) -> bool {
    let name_is_ok =
        ACCEPTED_ATTR_NAMES.contains(name) || (name.starts_with("data-") && word_like(name));

    let value_is_ok = (word_like(value) && value.len() < MAX_ATTRIBUTE_VALUE_LENGTH)
        || value
            .strip_prefix('#')
            .map(word_like)
            .unwrap_or(false);

    name_is_ok && value_is_ok
}

/// Default id predicate: word-like names only.
pub fn id_name(name: &str) -> bool {
    word_like(name)
}

/// Default class predicate: word-like names only.
pub fn class_name(name: &str) -> bool {
    word_like(name)
}

/// Default tag predicate: any tag may appear in a selector.
pub fn tag_name(_name: &str) -> bool {
    true
}
