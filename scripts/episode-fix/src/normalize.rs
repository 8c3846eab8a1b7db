//! Text canonicalisation shared by the catalog and the scanner.
//!
//! Both sides of a comparison must go through [`normalize`]; a key built any
//! other way will silently score lower against every catalog title.

use once_cell::sync::Lazy;
use regex::Regex;

static NOT_ALNUM_OR_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s]+").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Canonical comparison form of a title or file stem.
///
/// Hyphens become spaces, anything that is not an ASCII letter, digit or
/// whitespace is dropped, whitespace runs collapse to a single space, the
/// result is trimmed and ASCII-lowercased. Idempotent.
pub fn normalize(text: &str) -> String {
    let spaced = text.replace('-', " ");
    let stripped = NOT_ALNUM_OR_SPACE.replace_all(&spaced, "");
    let compact = WHITESPACE_RUN.replace_all(&stripped, " ");
    compact.trim().to_ascii_lowercase()
}

/// Upper-cases the first character of every whitespace-separated word and
/// lower-cases the rest, so `2nd` stays `2nd`.
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
