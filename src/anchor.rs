//! Anchor formatting
//!
//! Reproduces the fragment ids the API reference renderer assigns to its
//! `h2` headings.

use regex::Regex;
use std::sync::LazyLock;

// Unicode letters (general category L*) plus underscore. Combining marks
// and letter-like numerics are separators.
static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\p{L}_]+").unwrap());

/// Convert a header string into the anchor the reference renderer produces.
///
/// Letters are lowercased and underscores kept. Any run of other characters
/// (including digits) collapses into a single `-` before the next letter,
/// so a trailing run vanishes while a leading one still yields a `-`.
pub fn slug(header: &str) -> String {
    let header = header.trim();
    let mut result = String::with_capacity(header.len());
    let mut end = 0;

    for word in RE_WORD.find_iter(header) {
        if word.start() > end {
            result.push('-');
        }
        result.extend(word.as_str().chars().flat_map(char::to_lowercase));
        end = word.end();
    }

    result
}
