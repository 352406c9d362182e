//! Root-collation ordering for display strings.
//!
//! Three levels, compared in turn:
//! 1. base letters with accents folded away, where whitespace sorts before
//!    punctuation, punctuation before digits and digits before letters;
//! 2. accents;
//! 3. case, lowercase first.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Primary {
    Space,
    Symbol(u32),
    Digit(u32),
    Letter(char),
}

fn primary(c: char) -> Primary {
    if c.is_whitespace() {
        Primary::Space
    } else if let Some(d) = c.to_digit(10) {
        Primary::Digit(d)
    } else if c.is_alphanumeric() {
        Primary::Letter(c)
    } else {
        let rank = PUNCTUATION
            .find(c)
            .map_or(PUNCTUATION.len() as u32 + u32::from(c), |i| i as u32);
        Primary::Symbol(rank)
    }
}

fn primary_key(s: &str) -> Vec<Primary> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(primary)
        .collect()
}

fn accent_key(s: &str) -> Vec<char> {
    s.nfd().flat_map(char::to_lowercase).collect()
}

/// Compare two strings the way a root-locale collator orders them.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| b.cmp(a))
}
