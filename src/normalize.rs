//! Hebrew surface-text normalization.
//!
//! The morphhb corpus stores each word with its full Masoretic pointing:
//! consonants, vowel points (nikkud), and cantillation accents. Stored
//! surface forms keep the vowel points but drop the accents, and lose the
//! `/` markers the corpus uses to separate morphological prefixes inside a
//! single token.
//!
//! All functions here are pure and total over any `&str`.

use std::ops::RangeInclusive;

/// Hebrew cantillation block (accents), U+0591 ETNAHTA through U+05AF MASORA CIRCLE.
pub const CANTILLATION: RangeInclusive<char> = '\u{0591}'..='\u{05AF}';

/// Separator the corpus places between a prefix and its host word.
pub const PREFIX_SEPARATOR: char = '/';

/// Returns `true` if `c` is a cantillation mark.
pub fn is_cantillation(c: char) -> bool {
    CANTILLATION.contains(&c)
}

/// Remove every cantillation mark, keeping all other code points in order.
pub fn strip_cantillation(text: &str) -> String {
    text.chars().filter(|c| !is_cantillation(*c)).collect()
}

/// Remove the prefix separators from a surface token.
pub fn remove_slashes(text: &str) -> String {
    text.chars().filter(|c| *c != PREFIX_SEPARATOR).collect()
}

/// Full normalization applied to every word before it is stored.
pub fn normalize_surface(text: &str) -> String {
    remove_slashes(&strip_cantillation(text))
}

/// Whether the raw (pre-normalization) token was written as a prefix compound.
pub fn is_prefix_compound(raw: &str) -> bool {
    raw.contains(PREFIX_SEPARATOR)
}
