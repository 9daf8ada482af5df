//! Row types written by the loader and read back by `show` and `stats`.
//!
//! These mirror the `book`, `verse`, and `word` tables one-to-one.

use serde::Serialize;

/// Testament recorded for every book of this corpus.
pub const TESTAMENT_OT: &str = "OT";

/// A canonical book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    pub hebrew_name: String,
    pub abbreviation: String,
    pub chapter_count: i64,
    pub testament: String,
    pub order_index: i64,
}

/// A verse row. `word_count` and `hebrew_text` are derived from its words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub id: String,
    pub book_id: String,
    pub chapter: i64,
    pub verse: i64,
    pub hebrew_text: String,
    pub word_count: i64,
}

/// A word row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub id: String,
    pub verse_id: String,
    /// Zero-based, gapless within the verse.
    pub position: i64,
    /// Normalized surface form.
    pub hebrew: String,
    pub lemma: Option<String>,
    pub lemma_prefix: Option<String>,
    /// Raw morphology code, possibly compound.
    pub morph: Option<String>,
    pub is_prefix_compound: bool,
}

/// Deterministic verse id, e.g. `Gen.1.1`.
pub fn verse_id(book_id: &str, chapter: i64, verse: i64) -> String {
    format!("{}.{}.{}", book_id, chapter, verse)
}

/// Word id used when the corpus supplies none, e.g. `Gen-1-1-0`.
pub fn derived_word_id(book_id: &str, chapter: i64, verse: i64, position: i64) -> String {
    format!("{}-{}-{}-{}", book_id, chapter, verse, position)
}
