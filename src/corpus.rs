//! morphhb OSIS markup walker.
//!
//! Reads one book's XML (`<chapter>` → `<verse>` → `<w>`) and turns it into
//! row-ready [`Verse`] and [`Word`] records, grouped per chapter. Element
//! handling is driven by a [`MarkupSchema`] so the walker itself never names
//! OSIS elements.
//!
//! The whole book is parsed before anything is written: a missing file or
//! malformed markup fails the book without touching the database.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::books::BookInfo;
use crate::lemma::parse_lemma;
use crate::models::{derived_word_id, verse_id, Book, Verse, Word};
use crate::normalize::{is_prefix_compound, normalize_surface};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot read corpus file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML near byte {position}: {message}")]
    Xml { position: u64, message: String },
    #[error("<{element}> is missing its osisID")]
    MissingOsisId { element: String },
    #[error("invalid osisID '{0}'")]
    InvalidOsisId(String),
    #[error("osisID '{osis_id}' does not belong to book {book}")]
    WrongBook { osis_id: String, book: String },
    #[error("verse {verse} is inside chapter {chapter}")]
    ChapterMismatch { verse: String, chapter: i64 },
    #[error("verse {0} is not inside a chapter")]
    VerseOutsideChapter(String),
    #[error("word outside any verse (chapter {0})")]
    WordOutsideVerse(i64),
    #[error("<{element}> may appear only once in its parent")]
    Cardinality { element: String },
}

/// What the walker does with an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    Chapter,
    Verse,
    Word,
    /// Ignore the element and everything inside it.
    Skip,
}

/// How many times an element may occur under one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRule {
    pub role: ElementRole,
    pub cardinality: Cardinality,
}

/// Maps element local names to roles. Elements without a rule are
/// transparent: their children are walked, their own text is ignored.
#[derive(Debug, Clone, Default)]
pub struct MarkupSchema {
    rules: HashMap<String, ElementRule>,
}

impl MarkupSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element: &str, role: ElementRole, cardinality: Cardinality) -> Self {
        self.rules
            .insert(element.to_string(), ElementRule { role, cardinality });
        self
    }

    /// Rules for the morphhb corpus. Notes carry textual variants, which
    /// may contain `<w>` elements that are not part of the verse.
    pub fn osis() -> Self {
        Self::new()
            .with("chapter", ElementRole::Chapter, Cardinality::Many)
            .with("verse", ElementRole::Verse, Cardinality::Many)
            .with("w", ElementRole::Word, Cardinality::Many)
            .with("note", ElementRole::Skip, Cardinality::Many)
    }

    pub fn rule(&self, local_name: &[u8]) -> Option<ElementRule> {
        std::str::from_utf8(local_name)
            .ok()
            .and_then(|name| self.rules.get(name))
            .copied()
    }
}

/// All verse and word rows of one chapter, in corpus order.
#[derive(Debug, Clone, Default)]
pub struct ChapterRecords {
    pub number: i64,
    pub verses: Vec<Verse>,
    pub words: Vec<Word>,
}

/// One parsed book, ready for the loader.
#[derive(Debug, Clone)]
pub struct ParsedBook {
    pub book: Book,
    pub chapters: Vec<ChapterRecords>,
}

impl ParsedBook {
    pub fn verse_count(&self) -> usize {
        self.chapters.iter().map(|c| c.verses.len()).sum()
    }

    pub fn word_count(&self) -> usize {
        self.chapters.iter().map(|c| c.words.len()).sum()
    }
}

/// Path of a book's corpus file inside `dir`.
pub fn book_path(dir: &Path, book: &BookInfo) -> PathBuf {
    dir.join(book.file_name())
}

/// Read a book's corpus file into memory.
pub fn read_book(dir: &Path, book: &BookInfo) -> Result<String, CorpusError> {
    let path = book_path(dir, book);
    std::fs::read_to_string(&path).map_err(|source| CorpusError::Read { path, source })
}

/// A `<w>` as found in the markup, before normalization.
#[derive(Debug, Default)]
struct Token {
    raw: String,
    lemma: Option<String>,
    morph: Option<String>,
    id: Option<String>,
}

#[derive(Debug)]
struct OpenVerse {
    number: i64,
    tokens: Vec<Token>,
}

/// Per-parent occurrence counts for `Cardinality::One` checks.
#[derive(Debug, Default)]
struct Seen {
    chapters: usize,
    verses: usize,
    words: usize,
}

struct Walker<'s> {
    info: &'s BookInfo,
    chapters: Vec<ChapterRecords>,
    chapter: Option<ChapterRecords>,
    verse: Option<OpenVerse>,
    word: Option<Token>,
    seen: Seen,
}

/// Parse one book's markup.
pub fn parse_book(
    xml: &str,
    info: &BookInfo,
    schema: &MarkupSchema,
) -> Result<ParsedBook, CorpusError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut walker = Walker {
        info,
        chapters: Vec::new(),
        chapter: None,
        verse: None,
        word: None,
        seen: Seen::default(),
    };
    // Role of every open element, so end tags know what they close.
    let mut open: Vec<Option<ElementRole>> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| CorpusError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        match event {
            Event::Start(e) => {
                let rule = schema.rule(e.local_name().as_ref());
                if let Some(rule) = rule {
                    if rule.role == ElementRole::Skip {
                        let name = e.name().as_ref().to_vec();
                        reader
                            .read_to_end(QName(&name))
                            .map_err(|err| CorpusError::Xml {
                                position: reader.buffer_position() as u64,
                                message: err.to_string(),
                            })?;
                        continue;
                    }
                    walker.open(&e, rule)?;
                }
                open.push(rule.map(|r| r.role));
            }
            Event::Empty(e) => {
                if let Some(rule) = schema.rule(e.local_name().as_ref()) {
                    if rule.role == ElementRole::Word {
                        walker.open(&e, rule)?;
                        walker.close(ElementRole::Word);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(word) = walker.word.as_mut() {
                    let text = t.unescape().map_err(|e| CorpusError::Xml {
                        position: reader.buffer_position() as u64,
                        message: e.to_string(),
                    })?;
                    word.raw.push_str(&text);
                }
            }
            Event::End(_) => {
                if let Some(Some(role)) = open.pop() {
                    walker.close(role);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ParsedBook {
        book: info.to_row(),
        chapters: walker.chapters,
    })
}

impl Walker<'_> {
    fn open(&mut self, e: &BytesStart<'_>, rule: ElementRule) -> Result<(), CorpusError> {
        match rule.role {
            ElementRole::Chapter => {
                self.check_once(rule, self.seen.chapters, e)?;
                self.seen.chapters += 1;
                self.seen.verses = 0;
                let osis_id = osis_id(e, "chapter")?;
                let number = match self.split_osis_id(&osis_id)?.as_slice() {
                    [chapter] => *chapter,
                    _ => return Err(CorpusError::InvalidOsisId(osis_id)),
                };
                self.chapter = Some(ChapterRecords {
                    number,
                    ..Default::default()
                });
            }
            ElementRole::Verse => {
                self.check_once(rule, self.seen.verses, e)?;
                self.seen.verses += 1;
                self.seen.words = 0;
                let osis_id = osis_id(e, "verse")?;
                let (chapter, verse) = match self.split_osis_id(&osis_id)?.as_slice() {
                    [chapter, verse] => (*chapter, *verse),
                    _ => return Err(CorpusError::InvalidOsisId(osis_id)),
                };
                let current = self
                    .chapter
                    .as_ref()
                    .ok_or_else(|| CorpusError::VerseOutsideChapter(osis_id.clone()))?;
                if current.number != chapter {
                    return Err(CorpusError::ChapterMismatch {
                        verse: osis_id,
                        chapter: current.number,
                    });
                }
                self.verse = Some(OpenVerse {
                    number: verse,
                    tokens: Vec::new(),
                });
            }
            ElementRole::Word => {
                if self.verse.is_none() {
                    let chapter = self.chapter.as_ref().map(|c| c.number).unwrap_or(0);
                    return Err(CorpusError::WordOutsideVerse(chapter));
                }
                self.check_once(rule, self.seen.words, e)?;
                self.seen.words += 1;
                self.word = Some(Token {
                    lemma: attribute(e, b"lemma")?,
                    morph: attribute(e, b"morph")?,
                    id: attribute(e, b"id")?,
                    ..Default::default()
                });
            }
            ElementRole::Skip => {}
        }
        Ok(())
    }

    fn close(&mut self, role: ElementRole) {
        match role {
            ElementRole::Chapter => {
                if let Some(chapter) = self.chapter.take() {
                    self.chapters.push(chapter);
                }
            }
            ElementRole::Verse => {
                if let (Some(open), Some(chapter)) = (self.verse.take(), self.chapter.as_mut()) {
                    let (verse, words) = build_verse(self.info.id, chapter.number, open);
                    chapter.verses.push(verse);
                    chapter.words.extend(words);
                }
            }
            ElementRole::Word => {
                if let (Some(token), Some(verse)) = (self.word.take(), self.verse.as_mut()) {
                    verse.tokens.push(token);
                }
            }
            ElementRole::Skip => {}
        }
    }

    fn check_once(
        &self,
        rule: ElementRule,
        seen: usize,
        e: &BytesStart<'_>,
    ) -> Result<(), CorpusError> {
        if rule.cardinality == Cardinality::One && seen > 0 {
            return Err(CorpusError::Cardinality {
                element: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            });
        }
        Ok(())
    }

    /// `Gen.1.2` → `[1, 2]`, checking the book prefix.
    fn split_osis_id(&self, osis_id: &str) -> Result<Vec<i64>, CorpusError> {
        let mut parts = osis_id.split('.');
        let book = parts.next().unwrap_or_default();
        if book != self.info.id {
            return Err(CorpusError::WrongBook {
                osis_id: osis_id.to_string(),
                book: self.info.id.to_string(),
            });
        }
        parts
            .map(|p| {
                p.parse::<i64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| CorpusError::InvalidOsisId(osis_id.to_string()))
            })
            .collect()
    }
}

fn build_verse(book_id: &str, chapter: i64, open: OpenVerse) -> (Verse, Vec<Word>) {
    let id = verse_id(book_id, chapter, open.number);
    let word_count = open.tokens.len() as i64;

    let words: Vec<Word> = open
        .tokens
        .into_iter()
        .enumerate()
        .map(|(position, token)| {
            let position = position as i64;
            let lemma = parse_lemma(token.lemma.as_deref());
            Word {
                id: token
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| derived_word_id(book_id, chapter, open.number, position)),
                verse_id: id.clone(),
                position,
                hebrew: normalize_surface(&token.raw),
                lemma: lemma.primary,
                lemma_prefix: lemma.prefix,
                morph: token.morph.filter(|m| !m.is_empty()),
                is_prefix_compound: is_prefix_compound(&token.raw),
            }
        })
        .collect();

    let hebrew_text = words
        .iter()
        .map(|w| w.hebrew.as_str())
        // Empty forms still count toward word_count but add no separator.
        .filter(|h| !h.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let verse = Verse {
        id,
        book_id: book_id.to_string(),
        chapter,
        verse: open.number,
        hebrew_text,
        word_count,
    };
    (verse, words)
}

fn osis_id(e: &BytesStart<'_>, element: &str) -> Result<String, CorpusError> {
    attribute(e, b"osisID")?.ok_or_else(|| CorpusError::MissingOsisId {
        element: element.to_string(),
    })
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, CorpusError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| CorpusError::Xml {
            position: 0,
            message: err.to_string(),
        })?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|err| CorpusError::Xml {
                position: 0,
                message: err.to_string(),
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
