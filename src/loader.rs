//! Batch writes of parsed books.
//!
//! Every insert is `ON CONFLICT DO NOTHING` (verses, words) or a metadata
//! refresh of the same key (books), so loading a book twice leaves the
//! tables unchanged. Counts returned here are rows actually inserted, which
//! makes a re-run report zero.

use std::collections::HashSet;

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::LoaderConfig;
use crate::corpus::{ChapterRecords, ParsedBook};
use crate::models::{Book, Verse, Word};
use crate::progress::{should_report, IngestProgressEvent, IngestProgressReporter};

/// Rows inserted for one chapter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChapterWriteStats {
    pub verses_written: u64,
    pub words_written: u64,
}

/// Rows inserted for one book.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BookWriteStats {
    pub chapters: u64,
    pub verses_written: u64,
    pub words_written: u64,
}

pub async fn upsert_book(pool: &SqlitePool, book: &Book) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO book (id, name, hebrew_name, abbreviation, chapter_count, testament, order_index)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            hebrew_name = excluded.hebrew_name,
            abbreviation = excluded.abbreviation,
            chapter_count = excluded.chapter_count,
            testament = excluded.testament,
            order_index = excluded.order_index
        "#,
    )
    .bind(&book.id)
    .bind(&book.name)
    .bind(&book.hebrew_name)
    .bind(&book.abbreviation)
    .bind(book.chapter_count)
    .bind(&book.testament)
    .bind(book.order_index)
    .execute(pool)
    .await?;

    Ok(())
}

/// Write one chapter: all verses in one statement, words in chunks of
/// `word_batch_size`, everything in one transaction.
pub async fn store_chapter(
    pool: &SqlitePool,
    chapter: &ChapterRecords,
    word_batch_size: usize,
) -> Result<ChapterWriteStats> {
    let mut stats = ChapterWriteStats::default();
    let mut tx = pool.begin().await?;

    if !chapter.verses.is_empty() {
        stats.verses_written = insert_verses(&mut tx, &chapter.verses).await?;
    }

    for batch in chapter.words.chunks(word_batch_size.max(1)) {
        stats.words_written += insert_words(&mut tx, batch).await?;
    }

    tx.commit().await?;
    Ok(stats)
}

async fn insert_verses(tx: &mut sqlx::Transaction<'_, Sqlite>, verses: &[Verse]) -> Result<u64> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO verse (id, book_id, chapter, verse, hebrew_text, word_count) ",
    );
    qb.push_values(verses, |mut row, v| {
        row.push_bind(v.id.clone())
            .push_bind(v.book_id.clone())
            .push_bind(v.chapter)
            .push_bind(v.verse)
            .push_bind(v.hebrew_text.clone())
            .push_bind(v.word_count);
    });
    qb.push(" ON CONFLICT(id) DO NOTHING");

    let result = qb.build().execute(&mut **tx).await?;
    Ok(result.rows_affected())
}

async fn insert_words(tx: &mut sqlx::Transaction<'_, Sqlite>, words: &[Word]) -> Result<u64> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "INSERT INTO word (id, verse_id, position, hebrew, lemma, lemma_prefix, morph, is_prefix_compound) ",
    );
    qb.push_values(words, |mut row, w| {
        row.push_bind(w.id.clone())
            .push_bind(w.verse_id.clone())
            .push_bind(w.position)
            .push_bind(w.hebrew.clone())
            .push_bind(w.lemma.clone())
            .push_bind(w.lemma_prefix.clone())
            .push_bind(w.morph.clone())
            .push_bind(w.is_prefix_compound);
    });
    qb.push(" ON CONFLICT(id) DO NOTHING");

    let result = qb.build().execute(&mut **tx).await?;
    Ok(result.rows_affected())
}

/// Upsert the book row, then write every chapter in corpus order.
pub async fn load_book(
    pool: &SqlitePool,
    parsed: &ParsedBook,
    loader: &LoaderConfig,
    progress: &dyn IngestProgressReporter,
) -> Result<BookWriteStats> {
    upsert_book(pool, &parsed.book).await?;

    let total = parsed.chapters.len() as u64;
    let mut stats = BookWriteStats::default();

    for (i, chapter) in parsed.chapters.iter().enumerate() {
        let written = store_chapter(pool, chapter, loader.word_batch_size).await?;
        stats.chapters += 1;
        stats.verses_written += written.verses_written;
        stats.words_written += written.words_written;

        let n = i as u64 + 1;
        if should_report(n, total, loader.progress_every as u64) {
            progress.report(IngestProgressEvent::Chapter {
                book: parsed.book.id.clone(),
                n,
                total,
                verses: stats.verses_written,
                words: stats.words_written,
            });
        }
    }

    Ok(stats)
}

/// Ids of books that already have at least one verse stored.
pub async fn loaded_book_ids(pool: &SqlitePool) -> Result<HashSet<String>> {
    let ids: Vec<String> = sqlx::query_scalar("SELECT DISTINCT book_id FROM verse")
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}
