//! Verse retrieval by id.
//!
//! Reads a stored verse and its words back and renders each word's
//! morphology with the decoder. Used by `mhb show`.

use anyhow::{bail, Result};
use serde::Serialize;
use sqlx::Row;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::morph::decode_morphology;

#[derive(Debug, Clone, Serialize)]
pub struct VerseResponse {
    pub id: String,
    pub book_id: String,
    pub chapter: i64,
    pub verse: i64,
    pub hebrew_text: String,
    pub word_count: i64,
    pub words: Vec<WordResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WordResponse {
    pub id: String,
    pub position: i64,
    pub hebrew: String,
    pub lemma: Option<String>,
    pub lemma_prefix: Option<String>,
    pub morph: Option<String>,
    /// `decode_morphology(morph)`, empty when there is no code.
    pub description: String,
    pub is_prefix_compound: bool,
}

/// Core lookup returning structured data.
pub async fn get_verse(config: &Config, id: &str) -> Result<VerseResponse> {
    if !config.db.path.exists() {
        bail!(
            "verse not found: {} (no database at {}; run `mhb init` and `mhb ingest`)",
            id,
            config.db.path.display()
        );
    }
    let pool = db::connect(config).await?;
    if !migrate::schema_exists(&pool).await? {
        pool.close().await;
        bail!("verse not found: {} (database not initialized; run `mhb init`)", id);
    }

    let verse_row = sqlx::query(
        "SELECT id, book_id, chapter, verse, hebrew_text, word_count FROM verse WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    let verse_row = match verse_row {
        Some(row) => row,
        None => {
            pool.close().await;
            bail!("verse not found: {}", id);
        }
    };

    let word_rows = sqlx::query(
        "SELECT id, position, hebrew, lemma, lemma_prefix, morph, is_prefix_compound FROM word WHERE verse_id = ? ORDER BY position ASC",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let words: Vec<WordResponse> = word_rows
        .iter()
        .map(|row| {
            let morph: Option<String> = row.get("morph");
            WordResponse {
                id: row.get("id"),
                position: row.get("position"),
                hebrew: row.get("hebrew"),
                lemma: row.get("lemma"),
                lemma_prefix: row.get("lemma_prefix"),
                description: morph.as_deref().map(decode_morphology).unwrap_or_default(),
                morph,
                is_prefix_compound: row.get("is_prefix_compound"),
            }
        })
        .collect();

    pool.close().await;

    Ok(VerseResponse {
        id: verse_row.get("id"),
        book_id: verse_row.get("book_id"),
        chapter: verse_row.get("chapter"),
        verse: verse_row.get("verse"),
        hebrew_text: verse_row.get("hebrew_text"),
        word_count: verse_row.get("word_count"),
        words,
    })
}

/// CLI entry point: print the verse, or JSON with `--json`.
pub async fn run_show(config: &Config, id: &str, json: bool) -> Result<()> {
    let verse = match get_verse(config, id).await {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&verse)?);
        return Ok(());
    }

    println!("--- Verse ---");
    println!("id:         {}", verse.id);
    println!("book:       {}", verse.book_id);
    println!("reference:  {}:{}", verse.chapter, verse.verse);
    println!("words:      {}", verse.word_count);
    println!();
    println!("{}", verse.hebrew_text);
    println!();

    println!("--- Words ({}) ---", verse.words.len());
    for w in &verse.words {
        let lemma = match (&w.lemma_prefix, &w.lemma) {
            (Some(prefix), Some(lemma)) => format!("{} + {}", prefix, lemma),
            (Some(prefix), None) => prefix.clone(),
            (None, Some(lemma)) => lemma.clone(),
            (None, None) => "-".to_string(),
        };
        println!(
            "[{}] {}  {}  {}",
            w.position,
            w.hebrew,
            lemma,
            w.morph.as_deref().unwrap_or("-")
        );
        if !w.description.is_empty() {
            println!("     {}", w.description);
        }
    }

    Ok(())
}
