//! Database statistics and integrity overview.
//!
//! Summarizes what is loaded per book and checks the verse/word invariants
//! the rest of the application relies on: every verse's `word_count`
//! matches its stored words, and word positions run `0..word_count`.

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;

/// Per-book breakdown.
struct BookStats {
    id: String,
    name: String,
    chapter_count: i64,
    chapters_loaded: i64,
    verse_count: i64,
    word_count: i64,
}

/// A verse whose stored words disagree with its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue {
    pub verse_id: String,
    pub word_count: i64,
    pub stored_words: i64,
    pub min_position: Option<i64>,
    pub max_position: Option<i64>,
}

/// Verses violating the word-count or contiguous-position invariants.
pub async fn integrity_issues(pool: &SqlitePool) -> Result<Vec<IntegrityIssue>> {
    let rows = sqlx::query(
        r#"
        SELECT v.id, v.word_count,
               COUNT(w.id) AS stored_words,
               COUNT(DISTINCT w.position) AS distinct_positions,
               MIN(w.position) AS min_position,
               MAX(w.position) AS max_position
        FROM verse v
        LEFT JOIN word w ON w.verse_id = v.id
        GROUP BY v.id
        HAVING stored_words != v.word_count
            OR distinct_positions != stored_words
            OR (stored_words > 0 AND (min_position != 0 OR max_position != stored_words - 1))
        ORDER BY v.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| IntegrityIssue {
            verse_id: row.get("id"),
            word_count: row.get("word_count"),
            stored_words: row.get("stored_words"),
            min_position: row.get("min_position"),
            max_position: row.get("max_position"),
        })
        .collect())
}

/// Run the stats command. Exits non-zero when integrity issues are found.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book")
        .fetch_one(&pool)
        .await?;
    let total_verses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM verse")
        .fetch_one(&pool)
        .await?;
    let total_words: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM word")
        .fetch_one(&pool)
        .await?;
    let compounds: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM word WHERE is_prefix_compound = 1")
            .fetch_one(&pool)
            .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("morphhb — Database Stats");
    println!("========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  Books:       {}", total_books);
    println!("  Verses:      {}", total_verses);
    println!("  Words:       {}", total_words);
    println!("  Compounds:   {}", compounds);

    let book_rows = sqlx::query(
        r#"
        SELECT b.id, b.name, b.chapter_count,
               COUNT(DISTINCT v.chapter) AS chapters_loaded,
               COUNT(DISTINCT v.id) AS verse_count,
               COALESCE(SUM(v.word_count), 0) AS word_count
        FROM book b
        LEFT JOIN verse v ON v.book_id = b.id
        GROUP BY b.id
        ORDER BY b.order_index
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let book_stats: Vec<BookStats> = book_rows
        .iter()
        .map(|row| BookStats {
            id: row.get("id"),
            name: row.get("name"),
            chapter_count: row.get("chapter_count"),
            chapters_loaded: row.get("chapters_loaded"),
            verse_count: row.get("verse_count"),
            word_count: row.get("word_count"),
        })
        .collect();

    if !book_stats.is_empty() {
        println!();
        println!("  By book:");
        println!(
            "  {:<6} {:<16} {:>9} {:>7} {:>8}",
            "ID", "NAME", "CHAPTERS", "VERSES", "WORDS"
        );
        println!("  {}", "-".repeat(52));
        for b in &book_stats {
            println!(
                "  {:<6} {:<16} {:>9} {:>7} {:>8}",
                b.id,
                b.name,
                format!("{}/{}", b.chapters_loaded, b.chapter_count),
                b.verse_count,
                b.word_count
            );
        }
    }

    let issues = integrity_issues(&pool).await?;
    pool.close().await;

    println!();
    if issues.is_empty() {
        println!("  Integrity:   ok");
        println!();
        return Ok(());
    }

    println!("  Integrity:   {} verse(s) inconsistent", issues.len());
    for issue in issues.iter().take(20) {
        println!(
            "    {}  word_count={} stored={} positions={}..{}",
            issue.verse_id,
            issue.word_count,
            issue.stored_words,
            issue
                .min_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into()),
            issue
                .max_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into()),
        );
    }
    println!();
    std::process::exit(1);
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
