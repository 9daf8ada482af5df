use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the Bible tables and indexes. Safe to run any number of times.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let result = apply(&pool).await;
    pool.close().await;
    result
}

/// Whether the tables created by [`run_migrations`] are present.
pub async fn schema_exists(pool: &SqlitePool) -> Result<bool> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('book', 'verse', 'word')",
    )
    .fetch_one(pool)
    .await?;
    Ok(tables == 3)
}

async fn apply(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS book (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            hebrew_name TEXT NOT NULL,
            abbreviation TEXT NOT NULL,
            chapter_count INTEGER NOT NULL,
            testament TEXT NOT NULL,
            order_index INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS verse (
            id TEXT PRIMARY KEY,
            book_id TEXT NOT NULL,
            chapter INTEGER NOT NULL,
            verse INTEGER NOT NULL,
            hebrew_text TEXT NOT NULL,
            word_count INTEGER NOT NULL,
            FOREIGN KEY (book_id) REFERENCES book(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS word (
            id TEXT PRIMARY KEY,
            verse_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            hebrew TEXT NOT NULL,
            lemma TEXT,
            lemma_prefix TEXT,
            morph TEXT,
            is_prefix_compound INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (verse_id) REFERENCES verse(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_verse_book ON verse(book_id, chapter, verse)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_verse ON word(verse_id, position)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_word_lemma ON word(lemma)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, DbConfig, LoaderConfig};

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db: DbConfig {
                path: dir.path().join("mhb.sqlite"),
            },
            corpus: CorpusConfig {
                dir: dir.path().to_path_buf(),
            },
            loader: LoaderConfig::default(),
        };

        let pool = db::connect(&config).await.unwrap();
        assert!(!schema_exists(&pool).await.unwrap());
        pool.close().await;

        run_migrations(&config).await.unwrap();
        run_migrations(&config).await.unwrap();

        let pool = db::connect(&config).await.unwrap();
        assert!(schema_exists(&pool).await.unwrap());
        pool.close().await;
    }
}
