use std::collections::HashSet;

use anyhow::Result;

use crate::books::BOOKS;
use crate::config::Config;
use crate::corpus::book_path;
use crate::db;
use crate::loader::loaded_book_ids;
use crate::migrate;

/// Ids of loaded books. A database that does not exist yet, or has no
/// schema, has nothing loaded; any other database error is returned.
pub async fn loaded_status(config: &Config) -> Result<HashSet<String>> {
    if !config.db.path.exists() {
        return Ok(HashSet::new());
    }
    let pool = db::connect(config).await?;
    let result = match migrate::schema_exists(&pool).await {
        Ok(true) => loaded_book_ids(&pool).await,
        Ok(false) => Ok(HashSet::new()),
        Err(e) => Err(e),
    };
    pool.close().await;
    result
}

/// List every catalog book with its corpus file and load status.
pub async fn list_books(config: &Config) -> Result<()> {
    let loaded = loaded_status(config).await?;

    println!(
        "{:<6} {:<16} {:<14} {:>8}  {:<8} LOADED",
        "ID", "NAME", "HEBREW", "CHAPTERS", "FILE"
    );
    for book in BOOKS {
        let file = if book_path(&config.corpus.dir, book).is_file() {
            "OK"
        } else {
            "MISSING"
        };
        println!(
            "{:<6} {:<16} {:<14} {:>8}  {:<8} {}",
            book.id,
            book.name,
            book.hebrew_name,
            book.chapter_count,
            file,
            loaded.contains(book.id)
        );
    }

    Ok(())
}
