//! Ingestion pipeline orchestration.
//!
//! Coordinates a run over one or more books: selection → read → parse →
//! load. Each book gets its own connection pool, opened after the book has
//! parsed and closed when its writes finish, whether they succeeded or not.
//! A book that cannot be read or parsed is skipped; a book whose writes fail
//! is recorded as failed. Neither stops the run.

use anyhow::{bail, Result};
use tracing::{error, info, warn};

use crate::books::{find_book, BookInfo, BOOKS};
use crate::config::Config;
use crate::corpus::{parse_book, read_book, MarkupSchema, ParsedBook};
use crate::db;
use crate::catalog::loaded_status;
use crate::loader::load_book;
use crate::migrate;
use crate::progress::{IngestProgressEvent, IngestProgressReporter, ProgressMode};

/// Which books a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSelection {
    /// Explicit ids or abbreviations, in the given order.
    Named(Vec<String>),
    /// Every book in the catalog.
    All,
    /// Catalog books with no verses stored yet.
    Missing,
}

/// Aggregate result of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub books_processed: u64,
    pub books_skipped: Vec<String>,
    pub books_failed: Vec<String>,
    pub chapters: u64,
    pub verses_written: u64,
    pub words_written: u64,
}

/// CLI entry point: run the pipeline and print the summary to stdout.
pub async fn run_ingest_command(
    config: &Config,
    selection: BookSelection,
    dry_run: bool,
    progress: ProgressMode,
) -> Result<()> {
    let reporter = progress.reporter();
    let summary = run_ingest(config, &selection, dry_run, reporter.as_ref()).await?;

    if dry_run {
        println!("ingest (dry-run)");
        println!("  books parsed: {}", summary.books_processed);
        println!("  chapters: {}", summary.chapters);
        println!("  verses found: {}", summary.verses_written);
        println!("  words found: {}", summary.words_written);
    } else {
        println!("ingest");
        println!("  books processed: {}", summary.books_processed);
        println!("  chapters: {}", summary.chapters);
        println!("  verses written: {}", summary.verses_written);
        println!("  words written: {}", summary.words_written);
    }
    if !summary.books_skipped.is_empty() {
        println!(
            "  books skipped: {} ({})",
            summary.books_skipped.len(),
            summary.books_skipped.join(", ")
        );
    }
    if !summary.books_failed.is_empty() {
        println!(
            "  books failed: {} ({})",
            summary.books_failed.len(),
            summary.books_failed.join(", ")
        );
    }
    println!("ok");
    Ok(())
}

/// Run the pipeline over the selected books.
///
/// In a dry run nothing is written and the summary's verse/word counts are
/// the parsed totals instead of inserted rows.
pub async fn run_ingest(
    config: &Config,
    selection: &BookSelection,
    dry_run: bool,
    progress: &dyn IngestProgressReporter,
) -> Result<IngestSummary> {
    if !dry_run {
        migrate::run_migrations(config).await?;
    }

    let books = select_books(config, selection).await?;
    let schema = MarkupSchema::osis();
    let total = books.len() as u64;
    let mut summary = IngestSummary::default();

    for (i, info) in books.into_iter().enumerate() {
        progress.report(IngestProgressEvent::Book {
            book: info.id.to_string(),
            n: i as u64 + 1,
            total,
        });

        let parsed = match read_and_parse(config, info, &schema) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(book = info.id, error = %e, "skipping book");
                summary.books_skipped.push(info.id.to_string());
                continue;
            }
        };

        if dry_run {
            summary.books_processed += 1;
            summary.chapters += parsed.chapters.len() as u64;
            summary.verses_written += parsed.verse_count() as u64;
            summary.words_written += parsed.word_count() as u64;
            continue;
        }

        let pool = match db::connect(config).await {
            Ok(pool) => pool,
            Err(e) => {
                error!(book = info.id, error = %e, "cannot open database");
                summary.books_failed.push(info.id.to_string());
                continue;
            }
        };
        let result = load_book(&pool, &parsed, &config.loader, progress).await;
        pool.close().await;

        match result {
            Ok(stats) => {
                info!(
                    book = info.id,
                    chapters = stats.chapters,
                    verses = stats.verses_written,
                    words = stats.words_written,
                    "book loaded"
                );
                summary.books_processed += 1;
                summary.chapters += stats.chapters;
                summary.verses_written += stats.verses_written;
                summary.words_written += stats.words_written;
            }
            Err(e) => {
                error!(book = info.id, error = %e, "book failed");
                summary.books_failed.push(info.id.to_string());
            }
        }
    }

    Ok(summary)
}

fn read_and_parse(
    config: &Config,
    info: &BookInfo,
    schema: &MarkupSchema,
) -> Result<ParsedBook, crate::corpus::CorpusError> {
    let xml = read_book(&config.corpus.dir, info)?;
    parse_book(&xml, info, schema)
}

async fn select_books(
    config: &Config,
    selection: &BookSelection,
) -> Result<Vec<&'static BookInfo>> {
    match selection {
        BookSelection::Named(keys) => resolve_named(keys),
        BookSelection::All => Ok(BOOKS.iter().collect()),
        BookSelection::Missing => {
            // A dry run may target a database that was never initialized.
            let loaded = loaded_status(config).await?;
            Ok(BOOKS.iter().filter(|b| !loaded.contains(b.id)).collect())
        }
    }
}

fn resolve_named(keys: &[String]) -> Result<Vec<&'static BookInfo>> {
    if keys.is_empty() {
        bail!("No books selected. Name one or more books, or pass --all or --missing.");
    }
    let mut books: Vec<&'static BookInfo> = Vec::new();
    for key in keys {
        let Some(book) = find_book(key) else {
            bail!("Unknown book: '{}'. Run `mhb books` to list ids.", key);
        };
        if !books.iter().any(|b| b.id == book.id) {
            books.push(book);
        }
    }
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CorpusConfig, DbConfig, LoaderConfig};
    use crate::progress::NoProgress;

    const JONAH_1: &str = r#"<osis><osisText><div type="book" osisID="Jonah">
<chapter osisID="Jonah.1"><verse osisID="Jonah.1.1"><w lemma="c/1961" morph="HC/Vqw3ms">וַֽ/יְהִי֙</w><w lemma="1697" morph="HNcmsc">דְּבַר</w></verse></chapter>
</div></osisText></osis>"#;

    fn config(dir: &tempfile::TempDir) -> Config {
        Config {
            db: DbConfig {
                path: dir.path().join("data").join("mhb.sqlite"),
            },
            corpus: CorpusConfig {
                dir: dir.path().join("wlc"),
            },
            loader: LoaderConfig::default(),
        }
    }

    fn write_corpus(dir: &tempfile::TempDir, files: &[(&str, &str)]) {
        let wlc = dir.path().join("wlc");
        std::fs::create_dir_all(&wlc).unwrap();
        for (name, xml) in files {
            std::fs::write(wlc.join(name), xml).unwrap();
        }
    }

    #[test]
    fn named_selection_dedupes_and_validates() {
        let books = resolve_named(&["gen".into(), "Gen".into(), "Ex".into()]).unwrap();
        let ids: Vec<&str> = books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["Gen", "Exod"]);

        assert!(resolve_named(&["Matt".into()]).is_err());
        assert!(resolve_named(&[]).is_err());
    }

    #[tokio::test]
    async fn missing_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir, &[("Jonah.xml", JONAH_1)]);
        let cfg = config(&dir);

        let selection = BookSelection::Named(vec!["Obad".into(), "Jonah".into()]);
        let summary = run_ingest(&cfg, &selection, false, &NoProgress).await.unwrap();

        assert_eq!(summary.books_skipped, vec!["Obad".to_string()]);
        assert_eq!(summary.books_processed, 1);
        assert_eq!(summary.verses_written, 1);
        assert_eq!(summary.words_written, 2);
    }

    #[tokio::test]
    async fn malformed_book_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let broken = r#"<chapter osisID="Obad.1"><verse osisID="Obad.1.1"><w>x</verse>"#;
        write_corpus(&dir, &[("Obad.xml", broken)]);
        let cfg = config(&dir);

        let selection = BookSelection::Named(vec!["Obad".into()]);
        let summary = run_ingest(&cfg, &selection, false, &NoProgress).await.unwrap();
        assert_eq!(summary.books_skipped, vec!["Obad".to_string()]);

        let pool = db::connect(&cfg).await.unwrap();
        let verses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM verse")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(verses, 0);
        pool.close().await;
    }

    #[tokio::test]
    async fn storage_failure_is_isolated_to_its_book() {
        let obad = r#"<osis><osisText><div type="book" osisID="Obad">
<chapter osisID="Obad.1"><verse osisID="Obad.1.1"><w lemma="2377" morph="HNcmsc">חֲז֖וֹן</w></verse></chapter>
</div></osisText></osis>"#;
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir, &[("Obad.xml", obad), ("Jonah.xml", JONAH_1)]);
        let cfg = config(&dir);

        migrate::run_migrations(&cfg).await.unwrap();
        let pool = db::connect(&cfg).await.unwrap();
        sqlx::query(
            r#"
            CREATE TRIGGER reject_obad_words BEFORE INSERT ON word
            WHEN NEW.verse_id LIKE 'Obad.%'
            BEGIN SELECT RAISE(ABORT, 'disk full'); END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;

        let selection = BookSelection::Named(vec!["Obad".into(), "Jonah".into()]);
        let summary = run_ingest(&cfg, &selection, false, &NoProgress).await.unwrap();
        assert_eq!(summary.books_failed, vec!["Obad".to_string()]);
        assert_eq!(summary.books_processed, 1);
        assert_eq!(summary.words_written, 2);

        let pool = db::connect(&cfg).await.unwrap();
        let obad_verses: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM verse WHERE book_id = 'Obad'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(obad_verses, 0);
        let jonah_verses: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM verse WHERE book_id = 'Jonah'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(jonah_verses, 1);
        pool.close().await;
    }

    #[tokio::test]
    async fn rerun_writes_nothing_new() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir, &[("Jonah.xml", JONAH_1)]);
        let cfg = config(&dir);
        let selection = BookSelection::Named(vec!["Jonah".into()]);

        run_ingest(&cfg, &selection, false, &NoProgress).await.unwrap();
        let again = run_ingest(&cfg, &selection, false, &NoProgress).await.unwrap();
        assert_eq!(again.books_processed, 1);
        assert_eq!(again.verses_written, 0);
        assert_eq!(again.words_written, 0);
        assert!(again.books_failed.is_empty());
    }

    #[tokio::test]
    async fn missing_selection_skips_loaded_books() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir, &[("Jonah.xml", JONAH_1)]);
        let cfg = config(&dir);

        run_ingest(&cfg, &BookSelection::Named(vec!["Jonah".into()]), false, &NoProgress)
            .await
            .unwrap();

        let books = select_books(&cfg, &BookSelection::Missing).await.unwrap();
        assert_eq!(books.len(), BOOKS.len() - 1);
        assert!(books.iter().all(|b| b.id != "Jonah"));
    }

    #[tokio::test]
    async fn missing_selection_on_uninitialized_database() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir);
        let pool = db::connect(&cfg).await.unwrap();
        pool.close().await;

        let books = select_books(&cfg, &BookSelection::Missing).await.unwrap();
        assert_eq!(books.len(), BOOKS.len());
    }

    #[tokio::test]
    async fn dry_run_counts_without_database() {
        let dir = tempfile::tempdir().unwrap();
        write_corpus(&dir, &[("Jonah.xml", JONAH_1)]);
        let cfg = config(&dir);

        let selection = BookSelection::Named(vec!["Jonah".into()]);
        let summary = run_ingest(&cfg, &selection, true, &NoProgress).await.unwrap();
        assert_eq!(summary.verses_written, 1);
        assert_eq!(summary.words_written, 2);
        assert!(!cfg.db.path.exists());
    }
}
