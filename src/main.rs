//! # morphhb CLI (`mhb`)
//!
//! Loads the Open Scriptures Hebrew Bible into SQLite and inspects the result.
//!
//! ## Usage
//!
//! ```bash
//! mhb --config ./config/mhb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mhb init` | Create the SQLite database and run schema migrations |
//! | `mhb books` | List catalog books with corpus-file and load status |
//! | `mhb ingest <BOOK>...` | Load books (`--all`, `--missing`, `--dry-run`) |
//! | `mhb show <VERSE>` | Print a stored verse with decoded morphology |
//! | `mhb decode <CODE>` | Decode a morphology code |
//! | `mhb stats` | Row counts per book and an integrity check |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use morphhb_loader::ingest::BookSelection;
use morphhb_loader::progress::ProgressMode;
use morphhb_loader::{catalog, config, ingest, migrate, morph, show, stats};

/// morphhb loader: batch ingestion of the Open Scriptures Hebrew Bible.
///
/// All commands except `decode` read a TOML configuration file given by
/// `--config`.
#[derive(Parser)]
#[command(
    name = "mhb",
    about = "morphhb loader: batch ingestion of the Open Scriptures Hebrew Bible into SQLite",
    version,
    long_about = "Reads the morphhb OSIS corpus one book at a time, strips cantillation, \
    resolves Strong's lemmas, and loads books, verses and words into SQLite with idempotent, \
    chunked writes. Morphology codes are decoded on demand."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/mhb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the book, verse and word tables.
    /// Running it again is a no-op.
    Init,

    /// List the canonical books, whether their corpus file exists, and
    /// whether they are loaded.
    Books,

    /// Load books from the corpus directory.
    ///
    /// Re-running over loaded books writes nothing. Books whose file is
    /// missing or unreadable are skipped; the rest still load.
    Ingest {
        /// Book ids or abbreviations (`Gen`, `Exod`, `1Sam`, `Ps`).
        books: Vec<String>,

        /// Load every book in the catalog.
        #[arg(long, conflicts_with_all = ["books", "missing"])]
        all: bool,

        /// Load only books with no verses stored yet.
        #[arg(long, conflicts_with = "books")]
        missing: bool,

        /// Parse and count without writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Print a stored verse with its words, lemmas and decoded morphology.
    Show {
        /// Verse id, e.g. `Gen.1.1`.
        id: String,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Decode a morphology code, e.g. `HVqp3ms` or `HR/Ncfsa`.
    Decode {
        code: String,

        /// Print the structured decoding as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show per-book row counts and check verse/word integrity.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Decode { code, json } = &cli.command {
        run_decode(code, *json)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Books => {
            catalog::list_books(&cfg).await?;
        }
        Commands::Ingest {
            books,
            all,
            missing,
            dry_run,
            progress,
        } => {
            let selection = if all {
                BookSelection::All
            } else if missing {
                BookSelection::Missing
            } else {
                BookSelection::Named(books)
            };
            let progress = progress.unwrap_or_else(ProgressMode::default_for_tty);
            ingest::run_ingest_command(&cfg, selection, dry_run, progress).await?;
        }
        Commands::Show { id, json } => {
            show::run_show(&cfg, &id, json).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Decode { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

fn run_decode(code: &str, json: bool) -> anyhow::Result<()> {
    if !json {
        println!("{}", morph::decode_morphology(code));
        return Ok(());
    }

    let value = match morph::parse_morphology(code) {
        Ok(parsed) => serde_json::json!({
            "code": code,
            "language": parsed.language.label(),
            "description": parsed.describe(),
            "segments": parsed.segments,
        }),
        Err(e) => serde_json::json!({
            "code": code,
            "description": code,
            "error": e.to_string(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
