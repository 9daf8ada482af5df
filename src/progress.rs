//! Ingest progress reporting.
//!
//! A full corpus run covers 39 books and 929 chapters, so `mhb ingest`
//! reports where it is: once per book, and per chapter on the first, the
//! last, and every `loader.progress_every`-th chapter. Progress goes to
//! **stderr** so the final summary on stdout stays parseable.

use std::io::Write;

/// A single progress event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestProgressEvent {
    /// Starting book `n` of `total` selected books.
    Book { book: String, n: u64, total: u64 },
    /// Chapter `n` of `total` in `book` has been written. Counts are
    /// cumulative rows inserted for the book so far.
    Chapter {
        book: String,
        n: u64,
        total: u64,
        verses: u64,
        words: u64,
    },
}

/// Reports ingest progress.
pub trait IngestProgressReporter: Send + Sync {
    fn report(&self, event: IngestProgressEvent);
}

/// Human-friendly progress: "ingest Gen  chapter 10 / 50  (293 verses, 4,021 words)".
pub struct StderrProgress;

impl IngestProgressReporter for StderrProgress {
    fn report(&self, event: IngestProgressEvent) {
        let line = match &event {
            IngestProgressEvent::Book { book, n, total } => {
                format!("ingest {}  book {} / {}\n", book, n, total)
            }
            IngestProgressEvent::Chapter {
                book,
                n,
                total,
                verses,
                words,
            } => format!(
                "ingest {}  chapter {} / {}  ({} verses, {} words)\n",
                book,
                n,
                total,
                format_number(*verses),
                format_number(*words)
            ),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl IngestProgressReporter for JsonProgress {
    fn report(&self, event: IngestProgressEvent) {
        let obj = match &event {
            IngestProgressEvent::Book { book, n, total } => serde_json::json!({
                "event": "progress",
                "book": book,
                "phase": "book",
                "n": n,
                "total": total
            }),
            IngestProgressEvent::Chapter {
                book,
                n,
                total,
                verses,
                words,
            } => serde_json::json!({
                "event": "progress",
                "book": book,
                "phase": "chapter",
                "n": n,
                "total": total,
                "verses": verses,
                "words": words
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl IngestProgressReporter for NoProgress {
    fn report(&self, _event: IngestProgressEvent) {}
}

/// Whether chapter `n` (1-based) of `total` should be reported.
pub fn should_report(n: u64, total: u64, every: u64) -> bool {
    n == 1 || n == total || (every > 0 && n % every == 0)
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn IngestProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
