//! # morphhb-loader
//!
//! Batch ingestion of the Open Scriptures Hebrew Bible (morphhb) into SQLite.
//!
//! The corpus ships one OSIS XML file per book, with every word carrying its
//! pointed Hebrew text, a Strong's lemma reference and a compact morphology
//! code. This crate normalizes the text, resolves the lemmas, loads books,
//! verses and words into three tables, and decodes morphology codes into
//! readable descriptions on demand.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────────┐   ┌──────────┐
//! │  Gen.xml   │──▶│ corpus               │──▶│  loader  │──▶ SQLite
//! │  Exod.xml  │   │ normalize + lemma    │   │ batches  │    book/verse/word
//! └────────────┘   └──────────────────────┘   └──────────┘
//!                                                   │
//!                         morph::decode_morphology ◀┘ (read time)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! mhb init                  # create database
//! mhb ingest Gen Exod       # load two books
//! mhb ingest --missing      # load everything not yet loaded
//! mhb show Gen.1.1          # print a verse with decoded morphology
//! mhb decode HVqp3ms        # Verb, Qal, Perfect, 3rd, masc., sing.
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Cantillation and prefix-separator stripping |
//! | [`lemma`] | Strong's lemma references |
//! | [`morph`] | Morphology code decoding |
//! | [`books`] | Canonical book catalog |
//! | [`corpus`] | OSIS markup walker |
//! | [`loader`] | Chunked, idempotent writes |
//! | [`ingest`] | Per-book pipeline orchestration |
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod books;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod db;
pub mod ingest;
pub mod lemma;
pub mod loader;
pub mod migrate;
pub mod models;
pub mod morph;
pub mod normalize;
pub mod progress;
pub mod show;
pub mod stats;
