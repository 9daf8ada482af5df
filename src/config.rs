use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bound parameters per statement SQLite accepts (`SQLITE_MAX_VARIABLE_NUMBER`).
const SQLITE_MAX_VARIABLES: usize = 32_766;

/// Columns bound per row of the `word` insert.
pub const WORD_COLUMNS: usize = 8;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Directory holding one `<OsisId>.xml` file per book.
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
    #[serde(default = "default_word_batch_size")]
    pub word_batch_size: usize,
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            word_batch_size: default_word_batch_size(),
            progress_every: default_progress_every(),
        }
    }
}

fn default_word_batch_size() -> usize {
    500
}
fn default_progress_every() -> usize {
    10
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let max_batch = SQLITE_MAX_VARIABLES / WORD_COLUMNS;
    if config.loader.word_batch_size == 0 || config.loader.word_batch_size > max_batch {
        anyhow::bail!("loader.word_batch_size must be in 1..={}", max_batch);
    }

    if config.loader.progress_every == 0 {
        anyhow::bail!("loader.progress_every must be > 0");
    }

    Ok(())
}
