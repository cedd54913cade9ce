//! Configuration and resources shared by every command

use crate::OutputFormat;
use anyhow::{Context as _, Result};
use pawsearch_core::config::{read_term_file, Config};
use pawsearch_core::storage::FileStore;
use pawsearch_core::Error;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    vocab: Option<PathBuf>,
}

impl Context {
    pub fn load(config: Option<&str>, vocab: Option<PathBuf>, format: OutputFormat) -> Result<Self> {
        let config = Config::load(config)?;
        if let Some(path) = &config.path {
            debug!(path = %path, "Loaded configuration");
        }
        Ok(Self { config, format, vocab })
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Vocabulary from `--vocab` when given, otherwise from the configuration.
    pub fn vocabulary(&self) -> Result<Vec<String>> {
        match &self.vocab {
            Some(path) => load_vocab_file(path),
            None => Ok(self.config.vocabulary()?),
        }
    }

    /// Like [`vocabulary`](Self::vocabulary) but refuses an empty list.
    pub fn require_vocabulary(&self) -> Result<Vec<String>> {
        let terms = self.vocabulary()?;
        if terms.is_empty() {
            return Err(Error::empty_vocabulary().into());
        }
        Ok(terms)
    }

    /// Persistent store for history.
    pub fn store(&self) -> Result<FileStore> {
        let store = match &self.config.schema.storage.dir {
            Some(dir) => FileStore::new(dir)?,
            None => FileStore::default_store()?,
        };
        debug!(dir = %store.dir().display(), "Using file store");
        Ok(store)
    }

    pub fn history_key<'a>(&'a self, key: Option<&'a str>) -> &'a str {
        key.unwrap_or(&self.config.schema.typeahead.history_key)
    }
}

/// A `.json` file holds an array of terms; anything else is one term per line.
fn load_vocab_file(path: &Path) -> Result<Vec<String>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading vocabulary file {}", path.display()))?;
        let terms = pawsearch_search::vocabulary_from_json(&raw)
            .with_context(|| format!("Parsing vocabulary file {}", path.display()))?;
        Ok(terms)
    } else {
        Ok(read_term_file(path)?)
    }
}
