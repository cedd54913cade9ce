//! Configuration schema definitions
//!
//! Shared configuration types for the library crates and the CLI.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub typeahead: TypeaheadConfig,

    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Typeahead session behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeaheadConfig {
    /// Quiet period after the last keystroke before suggestions are resolved
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Cap on ranked (or remote) suggestions shown
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Cap on remembered searches
    #[serde(default = "default_max_history_items")]
    pub max_history_items: usize,

    /// Cap on "did you mean" guesses
    #[serde(default = "default_max_did_you_mean")]
    pub max_did_you_mean: usize,

    /// Whether history entries participate in the dropdown and selection range
    #[serde(default = "default_true")]
    pub show_history: bool,

    /// Whether the "did you mean" fallback runs when nothing matches
    #[serde(default = "default_true")]
    pub show_did_you_mean: bool,

    /// Use non-empty remote results verbatim instead of ranking locally
    #[serde(default)]
    pub skip_local_fuzzy_search: bool,

    /// Storage key for the history pool
    #[serde(default = "default_history_key")]
    pub history_key: String,

    /// How long a remote failure message stays visible
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,

    /// Delay before an outside interaction closes the dropdown
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
}

impl TypeaheadConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
            max_history_items: default_max_history_items(),
            max_did_you_mean: default_max_did_you_mean(),
            show_history: true,
            show_did_you_mean: true,
            skip_local_fuzzy_search: false,
            history_key: default_history_key(),
            error_display_ms: default_error_display_ms(),
            blur_grace_ms: default_blur_grace_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_suggestions() -> usize {
    5
}

fn default_max_history_items() -> usize {
    5
}

fn default_max_did_you_mean() -> usize {
    3
}

fn default_history_key() -> String {
    "pawsearch.history".to_string()
}

fn default_error_display_ms() -> u64 {
    5000
}

fn default_blur_grace_ms() -> u64 {
    150
}

fn default_true() -> bool {
    true
}

/// Vocabulary sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Inline terms
    #[serde(default)]
    pub terms: Vec<String>,

    /// Optional file with one term per line
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Persisted storage location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted values (defaults to the platform data dir)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
