//! Fuzzy matching for the pawsearch typeahead.
//!
//! This crate provides:
//! - Levenshtein edit distance and normalised similarity
//! - A layered relevance ladder (exact, word prefix, prefix, multi-word, substring, fuzzy)
//! - Vocabulary ranking with stable tie-breaking
//! - "Did you mean" guesses for queries that matched nothing

mod did_you_mean;
mod error;
mod matcher;
mod relevance;
mod similarity;

#[cfg(feature = "wasm")]
mod wasm;

pub use did_you_mean::did_you_mean;
pub use error::{vocabulary_from_json, Result, SearchError};
pub use matcher::{fuzzy_search, rank};
pub use relevance::{calculate_relevance, MatchKind, PreparedQuery, RelevanceScore};
pub use similarity::{levenshtein_distance, similarity};

/// Search result with relevance score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchResult<T> {
    /// The matched item
    pub item: T,
    /// Relevance score (higher is better)
    pub score: i64,
}
