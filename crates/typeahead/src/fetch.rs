//! Remote suggestion source.
//!
//! The HTTP client lives outside this crate; the session only sees an async
//! function from `(query, limit)` to a list of terms.

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`SuggestionSource::fetch_suggestions`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>, FetchError>> + Send + 'a>>;

/// Failure reported by a remote source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service could not be reached or answered with an error
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that is not a suggestion list
    #[error("malformed suggestion payload: {0}")]
    Malformed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// An asynchronous, read-only source of remote suggestions.
pub trait SuggestionSource: Send + Sync + 'static {
    /// Fetch up to `limit` suggestions for `query`.
    fn fetch_suggestions<'a>(&'a self, query: &'a str, limit: usize) -> FetchFuture<'a>;
}

impl<F, Fut> SuggestionSource for F
where
    F: Fn(String, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, FetchError>> + Send + 'static,
{
    fn fetch_suggestions<'a>(&'a self, query: &'a str, limit: usize) -> FetchFuture<'a> {
        Box::pin(self(query.to_string(), limit))
    }
}

/// Read a suggestion list out of an untyped payload.
///
/// Anything other than an array is treated as "no suggestions"; non-string
/// elements are skipped.
pub fn suggestions_from_json(payload: &serde_json::Value) -> Vec<String> {
    match payload {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}
