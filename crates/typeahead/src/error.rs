//! Error types for the typeahead crate.

use thiserror::Error;

/// Result type alias for typeahead construction.
pub type Result<T> = std::result::Result<T, TypeaheadError>;

/// Errors raised while setting a session up. Session operations never fail.
#[derive(Debug, Error)]
pub enum TypeaheadError {
    /// Sessions schedule timers and need a tokio runtime
    #[error("a suggestion session must be built inside a tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
