//! Typeahead sessions for the pawsearch adoption search box.
//!
//! A [`SuggestionSession`] owns the query text and dropdown state for one
//! input. Typing schedules a debounced resolve that ranks the local vocabulary
//! (plus anything a remote [`SuggestionSource`] returns), falls back to
//! "did you mean" guesses when nothing matches, and discards results that
//! arrive after the query has moved on. Accepted terms are remembered in a
//! bounded history persisted through [`pawsearch_core::storage`].

mod error;
mod events;
mod fetch;
pub mod history;
mod resolve;
mod session;
mod state;

pub use error::{Result, TypeaheadError};
pub use events::{NoopEvents, SessionEvents};
pub use fetch::{suggestions_from_json, FetchError, FetchFuture, SuggestionSource};
pub use history::HistoryStore;
pub use resolve::REMOTE_ERROR_MESSAGE;
pub use session::{SessionBuilder, SuggestionSession};
pub use state::{item_at, next_index, previous_index, Phase, Pick, SessionSnapshot, SessionState};
