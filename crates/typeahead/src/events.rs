//! Caller-visible notifications.

/// Callbacks fired by a [`SuggestionSession`](crate::SuggestionSession).
///
/// Every method defaults to a no-op. Callbacks run after the session has
/// released its lock, so they may call back into the session.
pub trait SessionEvents: Send + Sync {
    /// The query text changed (typing, accept, clear)
    fn on_value_change(&self, _text: &str) {}

    /// A free-form search was committed
    fn on_search(&self, _text: &str) {}

    /// A suggestion or history entry was accepted
    fn on_suggestion_select(&self, _text: &str) {}

    /// The input was cleared
    fn on_clear(&self) {}
}

/// Events sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl SessionEvents for NoopEvents {}

/// A notification queued while the session lock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notification {
    ValueChange(String),
    Search(String),
    SuggestionSelect(String),
    Clear,
}

impl Notification {
    pub(crate) fn deliver(&self, events: &dyn SessionEvents) {
        match self {
            Self::ValueChange(text) => events.on_value_change(text),
            Self::Search(text) => events.on_search(text),
            Self::SuggestionSelect(text) => events.on_suggestion_select(text),
            Self::Clear => events.on_clear(),
        }
    }
}
