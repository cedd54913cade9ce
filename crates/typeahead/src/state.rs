//! Session state and the flat selection index.

use serde::Serialize;

/// What the open dropdown is doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "message", rename_all = "snake_case")]
pub enum Phase {
    /// Results are up to date
    Idle,
    /// A resolve is scheduled or in flight
    Loading,
    /// A remote failure is being shown; reverts to `Idle` on its own
    Error(String),
}

/// Open/closed state of the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "open", rename_all = "snake_case")]
pub enum SessionState {
    Closed,
    Open(Phase),
}

impl SessionState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Open(Phase::Loading))
    }

    /// Message of a transient error, if one is showing
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Open(Phase::Error(message)) => Some(message),
            _ => None,
        }
    }
}

/// How to pick the term to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// Position in suggestions followed by history
    Index(usize),
    /// An explicit term, e.g. from a pointer click on custom content
    Term(String),
}

impl From<usize> for Pick {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<String> for Pick {
    fn from(term: String) -> Self {
        Self::Term(term)
    }
}

impl From<&str> for Pick {
    fn from(term: &str) -> Self {
        Self::Term(term.to_string())
    }
}

/// Everything a renderer needs, captured at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub query: String,
    pub state: SessionState,
    pub suggestions: Vec<String>,
    pub did_you_mean: Vec<String>,
    /// History entries that take part in the dropdown (empty when history is hidden)
    pub history: Vec<String>,
    pub selected: Option<usize>,
}

impl SessionSnapshot {
    #[cfg(test)]
    pub(crate) fn closed() -> Self {
        Self {
            query: String::new(),
            state: SessionState::Closed,
            suggestions: Vec::new(),
            did_you_mean: Vec::new(),
            history: Vec::new(),
            selected: None,
        }
    }

    /// Item under the selection, if any
    pub fn selected_item(&self) -> Option<&str> {
        self.selected
            .and_then(|i| item_at(&self.suggestions, &self.history, i))
    }
}

/// Resolve a flat index over `suggestions ++ history`.
pub fn item_at<'a>(suggestions: &'a [String], history: &'a [String], index: usize) -> Option<&'a str> {
    let item = match index.checked_sub(suggestions.len()) {
        None => suggestions.get(index),
        Some(offset) => history.get(offset),
    };
    item.map(String::as_str)
}

/// Move the selection down one row, stopping at the last item.
pub fn next_index(current: Option<usize>, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    Some(match current {
        None => 0,
        Some(i) => (i + 1).min(total - 1),
    })
}

/// Move the selection up one row; above the first item means nothing selected.
pub fn previous_index(current: Option<usize>, total: usize) -> Option<usize> {
    match current {
        None | Some(0) => None,
        Some(_) if total == 0 => None,
        Some(i) => Some((i - 1).min(total - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_item_at_spans_both_lists() {
        let suggestions = strings(&["Pug", "Puggle"]);
        let history = strings(&["beagle"]);
        assert_eq!(item_at(&suggestions, &history, 0), Some("Pug"));
        assert_eq!(item_at(&suggestions, &history, 2), Some("beagle"));
        assert_eq!(item_at(&suggestions, &history, 3), None);
        assert_eq!(item_at(&[], &history, 0), Some("beagle"));
    }

    #[test]
    fn test_no_wraparound() {
        assert_eq!(next_index(Some(2), 3), Some(2));
        assert_eq!(previous_index(Some(0), 3), None);
        assert_eq!(previous_index(None, 3), None);
        assert_eq!(next_index(None, 0), None);
    }

    #[test]
    fn test_state_helpers() {
        let error = SessionState::Open(Phase::Error("offline".into()));
        assert!(error.is_open());
        assert_eq!(error.error(), Some("offline"));
        assert!(!SessionState::Closed.is_open());
        assert!(SessionState::Open(Phase::Loading).is_loading());
    }

    #[test]
    fn test_snapshot_serializes_state() {
        let mut snapshot = SessionSnapshot::closed();
        snapshot.state = SessionState::Open(Phase::Error("offline".into()));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"]["state"], "open");
        assert_eq!(json["state"]["open"]["phase"], "error");
        assert_eq!(json["state"]["open"]["message"], "offline");
    }

    proptest! {
        #[test]
        fn prop_selection_stays_in_bounds(
            total in 0usize..8,
            moves in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut selected = None;
            for forward in moves {
                selected = if forward {
                    next_index(selected, total)
                } else {
                    previous_index(selected, total)
                };
                if let Some(i) = selected {
                    prop_assert!(i < total);
                }
            }
        }
    }
}
