//! The suggestion session: query text, dropdown state, selection and history
//! for one input surface.
//!
//! Every public operation is synchronous and infallible. The only suspension
//! happens inside the debounced resolve, which runs on the tokio runtime the
//! session was built in. Three timers exist per session (debounce, error
//! auto-clear, blur grace); each is a single slot guarded by its own token so a
//! timer that already woke up can still tell it has been superseded.

use crate::error::Result;
use crate::events::{NoopEvents, Notification, SessionEvents};
use crate::fetch::SuggestionSource;
use crate::history::{self, HistoryStore};
use crate::resolve::{self, Resolution};
use crate::state::{self, Phase, Pick, SessionSnapshot, SessionState};
use pawsearch_core::config::TypeaheadConfig;
use pawsearch_core::storage::{KeyValueStore, MemoryStore};
use pawsearch_telemetry::{metrics, Timer};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Typeahead session for a single input.
///
/// Cloning yields another handle to the same session.
///
/// # Example
///
/// ```rust,no_run
/// use pawsearch_core::config::TypeaheadConfig;
/// use pawsearch_typeahead::SuggestionSession;
///
/// # async fn demo() -> pawsearch_typeahead::Result<()> {
/// let session = SuggestionSession::builder(TypeaheadConfig::default())
///     .vocabulary(["Golden Retriever", "Labrador Retriever"])
///     .build()?;
///
/// session.set_query("gold");
/// let mut updates = session.subscribe();
/// while updates.borrow_and_update().state.is_loading() {
///     if updates.changed().await.is_err() {
///         break;
///     }
/// }
/// assert_eq!(session.snapshot().suggestions, vec!["Golden Retriever"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SuggestionSession {
    shared: Arc<Shared>,
}

struct Shared {
    config: TypeaheadConfig,
    vocabulary: Vec<String>,
    source: Option<Arc<dyn SuggestionSource>>,
    history_store: HistoryStore,
    events: Arc<dyn SessionEvents>,
    runtime: Handle,
    inner: Mutex<SessionInner>,
    updates: watch::Sender<SessionSnapshot>,
}

struct SessionInner {
    query: String,
    state: SessionState,
    suggestions: Vec<String>,
    did_you_mean: Vec<String>,
    history: Vec<String>,
    selected: Option<usize>,
    /// Bumped whenever scheduled or in-flight results become stale
    generation: u64,
    /// Debounce timer that has not fired yet
    pending: Option<JoinHandle<()>>,
    error_token: u64,
    error_timer: Option<JoinHandle<()>>,
    blur_token: u64,
    blur_timer: Option<JoinHandle<()>>,
}

impl SessionInner {
    fn visible_history<'a>(&'a self, config: &TypeaheadConfig) -> &'a [String] {
        if config.show_history { &self.history } else { &[] }
    }

    fn total_items(&self, config: &TypeaheadConfig) -> usize {
        self.suggestions.len() + self.visible_history(config).len()
    }

    fn item_at(&self, config: &TypeaheadConfig, index: usize) -> Option<String> {
        state::item_at(&self.suggestions, self.visible_history(config), index).map(String::from)
    }

    fn snapshot(&self, config: &TypeaheadConfig) -> SessionSnapshot {
        SessionSnapshot {
            query: self.query.clone(),
            state: self.state.clone(),
            suggestions: self.suggestions.clone(),
            did_you_mean: self.did_you_mean.clone(),
            history: self.visible_history(config).to_vec(),
            selected: self.selected,
        }
    }

    /// Supersede any scheduled or in-flight resolve.
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn cancel_blur(&mut self) {
        self.blur_token += 1;
        if let Some(handle) = self.blur_timer.take() {
            handle.abort();
        }
    }

    fn close(&mut self) {
        self.state = SessionState::Closed;
        self.selected = None;
        self.invalidate();
        self.cancel_blur();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &SessionInner) {
        self.updates.send_replace(inner.snapshot(&self.config));
    }

    fn notify(&self, notifications: &[Notification]) {
        for notification in notifications {
            notification.deliver(self.events.as_ref());
        }
    }

    /// Arm the debounce timer, replacing any timer that has not fired.
    fn schedule_resolve(self: &Arc<Self>, inner: &mut SessionInner, query: String) {
        if let Some(handle) = inner.pending.take() {
            handle.abort();
        }

        let generation = inner.generation;
        let delay = self.config.debounce();
        let weak = Arc::downgrade(self);
        debug!(query = %query, generation, "Scheduling resolve");

        inner.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else { return };
            {
                let mut inner = shared.lock();
                if inner.generation != generation {
                    return;
                }
                // Fired: later scheduling must not cancel this resolve
                inner.pending = None;
            }
            shared.run_resolve(query, generation).await;
        }));
    }

    async fn run_resolve(self: Arc<Self>, query: String, generation: u64) {
        metrics().increment("typeahead.resolves");
        let timer = Timer::start("typeahead.resolve_ms");
        let resolution = resolve::resolve(
            &self.config,
            &self.vocabulary,
            self.source.as_ref(),
            &query,
        )
        .await;
        timer.stop();
        self.commit(generation, resolution);
    }

    fn commit(self: &Arc<Self>, generation: u64, resolution: Resolution) {
        let mut inner = self.lock();
        if inner.generation != generation {
            metrics().increment("typeahead.stale_discards");
            debug!(generation, current = inner.generation, "Discarding stale suggestions");
            return;
        }

        debug!(
            generation,
            suggestions = resolution.suggestions.len(),
            did_you_mean = resolution.did_you_mean.len(),
            "Committing suggestions"
        );
        inner.suggestions = resolution.suggestions;
        inner.did_you_mean = resolution.did_you_mean;
        inner.selected = None;
        inner.state = match resolution.remote_error {
            Some(message) => {
                self.arm_error_timer(&mut inner);
                SessionState::Open(Phase::Error(message))
            }
            None => SessionState::Open(Phase::Idle),
        };
        self.publish(&inner);
    }

    fn arm_error_timer(self: &Arc<Self>, inner: &mut SessionInner) {
        inner.error_token += 1;
        if let Some(handle) = inner.error_timer.take() {
            handle.abort();
        }

        let token = inner.error_token;
        let delay = self.config.error_display();
        let weak = Arc::downgrade(self);

        inner.error_timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else { return };
            let mut inner = shared.lock();
            if inner.error_token == token && inner.state.error().is_some() {
                inner.error_timer = None;
                inner.state = SessionState::Open(Phase::Idle);
                shared.publish(&inner);
            }
        }));
    }

    /// Record `term`, make it the query and close. Returns the history to persist.
    fn finish(&self, inner: &mut SessionInner, term: &str) -> Vec<String> {
        inner.query = term.to_string();
        inner.history = history::record(&inner.history, term, self.config.max_history_items);
        inner.suggestions.clear();
        inner.did_you_mean.clear();
        inner.close();
        self.publish(inner);
        inner.history.clone()
    }

    fn persist_history(&self, entries: &[String]) {
        self.history_store.save(&self.config.history_key, entries);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        for handle in [
            inner.pending.take(),
            inner.error_timer.take(),
            inner.blur_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}

impl SuggestionSession {
    /// Start building a session
    pub fn builder(config: TypeaheadConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Session over a local vocabulary with in-memory history and no callbacks
    pub fn new<I, S>(config: TypeaheadConfig, vocabulary: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder(config).vocabulary(vocabulary).build()
    }

    pub fn config(&self) -> &TypeaheadConfig {
        &self.shared.config
    }

    /// Replace the query text and schedule a debounced resolve.
    ///
    /// Blank text clears the suggestion lists; the dropdown stays open only
    /// when there is history to show.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let shared = &self.shared;
            let mut inner = shared.lock();
            inner.query = text.clone();
            inner.selected = None;
            inner.invalidate();
            inner.cancel_blur();

            if text.trim().is_empty() {
                inner.suggestions.clear();
                inner.did_you_mean.clear();
                inner.state = if inner.visible_history(&shared.config).is_empty() {
                    SessionState::Closed
                } else {
                    SessionState::Open(Phase::Idle)
                };
            } else {
                inner.state = SessionState::Open(Phase::Loading);
                shared.schedule_resolve(&mut inner, text.clone());
            }
            shared.publish(&inner);
        }
        self.shared.notify(&[Notification::ValueChange(text)]);
    }

    /// Move the selection down. On a closed session with items, opens it on the first item.
    pub fn select_next(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();
        inner.cancel_blur();
        let total = inner.total_items(&shared.config);

        if inner.state.is_open() {
            let next = state::next_index(inner.selected, total);
            if next == inner.selected {
                return;
            }
            inner.selected = next;
        } else if total > 0 {
            inner.state = SessionState::Open(Phase::Idle);
            inner.selected = Some(0);
        } else {
            return;
        }
        shared.publish(&inner);
    }

    /// Move the selection up; moving above the first item clears it.
    pub fn select_previous(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();
        inner.cancel_blur();
        if !inner.state.is_open() {
            return;
        }

        let total = inner.total_items(&shared.config);
        let previous = state::previous_index(inner.selected, total);
        if previous != inner.selected {
            inner.selected = previous;
            shared.publish(&inner);
        }
    }

    /// Accept a suggestion or history entry by position, or an explicit term.
    ///
    /// Returns the accepted term, or `None` when the index is out of range or
    /// the term is blank (nothing changes in that case).
    pub fn accept(&self, pick: impl Into<Pick>) -> Option<String> {
        let pick = pick.into();
        let (term, history) = {
            let shared = &self.shared;
            let mut inner = shared.lock();
            let term = match pick {
                Pick::Index(index) => inner.item_at(&shared.config, index),
                Pick::Term(term) => Some(term),
            };
            let term = term
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())?;
            let history = shared.finish(&mut inner, &term);
            (term, history)
        };

        debug!(term = %term, "Accepted suggestion");
        self.shared.persist_history(&history);
        self.shared.notify(&[
            Notification::ValueChange(term.clone()),
            Notification::SuggestionSelect(term.clone()),
        ]);
        Some(term)
    }

    /// Submit: accept the selected item, or search for the raw query text.
    pub fn commit_search(&self) -> Option<String> {
        let (term, notification, history) = {
            let shared = &self.shared;
            let mut inner = shared.lock();
            let selected = inner.selected.and_then(|i| inner.item_at(&shared.config, i));
            let from_selection = selected.is_some();
            let term = selected
                .unwrap_or_else(|| inner.query.clone())
                .trim()
                .to_string();

            if term.is_empty() {
                inner.close();
                shared.publish(&inner);
                return None;
            }

            let history = shared.finish(&mut inner, &term);
            let notification = if from_selection {
                Notification::SuggestionSelect(term.clone())
            } else {
                Notification::Search(term.clone())
            };
            (term, notification, history)
        };

        debug!(term = %term, "Committed search");
        self.shared.persist_history(&history);
        self.shared
            .notify(&[Notification::ValueChange(term.clone()), notification]);
        Some(term)
    }

    /// Empty the input and close. Any in-flight resolve is discarded when it lands.
    pub fn clear(&self) {
        {
            let mut inner = self.shared.lock();
            inner.query.clear();
            inner.suggestions.clear();
            inner.did_you_mean.clear();
            inner.close();
            self.shared.publish(&inner);
        }
        self.shared.notify(&[
            Notification::ValueChange(String::new()),
            Notification::Clear,
        ]);
    }

    /// Close without touching the query (escape, tab-away).
    pub fn dismiss(&self) {
        let mut inner = self.shared.lock();
        inner.close();
        self.shared.publish(&inner);
    }

    /// Focus moved somewhere outside the input and dropdown.
    ///
    /// Closes after the blur grace period so a pointer selection that caused
    /// the blur can still land. [`focus`](Self::focus) cancels it.
    pub fn notify_outside_interaction(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();
        inner.cancel_blur();

        let token = inner.blur_token;
        let delay = shared.config.blur_grace();
        let weak = Arc::downgrade(shared);

        inner.blur_timer = Some(shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else { return };
            let mut inner = shared.lock();
            if inner.blur_token == token {
                inner.blur_timer = None;
                inner.close();
                shared.publish(&inner);
                debug!("Closed after outside interaction");
            }
        }));
    }

    /// The input gained focus: cancel a pending blur and reopen if there is anything to show.
    pub fn focus(&self) {
        let shared = &self.shared;
        let mut inner = shared.lock();
        inner.cancel_blur();
        if inner.state.is_open() {
            return;
        }

        let blank = inner.query.trim().is_empty();
        let has_results = !blank && (!inner.suggestions.is_empty() || !inner.did_you_mean.is_empty());
        let has_history = blank && !inner.visible_history(&shared.config).is_empty();
        if has_results || has_history {
            inner.state = SessionState::Open(Phase::Idle);
            shared.publish(&inner);
        }
    }

    /// Forget every remembered search, in memory and in storage.
    pub fn clear_history(&self) {
        {
            let mut inner = self.shared.lock();
            inner.history.clear();
            inner.selected = None;
            if inner.query.trim().is_empty() && inner.state.is_open() {
                inner.close();
            }
            self.shared.publish(&inner);
        }
        self.shared.history_store.clear(&self.shared.config.history_key);
    }

    /// Forget one remembered search.
    pub fn forget_history_entry(&self, term: &str) {
        let history = {
            let mut inner = self.shared.lock();
            inner.history = history::remove(&inner.history, term);
            inner.selected = None;
            let config = &self.shared.config;
            if inner.query.trim().is_empty()
                && inner.state.is_open()
                && inner.visible_history(config).is_empty()
            {
                inner.close();
            }
            self.shared.publish(&inner);
            inner.history.clone()
        };
        self.shared.persist_history(&history);
    }

    /// Current state of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.shared.lock();
        inner.snapshot(&self.shared.config)
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn query(&self) -> String {
        self.shared.lock().query.clone()
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state.clone()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.shared.lock().selected
    }
}

/// Builder for [`SuggestionSession`].
pub struct SessionBuilder {
    config: TypeaheadConfig,
    vocabulary: Vec<String>,
    source: Option<Arc<dyn SuggestionSource>>,
    storage: Option<Arc<dyn KeyValueStore>>,
    events: Option<Arc<dyn SessionEvents>>,
}

impl SessionBuilder {
    fn new(config: TypeaheadConfig) -> Self {
        Self {
            config,
            vocabulary: Vec::new(),
            source: None,
            storage: None,
            events: None,
        }
    }

    /// Local candidate terms, in tie-breaking order
    pub fn vocabulary<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Remote suggestion source
    pub fn source<S: SuggestionSource>(mut self, source: S) -> Self {
        let source: Arc<dyn SuggestionSource> = Arc::new(source);
        self.source = Some(source);
        self
    }

    /// Remote suggestion source shared with other sessions
    pub fn shared_source(mut self, source: Arc<dyn SuggestionSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Where history is persisted (defaults to an in-memory store)
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Callback sink
    pub fn events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the session, loading history from storage.
    ///
    /// Fails only when called outside a tokio runtime.
    pub fn build(self) -> Result<SuggestionSession> {
        let runtime = Handle::try_current()?;

        let storage: Arc<dyn KeyValueStore> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(MemoryStore::new()),
        };
        let events: Arc<dyn SessionEvents> = match self.events {
            Some(events) => events,
            None => Arc::new(NoopEvents),
        };

        let history_store = HistoryStore::new(storage);
        let mut history = history_store.load(&self.config.history_key);
        history.truncate(self.config.max_history_items);

        let inner = SessionInner {
            query: String::new(),
            state: SessionState::Closed,
            suggestions: Vec::new(),
            did_you_mean: Vec::new(),
            history,
            selected: None,
            generation: 0,
            pending: None,
            error_token: 0,
            error_timer: None,
            blur_token: 0,
            blur_timer: None,
        };
        let (updates, _) = watch::channel(inner.snapshot(&self.config));

        debug!(
            vocabulary = self.vocabulary.len(),
            remote = self.source.is_some(),
            history = inner.history.len(),
            "Suggestion session created"
        );

        Ok(SuggestionSession {
            shared: Arc::new(Shared {
                config: self.config,
                vocabulary: self.vocabulary,
                source: self.source,
                history_store,
                events,
                runtime,
                inner: Mutex::new(inner),
                updates,
            }),
        })
    }
}
