//! One resolve pass: remote fetch, merge, rank, did-you-mean fallback.

use crate::fetch::{FetchError, SuggestionSource};
use pawsearch_core::config::TypeaheadConfig;
use pawsearch_telemetry::metrics;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shown while remote suggestions are unavailable in remote-only mode.
pub const REMOTE_ERROR_MESSAGE: &str = "Unable to load suggestions right now. Please try again.";

/// Outcome of a resolve pass, ready to commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Resolution {
    pub suggestions: Vec<String>,
    pub did_you_mean: Vec<String>,
    pub remote_error: Option<String>,
}

enum Remote {
    Fetched(Vec<String>),
    Failed(FetchError),
    /// The source panicked or its task was cancelled
    Crashed(String),
}

pub(crate) async fn resolve(
    config: &TypeaheadConfig,
    vocabulary: &[String],
    source: Option<&Arc<dyn SuggestionSource>>,
    query: &str,
) -> Resolution {
    let remote = match source {
        Some(source) => Some(fetch(source, query, config.max_suggestions).await),
        None => None,
    };

    let remote_items = match remote {
        Some(Remote::Fetched(mut items)) if config.skip_local_fuzzy_search && !items.is_empty() => {
            items.truncate(config.max_suggestions);
            debug!(query, count = items.len(), "Using remote suggestions verbatim");
            return Resolution {
                suggestions: items,
                ..Resolution::default()
            };
        }
        Some(Remote::Fetched(items)) => items,
        Some(Remote::Failed(e)) => {
            warn!(query, error = %e, "Remote suggestions failed");
            metrics().increment("typeahead.fetch_failures");
            let mut resolution = rank_locally(config, vocabulary, &[], query);
            if config.skip_local_fuzzy_search {
                resolution.remote_error = Some(REMOTE_ERROR_MESSAGE.to_string());
            }
            return resolution;
        }
        Some(Remote::Crashed(reason)) => {
            error!(query, reason = %reason, "Suggestion resolve failed");
            return Resolution::default();
        }
        None => Vec::new(),
    };

    rank_locally(config, vocabulary, &remote_items, query)
}

async fn fetch(source: &Arc<dyn SuggestionSource>, query: &str, limit: usize) -> Remote {
    let source = Arc::clone(source);
    let query = query.to_string();

    // Run in its own task so a panicking source cannot take the session down
    let task = tokio::spawn(async move { source.fetch_suggestions(&query, limit).await });
    match task.await {
        Ok(Ok(items)) => Remote::Fetched(items),
        Ok(Err(e)) => Remote::Failed(e),
        Err(e) => Remote::Crashed(e.to_string()),
    }
}

/// Rank vocabulary plus remote terms; fall back to did-you-mean when nothing matches.
fn rank_locally(
    config: &TypeaheadConfig,
    vocabulary: &[String],
    remote: &[String],
    query: &str,
) -> Resolution {
    let candidates = merge(vocabulary, remote);
    let suggestions = pawsearch_search::fuzzy_search(query, &candidates, config.max_suggestions);

    let did_you_mean = if suggestions.is_empty() && !query.trim().is_empty() && config.show_did_you_mean {
        pawsearch_search::did_you_mean(query, &candidates, config.max_did_you_mean)
    } else {
        Vec::new()
    };

    Resolution {
        suggestions,
        did_you_mean,
        remote_error: None,
    }
}

/// Local terms first, then remote terms not already present.
fn merge<'a>(vocabulary: &'a [String], remote: &'a [String]) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(vocabulary.len() + remote.len());
    vocabulary
        .iter()
        .chain(remote)
        .map(String::as_str)
        .filter(|term| seen.insert(*term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn source_of<F, Fut>(f: F) -> Arc<dyn SuggestionSource>
    where
        F: Fn(String, usize) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Vec<String>, FetchError>> + Send + 'static,
    {
        Arc::new(f)
    }

    #[test]
    fn test_merge_dedupes_keeping_local_order() {
        let local = strings(&["Pug", "Beagle"]);
        let remote = strings(&["Beagle", "Puggle"]);
        assert_eq!(merge(&local, &remote), vec!["Pug", "Beagle", "Puggle"]);
    }

    #[tokio::test]
    async fn test_local_only() {
        let config = TypeaheadConfig::default();
        let vocab = strings(&["Golden Retriever", "Golden Retriever Mix", "Pug"]);
        let resolution = resolve(&config, &vocab, None, "Golden").await;
        assert_eq!(resolution.suggestions, strings(&["Golden Retriever", "Golden Retriever Mix"]));
        assert!(resolution.did_you_mean.is_empty());
    }

    #[tokio::test]
    async fn test_remote_terms_are_ranked_with_local() {
        let config = TypeaheadConfig::default();
        let vocab = strings(&["Golden Retriever"]);
        let source = source_of(|_q, _l| async { Ok::<_, FetchError>(strings(&["Goldendoodle", "Poodle"])) });

        let resolution = resolve(&config, &vocab, Some(&source), "gold").await;
        assert_eq!(resolution.suggestions, strings(&["Golden Retriever", "Goldendoodle"]));
    }

    #[tokio::test]
    async fn test_remote_only_mode_uses_remote_verbatim() {
        let config = TypeaheadConfig {
            skip_local_fuzzy_search: true,
            max_suggestions: 2,
            ..TypeaheadConfig::default()
        };
        let vocab = strings(&["Pug"]);
        let source = source_of(|_q, _l| async { Ok::<_, FetchError>(strings(&["zzz", "yyy", "xxx"])) });

        let resolution = resolve(&config, &vocab, Some(&source), "pug").await;
        assert_eq!(resolution.suggestions, strings(&["zzz", "yyy"]));
        assert!(resolution.remote_error.is_none());
    }

    #[tokio::test]
    async fn test_remote_only_mode_empty_remote_falls_back() {
        let config = TypeaheadConfig {
            skip_local_fuzzy_search: true,
            ..TypeaheadConfig::default()
        };
        let vocab = strings(&["Pug"]);
        let source = source_of(|_q, _l| async { Ok::<_, FetchError>(Vec::new()) });

        let resolution = resolve(&config, &vocab, Some(&source), "pug").await;
        assert_eq!(resolution.suggestions, strings(&["Pug"]));
    }

    #[tokio::test]
    async fn test_failure_is_silent_without_remote_only_mode() {
        let config = TypeaheadConfig::default();
        let vocab = strings(&["Pug"]);
        let source = source_of(|_q, _l| async { Err::<Vec<String>, _>(FetchError::unavailable("503")) });

        let resolution = resolve(&config, &vocab, Some(&source), "pug").await;
        assert_eq!(resolution.suggestions, strings(&["Pug"]));
        assert!(resolution.remote_error.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_reported_in_remote_only_mode() {
        let config = TypeaheadConfig {
            skip_local_fuzzy_search: true,
            ..TypeaheadConfig::default()
        };
        let vocab = strings(&["Pug"]);
        let source = source_of(|_q, _l| async { Err::<Vec<String>, _>(FetchError::unavailable("503")) });

        let resolution = resolve(&config, &vocab, Some(&source), "pug").await;
        assert_eq!(resolution.suggestions, strings(&["Pug"]));
        assert_eq!(resolution.remote_error.as_deref(), Some(REMOTE_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_panicking_source_resolves_empty() {
        let config = TypeaheadConfig::default();
        let vocab = strings(&["Pug"]);
        let source = source_of(|query: String, _l| async move {
            if query == "pug" {
                panic!("source exploded");
            }
            Ok::<_, FetchError>(Vec::new())
        });

        let resolution = resolve(&config, &vocab, Some(&source), "pug").await;
        assert_eq!(resolution, Resolution::default());
    }

    #[tokio::test]
    async fn test_did_you_mean_fallback() {
        let config = TypeaheadConfig::default();
        let vocab = strings(&["Labrador Retriever", "Poodle"]);

        let resolution = resolve(&config, &vocab, None, "Labradoor").await;
        assert!(resolution.suggestions.is_empty());
        assert_eq!(resolution.did_you_mean, strings(&["Labrador Retriever"]));

        let quiet = TypeaheadConfig {
            show_did_you_mean: false,
            ..TypeaheadConfig::default()
        };
        let resolution = resolve(&quiet, &vocab, None, "Labradoor").await;
        assert!(resolution.did_you_mean.is_empty());
    }
}
