//! Vocabulary ranking.

use crate::relevance::PreparedQuery;
use crate::SearchResult;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Vocabularies at least this large are scored on the rayon pool.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 2048;

/// Rank `vocabulary` against `query` and keep the best `max_results`.
///
/// Ties keep vocabulary order. Entries that are blank after trimming are
/// skipped, and a blank query yields nothing.
pub fn rank<S: AsRef<str>>(
    query: &str,
    vocabulary: &[S],
    max_results: usize,
) -> Vec<SearchResult<String>> {
    let Some(prepared) = PreparedQuery::new(query) else {
        return Vec::new();
    };
    if max_results == 0 {
        return Vec::new();
    }

    let mut scored = score_all(&prepared, vocabulary);

    // Stable sort: equal scores stay in vocabulary order
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(max_results);

    scored
        .into_iter()
        .map(|(idx, score)| SearchResult {
            item: vocabulary[idx].as_ref().to_string(),
            score,
        })
        .collect()
}

/// Rank `vocabulary` against `query`, returning the items only.
///
/// # Example
///
/// ```
/// let breeds = ["Labrador Retriever", "Golden Retriever", "Poodle"];
/// assert_eq!(
///     pawsearch_search::fuzzy_search("Lab", &breeds, 5),
///     vec!["Labrador Retriever".to_string()]
/// );
/// ```
pub fn fuzzy_search<S: AsRef<str>>(query: &str, vocabulary: &[S], max_results: usize) -> Vec<String> {
    rank(query, vocabulary, max_results)
        .into_iter()
        .map(|r| r.item)
        .collect()
}

fn score_one<S: AsRef<str>>(prepared: &PreparedQuery, idx: usize, item: &S) -> Option<(usize, i64)> {
    let text = item.as_ref();
    if text.trim().is_empty() {
        return None;
    }
    prepared.score(text).map(|r| (idx, r.score))
}

#[cfg(feature = "parallel")]
fn score_all<S: AsRef<str>>(prepared: &PreparedQuery, vocabulary: &[S]) -> Vec<(usize, i64)> {
    if vocabulary.len() >= PARALLEL_THRESHOLD {
        // `&[S]` is only Sync when S is; fall back to borrowed strs for the pool
        let texts: Vec<&str> = vocabulary.iter().map(AsRef::as_ref).collect();
        texts
            .par_iter()
            .enumerate()
            .filter_map(|(idx, text)| score_one(prepared, idx, text))
            .collect()
    } else {
        score_sequential(prepared, vocabulary)
    }
}

#[cfg(not(feature = "parallel"))]
fn score_all<S: AsRef<str>>(prepared: &PreparedQuery, vocabulary: &[S]) -> Vec<(usize, i64)> {
    score_sequential(prepared, vocabulary)
}

fn score_sequential<S: AsRef<str>>(prepared: &PreparedQuery, vocabulary: &[S]) -> Vec<(usize, i64)> {
    vocabulary
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| score_one(prepared, idx, item))
        .collect()
}
