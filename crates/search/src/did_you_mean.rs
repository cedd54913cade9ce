//! "Did you mean" guesses for queries that matched nothing.

use crate::similarity::similarity;

/// Queries shorter than this are too short to diagnose a typo.
pub const MIN_QUERY_LEN: usize = 3;

/// Candidates must be more similar than this...
pub const MIN_SIMILARITY: f64 = 0.6;

/// ...and less similar than this; near-exact hits belong to the matcher.
pub const MAX_SIMILARITY: f64 = 0.95;

/// Propose near-miss alternatives for `query`.
///
/// A candidate's similarity is the best of the whole-string similarity and
/// the similarity to each of its words, so a misspelt breed word still finds
/// the multi-word breed name. Only candidates strictly inside
/// `(MIN_SIMILARITY, MAX_SIMILARITY)` are kept, best first, ties in
/// vocabulary order.
pub fn did_you_mean<S: AsRef<str>>(query: &str, vocabulary: &[S], max_suggestions: usize) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = vocabulary
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let candidate = item.as_ref().trim().to_lowercase();
            if candidate.is_empty() {
                return None;
            }
            let best = candidate
                .split_whitespace()
                .map(|word| similarity(&query, word))
                .fold(similarity(&query, &candidate), f64::max);
            (best > MIN_SIMILARITY && best < MAX_SIMILARITY).then_some((idx, best))
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(max_suggestions);

    scored
        .into_iter()
        .map(|(idx, _)| vocabulary[idx].as_ref().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misspelt_breed() {
        let vocab = ["Labrador Retriever", "Poodle"];
        let guesses = did_you_mean("Labradoor", &vocab, 3);
        assert!(guesses.contains(&"Labrador Retriever".to_string()));
        assert!(!guesses.contains(&"Poodle".to_string()));
    }

    #[test]
    fn test_short_query_yields_nothing() {
        let vocab = ["Labrador Retriever", "Poodle"];
        assert!(did_you_mean("La", &vocab, 3).is_empty());
        assert!(did_you_mean("  la  ", &vocab, 3).is_empty());
    }

    #[test]
    fn test_near_exact_is_excluded() {
        // Identical word scores 1.0, which belongs to the matcher
        assert!(did_you_mean("poodle", &["Poodle"], 3).is_empty());
    }

    #[test]
    fn test_similarity_bounds_are_exclusive() {
        // 2 edits over 5 chars is exactly 0.6
        assert!(did_you_mean("abcde", &["abcxy"], 3).is_empty());
        // 1 edit over 20 chars is exactly 0.95
        assert!(did_you_mean("abcdefghijklmnopqrst", &["abcdefghijklmnopqrsx"], 3).is_empty());
    }

    #[test]
    fn test_similarity_just_inside_bounds() {
        // 2 edits over 6 chars, 1 edit over 19 chars
        assert_eq!(did_you_mean("abcdef", &["abcdxy"], 3), vec!["abcdxy"]);
        assert_eq!(
            did_you_mean("abcdefghijklmnopqrs", &["abcdefghijklmnopqrx"], 3),
            vec!["abcdefghijklmnopqrx"]
        );
    }

    #[test]
    fn test_noise_is_excluded() {
        assert!(did_you_mean("xyzzy", &["Beagle", "Poodle"], 3).is_empty());
    }

    #[test]
    fn test_ordered_by_similarity() {
        // beagle: 1 - 1/7, bagel: 1 - 2/7, begal falls below the floor
        let vocab = ["Bagel Hound", "Beagle", "Begal"];
        let guesses = did_you_mean("beagell", &vocab, 3);
        assert_eq!(guesses.first().map(String::as_str), Some("Beagle"));
    }

    #[test]
    fn test_truncates() {
        let vocab = ["Poodles", "Poodle Mix", "Toy Poodles"];
        assert_eq!(did_you_mean("pooodle", &vocab, 2).len(), 2);
    }
}
