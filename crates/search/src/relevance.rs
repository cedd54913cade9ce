//! Relevance scoring for typeahead candidates.
//!
//! A candidate is scored by the first rule of the ladder it satisfies.
//! Rules that depend on query length subtract it, so a shorter query that
//! still pins down a word ranks above a longer one.

use crate::similarity::levenshtein_distance;

/// Which rule of the ladder accepted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Whole candidate equals the query
    Exact,
    /// Some word of the candidate starts with the query
    WordPrefix,
    /// Candidate starts with the query
    Prefix,
    /// Every query token starts some word of the candidate
    AllWordsPrefix,
    /// Candidate contains the query
    Contains,
    /// Within edit-distance tolerance
    Fuzzy,
}

/// Maximum edit distance accepted by the fuzzy rule, as a share of the longer string.
pub const FUZZY_TOLERANCE: f64 = 0.4;

/// Relevance of a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceScore {
    pub kind: MatchKind,
    pub score: i64,
}

/// A query normalised once and reused across a vocabulary.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    lowered: String,
    len: usize,
    tokens: Vec<String>,
}

impl PreparedQuery {
    /// Trim and lowercase `query`. Returns `None` for blank input.
    pub fn new(query: &str) -> Option<Self> {
        let lowered = query.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        let tokens = lowered.split_whitespace().map(String::from).collect();
        Some(Self {
            len: lowered.chars().count(),
            lowered,
            tokens,
        })
    }

    /// The normalised query text
    pub fn as_str(&self) -> &str {
        &self.lowered
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the query holds more than one whitespace-delimited token
    pub fn is_multi_word(&self) -> bool {
        self.tokens.len() > 1
    }

    /// Score a candidate. `None` means the candidate is excluded.
    pub fn score(&self, candidate: &str) -> Option<RelevanceScore> {
        let text = candidate.to_lowercase();
        let q = self.lowered.as_str();
        let len = self.len as i64;

        let hit = |kind, score| Some(RelevanceScore { kind, score });

        if text == q {
            return hit(MatchKind::Exact, 100);
        }

        if text.split_whitespace().any(|word| word.starts_with(q)) {
            return hit(MatchKind::WordPrefix, 95 - len);
        }

        if text.starts_with(q) {
            return hit(MatchKind::Prefix, 90 - len);
        }

        if self.is_multi_word() {
            let words: Vec<&str> = text.split_whitespace().collect();
            let all_tokens_match = self
                .tokens
                .iter()
                .all(|token| words.iter().any(|word| word.starts_with(token.as_str())));
            if all_tokens_match {
                return hit(MatchKind::AllWordsPrefix, 85);
            }
        }

        if text.contains(q) {
            return hit(MatchKind::Contains, 70 - len);
        }

        let distance = levenshtein_distance(q, &text);
        let longest = self.len.max(text.chars().count());
        if distance as f64 <= FUZZY_TOLERANCE * longest as f64 {
            return hit(MatchKind::Fuzzy, 50 - distance as i64);
        }

        None
    }
}

/// Calculate relevance score for a text against a query.
///
/// # Arguments
/// * `text` - The candidate to score
/// * `query` - The search query
///
/// # Returns
/// The accepting rule and its score, or `None` when the candidate does not qualify
pub fn calculate_relevance(text: &str, query: &str) -> Option<RelevanceScore> {
    PreparedQuery::new(query)?.score(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str, query: &str) -> Option<MatchKind> {
        calculate_relevance(text, query).map(|r| r.kind)
    }

    fn score(text: &str, query: &str) -> Option<i64> {
        calculate_relevance(text, query).map(|r| r.score)
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(kind("Beagle", "beagle"), Some(MatchKind::Exact));
        assert_eq!(score("Beagle", "BEAGLE"), Some(100));
    }

    #[test]
    fn test_word_prefix_beats_prefix() {
        // "lab" starts the first word, so rule 2 short-circuits before rule 3
        assert_eq!(kind("Labrador Retriever", "lab"), Some(MatchKind::WordPrefix));
        assert_eq!(score("Labrador Retriever", "lab"), Some(92));
        assert_eq!(kind("Golden Retriever", "retr"), Some(MatchKind::WordPrefix));
    }

    #[test]
    fn test_prefix_spanning_words() {
        assert_eq!(kind("Golden Retriever", "golden r"), Some(MatchKind::Prefix));
        assert_eq!(score("Golden Retriever", "golden r"), Some(82));
    }

    #[test]
    fn test_all_words_prefix_is_order_independent() {
        assert_eq!(kind("Golden Retriever", "ret gol"), Some(MatchKind::AllWordsPrefix));
        assert_eq!(score("Golden Retriever", "ret gol"), Some(85));
    }

    #[test]
    fn test_contains() {
        assert_eq!(kind("Labradoodle", "doodle"), Some(MatchKind::Contains));
        assert_eq!(score("Labradoodle", "doodle"), Some(64));
    }

    #[test]
    fn test_fuzzy_within_tolerance() {
        assert_eq!(kind("Beagle", "beagel"), Some(MatchKind::Fuzzy));
        assert_eq!(score("Beagle", "beagel"), Some(48));
    }

    #[test]
    fn test_fuzzy_outside_tolerance() {
        assert_eq!(kind("Poodle", "lab"), None);
    }

    #[test]
    fn test_fuzzy_tolerance_is_inclusive() {
        // 2 edits over 5 chars sits exactly on the tolerance
        assert_eq!(kind("abcxy", "abcde"), Some(MatchKind::Fuzzy));
        assert_eq!(score("abcxy", "abcde"), Some(48));
        assert_eq!(kind("abxyz", "abcde"), None);
    }

    #[test]
    fn test_blank_query() {
        assert!(PreparedQuery::new("   ").is_none());
        assert_eq!(calculate_relevance("Beagle", ""), None);
    }

    #[test]
    fn test_query_longer_than_candidate_can_still_match() {
        assert_eq!(kind("Pug", "pugg"), Some(MatchKind::Fuzzy));
    }
}
