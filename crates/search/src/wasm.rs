//! WASM bindings for the browser typeahead.

use wasm_bindgen::prelude::*;

/// Calculate Levenshtein edit distance between two strings.
#[wasm_bindgen]
pub fn edit_distance(a: &str, b: &str) -> usize {
    crate::levenshtein_distance(a, b)
}

/// Normalised similarity between two strings (0.0 to 1.0).
#[wasm_bindgen]
pub fn string_similarity(a: &str, b: &str) -> f64 {
    crate::similarity(a, b)
}

/// Rank a vocabulary against a query.
///
/// # Arguments
/// * `query` - Search query
/// * `vocabulary_json` - JSON array of candidate strings
/// * `max_results` - Maximum results to return
///
/// # Returns
/// JSON array of matching strings, best first. Malformed input yields `[]`.
#[wasm_bindgen]
pub fn suggest(query: &str, vocabulary_json: &str, max_results: usize) -> String {
    let vocabulary = match crate::vocabulary_from_json(vocabulary_json) {
        Ok(vocabulary) => vocabulary,
        Err(_) => return "[]".to_string(),
    };

    let results = crate::fuzzy_search(query, &vocabulary, max_results);
    serde_json::to_string(&results).unwrap_or_else(|_| "[]".to_string())
}

/// "Did you mean" guesses for a query that matched nothing.
///
/// Same input and output shapes as [`suggest`].
#[wasm_bindgen]
pub fn did_you_mean(query: &str, vocabulary_json: &str, max_suggestions: usize) -> String {
    let vocabulary = match crate::vocabulary_from_json(vocabulary_json) {
        Ok(vocabulary) => vocabulary,
        Err(_) => return "[]".to_string(),
    };

    let results = crate::did_you_mean(query, &vocabulary, max_suggestions);
    serde_json::to_string(&results).unwrap_or_else(|_| "[]".to_string())
}
