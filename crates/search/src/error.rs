//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Vocabulary payload could not be decoded
    #[error("Invalid vocabulary: {0}")]
    InvalidVocabulary(#[from] serde_json::Error),

    /// Vocabulary payload decoded but is not an array of strings
    #[error("Invalid vocabulary: expected an array of strings, found {0}")]
    UnexpectedShape(&'static str),
}

/// Decode a JSON array of strings, skipping non-string elements.
pub fn vocabulary_from_json(json: &str) -> Result<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        serde_json::Value::Object(_) => Err(SearchError::UnexpectedShape("object")),
        serde_json::Value::String(_) => Err(SearchError::UnexpectedShape("string")),
        serde_json::Value::Number(_) => Err(SearchError::UnexpectedShape("number")),
        serde_json::Value::Bool(_) => Err(SearchError::UnexpectedShape("bool")),
        serde_json::Value::Null => Err(SearchError::UnexpectedShape("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_skips_non_strings() {
        let vocab = vocabulary_from_json(r#"["Pug", 3, null, "Beagle"]"#).unwrap();
        assert_eq!(vocab, vec!["Pug", "Beagle"]);
    }

    #[test]
    fn test_vocabulary_wrong_shape() {
        assert!(matches!(
            vocabulary_from_json(r#"{"a": 1}"#),
            Err(SearchError::UnexpectedShape("object"))
        ));
        assert!(matches!(
            vocabulary_from_json("[oops"),
            Err(SearchError::InvalidVocabulary(_))
        ));
    }
}
