//! File-backed stand-in for the remote suggestion service

use anyhow::{bail, Context, Result};
use pawsearch_typeahead::{suggestions_from_json, FetchError, FetchFuture, SuggestionSource};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Serves suggestions from a JSON document.
///
/// An array is returned for every query. An object maps lowercased queries to
/// arrays; a value of the form `{"error": "..."}` makes that query fail.
pub struct JsonFileSource {
    payload: Value,
    delay: Duration,
}

impl JsonFileSource {
    pub fn load(path: &Path, delay: Duration) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading remote fixture {}", path.display()))?;
        let payload: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing remote fixture {}", path.display()))?;
        Self::new(payload, delay)
    }

    pub fn new(payload: Value, delay: Duration) -> Result<Self> {
        if !(payload.is_array() || payload.is_object()) {
            bail!("remote fixture must be a JSON array or object");
        }
        Ok(Self { payload, delay })
    }

    fn lookup(&self, query: &str, limit: usize) -> Result<Vec<String>, FetchError> {
        let entry = match &self.payload {
            Value::Object(map) => match map.get(&query.trim().to_lowercase()) {
                Some(entry) => entry,
                None => return Ok(Vec::new()),
            },
            other => other,
        };

        if let Some(message) = entry.get("error").and_then(Value::as_str) {
            return Err(FetchError::unavailable(message));
        }

        let mut items = suggestions_from_json(entry);
        items.truncate(limit);
        Ok(items)
    }
}

impl SuggestionSource for JsonFileSource {
    fn fetch_suggestions<'a>(&'a self, query: &'a str, limit: usize) -> FetchFuture<'a> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.lookup(query, limit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_array_fixture_ignores_query() {
        let source = JsonFileSource::new(json!(["Pug", "Beagle", "Boxer"]), Duration::ZERO).unwrap();
        let items = source.fetch_suggestions("anything", 2).await.unwrap();
        assert_eq!(items, vec!["Pug", "Beagle"]);
    }

    #[tokio::test]
    async fn test_object_fixture_by_query() {
        let fixture = json!({
            "gold": ["Goldendoodle"],
            "down": {"error": "service down"}
        });
        let source = JsonFileSource::new(fixture, Duration::ZERO).unwrap();

        assert_eq!(source.fetch_suggestions(" Gold ", 5).await.unwrap(), vec!["Goldendoodle"]);
        assert!(source.fetch_suggestions("pug", 5).await.unwrap().is_empty());
        assert!(matches!(
            source.fetch_suggestions("down", 5).await,
            Err(FetchError::Unavailable(_))
        ));
    }

    #[test]
    fn test_scalar_fixture_rejected() {
        assert!(JsonFileSource::new(json!("Pug"), Duration::ZERO).is_err());
    }
}
