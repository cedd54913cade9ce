//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        validate(&schema)?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Collect vocabulary terms from the inline list and the optional term file.
    ///
    /// Blank lines are dropped; order is inline terms first, then file order.
    pub fn vocabulary(&self) -> Result<Vec<String>> {
        let mut terms: Vec<String> = self
            .schema
            .vocabulary
            .terms
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if let Some(ref file) = self.schema.vocabulary.file {
            terms.extend(read_term_file(file)?);
        }

        Ok(terms)
    }
}

/// Read a vocabulary file with one term per line.
pub fn read_term_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Reading vocabulary file {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".pawsearch.toml",
        "pawsearch.toml",
        ".config/pawsearch.toml",
    ];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path, e),
        )
    })
}

fn validate(schema: &ConfigSchema) -> Result<()> {
    let typeahead = &schema.typeahead;
    if typeahead.max_suggestions == 0 {
        return Err(Error::invalid_config_value(
            "typeahead.max_suggestions",
            "must be at least 1",
        ));
    }
    if typeahead.history_key.trim().is_empty() {
        return Err(Error::invalid_config_value(
            "typeahead.history_key",
            "must not be empty",
        ));
    }
    Ok(())
}
