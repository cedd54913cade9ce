//! Core utilities for pawsearch
//!
//! This crate provides shared functionality used by the search, typeahead and CLI crates:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults and validation
//! - **Storage**: Small key/value stores for persisted state such as search history
//!
//! # Example
//!
//! ```rust,no_run
//! use pawsearch_core::config::Config;
//! use pawsearch_core::storage::{FileStore, KeyValueStore};
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! let store = FileStore::default_store().expect("Storage unavailable");
//! let history = store.get_item(&config.schema.typeahead.history_key);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod storage;

pub use error::{exit_codes, Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, TypeaheadConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::storage::{FileStore, KeyValueStore, MemoryStore};
}
