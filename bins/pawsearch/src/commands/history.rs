//! History command - inspect or clear persisted searches

use crate::context::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pawsearch_core::exit_codes;
use pawsearch_typeahead::HistoryStore;
use serde_json::json;
use std::sync::Arc;

fn open(ctx: &Context) -> Result<HistoryStore> {
    Ok(HistoryStore::new(Arc::new(ctx.store()?)))
}

pub fn list(ctx: &Context, key: Option<&str>) -> Result<i32> {
    let key = ctx.history_key(key);
    let entries = open(ctx)?.load(key);

    if ctx.is_json() {
        let output = json!({ "key": key, "history": entries });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if entries.is_empty() {
        println!("{}", "No search history".dimmed());
    } else {
        for (i, entry) in entries.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, entry);
        }
    }

    Ok(exit_codes::SUCCESS)
}

pub fn clear(ctx: &Context, key: Option<&str>) -> Result<i32> {
    let key = ctx.history_key(key);
    open(ctx)?.clear(key);

    if ctx.is_json() {
        println!("{}", json!({ "key": key, "cleared": true }));
    } else {
        println!("{} Cleared search history ({})", "✓".green(), key);
    }

    Ok(exit_codes::SUCCESS)
}
