//! Did-you-mean command - corrections for a misspelled query

use crate::context::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pawsearch_core::exit_codes;
use pawsearch_search::similarity;
use serde_json::json;

pub fn run(ctx: &Context, query: &str, limit: Option<usize>) -> Result<i32> {
    let vocabulary = ctx.require_vocabulary()?;
    let limit = limit.unwrap_or(ctx.config.schema.typeahead.max_did_you_mean);
    let guesses = pawsearch_search::did_you_mean(query, &vocabulary, limit);

    if ctx.is_json() {
        let output = json!({
            "query": query,
            "did_you_mean": guesses,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if guesses.is_empty() {
        println!("{} {}", "No close matches for".yellow(), query.bold());
    } else {
        println!("Did you mean:");
        let needle = query.trim().to_lowercase();
        for guess in &guesses {
            let score = similarity(&needle, &guess.to_lowercase());
            println!("  {} {}", guess.cyan(), format!("{:.0}%", score * 100.0).dimmed());
        }
    }

    Ok(if guesses.is_empty() {
        exit_codes::NO_MATCHES
    } else {
        exit_codes::SUCCESS
    })
}
