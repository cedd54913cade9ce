//! Match command - rank the vocabulary against a query

use crate::context::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pawsearch_core::exit_codes;
use serde_json::json;

/// Rank the vocabulary and print the best matches
pub fn run(ctx: &Context, query: &str, limit: Option<usize>, scores: bool) -> Result<i32> {
    let vocabulary = ctx.require_vocabulary()?;
    let typeahead = &ctx.config.schema.typeahead;
    let limit = limit.unwrap_or(typeahead.max_suggestions);
    let results = pawsearch_search::rank(query, &vocabulary, limit);

    // Same fallback the typeahead uses when nothing matches
    let guesses = if results.is_empty() && typeahead.show_did_you_mean {
        pawsearch_search::did_you_mean(query, &vocabulary, typeahead.max_did_you_mean)
    } else {
        Vec::new()
    };

    if ctx.is_json() {
        let matches = if scores {
            serde_json::to_value(&results)?
        } else {
            json!(results.iter().map(|r| &r.item).collect::<Vec<_>>())
        };
        let output = json!({
            "query": query,
            "matches": matches,
            "did_you_mean": guesses,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if results.is_empty() {
        println!("{} {}", "No matches for".yellow(), query.bold());
        if !guesses.is_empty() {
            println!("  Did you mean: {}", guesses.join(", ").cyan());
        }
    } else {
        for (i, result) in results.iter().enumerate() {
            if scores {
                println!(
                    "  {:>2}. {} {}",
                    i + 1,
                    result.item,
                    format!("({})", result.score).dimmed()
                );
            } else {
                println!("  {:>2}. {}", i + 1, result.item);
            }
        }
    }

    Ok(if results.is_empty() {
        exit_codes::NO_MATCHES
    } else {
        exit_codes::SUCCESS
    })
}
