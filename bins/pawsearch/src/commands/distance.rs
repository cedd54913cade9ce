//! Distance command - edit distance between two strings

use crate::context::Context;
use anyhow::Result;
use pawsearch_core::exit_codes;
use pawsearch_search::{levenshtein_distance, similarity};
use serde_json::json;

pub fn run(ctx: &Context, a: &str, b: &str) -> Result<i32> {
    let distance = levenshtein_distance(a, b);
    let score = similarity(a, b);

    if ctx.is_json() {
        let output = json!({
            "a": a,
            "b": b,
            "distance": distance,
            "similarity": score,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("distance:   {}", distance);
        println!("similarity: {:.3}", score);
    }

    Ok(exit_codes::SUCCESS)
}
