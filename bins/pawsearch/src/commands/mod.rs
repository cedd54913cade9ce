//! CLI command implementations
//!
//! Each command returns the process exit status on success.

pub mod did_you_mean;
pub mod distance;
pub mod history;
pub mod interactive;
pub mod search;
