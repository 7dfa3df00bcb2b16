//! Combination engine
//!
//! Merges the planned candidate branches into the integration branch and
//! publishes the combined PR.

mod body;
mod execute;

pub use body::render_body;
pub use execute::{CombinationResult, CombinationSummary, execute_combination, merge_candidates};
