//! combine-prs: combine many similar pull requests into one
//!
//! Selects open pull requests whose head branch, labels, CI state, and review
//! decision meet the configured criteria, merges their branches into a single
//! integration branch, and opens (or refreshes) one combined pull request.
//! Per-branch merge failures are recorded and reported, never fatal.

pub mod combine;
pub mod config;
pub mod error;
pub mod platform;
pub mod report;
pub mod run;
pub mod select;
pub mod types;

pub use run::{plan_run, run};
