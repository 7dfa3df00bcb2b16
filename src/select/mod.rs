//! Candidate selection
//!
//! Each open PR runs through an ordered pipeline of checks:
//! 1. Branch name - pure
//! 2. Labels - pure
//! 3. CI / review status - one host query, only when required
//!
//! The first failing check rejects the PR with a reason; accepted PRs form
//! the `CombinationPlan` handed to the orchestrator.

mod labels;
mod plan;
mod status;

pub use labels::check_labels;
pub use plan::{
    CombinationPlan, SelectionOutcome, build_plan, check_branch, evaluate_candidate,
    select_candidates,
};
pub use status::{check_status, evaluate_status};

use crate::types::{CiState, ReviewDecision};

/// Why a PR was not selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Head branch does not match the configured prefix or pattern
    BranchMismatch {
        /// `"prefix"` or `"regex"`
        mode: &'static str,
    },
    /// `select_label` is set and the PR does not carry it
    MissingSelectLabel,
    /// The PR carries `ignore_label`
    IgnoredLabel(String),
    /// CI rollup is present and not successful
    CiNotPassing(CiState),
    /// Review decision is neither approved nor absent
    NotApproved(ReviewDecision),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BranchMismatch { mode } => write!(f, "branch does not match {mode}"),
            Self::MissingSelectLabel => write!(f, "does not match select_label"),
            Self::IgnoredLabel(label) => write!(f, "label {label} matches ignore_label"),
            Self::CiNotPassing(state) => write!(f, "status {state}"),
            Self::NotApproved(decision) => write!(f, "review decision {decision}"),
        }
    }
}

/// Verdict of one eligibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Passed; continue with the next check
    Accepted,
    /// Failed; stop evaluating this PR
    Rejected(Rejection),
}

impl Eligibility {
    /// Whether the check passed
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}
