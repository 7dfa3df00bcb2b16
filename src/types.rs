//! Core types for combine-prs

use serde::{Deserialize, Serialize};

/// An open pull request as listed by the host, before eligibility checks
///
/// Snapshot taken once per run and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestCandidate {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Head (source) branch name
    pub head_ref: String,
    /// Base (target) branch name
    pub base_ref: String,
    /// Commit SHA the base branch pointed at when the PR was listed
    pub base_sha: String,
    /// Label names attached to the PR
    pub labels: Vec<String>,
}

impl PullRequestCandidate {
    /// Short `#123 Title` form used in logs and the combined PR body
    pub fn summary(&self) -> String {
        format!("#{} {}", self.number, self.title)
    }
}

/// Aggregated CI state of the most recent commit on a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CiState {
    /// All checks passed
    Success,
    /// At least one check failed
    Failure,
    /// Pending, error, expected, or any state we don't model
    Other(String),
    /// No rollup exists (no checks configured)
    Undefined,
}

impl CiState {
    /// Map a GraphQL `StatusState` value; `None` means no rollup
    pub fn from_rollup(state: Option<&str>) -> Self {
        match state {
            None => Self::Undefined,
            Some("SUCCESS") => Self::Success,
            Some("FAILURE") => Self::Failure,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for CiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Other(state) => write!(f, "{state}"),
            Self::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

/// Review decision as computed by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    /// Required approvals are present
    Approved,
    /// Approval is still required
    ReviewRequired,
    /// A reviewer requested changes
    ChangesRequested,
    /// Any decision we don't model
    Other(String),
    /// Null decision: the repository does not require reviews
    NotRequired,
}

impl ReviewDecision {
    /// Map a GraphQL `PullRequestReviewDecision` value; `None` is the null decision
    pub fn from_graphql(decision: Option<&str>) -> Self {
        match decision {
            None => Self::NotRequired,
            Some("APPROVED") => Self::Approved,
            Some("REVIEW_REQUIRED") => Self::ReviewRequired,
            Some("CHANGES_REQUESTED") => Self::ChangesRequested,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::ReviewRequired => write!(f, "REVIEW_REQUIRED"),
            Self::ChangesRequested => write!(f, "CHANGES_REQUESTED"),
            Self::Other(decision) => write!(f, "{decision}"),
            Self::NotRequired => write!(f, "null"),
        }
    }
}

/// CI and review state of a single PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    /// Rollup state of the latest commit
    pub ci_state: CiState,
    /// Review decision
    pub review_decision: ReviewDecision,
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// The combined pull request as returned by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedPullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Current state
    pub state: PrState,
}

/// How the combined PR came to exist in this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinedPrState {
    /// A new PR was opened
    Created,
    /// An existing open PR had its body refreshed
    ReusedOpen,
    /// An existing PR was found closed and reopened
    ReusedClosedReopened,
}

impl std::fmt::Display for CombinedPrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::ReusedOpen => write!(f, "updated"),
            Self::ReusedClosedReopened => write!(f, "reopened"),
        }
    }
}

/// Per-candidate result of merging its branch into the integration branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Branch merged cleanly (or was already contained)
    Merged,
    /// Merge failed; the candidate is left out of the combined PR
    Conflicted,
}

/// Record of one merge attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    /// The candidate whose branch was merged
    pub candidate: PullRequestCandidate,
    /// What happened
    pub outcome: MergeOutcome,
}

/// Repository coordinates on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl PlatformConfig {
    /// Parse `owner/name` as found in `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl std::fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
