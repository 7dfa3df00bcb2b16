//! Run outcome reporting
//!
//! Maps each run to exactly one terminal status string and writes the
//! action outputs (`status`, `pr_number`, `pr_url`).

use crate::combine::CombinationResult;
use crate::error::{Error, Result};
use crate::types::CombinedPrState;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Status for a run that produced a combined PR
pub const STATUS_SUCCESS: &str = "success";

/// Status when no PR passed selection
pub const STATUS_NO_CANDIDATES: &str = "No PRs/branches matched criteria";

/// Status when fewer PRs than `min_combine_number` passed selection
pub const STATUS_INSUFFICIENT_CANDIDATES: &str =
    "Not enough PRs/branches matched criteria to create a combined PR";

/// Status when the integration branch could not be created
pub const STATUS_BRANCH_CREATE_FAILED: &str = "Failed to create combined branch";

/// Status when the combined PR could not be created or updated
pub const STATUS_PR_CREATE_FAILED: &str = "Failed to create combined PR";

/// Hint shown when the host refuses automated PR creation
pub const PR_PERMISSION_HINT: &str = "GitHub Actions is not permitted to create pull requests in this repository. \
Enable \"Allow GitHub Actions to create and approve pull requests\" under Settings > Actions > General, \
or run with a token that can open pull requests.";

/// Terminal outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A combined PR was created or updated
    Success {
        /// Combined PR number
        pr_number: u64,
        /// Combined PR URL
        pr_url: String,
        /// How the PR came to exist
        pr_state: CombinedPrState,
        /// Candidates merged
        merged: usize,
        /// Candidates left out
        conflicted: usize,
    },
    /// Nothing matched
    NoCandidates,
    /// Below the configured threshold
    InsufficientCandidates {
        /// Accepted count
        found: usize,
        /// Configured minimum
        required: usize,
    },
    /// Invalid configuration; nothing was contacted
    ConfigurationError(String),
    /// Integration branch creation failed
    BranchCreateFailed(String),
    /// Combined PR creation failed
    PrCreateFailed {
        /// Host error
        message: String,
        /// Actionable hint for known host policies
        hint: Option<&'static str>,
    },
    /// The run stopped on an unclassified error (listing, status query, setup)
    Aborted(String),
}

impl RunOutcome {
    /// The terminal status string
    pub fn status(&self) -> &str {
        match self {
            Self::Success { .. } => STATUS_SUCCESS,
            Self::NoCandidates => STATUS_NO_CANDIDATES,
            Self::InsufficientCandidates { .. } => STATUS_INSUFFICIENT_CANDIDATES,
            Self::ConfigurationError(message) | Self::Aborted(message) => message,
            Self::BranchCreateFailed(_) => STATUS_BRANCH_CREATE_FAILED,
            Self::PrCreateFailed { .. } => STATUS_PR_CREATE_FAILED,
        }
    }

    /// Whether this outcome should fail the run
    ///
    /// Finding nothing (or too little) to combine is not a failure.
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError(_)
                | Self::BranchCreateFailed(_)
                | Self::PrCreateFailed { .. }
                | Self::Aborted(_)
        )
    }

    /// Combined PR number, when one was published
    pub const fn pr_number(&self) -> Option<u64> {
        match self {
            Self::Success { pr_number, .. } => Some(*pr_number),
            _ => None,
        }
    }

    /// Combined PR URL, when one was published
    pub fn pr_url(&self) -> Option<&str> {
        match self {
            Self::Success { pr_url, .. } => Some(pr_url),
            _ => None,
        }
    }

    /// Map a configuration error to its outcome; other errors are returned
    pub fn from_config_error(err: Error) -> Result<Self> {
        match err {
            Error::Config(message) => Ok(Self::ConfigurationError(message)),
            Error::InvalidRegex(e) => Ok(Self::ConfigurationError(format!("invalid branch_regex: {e}"))),
            other => Err(other),
        }
    }
}

impl From<CombinationResult> for RunOutcome {
    fn from(result: CombinationResult) -> Self {
        match result {
            CombinationResult::Published(summary) => Self::Success {
                pr_number: summary.pull_request.number,
                pr_url: summary.pull_request.html_url.clone(),
                pr_state: summary.pr_state,
                merged: summary.merged().count(),
                conflicted: summary.conflicted().count(),
            },
            CombinationResult::BranchCreateFailed { message } => Self::BranchCreateFailed(message),
            CombinationResult::PrCreateFailed {
                message,
                permission_denied,
                ..
            } => Self::PrCreateFailed {
                message,
                hint: permission_denied.then_some(PR_PERMISSION_HINT),
            },
        }
    }
}

/// Format one output entry in the runner's file-command syntax
///
/// Single-line values use `key=value`. Values containing a newline use the
/// heredoc form with a random delimiter, which the runner requires for them.
pub fn format_output(key: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{key}<<{delimiter}\n{value}\n{delimiter}")
    } else {
        format!("{key}={value}")
    }
}

/// Render the output entries for a run
pub fn output_lines(outcome: &RunOutcome) -> Vec<String> {
    let mut lines = vec![format_output("status", outcome.status())];
    if let Some(number) = outcome.pr_number() {
        lines.push(format_output("pr_number", &number.to_string()));
    }
    if let Some(url) = outcome.pr_url() {
        lines.push(format_output("pr_url", url));
    }
    lines
}

/// Append outputs to the file named by `GITHUB_OUTPUT`.
///
/// Creates the file if it doesn't exist.
pub fn write_outputs(path: &Path, outcome: &RunOutcome) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    for line in output_lines(outcome) {
        writeln!(file, "{line}")?;
    }

    Ok(())
}
