//! Error types for combine-prs

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting and combining pull requests
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or inconsistent configuration, detected before any network call
    #[error("{0}")]
    Config(String),

    /// `branch_regex` could not be compiled
    #[error("invalid branch_regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Failed to read or parse a configuration file
    #[error("config file error: {0}")]
    ConfigFile(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Status/review lookup failed for a candidate
    #[error("status query failed for PR #{pr_number}: {message}")]
    StatusQuery {
        /// PR whose status could not be read
        pr_number: u64,
        /// Underlying failure
        message: String,
    },

    /// A branch with this name already exists on the host
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Merging one branch into another failed (conflict or otherwise)
    #[error("failed to merge {head} into {base}: {message}")]
    MergeFailed {
        /// Branch being merged into
        base: String,
        /// Branch being merged
        head: String,
        /// Host-provided reason
        message: String,
    },

    /// A pull request for this head/base pair already exists
    #[error("a pull request already exists for {head} -> {base}")]
    PullRequestExists {
        /// Head branch
        head: String,
        /// Base branch
        base: String,
    },

    /// The host refused to let this token open pull requests
    #[error("not permitted to create pull requests: {0}")]
    PrCreateNotPermitted(String),

    /// Generic platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}
