//! Repository host services
//!
//! Provides the interface the selector and orchestrator use to talk to the
//! host. Host-specific error classification lives in the implementations;
//! callers only see the typed variants of [`Error`](crate::error::Error).

mod github;

pub use github::{GitHubService, graphql_url_for};

use crate::error::Result;
use crate::types::{CombinedPullRequest, PlatformConfig, PullRequestCandidate, StatusOutcome};
use async_trait::async_trait;

/// Platform service trait for the operations a combine run needs
///
/// Every method addresses the repository named by [`config`](Self::config).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List all open PRs, fully paginated, in the host's listing order
    async fn list_open_prs(&self) -> Result<Vec<PullRequestCandidate>>;

    /// Read CI rollup state and review decision for one PR
    async fn query_status(&self, pr_number: u64) -> Result<StatusOutcome>;

    /// Create branch `name` pointing at `from_sha`
    ///
    /// Returns [`Error::BranchExists`](crate::error::Error::BranchExists)
    /// when a branch with that name is already present.
    async fn create_branch(&self, name: &str, from_sha: &str) -> Result<()>;

    /// Merge `head` into `base` on the host
    ///
    /// Conflicts and other failures are both reported as errors.
    async fn merge_branch(&self, base: &str, head: &str) -> Result<()>;

    /// Open a PR from `head` into `base`
    ///
    /// Returns [`Error::PullRequestExists`](crate::error::Error::PullRequestExists)
    /// when one is already open for the pair, and
    /// [`Error::PrCreateNotPermitted`](crate::error::Error::PrCreateNotPermitted)
    /// when the host forbids this token from opening PRs.
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<CombinedPullRequest>;

    /// Find the open PR for a `head` -> `base` pair
    async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<CombinedPullRequest>>;

    /// Replace the body of an existing PR
    async fn update_pr_body(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Reopen a closed PR
    async fn reopen_pr(&self, pr_number: u64) -> Result<()>;

    /// Add labels to a PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
