//! Combination execution - effectful operations
//!
//! Takes a `CombinationPlan` (built by the pure selection functions) and
//! drives the host through the run:
//! `CreatingBranch -> MergingCandidates -> PublishingPR -> Reconciling -> Done`.
//! Merges are strictly sequential because each builds on the integration
//! branch left by the previous one. Nothing is rolled back on failure.

use super::body::render_body;
use crate::config::CombineConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::select::CombinationPlan;
use crate::types::{
    CombinedPrState, CombinedPullRequest, MergeOutcome, MergeRecord, PrState,
};
use tracing::{error, info, warn};

/// A successfully published combined PR
#[derive(Debug, Clone)]
pub struct CombinationSummary {
    /// One record per planned candidate, in plan order
    pub records: Vec<MergeRecord>,
    /// The combined PR
    pub pull_request: CombinedPullRequest,
    /// How the PR came to exist
    pub pr_state: CombinedPrState,
    /// Body written to the PR
    pub body: String,
}

impl CombinationSummary {
    /// Records for candidates that merged
    pub fn merged(&self) -> impl Iterator<Item = &MergeRecord> {
        self.records
            .iter()
            .filter(|r| r.outcome == MergeOutcome::Merged)
    }

    /// Records for candidates left out due to merge failures
    pub fn conflicted(&self) -> impl Iterator<Item = &MergeRecord> {
        self.records
            .iter()
            .filter(|r| r.outcome == MergeOutcome::Conflicted)
    }
}

/// Result of combination execution
#[derive(Debug, Clone)]
pub enum CombinationResult {
    /// The combined PR exists (open unless reopening it failed)
    Published(CombinationSummary),
    /// The integration branch could not be created (and did not already exist)
    BranchCreateFailed {
        /// Host error
        message: String,
    },
    /// The combined PR could not be created or located
    PrCreateFailed {
        /// Host error
        message: String,
        /// The host refused because automated PR creation is disabled
        permission_denied: bool,
        /// Merge attempts made before publishing failed
        records: Vec<MergeRecord>,
    },
}

/// Create the integration branch, tolerating an existing one
///
/// Returns the error message when creation fails for any other reason.
async fn create_integration_branch(
    plan: &CombinationPlan,
    branch: &str,
    platform: &dyn PlatformService,
) -> std::result::Result<(), String> {
    match platform.create_branch(branch, &plan.base_sha).await {
        Ok(()) => {
            info!(branch, sha = %plan.base_sha, "Created combined branch");
            Ok(())
        }
        Err(Error::BranchExists(_)) => {
            warn!(branch, "Branch already exists - will try to merge into it");
            Ok(())
        }
        Err(e) => {
            error!(branch, error = %e, "Failed to create combined branch");
            Err(e.to_string())
        }
    }
}

/// Merge every candidate in plan order, isolating failures
pub async fn merge_candidates(
    plan: &CombinationPlan,
    branch: &str,
    platform: &dyn PlatformService,
) -> Vec<MergeRecord> {
    let mut records = Vec::with_capacity(plan.len());

    for candidate in &plan.candidates {
        let outcome = match platform.merge_branch(branch, &candidate.head_ref).await {
            Ok(()) => {
                info!(branch = %candidate.head_ref, pr_number = candidate.number, "Merged branch");
                MergeOutcome::Merged
            }
            Err(e) => {
                warn!(
                    branch = %candidate.head_ref,
                    pr_number = candidate.number,
                    error = %e,
                    "Failed to merge branch"
                );
                MergeOutcome::Conflicted
            }
        };
        records.push(MergeRecord {
            candidate: candidate.clone(),
            outcome,
        });
    }

    records
}

/// Outcome of the publish step, before reconciliation
enum Published {
    Created(CombinedPullRequest),
    Reused(CombinedPullRequest),
}

/// Create the combined PR, or refresh the body of the existing one
async fn publish_pr(
    plan: &CombinationPlan,
    config: &CombineConfig,
    body: &str,
    platform: &dyn PlatformService,
) -> Result<Published> {
    let head = config.combine_branch_name.as_str();
    let base = plan.base_branch.as_str();

    info!(head, base, "Creating combined PR");
    match platform.create_pr(head, base, &config.pr_title, body).await {
        Ok(pr) => Ok(Published::Created(pr)),
        Err(Error::PullRequestExists { .. }) => {
            warn!(head, base, "Combined PR already exists");
            let existing = platform.find_open_pr(head, base).await?.ok_or_else(|| {
                Error::Platform(format!(
                    "a pull request for {head} -> {base} was reported as existing but no open PR was found"
                ))
            })?;
            info!(pr_number = existing.number, "Updating PR body");
            platform.update_pr_body(existing.number, body).await?;
            Ok(Published::Reused(existing))
        }
        Err(e) => Err(e),
    }
}

/// Execute the combination plan (EFFECTFUL)
///
/// Host errors during merges never abort the run. Branch creation and PR
/// publishing failures end it with a distinct result. Reopening and labelling
/// happen after the PR exists and only log on failure.
pub async fn execute_combination(
    plan: &CombinationPlan,
    config: &CombineConfig,
    platform: &dyn PlatformService,
) -> CombinationResult {
    let branch = config.combine_branch_name.as_str();

    // CreatingBranch
    if let Err(message) = create_integration_branch(plan, branch, platform).await {
        return CombinationResult::BranchCreateFailed { message };
    }

    // MergingCandidates
    let records = merge_candidates(plan, branch, platform).await;

    // PublishingPR
    let body = render_body(&config.pr_body_header, &records);
    let published = match publish_pr(plan, config, &body, platform).await {
        Ok(published) => published,
        Err(e) => {
            let permission_denied = matches!(e, Error::PrCreateNotPermitted(_));
            error!(error = %e, permission_denied, "Failed to create combined PR");
            return CombinationResult::PrCreateFailed {
                message: e.to_string(),
                permission_denied,
                records,
            };
        }
    };

    // Reconciling
    let (mut pull_request, mut pr_state) = match published {
        Published::Created(pr) => (pr, CombinedPrState::Created),
        Published::Reused(pr) => (pr, CombinedPrState::ReusedOpen),
    };
    if pull_request.state == PrState::Closed {
        info!(pr_number = pull_request.number, "Combined PR is closed - attempting to reopen");
        match platform.reopen_pr(pull_request.number).await {
            Ok(()) => {
                pull_request.state = PrState::Open;
                pr_state = CombinedPrState::ReusedClosedReopened;
            }
            Err(e) => {
                warn!(pr_number = pull_request.number, error = %e, "Failed to reopen combined PR");
            }
        }
    }

    // Done
    if !config.labels.is_empty()
        && let Err(e) = platform
            .add_labels(pull_request.number, &config.labels)
            .await
    {
        warn!(pr_number = pull_request.number, error = %e, "Failed to add labels to combined PR");
    }

    info!(url = %pull_request.html_url, "Combined PR url");
    info!(pr_number = pull_request.number, "Combined PR number");

    CombinationResult::Published(CombinationSummary {
        records,
        pull_request,
        pr_state,
        body,
    })
}
