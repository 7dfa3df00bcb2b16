//! Candidate selection and plan building

use super::{Eligibility, Rejection, check_labels, check_status};
use crate::config::SelectionCriteria;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequestCandidate;
use tracing::{info, warn};

/// Accepted candidates, in merge order, plus the shared base
///
/// `base_branch` and `base_sha` come from the last accepted candidate.
/// Candidates are expected to share one base; differences are logged but not
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationPlan {
    /// Candidates to merge, in PR listing order
    pub candidates: Vec<PullRequestCandidate>,
    /// Branch the combined PR targets
    pub base_branch: String,
    /// Commit the integration branch is created from
    pub base_sha: String,
}

impl CombinationPlan {
    /// Number of candidates in the plan
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the plan has no candidates
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Result of selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Enough candidates were accepted to combine
    Plan(CombinationPlan),
    /// No PR passed selection
    NoCandidates,
    /// Some PRs passed, but fewer than `min_combine_number`
    InsufficientCandidates {
        /// Accepted count
        found: usize,
        /// Configured minimum
        required: usize,
    },
}

/// Check the head branch against the configured matcher (PURE)
pub fn check_branch(candidate: &PullRequestCandidate, criteria: &SelectionCriteria) -> Eligibility {
    let matcher = &criteria.branch_matcher;
    if matcher.matches(&candidate.head_ref) {
        Eligibility::Accepted
    } else {
        Eligibility::Rejected(Rejection::BranchMismatch {
            mode: matcher.mode(),
        })
    }
}

/// Run one PR through the eligibility pipeline
///
/// Order is branch, labels, then status; the first rejection short-circuits,
/// so no status query is made for PRs already rejected.
pub async fn evaluate_candidate(
    candidate: &PullRequestCandidate,
    criteria: &SelectionCriteria,
    platform: &dyn PlatformService,
) -> Result<Eligibility> {
    let branch = check_branch(candidate, criteria);
    if !branch.is_accepted() {
        return Ok(branch);
    }
    info!(branch = %candidate.head_ref, mode = criteria.branch_matcher.mode(), "Branch matched");

    let labels = check_labels(
        &candidate.labels,
        criteria.select_label.as_deref(),
        criteria.ignore_label.as_deref(),
    );
    if !labels.is_accepted() {
        return Ok(labels);
    }

    check_status(candidate, criteria, platform).await
}

/// Turn accepted candidates into a selection outcome (PURE)
pub fn build_plan(accepted: Vec<PullRequestCandidate>, min_combine_number: usize) -> SelectionOutcome {
    let Some(last) = accepted.last() else {
        return SelectionOutcome::NoCandidates;
    };

    if accepted.len() < min_combine_number {
        return SelectionOutcome::InsufficientCandidates {
            found: accepted.len(),
            required: min_combine_number,
        };
    }

    let base_branch = last.base_ref.clone();
    let base_sha = last.base_sha.clone();
    SelectionOutcome::Plan(CombinationPlan {
        candidates: accepted,
        base_branch,
        base_sha,
    })
}

/// Select candidates from all open PRs
///
/// PRs are evaluated sequentially in listing order. A failed status query
/// aborts selection with an error.
pub async fn select_candidates(
    pulls: &[PullRequestCandidate],
    criteria: &SelectionCriteria,
    platform: &dyn PlatformService,
) -> Result<SelectionOutcome> {
    let mut accepted: Vec<PullRequestCandidate> = Vec::new();

    for pull in pulls {
        info!(branch = %pull.head_ref, pr_number = pull.number, "Pull for branch");

        match evaluate_candidate(pull, criteria, platform).await? {
            Eligibility::Accepted => {
                if let Some(previous) = accepted.last()
                    && previous.base_ref != pull.base_ref
                {
                    warn!(
                        pr_number = pull.number,
                        base = %pull.base_ref,
                        previous_base = %previous.base_ref,
                        "Candidate targets a different base branch; the last accepted base is used"
                    );
                }
                info!(branch = %pull.head_ref, "Adding branch to combined set");
                accepted.push(pull.clone());
            }
            Eligibility::Rejected(reason) => {
                info!(branch = %pull.head_ref, pr_number = pull.number, %reason, "Discarding");
            }
        }
    }

    let outcome = build_plan(accepted, criteria.min_combine_number);
    match &outcome {
        SelectionOutcome::NoCandidates => info!("No PRs/branches matched criteria"),
        SelectionOutcome::InsufficientCandidates { found, required } => {
            info!(found, required, "Not enough PRs/branches matched criteria");
        }
        SelectionOutcome::Plan(plan) => {
            info!(count = plan.len(), base = %plan.base_branch, "Selected candidates");
        }
    }
    Ok(outcome)
}
